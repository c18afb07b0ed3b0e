use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod output;

#[derive(Parser)]
#[command(
    name = "chatline",
    version,
    about = "Talk to a rule-based campus assistant and manage its transcripts"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: output::OutputFormat,

    /// Rule configuration file (agents, responses, exit commands)
    #[arg(long, global = true, env = "CHATLINE_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Directory holding `history.json` and `chat_histories/`
    #[arg(long, global = true, env = "CHATLINE_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: commands::Commands,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let workspace = commands::Workspace {
        config: cli.config,
        data_dir: cli.data_dir,
    };

    match &cli.command {
        commands::Commands::Chat(args) => commands::chat::run(args, &workspace),
        commands::Commands::History(args) => commands::history::run(args, &workspace, cli.format),
        commands::Commands::Delete(args) => commands::delete::run(args, &workspace),
        commands::Commands::Agents => commands::agents::run(&workspace, cli.format),
    }
}

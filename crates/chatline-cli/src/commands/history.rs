use anyhow::{Context, Result};
use clap::Args;

use super::Workspace;
use crate::output::format::format_history_json;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct HistoryArgs {
    /// User whose transcript to show
    #[arg(short, long)]
    pub user: String,
}

pub fn run(args: &HistoryArgs, workspace: &Workspace, format: OutputFormat) -> Result<()> {
    let store = workspace.store();
    let user = args.user.trim();
    let output = match format {
        OutputFormat::Text => store.render_history(user),
        OutputFormat::Json => format_history_json(&store.read_user_history(user))
            .context("Failed to serialize history")?,
    };
    println!("{output}");
    Ok(())
}

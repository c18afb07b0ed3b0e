use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use chatline_engine::{deletion_message, ChatError, ChatSession, Dice, RngDice, SessionState};
use clap::Args;

use super::Workspace;

const HELP: &str = "\
Type your message and press Enter.
  /history   show your conversation history
  /delete    delete your conversation history
  /help      show this help
To exit, simply type 'bye'.";

#[derive(Args)]
pub struct ChatArgs {
    /// Your name (prompted for when omitted)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Seed the random source for reproducible conversations
    #[arg(long)]
    pub seed: Option<u64>,

    /// Reply immediately instead of pausing one to two seconds
    #[arg(long)]
    pub no_delay: bool,

    /// Chance per message of a simulated dropped connection
    #[arg(long, default_value_t = 0.1)]
    pub disconnect_probability: f64,
}

pub fn run(args: &ChatArgs, workspace: &Workspace) -> Result<()> {
    let rules = workspace.rules()?;
    let mut settings = workspace.settings();
    settings.disconnect_probability = args.disconnect_probability;
    if args.no_delay {
        settings = settings.without_delay();
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    let user = args.user.as_deref();

    match args.seed {
        Some(seed) => {
            let mut chat = ChatSession::with_dice(rules, settings, RngDice::seeded(seed))?;
            converse(&mut chat, user, &mut input, &mut out)
        }
        None => {
            let mut chat = ChatSession::new(rules, settings)?;
            converse(&mut chat, user, &mut input, &mut out)
        }
    }
}

/// Drive one conversation over line-oriented input until a farewell or EOF.
fn converse<D, R, W>(
    chat: &mut ChatSession<D>,
    user: Option<&str>,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    D: Dice,
    R: BufRead,
    W: Write,
{
    let Some(user) = begin(chat, user, input, out)? else {
        return Ok(());
    };
    writeln!(out, "Type /help for commands.")?;

    loop {
        write!(out, "You: ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            writeln!(out)?;
            break;
        };

        match line.trim() {
            "/help" => writeln!(out, "{HELP}")?,
            "/history" => writeln!(out, "{}", chat.render_history())?,
            "/delete" => {
                let result = chat.delete_user_history(&user);
                writeln!(out, "{}", deletion_message(&user, &result))?;
                write!(out, "Would you like to continue chatting? [y/N] ")?;
                out.flush()?;
                let answer = read_line(input)?.unwrap_or_default();
                if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
                    writeln!(out, "{}", chat.start(&user)?)?;
                } else {
                    writeln!(out, "Thanks for chatting, {user}. Have a great day!")?;
                    break;
                }
            }
            _ => {
                let reply = match chat.turn(&line) {
                    Ok(reply) => reply,
                    Err(ChatError::Config(e)) => {
                        return Err(e).context("The rule table cannot answer this message")
                    }
                    Err(e) => return Err(e.into()),
                };
                writeln!(out, "{}", speaker_prefixed(chat.selected_agent(), &reply))?;
                if chat.state() == SessionState::Terminated {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Start the session, prompting until a usable name arrives.
/// Returns `None` when input ends first.
fn begin<D, R, W>(
    chat: &mut ChatSession<D>,
    user: Option<&str>,
    input: &mut R,
    out: &mut W,
) -> Result<Option<String>>
where
    D: Dice,
    R: BufRead,
    W: Write,
{
    let mut candidate = user.map(String::from);
    loop {
        let name = match candidate.take() {
            Some(name) => name,
            None => {
                write!(out, "Hello! Please enter your name to begin: ")?;
                out.flush()?;
                match read_line(input)? {
                    Some(line) => line,
                    None => return Ok(None),
                }
            }
        };
        match chat.start(&name) {
            Ok(greeting) => {
                writeln!(out, "{greeting}")?;
                return Ok(chat.current_user().map(String::from));
            }
            Err(ChatError::Validation(prompt)) => writeln!(out, "{prompt}")?,
            Err(e) => return Err(e.into()),
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Replies that already name the agent are printed as-is.
fn speaker_prefixed(agent: &str, reply: &str) -> String {
    if reply.starts_with(&format!("{agent}: ")) {
        reply.to_string()
    } else {
        format!("{agent}: {reply}")
    }
}

use anyhow::Result;
use chatline_engine::deletion_message;
use clap::Args;

use super::Workspace;

#[derive(Args)]
pub struct DeleteArgs {
    /// User whose transcript to delete
    #[arg(short, long)]
    pub user: String,
}

pub fn run(args: &DeleteArgs, workspace: &Workspace) -> Result<()> {
    let user = args.user.trim();
    let result = workspace.store().delete_user_history(user);
    let message = deletion_message(user, &result);
    match result {
        Ok(_) => {
            println!("{message}");
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context(message)),
    }
}

pub mod agents;
pub mod chat;
pub mod delete;
pub mod history;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chatline_core::config::{load_rules, ChatSettings};
use chatline_core::model::RuleTable;
use chatline_core::storage::HistoryStore;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive conversation
    Chat(chat::ChatArgs),
    /// Show a user's conversation history
    History(history::HistoryArgs),
    /// Delete a user's conversation history
    Delete(delete::DeleteArgs),
    /// Validate the configuration and list the agents
    Agents,
}

/// Where the configuration and transcripts live for this invocation.
pub struct Workspace {
    pub config: PathBuf,
    pub data_dir: PathBuf,
}

impl Workspace {
    pub fn rules(&self) -> Result<RuleTable> {
        load_rules(&self.config)
            .with_context(|| format!("Invalid configuration in {}", self.config.display()))
    }

    pub fn settings(&self) -> ChatSettings {
        ChatSettings::with_data_dir(&self.data_dir)
    }

    pub fn store(&self) -> HistoryStore {
        HistoryStore::new(&self.settings())
    }
}

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use super::json_file;
use crate::config::ChatSettings;
use crate::error::CoreError;
use crate::model::{Speaker, TranscriptEntry};

/// Substring identifying a simulated disconnection notice. Such notices are
/// never written to any transcript.
pub const DISCONNECTION_MARKER: &str = "Oops! We seem to have lost the connection";

/// Shown in place of an empty per-user transcript.
pub const NO_HISTORY: &str = "No previous chat history found.";

/// Result of removing a per-user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// File-backed per-user and global transcripts.
///
/// Reads never fail: absent, unreadable or malformed records come back as
/// empty sequences. Write failures are logged and returned so callers can
/// carry on without them.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    history_dir: PathBuf,
    global_path: PathBuf,
}

impl HistoryStore {
    pub fn new(settings: &ChatSettings) -> Self {
        if let Err(e) = fs::create_dir_all(&settings.history_dir) {
            warn!(
                "Could not create history directory {}: {e}",
                settings.history_dir.display()
            );
        }
        Self {
            history_dir: settings.history_dir.clone(),
            global_path: settings.global_history_path.clone(),
        }
    }

    pub fn history_dir(&self) -> &Path {
        &self.history_dir
    }

    pub fn global_path(&self) -> &Path {
        &self.global_path
    }

    /// `<history_dir>/<user>_history.json`, refusing names that would
    /// escape the history directory.
    pub fn user_history_path(&self, user: &str) -> Result<PathBuf, CoreError> {
        let unsafe_name = user.is_empty()
            || user == "."
            || user.contains("..")
            || user.chars().any(|c| matches!(c, '/' | '\\' | '\0'));
        if unsafe_name {
            return Err(CoreError::InvalidUser(user.to_string()));
        }
        Ok(self.history_dir.join(format!("{user}_history.json")))
    }

    pub fn read_user_history(&self, user: &str) -> Vec<TranscriptEntry> {
        let path = match self.user_history_path(user) {
            Ok(path) => path,
            Err(e) => {
                warn!("{e}");
                return Vec::new();
            }
        };
        match json_file::read_entries(&path) {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                warn!("History file for {user} not found.");
                Vec::new()
            }
            Err(CoreError::Json(e)) => {
                warn!("Error decoding the history file for {user}. It may be corrupted: {e}");
                Vec::new()
            }
            Err(e) => {
                error!("Error while loading chat history for {user}: {e}");
                Vec::new()
            }
        }
    }

    pub fn write_user_history(
        &self,
        user: &str,
        entries: &[TranscriptEntry],
    ) -> Result<(), CoreError> {
        debug!(user, entries = entries.len(), "Saving chat history");
        self.user_history_path(user)
            .and_then(|path| json_file::write_entries(&path, entries))
            .inspect_err(|e| error!("Error while saving chat history for {user}: {e}"))
    }

    /// Append one entry to a user's record under its lock.
    pub fn append_user(&self, user: &str, entry: &TranscriptEntry) -> Result<(), CoreError> {
        self.user_history_path(user)
            .and_then(|path| {
                json_file::update_entries(&path, |entries| entries.push(entry.clone()))
            })
            .inspect_err(|e| error!("Error while saving chat history for {user}: {e}"))
    }

    pub fn read_global_history(&self) -> Vec<TranscriptEntry> {
        match json_file::read_entries(&self.global_path) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                warn!("Global chat history unreadable, treating as empty: {e}");
                Vec::new()
            }
        }
    }

    /// Append one entry to the global record, rewriting it wholesale.
    pub fn append_global(&self, entry: &TranscriptEntry) -> Result<(), CoreError> {
        json_file::update_entries(&self.global_path, |entries| entries.push(entry.clone()))
            .inspect_err(|e| error!("Error while saving to global chat history: {e}"))
    }

    pub fn delete_user_history(&self, user: &str) -> Result<DeleteOutcome, CoreError> {
        let path = self.user_history_path(user)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Chat history for {user} has been deleted.");
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("No chat history found for {user}.");
                Ok(DeleteOutcome::NotFound)
            }
            Err(e) => {
                error!("Error while deleting chat history for {user}: {e}");
                Err(e.into())
            }
        }
    }

    /// Record one message to both transcripts.
    ///
    /// Does nothing without a user, or for a disconnection notice. Storage
    /// failures are logged by the individual writes and otherwise ignored.
    pub fn record_exchange(
        &self,
        user: Option<&str>,
        agent: &str,
        speaker: Speaker,
        message: &str,
    ) {
        let Some(user) = user.filter(|u| !u.is_empty()) else {
            return;
        };
        if message.contains(DISCONNECTION_MARKER) {
            return;
        }
        let entry = TranscriptEntry::now(speaker.display_name(user, agent), message);
        let _ = self.append_user(user, &entry);
        let _ = self.append_global(&entry);
    }

    /// Per-user transcript as `"<speaker>: <message>"` lines.
    pub fn render_history(&self, user: &str) -> String {
        let entries = self.read_user_history(user);
        if entries.is_empty() {
            return NO_HISTORY.to_string();
        }
        entries
            .iter()
            .map(TranscriptEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

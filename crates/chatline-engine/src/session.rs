use std::thread;

use chatline_core::config::ChatSettings;
use chatline_core::model::{RuleTable, Speaker};
use chatline_core::storage::{DeleteOutcome, HistoryStore, DISCONNECTION_MARKER};
use chatline_core::{ConfigError, CoreError};
use chrono::Utc;
use rand::rngs::ThreadRng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::dice::{choose, Dice, RngDice};
use crate::response::ResponseEngine;

const EMPTY_NAME_PROMPT: &str = "Please provide your name!";
const NO_SESSION_NOTICE: &str = "Please start a conversation first.";

#[derive(Error, Debug)]
pub enum ChatError {
    /// Recoverable: the caller should ask again.
    #[error("{0}")]
    Validation(String),

    #[error("No active conversation; call start first")]
    NoActiveSession,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Active,
    Terminated,
}

/// Conversation lifecycle for one process.
///
/// The agent persona is drawn once at construction and kept for every
/// session this value hosts. `start` may be called again after a farewell
/// to re-enter the active state.
pub struct ChatSession<D = RngDice<ThreadRng>> {
    engine: ResponseEngine,
    store: HistoryStore,
    settings: ChatSettings,
    selected_agent: String,
    current_user: Option<String>,
    state: SessionState,
    dice: D,
}

impl ChatSession {
    /// Build a session using thread-local randomness.
    pub fn new(rules: RuleTable, settings: ChatSettings) -> Result<Self, ChatError> {
        Self::with_dice(rules, settings, RngDice::thread())
    }
}

impl<D: Dice> ChatSession<D> {
    pub fn with_dice(
        rules: RuleTable,
        settings: ChatSettings,
        mut dice: D,
    ) -> Result<Self, ChatError> {
        rules.validate()?;
        let selected_agent = choose(&mut dice, &rules.agent_names)
            .cloned()
            .ok_or(ConfigError::NoAgents)?;
        info!(agent = %selected_agent, "Agent selected");

        Ok(Self {
            engine: ResponseEngine::new(rules)?,
            store: HistoryStore::new(&settings),
            settings,
            selected_agent,
            current_user: None,
            state: SessionState::NoSession,
            dice,
        })
    }

    pub fn selected_agent(&self) -> &str {
        &self.selected_agent
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn rules(&self) -> &RuleTable {
        self.engine.rules()
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Begin (or resume) a conversation for `user_name` and return the greeting.
    pub fn start(&mut self, user_name: &str) -> Result<String, ChatError> {
        let user = user_name.trim();
        if user.is_empty() {
            return Err(ChatError::Validation(EMPTY_NAME_PROMPT.to_string()));
        }
        self.current_user = Some(user.to_string());
        self.state = SessionState::Active;

        let greeting = format!(
            "Hello {user}! Chat with {}. Type 'bye' to exit.",
            self.selected_agent
        );
        self.record(Speaker::System, &greeting);
        Ok(greeting)
    }

    /// Process one utterance and return the reply.
    pub fn turn(&mut self, utterance: &str) -> Result<String, ChatError> {
        if self.state != SessionState::Active {
            return Err(ChatError::NoActiveSession);
        }
        let utterance = utterance.trim().to_lowercase();

        if self.dice.roll() < self.settings.disconnect_probability {
            warn!(
                user = self.current_user.as_deref().unwrap_or_default(),
                at = %Utc::now().format("%Y-%m-%d %H:%M:%S"),
                "Disconnection occurred"
            );
            return Ok(self.disconnection_notice());
        }

        if utterance.is_empty() {
            let reply = format!(
                "{}: You haven't said anything. Please ask a question!",
                self.selected_agent
            );
            self.record(Speaker::User, "");
            self.record(Speaker::Agent, &reply);
            return Ok(reply);
        }

        if self.rules().is_exit_command(&utterance) {
            let reply = format!(
                "{}: Goodbye {}!",
                self.selected_agent,
                self.current_user.as_deref().unwrap_or_default()
            );
            self.record(Speaker::User, &utterance);
            self.record(Speaker::Agent, &reply);
            self.state = SessionState::Terminated;
            debug!("Session terminated by exit command");
            return Ok(reply);
        }

        self.pause();
        let user = self.current_user.clone().unwrap_or_default();
        let reply = self.engine.respond(&utterance, &user, &mut self.dice)?;
        if !reply.contains(DISCONNECTION_MARKER) {
            self.record(Speaker::User, &utterance);
            self.record(Speaker::Agent, &reply);
        }
        Ok(reply)
    }

    /// The current user's transcript, one `"<speaker>: <message>"` per line.
    pub fn render_history(&self) -> String {
        match self.current_user() {
            Some(user) => self.store.render_history(user),
            None => NO_SESSION_NOTICE.to_string(),
        }
    }

    pub fn delete_user_history(&self, user_name: &str) -> Result<DeleteOutcome, CoreError> {
        self.store.delete_user_history(user_name.trim())
    }

    fn disconnection_notice(&self) -> String {
        format!(
            "{}: {DISCONNECTION_MARKER}. Please try again later.",
            self.selected_agent
        )
    }

    fn record(&self, speaker: Speaker, message: &str) {
        self.store.record_exchange(
            self.current_user.as_deref(),
            &self.selected_agent,
            speaker,
            message,
        );
    }

    fn pause(&mut self) {
        let pacing = self.settings.reply_delay;
        if pacing.is_instant() {
            return;
        }
        let delay = pacing.clamp(self.dice.delay_ms(pacing.range_ms()));
        thread::sleep(delay);
    }
}

/// User-facing text for the outcome of [`ChatSession::delete_user_history`].
pub fn deletion_message(user: &str, result: &Result<DeleteOutcome, CoreError>) -> String {
    match result {
        Ok(DeleteOutcome::Deleted) => format!("Chat history for {user} has been deleted."),
        Ok(DeleteOutcome::NotFound) => format!("No chat history found for {user}."),
        Err(_) => format!(
            "An error occurred while deleting chat history for {user}. Please try again later."
        ),
    }
}

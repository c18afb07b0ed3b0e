//! Rule-based response engine and conversation sessions for Chatline.
//!
//! # Example
//! ```no_run
//! use chatline_core::config::{load_rules, ChatSettings};
//! use chatline_engine::ChatSession;
//!
//! let rules = load_rules(std::path::Path::new("config.json")).unwrap();
//! let mut chat = ChatSession::new(rules, ChatSettings::default()).unwrap();
//! println!("{}", chat.start("Ada").unwrap());
//! println!("{}", chat.turn("Where is the library?").unwrap());
//! println!("{}", chat.turn("bye").unwrap());
//! println!("{}", chat.render_history());
//! ```

pub mod dice;
mod response;
mod session;

#[cfg(test)]
mod fixtures;

pub use dice::{Dice, RngDice, ScriptedDice};
pub use response::ResponseEngine;
pub use session::{deletion_message, ChatError, ChatSession, SessionState};

// Re-export core types that engine users may need
pub use chatline_core::config::{ChatSettings, Pacing};
pub use chatline_core::model::{RuleTable, TranscriptEntry};
pub use chatline_core::storage::{DeleteOutcome, HistoryStore};

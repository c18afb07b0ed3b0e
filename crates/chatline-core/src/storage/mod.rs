pub mod history;
pub mod json_file;

pub use history::{DeleteOutcome, HistoryStore, DISCONNECTION_MARKER, NO_HISTORY};

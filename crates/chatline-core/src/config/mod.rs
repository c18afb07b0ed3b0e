pub mod loader;
pub mod settings;

pub use loader::{load_rules, parse_rules};
pub use settings::{ChatSettings, Pacing};

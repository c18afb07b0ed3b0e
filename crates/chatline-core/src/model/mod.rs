pub mod rules;
pub mod transcript;

pub use rules::{PhraseRule, RuleTable, TopicRules};
pub use transcript::{Speaker, TranscriptEntry};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid user name for storage: {0:?}")]
    InvalidUser(String),
}

/// Problems with the loaded rule table. Fatal at construction, or when a
/// rule selected at runtime has nothing to say.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No agent names found in the configuration")]
    NoAgents,

    #[error("Response list `{path}` is empty")]
    EmptyReplies { path: String },

    #[error("Response list `{path}` is not configured")]
    MissingTopic { path: String },

    #[error("No random responses configured for the fallback reply")]
    NoFallbackReplies,

    #[error("Phrase `{phrase}` cannot be matched: {reason}")]
    InvalidPhrase { phrase: String, reason: String },
}

use std::fs;
use std::path::Path;

use tracing::{debug, error};

use crate::error::{ConfigError, CoreError};
use crate::model::rules::RawConfig;
use crate::model::RuleTable;

/// Parse a configuration document. Missing keys take their defaults.
pub fn parse_rules(json: &str) -> Result<RuleTable, CoreError> {
    let raw: RawConfig = serde_json::from_str(json)?;
    Ok(raw.into())
}

/// Load and validate the rule table from a JSON file.
///
/// An unreadable or malformed file is logged and treated as an empty table,
/// which then fails validation because it names no agents.
pub fn load_rules(path: &Path) -> Result<RuleTable, ConfigError> {
    let table = match fs::read_to_string(path)
        .map_err(CoreError::from)
        .and_then(|json| parse_rules(&json))
    {
        Ok(table) => {
            debug!(
                path = %path.display(),
                agents = table.agent_names.len(),
                phrases = table.multi_word_rules.len(),
                topics = table.keyword_rules.len(),
                "Configuration loaded"
            );
            table
        }
        Err(e) => {
            error!("Error while loading the config {}: {e}", path.display());
            RuleTable::default()
        }
    };
    table.validate()?;
    Ok(table)
}

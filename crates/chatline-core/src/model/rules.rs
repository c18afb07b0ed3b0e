use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Exit commands used when the configuration does not name any.
pub const DEFAULT_EXIT_COMMANDS: &[&str] = &["bye", "exit", "quit"];

/// Reply lists for one keyword topic.
///
/// `general` and `directions` are the common lists; any other list-valued
/// key (e.g. `python` under `programming`) is a subtopic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicRules {
    #[serde(default)]
    pub general: Vec<String>,
    #[serde(default)]
    pub directions: Vec<String>,
    #[serde(flatten)]
    pub subtopics: BTreeMap<String, Vec<String>>,
}

/// Which list of a topic a keyword rule draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicList<'a> {
    General,
    Directions,
    Subtopic(&'a str),
}

impl fmt::Display for TopicList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicList::General => f.write_str("general"),
            TopicList::Directions => f.write_str("directions"),
            TopicList::Subtopic(name) => f.write_str(name),
        }
    }
}

/// A multi-word phrase and the reply it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseRule {
    pub phrase: String,
    pub reply: String,
}

/// The loaded knowledge base. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    pub keyword_rules: BTreeMap<String, TopicRules>,
    /// Kept in the order the configuration defines them; the first match wins.
    pub multi_word_rules: Vec<PhraseRule>,
    pub random_replies: Vec<String>,
    pub exit_commands: BTreeSet<String>,
    pub agent_names: Vec<String>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            keyword_rules: BTreeMap::new(),
            multi_word_rules: Vec::new(),
            random_replies: Vec::new(),
            exit_commands: DEFAULT_EXIT_COMMANDS.iter().map(|c| c.to_string()).collect(),
            agent_names: Vec::new(),
        }
    }
}

impl RuleTable {
    /// Check the table can back an engine: at least one agent name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent_names.is_empty() {
            return Err(ConfigError::NoAgents);
        }
        Ok(())
    }

    pub fn is_exit_command(&self, normalized: &str) -> bool {
        self.exit_commands.contains(normalized)
    }

    /// Look up a non-empty reply list, e.g. `cafe` / `directions`.
    pub fn topic_replies(
        &self,
        topic: &str,
        list: TopicList<'_>,
    ) -> Result<&[String], ConfigError> {
        let path = format!("keywords.{topic}.{list}");
        let rules = self
            .keyword_rules
            .get(topic)
            .ok_or_else(|| ConfigError::MissingTopic { path: path.clone() })?;
        let replies = match list {
            TopicList::General => &rules.general,
            TopicList::Directions => &rules.directions,
            TopicList::Subtopic(name) => rules
                .subtopics
                .get(name)
                .ok_or_else(|| ConfigError::MissingTopic { path: path.clone() })?,
        };
        if replies.is_empty() {
            return Err(ConfigError::EmptyReplies { path });
        }
        Ok(replies)
    }

    /// Fallback templates; empty is an error once a fallback is needed.
    pub fn fallback_replies(&self) -> Result<&[String], ConfigError> {
        if self.random_replies.is_empty() {
            return Err(ConfigError::NoFallbackReplies);
        }
        Ok(&self.random_replies)
    }
}

/// On-disk shape of the configuration document.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawConfig {
    #[serde(default)]
    agents: Vec<String>,
    #[serde(default)]
    responses: RawResponses,
    #[serde(default)]
    exit_commands: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawResponses {
    #[serde(default)]
    keywords: BTreeMap<String, TopicRules>,
    #[serde(default, deserialize_with = "phrases_in_document_order")]
    multi_word_responses: Vec<PhraseRule>,
    #[serde(default)]
    random_responses: Vec<String>,
}

impl From<RawConfig> for RuleTable {
    fn from(raw: RawConfig) -> Self {
        let exit_commands = match raw.exit_commands {
            Some(commands) => commands.iter().map(|c| normalize(c)).collect(),
            None => DEFAULT_EXIT_COMMANDS.iter().map(|c| c.to_string()).collect(),
        };
        let multi_word_rules = raw
            .responses
            .multi_word_responses
            .into_iter()
            .map(|rule| PhraseRule {
                phrase: normalize(&rule.phrase),
                reply: rule.reply,
            })
            .filter(|rule| !rule.phrase.is_empty())
            .collect();
        Self {
            keyword_rules: raw.responses.keywords,
            multi_word_rules,
            random_replies: raw.responses.random_responses,
            exit_commands,
            agent_names: raw
                .agents
                .into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
        }
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Read a JSON object into `(phrase, reply)` pairs without losing key order.
fn phrases_in_document_order<'de, D>(deserializer: D) -> Result<Vec<PhraseRule>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PhraseVisitor;

    impl<'de> Visitor<'de> for PhraseVisitor {
        type Value = Vec<PhraseRule>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object mapping phrases to replies")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut rules = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((phrase, reply)) = map.next_entry::<String, String>()? {
                rules.push(PhraseRule { phrase, reply });
            }
            Ok(rules)
        }
    }

    deserializer.deserialize_map(PhraseVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RuleTable {
        let raw: RawConfig = serde_json::from_str(
            r#"{
                "agents": ["Max"],
                "responses": {
                    "keywords": {
                        "cafe": {"general": ["Coffee is on the ground floor."], "directions": []},
                        "programming": {"general": ["Code away!"], "python": ["Try pytest."]}
                    },
                    "multi_word_responses": {
                        "Opening Hours": "We open at nine.",
                        "exam timetable": "Check the portal."
                    }
                },
                "exit_commands": ["Bye", " ciao "]
            }"#,
        )
        .unwrap();
        raw.into()
    }

    #[test]
    fn test_phrases_keep_document_order_and_are_normalized() {
        let rules = table();
        let phrases: Vec<_> = rules.multi_word_rules.iter().map(|r| r.phrase.as_str()).collect();
        assert_eq!(phrases, vec!["opening hours", "exam timetable"]);
        assert_eq!(rules.multi_word_rules[0].reply, "We open at nine.");
    }

    #[test]
    fn test_subtopics_are_flattened_into_topic() {
        let rules = table();
        let programming = &rules.keyword_rules["programming"];
        assert_eq!(programming.general, vec!["Code away!"]);
        assert_eq!(programming.subtopics["python"], vec!["Try pytest."]);
        assert!(programming.directions.is_empty());
    }

    #[test]
    fn test_exit_commands_normalized() {
        let rules = table();
        assert!(rules.is_exit_command("bye"));
        assert!(rules.is_exit_command("ciao"));
        assert!(!rules.is_exit_command("quit"));
    }

    #[test]
    fn test_missing_keys_default() {
        let raw: RawConfig = serde_json::from_str(r#"{"agents": ["Max"]}"#).unwrap();
        let rules = RuleTable::from(raw);
        assert!(rules.keyword_rules.is_empty());
        assert!(rules.multi_word_rules.is_empty());
        assert!(rules.random_replies.is_empty());
        assert_eq!(rules.exit_commands.len(), 3);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_agents() {
        assert_eq!(RuleTable::default().validate(), Err(ConfigError::NoAgents));
    }

    #[test]
    fn test_topic_replies_errors() {
        let rules = table();
        assert!(rules.topic_replies("cafe", TopicList::General).is_ok());
        assert_eq!(
            rules.topic_replies("cafe", TopicList::Directions),
            Err(ConfigError::EmptyReplies {
                path: "keywords.cafe.directions".into()
            })
        );
        assert_eq!(
            rules.topic_replies("library", TopicList::General),
            Err(ConfigError::MissingTopic {
                path: "keywords.library.general".into()
            })
        );
        assert_eq!(
            rules.topic_replies("programming", TopicList::Subtopic("java")),
            Err(ConfigError::MissingTopic {
                path: "keywords.programming.java".into()
            })
        );
        assert_eq!(rules.fallback_replies(), Err(ConfigError::NoFallbackReplies));
    }
}

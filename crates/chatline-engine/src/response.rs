use chatline_core::model::rules::TopicList;
use chatline_core::model::RuleTable;
use chatline_core::ConfigError;
use regex::Regex;
use tracing::debug;

use crate::dice::{choose, Dice};

/// How a matched keyword produces its line.
#[derive(Debug, Clone, Copy)]
enum KeywordReply {
    Greeting,
    WellBeing,
    /// Draws from `directions` when the utterance mentions a direction.
    Place(&'static str),
    General(&'static str),
    Subtopic(&'static str, &'static str),
}

#[derive(Debug, Clone, Copy)]
struct KeywordRule {
    triggers: &'static [&'static str],
    reply: KeywordReply,
}

/// Evaluated in order; every rule whose trigger appears contributes a line.
const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        triggers: &["hello", "hi"],
        reply: KeywordReply::Greeting,
    },
    KeywordRule {
        triggers: &["how are you"],
        reply: KeywordReply::WellBeing,
    },
    KeywordRule {
        triggers: &["cafe"],
        reply: KeywordReply::Place("cafe"),
    },
    KeywordRule {
        triggers: &["library"],
        reply: KeywordReply::Place("library"),
    },
    KeywordRule {
        triggers: &["book"],
        reply: KeywordReply::General("book"),
    },
    KeywordRule {
        triggers: &["study"],
        reply: KeywordReply::General("study"),
    },
    KeywordRule {
        triggers: &["programming"],
        reply: KeywordReply::General("programming"),
    },
    KeywordRule {
        triggers: &["python"],
        reply: KeywordReply::Subtopic("programming", "python"),
    },
    KeywordRule {
        triggers: &["javascript"],
        reply: KeywordReply::Subtopic("programming", "javascript"),
    },
    KeywordRule {
        triggers: &["java"],
        reply: KeywordReply::Subtopic("programming", "java"),
    },
    KeywordRule {
        triggers: &["c++"],
        reply: KeywordReply::Subtopic("programming", "c++"),
    },
];

const DIRECTION_CUE: &str = "direction";
const USERNAME_PLACEHOLDER: &str = "{username}";

#[derive(Debug, Clone)]
struct PhraseMatcher {
    pattern: Regex,
    reply: String,
}

/// Turns a single utterance into a reply using the rule table.
///
/// Multi-word phrases are tried first, in configuration order, and the
/// first word-bounded match is the whole reply. Otherwise every matching
/// keyword adds a line; with no line at all a fallback template is used.
#[derive(Debug, Clone)]
pub struct ResponseEngine {
    rules: RuleTable,
    phrases: Vec<PhraseMatcher>,
}

impl ResponseEngine {
    pub fn new(rules: RuleTable) -> Result<Self, ConfigError> {
        let phrases = rules
            .multi_word_rules
            .iter()
            .map(|rule| {
                let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&rule.phrase)))
                    .map_err(|e| ConfigError::InvalidPhrase {
                        phrase: rule.phrase.clone(),
                        reason: e.to_string(),
                    })?;
                Ok(PhraseMatcher {
                    pattern,
                    reply: rule.reply.clone(),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { rules, phrases })
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Produce the reply for `utterance` addressed to `user`.
    ///
    /// A keyword whose reply list is missing or empty is a configuration
    /// error, as is needing a fallback when none are configured.
    pub fn respond(
        &self,
        utterance: &str,
        user: &str,
        dice: &mut dyn Dice,
    ) -> Result<String, ConfigError> {
        let utterance = utterance.trim().to_lowercase();

        if let Some(reply) = self.match_phrase(&utterance) {
            debug!("Multi-word phrase matched");
            return Ok(reply.to_string());
        }

        let lines = self.keyword_lines(&utterance, user, dice)?;
        if !lines.is_empty() {
            debug!(lines = lines.len(), "Keywords matched");
            return Ok(lines.join("\n"));
        }

        let templates = self.rules.fallback_replies()?;
        let template = choose(dice, templates).ok_or(ConfigError::NoFallbackReplies)?;
        Ok(template.replace(USERNAME_PLACEHOLDER, user))
    }

    fn match_phrase(&self, utterance: &str) -> Option<&str> {
        self.phrases
            .iter()
            .find(|p| p.pattern.is_match(utterance))
            .map(|p| p.reply.as_str())
    }

    fn keyword_lines(
        &self,
        utterance: &str,
        user: &str,
        dice: &mut dyn Dice,
    ) -> Result<Vec<String>, ConfigError> {
        let mut lines = Vec::new();
        for rule in KEYWORD_RULES {
            if !rule.triggers.iter().any(|t| utterance.contains(t)) {
                continue;
            }
            let line = match rule.reply {
                KeywordReply::Greeting => format!("Hello, {user}! How can I assist you today?"),
                KeywordReply::WellBeing => format!("I'm doing well, {user}. How about you?"),
                KeywordReply::Place(topic) => {
                    let list = if utterance.contains(DIRECTION_CUE) {
                        TopicList::Directions
                    } else {
                        TopicList::General
                    };
                    self.pick(topic, list, dice)?
                }
                KeywordReply::General(topic) => self.pick(topic, TopicList::General, dice)?,
                KeywordReply::Subtopic(topic, name) => {
                    self.pick(topic, TopicList::Subtopic(name), dice)?
                }
            };
            lines.push(line);
        }
        Ok(lines)
    }

    fn pick(
        &self,
        topic: &str,
        list: TopicList<'_>,
        dice: &mut dyn Dice,
    ) -> Result<String, ConfigError> {
        let replies = self.rules.topic_replies(topic, list)?;
        choose(dice, replies)
            .cloned()
            .ok_or_else(|| ConfigError::EmptyReplies {
                path: format!("keywords.{topic}.{list}"),
            })
    }
}

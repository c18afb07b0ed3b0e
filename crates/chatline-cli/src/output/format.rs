use chatline_core::model::{RuleTable, TranscriptEntry};
use serde_json::json;

use super::OutputFormat;

pub fn format_history_json(entries: &[TranscriptEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}

pub fn format_rules_summary(rules: &RuleTable, fmt: OutputFormat) -> serde_json::Result<String> {
    match fmt {
        OutputFormat::Json => {
            let summary = json!({
                "agents": rules.agent_names,
                "exit_commands": rules.exit_commands,
                "topics": rules.keyword_rules.keys().collect::<Vec<_>>(),
                "phrases": rules.multi_word_rules,
                "random_responses": rules.random_replies.len(),
            });
            let mut out = serde_json::to_string_pretty(&summary)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Text => Ok(format_rules_summary_text(rules)),
    }
}

fn format_rules_summary_text(rules: &RuleTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("Agents: {}\n", rules.agent_names.join(", ")));
    out.push_str(&format!(
        "Exit commands: {}\n",
        rules
            .exit_commands
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    ));

    out.push_str(&format!("\n--- Topics ({}) ---\n", rules.keyword_rules.len()));
    for (topic, lists) in &rules.keyword_rules {
        out.push_str(&format!(
            "  {topic}: {} general, {} directions",
            lists.general.len(),
            lists.directions.len()
        ));
        for (name, replies) in &lists.subtopics {
            out.push_str(&format!(", {} {name}", replies.len()));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "\n--- Phrases ({}) ---\n",
        rules.multi_word_rules.len()
    ));
    for rule in &rules.multi_word_rules {
        out.push_str(&format!("  \"{}\"\n", rule.phrase));
    }

    out.push_str(&format!(
        "\nFallback replies: {}\n",
        rules.random_replies.len()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_core::config::parse_rules;

    #[test]
    fn test_history_json() {
        let entries = vec![
            TranscriptEntry::new("Ada", "hello"),
            TranscriptEntry::new("Max", "Hi Ada"),
        ];
        let json = format_history_json(&entries).unwrap();
        assert!(json.contains("\"speaker\": \"Max\""));
        assert_eq!(format_history_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_rules_summary() {
        let rules = parse_rules(
            r#"{"agents": ["Max", "Zoe"],
                "responses": {
                    "keywords": {"programming": {"general": ["a"], "python": ["b", "c"]}},
                    "multi_word_responses": {"opening hours": "9 to 5"}
                }}"#,
        )
        .unwrap();
        let text = format_rules_summary(&rules, OutputFormat::Text).unwrap();
        assert!(text.contains("Agents: Max, Zoe"));
        assert!(text.contains("Exit commands: bye, exit, quit"));
        assert!(text.contains("programming: 1 general, 0 directions, 2 python"));
        assert!(text.contains("\"opening hours\""));

        let json = format_rules_summary(&rules, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(json["agents"][1], "Zoe");
        assert_eq!(json["phrases"][0]["reply"], "9 to 5");
    }
}

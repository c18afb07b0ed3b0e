use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"{
    "agents": ["Max"],
    "responses": {
        "keywords": {
            "cafe": {
                "general": ["The cafe serves soup on Fridays."],
                "directions": ["The cafe is next to the main hall."]
            }
        },
        "multi_word_responses": {"opening hours": "We are open from 8am to 10pm."},
        "random_responses": ["Tell me more, {username}."]
    },
    "exit_commands": ["bye", "exit", "quit"]
}"#;

fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.json"), CONFIG).unwrap();
    tmp
}

fn chatline(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("chatline").unwrap();
    cmd.env_remove("CHATLINE_CONFIG")
        .env_remove("CHATLINE_DATA_DIR")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(dir.join("config.json"))
        .arg("--data-dir")
        .arg(dir);
    cmd
}

#[test]
fn chat_records_a_full_conversation() {
    let tmp = workspace();
    chatline(tmp.path())
        .args(["chat", "--user", "Ada", "--no-delay", "--disconnect-probability", "0"])
        .write_stdin("what are your opening hours?\ncafe directions please\nbye\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello Ada! Chat with Max. Type 'bye' to exit."))
        .stdout(predicate::str::contains("Max: We are open from 8am to 10pm."))
        .stdout(predicate::str::contains("Max: The cafe is next to the main hall."))
        .stdout(predicate::str::contains("Max: Goodbye Ada!"));

    let user_log = fs::read_to_string(tmp.path().join("chat_histories/Ada_history.json")).unwrap();
    assert!(user_log.contains("cafe directions please"));
    let greeting: serde_json::Value = serde_json::from_str(&user_log).unwrap();
    assert_eq!(greeting[0]["speaker"], "Max");
    assert_eq!(greeting[0]["message"], "Hello Ada! Chat with Max. Type 'bye' to exit.");

    let global: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("history.json")).unwrap())
            .unwrap();
    assert_eq!(global.as_array().unwrap().len(), 7);
}

#[test]
fn history_lists_entries_then_reports_empty_after_delete() {
    let tmp = workspace();
    chatline(tmp.path())
        .args(["chat", "--user", "Ada", "--no-delay", "--disconnect-probability", "0"])
        .write_stdin("zzz\n")
        .assert()
        .success();

    chatline(tmp.path())
        .args(["history", "--user", "Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada: zzz"))
        .stdout(predicate::str::contains("Max: Tell me more, Ada."));

    chatline(tmp.path())
        .args(["delete", "--user", "Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chat history for Ada has been deleted."));

    chatline(tmp.path())
        .args(["history", "--user", "Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No previous chat history found."));

    chatline(tmp.path())
        .args(["delete", "--user", "Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No chat history found for Ada."));
}

#[test]
fn history_json_output() {
    let tmp = workspace();
    fs::create_dir_all(tmp.path().join("chat_histories")).unwrap();
    fs::write(
        tmp.path().join("chat_histories/Ada_history.json"),
        r#"[{"speaker": "Ada", "message": "hi"}]"#,
    )
    .unwrap();

    chatline(tmp.path())
        .args(["--format", "json", "history", "--user", "Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"message\": \"hi\""));
}

#[test]
fn corrupt_history_reads_as_empty() {
    let tmp = workspace();
    fs::create_dir_all(tmp.path().join("chat_histories")).unwrap();
    fs::write(tmp.path().join("chat_histories/Ada_history.json"), "{\"not\": \"a list\"}").unwrap();

    chatline(tmp.path())
        .args(["history", "--user", "Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No previous chat history found."));
}

#[test]
fn agents_lists_configuration() {
    let tmp = workspace();
    chatline(tmp.path())
        .arg("agents")
        .assert()
        .success()
        .stdout(predicate::str::contains("Agents: Max"))
        .stdout(predicate::str::contains("\"opening hours\""));
}

#[test]
fn missing_agents_is_fatal() {
    let tmp = workspace();
    fs::write(tmp.path().join("config.json"), r#"{"responses": {}}"#).unwrap();
    chatline(tmp.path())
        .args(["chat", "--user", "Ada"])
        .write_stdin("bye\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No agent names found"));
}

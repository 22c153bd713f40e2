//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizadapt() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("quizadapt").unwrap()
}

/// A command isolated from any config on the host, storing into `dir`.
fn isolated(dir: &Path) -> Command {
    let mut cmd = quizadapt();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("QUIZADAPT_STORE_PATH", dir.join("perf.json"));
    cmd
}

fn stdout_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout is JSON")
}

#[test]
fn evaluate_fast_correct_answer() {
    quizadapt()
        .args(["evaluate", "--user-answer", "A", "--correct-answer", "A"])
        .args(["--time-taken", "30", "--confidence", "0.9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score:    16"))
        .stdout(predicate::str::contains("fast-correct"))
        .stdout(predicate::str::contains("Excellent!"));
}

#[test]
fn evaluate_json_output() {
    let output = quizadapt()
        .args(["evaluate", "--user-answer", "B", "--correct-answer", "A"])
        .args(["--time-taken", "90", "--confidence", "0.9", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output.stdout);
    assert_eq!(json["is_correct"], false);
    assert_eq!(json["score"], 3);
    assert_eq!(json["category"], "confident-incorrect");
}

#[test]
fn evaluate_requires_answers() {
    quizadapt()
        .args(["evaluate", "--user-answer", "A"])
        .assert()
        .failure();
}

#[test]
fn submit_then_analytics_persists() {
    let dir = TempDir::new().unwrap();

    isolated(dir.path())
        .args(["submit", "--user", "alice", "--user-answer", "A"])
        .args(["--correct-answer", "A", "--time-taken", "30", "--confidence", "0.9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score:      16"))
        .stdout(predicate::str::contains("Beginner -> Intermediate"));

    assert!(dir.path().join("perf.json").exists());

    let output = isolated(dir.path())
        .args(["analytics", "--user", "alice", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output.stdout);
    assert_eq!(json["total_attempts"], 1);
    assert_eq!(json["improvement_trend"], "stable");
}

#[test]
fn analytics_for_unknown_user() {
    let dir = TempDir::new().unwrap();
    isolated(dir.path())
        .args(["analytics", "--user", "nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No answers recorded for nobody"));
}

#[test]
fn questions_keep_base_for_new_user() {
    let dir = TempDir::new().unwrap();
    let output = isolated(dir.path())
        .args(["questions", "--user", "bob", "--topic", "7", "--base", "advanced"])
        .args(["--count", "2", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output.stdout);
    let slots = json.as_array().unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["id"], "q_7_1");
    assert_eq!(slots[1]["id"], "q_7_2");
    assert_eq!(slots[0]["difficulty_level"], 3);
    assert_eq!(slots[0]["difficulty_text"], "Advanced");
}

#[test]
fn questions_reject_unknown_base() {
    let dir = TempDir::new().unwrap();
    isolated(dir.path())
        .args(["questions", "--user", "bob", "--topic", "1", "--base", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown difficulty"));
}

#[test]
fn teach_back_from_argument() {
    quizadapt()
        .args(["teach-back", "--topic", "recursion"])
        .args(["--explanation", "A concept with an example."])
        .assert()
        .success()
        .stdout(predicate::str::contains("recursion is quite brief"))
        .stdout(predicate::str::contains("concept, example"));
}

#[test]
fn teach_back_from_stdin() {
    let output = quizadapt()
        .args(["teach-back", "--topic", "sorting", "--format", "json"])
        .write_stdin("x".repeat(120))
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output.stdout);
    assert_eq!(json["correctness"], 1.0);
}

#[test]
fn teach_back_counts_whitespace_in_length() {
    // 48 letters plus two spaces reaches the 50-character threshold
    let explanation = format!("{}  ", "a".repeat(48));
    quizadapt()
        .args(["teach-back", "--topic", "graphs", "--explanation"])
        .arg(&explanation)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nice explanation of graphs"))
        .stdout(predicate::str::contains("Correctness: 0.50"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    quizadapt()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizadapt.toml"));

    let content = std::fs::read_to_string(dir.path().join("quizadapt.toml")).unwrap();
    assert!(content.contains("type = \"json\""));

    quizadapt()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn replay_answer_log() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("memory.toml");
    std::fs::write(&config, "[store]\ntype = \"memory\"\n").unwrap();
    let log = dir.path().join("answers.jsonl");
    std::fs::write(
        &log,
        concat!(
            r#"{"user_id": "a", "user_answer": "x", "correct_answer": "x", "time_taken": 20, "confidence": 0.9}"#,
            "\n",
            r#"{"user_id": "b", "user_answer": "y", "correct_answer": "x", "time_taken": 250, "confidence": 0.2}"#,
            "\n",
            r#"{"user_id": "a", "user_answer": "x", "correct_answer": "x", "time_taken": 25, "confidence": 0.8}"#,
            "\n",
        ),
    )
    .unwrap();

    let output = quizadapt()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("QUIZADAPT_STORE_PATH")
        .arg("--config")
        .arg(&config)
        .arg("replay")
        .arg("--input")
        .arg(&log)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output.stdout);
    assert_eq!(json["total_answers"], 3);
    let users = json["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["user_id"], "a");
    assert_eq!(users[0]["answers"], 2);
    assert_eq!(users[0]["correct"], 2);
    assert_eq!(users[1]["user_id"], "b");
    assert_eq!(users[1]["correct"], 0);
    assert_eq!(users[1]["final_difficulty"], 1);
}

#[test]
fn replay_rejects_malformed_log() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("answers.jsonl");
    std::fs::write(&log, "{ broken\n").unwrap();

    isolated(dir.path())
        .arg("replay")
        .arg("--input")
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn missing_config_file_fails() {
    quizadapt()
        .args(["analytics", "--user", "x", "--config", "/nonexistent/quizadapt.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("embank-tests")
        .join(format!("{}-{}", prefix, nonce));
    std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}

fn write_script(dir: &std::path::Path, contents: &str) -> PathBuf {
    let path = dir.join("script.yaml");
    std::fs::write(&path, contents).expect("Failed to write script");
    path
}

#[test]
fn test_cli_test_mode_outputs() {
    let dir = temp_dir("outputs");
    let script = write_script(
        &dir,
        r#"
schema_version: "1.0"
inputs:
  lines: ["N", "alice", "secret1", "secret1", "D", "100", "W", "40", "B", "Q"]
limits:
  max_steps: 100
assertions:
  - uart_contains: "Balance: 60.0"
  - uart_not_contains: "Insufficient balance"
  - total_accounts: 1
  - expected_stop_reason: input_exhausted
"#,
    );
    let output_dir = dir.join("artifacts");

    let output = Command::new(env!("CARGO_BIN_EXE_embank"))
        .args([
            "test",
            "--script",
            script.to_str().unwrap(),
            "--no-uart-stdout",
            "--output-dir",
            output_dir.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());

    let uart = std::fs::read_to_string(output_dir.join("uart.log")).unwrap();
    assert!(uart.contains("New account 'alice' created."));

    let result_content = std::fs::read_to_string(output_dir.join("result.json")).unwrap();
    let result: serde_json::Value = serde_json::from_str(&result_content).unwrap();
    assert_eq!(result["status"], "pass");
    assert_eq!(result["stop_reason"], "input_exhausted");
    assert_eq!(result["total_accounts"], 1);
    assert_eq!(result["script_hash"].as_str().unwrap().len(), 64);
    assert_eq!(result["assertions"].as_array().unwrap().len(), 4);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_cli_test_mode_uses_script_config() {
    let dir = temp_dir("config");
    std::fs::write(
        dir.join("bank.yaml"),
        "schema_version: \"1.0\"\nregistry:\n  max_accounts: 1\n",
    )
    .unwrap();
    let script = write_script(
        &dir,
        r#"
schema_version: "1.0"
inputs:
  config: "bank.yaml"
  lines: ["N", "alice", "pw", "pw", "Q", "N"]
limits:
  max_steps: 100
assertions:
  - uart_contains: "The bank capacity is full."
  - total_accounts: 1
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_embank"))
        .args(["test", "--script", script.to_str().unwrap(), "--no-uart-stdout"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_cli_test_mode_control_events() {
    let dir = temp_dir("events");
    let script = write_script(
        &dir,
        r#"
schema_version: "1.0"
inputs:
  lines:
    - event: timeout
    - "N"
    - "bob"
    - event: fail
limits:
  max_steps: 100
assertions:
  - uart_contains: "Operation aborted! Please try again!"
  - total_accounts: 0
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_embank"))
        .args(["test", "--script", script.to_str().unwrap(), "--no-uart-stdout"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_cli_test_mode_max_steps_stop() {
    let dir = temp_dir("max-steps");
    let script = write_script(
        &dir,
        r#"
schema_version: "1.0"
inputs:
  lines: ["x", "x", "x", "x"]
limits:
  max_steps: 2
assertions:
  - expected_stop_reason: max_steps
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_embank"))
        .args(["test", "--script", script.to_str().unwrap(), "--no-uart-stdout"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_cli_test_mode_assertion_fail() {
    let dir = temp_dir("assert-fail");
    let script = write_script(
        &dir,
        r#"
schema_version: "1.0"
inputs:
  lines: ["E", "nobody", "nothing"]
limits:
  max_steps: 10
assertions:
  - uart_contains: "ThisTextWillNeverBeFound"
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_embank"))
        .args(["test", "--script", script.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1)); // EXIT_ASSERT_FAIL
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Invalid account name or password."));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_cli_test_mode_max_steps_guard() {
    let dir = temp_dir("guard");
    let script = write_script(
        &dir,
        r#"
schema_version: "1.0"
inputs:
  lines: []
limits:
  max_steps: 60000000
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_embank"))
        .args(["test", "--script", script.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2)); // EXIT_CONFIG_ERROR
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_cli_test_mode_bad_schema() {
    let dir = temp_dir("schema");
    let script = write_script(
        &dir,
        r#"
schema_version: "2.0"
inputs:
  lines: []
limits:
  max_steps: 10
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_embank"))
        .args(["test", "--script", script.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&dir);
}

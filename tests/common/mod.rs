use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

pub fn run_cli(stdin_json: &str) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_rulewatch"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn binary");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(stdin_json.as_bytes())
        .unwrap();

    let output = child.wait_with_output().unwrap();
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// The state directory the binary uses for markers and digest artifacts.
pub fn state_dir() -> PathBuf {
    std::env::temp_dir().join("rulewatch")
}

/// A fresh session id per test so parallel tests never share state files.
pub fn fresh_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn stop_input(session_id: &str, transcript_path: &str) -> String {
    format!(
        r#"{{
    "hook_event_name": "Stop",
    "session_id": "{session_id}",
    "transcript_path": "{transcript_path}",
    "cwd": "/tmp",
    "permission_mode": "default",
    "stop_hook_active": false
}}"#
    )
}

/// One external-user transcript line with string content.
pub fn user_line(text: &str) -> String {
    format!(
        r#"{{"type":"user","userType":"external","message":{{"role":"user","content":"{text}"}}}}"#
    )
}

/// One assistant transcript line with a single text block.
pub fn assistant_line(text: &str) -> String {
    format!(
        r#"{{"type":"assistant","message":{{"role":"assistant","content":[{{"type":"text","text":"{text}"}}]}}}}"#
    )
}

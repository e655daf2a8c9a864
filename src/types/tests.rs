use super::*;
use serde_json::json;

#[test]
fn deserialize_stop_input() {
    let input = json!({
        "hook_event_name": "Stop",
        "session_id": "sess-1",
        "transcript_path": "/tmp/t.jsonl",
        "cwd": "/tmp",
        "permission_mode": "default",
        "stop_hook_active": false
    });
    let parsed: HookInput = serde_json::from_value(input).unwrap();
    match &parsed {
        HookInput::Stop(e) => {
            assert!(!e.stop_hook_active);
            assert_eq!(e.common.session_id, "sess-1");
            assert_eq!(e.common.transcript_path, "/tmp/t.jsonl");
            assert_eq!(e.common.permission_mode, Some(PermissionMode::Default));
        }
        other => panic!("expected Stop, got {:?}", other),
    }
    assert_eq!(parsed.common().cwd, "/tmp");
}

#[test]
fn deserialize_stop_input_without_permission_mode() {
    let input = json!({
        "hook_event_name": "Stop",
        "session_id": "sess-1",
        "transcript_path": "/tmp/t.jsonl",
        "cwd": "/tmp",
        "stop_hook_active": true
    });
    let parsed: HookInput = serde_json::from_value(input).unwrap();
    match parsed {
        HookInput::Stop(e) => {
            assert!(e.stop_hook_active);
            assert!(e.common.permission_mode.is_none());
        }
        other => panic!("expected Stop, got {:?}", other),
    }
}

#[test]
fn deserialize_session_end_with_unknown_reason() {
    let input = json!({
        "hook_event_name": "SessionEnd",
        "session_id": "sess-1",
        "transcript_path": "/tmp/t.jsonl",
        "cwd": "/tmp",
        "reason": "some_future_reason"
    });
    let parsed: HookInput = serde_json::from_value(input).unwrap();
    match parsed {
        HookInput::SessionEnd(e) => assert_eq!(e.reason, SessionEndReason::Other),
        other => panic!("expected SessionEnd, got {:?}", other),
    }
}

#[test]
fn deserialize_subagent_stop_input() {
    let input = json!({
        "hook_event_name": "SubagentStop",
        "session_id": "sess-1",
        "transcript_path": "/tmp/t.jsonl",
        "cwd": "/tmp",
        "stop_hook_active": false,
        "agent_id": "agent-1",
        "agent_type": "researcher",
        "agent_transcript_path": "/tmp/sub.jsonl"
    });
    let parsed: HookInput = serde_json::from_value(input).unwrap();
    match parsed {
        HookInput::SubagentStop(e) => {
            assert_eq!(e.agent_type, "researcher");
            assert_eq!(e.agent_transcript_path, "/tmp/sub.jsonl");
        }
        other => panic!("expected SubagentStop, got {:?}", other),
    }
}

#[test]
fn unknown_event_name_fails_to_parse() {
    // main() treats this as a malformed payload and exits silently.
    let input = json!({
        "hook_event_name": "PreToolUse",
        "session_id": "sess-1",
        "transcript_path": "/tmp/t.jsonl",
        "cwd": "/tmp"
    });
    assert!(serde_json::from_value::<HookInput>(input).is_err());
}

#[test]
fn serialize_block_output() {
    let output = HookOutput::block("RULE_CHECK:/tmp/rulewatch/s.context".into());
    let json = serde_json::to_string(&output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["decision"], "block");
    assert_eq!(value["reason"], "RULE_CHECK:/tmp/rulewatch/s.context");
    // Unset fields must not serialize at all.
    assert!(value.get("suppressOutput").is_none());
}

#[test]
fn default_output_serializes_empty() {
    let output = HookOutput::default();
    assert_eq!(serde_json::to_string(&output).unwrap(), "{}");
}

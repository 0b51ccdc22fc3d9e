//! Reconciliation of live part/message events and history normalization.

use canopy_tui::model::{
    MessageInfo, MessageUpdatedEvent, PartPayload, PartUpdatedEvent, RawMessage, Role, SessionId,
};
use canopy_tui::reconcile::{
    apply_message_update, apply_part_update, normalize_history, Reconciled, Transcript,
};
use serde_json::{json, Value};

fn selected() -> SessionId {
    SessionId::new("s1")
}

fn text_delta(part: &str, message: &str, delta: &str) -> PartUpdatedEvent {
    PartUpdatedEvent {
        part: PartPayload::new(part, message, "s1").with_field("type", "text"),
        delta: Some(delta.to_string()),
    }
}

fn message_update(message: &str, role: Option<&str>) -> MessageUpdatedEvent {
    MessageUpdatedEvent {
        info: MessageInfo {
            id: message.into(),
            session_id: selected(),
            role: role.map(str::to_string),
        },
    }
}

#[test]
fn deltas_accumulate_in_arrival_order() {
    let mut transcript = Transcript::new();
    let s1 = selected();

    apply_part_update(&mut transcript, Some(&s1), &text_delta("p1", "m1", "Hel"));
    apply_part_update(&mut transcript, Some(&s1), &text_delta("p1", "m1", "lo"));

    let message = transcript.find(&"m1".into()).unwrap();
    assert_eq!(message.role, Role::Assistant);
    assert_eq!(message.parts.len(), 1);
    assert_eq!(message.parts[0].content(), Some("Hello"));
    assert_eq!(message.parts[0].version, 2);
}

#[test]
fn full_snapshot_without_delta_is_idempotent() {
    let mut transcript = Transcript::new();
    let s1 = selected();
    let snapshot = PartUpdatedEvent {
        part: PartPayload::new("p1", "m1", "s1")
            .with_field("type", "text")
            .with_field("text", "complete answer"),
        delta: None,
    };

    apply_part_update(&mut transcript, Some(&s1), &snapshot);
    let once = transcript.messages.clone();
    apply_part_update(&mut transcript, Some(&s1), &snapshot);

    assert_eq!(transcript.messages[0].parts.len(), 1);
    assert_eq!(
        transcript.messages[0].parts[0].fields,
        once[0].parts[0].fields
    );
    assert_eq!(
        transcript.messages[0].parts[0].content(),
        Some("complete answer")
    );
}

#[test]
fn reasoning_deltas_extend_text() {
    let mut transcript = Transcript::new();
    let s1 = selected();
    let first = PartUpdatedEvent {
        part: PartPayload::new("r1", "m1", "s1").with_field("type", "reasoning"),
        delta: Some("Think".into()),
    };
    let second = PartUpdatedEvent {
        delta: Some("ing".into()),
        ..first.clone()
    };

    apply_part_update(&mut transcript, Some(&s1), &first);
    apply_part_update(&mut transcript, Some(&s1), &second);

    assert_eq!(transcript.messages[0].parts[0].text(), Some("Thinking"));
}

#[test]
fn events_for_other_sessions_are_ignored() {
    let mut transcript = Transcript::new();
    let other = SessionId::new("s2");

    let outcome = apply_part_update(&mut transcript, Some(&other), &text_delta("p1", "m1", "x"));
    assert_eq!(outcome, Reconciled::Ignored);
    assert_eq!(
        apply_part_update(&mut transcript, None, &text_delta("p1", "m1", "x")),
        Reconciled::Ignored
    );
    assert!(transcript.is_empty());
    assert_eq!(transcript.version, 0);
}

#[test]
fn role_is_correct_whichever_event_arrives_first() {
    let s1 = selected();

    let mut parts_first = Transcript::new();
    apply_part_update(&mut parts_first, Some(&s1), &text_delta("p1", "m1", "hi"));
    apply_message_update(&mut parts_first, Some(&s1), &message_update("m1", Some("user")));

    let mut message_first = Transcript::new();
    apply_message_update(&mut message_first, Some(&s1), &message_update("m1", Some("user")));
    apply_part_update(&mut message_first, Some(&s1), &text_delta("p1", "m1", "hi"));

    for transcript in [&parts_first, &message_first] {
        let message = transcript.find(&"m1".into()).unwrap();
        assert_eq!(message.role, Role::User);
        assert_eq!(message.parts[0].content(), Some("hi"));
    }
}

#[test]
fn missing_role_reads_as_assistant() {
    let mut transcript = Transcript::new();
    let s1 = selected();
    apply_message_update(&mut transcript, Some(&s1), &message_update("m1", None));
    assert_eq!(transcript.messages[0].role, Role::Assistant);
}

#[test]
fn tool_state_is_replaced_wholesale() {
    let mut transcript = Transcript::new();
    let s1 = selected();
    let running = PartUpdatedEvent {
        part: PartPayload::new("t1", "m1", "s1")
            .with_field("type", "tool")
            .with_field("tool", "bash")
            .with_field("state", json!({"status": "running", "input": {"command": "ls"}})),
        delta: None,
    };
    let done = PartUpdatedEvent {
        part: PartPayload::new("t1", "m1", "s1")
            .with_field("type", "tool")
            .with_field("tool", "bash")
            .with_field("state", json!({"status": "completed", "output": "src"})),
        delta: None,
    };

    apply_part_update(&mut transcript, Some(&s1), &running);
    apply_part_update(&mut transcript, Some(&s1), &done);

    let state = transcript.messages[0].parts[0].state().unwrap();
    assert_eq!(state["status"], "completed");
    assert!(state.get("input").is_none());
}

#[test]
fn messages_keep_first_seen_order() {
    let mut transcript = Transcript::new();
    let s1 = selected();
    for (message, delta) in [("m1", "a"), ("m2", "b"), ("m1", "c")] {
        apply_part_update(&mut transcript, Some(&s1), &text_delta("p", message, delta));
    }

    let ids: Vec<&str> = transcript.messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m1", "m2"]);
    assert_eq!(transcript.messages[0].parts[0].content(), Some("ac"));
    assert_eq!(transcript.version, 3);
}

fn raw(value: Value) -> RawMessage {
    serde_json::from_value(value).unwrap()
}

#[test]
fn history_gets_positional_ids_and_content() {
    let messages = normalize_history(vec![
        raw(json!({"info": {"role": "user"}, "parts": [{"text": "question"}]})),
        raw(json!({"info": {"id": "m9"}, "parts": [
            {"id": "p9", "type": "reasoning", "text": "hmm"},
            {"type": "tool-invocation", "name": "grep", "input": {"q": "x"}}
        ]})),
    ]);

    assert_eq!(messages[0].id, "msg-0");
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].parts[0].id, "part-0-0");
    assert_eq!(messages[0].parts[0].type_tag(), Some("text"));
    assert_eq!(messages[0].parts[0].content(), Some("question"));

    assert_eq!(messages[1].id, "m9");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].parts[0].id, "p9");
    assert_eq!(messages[1].parts[1].id, "part-1-1");
    assert_eq!(
        messages[1].parts[1].str_field("formatted"),
        Some(r#"grep({"q":"x"})"#)
    );
}

#[test]
fn live_updates_match_normalized_history_ids() {
    let mut transcript = Transcript::new();
    transcript.replace(normalize_history(vec![raw(json!({
        "info": {"id": "m1", "role": "assistant"},
        "parts": [{"id": "p1", "type": "text", "text": "Hel"}]
    }))]));
    let s1 = selected();

    apply_part_update(&mut transcript, Some(&s1), &text_delta("p1", "m1", "lo"));

    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.messages[0].parts[0].content(), Some("Hello"));
}

#[test]
fn legacy_tool_call_keeps_input_key_order() {
    let messages = normalize_history(vec![raw(json!({
        "info": {"id": "m1"},
        "parts": [{"type": "tool-invocation", "name": "read", "input": {"path": "a.rs", "limit": 20}}]
    }))]);

    assert_eq!(
        messages[0].parts[0].str_field("formatted"),
        Some(r#"read({"path":"a.rs","limit":20})"#)
    );
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StreamError;
use crate::model::{MessageUpdatedEvent, PartUpdatedEvent, SessionId, SessionRecord, SessionStatus};

pub const MESSAGE_PART_UPDATED: &str = "message.part.updated";
pub const MESSAGE_UPDATED: &str = "message.updated";
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_UPDATED: &str = "session.updated";
pub const SESSION_STATUS: &str = "session.status";

/// `{type, properties}` wrapper around every live event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub properties: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionInfoEvent {
    pub info: SessionRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionStatusEvent {
    #[serde(rename = "sessionID")]
    pub session_id: SessionId,
    #[serde(default)]
    pub status: SessionStatus,
}

/// A recognized live event, decoded from its envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    PartUpdated(PartUpdatedEvent),
    MessageUpdated(MessageUpdatedEvent),
    SessionCreated(SessionRecord),
    SessionUpdated(SessionRecord),
    SessionStatus {
        session_id: SessionId,
        status: SessionStatus,
    },
}

impl StreamEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            StreamEvent::PartUpdated(_) => MESSAGE_PART_UPDATED,
            StreamEvent::MessageUpdated(_) => MESSAGE_UPDATED,
            StreamEvent::SessionCreated(_) => SESSION_CREATED,
            StreamEvent::SessionUpdated(_) => SESSION_UPDATED,
            StreamEvent::SessionStatus { .. } => SESSION_STATUS,
        }
    }
}

/// Decode one SSE payload.
///
/// # Returns
/// * `Ok(Some(event))` - one of the five handled event types
/// * `Ok(None)` - a well-formed envelope of a type this client ignores
/// * `Err(_)` - payload is not an envelope, or its properties do not match the type
pub fn decode(payload: &str) -> Result<Option<StreamEvent>, StreamError> {
    let envelope: Envelope = serde_json::from_str(payload)?;
    decode_envelope(envelope)
}

pub fn decode_envelope(envelope: Envelope) -> Result<Option<StreamEvent>, StreamError> {
    let Envelope {
        event_type,
        properties,
    } = envelope;

    let decoded = match event_type.as_str() {
        MESSAGE_PART_UPDATED => serde_json::from_value(properties).map(StreamEvent::PartUpdated),
        MESSAGE_UPDATED => serde_json::from_value(properties).map(StreamEvent::MessageUpdated),
        SESSION_CREATED => serde_json::from_value::<SessionInfoEvent>(properties)
            .map(|e| StreamEvent::SessionCreated(e.info)),
        SESSION_UPDATED => serde_json::from_value::<SessionInfoEvent>(properties)
            .map(|e| StreamEvent::SessionUpdated(e.info)),
        SESSION_STATUS => serde_json::from_value::<SessionStatusEvent>(properties).map(|e| {
            StreamEvent::SessionStatus {
                session_id: e.session_id,
                status: e.status,
            }
        }),
        _ => return Ok(None),
    };

    decoded.map(Some).map_err(|e| StreamError::Payload {
        event_type,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_is_ignored() {
        let decoded = decode(r#"{"type":"lsp.updated","properties":{}}"#).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn envelope_without_properties_still_decodes() {
        let decoded = decode(r#"{"type":"server.connected"}"#).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn not_json_is_an_error() {
        assert!(matches!(decode("nope"), Err(StreamError::Json(_))));
    }

    #[test]
    fn bad_properties_name_the_event_type() {
        let err = decode(r#"{"type":"message.updated","properties":{"info":{}}}"#).unwrap_err();
        match err {
            StreamError::Payload { event_type, .. } => assert_eq!(event_type, MESSAGE_UPDATED),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn session_status_accepts_bare_string() {
        let decoded =
            decode(r#"{"type":"session.status","properties":{"sessionID":"s1","status":"busy"}}"#)
                .unwrap()
                .unwrap();
        assert_eq!(
            decoded,
            StreamEvent::SessionStatus {
                session_id: "s1".into(),
                status: SessionStatus::Busy
            }
        );
    }

    #[test]
    fn session_created_carries_record() {
        let decoded = decode(
            r#"{"type":"session.created","properties":{"info":{"id":"c","parentID":"r","time":{"created":9}}}}"#,
        )
        .unwrap()
        .unwrap();
        match decoded {
            StreamEvent::SessionCreated(record) => {
                assert_eq!(record.effective_parent_id().unwrap(), "r");
                assert_eq!(record.time.created, 9);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn part_update_keeps_delta() {
        let decoded = decode(
            r#"{"type":"message.part.updated","properties":{"part":{"id":"p","messageID":"m","sessionID":"s","type":"text"},"delta":"Hi"}}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(decoded.event_type(), MESSAGE_PART_UPDATED);
        match decoded {
            StreamEvent::PartUpdated(event) => assert_eq!(event.delta.as_deref(), Some("Hi")),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}

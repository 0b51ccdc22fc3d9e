//! Message reconciler: merges streamed part/message events into the
//! transcript of the selected node, and normalizes fetched history.
//!
//! Every mutation bumps the `version` of each layer it touched (part,
//! message, transcript) so renderers can tell what changed.

use serde_json::Value;
use tracing::debug;

use crate::model::{
    Fields, Message, MessageId, MessageUpdatedEvent, Part, PartId, PartKind, PartUpdatedEvent,
    RawMessage, Role, SessionId,
};

/// Ordered message list of the selected node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    pub messages: Vec<Message>,
    pub version: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly loaded history wholesale.
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.version += 1;
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn find(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == *id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Outcome of applying one live event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// Event belongs to a session other than the selected node
    Ignored,
    Applied {
        message_id: MessageId,
        part_id: Option<PartId>,
    },
}

impl Reconciled {
    pub fn is_applied(&self) -> bool {
        matches!(self, Reconciled::Applied { .. })
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(_) => true,
    }
}

fn message_index(transcript: &mut Transcript, id: &MessageId, role: Role) -> usize {
    match transcript.messages.iter().position(|m| m.id == *id) {
        Some(index) => index,
        None => {
            transcript.messages.push(Message::new(id.clone(), role));
            transcript.messages.len() - 1
        }
    }
}

/// Upsert the part carried by a `message.part.updated` event.
///
/// The message is created as an assistant message on first sight. A new
/// part starts as a verbatim copy of the incoming fields. The incoming
/// fields are then overlaid on the existing ones, and:
/// - a non-empty delta on a reasoning part is appended to `text`
/// - a non-empty delta on any other part is appended to `content`
/// - otherwise `content` is seeded once from the incoming `text`
///
/// Delta accumulation is order-sensitive; deltas delivered out of order
/// produce scrambled text.
pub fn apply_part_update(
    transcript: &mut Transcript,
    selected: Option<&SessionId>,
    event: &PartUpdatedEvent,
) -> Reconciled {
    let incoming = &event.part;
    if selected != Some(&incoming.session_id) {
        return Reconciled::Ignored;
    }

    let mi = message_index(transcript, &incoming.message_id, Role::Assistant);
    let incoming_fields = incoming.to_fields();
    let message = &mut transcript.messages[mi];

    let pi = match message.parts.iter().position(|p| p.id == incoming.id) {
        Some(index) => index,
        None => {
            message
                .parts
                .push(Part::new(incoming.id.clone(), incoming_fields.clone()));
            message.parts.len() - 1
        }
    };

    let existing = &message.parts[pi];
    let mut fields = existing.fields.clone();
    for (key, value) in &incoming_fields {
        fields.insert(key.clone(), value.clone());
    }

    match event.delta.as_deref().filter(|d| !d.is_empty()) {
        Some(delta) if existing.type_tag() == Some(PartKind::Reasoning.as_str()) => {
            let text = format!("{}{}", existing.text().unwrap_or(""), delta);
            fields.insert("text".into(), Value::String(text));
        }
        Some(delta) => {
            let content = format!("{}{}", existing.content().unwrap_or(""), delta);
            fields.insert("content".into(), Value::String(content));
        }
        None => {
            let text = incoming_fields.get("text");
            if !is_truthy(existing.field("content")) && is_truthy(text) {
                if let Some(text) = text {
                    fields.insert("content".into(), text.clone());
                }
            }
        }
    }

    let version = existing.version + 1;
    message.parts[pi] = Part {
        id: incoming.id.clone(),
        fields,
        version,
    };
    message.version += 1;
    transcript.version += 1;

    Reconciled::Applied {
        message_id: incoming.message_id.clone(),
        part_id: Some(incoming.id.clone()),
    }
}

/// Upsert the message carried by a `message.updated` event. Only the role
/// is taken from the event; a missing role reads as assistant.
pub fn apply_message_update(
    transcript: &mut Transcript,
    selected: Option<&SessionId>,
    event: &MessageUpdatedEvent,
) -> Reconciled {
    let info = &event.info;
    if selected != Some(&info.session_id) {
        return Reconciled::Ignored;
    }

    let role = Role::from_wire(info.role.as_deref());
    let mi = message_index(transcript, &info.id, role);
    let message = &mut transcript.messages[mi];
    message.role = role;
    message.version += 1;
    transcript.version += 1;

    Reconciled::Applied {
        message_id: info.id.clone(),
        part_id: None,
    }
}

/// `name(<input as JSON>)` for legacy tool-invocation parts.
pub fn format_tool_call(fields: &Fields) -> String {
    let name = fields.get("name").and_then(Value::as_str).unwrap_or("");
    let input = fields
        .get("input")
        .map(Value::to_string)
        .unwrap_or_default();
    format!("{name}({input})")
}

/// Fill in `type` and `content` for a fetched part.
pub fn normalize_part(mut fields: Fields) -> Fields {
    if !is_truthy(fields.get("type")) {
        fields.insert("type".into(), Value::String(PartKind::Text.as_str().into()));
    }
    if !is_truthy(fields.get("content")) {
        match fields.get("text").cloned() {
            Some(text) => {
                fields.insert("content".into(), text);
            }
            None => {
                fields.remove("content");
            }
        }
    }
    if fields.get("type").and_then(Value::as_str) == Some(PartKind::ToolInvocation.as_str()) {
        let formatted = format_tool_call(&fields);
        fields.insert("formatted".into(), Value::String(formatted));
    }
    fields
}

fn id_field(fields: &Fields) -> Option<&str> {
    fields
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

/// Turn a fetched history into transcript messages.
///
/// Messages and parts without an id get positional ones (`msg-{m}`,
/// `part-{m}-{p}`) so later live events can still be matched by id.
pub fn normalize_history(raw: Vec<RawMessage>) -> Vec<Message> {
    raw.into_iter()
        .enumerate()
        .map(|(mi, raw)| {
            let id = id_field(&raw.info)
                .map(str::to_string)
                .unwrap_or_else(|| format!("msg-{mi}"));
            let role = Role::from_wire(raw.info.get("role").and_then(Value::as_str));
            let parts = raw
                .parts
                .into_iter()
                .enumerate()
                .map(|(pi, fields)| {
                    let mut fields = normalize_part(fields);
                    let part_id = id_field(&fields)
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("part-{mi}-{pi}"));
                    fields.insert("id".into(), Value::String(part_id.clone()));
                    Part::new(part_id, fields)
                })
                .collect::<Vec<_>>();
            debug!(message_id = %id, parts = parts.len(), "normalized history message");
            Message {
                id: MessageId::new(id),
                role,
                info: raw.info,
                parts,
                version: 0,
            }
        })
        .collect()
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::{MessageId, PartId, SessionId};

pub type Fields = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[default]
    Assistant,
}

impl Role {
    /// Anything that is not exactly `user` is rendered as the assistant.
    pub fn from_wire(role: Option<&str>) -> Self {
        match role {
            Some("user") => Role::User,
            _ => Role::Assistant,
        }
    }
}

/// Closed set of part kinds carried in the `type` discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Text,
    Tool,
    Reasoning,
    File,
    Agent,
    Subtask,
    StepStart,
    StepFinish,
    Snapshot,
    Patch,
    Retry,
    Compaction,
    /// Legacy history shape: `name` + `input`, pre-rendered into `formatted`
    ToolInvocation,
    Unknown,
}

impl PartKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => Self::Text,
            "tool" => Self::Tool,
            "reasoning" => Self::Reasoning,
            "file" => Self::File,
            "agent" => Self::Agent,
            "subtask" => Self::Subtask,
            "step-start" => Self::StepStart,
            "step-finish" => Self::StepFinish,
            "snapshot" => Self::Snapshot,
            "patch" => Self::Patch,
            "retry" => Self::Retry,
            "compaction" => Self::Compaction,
            "tool-invocation" => Self::ToolInvocation,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Tool => "tool",
            Self::Reasoning => "reasoning",
            Self::File => "file",
            Self::Agent => "agent",
            Self::Subtask => "subtask",
            Self::StepStart => "step-start",
            Self::StepFinish => "step-finish",
            Self::Snapshot => "snapshot",
            Self::Patch => "patch",
            Self::Retry => "retry",
            Self::Compaction => "compaction",
            Self::ToolInvocation => "tool-invocation",
            Self::Unknown => "unknown",
        }
    }
}

/// One fragment of a message.
///
/// The wire fields are kept verbatim so that upserts can overlay incoming
/// fields onto existing ones; typed access goes through the accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub id: PartId,
    pub fields: Fields,
    /// Bumped every time the reconciler replaces this part
    pub version: u64,
}

impl Part {
    pub fn new(id: impl Into<PartId>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
            version: 0,
        }
    }

    /// Raw `type` tag, if any
    pub fn type_tag(&self) -> Option<&str> {
        self.str_field("type")
    }

    /// A part without a `type` is treated as text.
    pub fn kind(&self) -> PartKind {
        self.type_tag().map(PartKind::from_tag).unwrap_or(PartKind::Text)
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn content(&self) -> Option<&str> {
        self.str_field("content")
    }

    pub fn text(&self) -> Option<&str> {
        self.str_field("text")
    }

    pub fn tool(&self) -> Option<&str> {
        self.str_field("tool")
    }

    /// Tool state payload, replaced wholesale on every update
    pub fn state(&self) -> Option<&Value> {
        self.fields.get("state")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    /// Remaining `info` fields from fetched history (empty for streamed messages)
    pub info: Fields,
    pub parts: Vec<Part>,
    pub version: u64,
}

impl Message {
    pub fn new(id: impl Into<MessageId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            info: Fields::new(),
            parts: Vec::new(),
            version: 0,
        }
    }

    pub fn with_parts(mut self, parts: Vec<Part>) -> Self {
        self.parts = parts;
        self
    }
}

/// `part` payload of a `message.part.updated` event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartPayload {
    pub id: PartId,
    #[serde(rename = "messageID")]
    pub message_id: MessageId,
    #[serde(rename = "sessionID")]
    pub session_id: SessionId,
    #[serde(flatten)]
    pub fields: Fields,
}

impl PartPayload {
    pub fn new(
        id: impl Into<PartId>,
        message_id: impl Into<MessageId>,
        session_id: impl Into<SessionId>,
    ) -> Self {
        Self {
            id: id.into(),
            message_id: message_id.into(),
            session_id: session_id.into(),
            fields: Fields::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Every wire field, ids included, as a single map.
    pub fn to_fields(&self) -> Fields {
        let mut fields = self.fields.clone();
        fields.insert("id".into(), Value::String(self.id.to_string()));
        fields.insert(
            "messageID".into(),
            Value::String(self.message_id.to_string()),
        );
        fields.insert(
            "sessionID".into(),
            Value::String(self.session_id.to_string()),
        );
        fields
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartUpdatedEvent {
    pub part: PartPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageInfo {
    pub id: MessageId,
    #[serde(rename = "sessionID")]
    pub session_id: SessionId,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageUpdatedEvent {
    pub info: MessageInfo,
}

/// One entry of `/session/{id}/message`. Ids may be missing on old servers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawMessage {
    #[serde(default)]
    pub info: Fields,
    #[serde(default)]
    pub parts: Vec<Fields>,
}

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use super::ids::SessionId;

/// Remote-owned session record as returned by `/session` and friends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub id: SessionId,
    #[serde(default, rename = "parentId", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<SessionId>,
    /// Legacy spelling still emitted by older servers
    #[serde(default, rename = "parentID", skip_serializing_if = "Option::is_none")]
    pub legacy_parent_id: Option<SessionId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub time: SessionTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
}

impl SessionRecord {
    pub fn new(id: impl Into<SessionId>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            legacy_parent_id: None,
            title: None,
            time: SessionTime::default(),
            status: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<SessionId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_legacy_parent(mut self, parent_id: impl Into<SessionId>) -> Self {
        self.legacy_parent_id = Some(parent_id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_created(mut self, created: i64) -> Self {
        self.time.created = created;
        self
    }

    /// `parentId` if present, else the legacy `parentID`, else none (a root).
    pub fn effective_parent_id(&self) -> Option<&SessionId> {
        self.parent_id.as_ref().or(self.legacy_parent_id.as_ref())
    }

    pub fn is_root(&self) -> bool {
        self.effective_parent_id().is_none()
    }

    /// Title, or the id when the title is missing or empty
    pub fn display_name(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => self.id.as_str(),
        }
    }
}

/// Millisecond epoch timestamps
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTime {
    #[serde(default)]
    pub created: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
}

impl SessionTime {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created)
    }
}

/// Live session status. The server sends either a bare string or an object
/// discriminated by `type`; both decode to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Busy,
    Retry {
        attempt: u32,
        message: Option<String>,
    },
    Other(String),
}

impl SessionStatus {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "idle" => Self::Idle,
            "busy" => Self::Busy,
            "retry" => Self::Retry {
                attempt: 0,
                message: None,
            },
            other => Self::Other(other.to_string()),
        }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(tag) => Some(Self::from_tag(tag)),
            Value::Object(map) => {
                let tag = map.get("type").and_then(Value::as_str)?;
                let status = match Self::from_tag(tag) {
                    Self::Retry { .. } => Self::Retry {
                        attempt: map
                            .get("attempt")
                            .and_then(Value::as_u64)
                            .and_then(|v| u32::try_from(v).ok())
                            .unwrap_or(0),
                        message: map
                            .get("message")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    },
                    other => other,
                };
                Some(status)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Idle => "idle",
            Self::Busy => "busy",
            Self::Retry { .. } => "retry",
            Self::Other(tag) => tag,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Busy | Self::Retry { .. })
    }
}

impl Serialize for SessionStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Retry { attempt, message } => json!({
                "type": "retry",
                "attempt": attempt,
                "message": message,
            })
            .serialize(serializer),
            other => serializer.serialize_str(other.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for SessionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| D::Error::custom(format!("unsupported session status: {value}")))
    }
}

//! Error types for canopy-tui
//!
//! Domain-specific error enums using thiserror. Library code never panics on
//! remote or racy data; every failure is one of these values and the
//! orchestrator folds them into the single user-visible error field.

use crate::model::SessionId;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("request to {path} failed: {message}")]
    Transport { path: String, message: String },
    #[error("{path} returned {status}: {body}")]
    Status { path: String, status: u16, body: String },
    #[error("{path} response parse: {message}")]
    Decode { path: String, message: String },
    #[error("invalid client configuration: {0}")]
    Config(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("session {0} has no parent id")]
    NoParent(SessionId),
    #[error("parent {parent_id} of session {session_id} is not in the tree")]
    ParentNotFound {
        session_id: SessionId,
        parent_id: SessionId,
    },
    #[error("session {0} is already in the tree")]
    DuplicateNode(SessionId),
    #[error("session {0} is not in the tree")]
    NodeNotFound(SessionId),
    #[error("no session tree is loaded")]
    NoTree,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum StreamError {
    #[error("JSON: {0}")]
    Json(String),
    #[error("malformed {event_type} event: {message}")]
    Payload { event_type: String, message: String },
    #[error("transport: {0}")]
    Transport(String),
    #[error("stream ended")]
    Ended,
}

impl From<serde_json::Error> for StreamError {
    fn from(e: serde_json::Error) -> Self {
        StreamError::Json(e.to_string())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error("not connected")]
    NotConnected,
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_error_display() {
        let error = ApiError::Status {
            path: "/session".to_string(),
            status: 500,
            body: "boom".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("/session"));
        assert!(display.contains("500"));
        assert!(display.contains("boom"));
    }

    #[test]
    fn tree_parent_not_found_display() {
        let error = TreeError::ParentNotFound {
            session_id: "child".into(),
            parent_id: "ghost".into(),
        };
        assert_eq!(
            error.to_string(),
            "parent ghost of session child is not in the tree"
        );
    }

    #[test]
    fn client_error_is_transparent_over_api_error() {
        let error: ClientError = ApiError::Transport {
            path: "/global/health".into(),
            message: "connection refused".into(),
        }
        .into();
        assert_eq!(
            error.to_string(),
            "request to /global/health failed: connection refused"
        );
    }

    #[test]
    fn session_not_found_matches_user_facing_wording() {
        let error = ClientError::SessionNotFound("ses_1".into());
        assert_eq!(error.to_string(), "Session ses_1 not found");
    }

    #[test]
    fn stream_error_from_serde() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let stream_err: StreamError = err.into();
        assert!(matches!(stream_err, StreamError::Json(_)));
    }
}

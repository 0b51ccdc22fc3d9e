//! Shared fixtures for integration tests: an in-memory remote and a scroll
//! surface that records every request made of it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use canopy_tui::api::{Capabilities, PromptOptions, RemoteSource};
use canopy_tui::app::ScrollSurface;
use canopy_tui::error::{ApiError, StreamError};
use canopy_tui::model::{
    AgentInfo, Health, ProviderCatalog, RawMessage, RemoteConfig, SessionId, SessionRecord,
};
use canopy_tui::stream::PayloadStream;
use futures::StreamExt;
use serde_json::Value;

/// Canned answers for [`FakeRemote`]
#[derive(Debug, Clone, Default)]
pub struct FakeData {
    pub capabilities: Capabilities,
    pub version: Option<String>,
    pub sessions: Vec<SessionRecord>,
    pub children: HashMap<String, Vec<SessionRecord>>,
    pub messages: HashMap<String, Vec<RawMessage>>,
    pub providers: ProviderCatalog,
    pub config: RemoteConfig,
    pub agents: Vec<AgentInfo>,
    /// SSE payloads handed out by `open_events`
    pub payloads: Vec<String>,
    /// Paths that should fail with a status error
    pub failing: Vec<&'static str>,
}

/// A sent prompt, as the remote saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPrompt {
    pub session_id: String,
    pub text: String,
    pub options: PromptOptions,
}

#[derive(Debug, Default)]
pub struct FakeRemote {
    pub data: Mutex<FakeData>,
    pub calls: Mutex<Vec<String>>,
    pub prompts: Mutex<Vec<SentPrompt>>,
    pub aborted: Mutex<Vec<String>>,
}

impl FakeRemote {
    pub fn new(data: FakeData) -> Arc<Self> {
        Arc::new(Self {
            data: Mutex::new(data),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, path: impl Into<String>) -> Result<(), ApiError> {
        let path = path.into();
        self.calls.lock().unwrap().push(path.clone());
        let failing = self
            .data
            .lock()
            .unwrap()
            .failing
            .iter()
            .any(|f| *f == path);
        if failing {
            return Err(ApiError::Status {
                path,
                status: 500,
                body: "boom".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteSource for FakeRemote {
    fn capabilities(&self) -> Capabilities {
        self.data.lock().unwrap().capabilities
    }

    async fn fetch_health(&self) -> Result<Health, ApiError> {
        self.record("/global/health")?;
        Ok(Health {
            version: self.data.lock().unwrap().version.clone(),
        })
    }

    async fn fetch_sessions(&self) -> Result<Vec<SessionRecord>, ApiError> {
        self.record("/session")?;
        Ok(self.data.lock().unwrap().sessions.clone())
    }

    async fn fetch_session_children(
        &self,
        id: &SessionId,
    ) -> Result<Vec<SessionRecord>, ApiError> {
        self.record(format!("/session/{id}/children"))?;
        Ok(self
            .data
            .lock()
            .unwrap()
            .children
            .get(id.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_messages(&self, id: &SessionId) -> Result<Vec<RawMessage>, ApiError> {
        self.record(format!("/session/{id}/message"))?;
        Ok(self
            .data
            .lock()
            .unwrap()
            .messages
            .get(id.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_providers(&self) -> Result<ProviderCatalog, ApiError> {
        self.record("/provider")?;
        Ok(self.data.lock().unwrap().providers.clone())
    }

    async fn fetch_config(&self) -> Result<RemoteConfig, ApiError> {
        self.record("/config")?;
        Ok(self.data.lock().unwrap().config.clone())
    }

    async fn fetch_agents(&self) -> Result<Vec<AgentInfo>, ApiError> {
        self.record("/agent")?;
        Ok(self.data.lock().unwrap().agents.clone())
    }

    async fn abort_session(&self, id: &SessionId) -> Result<(), ApiError> {
        self.record(format!("/session/{id}/abort"))?;
        self.aborted.lock().unwrap().push(id.to_string());
        Ok(())
    }

    async fn send_message(
        &self,
        id: &SessionId,
        text: &str,
        options: &PromptOptions,
    ) -> Result<(), ApiError> {
        self.record(format!("/session/{id}/prompt_async"))?;
        self.prompts.lock().unwrap().push(SentPrompt {
            session_id: id.to_string(),
            text: text.to_string(),
            options: options.clone(),
        });
        Ok(())
    }

    async fn open_events(&self) -> Result<PayloadStream, ApiError> {
        self.record("/event")?;
        let payloads = self.data.lock().unwrap().payloads.clone();
        let items: Vec<Result<String, StreamError>> = payloads.into_iter().map(Ok).collect();
        // Stay open after the canned payloads, like a live server.
        Ok(futures::stream::iter(items)
            .chain(futures::stream::pending())
            .boxed())
    }
}

/// Scroll surface that records requests instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub position: usize,
    pub bottom_requests: Vec<bool>,
    pub restored: Vec<usize>,
}

impl ScrollSurface for RecordingSurface {
    fn scroll_position(&self) -> usize {
        self.position
    }

    fn restore_position(&mut self, offset: usize) {
        self.restored.push(offset);
        self.position = offset;
    }

    fn scroll_to_bottom(&mut self, force: bool) {
        self.bottom_requests.push(force);
    }
}

pub fn session(id: &str, title: &str) -> SessionRecord {
    SessionRecord::new(id).with_title(title)
}

pub fn child(id: &str, parent: &str, title: &str) -> SessionRecord {
    SessionRecord::new(id).with_parent(parent).with_title(title)
}

/// History entry with one text part.
pub fn raw_text_message(id: &str, role: &str, text: &str) -> RawMessage {
    let value = serde_json::json!({
        "info": {"id": id, "role": role},
        "parts": [{"id": format!("{id}-p0"), "type": "text", "text": text}],
    });
    serde_json::from_value(value).unwrap()
}

/// Wrap an event type and properties into an SSE payload.
pub fn envelope(event_type: &str, properties: Value) -> String {
    serde_json::json!({"type": event_type, "properties": properties}).to_string()
}

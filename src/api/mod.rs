//! Remote data source seam.
//!
//! The orchestrator only talks to the server through [`RemoteSource`]; the
//! reqwest-backed [`HttpClient`] is the production implementation and tests
//! substitute an in-memory one.

pub mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::model::{
    AgentInfo, Health, ProviderCatalog, RawMessage, RemoteConfig, SessionId, SessionRecord,
};
use crate::stream::PayloadStream;

pub use http::{HttpClient, HttpConnector};

/// Optional endpoints the remote supports. Unadvertised ones are never called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub agents: bool,
    pub providers: bool,
    pub config: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            agents: false,
            providers: true,
            config: true,
        }
    }
}

/// Prompt selection sent alongside the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptOptions {
    pub agent: Option<String>,
    /// `provider/model`
    pub model: Option<String>,
    pub variant: Option<String>,
}

impl PromptOptions {
    /// `provider/model:variant`, or just the model when no variant is chosen.
    pub fn model_with_variant(&self) -> Option<String> {
        let model = self.model.as_deref().filter(|m| !m.is_empty())?;
        match self.variant.as_deref().filter(|v| !v.is_empty()) {
            Some(variant) => Some(format!("{model}:{variant}")),
            None => Some(model.to_string()),
        }
    }

    pub fn agent(&self) -> Option<&str> {
        self.agent.as_deref().filter(|a| !a.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.agent().is_none() && self.model_with_variant().is_none()
    }
}

#[async_trait]
pub trait RemoteSource: Send + Sync {
    fn capabilities(&self) -> Capabilities;

    async fn fetch_health(&self) -> Result<Health, ApiError>;

    async fn fetch_sessions(&self) -> Result<Vec<SessionRecord>, ApiError>;

    /// Direct children only; callers recurse.
    async fn fetch_session_children(&self, id: &SessionId)
        -> Result<Vec<SessionRecord>, ApiError>;

    async fn fetch_messages(&self, id: &SessionId) -> Result<Vec<RawMessage>, ApiError>;

    async fn fetch_providers(&self) -> Result<ProviderCatalog, ApiError>;

    async fn fetch_config(&self) -> Result<RemoteConfig, ApiError>;

    async fn fetch_agents(&self) -> Result<Vec<AgentInfo>, ApiError>;

    async fn abort_session(&self, id: &SessionId) -> Result<(), ApiError>;

    /// Fire-and-forget prompt submission.
    async fn send_message(
        &self,
        id: &SessionId,
        text: &str,
        options: &PromptOptions,
    ) -> Result<(), ApiError>;

    /// Open the live event stream as a stream of raw SSE payloads.
    async fn open_events(&self) -> Result<PayloadStream, ApiError>;
}

/// Produces a fresh client handle for every `connect`.
pub trait Connector: Send + Sync {
    fn connect(&self) -> Result<Arc<dyn RemoteSource>, ApiError>;
}

impl<F> Connector for F
where
    F: Fn() -> Result<Arc<dyn RemoteSource>, ApiError> + Send + Sync,
{
    fn connect(&self) -> Result<Arc<dyn RemoteSource>, ApiError> {
        self()
    }
}

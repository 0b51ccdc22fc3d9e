use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{Capabilities, Connector, PromptOptions, RemoteSource};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::model::{
    AgentInfo, Health, ProviderCatalog, RawMessage, RemoteConfig, SessionId, SessionRecord,
};
use crate::stream::{data_stream, PayloadStream};

const MAX_ERROR_BODY: usize = 240;

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct PromptRequest<'a> {
    parts: [TextPart<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    agent: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

/// reqwest-backed [`RemoteSource`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let name = HeaderName::from_bytes(config.api_key_header.as_bytes())
                .map_err(|e| ApiError::Config(format!("api key header: {e}")))?;
            let mut value = HeaderValue::from_str(key)
                .map_err(|e| ApiError::Config(format!("api key: {e}")))?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.config.url(path))
            .send()
            .await
            .map_err(|e| transport(path, e))?;
        let response = check_status(path, response).await?;
        let body = response.text().await.map_err(|e| transport(path, e))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: format!("{e}; body: {}", sanitize_error_body(&body)),
        })
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        debug!(path, "POST");
        let mut request = self.client.post(self.config.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|e| transport(path, e))?;
        check_status(path, response).await
    }
}

fn transport(path: &str, error: reqwest::Error) -> ApiError {
    ApiError::Transport {
        path: path.to_string(),
        message: error.to_string(),
    }
}

async fn check_status(path: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = sanitize_error_body(&response.text().await.unwrap_or_default());
    Err(ApiError::Status {
        path: path.to_string(),
        status: status.as_u16(),
        body,
    })
}

/// Collapse whitespace and control characters and cap the length.
fn sanitize_error_body(body: &str) -> String {
    let sanitized = body
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    match sanitized.char_indices().nth(MAX_ERROR_BODY) {
        Some((end, _)) => format!("{}...", &sanitized[..end]),
        None => sanitized,
    }
}

#[async_trait]
impl RemoteSource for HttpClient {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            agents: self.config.agents,
            providers: true,
            config: true,
        }
    }

    async fn fetch_health(&self) -> Result<Health, ApiError> {
        self.get_json("/global/health").await
    }

    async fn fetch_sessions(&self) -> Result<Vec<SessionRecord>, ApiError> {
        self.get_json("/session").await
    }

    async fn fetch_session_children(
        &self,
        id: &SessionId,
    ) -> Result<Vec<SessionRecord>, ApiError> {
        self.get_json(&format!("/session/{id}/children")).await
    }

    async fn fetch_messages(&self, id: &SessionId) -> Result<Vec<RawMessage>, ApiError> {
        self.get_json(&format!("/session/{id}/message")).await
    }

    async fn fetch_providers(&self) -> Result<ProviderCatalog, ApiError> {
        self.get_json("/provider").await
    }

    async fn fetch_config(&self) -> Result<RemoteConfig, ApiError> {
        self.get_json("/config").await
    }

    async fn fetch_agents(&self) -> Result<Vec<AgentInfo>, ApiError> {
        self.get_json("/agent").await
    }

    async fn abort_session(&self, id: &SessionId) -> Result<(), ApiError> {
        self.post::<()>(&format!("/session/{id}/abort"), None)
            .await
            .map(|_| ())
    }

    async fn send_message(
        &self,
        id: &SessionId,
        text: &str,
        options: &PromptOptions,
    ) -> Result<(), ApiError> {
        let body = PromptRequest {
            parts: [TextPart { kind: "text", text }],
            agent: options.agent(),
            model: options.model_with_variant(),
        };
        self.post(&format!("/session/{id}/prompt_async"), Some(&body))
            .await
            .map(|_| ())
    }

    async fn open_events(&self) -> Result<PayloadStream, ApiError> {
        let path = "/event";
        debug!(path, "opening event stream");
        let response = self
            .client
            .get(self.config.url(path))
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| transport(path, e))?;
        let response = check_status(path, response).await?;
        Ok(data_stream(response.bytes_stream()).boxed())
    }
}

/// Builds an [`HttpClient`] from a fixed configuration on every connect.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    config: ClientConfig,
}

impl HttpConnector {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl Connector for HttpConnector {
    fn connect(&self) -> Result<Arc<dyn RemoteSource>, ApiError> {
        Ok(Arc::new(HttpClient::new(self.config.clone())?))
    }
}

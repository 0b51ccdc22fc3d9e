use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:4096";
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

/// Terminal client for an opencode-compatible agent server.
#[derive(Debug, Clone, Parser)]
#[command(name = "canopy-tui", version, about)]
pub struct Cli {
    /// Server base URL
    #[arg(long, env = "CANOPY_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// API key sent with every request
    #[arg(long, env = "CANOPY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Header carrying the API key
    #[arg(long, env = "CANOPY_API_KEY_HEADER", default_value = DEFAULT_API_KEY_HEADER)]
    pub api_key_header: String,

    /// Query the server's agent list
    #[arg(long)]
    pub agents: bool,

    /// Log at debug level
    #[arg(long)]
    pub debug: bool,

    /// Directory for the log file
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// UI tick interval in milliseconds
    #[arg(long, default_value_t = 250)]
    pub tick_ms: u64,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            server_url: self.server.trim_end_matches('/').to_string(),
            api_key: self.api_key.clone().filter(|k| !k.is_empty()),
            api_key_header: self.api_key_header.clone(),
            agents: self.agents,
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }
}

/// Everything needed to reach the server. Resolved once in `main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash
    pub server_url: String,
    pub api_key: Option<String>,
    pub api_key_header: String,
    /// Whether `/agent` is available
    pub agents: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            api_key: None,
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            agents: false,
        }
    }
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url: String = server_url.into();
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_api_key_header(mut self, header: impl Into<String>) -> Self {
        self.api_key_header = header.into();
        self
    }

    pub fn with_agents(mut self, agents: bool) -> Self {
        self.agents = agents;
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }
}

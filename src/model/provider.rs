use indexmap::IndexMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::serde_utils::variant_names;

/// `/global/health`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Health {
    #[serde(default)]
    pub version: Option<String>,
}

/// `/provider`: every known provider, the connected subset, and defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderCatalog {
    #[serde(default)]
    pub all: Vec<Provider>,
    /// Absent means "no restriction"
    #[serde(default)]
    pub connected: Option<Vec<String>>,
    #[serde(default)]
    pub default: Map<String, Value>,
}

impl ProviderCatalog {
    /// Server-wide default `provider/model`, if advertised.
    pub fn default_model(&self) -> Option<&str> {
        self.default
            .get("model")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
    }

    pub fn is_connected(&self, provider_id: &str) -> bool {
        match &self.connected {
            Some(ids) => ids.iter().any(|id| id == provider_id),
            None => true,
        }
    }

    pub fn provider(&self, provider_id: &str) -> Option<&Provider> {
        self.all.iter().find(|p| p.id == provider_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provider {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    /// Keyed by model id, in server order
    pub models: IndexMap<String, ModelInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "variant_names")]
    pub variants: Vec<String>,
}

/// `/config`, reduced to the fields used to seed the prompt selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    /// Agent definitions keyed by name
    #[serde(default)]
    pub agent: Map<String, Value>,
}

impl RemoteConfig {
    pub fn agent_names(&self) -> Vec<AgentInfo> {
        self.agent
            .iter()
            .map(|(name, value)| AgentInfo {
                name: name.clone(),
                description: value
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
            .collect()
    }
}

/// One entry of `/agent`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AgentInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// Flattened `provider/model` entry offered by the model picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOption {
    /// `provider/model`
    pub id: String,
    pub name: String,
    pub provider: String,
    pub model: String,
}

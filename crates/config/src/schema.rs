//! Config schema and defaults.

use std::time::Duration;

use secrecy::Secret;

/// Default Groq catalog, most capable first.
pub const DEFAULT_MODEL_PRIORITY: &[&str] = &[
    "openai/gpt-oss-120b",
    "llama-3.3-70b-versatile",
    "openai/gpt-oss-20b",
    "qwen/qwen3-32b",
    "llama-3.1-8b-instant",
];

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Root configuration.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct SwitchboardConfig {
    pub upstream: UpstreamConfig,
    pub models: ModelsConfig,
}

/// Upstream chat-completion endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Bearer credential. `${GROQ_API_KEY}` placeholders in the config
    /// file are resolved before parsing; when the key is not configured
    /// at all, the `GROQ_API_KEY` environment variable is used.
    pub api_key: Option<Secret<String>>,
    /// Per-request timeout for upstream calls.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl UpstreamConfig {
    /// Configured credential, falling back to `GROQ_API_KEY`. Empty when
    /// neither is set.
    #[must_use]
    pub fn resolved_api_key(&self) -> Secret<String> {
        match &self.api_key {
            Some(key) => key.clone(),
            None => Secret::new(std::env::var("GROQ_API_KEY").unwrap_or_default()),
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The model catalog and its priority order.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Priority-ordered model ids; the first entry is tried first.
    pub priority: Vec<String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            priority: DEFAULT_MODEL_PRIORITY
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

//! The dispatcher: candidate selection and the fallback loop.

use std::sync::Arc;

use {
    tokio::sync::Mutex,
    tracing::{debug, warn},
};

use {
    switchboard_pool::ModelPool,
    switchboard_providers::{ChatMessage, CompletionBackend, Outcome},
};

use crate::error::{Error, Result};

/// Inbound chat request.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Forces dispatch to this model, with no fallback, when set.
    #[serde(default)]
    pub model: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            system_prompt: None,
            model: None,
        }
    }

    #[must_use]
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Successful dispatch result.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ChatReply {
    /// Model id that actually served the request.
    pub model_used: String,
    pub response: String,
}

/// Dispatches chat requests across the pool's priority order.
pub struct Dispatcher {
    pool: Arc<Mutex<ModelPool>>,
    backend: Arc<dyn CompletionBackend>,
}

impl Dispatcher {
    pub fn new(pool: Arc<Mutex<ModelPool>>, backend: Arc<dyn CompletionBackend>) -> Self {
        Self { pool, backend }
    }

    /// Standard wiring: a pool seeded from the configured priority list
    /// plus an OpenAI-compatible client for the configured upstream.
    pub fn from_config(config: &switchboard_config::SwitchboardConfig) -> anyhow::Result<Self> {
        let client = switchboard_providers::OpenAiCompatClient::new(
            config.upstream.base_url.clone(),
            config.upstream.resolved_api_key(),
            config.upstream.timeout(),
        )?;
        let pool = ModelPool::new(config.models.priority.iter().cloned());
        Ok(Self::new(Arc::new(Mutex::new(pool)), Arc::new(client)))
    }

    /// Shared handle to the underlying pool, for whatever serves reorder
    /// and status operations alongside this dispatcher.
    #[must_use]
    pub fn pool(&self) -> Arc<Mutex<ModelPool>> {
        Arc::clone(&self.pool)
    }

    /// Dispatch one chat request.
    ///
    /// With an explicit `request.model` the call is forced to that model,
    /// skipping both priority order and cooldown filtering — a caller may
    /// knowingly hit a model that is still cooling down. Otherwise
    /// candidates are tried strictly in priority order until one succeeds;
    /// a rate-limited candidate is put into cooldown and the next one is
    /// tried, while any other upstream failure aborts the whole call.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let candidates = self.candidates(request).await?;
        let messages = build_messages(request);

        for candidate in &candidates {
            // The upstream call runs with no pool lock held; only the
            // disable below re-takes it.
            match self.backend.complete(candidate, &messages).await {
                Outcome::Success(completion) => {
                    debug!(model = %completion.model, "chat dispatched");
                    return Ok(ChatReply {
                        model_used: completion.model,
                        response: completion.content,
                    });
                },
                Outcome::RateLimited { retry_after_secs } => {
                    self.pool.lock().await.disable(candidate, retry_after_secs);
                },
                Outcome::HardFailure { status, detail } => {
                    warn!(model = %candidate, status, "upstream hard failure, aborting dispatch");
                    return Err(Error::Upstream { status, detail });
                },
            }
        }

        Err(Error::AllModelsRateLimited)
    }

    async fn candidates(&self, request: &ChatRequest) -> Result<Vec<String>> {
        let mut pool = self.pool.lock().await;
        match &request.model {
            Some(forced) => {
                if !pool.contains(forced) {
                    return Err(Error::InvalidModel(forced.clone()));
                }
                Ok(vec![forced.clone()])
            },
            None => {
                let available = pool.available_models();
                if available.is_empty() {
                    return Err(Error::AllModelsRateLimited);
                }
                Ok(available)
            },
        }
    }
}

/// System prompt first (when present), then the user message.
fn build_messages(request: &ChatRequest) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system_prompt) = &request.system_prompt {
        messages.push(ChatMessage::system(system_prompt.clone()));
    }
    messages.push(ChatMessage::user(request.message.clone()));
    messages
}

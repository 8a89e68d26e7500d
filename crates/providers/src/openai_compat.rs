//! OpenAI-compatible chat-completions client.
//!
//! One bounded-timeout POST per [`CompletionBackend::complete`] call.
//! Quota responses (HTTP 429) surface as [`Outcome::RateLimited`] with the
//! upstream's `retry-after` hint; everything else that isn't a parsable
//! completion surfaces as [`Outcome::HardFailure`].

use std::time::Duration;

use {
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, warn},
};

use crate::{ChatMessage, Completion, CompletionBackend, Outcome};

/// Cooldown hint applied when a 429 carries no usable `retry-after`.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

pub struct OpenAiCompatClient {
    base_url: String,
    api_key: Secret<String>,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    /// Build a client for `base_url` (e.g. `https://api.groq.com/openai/v1`)
    /// with the given bearer credential and per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Secret<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }
}

#[async_trait::async_trait]
impl CompletionBackend for OpenAiCompatClient {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Outcome {
        let body = serde_json::json!({
            "model": model,
            "messages": messages.iter().map(ChatMessage::to_value).collect::<Vec<_>>(),
        });

        debug!(model, messages_count = messages.len(), "chat completion request");

        let resp = match self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(model, error = %e, "chat completion transport failure");
                return Outcome::HardFailure {
                    status: 0,
                    detail: e.to_string(),
                };
            },
        };

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = retry_after_secs(resp.headers());
            warn!(model, retry_after_secs, "upstream rate limit");
            return Outcome::RateLimited { retry_after_secs };
        }
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            warn!(model, status = %status, body = %detail, "upstream error");
            return Outcome::HardFailure {
                status: status.as_u16(),
                detail,
            };
        }

        let payload: serde_json::Value = match resp.json().await {
            Ok(payload) => payload,
            Err(e) => {
                return Outcome::HardFailure {
                    status: status.as_u16(),
                    detail: format!("unparsable completion body: {e}"),
                };
            },
        };
        match parse_completion(&payload) {
            Some(completion) => Outcome::Success(completion),
            None => Outcome::HardFailure {
                status: status.as_u16(),
                detail: "completion payload missing model or content".to_string(),
            },
        }
    }
}

/// `retry-after` as delta-seconds, which is what providers return for 429.
/// Absent or non-numeric values fall back to a short fixed cooldown.
fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|text| text.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

fn parse_completion(payload: &serde_json::Value) -> Option<Completion> {
    let model = payload["model"].as_str()?.to_string();
    let content = payload["choices"][0]["message"]["content"]
        .as_str()?
        .to_string();
    Some(Completion { model, content })
}

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Manual-mode request named a model the pool does not know.
    /// Client-input validation, raised before any upstream call.
    #[error("unknown model: {0}")]
    InvalidModel(String),

    /// No candidate was usable, or every usable candidate was rate-limited
    /// during this call. The caller may retry once cooldowns expire.
    #[error("all models are currently rate-limited")]
    AllModelsRateLimited,

    /// Non-quota upstream failure, propagated without fallback. `status`
    /// is 0 when the failure happened before an HTTP status was received.
    #[error("upstream error (HTTP {status}): {detail}")]
    Upstream { status: u16, detail: String },
}

pub type Result<T> = std::result::Result<T, Error>;

//! Sequential-fallback chat dispatch over the model pool.
//!
//! One dispatcher per service. Auto mode walks the pool's priority order,
//! skipping cooled-down models and disabling candidates the upstream
//! rate-limits; manual mode forces a single named model with no fallback.

pub mod dispatcher;
pub mod error;

pub use {
    dispatcher::{ChatReply, ChatRequest, Dispatcher},
    error::{Error, Result},
};

//! In-memory model pool: priority ordering and per-model cooldowns.
//!
//! The pool is process-lifetime state owned by the dispatching service.
//! A model enters a temporary cooldown when the upstream rate-limits it
//! and becomes usable again once the deadline passes. Expiry is evaluated
//! lazily at query time; there is no background timer.

pub mod model;
pub mod pool;

pub use {
    model::ModelState,
    pool::{ModelPool, ModelStatus},
};

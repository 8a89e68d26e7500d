//! Configuration loading and env substitution.
//!
//! Config file: `switchboard.toml`, searched in `./` then
//! `~/.config/switchboard/`. Supports `${ENV_VAR}` substitution in the
//! raw file before parsing. A missing or broken file degrades to
//! defaults at the discovery entry point.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{config_dir, discover_and_load, load_config},
    schema::{ModelsConfig, SwitchboardConfig, UpstreamConfig},
};

//! Client for a hosted, OpenAI-compatible chat-completion endpoint.
//!
//! - [`config`] -- endpoint, credentials, and sampling settings from the environment.
//! - [`api`] -- the [`LlmClient`] and its wire types.

pub mod api;
pub mod config;

pub use api::{LlmClient, LlmError};
pub use config::LlmConfig;

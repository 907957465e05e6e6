//! # ask-ollama client
//!
//! Everything the tool server needs to talk to a local Ollama instance:
//!
//! - [`Config`]: `config.json`/TOML settings (host, timeout, endpoint table,
//!   API documentation path)
//! - [`OllamaClient`]: one JSON request per call against the configured
//!   endpoint table
//! - [`image`]: turning data URIs, URLs and local files into base64 payloads
//! - [`responses`]: shaping raw Ollama JSON into tool results and error
//!   envelopes

mod client;
mod config;
mod error;
pub mod image;
pub mod responses;

pub use client::{ChatMessage, OllamaClient};
pub use config::{
    ApiDocSettings, ApiSettings, Config, Endpoints, ImageSettings, OllamaSettings, CONFIG_ENV,
    DEFAULT_CONFIG_FILE, HOST_ENV,
};
pub use error::{ClientError, ImageError, Result};
pub use responses::ErrorEnvelope;

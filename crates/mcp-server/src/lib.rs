//! ask-ollama MCP server
//!
//! Exposes a local Ollama instance and its API documentation to AI agents
//! over the MCP stdio transport.
//!
//! ## Tools
//!
//! - `get_started_guide` - project overview and recommended workflow
//! - `get_ollama_version`, `get_ollama_list`, `get_running_models` - server state
//! - `post_show_model` - model details
//! - `simple_chat`, `simple_generate` - single-turn, non-streaming calls
//! - `post_generate_embeddings` - text embeddings
//! - `get_api_doc_section` - heading-path navigation of the API documentation
//!
//! The documentation file is also served as the `file://api-md` resource.
//!
//! ## Usage
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "ask-ollama": {
//!       "command": "ask-ollama-mcp",
//!       "env": { "ASK_OLLAMA_CONFIG": "/path/to/config.json" }
//!     }
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use ask_ollama_client::Config;
use rmcp::transport::stdio;
use rmcp::ServiceExt;

pub mod api_doc;
mod guide;
mod service;

pub use service::AskOllamaService;

pub async fn main_entry() -> Result<()> {
    // stdout carries the MCP protocol; logs go to stderr only.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let explicit = std::env::args_os().nth(1).map(std::path::PathBuf::from);
    let config = Config::load(explicit.as_deref()).context("Failed to load configuration")?;
    log::info!(
        "Starting ask-ollama MCP server (ollama at {}, docs at {})",
        config.ollama.host,
        config.api_doc.file_path.display()
    );

    let service = AskOllamaService::new(config)?;
    let server = service.serve(stdio()).await?;
    server.waiting().await?;

    log::info!("ask-ollama MCP server stopped");
    Ok(())
}

#![allow(dead_code)]

use anyhow::{Context, Result};
use rmcp::service::{RoleClient, RunningService, ServiceExt};
use rmcp::transport::TokioChildProcess;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

pub const TIMEOUT: Duration = Duration::from_secs(10);

pub fn locate_ask_ollama_mcp_bin() -> Result<PathBuf> {
    if let Some(path) = option_env!("CARGO_BIN_EXE_ask-ollama-mcp") {
        return Ok(PathBuf::from(path));
    }

    // `.../target/{debug|release}/deps/<test>` → `.../target/{debug|release}/ask-ollama-mcp`
    if let Ok(exe) = std::env::current_exe() {
        if let Some(target_profile_dir) = exe.parent().and_then(|p| p.parent()) {
            let candidate = target_profile_dir.join("ask-ollama-mcp");
            if candidate.exists() {
                return Ok(candidate);
            }
        }
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = manifest_dir
        .ancestors()
        .nth(2)
        .context("failed to resolve repo root from CARGO_MANIFEST_DIR")?;
    for rel in ["target/debug/ask-ollama-mcp", "target/release/ask-ollama-mcp"] {
        let candidate = repo_root.join(rel);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    anyhow::bail!("failed to locate ask-ollama-mcp binary; build with: cargo build -p ask-ollama-mcp")
}

/// Write `config.json` into `dir` pointing at `host` and a sibling `ollama-api.md`.
pub fn write_config(dir: &Path, host: &str) -> Result<PathBuf> {
    let config = serde_json::json!({
        "ollama": { "host": host, "timeout": 5 },
        "api_doc": { "file_path": "ollama-api.md", "max_length": 8000 },
    });
    let path = dir.join("config.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&config)?).context("write config.json")?;
    Ok(path)
}

pub async fn start_server(config: &Path) -> Result<RunningService<RoleClient, ()>> {
    let bin = locate_ask_ollama_mcp_bin()?;
    let mut cmd = Command::new(bin);
    cmd.env("ASK_OLLAMA_CONFIG", config);
    cmd.env_remove("OLLAMA_HOST");
    cmd.env("RUST_LOG", "warn");

    let transport = TokioChildProcess::new(cmd).context("spawn mcp server")?;
    let service = tokio::time::timeout(TIMEOUT, ().serve(transport))
        .await
        .context("timeout starting MCP server")??;
    Ok(service)
}

/// Address of a port nothing listens on.
pub async fn closed_port_host() -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

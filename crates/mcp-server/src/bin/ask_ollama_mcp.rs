use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    ask_ollama_mcp::main_entry().await
}

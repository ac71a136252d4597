//! §4.9 Gateway-ToolCall standalone entry point.
//!
//! MCP clients (Claude Desktop, editor integrations, agent harnesses) spawn
//! this binary directly and speak the tool-call protocol over its stdin/
//! stdout — it is not reached through the `kit` CLI.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    toolcall::serve().await
}

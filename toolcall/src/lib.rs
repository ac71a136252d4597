//! §4.9 Gateway-ToolCall: the stdio MCP front end over the same
//! repository-intelligence operations `api` (§4.8) exposes over HTTP.

pub mod errors;
pub mod server;
pub mod state;

pub use errors::{Result, ToolError};
pub use server::RepoToolServer;
pub use state::{ConfigError, ToolCallState};

use rmcp::transport::io::stdio;
use rmcp::ServiceExt;
use tracing::info;

/// Builds state from the environment and serves the tool catalog over
/// stdio until the peer closes the connection.
pub async fn serve() -> anyhow::Result<()> {
    let state = ToolCallState::from_env()?;
    let server = RepoToolServer::new(state);

    info!("toolcall: starting stdio MCP server");
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

//! mobi-mcp binary.
//!
//! Runs the MCP server over stdio by default, or over HTTP/SSE with `--sse`.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mobi_mcp::{McpServer, MobiClient, MobiConfig};

/// MCP server for the Mobi semantic data platform.
///
/// Connection settings come from MOBI_BASE_URL, MOBI_USERNAME, MOBI_PASSWORD
/// and MOBI_IGNORE_CERT (a .env file in the working directory is honoured).
#[derive(Parser, Debug)]
#[command(name = "mobi-mcp", version, about)]
struct Cli {
    /// Start the MCP server with SSE transport instead of stdio
    #[arg(long)]
    sse: bool,

    /// Address to listen on with --sse
    #[arg(long, env = "MOBI_MCP_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on with --sse
    #[arg(long, env = "MOBI_MCP_PORT", default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // stdout carries the protocol in stdio mode; logs always go to stderr
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = MobiConfig::from_env().context("failed to read Mobi configuration")?;
    tracing::info!(base_url = %config.base_url, user = %config.username, "Connecting to Mobi");

    let client = MobiClient::new(config).context("failed to build HTTP client")?;
    let server = Arc::new(McpServer::new(client));

    if cli.sse {
        let addr = SocketAddr::new(cli.host, cli.port);
        mobi_mcp::sse::serve(server, addr).await?;
    } else {
        tracing::info!("Serving MCP over stdio");
        server.run_stdio().await?;
    }

    Ok(())
}

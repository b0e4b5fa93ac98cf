//! Standalone storage account management emulator.
//!
//! Serves the management REST surface from an in-memory registry so the
//! integration suite and `mgmt-tool` can run without a cloud endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use storage_mgmt_api::{router::Router, server::Server};
use storage_mgmt_core::{config::EmulatorConfig, AccountRegistry};
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the emulator.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Only accept requests for this subscription
    #[arg(long)]
    subscription_id: Option<String>,

    /// Require this bearer token on every request
    #[arg(long, env = "STORAGE_MGMT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request body read timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Base URI used in account URIs (defaults to the bound address)
    #[arg(long)]
    public_base_uri: Option<String>,
}

impl Args {
    /// Emulator settings for a server bound to `addr`. Empty values count as unset.
    fn emulator_config(self, addr: SocketAddr) -> EmulatorConfig {
        EmulatorConfig {
            subscription_id: self.subscription_id.filter(|s| !s.is_empty()),
            bearer_token: self.token.filter(|t| !t.is_empty()),
            request_timeout_ms: self.request_timeout_ms,
            public_base_uri: self
                .public_base_uri
                .unwrap_or_else(|| format!("http://{}", addr)),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;

    let config = args.emulator_config(addr);

    let registry = Arc::new(AccountRegistry::new(config.public_base_uri.clone()));
    tracing::info!(
        %addr,
        subscription = config.subscription_id.as_deref().unwrap_or("<any>"),
        auth = config.bearer_token.is_some(),
        request_timeout_ms = config.request_timeout_ms,
        "Starting storage management emulator"
    );

    let router = Router::new(registry, Arc::new(config));
    let server = Server::new(router);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve(addr).await {
            tracing::error!("Server error: {}", e);
        }
    });

    signal::ctrl_c()
        .await
        .context("failed to listen for ctrl_c")?;
    tracing::info!("Shutting down emulator");
    server_handle.abort();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "127.0.0.1:8080".parse().unwrap()
    }

    #[test]
    fn test_empty_token_disables_auth() {
        let args = Args::try_parse_from(["mgmt-server", "--token", "", "--subscription-id", ""])
            .unwrap();
        let config = args.emulator_config(addr());
        assert!(config.bearer_token.is_none());
        assert!(config.subscription_id.is_none());
        assert_eq!(config.public_base_uri, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_flags_reach_emulator_config() {
        let args = Args::try_parse_from([
            "mgmt-server",
            "--token",
            "secret",
            "--subscription-id",
            "sub-1",
            "--request-timeout-ms",
            "250",
            "--public-base-uri",
            "https://mgmt.example",
        ])
        .unwrap();
        let config = args.emulator_config(addr());
        assert_eq!(config.bearer_token.as_deref(), Some("secret"));
        assert_eq!(config.subscription_id.as_deref(), Some("sub-1"));
        assert_eq!(config.request_timeout_ms, 250);
        assert_eq!(config.public_base_uri, "https://mgmt.example");
    }
}

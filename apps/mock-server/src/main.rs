//! Mock REST API server for the school admin frontend.
//!
//! Seeds the in-memory store from fixtures, then serves the mock
//! routes until Ctrl+C.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use mock_db_api::{router::Router, school, server::Server};
use mock_db_core::config::{Environment, MockConfig};
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the mock server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3001)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Path prefix for every route
    #[arg(long, default_value = "api")]
    namespace: String,

    /// Runtime environment; test starts with an empty store
    #[arg(long, default_value = "development", value_parser = str::parse::<Environment>)]
    environment: Environment,

    /// Response delay in milliseconds (defaults to the environment's)
    #[arg(long)]
    timing_ms: Option<u64>,

    /// Directory with fixture files (embedded fixtures when omitted)
    #[arg(long)]
    fixtures_dir: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,
}

impl Args {
    fn into_config(self) -> MockConfig {
        let environment = self.environment;
        MockConfig {
            host: self.host,
            port: self.port,
            namespace: self.namespace,
            environment,
            timing_ms: self
                .timing_ms
                .unwrap_or_else(|| environment.default_timing_ms()),
            request_timeout_ms: self.request_timeout_ms,
            fixtures_dir: self.fixtures_dir,
        }
    }
}

/// Resolves the listen address; host names go through the system resolver.
async fn resolve_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("Failed to resolve listen address {}:{}", host, port))?
        .next()
        .with_context(|| format!("No address found for {}:{}", host, port))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Arc::new(args.into_config());
    let db = school::build_database(&config).context("Failed to load fixtures")?;
    let router = Router::new(Arc::new(db), config.clone())?;

    let addr = resolve_addr(&config.host, config.port).await?;
    let server = Server::new(addr, router);

    let fixtures = config
        .fixtures_dir
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "embedded".to_string());
    tracing::info!(
        host = %config.host,
        port = config.port,
        namespace = %config.route_prefix(),
        environment = ?config.environment,
        timing_ms = config.timing_ms,
        fixtures = %fixtures,
        "Starting mock API server"
    );

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve().await {
            tracing::error!("Server error: {}", e);
        }
    });

    signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c")?;
    tracing::info!("Shutting down mock API server");
    server_handle.abort();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_defaults_follow_environment() {
        let args = Args::parse_from(["mock-server", "--environment", "test"]);
        let config = args.into_config();
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.timing_ms, 0);

        let args = Args::parse_from(["mock-server", "--timing-ms", "50", "--port", "9000"]);
        let config = args.into_config();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.timing_ms, 50);
        assert_eq!(config.port, 9000);
        assert!(config.fixtures_dir.is_none());

        assert!(Args::try_parse_from(["mock-server", "--environment", "staging"]).is_err());
    }

    #[tokio::test]
    async fn test_resolves_host_names() {
        let addr = resolve_addr("localhost", 3001).await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 3001);

        let addr = resolve_addr("127.0.0.1", 0).await.unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:0");
    }
}

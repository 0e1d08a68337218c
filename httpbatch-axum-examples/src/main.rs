//! Demo batch server.
//!
//! Mounts the default pipeline (multipart codecs + serial executor over a
//! pooled hyper transport) at `/batch`.
//!
//! Run with: cargo run --bin httpbatch-server -- 0.0.0.0:8080

use std::net::SocketAddr;

use httpbatch_axum::BatchService;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let addr: SocketAddr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "0.0.0.0:8080".to_string())
        .parse()?;

    let app = BatchService::default().into_router("/batch");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "batch server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

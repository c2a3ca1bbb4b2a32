//! Offline cache proxy server.
//!
//! Installs the configured version, then answers every request cache-first.
//!
//! Run:
//!   offcache --config offcache.yaml
//!
//! Try it:
//!   curl -v http://127.0.0.1:8080/            # seeded, x-cache-status: HIT
//!   curl -v http://127.0.0.1:8080/other.html  # MISS, then HIT

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use offcache_configuration::ProxyConfig;
use offcache_reqwest::{ReqwestClient, ReqwestUpstream};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod dispatch;

#[derive(Parser, Debug)]
#[command(name = "offcache")]
#[command(about = "Offline-first cache proxy with versioned seed pre-caching")]
#[command(version)]
struct Cli {
    /// Path to the YAML configuration
    #[arg(short, long, default_value = "offcache.yaml")]
    config: PathBuf,

    /// Overrides `server.listen` from the configuration
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,offcache=debug")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = ProxyConfig::from_file(&cli.config)?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    let addr = config.server.listen_addr()?;
    let scope = Arc::new(config.scope_url()?);

    let upstream = ReqwestUpstream::new(ReqwestClient::new()).client_origin((*scope).clone());
    let proxy = Arc::new(config.into_installer(upstream)?.install().await?.activate().await);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(cache = %proxy.cache_name(), "listening on http://{}", addr);

    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let proxy = Arc::clone(&proxy);
        let scope = Arc::clone(&scope);

        tokio::task::spawn(async move {
            let service = service_fn(move |request| {
                let proxy = Arc::clone(&proxy);
                let scope = Arc::clone(&scope);
                async move {
                    let response = dispatch::dispatch(&proxy, &scope, request).await;
                    Ok::<_, std::convert::Infallible>(response)
                }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                tracing::error!(?err, %peer, "error serving connection");
            }
        });
    }
}

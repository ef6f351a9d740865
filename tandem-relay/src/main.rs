use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tandem_core::IceServerConfig;
use tandem_server::{RelayConfig, router, spawn_relay};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tandem-relay", version, about = "WebRTC signaling relay")]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// STUN/TURN url handed to clients. Repeatable; replaces the defaults.
    #[arg(long = "ice-server", value_name = "URL")]
    ice_servers: Vec<String>,

    #[arg(long, default_value_t = 256)]
    command_buffer: usize,
}

impl Args {
    fn relay_config(&self) -> RelayConfig {
        let mut config = RelayConfig {
            command_buffer: self.command_buffer,
            ..RelayConfig::default()
        };
        if !self.ice_servers.is_empty() {
            config.ice_servers = self
                .ice_servers
                .iter()
                .map(|url| IceServerConfig::stun(url.clone()))
                .collect();
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tandem_relay=info,tandem_server=info")),
        )
        .init();

    let args = Args::parse();
    let service = spawn_relay(args.relay_config());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = router(service).layer(cors);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Signaling relay listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("Relay server failed")?;

    Ok(())
}

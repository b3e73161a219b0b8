//! Simulated backend binary.

use std::net::SocketAddr;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tokengate_config::{Settings, load_dotenv};
use tokengate_server::{BackendConfig, run_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    let host = std::env::var("TOKENGATE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let addr: SocketAddr = format!("{}:{}", host, settings.port).parse()?;

    let config = BackendConfig {
        protected_delay: settings.protected_delay,
        refresh_delay: settings.refresh_delay,
        ..BackendConfig::default()
    };

    tracing::info!(
        "starting simulated backend v{} on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );
    run_server(addr, config).await?;

    Ok(())
}

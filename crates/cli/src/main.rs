//! Test driver for single-flight token refresh coordination.
//!
//! Responsibilities:
//! - Run the scenario matrix against a backend (external or spawned
//!   in-process) and report pass/fail with a matching exit code.
//! - Optionally run the simulated backend in the foreground.
//!
//! Does NOT handle:
//! - The refresh coordination itself (see `crates/client`).
//! - Backend behavior (see `crates/server`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` can provide
//!   clap env defaults.
//! - Exit codes: 0 all scenarios passed, 1 a scenario failed, 2 the run
//!   itself errored.

mod args;
mod runner;

use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use args::{Cli, Commands};
use tokengate_client::ProtectedClient;
use tokengate_config::{Settings, load_dotenv};
use tokengate_server::{BackendConfig, run_server, spawn_backend};

#[tokio::main]
async fn main() {
    load_dotenv();

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let code = match run(cli).await {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            eprintln!("Error: {err:#}");
            2
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let settings = Settings::from_env()?;

    match cli.command.unwrap_or(Commands::Suite) {
        Commands::Serve { port } => {
            let addr: SocketAddr = ([0, 0, 0, 0], port).into();
            run_server(addr, backend_config(&settings)).await?;
            Ok(true)
        }
        Commands::Suite => {
            let client = build_client(cli.base_url, &settings).await?;
            runner::run_suite(&client).await
        }
        Commands::Scenario {
            requests,
            fail_refresh,
        } => {
            let client = build_client(cli.base_url, &settings).await?;
            let outcome = runner::run_scenario(&client, requests, fail_refresh).await?;
            runner::print_outcome(&outcome);
            Ok(outcome.passed())
        }
    }
}

fn backend_config(settings: &Settings) -> BackendConfig {
    BackendConfig {
        protected_delay: settings.protected_delay,
        refresh_delay: settings.refresh_delay,
        ..BackendConfig::default()
    }
}

/// Build the client, spawning an in-process backend when no base URL is given.
async fn build_client(
    base_url: Option<String>,
    settings: &Settings,
) -> anyhow::Result<ProtectedClient> {
    let base_url = match base_url {
        Some(url) => url,
        None => {
            let addr = spawn_backend(backend_config(settings)).await?;
            tracing::info!("spawned in-process backend at http://{addr}");
            format!("http://{addr}")
        }
    };

    Ok(ProtectedClient::builder()
        .base_url(base_url)
        .timeout(settings.timeout)
        .build()?)
}

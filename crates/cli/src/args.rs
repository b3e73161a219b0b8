//! Command-line argument definitions.

use clap::{Parser, Subcommand};

use tokengate_config::constants::DEFAULT_PORT;

/// Test driver for single-flight token refresh coordination.
#[derive(Debug, Parser)]
#[command(name = "tokengate-cli", version, about)]
pub struct Cli {
    /// Backend base URL. When omitted, a simulated backend is spawned
    /// in-process on an ephemeral port.
    #[arg(long, global = true, env = "TOKENGATE_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full scenario suite: 1, 3, and 10 concurrent requests, each
    /// once with the refresh succeeding and once with it forced to fail.
    Suite,

    /// Run a single scenario.
    Scenario {
        /// Number of concurrent requests to fire.
        #[arg(long, default_value_t = 3)]
        requests: usize,

        /// Force the backend's refresh endpoint to fail.
        #[arg(long)]
        fail_refresh: bool,
    },

    /// Run the simulated backend in the foreground.
    Serve {
        /// Port to bind.
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

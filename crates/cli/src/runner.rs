//! Scenario execution and reporting.
//!
//! Each scenario resets the backend and the client, seeds the expired-token
//! sentinel, fires N concurrent requests, and checks the two coordination
//! properties against the backend's counters: exactly one refresh call, and
//! all requests succeeding (or, with the refresh forced to fail, all
//! requests failing).

use std::time::{Duration, Instant};

use anyhow::Context;
use futures::future::join_all;
use tracing::debug;

use tokengate_client::ProtectedClient;
use tokengate_config::constants::EXPIRED_TOKEN_SENTINEL;

/// Result of one scenario run.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub requests: usize,
    pub fail_refresh: bool,
    pub successes: usize,
    pub refresh_calls: u64,
    pub total_requests: u64,
    pub elapsed: Duration,
}

impl ScenarioOutcome {
    /// Whether the run reproduced the expected coordination properties.
    pub fn passed(&self) -> bool {
        let expected_successes = if self.fail_refresh { 0 } else { self.requests };
        self.refresh_calls == 1 && self.successes == expected_successes
    }
}

/// Run one scenario against a clean backend and a clean client.
pub async fn run_scenario(
    client: &ProtectedClient,
    requests: usize,
    fail_refresh: bool,
) -> anyhow::Result<ScenarioOutcome> {
    client
        .reset_server()
        .await
        .context("resetting backend state")?;
    if fail_refresh {
        client
            .set_refresh_failure(true)
            .await
            .context("forcing refresh failure")?;
    }
    client.reset();
    client.token_store().set(EXPIRED_TOKEN_SENTINEL);

    let started = Instant::now();
    let results = join_all((0..requests).map(|_| client.get_protected())).await;
    let elapsed = started.elapsed();

    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(payload) => debug!(request = i + 1, id = payload.request_id, "succeeded"),
            Err(err) => debug!(request = i + 1, error = %err, "failed"),
        }
    }

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let stats = client.stats().await.context("fetching backend stats")?;

    Ok(ScenarioOutcome {
        requests,
        fail_refresh,
        successes,
        refresh_calls: stats.refresh_call_count,
        total_requests: stats.total_requests,
        elapsed,
    })
}

/// Print a human-readable summary of one scenario.
pub fn print_outcome(outcome: &ScenarioOutcome) {
    let mode = if outcome.fail_refresh {
        "refresh forced to fail"
    } else {
        "refresh succeeding"
    };
    println!("{}", "=".repeat(60));
    println!(
        "[SCENARIO] {} concurrent requests, {}",
        outcome.requests, mode
    );
    println!("  refresh calls: {}", outcome.refresh_calls);
    println!(
        "  succeeded:     {}/{}",
        outcome.successes, outcome.requests
    );
    println!(
        "  failed:        {}/{}",
        outcome.requests - outcome.successes,
        outcome.requests
    );
    println!("  backend hits:  {}", outcome.total_requests);
    println!("  elapsed:       {}ms", outcome.elapsed.as_millis());
    println!(
        "  RESULT: {}",
        if outcome.passed() { "PASS" } else { "FAIL" }
    );
    if !outcome.passed() {
        if outcome.refresh_calls != 1 {
            println!(
                "  expected exactly 1 refresh call, observed {}",
                outcome.refresh_calls
            );
        }
        let expected = if outcome.fail_refresh {
            0
        } else {
            outcome.requests
        };
        if outcome.successes != expected {
            println!(
                "  expected {} successful requests, observed {}",
                expected, outcome.successes
            );
        }
    }
    println!();
}

/// Run the full scenario matrix. Returns whether every scenario passed.
pub async fn run_suite(client: &ProtectedClient) -> anyhow::Result<bool> {
    let mut all_passed = true;
    for requests in [1, 3, 10] {
        for fail_refresh in [false, true] {
            let outcome = run_scenario(client, requests, fail_refresh).await?;
            print_outcome(&outcome);
            all_passed &= outcome.passed();
        }
    }
    println!("SUITE: {}", if all_passed { "PASS" } else { "FAIL" });
    Ok(all_passed)
}

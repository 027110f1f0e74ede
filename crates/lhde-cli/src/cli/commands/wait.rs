//! `lhde wait <cid>` – poll until the CID has Filecoin deals.

use anyhow::{Context, Result};
use lhde_core::deal_engine::DealEngine;
use lhde_core::wait::{wait_for_deals, WaitPolicy};

pub fn run_wait(engine: &DealEngine, token: &str, cid: &str, policy: &WaitPolicy) -> Result<()> {
    println!(
        "Waiting for deals on {cid} (every {}s, up to {}s)",
        policy.poll_interval.as_secs(),
        policy.max_wait.as_secs()
    );
    let status = wait_for_deals(engine, cid, token, policy, |attempt, s| {
        if !s.has_deals() {
            println!("  poll {attempt}: no deals yet");
        }
    })
    .with_context(|| format!("waiting for deals on {cid}"))?;
    println!("proof: {}", status.proof);
    println!("filecoin_deals: {}", status.filecoin_deals);
    Ok(())
}

//! `lhde status <cid>` – show proof and deal fields.

use anyhow::{Context, Result};
use lhde_core::deal_engine::DealEngine;

pub fn run_status(engine: &DealEngine, token: &str, cid: &str) -> Result<()> {
    let status = engine
        .deal_status(cid, token)
        .with_context(|| format!("checking deal status for {cid}"))?;
    println!("proof: {}", status.proof);
    println!("filecoin_deals: {}", status.filecoin_deals);
    Ok(())
}

//! `lhde submit <cid>` – register a CID for deal-making.

use anyhow::{Context, Result};
use lhde_core::deal_engine::DealEngine;

pub fn run_submit(engine: &DealEngine, token: &str, cid: &str) -> Result<()> {
    let reply = engine
        .submit_cid(cid, token)
        .with_context(|| format!("submitting CID {cid}"))?;
    println!("Submitted {cid}: {reply}");
    Ok(())
}

//! Poll `deal_status` until a CID has landed in a Filecoin deal.
//!
//! A failed poll ends the wait immediately with that error; only a reply
//! without deals leads to another poll.

use std::time::{Duration, Instant};

use crate::config::WaitConfig;
use crate::deal_engine::{DealEngine, DealError, DealStatus};

/// Poll interval and overall deadline for `wait_for_deals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        WaitConfig::default().into()
    }
}

impl From<WaitConfig> for WaitPolicy {
    fn from(cfg: WaitConfig) -> Self {
        Self {
            poll_interval: Duration::from_secs(cfg.poll_interval_secs),
            max_wait: Duration::from_secs(cfg.max_wait_secs),
        }
    }
}

/// Why `wait_for_deals` stopped without a deal.
#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    /// A deal_status exchange failed.
    #[error(transparent)]
    Poll(#[from] DealError),
    /// Deadline passed while the service still reported no deals.
    #[error("no filecoin deals for CID {cid} after {secs}s", secs = .waited.as_secs())]
    Pending { cid: String, waited: Duration },
}

/// Polls until `DealStatus::has_deals` or the deadline passes. `on_poll` sees
/// every reply (1-based attempt number), e.g. for progress output.
pub fn wait_for_deals<F>(
    engine: &DealEngine,
    cid: &str,
    auth_token: &str,
    policy: &WaitPolicy,
    mut on_poll: F,
) -> Result<DealStatus, WaitError>
where
    F: FnMut(u32, &DealStatus),
{
    let start = Instant::now();
    let mut attempt = 1u32;
    loop {
        let status = engine.deal_status(cid, auth_token)?;
        on_poll(attempt, &status);
        if status.has_deals() {
            tracing::info!("CID {} has filecoin deals after {} poll(s)", cid, attempt);
            return Ok(status);
        }

        let elapsed = start.elapsed();
        if elapsed + policy.poll_interval > policy.max_wait {
            return Err(WaitError::Pending {
                cid: cid.to_string(),
                waited: elapsed,
            });
        }
        tracing::debug!("no deals yet for {}; polling again in {:?}", cid, policy.poll_interval);
        std::thread::sleep(policy.poll_interval);
        attempt += 1;
    }
}

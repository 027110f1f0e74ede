//! Lighthouse Deal Engine client.
//!
//! Two blocking exchanges against the deal API: register a CID for deal-making
//! (`add_cid`) and fetch its proof and deal fields (`deal_status`). Each call
//! is a single GET with a bearer token; nothing is cached or retried.

mod error;
mod reply;
mod transfer;

use std::time::Duration;

use url::Url;

use crate::config::LhdeConfig;
use transfer::{HttpReply, Timeouts};

pub use error::DealError;
pub use reply::{is_json_content_type, DealStatus, SubmitReply};

/// Path of the submission endpoint, relative to the base URL.
pub const ADD_CID_PATH: &str = "api/v1/deal/add_cid";
/// Path of the status endpoint, relative to the base URL.
pub const DEAL_STATUS_PATH: &str = "api/v1/deal/deal_status";

/// Blocking Deal Engine client bound to one base URL.
#[derive(Debug, Clone)]
pub struct DealEngine {
    base_url: Url,
    connect_timeout: Duration,
    submit_timeout: Option<Duration>,
    status_timeout: Option<Duration>,
}

impl DealEngine {
    /// Client with the default timeouts (15s connect, 30s per request).
    pub fn new(base_url: &str) -> Result<Self, DealError> {
        Ok(Self {
            base_url: normalize_base(base_url)?,
            connect_timeout: Duration::from_secs(15),
            submit_timeout: Some(Duration::from_secs(30)),
            status_timeout: Some(Duration::from_secs(30)),
        })
    }

    /// Client from loaded configuration. A timeout of 0 means unbounded.
    pub fn from_config(cfg: &LhdeConfig) -> Result<Self, DealError> {
        Ok(Self {
            base_url: normalize_base(&cfg.base_url)?,
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            submit_timeout: secs_or_unbounded(cfg.submit_timeout_secs),
            status_timeout: secs_or_unbounded(cfg.status_timeout_secs),
        })
    }

    pub fn with_submit_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn with_status_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.status_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full endpoint URL with the CID as the `cid` query parameter.
    pub fn endpoint_url(&self, path: &str, cid: &str) -> Result<Url, DealError> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut().append_pair("cid", cid);
        Ok(url)
    }

    /// Registers `cid` with the deal engine.
    ///
    /// Only HTTP 200 counts as success. The reply is logged and returned; a
    /// JSON content type with a body that is neither an object nor `null` is
    /// an error.
    pub fn submit_cid(&self, cid: &str, auth_token: &str) -> Result<SubmitReply, DealError> {
        tracing::info!("sending CID {} to the deal engine", cid);
        let url = self.endpoint_url(ADD_CID_PATH, cid)?;
        let headers = [
            ("Authorization", bearer(auth_token)),
            ("Content-Type", "application/json".to_string()),
        ];
        let reply = self.fetch(&url, &headers, self.submit_timeout)?;
        tracing::info!("add_cid response status: {}", reply.code);

        let parsed = SubmitReply::parse(reply.content_type.as_deref(), &reply.body)?;
        match &parsed {
            SubmitReply::Json(map) => tracing::info!("add_cid JSON response: {:?}", map),
            SubmitReply::Text(text) => tracing::info!("add_cid non-JSON response: {}", text),
        }
        Ok(parsed)
    }

    /// Fetches the current proof and deal fields for `cid`.
    pub fn deal_status(&self, cid: &str, auth_token: &str) -> Result<DealStatus, DealError> {
        tracing::info!("checking deal status and proof for CID {}", cid);
        let url = self.endpoint_url(DEAL_STATUS_PATH, cid)?;
        let headers = [("Authorization", bearer(auth_token))];
        let reply = self.fetch(&url, &headers, self.status_timeout)?;

        let status = DealStatus::parse(reply.content_type.as_deref(), &reply.body)?;
        tracing::debug!(
            "deal_status for {}: proof={} filecoin_deals={}",
            cid,
            status.proof,
            status.filecoin_deals
        );
        Ok(status)
    }

    fn fetch(
        &self,
        url: &Url,
        headers: &[(&str, String)],
        total: Option<Duration>,
    ) -> Result<HttpReply, DealError> {
        let timeouts = Timeouts {
            connect: self.connect_timeout,
            total,
        };
        let reply = transfer::get(url, headers, timeouts)?;
        if reply.code != 200 {
            tracing::warn!("GET {} returned HTTP {}", url.path(), reply.code);
            return Err(DealError::Status {
                code: reply.code,
                reason: reply.reason,
            });
        }
        Ok(reply)
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

fn secs_or_unbounded(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Parses the base URL and makes sure its path ends in `/`, so endpoint paths
/// are appended rather than replacing the last segment.
fn normalize_base(base: &str) -> Result<Url, DealError> {
    let mut url = Url::parse(base.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

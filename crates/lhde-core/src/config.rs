use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Calibration (testnet) deployment of the Lighthouse Deal Engine.
pub const DEFAULT_BASE_URL: &str = "https://calibration.lighthouse.storage";

/// Polling parameters for `lhde wait` (optional section in config.toml).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Seconds between deal_status polls.
    pub poll_interval_secs: u64,
    /// Give up after this many seconds without deals.
    pub max_wait_secs: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
            max_wait_secs: 600,
        }
    }
}

/// Global configuration loaded from `~/.config/lhde/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LhdeConfig {
    /// Deal Engine base URL; endpoint paths are appended to it.
    pub base_url: String,
    /// Whole-request timeout for add_cid (0 = unbounded).
    pub submit_timeout_secs: u64,
    /// Whole-request timeout for deal_status (0 = unbounded).
    pub status_timeout_secs: u64,
    /// TCP/TLS connect timeout for both endpoints.
    pub connect_timeout_secs: u64,
    /// Bearer token used when none is passed on the command line or environment.
    pub auth_token: Option<String>,
    /// Optional polling policy; if missing, built-in defaults are used.
    pub wait: Option<WaitConfig>,
}

impl Default for LhdeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            submit_timeout_secs: 30,
            status_timeout_secs: 30,
            connect_timeout_secs: 15,
            auth_token: None,
            wait: None,
        }
    }
}

impl LhdeConfig {
    pub fn wait_or_default(&self) -> WaitConfig {
        self.wait.unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("lhde")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LhdeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = LhdeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path (no default file is created).
pub fn load_from(path: &Path) -> Result<LhdeConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: LhdeConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

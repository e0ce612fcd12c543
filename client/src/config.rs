use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

pub const DECISION_LOG_DIR_VAR: &str = "ROTOM_DECISION_LOG_DIR";
pub const MOVE_CLASSES_VAR: &str = "ROTOM_MOVE_CLASSES";
pub const POLL_INTERVAL_VAR: &str = "ROTOM_POLL_INTERVAL_MS";
pub const WAIT_TIMEOUT_VAR: &str = "ROTOM_WAIT_TIMEOUT_SECS";
pub const MAX_ATTEMPTS_VAR: &str = "ROTOM_MAX_DECISION_ATTEMPTS";

/// Runtime settings for a battle session
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding one decision log per battle
    pub decision_log_dir: PathBuf,

    /// JSON file listing attacking moves (`{"attack": [...]}`)
    pub move_classes: Option<PathBuf>,

    /// Delay between polls while the opponent is choosing
    pub poll_interval: Duration,

    /// How long to wait for the controls before warning
    pub wait_timeout: Duration,

    /// Decisions solicited per decision point before giving up on it
    pub max_decision_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decision_log_dir: PathBuf::from("reasoning"),
            move_classes: None,
            poll_interval: Duration::from_millis(3000),
            wait_timeout: Duration::from_secs(150),
            max_decision_attempts: 3,
        }
    }
}

impl Config {
    /// Load from the environment, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup, defaults for unset variables
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup(DECISION_LOG_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            config.decision_log_dir = PathBuf::from(dir.trim());
        }
        if let Some(path) = lookup(MOVE_CLASSES_VAR).filter(|v| !v.trim().is_empty()) {
            config.move_classes = Some(PathBuf::from(path.trim()));
        }
        if let Some(ms) = parse_var(&lookup, POLL_INTERVAL_VAR)? {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_var(&lookup, WAIT_TIMEOUT_VAR)? {
            config.wait_timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = parse_var::<u32>(&lookup, MAX_ATTEMPTS_VAR)? {
            if attempts == 0 {
                bail!("{MAX_ATTEMPTS_VAR} must be at least 1");
            }
            config.max_decision_attempts = attempts;
        }

        Ok(config)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let value = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {name}: {raw:?}"))?;
    Ok(Some(value))
}

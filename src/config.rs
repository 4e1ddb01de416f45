//! Service configuration
//!
//! Read once from the environment at startup and handed to the components
//! that need it. Unparsable values fall back to the defaults.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_GATEWAY_URL: &str = "http://localhost:9000";
const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const DEFAULT_WORKER_IDLE: Duration = Duration::from_secs(5 * 60);
const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(10 * 60);
const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    /// Directory the menu's documents are served from
    pub files_dir: PathBuf,
    pub gateway_url: String,
    pub gateway_token: Option<String>,
    pub session_ttl: Duration,
    pub worker_idle_timeout: Duration,
    pub purge_interval: Duration,
    pub gateway_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secs = |name: &str, default: Duration| {
            lookup(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map_or(default, Duration::from_secs)
        };

        let db_path = lookup("COMPANION_DB_PATH").map_or_else(
            || {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".connect-companion").join("sessions.db")
            },
            PathBuf::from,
        );

        Self {
            port: lookup("COMPANION_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            db_path,
            files_dir: lookup("COMPANION_FILES_DIR")
                .map_or_else(|| PathBuf::from("./files"), PathBuf::from),
            gateway_url: lookup("COMPANION_GATEWAY_URL")
                .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string()),
            gateway_token: lookup("COMPANION_GATEWAY_TOKEN").filter(|t| !t.is_empty()),
            session_ttl: secs("COMPANION_SESSION_TTL_SECS", DEFAULT_SESSION_TTL),
            worker_idle_timeout: secs("COMPANION_WORKER_IDLE_SECS", DEFAULT_WORKER_IDLE),
            purge_interval: secs("COMPANION_PURGE_INTERVAL_SECS", DEFAULT_PURGE_INTERVAL),
            gateway_timeout: secs("COMPANION_GATEWAY_TIMEOUT_SECS", DEFAULT_GATEWAY_TIMEOUT),
        }
    }
}

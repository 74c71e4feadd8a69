// src/config.rs
use crate::render::Theme;
use governor::Quota;
use std::env;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    // HTTP front
    pub bind_address: String,
    pub port: u16,

    // Rate limiting for /status
    pub status_period_secs: u64,
    pub status_burst_limit: u32,

    // Timeouts
    pub query_timeout_secs: u64,
    pub roster_timeout_secs: u64,
    pub request_deadline_secs: u64,

    // Roster override, active only when both are set
    pub roster_override_host: Option<String>,
    pub roster_endpoint: Option<String>,

    // Resources and look
    pub resource_dir: PathBuf,
    pub font_path: Option<PathBuf>,
    pub card_width: u32,
    pub card_columns: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            status_period_secs: 5,
            status_burst_limit: 10,
            query_timeout_secs: 10,
            roster_timeout_secs: 10,
            request_deadline_secs: 25,
            roster_override_host: None,
            roster_endpoint: None,
            resource_dir: default_resource_dir(),
            font_path: None,
            card_width: 700,
            card_columns: 3,
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// `resource/` next to the executable when it exists, else the one in the
/// source tree.
pub fn default_resource_dir() -> PathBuf {
    let beside_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("resource")));
    match beside_exe {
        Some(dir) if dir.is_dir() => dir,
        _ => PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resource"),
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: parsed("PORT", defaults.port),

            status_period_secs: parsed("STATUS_PERIOD_SECS", defaults.status_period_secs),
            status_burst_limit: parsed("STATUS_BURST_LIMIT", defaults.status_burst_limit),

            query_timeout_secs: parsed("QUERY_TIMEOUT_SECS", defaults.query_timeout_secs),
            roster_timeout_secs: parsed("ROSTER_TIMEOUT_SECS", defaults.roster_timeout_secs),
            request_deadline_secs: parsed("REQUEST_DEADLINE_SECS", defaults.request_deadline_secs),

            roster_override_host: non_empty("ROSTER_OVERRIDE_HOST"),
            roster_endpoint: non_empty("ROSTER_ENDPOINT"),

            resource_dir: non_empty("RESOURCE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.resource_dir),
            font_path: non_empty("FONT_PATH").map(PathBuf::from),
            card_width: parsed("CARD_WIDTH", defaults.card_width),
            card_columns: parsed("CARD_COLUMNS", defaults.card_columns),
        }
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn roster_timeout(&self) -> Duration {
        Duration::from_secs(self.roster_timeout_secs)
    }

    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.request_deadline_secs)
    }

    pub fn theme(&self) -> Theme {
        Theme::default()
            .with_width(self.card_width)
            .with_columns(self.card_columns)
    }

    pub fn status_quota(&self) -> Quota {
        let period = Duration::from_secs(self.status_period_secs.max(1));
        let burst = NonZeroU32::new(self.status_burst_limit).unwrap_or(NonZeroU32::MIN);
        Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst)
    }
}

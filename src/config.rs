use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const ENV_HTTP_ADDR: &str = "GANTT_VIEWER_HTTP_ADDR";
pub const ENV_SCHEDULE_DIR: &str = "GANTT_VIEWER_SCHEDULE_DIR";
pub const ENV_EXPORT_DIR: &str = "GANTT_VIEWER_EXPORT_DIR";
pub const ENV_DEBUG: &str = "GANTT_VIEWER_DEBUG";
pub const ENV_LOG_JSON: &str = "GANTT_VIEWER_LOG_JSON";
pub const ENV_PAGE_TITLE: &str = "GANTT_VIEWER_PAGE_TITLE";

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SCHEDULE_DIR: &str = "json";
pub const DEFAULT_EXPORT_DIR: &str = ".";
pub const DEFAULT_PAGE_TITLE: &str = "Project Gantt Chart";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    pub schedule_dir: PathBuf,
    pub export_dir: PathBuf,
    pub debug: bool,
    pub log_json: bool,
    pub page_title: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a socket address like 0.0.0.0:3000 (got '{value}')")]
    InvalidAddr { name: &'static str, value: String },
    #[error("{name} must be true or false (got '{value}')")]
    InvalidBool { name: &'static str, value: String },
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            schedule_dir: PathBuf::from(DEFAULT_SCHEDULE_DIR),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            debug: false,
            log_json: false,
            page_title: DEFAULT_PAGE_TITLE.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; unset or blank values
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let http_addr = match value(ENV_HTTP_ADDR) {
            Some(raw) => raw
                .trim()
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::InvalidAddr {
                    name: ENV_HTTP_ADDR,
                    value: raw,
                })?,
            None => defaults.http_addr,
        };

        Ok(Self {
            http_addr,
            schedule_dir: value(ENV_SCHEDULE_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.schedule_dir),
            export_dir: value(ENV_EXPORT_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            debug: parse_bool(ENV_DEBUG, value(ENV_DEBUG), defaults.debug)?,
            log_json: parse_bool(ENV_LOG_JSON, value(ENV_LOG_JSON), defaults.log_json)?,
            page_title: value(ENV_PAGE_TITLE).unwrap_or(defaults.page_title),
        })
    }

    pub fn default_log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}

fn parse_bool(name: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { name, value: raw }),
    }
}

//! Server configuration, read once from a TOML file at startup.

use crate::calendar::Calendar;
use crate::constants::{DEFAULT_IDENTITY_ENDPOINT, DEFAULT_IDENTITY_TIMEOUT_SECS, MAX_IDENTITY_TIMEOUT_SECS};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required key '{0}'")]
    Missing(&'static str),

    #[error("db_path {0} does not exist")]
    DbNotFound(PathBuf),

    #[error("listen_port must be non-zero")]
    InvalidPort,

    #[error("invalid identity_endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("utc_offset_minutes {0} is out of range")]
    InvalidUtcOffset(i32),
}

/// File layout; every key optional so missing ones get a precise error.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    allowed_fb_uids: Vec<String>,
    db_path: Option<PathBuf>,
    listen_port: Option<u16>,
    static_path: Option<PathBuf>,
    identity_endpoint: Option<String>,
    identity_timeout_secs: Option<u64>,
    utc_offset_minutes: Option<i32>,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider ids allowed through the gate; empty admits everyone.
    pub allowed_fb_uids: Vec<String>,
    pub db_path: PathBuf,
    pub listen_port: u16,
    pub static_path: PathBuf,
    pub identity_endpoint: Url,
    pub identity_timeout: Duration,
    pub calendar: Calendar,
}

impl Config {
    /// Read and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let db_path = raw.db_path.ok_or(ConfigError::Missing("db_path"))?;
        if !db_path.exists() {
            return Err(ConfigError::DbNotFound(db_path));
        }

        let listen_port = raw.listen_port.ok_or(ConfigError::Missing("listen_port"))?;
        if listen_port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        let identity_endpoint = Url::parse(
            raw.identity_endpoint.as_deref().unwrap_or(DEFAULT_IDENTITY_ENDPOINT),
        )?;

        let timeout_secs = raw
            .identity_timeout_secs
            .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_SECS)
            .clamp(1, MAX_IDENTITY_TIMEOUT_SECS);

        let calendar = match raw.utc_offset_minutes {
            Some(minutes) => Calendar::from_offset_minutes(Some(minutes))
                .ok_or(ConfigError::InvalidUtcOffset(minutes))?,
            None => Calendar::Local,
        };

        Ok(Self {
            allowed_fb_uids: raw.allowed_fb_uids,
            db_path,
            listen_port,
            static_path: raw.static_path.unwrap_or_else(|| PathBuf::from("static")),
            identity_endpoint,
            identity_timeout: Duration::from_secs(timeout_secs),
            calendar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn with_db(extra: &str) -> (String, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = dir.path().join("gtd.db");
        std::fs::write(&db, b"").unwrap();
        let path = db.display().to_string();
        let text = format!("db_path = {path:?}\n{extra}");
        (text, dir)
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let (text, _dir) = with_db("listen_port = 8080");
        let config = Config::parse(&text).unwrap();

        assert_eq!(config.listen_port, 8080);
        assert!(config.allowed_fb_uids.is_empty());
        assert_eq!(config.static_path, PathBuf::from("static"));
        assert_eq!(config.identity_endpoint.as_str(), DEFAULT_IDENTITY_ENDPOINT);
        assert_eq!(config.identity_timeout, Duration::from_secs(DEFAULT_IDENTITY_TIMEOUT_SECS));
        assert_eq!(config.calendar, Calendar::Local);
    }

    #[test]
    fn test_full_config() {
        let (text, _dir) = with_db(
            r#"
listen_port = 9000
allowed_fb_uids = ["10", "20"]
static_path = "/srv/gtd/static"
identity_endpoint = "http://127.0.0.1:4000/me"
identity_timeout_secs = 500
utc_offset_minutes = -300
"#,
        );
        let config = Config::parse(&text).unwrap();

        assert_eq!(config.allowed_fb_uids, ["10", "20"]);
        assert_eq!(config.static_path, PathBuf::from("/srv/gtd/static"));
        assert_eq!(config.identity_endpoint.as_str(), "http://127.0.0.1:4000/me");
        assert_eq!(config.identity_timeout, Duration::from_secs(MAX_IDENTITY_TIMEOUT_SECS));
        assert_eq!(config.calendar, Calendar::from_offset_minutes(Some(-300)).unwrap());
    }

    #[test]
    fn test_missing_required_keys() {
        let err = Config::parse("listen_port = 8080").unwrap_err();
        assert!(matches!(err, ConfigError::Missing("db_path")));

        let (text, _dir) = with_db("");
        let err = Config::parse(&text).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("listen_port")));
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Config::parse("db_path = \"/nonexistent/gtd.db\"\nlisten_port = 1").unwrap_err();
        assert!(matches!(err, ConfigError::DbNotFound(_)));

        let (text, _dir) = with_db("listen_port = 0");
        assert!(matches!(Config::parse(&text).unwrap_err(), ConfigError::InvalidPort));

        let (text, _dir) = with_db("listen_port = 1\nidentity_endpoint = \"not a url\"");
        assert!(matches!(Config::parse(&text).unwrap_err(), ConfigError::InvalidEndpoint(_)));

        let (text, _dir) = with_db("listen_port = 1\nutc_offset_minutes = 100000");
        assert!(matches!(Config::parse(&text).unwrap_err(), ConfigError::InvalidUtcOffset(100000)));

        assert!(matches!(Config::parse("listen_port = \"x\"").unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/gtd.conf")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

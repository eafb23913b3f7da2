//! Startup configuration resolved from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::BaseDirs;
use thiserror::Error;

use crate::db::DB_FILE_NAME;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".virtual-bookshelf";
const LOG_FILE_NAME: &str = "bookshelf.log";
/// How long success notices stay in the footer.
pub const DEFAULT_NOTICE_SECS: u64 = 3;

pub const HOME_VAR: &str = "BOOKSHELF_HOME";
pub const CATALOG_VAR: &str = "BOOKSHELF_CATALOG";
pub const NOTICE_VAR: &str = "BOOKSHELF_NOTICE_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("could not locate home directory; set BOOKSHELF_HOME")]
    NoHomeDirectory,

    #[error("{var} must be a whole number of seconds, got `{value}`")]
    InvalidSeconds { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Replaces the built-in catalog when set.
    pub catalog_path: Option<PathBuf>,
    pub notice_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve the configuration through an arbitrary variable lookup so tests
    /// do not have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match lookup(HOME_VAR).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let catalog_path = lookup(CATALOG_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let notice_ttl = match lookup(NOTICE_VAR) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeconds {
                        var: NOTICE_VAR,
                        value: raw.clone(),
                    })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_NOTICE_SECS),
        };

        Ok(Self {
            data_dir,
            catalog_path,
            notice_ttl,
        })
    }

    /// Configuration rooted at an explicit directory with default settings.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            catalog_path: None,
            notice_ttl: Duration::from_secs(DEFAULT_NOTICE_SECS),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

fn default_data_dir() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn explicit_values_win() {
        let config = Config::from_lookup(lookup(&[
            (HOME_VAR, "/tmp/shelf"),
            (CATALOG_VAR, "/tmp/books.json"),
            (NOTICE_VAR, "5"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/shelf"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/books.json")));
        assert_eq!(config.notice_ttl, Duration::from_secs(5));
        assert_eq!(config.db_path(), PathBuf::from("/tmp/shelf/bookshelf.sqlite"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/shelf/bookshelf.log"));
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[(HOME_VAR, "/tmp/shelf")])).unwrap();
        assert_eq!(config.catalog_path, None);
        assert_eq!(config.notice_ttl, Duration::from_secs(DEFAULT_NOTICE_SECS));
        assert_eq!(config, Config::with_data_dir("/tmp/shelf"));
    }

    #[test]
    fn rejects_non_numeric_notice_lifetime() {
        let err = Config::from_lookup(lookup(&[(HOME_VAR, "/tmp/shelf"), (NOTICE_VAR, "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidSeconds {
                var: NOTICE_VAR,
                value: "soon".into()
            }
        );
    }
}

use std::path::PathBuf;

use thiserror::Error;

pub const ENV_REMOTE_URL: &str = "FINPLAN_REMOTE_URL";
pub const ENV_API_KEY: &str = "FINPLAN_API_KEY";
pub const ENV_ACCESS_TOKEN: &str = "FINPLAN_ACCESS_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "FINPLAN_TIMEOUT_SECS";
pub const ENV_DB: &str = "FINPLAN_DB";
pub const ENV_LOG: &str = "FINPLAN_LOG";
pub const ENV_LOG_DIR: &str = "FINPLAN_LOG_DIR";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{0} is set but {1} is missing")]
    Missing(&'static str, &'static str),
    #[error("no data directory available; set {0}")]
    NoDataDir(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
    /// Signed-in user's token; the API key is used as bearer when absent.
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Local { db_path: PathBuf },
    Remote(RemoteConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: BackendConfig,
    pub log_filter: Option<String>,
    /// Directory for the rolling JSON log file; stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

pub fn default_db_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::data_dir().ok_or(ConfigError::NoDataDir(ENV_DB))?;
    Ok(base.join("finplan").join("finplan.sqlite3"))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match get(ENV_REMOTE_URL) {
            Some(base_url) => {
                let api_key = get(ENV_API_KEY).ok_or(ConfigError::Missing(ENV_REMOTE_URL, ENV_API_KEY))?;
                let timeout_secs = match get(ENV_TIMEOUT_SECS) {
                    Some(raw) => match raw.trim().parse::<u64>() {
                        Ok(n) if n > 0 => n,
                        _ => {
                            return Err(ConfigError::InvalidNumber {
                                var: ENV_TIMEOUT_SECS,
                                value: raw,
                            })
                        }
                    },
                    None => DEFAULT_TIMEOUT_SECS,
                };
                BackendConfig::Remote(RemoteConfig {
                    base_url,
                    api_key,
                    access_token: get(ENV_ACCESS_TOKEN),
                    timeout_secs,
                })
            }
            None => {
                let db_path = match get(ENV_DB) {
                    Some(path) => PathBuf::from(path),
                    None => default_db_path()?,
                };
                BackendConfig::Local { db_path }
            }
        };

        Ok(Config {
            backend,
            log_filter: get(ENV_LOG),
            log_dir: get(ENV_LOG_DIR).map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn local_db_from_env() {
        let cfg = Config::from_lookup(lookup(&[(ENV_DB, "/tmp/fp.sqlite3")])).unwrap();
        assert_eq!(
            cfg.backend,
            BackendConfig::Local {
                db_path: PathBuf::from("/tmp/fp.sqlite3")
            }
        );
        assert_eq!(cfg.log_filter, None);
        assert_eq!(cfg.log_dir, None);
    }

    #[test]
    fn log_dir_from_env() {
        let cfg = Config::from_lookup(lookup(&[
            (ENV_DB, "/tmp/fp.sqlite3"),
            (ENV_LOG_DIR, "/var/log/finplan"),
            (ENV_LOG, "finplan=debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.log_dir, Some(PathBuf::from("/var/log/finplan")));
        assert_eq!(cfg.log_filter.as_deref(), Some("finplan=debug"));
    }

    #[test]
    fn remote_defaults_timeout() {
        let cfg = Config::from_lookup(lookup(&[
            (ENV_REMOTE_URL, "https://example.test"),
            (ENV_API_KEY, "anon"),
        ]))
        .unwrap();
        match cfg.backend {
            BackendConfig::Remote(remote) => {
                assert_eq!(remote.timeout_secs, DEFAULT_TIMEOUT_SECS);
                assert_eq!(remote.access_token, None);
            }
            other => panic!("expected remote, got {other:?}"),
        }
    }

    #[test]
    fn remote_requires_api_key() {
        let err = Config::from_lookup(lookup(&[(ENV_REMOTE_URL, "https://example.test")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_REMOTE_URL, ENV_API_KEY));
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = Config::from_lookup(lookup(&[
            (ENV_REMOTE_URL, "https://example.test"),
            (ENV_API_KEY, "anon"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }
}

use crate::api::{DEFAULT_API_BASE, DEFAULT_TIMEOUT};
use crate::db;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings, read from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the question service, without a trailing slash.
    pub api_base: String,
    pub api_timeout: Duration,
    /// Holds the history database and the log file.
    pub data_dir: PathBuf,
    /// Display name for the local profile; unset means signed out.
    pub user: Option<String>,
    pub id_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_timeout: DEFAULT_TIMEOUT,
            data_dir: db::default_data_dir(),
            user: None,
            id_token: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            api_base: non_empty("STUDY_API_BASE").unwrap_or(default.api_base),
            api_timeout: non_empty("STUDY_API_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(default.api_timeout),
            data_dir: non_empty("STUDY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.data_dir),
            user: non_empty("STUDY_USER"),
            id_token: non_empty("STUDY_ID_TOKEN"),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        db::db_path(&self.data_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("study-session.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.api_base, "http://localhost:8080/api");
        assert_eq!(config.api_timeout, Duration::from_secs(60));
        assert!(config.data_dir.ends_with("study-session"));
        assert!(config.user.is_none());
        assert!(config.id_token.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("STUDY_API_BASE", "https://study.example.com/api"),
            ("STUDY_API_TIMEOUT_SECS", "15"),
            ("STUDY_DATA_DIR", "/tmp/study"),
            ("STUDY_USER", "Ada"),
            ("STUDY_ID_TOKEN", "tok"),
        ]);
        assert_eq!(config.api_base, "https://study.example.com/api");
        assert_eq!(config.api_timeout, Duration::from_secs(15));
        assert_eq!(config.db_path(), PathBuf::from("/tmp/study/history.db"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/study/study-session.log"));
        assert_eq!(config.user.as_deref(), Some("Ada"));
        assert_eq!(config.id_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("STUDY_API_TIMEOUT_SECS", "soon"),
            ("STUDY_USER", "   "),
            ("STUDY_API_BASE", ""),
        ]);
        assert_eq!(config.api_timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert!(config.user.is_none());

        let config = config_from(&[("STUDY_API_TIMEOUT_SECS", "0")]);
        assert_eq!(config.api_timeout, DEFAULT_TIMEOUT);
    }
}

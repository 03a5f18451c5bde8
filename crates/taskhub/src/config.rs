use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::projection::DEFAULT_OVERDUE_LIMIT;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_STATE_FILE: &str = "taskhub-state.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub state_file: PathBuf,
    pub overdue_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            api_url: lookup("TASKHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            state_file: lookup("TASKHUB_STATE_FILE")
                .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string())
                .into(),
            overdue_limit: lookup("TASKHUB_OVERDUE_LIMIT")
                .unwrap_or_else(|| DEFAULT_OVERDUE_LIMIT.to_string())
                .parse()
                .context("TASKHUB_OVERDUE_LIMIT must be a valid number")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.state_file, PathBuf::from(DEFAULT_STATE_FILE));
        assert_eq!(config.overdue_limit, 3);
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let vars: HashMap<&str, &str> = [
            ("TASKHUB_API_URL", "https://taskhub.example.com/api"),
            ("TASKHUB_OVERDUE_LIMIT", "5"),
        ]
        .into_iter()
        .collect();
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_url, "https://taskhub.example.com/api");
        assert_eq!(config.overdue_limit, 5);

        let err = AppConfig::from_lookup(|k| {
            (k == "TASKHUB_OVERDUE_LIMIT").then(|| "three".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("TASKHUB_OVERDUE_LIMIT"));
    }
}

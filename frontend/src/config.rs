use std::{str::FromStr, time::Duration};

use log::warn;
use maze::{SessionConfig, DEFAULT_THRESHOLD};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Settings for the frontend. Every value can be overridden through an
/// environment variable, invalid values fall back to the default.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend_url: String,
    pub threshold: u8,
    pub notice: Duration,
    pub advisory: Duration,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_owned(),
            threshold: DEFAULT_THRESHOLD,
            notice: Duration::from_millis(1200),
            advisory: Duration::from_millis(5000),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let backend_url = lookup("MAZE_BACKEND_URL")
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.backend_url);

        Self {
            backend_url,
            threshold: parse_or(&lookup, "MAZE_THRESHOLD", defaults.threshold),
            notice: Duration::from_millis(parse_or(&lookup, "MAZE_NOTICE_MS", 1200)),
            advisory: Duration::from_millis(parse_or(&lookup, "MAZE_ADVISORY_MS", 5000)),
            http_timeout: Duration::from_secs(parse_or(&lookup, "MAZE_HTTP_TIMEOUT_SECS", 30)),
        }
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            threshold: self.threshold,
            notice_duration: self.notice,
            advisory_duration: self.advisory,
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    let Some(value) = lookup(key) else {
        return default;
    };
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!("ignoring invalid {}={:?}", key, value);
            default
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.session(), SessionConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("MAZE_BACKEND_URL", "http://maze.local:9000/"),
            ("MAZE_THRESHOLD", "128"),
            ("MAZE_NOTICE_MS", "500"),
            ("MAZE_ADVISORY_MS", " 2000 "),
            ("MAZE_HTTP_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.backend_url, "http://maze.local:9000");
        assert_eq!(config.threshold, 128);
        assert_eq!(config.notice, Duration::from_millis(500));
        assert_eq!(config.advisory, Duration::from_secs(2));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[
            ("MAZE_BACKEND_URL", "  "),
            ("MAZE_THRESHOLD", "300"),
            ("MAZE_NOTICE_MS", "soon"),
        ]);
        assert_eq!(config, Config::default());
    }
}

//! Configuration file support
//!
//! Loads settings from ~/.synta-view.toml (or %USERPROFILE%\.synta-view.toml
//! on Windows), or from an explicit path given on the command line.
//!
//! Example:
//! ```text
//! # synta-view configuration
//! endpoint = "http://localhost:8080/api/analyze"
//! timeout-secs = 30
//! trigger = "C-r"
//! line-numbers = true
//! tab-width = 4
//! log-file = "/tmp/synta-view.log"
//! log-level = "debug"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::error::{Result, ViewError};
use crate::surface::KeyChord;

/// Analyzer endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/api/analyze";

/// Configuration settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Analyzer URL requests are POSTed to
    pub endpoint: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Key chord that runs the analysis
    pub trigger: KeyChord,
    /// Whether to show line numbers
    pub show_line_numbers: bool,
    /// Tab width for display
    pub tab_width: usize,
    /// Where log output goes in interactive mode
    pub log_file: Option<PathBuf>,
    /// Default tracing filter directive
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            trigger: KeyChord::default(),
            show_line_numbers: false,
            tab_width: 8,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

/// Settings as written in the file; every key is optional
///
/// A value of the wrong type is dropped with a warning and its default
/// kept. Only a TOML syntax error fails the whole file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Settings {
    #[serde(default, deserialize_with = "lenient")]
    endpoint: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    timeout_secs: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    trigger: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    line_numbers: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    tab_width: Option<usize>,
    #[serde(default, deserialize_with = "lenient")]
    log_file: Option<PathBuf>,
    #[serde(default, deserialize_with = "lenient")]
    log_level: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = toml::Value::deserialize(deserializer)?;
    match T::deserialize(value.clone()) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            warn!(%value, error = %e, "ignoring invalid configuration value");
            Ok(None)
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".synta-view.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".synta-view.toml"))
        }
    }

    /// Load configuration from the default location
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let settings = Self::parse(&contents)
            .map_err(|e| ViewError::Config(format!("{}: {}", path.display(), e)))?;

        let mut config = Config::default();
        config.apply(&settings);
        Ok(config)
    }

    /// Parse config file contents
    fn parse(contents: &str) -> std::result::Result<Settings, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Apply settings from a parsed config
    fn apply(&mut self, settings: &Settings) {
        if let Some(endpoint) = settings.endpoint.as_deref().map(str::trim) {
            if !endpoint.is_empty() {
                self.endpoint = endpoint.to_string();
            }
        }

        if let Some(secs) = settings.timeout_secs {
            self.timeout = Duration::from_secs(secs.clamp(1, 300));
        }

        if let Some(trigger) = &settings.trigger {
            match KeyChord::parse(trigger) {
                Some(chord) => self.trigger = chord,
                None => warn!(%trigger, "ignoring unrecognised trigger chord"),
            }
        }

        if let Some(line_numbers) = settings.line_numbers {
            self.show_line_numbers = line_numbers;
        }

        if let Some(width) = settings.tab_width {
            self.tab_width = width.clamp(1, 16);
        }

        if let Some(path) = &settings.log_file {
            self.log_file = Some(path.clone());
        }

        if let Some(level) = settings.log_level.as_deref().map(str::trim) {
            if !level.is_empty() {
                self.log_level = level.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
endpoint = "http://analyzer:9000/api/analyze"
timeout-secs = 5
trigger = "F5"
line-numbers = true
tab-width = 4
        "#;

        let settings = Config::parse(contents).unwrap();
        assert_eq!(settings.endpoint.as_deref(), Some("http://analyzer:9000/api/analyze"));
        assert_eq!(settings.timeout_secs, Some(5));
        assert_eq!(settings.trigger.as_deref(), Some("F5"));
        assert_eq!(settings.line_numbers, Some(true));
        assert_eq!(settings.tab_width, Some(4));
        assert_eq!(settings.log_file, None);
    }

    #[test]
    fn test_apply_settings() {
        let mut config = Config::default();
        let settings = Settings {
            endpoint: Some("http://example/analyze".into()),
            timeout_secs: Some(10_000),
            trigger: Some("C-x C-r".into()),
            line_numbers: Some(true),
            tab_width: Some(0),
            log_file: Some(PathBuf::from("/tmp/view.log")),
            log_level: Some("debug".into()),
        };

        config.apply(&settings);

        assert_eq!(config.endpoint, "http://example/analyze");
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.trigger.to_string(), "C-x C-r");
        assert!(config.show_line_numbers);
        assert_eq!(config.tab_width, 1);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/view.log")));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let mut config = Config::default();
        let settings = Settings {
            endpoint: Some("   ".into()),
            trigger: Some("Hyper-q".into()),
            ..Default::default()
        };
        config.apply(&settings);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let settings = Config::parse("theme = \"dark\"\ntab-width = 2\n").unwrap();
        assert_eq!(settings.tab_width, Some(2));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = \"http://127.0.0.1:1/analyze\"").unwrap();
        writeln!(file, "line-numbers = true").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:1/analyze");
        assert!(config.show_line_numbers);
        assert_eq!(config.tab_width, 8);
    }

    #[test]
    fn test_load_from_keeps_default_for_bad_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = \"http://a/b\"").unwrap();
        writeln!(file, "tab-width = \"wide\"").unwrap();
        writeln!(file, "timeout-secs = -5").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.endpoint, "http://a/b");
        assert_eq!(config.tab_width, 8);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_load_from_rejects_bad_syntax() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tab-width = = 4").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ViewError::Config(_)));
    }
}

//! Persistent user preferences.

use std::{
    env, fmt,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/calcular";
pub const ENDPOINT_ENV: &str = "CARBON_QUIZ_ENDPOINT";
pub const CONFIG_DIR_ENV: &str = "CARBON_QUIZ_CONFIG_DIR";
const APP_DIR: &str = "carbon_quiz";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";
const MAX_TIMEOUT_SECS: u64 = 300;
const MAX_NOTICE_SECONDS: u64 = 600;

/// Keys accepted by `config set`.
pub const CONFIG_KEYS: [&str; 8] = [
    "endpoint",
    "timeout_secs",
    "currency_symbol",
    "notice_seconds",
    "report_dir",
    "open_reports",
    "ui_color_enabled",
    "plain_output",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_endpoint")]
    pub endpoint: String,
    #[serde(default = "Config::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_notice_seconds")]
    pub notice_seconds: u64,
    /// Where reports are written. Defaults to `~/Documents/CarbonReports`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,
    #[serde(default = "Config::default_true")]
    pub open_reports: bool,
    #[serde(default = "Config::default_true")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            timeout_secs: Self::default_timeout_secs(),
            currency_symbol: Self::default_currency_symbol(),
            notice_seconds: Self::default_notice_seconds(),
            report_dir: None,
            open_reports: true,
            ui_color_enabled: true,
            plain_output: false,
        }
    }
}

impl Config {
    fn default_endpoint() -> String {
        DEFAULT_ENDPOINT.into()
    }

    fn default_timeout_secs() -> u64 {
        15
    }

    fn default_currency_symbol() -> String {
        "R$".into()
    }

    fn default_notice_seconds() -> u64 {
        3
    }

    fn default_true() -> bool {
        true
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_seconds)
    }

    pub fn resolve_report_dir(&self) -> PathBuf {
        if let Some(path) = &self.report_dir {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("CarbonReports")
    }

    /// Applies `CARBON_QUIZ_ENDPOINT` and `NO_COLOR` on top of the stored values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = env::var(ENDPOINT_ENV) {
            let endpoint = endpoint.trim();
            if !endpoint.is_empty() {
                self.endpoint = endpoint.to_string();
            }
        }
        if env::var_os("NO_COLOR").is_some() {
            self.ui_color_enabled = false;
        }
    }

    /// Validates and stores a single preference.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "endpoint" => self.endpoint = validate_endpoint(value)?,
            "timeout_secs" => self.timeout_secs = parse_bounded(key, value, MAX_TIMEOUT_SECS)?,
            "currency_symbol" => {
                if value.is_empty() {
                    return Err(invalid(key, "must not be empty"));
                }
                self.currency_symbol = value.to_string();
            }
            "notice_seconds" => {
                self.notice_seconds = parse_bounded(key, value, MAX_NOTICE_SECONDS)?
            }
            "report_dir" => {
                self.report_dir = match value {
                    "" | "default" => None,
                    path => Some(PathBuf::from(path)),
                }
            }
            "open_reports" => self.open_reports = parse_bool(key, value)?,
            "ui_color_enabled" => self.ui_color_enabled = parse_bool(key, value)?,
            "plain_output" => self.plain_output = parse_bool(key, value)?,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Applies the `set_value` rules to values read from disk.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint(self.endpoint.trim())?;
        check_bounded("timeout_secs", self.timeout_secs, MAX_TIMEOUT_SECS)?;
        check_bounded("notice_seconds", self.notice_seconds, MAX_NOTICE_SECONDS)?;
        if self.currency_symbol.trim().is_empty() {
            return Err(invalid("currency_symbol", "must not be empty"));
        }
        Ok(())
    }

    /// `(key, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("endpoint", self.endpoint.clone()),
            ("timeout_secs", self.timeout_secs.to_string()),
            ("currency_symbol", self.currency_symbol.clone()),
            ("notice_seconds", self.notice_seconds.to_string()),
            (
                "report_dir",
                self.resolve_report_dir().display().to_string(),
            ),
            ("open_reports", self.open_reports.to_string()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
            ("plain_output", self.plain_output.to_string()),
        ]
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.entries() {
            writeln!(f, "{key:<18} {value}")?;
        }
        Ok(())
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

fn validate_endpoint(value: &str) -> Result<String, ConfigError> {
    let lower = value.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("http://")
        .or_else(|| lower.strip_prefix("https://"))
        .ok_or_else(|| invalid("endpoint", "expected an http:// or https:// URL"))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(invalid("endpoint", "missing host"));
    }
    Ok(value.to_string())
}

fn parse_bounded(key: &str, value: &str, max: u64) -> Result<u64, ConfigError> {
    let n = value
        .parse::<u64>()
        .map_err(|_| invalid(key, format!("expected a whole number from 1 to {max}")))?;
    check_bounded(key, n, max)
}

fn check_bounded(key: &str, n: u64, max: u64) -> Result<u64, ConfigError> {
    if (1..=max).contains(&n) {
        Ok(n)
    } else {
        Err(invalid(key, format!("expected a whole number from 1 to {max}")))
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(key, "expected true or false")),
    }
}

/// Handles persistence for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Uses `CARBON_QUIZ_CONFIG_DIR` when set, else the platform config dir.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| {
                    ConfigError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "no configuration directory available",
                    ))
                })?,
        };
        Ok(Self::with_base_dir(base))
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        Self::new(base.join(CONFIG_FILE))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            let config: Config =
                serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))?;
            config.validate()?;
            Ok(config)
        } else {
            debug!(path = %self.config_path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.config_path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf());
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.notice_ttl(), Duration::from_secs(3));
    }

    #[test]
    fn save_then_load_keeps_changes() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().join("nested"));
        let mut config = Config::default();
        config.set_value("currency_symbol", "US$").unwrap();
        config.set_value("open_reports", "no").unwrap();
        manager.save(&config).unwrap();

        assert!(!tmp_path(manager.config_path()).exists());
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf());
        fs::write(manager.config_path(), r#"{"timeout_secs": 4}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.timeout_secs, 4);
        assert_eq!(config.currency_symbol, "R$");
        assert!(config.ui_color_enabled);
    }

    #[test]
    fn corrupt_file_is_a_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf());
        fs::write(manager.config_path(), "{not json").unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
    }

    #[test]
    fn set_value_validates_input() {
        let mut config = Config::default();
        assert!(config.set_value("endpoint", "ftp://host").is_err());
        assert!(config.set_value("endpoint", "http://").is_err());
        assert!(config.set_value("timeout_secs", "0").is_err());
        assert!(config.set_value("plain_output", "maybe").is_err());
        assert!(matches!(
            config.set_value("colour", "true"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert_eq!(config, Config::default());

        config
            .set_value("endpoint", "https://api.example.org/calcular")
            .unwrap();
        assert_eq!(config.endpoint, "https://api.example.org/calcular");
    }

    #[test]
    fn durations_are_bounded() {
        let mut config = Config::default();
        for key in ["timeout_secs", "notice_seconds"] {
            assert!(config.set_value(key, "18446744073709551615").is_err(), "{key}");
            assert!(config.set_value(key, "601").is_err(), "{key}");
        }
        assert_eq!(config, Config::default());

        config.set_value("timeout_secs", "300").unwrap();
        config.set_value("notice_seconds", "600").unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(300));
        assert_eq!(config.notice_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn hand_edited_values_are_checked_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf());

        for body in [
            r#"{"timeout_secs": 0}"#,
            r#"{"notice_seconds": 18446744073709551615}"#,
            r#"{"endpoint": "ftp://host"}"#,
            r#"{"currency_symbol": "  "}"#,
        ] {
            fs::write(manager.config_path(), body).unwrap();
            assert!(
                matches!(manager.load(), Err(ConfigError::InvalidValue { .. })),
                "{body}"
            );
        }
    }

    #[test]
    fn report_dir_override_and_reset() {
        let mut config = Config::default();
        config.set_value("report_dir", "/tmp/reports").unwrap();
        assert_eq!(config.resolve_report_dir(), PathBuf::from("/tmp/reports"));
        config.set_value("report_dir", "default").unwrap();
        assert!(config.report_dir.is_none());
        assert!(config.resolve_report_dir().ends_with("CarbonReports"));
    }

    #[test]
    fn every_listed_key_is_settable() {
        let config = Config::default();
        let listed: Vec<&str> = config.entries().iter().map(|(key, _)| *key).collect();
        assert_eq!(listed, CONFIG_KEYS.to_vec());
    }
}

//! Runtime configuration.
//!
//! # Responsibility
//! - Describe logging settings and the external-load policy.
//! - Load them from JSON or from `MODWEAVE_*` environment variables.
//!
//! # Invariants
//! - A parsed `LogSettings::dir` is always absolute.
//! - Missing fields fall back to build-mode defaults.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "MODWEAVE_LOG_LEVEL";
/// Environment variable overriding the log directory.
pub const ENV_LOG_DIR: &str = "MODWEAVE_LOG_DIR";
/// Environment variable overriding the external-load policy.
pub const ENV_EXTERNAL_LOADS: &str = "MODWEAVE_EXTERNAL_LOADS";

const DEFAULT_LOG_DIR_NAME: &str = "modweave-logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parses a level case-insensitively; `warning` is accepted for `warn`.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(ConfigError::InvalidLevel(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// `debug` in debug builds, `info` in release builds.
    pub fn build_default() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// What happens to mods that are not integrated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalLoadPolicy {
    /// Queue the descriptor for a host-driven load pass.
    #[default]
    Defer,
    /// Log and continue without queueing.
    Skip,
}

impl ExternalLoadPolicy {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "defer" => Ok(Self::Defer),
            "skip" => Ok(Self::Skip),
            other => Err(ConfigError::InvalidPolicy(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ExternalLoadPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "LogLevel::build_default")]
    pub level: LogLevel,
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl LogSettings {
    pub fn new(level: LogLevel, dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self {
            level,
            dir: normalize_log_dir(dir.as_ref())?,
        })
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::build_default(),
            dir: default_log_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub log: LogSettings,
    #[serde(default)]
    pub external_loads: ExternalLoadPolicy,
}

impl RuntimeConfig {
    /// Parses a JSON document; absent fields take defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validated()
    }

    /// Builds a config from `MODWEAVE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.log.level = LogLevel::parse(&level)?;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            config.log.dir = PathBuf::from(dir.trim());
        }
        if let Some(policy) = lookup(ENV_EXTERNAL_LOADS) {
            config.external_loads = ExternalLoadPolicy::parse(&policy)?;
        }
        config.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        self.log.dir = normalize_log_dir(&self.log.dir)?;
        Ok(self)
    }
}

fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME)
}

fn normalize_log_dir(dir: &Path) -> Result<PathBuf, ConfigError> {
    if dir.as_os_str().is_empty() {
        return Err(ConfigError::EmptyLogDir);
    }
    if !dir.is_absolute() {
        return Err(ConfigError::RelativeLogDir(dir.to_path_buf()));
    }
    Ok(dir.to_path_buf())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLevel(String),
    InvalidPolicy(String),
    EmptyLogDir,
    RelativeLogDir(PathBuf),
    Parse(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidPolicy(value) => write!(
                f,
                "unsupported external load policy `{value}`; expected defer|skip"
            ),
            Self::EmptyLogDir => write!(f, "log dir cannot be empty"),
            Self::RelativeLogDir(path) => {
                write!(f, "log dir must be an absolute path, got `{}`", path.display())
            }
            Self::Parse(message) => write!(f, "invalid runtime config: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, ExternalLoadPolicy, LogLevel, RuntimeConfig, ENV_EXTERNAL_LOADS,
        ENV_LOG_DIR, ENV_LOG_LEVEL,
    };
    use std::collections::HashMap;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!(LogLevel::parse("INFO").expect("INFO parses"), LogLevel::Info);
        assert_eq!(LogLevel::parse(" warning ").expect("warning parses"), LogLevel::Warn);
        assert!(matches!(
            LogLevel::parse("verbose"),
            Err(ConfigError::InvalidLevel(_))
        ));
    }

    #[test]
    fn json_defaults_missing_fields() {
        let config = RuntimeConfig::from_json_str("{}").expect("empty object parses");
        assert_eq!(config.external_loads, ExternalLoadPolicy::Defer);
        assert!(config.log.dir.is_absolute());
        assert_eq!(config.log.level, LogLevel::build_default());
    }

    #[test]
    fn json_rejects_relative_log_dir() {
        let err = RuntimeConfig::from_json_str(r#"{"log": {"dir": "logs/dev"}}"#)
            .expect_err("relative dir must be rejected");
        assert!(matches!(err, ConfigError::RelativeLogDir(_)));
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn json_reads_policy_and_level() {
        let config = RuntimeConfig::from_json_str(
            r#"{"log": {"level": "warn"}, "external_loads": "skip"}"#,
        )
        .expect("config parses");
        assert_eq!(config.log.level, LogLevel::Warn);
        assert_eq!(config.external_loads, ExternalLoadPolicy::Skip);
    }

    #[test]
    fn json_level_is_case_insensitive() {
        for (raw, expected) in [
            ("WARNING", LogLevel::Warn),
            ("Info", LogLevel::Info),
            ("warning", LogLevel::Warn),
        ] {
            let document = format!(r#"{{"log": {{"level": "{raw}"}}, "external_loads": "SKIP"}}"#);
            let config = RuntimeConfig::from_json_str(&document).expect("mixed-case config parses");
            assert_eq!(config.log.level, expected, "level `{raw}`");
            assert_eq!(config.external_loads, ExternalLoadPolicy::Skip);
        }

        let err = RuntimeConfig::from_json_str(r#"{"log": {"level": "verbose"}}"#)
            .expect_err("unknown level must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn lookup_overrides_defaults() {
        let dir = std::env::temp_dir().join("modweave-config-test");
        let vars: HashMap<&str, String> = HashMap::from([
            (ENV_LOG_LEVEL, "ERROR".to_string()),
            (ENV_LOG_DIR, dir.display().to_string()),
            (ENV_EXTERNAL_LOADS, "skip".to_string()),
        ]);

        let config =
            RuntimeConfig::from_lookup(|key| vars.get(key).cloned()).expect("lookup config");
        assert_eq!(config.log.level, LogLevel::Error);
        assert_eq!(config.log.dir, dir);
        assert_eq!(config.external_loads, ExternalLoadPolicy::Skip);
    }

    #[test]
    fn lookup_rejects_unknown_policy() {
        let err = RuntimeConfig::from_lookup(|key| {
            (key == ENV_EXTERNAL_LOADS).then(|| "eager".to_string())
        })
        .expect_err("unknown policy must fail");
        assert_eq!(err, ConfigError::InvalidPolicy("eager".to_string()));
    }
}

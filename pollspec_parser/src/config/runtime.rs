// RUNTIME PREFERENCES (User Experience)

use crate::logging::{codes, Code};
use crate::macros::MacroOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Errors raised while loading runtime configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::Io { .. } => codes::config::CONFIG_IO_ERROR,
            Self::Parse(_) => codes::config::CONFIG_PARSE_ERROR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserPreferences {
    /// Whether `{$MACRO}` operands are accepted where a literal is expected
    pub allow_user_macros: bool,

    /// Whether `{#MACRO}` and `{{#MACRO}.func()}` operands are accepted
    pub allow_lld_macros: bool,

    /// Whether a partial match counts as failure for whole-string callers
    pub require_full_match: bool,

    /// Whether parsed intervals go through the semantic validation pass
    pub validate_semantics: bool,
}

impl ParserPreferences {
    /// Macro interpolation flags derived from these preferences
    pub fn macro_options(&self) -> MacroOptions {
        MacroOptions {
            allow_user_macros: self.allow_user_macros,
            allow_lld_macros: self.allow_lld_macros,
        }
    }
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            allow_user_macros: env::var("POLLSPEC_ALLOW_USER_MACROS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            allow_lld_macros: env::var("POLLSPEC_ALLOW_LLD_MACROS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            require_full_match: env::var("POLLSPEC_REQUIRE_FULL_MATCH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            validate_semantics: env::var("POLLSPEC_VALIDATE_SEMANTICS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// Whether to enable console output (user preference)
    pub enable_console_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var("POLLSPEC_LOGGING_USE_STRUCTURED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var("POLLSPEC_LOGGING_ENABLE_CONSOLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var("POLLSPEC_LOGGING_MIN_LEVEL")
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub parser: ParserPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse a configuration document; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Parser
    pub const ALLOW_USER_MACROS: &str = "POLLSPEC_ALLOW_USER_MACROS";
    pub const ALLOW_LLD_MACROS: &str = "POLLSPEC_ALLOW_LLD_MACROS";
    pub const REQUIRE_FULL_MATCH: &str = "POLLSPEC_REQUIRE_FULL_MATCH";
    pub const VALIDATE_SEMANTICS: &str = "POLLSPEC_VALIDATE_SEMANTICS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "POLLSPEC_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "POLLSPEC_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "POLLSPEC_LOGGING_MIN_LEVEL";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_toml_overrides_selected_keys() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [parser]
            allow_lld_macros = true
            require_full_match = false

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.parser.allow_lld_macros);
        assert!(!config.parser.require_full_match);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
    }

    #[test]
    fn test_macro_options_follow_preferences() {
        let prefs = ParserPreferences {
            allow_user_macros: false,
            allow_lld_macros: true,
            require_full_match: true,
            validate_semantics: false,
        };
        let options = prefs.macro_options();
        assert!(!options.allow_user_macros);
        assert!(options.allow_lld_macros);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[parser]\nallow_user_macros = false").unwrap();

        let config = RuntimeConfig::load(file.path()).unwrap();
        assert!(!config.parser.allow_user_macros);
    }

    #[test]
    fn test_load_errors_carry_codes() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let err = RuntimeConfig::load(&missing).unwrap_err();
        assert_matches!(err, ConfigError::Io { .. });
        assert_eq!(err.error_code(), codes::config::CONFIG_IO_ERROR);

        let err = RuntimeConfig::from_toml_str("[parser\n").unwrap_err();
        assert_matches!(err, ConfigError::Parse(_));
        assert_eq!(err.error_code(), codes::config::CONFIG_PARSE_ERROR);
    }

    #[test]
    fn test_env_var_names_exist() {
        assert!(!env_vars::ALLOW_USER_MACROS.is_empty());
        assert!(!env_vars::LOGGING_MIN_LEVEL.is_empty());
    }
}

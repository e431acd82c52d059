//! Run configuration read from a TOML document:
//!
//! ```toml
//! [rewrite]
//! max_rounds = 8          # omitted => until convergence
//!
//! [compile]
//! backend = "closure"     # or "program"
//!
//! [log]
//! level = "info"          # off, error, warn, info, debug, trace
//! console = true
//! file = "rewrite.log"
//! ```
//! Every section and key is optional.

use crate::symbolic::lambdify::Backend;
use crate::symbolic::rewrite::{Rewriter, UNBOUNDED};
use simplelog::LevelFilter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use toml::{Table, Value};

/// Error types for loading a configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// `key` holds a value of the wrong type or out of range
    InvalidValue { key: String, expected: &'static str },
    UnknownBackend(String),
    UnknownLevel(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "Cannot read configuration: {}", err),
            ConfigError::Parse(err) => write!(f, "Invalid TOML: {}", err),
            ConfigError::InvalidValue { key, expected } => {
                write!(f, "Invalid value for '{}': expected {}", key, expected)
            }
            ConfigError::UnknownBackend(name) => write!(f, "Unknown backend: {}", name),
            ConfigError::UnknownLevel(name) => write!(f, "Unknown log level: {}", name),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub console: bool,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: LevelFilter::Info,
            console: true,
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewriteConfig {
    /// [`UNBOUNDED`] runs until convergence
    pub max_rounds: usize,
    pub backend: Backend,
    pub log: LogConfig,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        RewriteConfig {
            max_rounds: UNBOUNDED,
            backend: Backend::default(),
            log: LogConfig::default(),
        }
    }
}

impl RewriteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let document: Table = toml::from_str(text)?;
        let mut config = RewriteConfig::default();

        if let Some(rewrite) = section(&document, "rewrite")? {
            if let Some(value) = rewrite.get("max_rounds") {
                config.max_rounds = value
                    .as_integer()
                    .and_then(|rounds| usize::try_from(rounds).ok())
                    .ok_or_else(|| invalid("rewrite.max_rounds", "a non-negative integer"))?;
            }
        }

        if let Some(compile) = section(&document, "compile")? {
            if let Some(value) = compile.get("backend") {
                let name = string(value, "compile.backend")?;
                config.backend = Backend::from_str(name)
                    .map_err(|_| ConfigError::UnknownBackend(name.to_string()))?;
            }
        }

        if let Some(log) = section(&document, "log")? {
            if let Some(value) = log.get("level") {
                let name = string(value, "log.level")?;
                config.log.level = LevelFilter::from_str(name)
                    .map_err(|_| ConfigError::UnknownLevel(name.to_string()))?;
            }
            if let Some(value) = log.get("console") {
                config.log.console = value
                    .as_bool()
                    .ok_or_else(|| invalid("log.console", "a boolean"))?;
            }
            if let Some(value) = log.get("file") {
                config.log.file = Some(PathBuf::from(string(value, "log.file")?));
            }
        }
        Ok(config)
    }

    /// Rewriter honouring the configured round limit.
    pub fn rewriter(&self) -> Rewriter {
        Rewriter::with_max_rounds(self.max_rounds)
    }
}

fn section<'a>(document: &'a Table, name: &str) -> Result<Option<&'a Table>, ConfigError> {
    match document.get(name) {
        None => Ok(None),
        Some(Value::Table(table)) => Ok(Some(table)),
        Some(_) => Err(invalid(name, "a table")),
    }
}

fn string<'a>(value: &'a Value, key: &str) -> Result<&'a str, ConfigError> {
    value.as_str().ok_or_else(|| invalid(key, "a string"))
}

fn invalid(key: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        expected,
    }
}

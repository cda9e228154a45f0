//! Calculator settings read from a "title key: values" document:
//! ```text
//! display
//!  history_window: 5
//!  output: latex
//!  precision: 5
//! logging
//!  level: info
//!  file: algebra_calc_{time}.log
//! ```
//! Missing sections and keys keep their defaults; unknown keys are ignored.
use crate::Utils::logger::{LogSettings, level_from_str};
use crate::Utils::task_parser::{Document, DocumentError, Value, parse_document, read_document};
use crate::calculator::handlers::quadratic::DEFAULT_PRECISION;
use crate::calculator::history::DEFAULT_HISTORY_WINDOW;
use crate::calculator::report::OutputMode;
use log::debug;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// f64 carries at most 17 significant decimal digits
const MAX_PRECISION: usize = 17;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Document(DocumentError),
    InvalidValue {
        section: String,
        key: String,
        value: String,
        expected: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Document(err) => write!(f, "{}", err),
            ConfigError::InvalidValue {
                section,
                key,
                value,
                expected,
            } => write!(
                f,
                "invalid value '{}' for {}.{}: expected {}",
                value, section, key, expected
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<DocumentError> for ConfigError {
    fn from(err: DocumentError) -> Self {
        ConfigError::Document(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    /// how many history entries the sidebar shows
    pub history_window: usize,
    pub output: OutputMode,
    /// significant digits of decimal approximations
    pub precision: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            history_window: DEFAULT_HISTORY_WINDOW,
            output: OutputMode::Latex,
            precision: DEFAULT_PRECISION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalcConfig {
    pub display: DisplaySettings,
    pub logging: LogSettings,
}

fn invalid(section: &str, key: &str, value: &Value, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

fn count_in(
    document: &Document,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<usize>,
) -> Result<Option<usize>, ConfigError> {
    let Some(value) = document.first(section, key) else {
        return Ok(None);
    };
    value
        .as_integer()
        .and_then(|n| usize::try_from(n).ok())
        .filter(|n| range.contains(n))
        .map(Some)
        .ok_or_else(|| {
            invalid(
                section,
                key,
                value,
                &format!("an integer from {} to {}", range.start(), range.end()),
            )
        })
}

impl CalcConfig {
    pub fn from_document(document: &Document) -> Result<Self, ConfigError> {
        let mut config = CalcConfig::default();
        if let Some(window) = count_in(document, "display", "history_window", 1..=usize::MAX)? {
            config.display.history_window = window;
        }
        if let Some(precision) = count_in(document, "display", "precision", 1..=MAX_PRECISION)? {
            config.display.precision = precision;
        }
        if let Some(value) = document.first("display", "output") {
            config.display.output = OutputMode::from_str(&value.to_string())
                .map_err(|_| invalid("display", "output", value, "latex or plain"))?;
        }
        if let Some(value) = document.first("logging", "level") {
            config.logging.level = level_from_str(&value.to_string()).ok_or_else(|| {
                invalid("logging", "level", value, "off, error, warn, info, debug or trace")
            })?;
        }
        if let Some(value) = document.first("logging", "file") {
            config.logging.file = Some(value.to_string());
        }
        for title in document.titles() {
            if title != "display" && title != "logging" {
                debug!("ignoring configuration section {}", title);
            }
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let document = read_document(path)?;
        CalcConfig::from_document(&document)
    }
}

impl FromStr for CalcConfig {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        CalcConfig::from_document(&parse_document(text)?)
    }
}

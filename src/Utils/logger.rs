//! Terminal and file logging for calculator sessions.
use chrono::Local;
use log::{LevelFilter, info, warn};
use simplelog::*;
use std::error::Error;
use std::fs::File;

/// Placeholder in the log file name replaced by the session start time.
pub const TIME_PLACEHOLDER: &str = "{time}";

#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub level: LevelFilter,
    /// log file name, possibly with a `{time}` placeholder; `None` logs to the terminal only
    pub file: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            level: LevelFilter::Warn,
            file: None,
        }
    }
}

pub fn level_from_str(level: &str) -> Option<LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "off" | "none" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

pub fn log_file_name(template: &str) -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    template.replace(TIME_PLACEHOLDER, &date_and_time)
}

/// Installs the global logger. Returns the name of the log file, if one was created.
/// A logger installed earlier in the process is kept.
pub fn init_logger(settings: &LogSettings) -> Result<Option<String>, Box<dyn Error>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        settings.level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    let name = match &settings.file {
        Some(template) if settings.level != LevelFilter::Off => {
            let name = log_file_name(template);
            loggers.push(WriteLogger::new(
                settings.level,
                Config::default(),
                File::create(&name)?,
            ));
            Some(name)
        }
        _ => None,
    };
    let logger_instance = CombinedLogger::init(loggers);
    match logger_instance {
        Ok(()) => info!("logging started at level {}", settings.level),
        Err(_) => warn!("logger already initialized, keeping the existing one"),
    }
    Ok(name)
}

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Missing required setting '{0}'")]
    Missing(&'static str),

    #[error("retry.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("Invalid date format '{0}'")]
    DateFormat(String),

    #[error("report.day_offset {0} is out of range")]
    DayOffset(i64),

    #[error("Filter dropdown #{0} has no selectors to open it")]
    EmptyFilter(usize),

    #[error("Failed to prepare output folder '{path}': {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("WebDriver request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebDriver error '{error}': {message}")]
    WebDriver { error: String, message: String },

    #[error("Unexpected WebDriver response: {0}")]
    Protocol(String),

    #[error("Timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },

    #[error("Session is closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{step}: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: BrowserError,
    },

    #[error("Report date: {0}")]
    Date(#[from] ConfigError),

    #[error("Failed to save report to '{path}': {source}")]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("{channel} is not supported on this platform")]
    Unsupported { channel: &'static str },

    #[error("{channel} command failed: {detail}")]
    CommandFailed {
        channel: &'static str,
        detail: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("All {0} alert channels failed")]
    AllChannelsFailed(usize),
}

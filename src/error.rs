use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the sentry agent
#[derive(Error, Debug)]
pub enum SentryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("SENTRY_SECRET not found in {}", .0.display())]
    MissingSecret(PathBuf),

    #[error("Invalid frame range: end frame ({end}) must be >= start frame ({start})")]
    InvalidFrameRange { start: i64, end: i64 },

    #[error("Invalid frame range: {start}-{end} holds more frames than can be counted")]
    FrameRangeTooWide { start: i64, end: i64 },

    #[error("Hardware probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Failures inside the hardware probe. These never reach the collector:
/// the scheduler swaps them for sentinel values.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("command `{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("{0} not available on this system")]
    Unavailable(String),

    #[error("could not parse {0}")]
    Parse(String),
}

/// Result type alias for the sentry agent
pub type Result<T> = std::result::Result<T, SentryError>;

impl SentryError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SentryError::Config(msg.into())
    }

    pub fn transport<S: Into<String>>(msg: S) -> Self {
        SentryError::Transport(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SentryError::Other(msg.into())
    }

    /// Errors that abort the process at startup instead of being retried.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SentryError::Config(_)
                | SentryError::MissingSecret(_)
                | SentryError::InvalidFrameRange { .. }
                | SentryError::FrameRangeTooWide { .. }
        )
    }
}

impl ProbeError {
    pub fn command_failed<C: Into<String>, R: ToString>(command: C, reason: R) -> Self {
        ProbeError::CommandFailed {
            command: command.into(),
            reason: reason.to_string(),
        }
    }
}

//! Agent configuration from the `sentry_secret` file.
//!
//! The file holds `KEY=VALUE` lines:
//!
//! ```text
//! SERVER_HOST=collector.farm.local
//! SERVER_PORT=3000
//! SENTRY_SECRET=your-magic-string
//! ```
//!
//! Blank lines and `#` comments are skipped, unknown keys ignored. Only the
//! secret is mandatory; the server defaults to `localhost:3000`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SentryError};

pub const CONFIG_FILE_NAME: &str = "sentry_secret";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3000;

/// Shown whenever the configuration can't be used
pub const EXPECTED_FORMAT: &str =
    "SERVER_HOST=your-server-host\nSERVER_PORT=your-server-port\nSENTRY_SECRET=your-magic-string";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentryConfig {
    pub server_host: String,
    pub server_port: u16,
    pub sentry_secret: String,
}

impl SentryConfig {
    /// Locate and load the configuration file
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = Self::locate(explicit)?;
        log::debug!("Loading configuration from {:?}", path);
        Self::load_from(&path)
    }

    /// Resolve the configuration file: an explicit path, otherwise the first
    /// existing candidate from [`SentryConfig::candidates`].
    pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.is_file() {
                return Ok(path.to_path_buf());
            }
            return Err(SentryError::config(format!(
                "{} file not found at {}",
                CONFIG_FILE_NAME,
                path.display()
            )));
        }

        let candidates = Self::candidates();
        candidates
            .iter()
            .find(|path| path.is_file())
            .cloned()
            .ok_or_else(|| {
                let searched: Vec<String> =
                    candidates.iter().map(|p| p.display().to_string()).collect();
                SentryError::config(format!(
                    "{} file not found (searched: {})",
                    CONFIG_FILE_NAME,
                    searched.join(", ")
                ))
            })
    }

    /// Next to the executable, the working directory, then the user config dir
    pub fn candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            candidates.push(exe_dir.join(CONFIG_FILE_NAME));
        }

        if let Ok(cwd) = std::env::current_dir() {
            candidates.push(cwd.join(CONFIG_FILE_NAME));
        }

        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("mata-sentry").join(CONFIG_FILE_NAME));
        }

        candidates
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            SentryError::config(format!(
                "Error reading {} file {}: {}",
                CONFIG_FILE_NAME,
                path.display(),
                e
            ))
        })?;
        Self::parse(&text, path)
    }

    /// Parse file contents; `source` only feeds error messages
    pub fn parse(text: &str, source: &Path) -> Result<Self> {
        let mut server_host = DEFAULT_HOST.to_string();
        let mut server_port = DEFAULT_PORT;
        let mut sentry_secret: Option<String> = None;

        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "SERVER_HOST" if !value.is_empty() => server_host = value.to_string(),
                "SERVER_PORT" if !value.is_empty() => {
                    server_port = value.parse().map_err(|_| {
                        SentryError::config(format!("SERVER_PORT is not a valid port: {:?}", value))
                    })?;
                }
                "SENTRY_SECRET" => sentry_secret = Some(value.to_string()),
                _ => {}
            }
        }

        let sentry_secret = sentry_secret
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| SentryError::MissingSecret(source.to_path_buf()))?;

        Ok(Self {
            server_host,
            server_port,
            sentry_secret,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// The secret as one `*` per character
    pub fn masked_secret(&self) -> String {
        "*".repeat(self.sentry_secret.chars().count())
    }
}

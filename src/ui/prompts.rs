// Console messages and the interactive prompts used to start monitoring

use colored::Colorize;
use dialoguer::Input;
use std::path::{Path, PathBuf};

use crate::core::render::FrameRange;
use crate::error::{Result, SentryError};

/// Display a warning message
pub fn warn(message: &str) {
    println!("{}", format!("⚠️  Warning: {}", message).yellow().bold());
}

/// Display a success message
pub fn success(message: &str) {
    println!("{}", message.green().bold());
}

/// Display an error message
pub fn error(message: &str) {
    eprintln!("{}", message.red().bold());
}

/// Check that the render output location is an existing directory
pub fn validate_render_dir(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(SentryError::other(format!(
            "Directory '{}' does not exist",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(SentryError::other(format!(
            "'{}' is not a directory",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// Ask for the render output directory.
///
/// There is no retry: a path that does not exist ends the session.
pub fn prompt_render_dir() -> Result<PathBuf> {
    let input: String = Input::new()
        .with_prompt("Render output directory")
        .interact_text()
        .map_err(|e| SentryError::other(format!("Failed to read input: {}", e)))?;

    validate_render_dir(Path::new(input.trim()))
}

/// Ask for the start and end frame, re-prompting until `end >= start`
pub fn prompt_frame_range(start: Option<i64>, end: Option<i64>) -> Result<FrameRange> {
    let start = match start {
        Some(start) => start,
        None => Input::<i64>::new()
            .with_prompt("Start frame")
            .interact_text()
            .map_err(|e| SentryError::other(format!("Failed to read input: {}", e)))?,
    };

    let end = match end {
        Some(end) if end >= start => end,
        Some(end) => {
            warn(&format!(
                "End frame ({}) must be >= start frame ({})",
                end, start
            ));
            prompt_end_frame(start)?
        }
        None => prompt_end_frame(start)?,
    };

    FrameRange::new(start, end)
}

fn prompt_end_frame(start: i64) -> Result<i64> {
    Input::<i64>::new()
        .with_prompt("End frame")
        .validate_with(|end: &i64| -> std::result::Result<(), String> {
            if *end >= start {
                Ok(())
            } else {
                Err(format!("End frame must be >= start frame ({})", start))
            }
        })
        .interact_text()
        .map_err(|e| SentryError::other(format!("Failed to read input: {}", e)))
}

//! Shell-out helper shared by the platform probes.

use std::process::{Command, Stdio};

use crate::error::ProbeError;

/// Run a command and return its trimmed stdout.
///
/// A non-zero exit or empty output counts as failure so callers can chain
/// fallbacks with `.or_else(..)`.
pub fn run_command(program: &str, args: &[&str]) -> Result<String, ProbeError> {
    let display = format!("{} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| ProbeError::command_failed(&display, e))?;

    if !output.status.success() {
        return Err(ProbeError::command_failed(
            &display,
            format!("exit status {}", output.status),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if stdout.is_empty() {
        return Err(ProbeError::command_failed(&display, "empty output"));
    }

    Ok(stdout)
}

/// First `key<sep>value` line whose key matches, value trimmed and non-empty.
pub fn find_field(text: &str, key: &str, separator: char) -> Option<String> {
    text.lines().find_map(|line| {
        let (k, v) = line.split_once(separator)?;
        let v = v.trim();
        (k.trim() == key && !v.is_empty()).then(|| v.to_string())
    })
}

//! The rolling console view of the agent.
//!
//! The screen is cleared and redrawn after every heartbeat and once at
//! startup. Building the text is kept apart from printing it so the layout can
//! be checked without a terminal.

use colored::Colorize;
use crossterm::{
    cursor, execute,
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::formatters::{
    format_latest_frame, format_missing_frames, format_node_status, format_progress,
    format_progress_bar,
};
use crate::core::config::SentryConfig;
use crate::core::render::{EmitReason, FrameRange, HeartbeatState, TickReport};
use crate::core::transport::is_success;

const PROGRESS_BAR_WIDTH: usize = 30;

/// Static header information plus the redraw logic
pub struct StatusDisplay {
    server_address: String,
    masked_secret: String,
    hardware_summary: String,
    dir: PathBuf,
    range: FrameRange,
}

impl StatusDisplay {
    pub fn new(
        config: &SentryConfig,
        hardware_summary: String,
        dir: &Path,
        range: FrameRange,
    ) -> Self {
        Self {
            server_address: config.server_address(),
            masked_secret: config.masked_secret(),
            hardware_summary,
            dir: dir.to_path_buf(),
            range,
        }
    }

    /// Clear the terminal and print the current view
    pub fn draw(&self, report: &TickReport, state: &HeartbeatState) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;

        println!("{}", "🛰  Mata Sentry".white().bold());
        println!("{}", format!("Server: {}", self.server_address).cyan());
        println!("{}", format!("Secret: {}", self.masked_secret).dimmed());
        println!("{}", self.hardware_summary.dimmed());
        println!();

        println!("Status: {}", format_node_status(report.status));
        println!("Monitoring: {}", self.dir.display().to_string().white().bold());
        println!("Frames: {}", self.range);
        println!(
            "Progress: {} {}",
            format_progress_bar(
                report.snapshot.rendered_frames,
                report.snapshot.total_frames,
                PROGRESS_BAR_WIDTH
            )
            .green(),
            format_progress(&report.snapshot)
        );
        println!("{}", format_latest_frame(&report.snapshot));
        if !report.snapshot.missing_frames.is_empty() {
            println!(
                "{}",
                format!(
                    "Missing: {}",
                    format_missing_frames(&report.snapshot.missing_frames)
                )
                .yellow()
            );
        }
        println!();

        let server_line = self.server_line(state);
        match state.last_post_succeeded() {
            Some(true) => println!("{}", server_line.green()),
            Some(false) => println!("{}", server_line.red()),
            None => println!("{}", server_line.dimmed()),
        }
        if let Some(trigger) = trigger_line(report) {
            println!("{}", trigger.dimmed());
        }
        println!();
        println!("{}", "Press Ctrl+C to stop".dimmed());

        stdout.flush()
    }

    /// Last collector response, or a placeholder before the first heartbeat
    pub fn server_line(&self, state: &HeartbeatState) -> String {
        match (&state.last_status_text, &state.last_timestamp) {
            (Some(text), timestamp) => {
                let icon = if is_success(text) { "✅" } else { "❌" };
                match timestamp {
                    Some(at) => format!("Server: {} {} (at {})", icon, text, at),
                    None => format!("Server: {} {}", icon, text),
                }
            }
            (None, _) => "Waiting for first update...".to_string(),
        }
    }
}

/// What caused the heartbeat of this tick, if one went out
pub fn trigger_line(report: &TickReport) -> Option<String> {
    report.emitted.map(|reason| match reason {
        EmitReason::NewFrames => format!(
            "Update triggered by new frames ({} rendered)",
            report.snapshot.rendered_frames
        ),
        EmitReason::Interval => "Update triggered by the regular interval".to_string(),
        EmitReason::Completion => "Render complete, final update sent".to_string(),
    })
}

use colored::{ColoredString, Colorize};

use crate::core::render::{NodeStatus, ProgressSnapshot};

/// Longest rendering of the missing-frames list before it gets cut
const MISSING_DISPLAY_WIDTH: usize = 50;

/// Missing frames as `[13, 14, 15]`, clipped for the console. `...` marks
/// a cut list.
pub fn format_missing_frames(missing: &[i64]) -> String {
    let list = format!(
        "[{}]",
        missing
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    if list.chars().count() <= MISSING_DISPLAY_WIDTH {
        return list;
    }
    let mut clipped: String = list.chars().take(MISSING_DISPLAY_WIDTH).collect();
    clipped.push_str("...");
    clipped
}

/// `3/6 frames (50.0%)`
pub fn format_progress(snapshot: &ProgressSnapshot) -> String {
    format!(
        "{}/{} frames ({:.1}%)",
        snapshot.rendered_frames, snapshot.total_frames, snapshot.progress_percent
    )
}

/// `Latest Frame: 12 (Δ: 0:01:00)`
pub fn format_latest_frame(snapshot: &ProgressSnapshot) -> String {
    match snapshot.latest_frame {
        Some(frame) => match &snapshot.frame_delta_time {
            Some(delta) => format!("Latest Frame: {} (Δ: {})", frame, delta),
            None => format!("Latest Frame: {}", frame),
        },
        None => "Latest Frame: None (no frames rendered yet)".to_string(),
    }
}

/// Status label with icon, colored by severity
pub fn format_node_status(status: NodeStatus) -> ColoredString {
    let label = format!("{} {}", status.icon(), status.as_str().to_uppercase());
    match status {
        NodeStatus::Idling => label.dimmed(),
        NodeStatus::Rendering => label.green().bold(),
        NodeStatus::NeedsAttention => label.yellow().bold(),
    }
}

/// Text progress bar, e.g. `[=========               ]`
pub fn format_progress_bar(rendered: u64, total: u64, width: usize) -> String {
    let filled = if total > 0 {
        ((rendered.min(total) as f64 / total as f64) * width as f64) as usize
    } else {
        0
    };
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
}

//! Node status classification.
//!
//! Maps the latest progress snapshot plus emission timing to one of three
//! coarse states. The rules are evaluated in order and the first match wins:
//!
//! 1. nothing rendered yet -> idling
//! 2. every frame rendered -> idling
//! 3. a frame delta is known and the time since the last emission exceeds
//!    four times that delta -> needs attention (300 s if the delta can't be read)
//! 4. new frames since the previous evaluation -> rendering
//! 5. more than 300 s since the last emission -> needs attention
//! 6. otherwise -> rendering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::progress::ProgressSnapshot;

/// Seconds without an emission before a node in the middle of a job is flagged
pub const INACTIVITY_THRESHOLD_SECS: i64 = 300;

/// How many frame deltas may pass before a stall is assumed
pub const STALL_MULTIPLIER: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeStatus {
    #[serde(rename = "idling")]
    Idling,
    #[serde(rename = "rendering")]
    Rendering,
    #[serde(rename = "needs attention")]
    NeedsAttention,
}

impl NodeStatus {
    /// Wire representation sent to the collector
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Idling => "idling",
            NodeStatus::Rendering => "rendering",
            NodeStatus::NeedsAttention => "needs attention",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NodeStatus::Idling => "😴",
            NodeStatus::Rendering => "🎬",
            NodeStatus::NeedsAttention => "⚠️",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a frame delta into whole seconds.
///
/// Accepts `H:MM:SS` and `MM:SS`. Any other shape falls back to reading the
/// first `:`-separated field as plain seconds. Returns `None` when even that
/// is not an integer.
pub fn parse_delta_seconds(text: &str) -> Option<i64> {
    let parts: Vec<&str> = text.split(':').map(str::trim).collect();
    let field = |i: usize| parts.get(i).and_then(|p| p.parse::<i64>().ok());

    match parts.len() {
        3 => Some(field(0)? * 3600 + field(1)? * 60 + field(2)?),
        2 => Some(field(0)? * 60 + field(1)?),
        _ => field(0),
    }
}

/// Classify the node.
///
/// Pure: identical inputs always give the same status. `last_emission` is
/// `None` before the first heartbeat went out; elapsed time is then counted
/// from the Unix epoch, so a job already underway when the agent starts is
/// flagged until the first heartbeat resets the timer.
pub fn classify(
    snapshot: &ProgressSnapshot,
    previous_frame_count: u64,
    now: DateTime<Utc>,
    last_emission: Option<DateTime<Utc>>,
) -> NodeStatus {
    if snapshot.rendered_frames == 0 {
        return NodeStatus::Idling;
    }

    if snapshot.rendered_frames >= snapshot.total_frames {
        return NodeStatus::Idling;
    }

    let elapsed = elapsed_seconds(now, last_emission);

    if let Some(delta) = snapshot.frame_delta_time.as_deref() {
        let threshold = match parse_delta_seconds(delta) {
            Some(seconds) => seconds * STALL_MULTIPLIER,
            None => INACTIVITY_THRESHOLD_SECS,
        };
        if elapsed > threshold as f64 {
            return NodeStatus::NeedsAttention;
        }
    }

    if snapshot.rendered_frames > previous_frame_count {
        return NodeStatus::Rendering;
    }

    if elapsed > INACTIVITY_THRESHOLD_SECS as f64 {
        return NodeStatus::NeedsAttention;
    }

    NodeStatus::Rendering
}

fn elapsed_seconds(now: DateTime<Utc>, since: Option<DateTime<Utc>>) -> f64 {
    let since = since.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    (now - since).num_milliseconds() as f64 / 1000.0
}

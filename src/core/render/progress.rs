//! Progress snapshots computed from a frame scan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::frame::{FrameRange, FrameRecord};

/// Missing frames reported in a snapshot are capped to this many entries.
pub const MISSING_FRAMES_LIMIT: usize = 10;

const SECONDS_PER_DAY: u64 = 86_400;

/// Summary of which frames of the requested range exist on disk.
///
/// Field names double as the `render_progress` object of the heartbeat
/// payload, so the percentage keeps the collector's `progress_percentage` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub total_frames: u64,
    pub rendered_frames: u64,
    #[serde(rename = "progress_percentage")]
    pub progress_percent: f64,
    pub latest_frame: Option<i64>,
    /// Time between the two highest-numbered frames, as `H:MM:SS`
    pub frame_delta_time: Option<String>,
    pub missing_frames: Vec<i64>,
}

impl ProgressSnapshot {
    /// Snapshot for a range where nothing has been rendered yet
    pub fn empty(range: FrameRange) -> Self {
        Self {
            total_frames: range.total_frames(),
            rendered_frames: 0,
            progress_percent: 0.0,
            latest_frame: None,
            frame_delta_time: None,
            missing_frames: range.frames().take(MISSING_FRAMES_LIMIT).collect(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.rendered_frames >= self.total_frames
    }
}

/// Turn a frame scan into a progress snapshot.
///
/// Pure function of its inputs. Several files carrying the same frame number
/// (e.g. an `.exr` and a `.png` preview) count as one rendered frame; the
/// newest of them provides the frame's modification time.
pub fn compute_progress(records: &[FrameRecord], range: FrameRange) -> ProgressSnapshot {
    let mut frames: BTreeMap<i64, DateTime<Utc>> = BTreeMap::new();
    for record in records.iter().filter(|r| range.contains(r.frame_number)) {
        frames
            .entry(record.frame_number)
            .and_modify(|t| *t = (*t).max(record.modified_at))
            .or_insert(record.modified_at);
    }

    if frames.is_empty() {
        return ProgressSnapshot::empty(range);
    }

    let total_frames = range.total_frames();
    let rendered_frames = frames.len() as u64;

    let mut highest = frames.iter().rev();
    let latest = highest.next();
    let previous = highest.next();

    let frame_delta_time = match (latest, previous) {
        (Some((_, latest_at)), Some((_, previous_at))) => {
            let seconds = (*latest_at - *previous_at).num_seconds().unsigned_abs();
            Some(format_delta(seconds))
        }
        _ => None,
    };

    let missing_frames = range
        .frames()
        .filter(|frame| !frames.contains_key(frame))
        .take(MISSING_FRAMES_LIMIT)
        .collect();

    ProgressSnapshot {
        total_frames,
        rendered_frames,
        progress_percent: percent_of(rendered_frames, total_frames),
        latest_frame: latest.map(|(frame, _)| *frame),
        frame_delta_time,
        missing_frames,
    }
}

/// Percentage rounded to one decimal place, ties to even (`1/16` is `6.2`)
fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 10.0).round_ties_even() / 10.0
}

/// Format whole seconds as `H:MM:SS`, with a `N day(s), ` prefix past 24h.
pub fn format_delta(total_seconds: u64) -> String {
    let days = total_seconds / SECONDS_PER_DAY;
    let rem = total_seconds % SECONDS_PER_DAY;
    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);

    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}

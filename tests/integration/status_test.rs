// Integration tests for node status classification

use chrono::Duration;
use mata_sentry::core::render::{classify, FrameRange, NodeStatus, ProgressSnapshot};

use super::common::start_time;

fn snapshot(rendered: u64, total: u64, delta: Option<&str>) -> ProgressSnapshot {
    let mut snapshot = ProgressSnapshot::empty(FrameRange::new(1, total as i64).unwrap());
    snapshot.rendered_frames = rendered;
    snapshot.frame_delta_time = delta.map(str::to_string);
    snapshot
}

fn after(secs: i64) -> chrono::DateTime<chrono::Utc> {
    start_time() + Duration::seconds(secs)
}

#[test]
fn test_nothing_rendered_is_always_idling() {
    for total in [1, 10, 500] {
        let s = snapshot(0, total, None);
        assert_eq!(classify(&s, 0, after(1_000), Some(start_time())), NodeStatus::Idling);
    }
}

#[test]
fn test_finished_render_is_idling() {
    let s = snapshot(24, 24, Some("0:00:05"));
    assert_eq!(classify(&s, 24, after(86_400), Some(start_time())), NodeStatus::Idling);
}

#[test]
fn test_stalled_frame_needs_attention() {
    let s = snapshot(12, 24, Some("0:01:00"));
    assert_eq!(
        classify(&s, 12, after(250), Some(start_time())),
        NodeStatus::NeedsAttention
    );
}

#[test]
fn test_without_delta_long_silence_needs_attention() {
    let s = snapshot(1, 24, None);
    assert_eq!(
        classify(&s, 1, after(310), Some(start_time())),
        NodeStatus::NeedsAttention
    );
    assert_eq!(classify(&s, 0, after(250), Some(start_time())), NodeStatus::Rendering);
}

#[test]
fn test_multi_day_delta_falls_back_to_inactivity_threshold() {
    let s = snapshot(3, 24, Some("1 day, 2:00:00"));
    assert_eq!(
        classify(&s, 3, after(301), Some(start_time())),
        NodeStatus::NeedsAttention
    );
    assert_eq!(classify(&s, 3, after(299), Some(start_time())), NodeStatus::Rendering);
}

#[test]
fn test_steady_progress_is_rendering() {
    let s = snapshot(6, 24, Some("0:00:30"));
    assert_eq!(classify(&s, 5, after(30), Some(start_time())), NodeStatus::Rendering);
    assert_eq!(classify(&s, 6, after(60), Some(start_time())), NodeStatus::Rendering);
}

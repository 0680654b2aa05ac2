// Integration tests for the heartbeat scheduler, driven by a manual clock

use mata_sentry::core::render::{
    Clock, EmitReason, FrameRange, FrameScanner, HeartbeatPayload, HeartbeatScheduler, ManualClock,
    NodeStatus, ScheduleSettings,
};
use mata_sentry::core::system_info::HardwareInfo;
use mata_sentry::core::transport::Transport;
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tempfile::TempDir;

use super::common::{start_time, touch_frame, write_frame};

/// Records every payload and answers with a fixed status text
#[derive(Clone)]
struct RecordingTransport {
    sent: Rc<RefCell<Vec<HeartbeatPayload>>>,
    reply: &'static str,
}

impl RecordingTransport {
    fn replying(reply: &'static str) -> Self {
        Self {
            sent: Rc::new(RefCell::new(Vec::new())),
            reply,
        }
    }

    fn count(&self) -> usize {
        self.sent.borrow().len()
    }

    fn last(&self) -> HeartbeatPayload {
        self.sent.borrow().last().cloned().unwrap()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, payload: &HeartbeatPayload) -> String {
        self.sent.borrow_mut().push(payload.clone());
        self.reply.to_string()
    }
}

type TestScheduler = HeartbeatScheduler<Rc<ManualClock>, RecordingTransport, HardwareInfo>;

fn scheduler(dir: &Path, transport: &RecordingTransport) -> (TestScheduler, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new(start_time()));
    let scheduler = HeartbeatScheduler::new(
        FrameScanner::new(dir, FrameRange::new(1, 4).unwrap()),
        "farm-secret",
        ScheduleSettings::default(),
        clock.clone(),
        transport.clone(),
        HardwareInfo::fallback(),
    );
    (scheduler, clock)
}

#[test]
fn test_quiet_directory_emits_on_interval_only() {
    let temp_dir = TempDir::new().unwrap();
    let transport = RecordingTransport::replying("200 OK");
    let (mut scheduler, clock) = scheduler(temp_dir.path(), &transport);

    let mut reasons = Vec::new();
    for _ in 0..=30 {
        if let Some(reason) = scheduler.tick().emitted {
            reasons.push(reason);
        }
        clock.advance(Duration::from_secs(2));
    }

    // ticks at 0, 2, ... 60 seconds
    assert_eq!(reasons, vec![EmitReason::Interval; 3]);
    assert_eq!(transport.count(), 3);
    assert!(transport
        .sent
        .borrow()
        .iter()
        .all(|p| p.status == NodeStatus::Idling));
}

#[test]
fn test_new_frames_emit_immediately() {
    let temp_dir = TempDir::new().unwrap();
    let transport = RecordingTransport::replying("200 OK");
    let (mut scheduler, clock) = scheduler(temp_dir.path(), &transport);

    scheduler.tick();
    clock.advance(Duration::from_secs(2));
    touch_frame(temp_dir.path(), "frame_0001.exr");

    let report = scheduler.tick();

    assert_eq!(report.emitted, Some(EmitReason::NewFrames));
    assert_eq!(report.status, NodeStatus::Rendering);
    assert_eq!(scheduler.state().last_frame_count, 1);

    let payload = transport.last();
    assert_eq!(payload.status, NodeStatus::Rendering);
    assert_eq!(payload.render_progress.unwrap().rendered_frames, 1);

    clock.advance(Duration::from_secs(2));
    assert_eq!(scheduler.tick().emitted, None);
}

#[test]
fn test_completion_reported_once() {
    let temp_dir = TempDir::new().unwrap();
    let transport = RecordingTransport::replying("200 OK");
    let (mut scheduler, clock) = scheduler(temp_dir.path(), &transport);

    scheduler.tick();
    for frame in 1..=4 {
        touch_frame(temp_dir.path(), &format!("frame_{:04}.exr", frame));
    }
    clock.advance(Duration::from_secs(2));

    let report = scheduler.tick();
    assert_eq!(report.emitted, Some(EmitReason::Completion));
    assert_eq!(report.status, NodeStatus::Idling);
    assert!(scheduler.completion_reported());

    let payload = transport.last();
    assert_eq!(payload.status, NodeStatus::Idling);
    assert_eq!(payload.render_progress.unwrap().progress_percent, 100.0);

    clock.advance(Duration::from_secs(2));
    assert_eq!(scheduler.tick().emitted, None);

    // the loop keeps reporting on the regular interval
    clock.advance(Duration::from_secs(30));
    let report = scheduler.tick();
    assert_eq!(report.emitted, Some(EmitReason::Interval));
    assert_eq!(report.status, NodeStatus::Idling);
    assert_eq!(transport.count(), 3);
}

#[test]
fn test_completion_rearmed_when_frames_disappear() {
    let temp_dir = TempDir::new().unwrap();
    let transport = RecordingTransport::replying("200 OK");
    let (mut scheduler, clock) = scheduler(temp_dir.path(), &transport);

    for frame in 1..=4 {
        touch_frame(temp_dir.path(), &format!("frame_{:04}.exr", frame));
    }
    assert_eq!(scheduler.tick().emitted, Some(EmitReason::Completion));

    std::fs::remove_file(temp_dir.path().join("frame_0004.exr")).unwrap();
    clock.advance(Duration::from_secs(2));
    let state_before = scheduler.state().clone();
    assert_eq!(scheduler.tick().emitted, None);
    assert!(!scheduler.completion_reported());
    // a tick that sends nothing leaves the heartbeat state alone
    assert_eq!(scheduler.state(), &state_before);

    touch_frame(temp_dir.path(), "frame_0004.exr");
    clock.advance(Duration::from_secs(2));
    assert_eq!(scheduler.tick().emitted, Some(EmitReason::Completion));
}

#[test]
fn test_stalled_job_reports_needs_attention() {
    let temp_dir = TempDir::new().unwrap();
    // two frames a minute apart: a stall is assumed after 4 minutes of silence
    write_frame(temp_dir.path(), "frame_0001.exr", 0);
    write_frame(temp_dir.path(), "frame_0002.exr", 60);

    let transport = RecordingTransport::replying("200 OK");
    let clock = Rc::new(ManualClock::new(start_time()));
    let mut scheduler = HeartbeatScheduler::new(
        FrameScanner::new(temp_dir.path(), FrameRange::new(1, 4).unwrap()),
        "farm-secret",
        ScheduleSettings {
            check_interval: Duration::from_secs(2),
            post_interval: Duration::from_secs(300),
        },
        clock.clone(),
        transport.clone(),
        HardwareInfo::fallback(),
    );

    // nothing sent yet: the job in progress is flagged on the first heartbeat
    let report = scheduler.tick();
    assert_eq!(report.emitted, Some(EmitReason::NewFrames));
    assert_eq!(report.status, NodeStatus::NeedsAttention);

    clock.advance(Duration::from_secs(2));
    let report = scheduler.tick();
    assert_eq!(report.emitted, None);
    assert_eq!(report.status, NodeStatus::Rendering);

    clock.advance(Duration::from_secs(248));
    let report = scheduler.tick();
    assert_eq!(report.emitted, None);
    assert_eq!(report.status, NodeStatus::NeedsAttention);

    clock.advance(Duration::from_secs(50));
    let report = scheduler.tick();
    assert_eq!(report.emitted, Some(EmitReason::Interval));
    assert_eq!(report.status, NodeStatus::NeedsAttention);

    let payload = transport.last();
    assert_eq!(payload.status, NodeStatus::NeedsAttention);
    assert_eq!(
        serde_json::to_value(&payload).unwrap()["status"],
        "needs attention"
    );
    assert_eq!(transport.count(), 2);
}

#[test]
fn test_failed_post_is_recorded_without_retry() {
    let temp_dir = TempDir::new().unwrap();
    let transport = RecordingTransport::replying("✗ POST failed: connection refused");
    let (mut scheduler, clock) = scheduler(temp_dir.path(), &transport);

    scheduler.tick();
    let state = scheduler.state();
    assert_eq!(
        state.last_status_text.as_deref(),
        Some("✗ POST failed: connection refused")
    );
    assert_eq!(state.last_post_succeeded(), Some(false));
    assert_eq!(state.last_post_time, Some(start_time()));

    clock.advance(Duration::from_secs(2));
    assert_eq!(scheduler.tick().emitted, None);
    assert_eq!(transport.count(), 1);
}

#[test]
fn test_run_stops_when_cancelled() {
    let temp_dir = TempDir::new().unwrap();
    let transport = RecordingTransport::replying("200 OK");
    let (mut scheduler, clock) = scheduler(temp_dir.path(), &transport);
    let cancel_flag = scheduler.cancel_flag();

    let mut ticks = 0;
    scheduler.run(|_, _| {
        ticks += 1;
        if ticks == 5 {
            cancel_flag.store(true, Ordering::Relaxed);
        }
    });

    assert_eq!(ticks, 5);
    // four pauses between five ticks
    assert_eq!(clock.now(), start_time() + chrono::Duration::seconds(8));
}

#[test]
fn test_run_watches_render_progress() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let transport = RecordingTransport::replying("200 OK");
    let (mut scheduler, _clock) = scheduler(&dir, &transport);
    let cancel_flag = scheduler.cancel_flag();

    let mut reasons = Vec::new();
    let mut ticks: u64 = 0;
    scheduler.run(|report, state| {
        ticks += 1;
        if let Some(reason) = report.emitted {
            reasons.push((reason, report.status));
            assert_eq!(state.last_frame_count, report.snapshot.rendered_frames);
        }
        if ticks <= 4 {
            // a minute of render time per frame
            write_frame(&dir, &format!("frame_{:04}.exr", ticks), ticks * 60);
        } else {
            cancel_flag.store(true, Ordering::Relaxed);
        }
    });

    assert_eq!(
        reasons,
        vec![
            (EmitReason::Interval, NodeStatus::Idling),
            (EmitReason::NewFrames, NodeStatus::Rendering),
            (EmitReason::NewFrames, NodeStatus::Rendering),
            (EmitReason::NewFrames, NodeStatus::Rendering),
            (EmitReason::Completion, NodeStatus::Idling),
        ]
    );
}

/// Panics on its first send, then behaves
struct FlakyTransport {
    calls: Cell<u32>,
}

impl Transport for FlakyTransport {
    fn send(&self, _payload: &HeartbeatPayload) -> String {
        self.calls.set(self.calls.get() + 1);
        if self.calls.get() == 1 {
            panic!("collector client blew up");
        }
        "200 OK".to_string()
    }
}

#[test]
fn test_run_survives_panicking_tick() {
    let temp_dir = TempDir::new().unwrap();
    let mut scheduler = HeartbeatScheduler::new(
        FrameScanner::new(temp_dir.path(), FrameRange::new(1, 4).unwrap()),
        "farm-secret",
        ScheduleSettings::default(),
        Rc::new(ManualClock::new(start_time())),
        FlakyTransport { calls: Cell::new(0) },
        HardwareInfo::fallback(),
    );
    let cancel_flag = scheduler.cancel_flag();

    let mut reports = Vec::new();
    scheduler.run(|report, _| {
        reports.push(report.emitted);
        cancel_flag.store(true, Ordering::Relaxed);
    });

    // the panicking tick is skipped, the next one retries the emission
    assert_eq!(reports, vec![Some(EmitReason::Interval)]);
    assert_eq!(scheduler.transport().calls.get(), 2);
    assert_eq!(scheduler.state().last_status_text.as_deref(), Some("200 OK"));
}

//! The heartbeat scheduler: the agent's polling loop.
//!
//! Every tick the scheduler rescans the render directory, recomputes the
//! progress snapshot, reclassifies the node and decides whether a heartbeat is
//! due. A heartbeat goes out when new frames appeared since the last one, or
//! when the post interval elapsed. Reaching 100% sends one completion
//! heartbeat with the status forced to idling; the loop keeps running after
//! that until it is cancelled.
//!
//! Time is read through a [`Clock`] so tests can drive ticks without sleeping.

use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::frame::FrameScanner;
use super::payload::HeartbeatPayload;
use super::progress::{compute_progress, ProgressSnapshot};
use super::status::{classify, NodeStatus};
use crate::core::system_info::{HardwareInfo, HardwareProbe};
use crate::core::transport::{is_success, Transport};

/// Default pause between directory scans
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(2);

/// Default longest gap between two heartbeats
pub const DEFAULT_POST_INTERVAL: Duration = Duration::from_secs(30);

/// Wall clock plus sleep, injectable for tests
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    fn sleep(&self, duration: Duration);
}

/// The real clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when told to; `sleep` advances it instantly
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let step =
            chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
        self.now.set(self.now.get() + step);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleSettings {
    pub check_interval: Duration,
    pub post_interval: Duration,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            check_interval: DEFAULT_CHECK_INTERVAL,
            post_interval: DEFAULT_POST_INTERVAL,
        }
    }
}

/// What the scheduler remembers between ticks. Owned by the scheduler and
/// only touched after an emission attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeartbeatState {
    pub last_post_time: Option<DateTime<Utc>>,
    pub last_frame_count: u64,
    pub last_status_text: Option<String>,
    pub last_timestamp: Option<String>,
}

impl HeartbeatState {
    /// `None` until the first heartbeat was attempted
    pub fn last_post_succeeded(&self) -> Option<bool> {
        self.last_status_text.as_deref().map(is_success)
    }
}

/// Why a heartbeat was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitReason {
    NewFrames,
    Interval,
    Completion,
}

/// Outcome of a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub at: DateTime<Utc>,
    pub snapshot: ProgressSnapshot,
    pub status: NodeStatus,
    pub emitted: Option<EmitReason>,
}

/// Regular emission rule: new frames, or the post interval elapsed.
pub fn emission_due(
    state: &HeartbeatState,
    snapshot: &ProgressSnapshot,
    now: DateTime<Utc>,
    post_interval: Duration,
) -> Option<EmitReason> {
    if snapshot.rendered_frames > state.last_frame_count {
        return Some(EmitReason::NewFrames);
    }

    let interval_elapsed = match state.last_post_time {
        None => true,
        Some(last) => (now - last).num_milliseconds() >= post_interval.as_millis() as i64,
    };

    interval_elapsed.then_some(EmitReason::Interval)
}

pub struct HeartbeatScheduler<C, T, P> {
    scanner: FrameScanner,
    secret: String,
    settings: ScheduleSettings,
    clock: C,
    transport: T,
    probe: P,
    state: HeartbeatState,
    /// Set once the completion heartbeat went out; cleared if frames vanish
    completion_reported: bool,
    cancel_flag: Arc<AtomicBool>,
}

impl<C: Clock, T: Transport, P: HardwareProbe> HeartbeatScheduler<C, T, P> {
    pub fn new(
        scanner: FrameScanner,
        secret: impl Into<String>,
        settings: ScheduleSettings,
        clock: C,
        transport: T,
        probe: P,
    ) -> Self {
        Self {
            scanner,
            secret: secret.into(),
            settings,
            clock,
            transport,
            probe,
            state: HeartbeatState::default(),
            completion_reported: false,
            cancel_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an externally owned cancellation flag (e.g. set by a Ctrl-C handler)
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = flag;
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel_flag.clone()
    }

    pub fn state(&self) -> &HeartbeatState {
        &self.state
    }

    /// Whether the completion heartbeat for the current job already went out
    pub fn completion_reported(&self) -> bool {
        self.completion_reported
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    pub fn scanner(&self) -> &FrameScanner {
        &self.scanner
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current snapshot and status without emitting anything
    pub fn preview(&self) -> TickReport {
        let now = self.clock.now();
        let snapshot = self.snapshot();
        let status = classify(
            &snapshot,
            self.state.last_frame_count,
            now,
            self.state.last_post_time,
        );
        TickReport {
            at: now,
            snapshot,
            status,
            emitted: None,
        }
    }

    /// Probe the hardware, degrading to sentinels on failure
    pub fn hardware(&mut self) -> HardwareInfo {
        self.probe.probe().unwrap_or_else(|e| {
            log::debug!("Hardware probe failed, using fallback values: {}", e);
            HardwareInfo::fallback()
        })
    }

    fn snapshot(&self) -> ProgressSnapshot {
        let records = self.scanner.scan();
        compute_progress(&records, self.scanner.range())
    }

    /// Run one iteration of the loop.
    ///
    /// Completion means every frame of the range is on disk. A job that is
    /// one frame short of a large range reads `100.0` once rounded but is
    /// not complete, so no completion heartbeat goes out for it.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now();
        let snapshot = self.snapshot();
        let mut status = classify(
            &snapshot,
            self.state.last_frame_count,
            now,
            self.state.last_post_time,
        );

        let mut reason =
            emission_due(&self.state, &snapshot, now, self.settings.post_interval);

        if snapshot.is_complete() {
            if !self.completion_reported {
                reason = Some(EmitReason::Completion);
                status = NodeStatus::Idling;
            }
        } else {
            self.completion_reported = false;
        }

        if let Some(reason) = reason {
            self.emit(&snapshot, status, now, reason);
        }

        TickReport {
            at: now,
            snapshot,
            status,
            emitted: reason,
        }
    }

    fn emit(
        &mut self,
        snapshot: &ProgressSnapshot,
        status: NodeStatus,
        now: DateTime<Utc>,
        reason: EmitReason,
    ) {
        let hardware = self.hardware();
        let payload = HeartbeatPayload::build(&hardware, &self.secret, status, Some(snapshot), now);

        log::debug!(
            "Emitting heartbeat ({:?}): {} {}/{} frames",
            reason,
            status,
            snapshot.rendered_frames,
            snapshot.total_frames
        );

        let status_text = self.transport.send(&payload);

        self.state.last_status_text = Some(status_text);
        self.state.last_timestamp = Some(payload.timestamp);
        self.state.last_post_time = Some(now);
        self.state.last_frame_count = snapshot.rendered_frames;
        if reason == EmitReason::Completion {
            self.completion_reported = true;
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Tick until cancelled.
    ///
    /// `on_tick` sees every completed tick together with the updated state.
    /// A tick that panics is logged and skipped; the loop carries on after
    /// the regular pause.
    pub fn run<F>(&mut self, mut on_tick: F)
    where
        F: FnMut(&TickReport, &HeartbeatState),
    {
        while !self.is_cancelled() {
            match panic::catch_unwind(AssertUnwindSafe(|| self.tick())) {
                Ok(report) => on_tick(&report, &self.state),
                Err(cause) => {
                    let message = cause
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| cause.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown error".to_string());
                    log::error!("Error in monitoring loop: {}; continuing", message);
                }
            }

            if self.is_cancelled() {
                break;
            }
            self.clock.sleep(self.settings.check_interval);
        }
    }
}

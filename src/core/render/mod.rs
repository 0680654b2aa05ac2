//! Render-progress tracking and node-status classification.
//!
//! Data flows one way on every tick:
//! [`FrameScanner`] -> [`compute_progress`] -> [`classify`] -> (maybe) a
//! [`HeartbeatPayload`] handed to the transport by the [`HeartbeatScheduler`].

pub mod frame;
pub mod heartbeat;
pub mod payload;
pub mod progress;
pub mod status;

pub use frame::{extract_frame_number, FrameRange, FrameRecord, FrameScanner};
pub use heartbeat::{
    emission_due, Clock, EmitReason, HeartbeatScheduler, HeartbeatState, ManualClock,
    ScheduleSettings, SystemClock, TickReport,
};
pub use payload::{iso_timestamp, HeartbeatPayload};
pub use progress::{compute_progress, format_delta, ProgressSnapshot, MISSING_FRAMES_LIMIT};
pub use status::{classify, parse_delta_seconds, NodeStatus};

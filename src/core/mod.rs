// Core business logic module

pub mod config;
pub mod render;
pub mod system_info;
pub mod transport;

// Re-export commonly used items
pub use config::SentryConfig;
pub use render::{FrameRange, FrameScanner, HeartbeatScheduler, NodeStatus, ProgressSnapshot};
pub use system_info::{HardwareInfo, HardwareProbe, SystemProbe};
pub use transport::{HttpTransport, Transport};

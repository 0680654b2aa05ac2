// Platform-specific hardware probing

pub mod command;
pub mod nvidia_nvml;

#[cfg(target_os = "linux")]
pub mod linux;
#[cfg(target_os = "macos")]
pub mod macos;
#[cfg(windows)]
pub mod windows;

// Re-exports for cleaner imports
pub use command::{find_field, run_command};

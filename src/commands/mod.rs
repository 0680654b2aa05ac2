// Command handlers module
pub mod monitor;
pub mod probe;
pub mod version;

// Re-exports for cleaner imports
pub use monitor::{execute as monitor, MonitorOptions};
pub use probe::execute as probe;
pub use version::execute as version;

//! Hardware probe: hostname, OS, CPU/GPU names and temperatures.
//!
//! Every lookup is best effort. Individual failures degrade to sentinel
//! values (`unknown-cpu`, `unknown-gpu`, missing temperatures) rather than
//! surfacing as errors.

pub mod collector;
pub mod cpu;
pub mod gpu;
pub mod os;
pub mod temperature;
pub mod types;

pub use collector::SystemProbe;
pub use types::*;

use crate::error::ProbeError;

/// Source of hardware information for heartbeats
pub trait HardwareProbe {
    fn probe(&mut self) -> Result<HardwareInfo, ProbeError>;
}

impl<P: HardwareProbe + ?Sized> HardwareProbe for Box<P> {
    fn probe(&mut self) -> Result<HardwareInfo, ProbeError> {
        (**self).probe()
    }
}

/// A fixed description is a probe that always answers the same
impl HardwareProbe for HardwareInfo {
    fn probe(&mut self) -> Result<HardwareInfo, ProbeError> {
        Ok(self.clone())
    }
}

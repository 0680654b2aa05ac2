//! NVIDIA GPU name and temperature through NVML.
//!
//! NVML is the library behind `nvidia-smi`; reading it directly avoids a
//! process spawn on every heartbeat.

#[cfg(feature = "nvml")]
use nvml_wrapper::enum_wrappers::device::TemperatureSensor;
#[cfg(feature = "nvml")]
use nvml_wrapper::Nvml;
#[cfg(feature = "nvml")]
use once_cell::sync::Lazy;

use crate::error::ProbeError;

/// Singleton - NVML must be initialized ONCE only
#[cfg(feature = "nvml")]
static NVML: Lazy<Option<Nvml>> = Lazy::new(|| Nvml::init().ok());

#[cfg(feature = "nvml")]
fn first_device() -> Result<nvml_wrapper::Device<'static>, ProbeError> {
    let nvml = NVML
        .as_ref()
        .ok_or_else(|| ProbeError::Unavailable("NVML".to_string()))?;
    nvml.device_by_index(0)
        .map_err(|e| ProbeError::command_failed("nvml device_by_index(0)", e))
}

#[cfg(feature = "nvml")]
pub fn gpu_name() -> Result<String, ProbeError> {
    first_device()?
        .name()
        .map_err(|e| ProbeError::command_failed("nvml name", e))
}

#[cfg(feature = "nvml")]
pub fn gpu_temperature() -> Option<f32> {
    first_device()
        .ok()?
        .temperature(TemperatureSensor::Gpu)
        .ok()
        .map(|t| t as f32)
}

#[cfg(not(feature = "nvml"))]
pub fn gpu_name() -> Result<String, ProbeError> {
    Err(ProbeError::Unavailable("NVML".to_string()))
}

#[cfg(not(feature = "nvml"))]
pub fn gpu_temperature() -> Option<f32> {
    None
}

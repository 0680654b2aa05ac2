use crate::error::ProbeError;
use crate::platform::nvidia_nvml;

use super::types::UNKNOWN_GPU;

/// GPU model name.
///
/// Order: NVML, platform tools, then a guess at integrated graphics from the
/// CPU vendor.
pub fn collect(cpu_name: &str) -> Result<String, ProbeError> {
    nvidia_nvml::gpu_name()
        .or_else(|_| platform_gpu_name())
        .or_else(|e| integrated_from_cpu(cpu_name).ok_or(e))
}

/// Integrated graphics implied by the CPU model, if any
pub fn integrated_from_cpu(cpu_name: &str) -> Option<String> {
    let cpu = cpu_name.to_lowercase();
    if cpu.contains("intel") {
        Some("Intel Integrated Graphics".to_string())
    } else if cpu.contains("amd") {
        Some("AMD Integrated Graphics".to_string())
    } else if cpu.contains("arm") || cpu.contains("cortex") {
        Some("ARM Integrated Graphics".to_string())
    } else {
        None
    }
}

#[cfg(target_os = "linux")]
fn platform_gpu_name() -> Result<String, ProbeError> {
    crate::platform::linux::gpu_name()
}

#[cfg(target_os = "macos")]
fn platform_gpu_name() -> Result<String, ProbeError> {
    crate::platform::macos::gpu_name()
}

#[cfg(windows)]
fn platform_gpu_name() -> Result<String, ProbeError> {
    crate::platform::windows::gpu_name()
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
fn platform_gpu_name() -> Result<String, ProbeError> {
    Err(ProbeError::Unavailable("GPU name".to_string()))
}

pub fn get_fallback() -> String {
    UNKNOWN_GPU.to_string()
}

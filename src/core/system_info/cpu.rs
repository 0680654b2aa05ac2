use sysinfo::{CpuRefreshKind, RefreshKind, System};

use crate::error::ProbeError;

use super::types::UNKNOWN_CPU;

/// CPU model name: sysinfo first, then the platform tools
pub fn collect() -> Result<String, ProbeError> {
    let refresh = RefreshKind::nothing().with_cpu(CpuRefreshKind::everything());
    let sys = System::new_with_specifics(refresh);

    let brand = sys
        .cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty());

    match brand {
        Some(brand) => Ok(brand),
        None => platform_cpu_name(),
    }
}

#[cfg(target_os = "linux")]
fn platform_cpu_name() -> Result<String, ProbeError> {
    crate::platform::linux::cpu_name()
}

#[cfg(target_os = "macos")]
fn platform_cpu_name() -> Result<String, ProbeError> {
    crate::platform::macos::cpu_name()
}

#[cfg(windows)]
fn platform_cpu_name() -> Result<String, ProbeError> {
    crate::platform::windows::cpu_name()
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
fn platform_cpu_name() -> Result<String, ProbeError> {
    Err(ProbeError::Unavailable("CPU name".to_string()))
}

pub fn get_fallback() -> String {
    UNKNOWN_CPU.to_string()
}

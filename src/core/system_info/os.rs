use sysinfo::System;

use crate::error::ProbeError;

pub fn hostname() -> Result<String, ProbeError> {
    System::host_name()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ProbeError::Unavailable("hostname".to_string()))
}

/// OS description like `macOS 15.6.1 aarch64` or `Ubuntu 24.04 x86_64`
pub fn collect() -> Result<String, ProbeError> {
    #[cfg(target_os = "macos")]
    {
        if let Ok(os) = crate::platform::macos::os_string() {
            return Ok(os);
        }
    }

    let name = System::name().ok_or_else(|| ProbeError::Unavailable("OS name".to_string()))?;
    let version = System::os_version().unwrap_or_default();

    Ok([name.as_str(), version.as_str(), std::env::consts::ARCH]
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" "))
}

pub fn get_fallback() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}

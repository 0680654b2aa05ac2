use log::debug;

use super::temperature::TemperatureReader;
use super::types::{HardwareInfo, UNKNOWN_HOST};
use super::{cpu, gpu, os, HardwareProbe};
use crate::error::ProbeError;

/// Static part of the hardware description; probed once per process
#[derive(Debug, Clone)]
struct Identity {
    hostname: String,
    os: String,
    cpu: String,
    gpu: String,
}

/// Collect hostname, OS, CPU and GPU names, falling back per field
fn collect_identity() -> Identity {
    let hostname = os::hostname().unwrap_or_else(|e| {
        debug!("Hostname lookup failed: {}", e);
        UNKNOWN_HOST.to_string()
    });

    let os_name = os::collect().unwrap_or_else(|e| {
        debug!("Failed to collect OS info: {}", e);
        os::get_fallback()
    });

    let cpu_name = cpu::collect().unwrap_or_else(|e| {
        debug!("Failed to collect CPU info: {}", e);
        cpu::get_fallback()
    });

    let gpu_name = gpu::collect(&cpu_name).unwrap_or_else(|e| {
        debug!("Failed to collect GPU info: {}", e);
        gpu::get_fallback()
    });

    Identity {
        hostname,
        os: os_name,
        cpu: cpu_name,
        gpu: gpu_name,
    }
}

/// Probe backed by the local machine
pub struct SystemProbe {
    identity: Option<Identity>,
    temperatures: TemperatureReader,
}

impl SystemProbe {
    pub fn new() -> Self {
        Self {
            identity: None,
            temperatures: TemperatureReader::new(),
        }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareProbe for SystemProbe {
    fn probe(&mut self) -> Result<HardwareInfo, ProbeError> {
        let identity = self.identity.get_or_insert_with(collect_identity).clone();

        Ok(HardwareInfo {
            hostname: identity.hostname,
            os: identity.os,
            cpu: identity.cpu,
            gpu: identity.gpu,
            cpu_temperature: self.temperatures.cpu(),
            gpu_temperature: self.temperatures.gpu(),
        })
    }
}

//! CPU and GPU temperature readings.

use sysinfo::Components;

use super::types::round_celsius;
use crate::platform::nvidia_nvml;

/// Sensor label fragments that identify a CPU package, most specific first
const CPU_SENSOR_HINTS: [&str; 7] = [
    "coretemp",
    "k10temp",
    "zenpower",
    "cpu_thermal",
    "tctl",
    "package id",
    "cpu",
];

const GPU_SENSOR_HINTS: [&str; 4] = ["amdgpu", "nouveau", "radeon", "gpu"];

/// Keeps the sysinfo sensor list alive between heartbeats
pub struct TemperatureReader {
    components: Components,
}

impl TemperatureReader {
    pub fn new() -> Self {
        Self {
            components: Components::new_with_refreshed_list(),
        }
    }

    fn readings(&mut self) -> Vec<(String, f32)> {
        self.components.refresh(true);
        self.components
            .iter()
            .filter_map(|comp| comp.temperature().map(|t| (comp.label().to_string(), t)))
            .collect()
    }

    pub fn cpu(&mut self) -> Option<f32> {
        let readings = self.readings();
        pick_reading(&readings, &CPU_SENSOR_HINTS)
            .or_else(platform_cpu_temperature)
            .map(round_celsius)
    }

    pub fn gpu(&mut self) -> Option<f32> {
        nvidia_nvml::gpu_temperature()
            .or_else(platform_gpu_temperature)
            .or_else(|| {
                let readings = self.readings();
                pick_reading(&readings, &GPU_SENSOR_HINTS)
            })
            .map(round_celsius)
    }
}

impl Default for TemperatureReader {
    fn default() -> Self {
        Self::new()
    }
}

/// First plausible reading whose label matches a hint, hints in priority order
pub fn pick_reading(readings: &[(String, f32)], hints: &[&str]) -> Option<f32> {
    hints.iter().find_map(|hint| {
        readings
            .iter()
            .find(|(label, temp)| label.to_lowercase().contains(hint) && *temp > 0.0)
            .map(|(_, temp)| *temp)
    })
}

#[cfg(target_os = "linux")]
fn platform_cpu_temperature() -> Option<f32> {
    None
}

#[cfg(target_os = "macos")]
fn platform_cpu_temperature() -> Option<f32> {
    crate::platform::macos::cpu_temperature()
}

#[cfg(windows)]
fn platform_cpu_temperature() -> Option<f32> {
    crate::platform::windows::cpu_temperature()
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
fn platform_cpu_temperature() -> Option<f32> {
    None
}

#[cfg(target_os = "linux")]
fn platform_gpu_temperature() -> Option<f32> {
    crate::platform::linux::gpu_temperature()
}

#[cfg(not(target_os = "linux"))]
fn platform_gpu_temperature() -> Option<f32> {
    None
}

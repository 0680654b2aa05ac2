//! Linux hardware probes: procfs, sysfs and the usual CLI tools.

use std::fs;
use std::path::Path;

use super::command::{find_field, run_command};
use crate::error::ProbeError;

pub fn cpu_name() -> Result<String, ProbeError> {
    if let Some(name) = fs::read_to_string("/proc/cpuinfo")
        .ok()
        .and_then(|text| parse_cpuinfo(&text))
    {
        return Ok(name);
    }

    let lscpu = run_command("lscpu", &[])?;
    find_field(&lscpu, "Model name", ':')
        .ok_or_else(|| ProbeError::Parse("lscpu output".to_string()))
}

/// CPU model from `/proc/cpuinfo`, including the ARM `Processor`/`Hardware` keys
pub fn parse_cpuinfo(text: &str) -> Option<String> {
    find_field(text, "model name", ':')
        .or_else(|| find_field(text, "Processor", ':'))
        .or_else(|| find_field(text, "Hardware", ':').map(|hw| format!("ARM {}", hw)))
}

pub fn gpu_name() -> Result<String, ProbeError> {
    if let Some(name) = run_command("lspci", &[]).ok().and_then(|out| parse_lspci_gpu(&out)) {
        return Ok(name);
    }

    if let Ok(name) = run_command("nvidia-smi", &["--query-gpu=name", "--format=csv,noheader"]) {
        if let Some(first) = name.lines().next() {
            return Ok(first.trim().to_string());
        }
    }

    if let Some(name) = nvidia_proc_model() {
        return Ok(name);
    }

    let glxinfo = run_command("glxinfo", &[])?;
    find_field(&glxinfo, "OpenGL renderer string", ':')
        .ok_or_else(|| ProbeError::Parse("glxinfo output".to_string()))
}

/// First VGA/display/3D controller in `lspci` output
pub fn parse_lspci_gpu(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let lower = line.to_lowercase();
        if !(lower.contains("vga") || lower.contains("display") || lower.contains("3d")) {
            return None;
        }
        let name = line.rsplit(':').next()?.trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}

fn nvidia_proc_model() -> Option<String> {
    let entries = fs::read_dir("/proc/driver/nvidia/gpus").ok()?;
    entries.flatten().find_map(|entry| {
        let info = fs::read_to_string(entry.path().join("information")).ok()?;
        find_field(&info, "Model", ':')
    })
}

pub fn gpu_temperature() -> Option<f32> {
    run_command(
        "nvidia-smi",
        &["--query-gpu=temperature.gpu", "--format=csv,noheader,nounits"],
    )
    .ok()
    .and_then(|out| out.lines().next().and_then(|l| l.trim().parse::<f32>().ok()))
    .or_else(drm_hwmon_temperature)
}

/// AMD/Intel GPUs expose `temp1_input` (millidegrees) under the DRM hwmon node
fn drm_hwmon_temperature() -> Option<f32> {
    let cards = fs::read_dir("/sys/class/drm").ok()?;
    cards
        .flatten()
        .filter(|card| card.file_name().to_string_lossy().starts_with("card"))
        .find_map(|card| read_hwmon_temp(&card.path().join("device").join("hwmon")))
}

fn read_hwmon_temp(hwmon_dir: &Path) -> Option<f32> {
    let monitors = fs::read_dir(hwmon_dir).ok()?;
    monitors.flatten().find_map(|monitor| {
        let raw = fs::read_to_string(monitor.path().join("temp1_input")).ok()?;
        raw.trim().parse::<f32>().ok().map(|milli| milli / 1000.0)
    })
}

//! macOS hardware probes built on `sw_vers`, `sysctl` and `system_profiler`.

use super::command::run_command;
use crate::error::ProbeError;

pub fn os_string() -> Result<String, ProbeError> {
    let version = run_command("sw_vers", &["-productVersion"])?;
    Ok(format!("macOS {} {}", version, std::env::consts::ARCH))
}

pub fn cpu_name() -> Result<String, ProbeError> {
    run_command("sysctl", &["-n", "machdep.cpu.brand_string"])
}

pub fn gpu_name() -> Result<String, ProbeError> {
    let json = run_command("system_profiler", &["SPDisplaysDataType", "-json"])?;
    parse_displays_json(&json)
        .ok_or_else(|| ProbeError::Parse("system_profiler output".to_string()))
}

/// `_name` of the first entry of `SPDisplaysDataType`
pub fn parse_displays_json(json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(json).ok()?;
    value["SPDisplaysDataType"]
        .as_array()?
        .first()?
        .get("_name")?
        .as_str()
        .map(str::to_string)
}

/// Needs root; silently absent otherwise
pub fn cpu_temperature() -> Option<f32> {
    let out = run_command("powermetrics", &["--samplers", "smc", "-n", "1", "-i", "1000"]).ok()?;
    parse_powermetrics(&out)
}

pub fn parse_powermetrics(text: &str) -> Option<f32> {
    text.lines()
        .find(|line| line.contains("CPU die temperature"))
        .and_then(|line| line.rsplit(':').next())
        .and_then(|value| value.trim().trim_end_matches('C').trim().parse::<f32>().ok())
}

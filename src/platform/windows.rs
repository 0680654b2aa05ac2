//! Windows hardware probes through PowerShell CIM queries.

use super::command::run_command;
use crate::error::ProbeError;

fn cim_property(class: &str, property: &str) -> Result<String, ProbeError> {
    let query = format!(
        "Get-CimInstance -ClassName {} | Select-Object -ExpandProperty {}",
        class, property
    );
    let out = run_command("powershell", &["-NoProfile", "-Command", &query])?;
    out.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ProbeError::Parse(format!("{}.{}", class, property)))
}

pub fn cpu_name() -> Result<String, ProbeError> {
    cim_property("Win32_Processor", "Name")
}

pub fn gpu_name() -> Result<String, ProbeError> {
    cim_property("Win32_VideoController", "Name")
}

/// ACPI thermal zone, reported in tenths of a Kelvin
pub fn cpu_temperature() -> Option<f32> {
    let out = run_command(
        "powershell",
        &[
            "-NoProfile",
            "-Command",
            "Get-CimInstance -Namespace root/wmi -ClassName MSAcpi_ThermalZoneTemperature | Select-Object -ExpandProperty CurrentTemperature",
        ],
    )
    .ok()?;
    let tenths_kelvin: f32 = out.lines().next()?.trim().parse().ok()?;
    Some(tenths_kelvin / 10.0 - 273.15)
}

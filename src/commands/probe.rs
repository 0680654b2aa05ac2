use anyhow::Result;
use colored::Colorize;

use crate::core::system_info::{HardwareInfo, HardwareProbe, SystemProbe};
use crate::ui;

/// Print what a heartbeat would report about this machine
pub fn execute() -> Result<()> {
    let mut probe = SystemProbe::new();
    let info = probe.probe().unwrap_or_else(|e| {
        ui::warn(&format!("Hardware probe failed: {}", e));
        HardwareInfo::fallback()
    });

    println!("{}", "Hardware".white().bold());
    println!("  {:<10} {}", "Hostname:".dimmed(), info.hostname);
    println!("  {:<10} {}", "OS:".dimmed(), info.os);
    println!("  {:<10} {}", "CPU:".dimmed(), info.cpu);
    println!("  {:<10} {}", "GPU:".dimmed(), info.gpu);
    println!(
        "  {:<10} {}",
        "CPU temp:".dimmed(),
        format_temperature(info.cpu_temperature)
    );
    println!(
        "  {:<10} {}",
        "GPU temp:".dimmed(),
        format_temperature(info.gpu_temperature)
    );

    Ok(())
}

fn format_temperature(value: Option<f32>) -> String {
    value
        .map(|t| format!("{:.1}°C", t))
        .unwrap_or_else(|| "n/a".to_string())
}

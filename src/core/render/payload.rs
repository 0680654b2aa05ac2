//! The heartbeat record sent to the collector.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::progress::ProgressSnapshot;
use super::status::NodeStatus;
use crate::core::system_info::HardwareInfo;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeartbeatPayload {
    pub hostname: String,
    pub os: String,
    pub cpu: String,
    pub gpu: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_temperature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_temperature: Option<String>,
    pub timestamp: String,
    pub sentry_secret: String,
    pub status: NodeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_progress: Option<ProgressSnapshot>,
}

impl HeartbeatPayload {
    pub fn build(
        hardware: &HardwareInfo,
        secret: &str,
        status: NodeStatus,
        progress: Option<&ProgressSnapshot>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            hostname: hardware.hostname.clone(),
            os: hardware.os.clone(),
            cpu: hardware.cpu.clone(),
            gpu: hardware.gpu.clone(),
            cpu_temperature: hardware.cpu_temperature.map(format_celsius),
            gpu_temperature: hardware.gpu_temperature.map(format_celsius),
            timestamp: iso_timestamp(now),
            sentry_secret: secret.to_string(),
            status,
            render_progress: progress.cloned(),
        }
    }
}

/// UTC, second precision, `Z` suffix: `2025-09-08T02:21:00Z`
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn format_celsius(value: f32) -> String {
    format!("{:.1}°C", value)
}

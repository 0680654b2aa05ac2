use serde::{Deserialize, Serialize};

pub const UNKNOWN_HOST: &str = "unknown-host";
pub const UNKNOWN_CPU: &str = "unknown-cpu";
pub const UNKNOWN_GPU: &str = "unknown-gpu";

/// Hardware identity and temperatures of the render node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareInfo {
    pub hostname: String,
    pub os: String,
    pub cpu: String,
    pub gpu: String,
    pub cpu_temperature: Option<f32>, // °C
    pub gpu_temperature: Option<f32>, // °C
}

impl HardwareInfo {
    /// Sentinel values used when probing fails outright
    pub fn fallback() -> Self {
        Self {
            hostname: UNKNOWN_HOST.to_string(),
            os: super::os::get_fallback(),
            cpu: UNKNOWN_CPU.to_string(),
            gpu: UNKNOWN_GPU.to_string(),
            cpu_temperature: None,
            gpu_temperature: None,
        }
    }

    /// One-line summary for the console, e.g. `CPU: Ryzen 9 (54.0°C), GPU: RTX 4090`
    pub fn summary(&self) -> String {
        let mut summary = format!("CPU: {}", self.cpu);
        if let Some(temp) = self.cpu_temperature {
            summary.push_str(&format!(" ({:.1}°C)", temp));
        }
        summary.push_str(&format!(", GPU: {}", self.gpu));
        if let Some(temp) = self.gpu_temperature {
            summary.push_str(&format!(" ({:.1}°C)", temp));
        }
        summary
    }
}

/// Round a sensor reading to one decimal place
pub fn round_celsius(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::{SentryConfig, EXPECTED_FORMAT};
use crate::core::render::{FrameScanner, HeartbeatScheduler, ScheduleSettings, SystemClock};
use crate::core::system_info::SystemProbe;
use crate::core::transport::{HttpTransport, DEFAULT_TIMEOUT};
use crate::ui::{self, StatusDisplay};

/// Everything the `monitor` command can take from the command line.
/// Missing directory and frame values are asked for interactively.
#[derive(Debug, Clone, Default)]
pub struct MonitorOptions {
    pub config_path: Option<PathBuf>,
    pub dir: Option<PathBuf>,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub check_interval: Option<u64>,
    pub post_interval: Option<u64>,
    pub timeout: Option<u64>,
}

impl MonitorOptions {
    pub fn schedule_settings(&self) -> ScheduleSettings {
        let defaults = ScheduleSettings::default();
        ScheduleSettings {
            check_interval: self
                .check_interval
                .map(Duration::from_secs)
                .unwrap_or(defaults.check_interval),
            post_interval: self
                .post_interval
                .map(Duration::from_secs)
                .unwrap_or(defaults.post_interval),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout.map(Duration::from_secs).unwrap_or(DEFAULT_TIMEOUT)
    }
}

pub fn execute(options: MonitorOptions) -> Result<()> {
    let config = match SentryConfig::load(options.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            ui::error(&format!("✗ {}", e));
            eprintln!();
            eprintln!("Expected format:");
            eprintln!("{}", EXPECTED_FORMAT.dimmed());
            std::process::exit(1);
        }
    };
    log::info!("Using collector at {}", config.server_address());

    let dir = match &options.dir {
        Some(dir) => ui::validate_render_dir(dir)?,
        None => ui::prompt_render_dir()?,
    };
    let range = ui::prompt_frame_range(options.start, options.end)?;

    let transport = HttpTransport::new(&config.server_host, config.server_port, options.timeout())?;

    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_flag_clone = cancel_flag.clone();

    // Setup Ctrl+C handler
    ctrlc::set_handler(move || {
        println!();
        println!("{}", "Stopping sentry...".yellow().bold());
        cancel_flag_clone.store(true, Ordering::Relaxed);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    let mut scheduler = HeartbeatScheduler::new(
        FrameScanner::new(&dir, range),
        config.sentry_secret.clone(),
        options.schedule_settings(),
        SystemClock,
        transport,
        SystemProbe::new(),
    )
    .with_cancel_flag(cancel_flag);

    let display = StatusDisplay::new(&config, scheduler.hardware().summary(), &dir, range);

    if let Err(e) = display.draw(&scheduler.preview(), scheduler.state()) {
        log::debug!("Failed to draw status: {}", e);
    }

    scheduler.run(|report, state| {
        if report.emitted.is_none() {
            return;
        }
        if let Err(e) = display.draw(report, state) {
            log::debug!("Failed to draw status: {}", e);
        }
    });

    println!();
    ui::success("Sentry stopped. Goodbye!");
    Ok(())
}

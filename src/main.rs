use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

use mata_sentry::commands::{self, MonitorOptions};
use mata_sentry::ui;

fn cli() -> Command {
    Command::new("mata-sentry")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Watches a render output directory and reports progress to a collector")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to the sentry_secret file")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(monitor_command())
        .subcommand(Command::new("probe").about("Print the hardware summary of this machine"))
        .subcommand(Command::new("version").about("Shows version information"))
}

fn monitor_command() -> Command {
    Command::new("monitor")
        .about("Monitor a render directory and send heartbeats (default)")
        .arg(
            Arg::new("dir")
                .short('d')
                .long("dir")
                .value_name("PATH")
                .help("Render output directory (prompted if omitted)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("start")
                .short('s')
                .long("start")
                .value_name("FRAME")
                .help("First frame of the job")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("end")
                .short('e')
                .long("end")
                .value_name("FRAME")
                .help("Last frame of the job")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("check-interval")
                .long("check-interval")
                .value_name("SECONDS")
                .help("Pause between directory scans (default: 2)")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("post-interval")
                .long("post-interval")
                .value_name("SECONDS")
                .help("Longest gap between two heartbeats (default: 30)")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .help("HTTP timeout for each heartbeat (default: 10)")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

fn monitor_options(matches: &ArgMatches, sub_matches: Option<&ArgMatches>) -> MonitorOptions {
    let mut options = MonitorOptions {
        config_path: matches.get_one::<PathBuf>("config").cloned(),
        ..Default::default()
    };

    if let Some(sub) = sub_matches {
        if let Some(config) = sub.get_one::<PathBuf>("config") {
            options.config_path = Some(config.clone());
        }
        options.dir = sub.get_one::<PathBuf>("dir").cloned();
        options.start = sub.get_one::<i64>("start").copied();
        options.end = sub.get_one::<i64>("end").copied();
        options.check_interval = sub.get_one::<u64>("check-interval").copied();
        options.post_interval = sub.get_one::<u64>("post-interval").copied();
        options.timeout = sub.get_one::<u64>("timeout").copied();
    }

    options
}

fn run(matches: &ArgMatches) -> Result<()> {
    if matches.get_flag("version") {
        return commands::version();
    }

    match matches.subcommand() {
        Some(("monitor", sub_matches)) => {
            commands::monitor(monitor_options(matches, Some(sub_matches)))
        }
        Some(("probe", _)) => commands::probe(),
        Some(("version", _)) => commands::version(),
        _ => commands::monitor(monitor_options(matches, None)),
    }
}

fn main() {
    let matches = cli().get_matches();

    let verbose = matches.get_flag("verbose")
        || matches
            .subcommand()
            .map(|(_, sub)| sub.get_flag("verbose"))
            .unwrap_or(false);
    mata_sentry::init_logging(verbose);

    if let Err(e) = run(&matches) {
        ui::error(&format!("Error: {}", e));
        std::process::exit(1);
    }
}

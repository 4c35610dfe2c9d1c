//! statline - one status line per invocation.
//!
//! Startup tier only: argument handling, logging setup, process priority,
//! device handle acquisition. Sampling and assembly live in the library.

use std::fs::File;
use std::io::{self, Write};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{debug, Level};

use statline::cli::{Args, LogLevel};
use statline::probes::battery::BatteryProbe;
use statline::StatusLine;

const MIXER_DEV: &str = "/dev/snd/controlC0";

/// Initializes tracing logging with the configured level, writing to
/// stderr so stdout stays reserved for the status line.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => Level::ERROR,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.interface == "version" {
        println!(
            "statline {} (built {})",
            env!("CARGO_PKG_VERSION"),
            env!("VERGEN_BUILD_DATE")
        );
        return Ok(());
    }

    setup_logging(&args);

    // SAFETY: setpriority takes no pointers
    if unsafe { libc::setpriority(libc::PRIO_PROCESS as _, 0, 10) } != 0 {
        bail!("setpriority failed: {}", io::Error::last_os_error());
    }

    let battery = BatteryProbe::open().context("open power-supply device")?;
    // Placeholder handle for the removed volume readout; held for the run
    // and released with the battery device on every exit path.
    let _mixer = File::open(MIXER_DEV).context("open mixer device")?;
    debug!(interface = %args.interface, "device handles acquired");

    let mut status = StatusLine::new(args.interface, battery);
    let line = status.render();

    let mut stdout = io::stdout().lock();
    stdout.write_all(line.as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()?; // unbuffered handoff to the piped bar host
    Ok(())
}

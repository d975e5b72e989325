// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use clap::{Parser, ValueHint};

use routon::device::sim::VirtualActuator;
use routon::device::SystemStopwatch;
use routon::kernel::Calibration;
use routon::runtime::ComponentContext;

/// Wheel revolutions per second at full open-loop output, used to scale
/// the virtual drivetrain.
const DRIVE_FULL_SPEED_RPS: f32 = 2.8;

#[derive(Parser)]
#[command(author = "Copyright (C) 2024 Laixer Equipment B.V.")]
#[command(version, propagate_version = true)]
#[command(about = "Routon routine executor", long_about = None)]
struct Args {
    /// Routine configuration file.
    #[arg(value_hint = ValueHint::FilePath)]
    file: std::path::PathBuf,
    /// Control cycle interval in milliseconds.
    #[arg(short, long, default_value_t = 20)]
    interval: u64,
    /// Enable sensor jitter.
    #[arg(long, default_value_t = false)]
    jitter: bool,
    /// Quiet output (no logging).
    #[arg(long)]
    quiet: bool,
    /// Daemonize the service.
    #[arg(short = 'D', long)]
    daemon: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use log::LevelFilter;

    let args = Args::parse();

    let mut config: routon::Config = routon::from_file(&args.file)?;

    if args.jitter {
        config.simulation.jitter = true;
    }

    let log_level = if args.daemon {
        LevelFilter::Info
    } else if args.quiet {
        LevelFilter::Off
    } else {
        match args.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    if args.daemon {
        log::set_boxed_logger(Box::new(routon::logger::SystemdLogger::with_level(
            log_level,
        )))?;
        log::set_max_level(log_level);
    } else {
        let mut log_config = simplelog::ConfigBuilder::new();

        log_config.set_target_level(LevelFilter::Off);
        log_config.set_location_level(LevelFilter::Off);
        log_config.add_filter_ignore_str("mio");

        simplelog::TermLogger::init(
            log_level,
            log_config.build(),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )?;
    }

    if args.daemon {
        log::debug!("Running service as daemon");
    }

    log::info!(
        "Hello, I'm a {} 🤖. Hand me a routine!",
        ansi_term::Color::Yellow.paint(config.machine.model.clone())
    );

    let instance_id = match &config.machine.id {
        Some(id) => uuid::Uuid::parse_str(id)?,
        None => uuid::Uuid::new_v4(),
    };

    let instance = routon::core::Instance::new(instance_id, &config.machine.model, (0, 3, 1));

    log::info!("{}", instance);

    if config.simulation.jitter {
        log::info!("Sensor jitter is enabled");
    }

    let mut routine = routon::kernel::assemble(&config)?;

    log::info!(
        "Routine holds {} steps ({} executors)",
        routine.step_count(),
        routine.len()
    );

    let calibration = Calibration::new(
        config.machine.counts_per_revolution,
        config.machine.wheel_circumference,
        config.machine.overshoot_gain,
    );

    let rate = config.machine.counts_per_revolution * DRIVE_FULL_SPEED_RPS;
    let jitter = config.simulation.jitter;

    // Both drivetrain encoders run with inverted sensor phase, matching
    // the mirrored channel wiring the sign conventions assume.
    let mut ctx = ComponentContext::new(
        Box::new(VirtualActuator::new(rate, true, jitter)),
        Box::new(VirtualActuator::new(rate, true, jitter)),
        Box::new(VirtualActuator::new(rate, false, jitter)),
        Box::new(VirtualActuator::new(rate, false, jitter)),
        Box::new(SystemStopwatch::new()),
        calibration,
        routine.step_count(),
    );

    let mut runtime = routon::Runtime::new();
    runtime.enable_term_shutdown();

    runtime
        .run_interval(
            &mut routine,
            &mut ctx,
            std::time::Duration::from_millis(args.interval.clamp(1, 1_000)),
        )
        .await;

    log::debug!("{} was shutdown gracefully", env!("CARGO_BIN_NAME"));

    Ok(())
}

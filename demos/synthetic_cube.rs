//! Synthetic Cube Demo
//!
//! Spins the reference cube on a virtual turntable and logs the attitude
//! every few ticks. No hardware needed.
//!
//! Run with: cargo run -p attitude_demos --bin synthetic_cube [config.toml]
//!
//! With a config path, the configured source and engine are used instead of
//! the turntable.

use std::thread;
use std::time::Duration;

use attitude_engine::{EngineConfig, Scheduler};
use config_loader::ConfigLoader;
use contracts::{ContractError, SampleSource, Vector3};
use renderers::{LogRenderer, RendererSet};
use sample_source::build_source;

/// Still while the engine calibrates, then turns about z at a fixed rate
struct Turntable {
    settle_reads: u64,
    rate_lsb: f64,
    gyro_reads: u64,
}

impl SampleSource for Turntable {
    fn name(&self) -> &str {
        "turntable"
    }

    fn read_accel(&mut self) -> Result<Vector3, ContractError> {
        Ok(Vector3::new(0.0, 0.0, 1.0))
    }

    fn read_gyro(&mut self) -> Result<Vector3, ContractError> {
        self.gyro_reads += 1;
        if self.gyro_reads <= self.settle_reads {
            Ok(Vector3::ZERO)
        } else {
            Ok(Vector3::new(0.0, 0.0, self.rate_lsb))
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init_tracing(observability::LogFormat::Pretty, "info")?;

    tracing::info!("Starting synthetic cube demo");

    let (engine, source): (EngineConfig, Box<dyn SampleSource>) =
        if let Some(path) = std::env::args().nth(1) {
            tracing::info!(path = %path, "Loading run config");
            let blueprint = ConfigLoader::load_from_path(std::path::Path::new(&path))?;
            (blueprint.engine, build_source(&blueprint.source)?)
        } else {
            let mut engine = EngineConfig::default();
            engine.calibration.sample_count = 20;
            engine.calibration.sample_delay_ms = 5;
            let turntable = Turntable {
                settle_reads: u64::from(engine.calibration.sample_count),
                rate_lsb: 30.0 * engine.sensor.gyro_range.sensitivity(),
                gyro_reads: 0,
            };
            (engine, Box::new(turntable) as Box<dyn SampleSource>)
        };

    let mut renderers = RendererSet::new("demo");
    renderers.push(Box::new(LogRenderer::with_interval("console", 10)));

    let scheduler = Scheduler::new(engine, source, renderers);
    let stop = scheduler.stop_handle();

    thread::spawn(move || {
        thread::sleep(Duration::from_secs(5));
        tracing::info!("Demo time is up, stopping");
        stop.stop();
    });

    let summary = scheduler.start()?;
    let [roll_deg, pitch_deg, yaw_deg] = summary.final_attitude.to_degrees();
    tracing::info!(
        ticks = summary.ticks,
        overruns = summary.overruns(),
        roll_deg,
        pitch_deg,
        yaw_deg,
        "Demo finished"
    );
    println!("{}", summary.stats.summary());

    Ok(())
}

//! Fixed-period real-time loop.
//!
//! One control thread runs calibrate → (sample → estimate → compose → render
//! → sleep) until the stop flag is raised or the tick limit is reached. The
//! sleep is `max(min_sleep, period - elapsed)`; a late tick is not made up
//! for, and integration always uses the nominal period.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use contracts::{
    AttitudeState, CalibrationOffset, ContractError, EngineConfig, Geometry, RenderFrame,
    Renderer, SampleSource, TickReport, Vector3,
};
use observability::{
    record_calibration, record_render_error, record_sensor_error, record_tick_metrics,
    TickStatsAggregator,
};
use tracing::{debug, error, info, warn};

use crate::calibrator::Calibrator;
use crate::clock::{Clock, SystemClock};
use crate::composer::RotationMatrix;
use crate::estimator::{AttitudeEstimator, EstimatorParams};

/// Cooperative stop flag shared with other threads
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to end at the next iteration boundary
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Sleep remaining in the period, never shorter than `min_sleep`
pub fn sleep_budget(period: Duration, elapsed: Duration, min_sleep: Duration) -> Duration {
    period.saturating_sub(elapsed).max(min_sleep)
}

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The stop flag was raised
    Stopped,
    /// `max_ticks` reached
    MaxTicks,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u64,
    pub calibration: CalibrationOffset,
    pub final_attitude: AttitudeState,
    pub stop_reason: StopReason,
    pub stats: TickStatsAggregator,
}

impl RunSummary {
    pub fn overruns(&self) -> u64 {
        self.stats.overruns
    }
}

/// Real-time scheduler
///
/// Owns the sample source, the renderer and the clock for the run. The
/// renderer is closed exactly once when [`start`](Self::start) returns,
/// whatever the outcome.
pub struct Scheduler<S, R, C = SystemClock> {
    config: EngineConfig,
    source: S,
    renderer: R,
    clock: C,
    geometry: Geometry,
    stop: StopHandle,
}

impl<S, R> Scheduler<S, R, SystemClock>
where
    S: SampleSource,
    R: Renderer,
{
    pub fn new(config: EngineConfig, source: S, renderer: R) -> Self {
        Self::with_clock(config, source, renderer, SystemClock::new())
    }
}

impl<S, R, C> Scheduler<S, R, C>
where
    S: SampleSource,
    R: Renderer,
    C: Clock,
{
    pub fn with_clock(config: EngineConfig, source: S, renderer: R, clock: C) -> Self {
        Self {
            config,
            source,
            renderer,
            clock,
            geometry: Geometry::cube(),
            stop: StopHandle::new(),
        }
    }

    /// Replace the reference geometry (the unit cube by default)
    ///
    /// Face indices are checked by `start`.
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Handle for stopping the run from another thread
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Calibrate, then tick until stopped.
    ///
    /// Sample source and renderer failures end the run and are returned
    /// unchanged; the renderer is still closed. A period that cannot be
    /// represented as a `Duration` or a face pointing past the vertex list
    /// is rejected with `ConfigValidation` before calibration starts.
    pub fn start(mut self) -> Result<RunSummary, ContractError> {
        let result = self.run();
        let closed = self.renderer.close();

        match (result, closed) {
            (Ok(summary), Ok(())) => Ok(summary),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!(
                    renderer = %self.renderer.name(),
                    error = %close_err,
                    "Renderer close failed after run error"
                );
                Err(e)
            }
        }
    }

    fn run(&mut self) -> Result<RunSummary, ContractError> {
        let sched = &self.config.scheduler;
        let period = sched.period()?;
        let min_sleep = sched.min_sleep()?;
        let max_ticks = sched.max_ticks;

        if let Some((face, vertex)) = self.geometry.find_dangling_index() {
            return Err(ContractError::config_validation(
                format!("geometry.faces[{face}]"),
                format!(
                    "vertex index {vertex} out of range ({} vertices)",
                    self.geometry.vertices.len()
                ),
            ));
        }

        let calibrator = Calibrator::from_config(&self.config.calibration);
        let offset = match calibrator.calibrate(&mut self.source, &self.clock) {
            Ok(offset) => offset,
            Err(e) => {
                if e.is_sensor_fault() {
                    record_sensor_error(self.source.name());
                }
                error!(source = %self.source.name(), error = %e, "Calibration failed");
                return Err(e);
            }
        };
        record_calibration(&offset, calibrator.sample_count());

        let mut estimator =
            AttitudeEstimator::new(offset, EstimatorParams::from_config(&self.config));

        info!(
            source = %self.source.name(),
            renderer = %self.renderer.name(),
            period_ms = period.as_secs_f64() * 1000.0,
            max_ticks = ?max_ticks,
            "Scheduler started"
        );

        let mut stats = TickStatsAggregator::new();
        let mut transformed: Vec<Vector3> = Vec::with_capacity(self.geometry.vertices.len());
        let mut tick: u64 = 0;

        let stop_reason = loop {
            if self.stop.is_stopped() {
                break StopReason::Stopped;
            }
            if max_ticks.is_some_and(|limit| tick >= limit) {
                break StopReason::MaxTicks;
            }

            let started = self.clock.now();

            let sample = match self.source.read_sample() {
                Ok(sample) => sample,
                Err(e) => {
                    record_sensor_error(self.source.name());
                    error!(source = %self.source.name(), tick, error = %e, "Sample source failed");
                    return Err(e);
                }
            };

            let attitude = estimator.update(sample.acceleration, sample.angular_rate);
            RotationMatrix::compose(&attitude).transform_into(&self.geometry.vertices, &mut transformed);

            let frame = RenderFrame {
                tick,
                attitude,
                vertices: &transformed,
                faces: &self.geometry.faces,
            };
            if let Err(e) = self.renderer.render(&frame) {
                record_render_error(self.renderer.name());
                error!(renderer = %self.renderer.name(), tick, error = %e, "Render failed");
                return Err(e);
            }

            let processing = self.clock.now().saturating_sub(started);
            let sleep = sleep_budget(period, processing, min_sleep);
            let report = TickReport {
                tick,
                attitude,
                processing,
                sleep,
                overrun: processing > period,
            };
            if report.overrun {
                debug!(tick, processing_ms = processing.as_secs_f64() * 1000.0, "Tick overran period");
            }
            record_tick_metrics(&report);
            stats.update(&report);

            self.clock.sleep(sleep);
            tick += 1;
        };

        let final_attitude = estimator.state();
        info!(
            ticks = tick,
            overruns = stats.overruns,
            reason = ?stop_reason,
            "Scheduler stopped"
        );

        Ok(RunSummary {
            ticks: tick,
            calibration: offset,
            final_attitude,
            stop_reason,
            stats,
        })
    }
}

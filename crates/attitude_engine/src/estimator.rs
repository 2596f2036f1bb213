//! Complementary-filter attitude estimator.
//!
//! Each tick integrates the bias-corrected gyro rate over the nominal period
//! and blends roll/pitch with the accelerometer tilt:
//!
//! ```text
//! angle = alpha * (angle + rate * dt) + (1 - alpha) * accel_angle
//! ```
//!
//! Yaw has no absolute reference and is left as pure integration, so any
//! residual z bias shows up as linear yaw drift.

use contracts::{AttitudeState, CalibrationOffset, EngineConfig, Vector3};
use tracing::{instrument, trace};

/// Filter parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorParams {
    /// Gyro weight of the complementary filter
    pub alpha: f64,
    /// Integration step in seconds (the scheduler's nominal period)
    pub dt: f64,
    /// Gyro sensitivity in LSB per °/s
    pub gyro_sensitivity: f64,
}

impl EstimatorParams {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            alpha: config.filter.alpha,
            dt: config.scheduler.period_s,
            gyro_sensitivity: config.sensor.gyro_range.sensitivity(),
        }
    }
}

/// Attitude estimator
///
/// Construction requires a [`CalibrationOffset`], so an estimator is always
/// in the calibrated state. The attitude is owned here and mutated once per
/// [`update`](Self::update).
#[derive(Debug, Clone)]
pub struct AttitudeEstimator {
    offset: CalibrationOffset,
    params: EstimatorParams,
    state: AttitudeState,
}

impl AttitudeEstimator {
    pub fn new(offset: CalibrationOffset, params: EstimatorParams) -> Self {
        Self {
            offset,
            params,
            state: AttitudeState::default(),
        }
    }

    /// Start from a non-zero attitude
    pub fn with_initial_state(mut self, state: AttitudeState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> AttitudeState {
        self.state
    }

    pub fn offset(&self) -> CalibrationOffset {
        self.offset
    }

    pub fn params(&self) -> EstimatorParams {
        self.params
    }

    /// Back to roll = pitch = yaw = 0, keeping the calibration
    pub fn reset(&mut self) {
        self.state = AttitudeState::default();
    }

    /// Bias-corrected gyro rate in rad/s
    pub fn angular_rate(&self, gyro_raw: Vector3) -> Vector3 {
        let dps = self.offset.correct(gyro_raw) / self.params.gyro_sensitivity;
        Vector3::new(dps.x.to_radians(), dps.y.to_radians(), dps.z.to_radians())
    }

    /// Advance the estimate by one tick.
    ///
    /// `accel` is in g, `gyro_raw` in raw LSB.
    #[instrument(level = "trace", name = "estimator_update", skip(self))]
    pub fn update(&mut self, accel: Vector3, gyro_raw: Vector3) -> AttitudeState {
        let rate = self.angular_rate(gyro_raw);
        let dt = self.params.dt;

        let roll_gyro = self.state.roll + rate.x * dt;
        let pitch_gyro = self.state.pitch + rate.y * dt;
        let yaw_gyro = self.state.yaw + rate.z * dt;

        let (acc_roll, acc_pitch) = accel_tilt(accel);

        let alpha = self.params.alpha;
        self.state = AttitudeState {
            roll: alpha * roll_gyro + (1.0 - alpha) * acc_roll,
            pitch: alpha * pitch_gyro + (1.0 - alpha) * acc_pitch,
            yaw: yaw_gyro,
        };

        trace!(
            roll = self.state.roll,
            pitch = self.state.pitch,
            yaw = self.state.yaw,
            "attitude updated"
        );

        self.state
    }
}

/// Absolute tilt (roll, pitch) from the gravity vector, in radians.
///
/// Only meaningful while the net acceleration is close to 1 g. `atan2` is
/// total, so a zero vector yields 0 rather than an error.
pub fn accel_tilt(accel: Vector3) -> (f64, f64) {
    let roll = (-accel.x).atan2((accel.y * accel.y + accel.z * accel.z).sqrt());
    let pitch = accel.y.atan2((accel.x * accel.x + accel.z * accel.z).sqrt());
    (roll, pitch)
}

//! AttitudeState - Attitude Estimator output

use serde::{Deserialize, Serialize};

/// Orientation estimate in radians.
///
/// `roll` and `pitch` are filtered against the accelerometer tilt and stay
/// within [-π/2, π/2]. `yaw` is pure gyro integration and is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttitudeState {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl AttitudeState {
    pub const fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Angles converted to degrees (roll, pitch, yaw)
    pub fn to_degrees(&self) -> [f64; 3] {
        [
            self.roll.to_degrees(),
            self.pitch.to_degrees(),
            self.yaw.to_degrees(),
        ]
    }
}

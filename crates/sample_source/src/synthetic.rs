//! Synthetic sample source
//!
//! Implements `SampleSource` with constant readings plus optional uniform
//! noise. Used for testing and development without IMU hardware.

use contracts::{ContractError, SampleSource, SyntheticSourceConfig, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

/// Synthetic sample source
///
/// Every read returns the configured vector with independent uniform noise
/// in `[-noise, noise]` on each axis, in that channel's own unit. When
/// `fail_after` is set, every read after the first `fail_after` reads
/// (accel and gyro reads both count) fails with `SensorUnavailable`.
pub struct SyntheticSource {
    name: String,
    accel: Vector3,
    gyro: Vector3,
    noise: f64,
    fail_after: Option<u64>,
    reads: u64,
    rng: StdRng,
}

impl SyntheticSource {
    pub fn new(config: &SyntheticSourceConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        debug!(
            source = %config.name,
            noise = config.noise,
            seed = ?config.seed,
            fail_after = ?config.fail_after,
            "Created synthetic source"
        );

        Self {
            name: config.name.clone(),
            accel: config.accel.into(),
            gyro: config.gyro.into(),
            noise: config.noise,
            fail_after: config.fail_after,
            reads: 0,
            rng,
        }
    }

    /// Noise-free source returning fixed readings
    pub fn constant(accel: Vector3, gyro: Vector3) -> Self {
        Self::new(&SyntheticSourceConfig {
            accel: accel.to_array(),
            gyro: gyro.to_array(),
            seed: Some(0),
            ..Default::default()
        })
    }

    /// Reads served so far
    pub fn reads(&self) -> u64 {
        self.reads
    }

    fn next(&mut self, base: Vector3) -> Result<Vector3, ContractError> {
        if self.fail_after.is_some_and(|limit| self.reads >= limit) {
            return Err(ContractError::sensor_unavailable(
                &self.name,
                format!("injected failure after {} reads", self.reads),
            ));
        }
        self.reads += 1;

        if self.noise <= 0.0 {
            return Ok(base);
        }

        let n = self.noise;
        let jitter = Vector3::new(
            self.rng.random_range(-n..=n),
            self.rng.random_range(-n..=n),
            self.rng.random_range(-n..=n),
        );
        trace!(x = jitter.x, y = jitter.y, z = jitter.z, "noise");
        Ok(base + jitter)
    }
}

impl SampleSource for SyntheticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_accel(&mut self) -> Result<Vector3, ContractError> {
        self.next(self.accel)
    }

    fn read_gyro(&mut self) -> Result<Vector3, ContractError> {
        self.next(self.gyro)
    }
}

//! Gyro bias calibration.
//!
//! Averages a burst of angular-rate samples taken while the platform is
//! stationary. The stationary precondition is not checked: a moving platform
//! silently yields a biased offset.

use std::time::Duration;

use contracts::{CalibrationConfig, CalibrationOffset, ContractError, SampleSource, Vector3};
use tracing::{debug, info, instrument};

use crate::clock::Clock;

/// Gyro bias calibrator
#[derive(Debug, Clone)]
pub struct Calibrator {
    sample_count: u32,
    sample_delay: Duration,
}

impl Calibrator {
    pub fn new(sample_count: u32, sample_delay: Duration) -> Self {
        Self {
            sample_count,
            sample_delay,
        }
    }

    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self::new(config.sample_count, config.sample_delay())
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Average `sample_count` gyro readings into a bias offset.
    ///
    /// Sleeps `sample_delay` between reads to keep the bus from saturating.
    /// A source failure aborts calibration and is returned unchanged.
    #[instrument(
        level = "debug",
        name = "calibrate",
        skip(self, source, clock),
        fields(source = %source.name(), samples = self.sample_count)
    )]
    pub fn calibrate<S, C>(
        &self,
        source: &mut S,
        clock: &C,
    ) -> Result<CalibrationOffset, ContractError>
    where
        S: SampleSource + ?Sized,
        C: Clock + ?Sized,
    {
        if self.sample_count == 0 {
            return Err(ContractError::config_validation(
                "engine.calibration.sample_count",
                "sample_count must be >= 1",
            ));
        }

        info!(
            source = %source.name(),
            samples = self.sample_count,
            "Calibrating gyro bias, keep the platform stationary"
        );

        let mut sum = Vector3::ZERO;
        for i in 0..self.sample_count {
            sum = sum + source.read_gyro()?;
            if i + 1 < self.sample_count {
                clock.sleep(self.sample_delay);
            }
        }

        let offset = CalibrationOffset::new(sum / f64::from(self.sample_count));
        let bias = offset.vector();
        debug!(x = bias.x, y = bias.y, z = bias.z, "Gyro bias computed");

        Ok(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    struct ConstantGyro {
        gyro: Vector3,
        reads: u32,
    }

    impl SampleSource for ConstantGyro {
        fn name(&self) -> &str {
            "constant"
        }

        fn read_accel(&mut self) -> Result<Vector3, ContractError> {
            Ok(Vector3::new(0.0, 0.0, 1.0))
        }

        fn read_gyro(&mut self) -> Result<Vector3, ContractError> {
            self.reads += 1;
            Ok(self.gyro)
        }
    }

    struct AlternatingGyro {
        flip: bool,
    }

    impl SampleSource for AlternatingGyro {
        fn name(&self) -> &str {
            "alternating"
        }

        fn read_accel(&mut self) -> Result<Vector3, ContractError> {
            Ok(Vector3::ZERO)
        }

        fn read_gyro(&mut self) -> Result<Vector3, ContractError> {
            self.flip = !self.flip;
            Ok(if self.flip {
                Vector3::new(10.0, 20.0, 30.0)
            } else {
                Vector3::new(-2.0, 0.0, 2.0)
            })
        }
    }

    struct DeadBus;

    impl SampleSource for DeadBus {
        fn name(&self) -> &str {
            "dead"
        }

        fn read_accel(&mut self) -> Result<Vector3, ContractError> {
            Err(ContractError::sensor_unavailable("dead", "no ack"))
        }

        fn read_gyro(&mut self) -> Result<Vector3, ContractError> {
            Err(ContractError::sensor_unavailable("dead", "no ack"))
        }
    }

    #[test]
    fn test_constant_rate_converges_exactly() {
        let v = Vector3::new(-35.0, 12.5, 3.0);
        for n in [1, 2, 7, 50, 400] {
            let mut source = ConstantGyro { gyro: v, reads: 0 };
            let clock = ManualClock::new();
            let offset = Calibrator::new(n, Duration::from_millis(10))
                .calibrate(&mut source, &clock)
                .unwrap();
            assert!(offset.vector().approx_eq(&v, 1e-9), "n={n}");
            assert_eq!(source.reads, n);
        }
    }

    #[test]
    fn test_mean_of_mixed_samples() {
        let mut source = AlternatingGyro { flip: false };
        let offset = Calibrator::new(4, Duration::ZERO)
            .calibrate(&mut source, &ManualClock::new())
            .unwrap();
        assert_eq!(offset.vector(), Vector3::new(4.0, 10.0, 16.0));
    }

    #[test]
    fn test_inter_sample_delay() {
        let mut source = ConstantGyro {
            gyro: Vector3::ZERO,
            reads: 0,
        };
        let clock = ManualClock::new();
        Calibrator::new(5, Duration::from_millis(10))
            .calibrate(&mut source, &clock)
            .unwrap();
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(10); 4]);
    }

    #[test]
    fn test_source_failure_propagates() {
        let err = Calibrator::new(10, Duration::ZERO)
            .calibrate(&mut DeadBus, &ManualClock::new())
            .unwrap_err();
        assert!(matches!(err, ContractError::SensorUnavailable { .. }));
    }

    #[test]
    fn test_zero_samples_rejected() {
        let mut source = ConstantGyro {
            gyro: Vector3::ZERO,
            reads: 0,
        };
        let err = Calibrator::new(0, Duration::ZERO)
            .calibrate(&mut source, &ManualClock::new())
            .unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
        assert_eq!(source.reads, 0);
    }
}

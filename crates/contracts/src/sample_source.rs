//! SampleSource trait - IMU sample source abstraction
//!
//! Decouples the engine from concrete sensor drivers. Real register-level
//! drivers, synthetic generators and file replays all implement this trait.

use crate::{ContractError, RawSample, Vector3};

/// IMU sample source
///
/// Reads are synchronous and must not block longer than a bus transaction
/// timeout. Any error is fatal to the current run: the engine never retries,
/// since a silent retry would desynchronise the tick timing.
///
/// # Example
///
/// ```ignore
/// let mut source: Box<dyn SampleSource> = build_source(&config)?;
/// let sample = source.read_sample()?;
/// println!("accel z = {} g", sample.acceleration.z);
/// ```
pub trait SampleSource: Send {
    /// Source name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Read acceleration in g
    fn read_accel(&mut self) -> Result<Vector3, ContractError>;

    /// Read angular rate in raw LSB
    fn read_gyro(&mut self) -> Result<Vector3, ContractError>;

    /// Read one full sample (accel first, then gyro)
    fn read_sample(&mut self) -> Result<RawSample, ContractError> {
        let acceleration = self.read_accel()?;
        let angular_rate = self.read_gyro()?;
        Ok(RawSample {
            acceleration,
            angular_rate,
        })
    }
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read_accel(&mut self) -> Result<Vector3, ContractError> {
        (**self).read_accel()
    }

    fn read_gyro(&mut self) -> Result<Vector3, ContractError> {
        (**self).read_gyro()
    }

    fn read_sample(&mut self) -> Result<RawSample, ContractError> {
        (**self).read_sample()
    }
}

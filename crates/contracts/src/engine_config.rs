//! Engine tuning configuration shared by the loader, engine and CLI.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ContractError;

/// Attitude engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Gyro bias calibration
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Complementary filter
    #[serde(default)]
    pub filter: FilterConfig,

    /// Real-time scheduler
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Sensor full-scale ranges
    #[serde(default)]
    pub sensor: SensorRangeConfig,
}

/// Gyro bias calibration configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Number of stationary samples to average
    pub sample_count: u32,
    /// Delay between calibration samples in milliseconds
    pub sample_delay_ms: u64,
}

impl CalibrationConfig {
    pub fn sample_delay(&self) -> Duration {
        Duration::from_millis(self.sample_delay_ms)
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            sample_count: 50,
            sample_delay_ms: 10,
        }
    }
}

/// Complementary filter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Gyro weight: alpha * gyro + (1 - alpha) * accel
    pub alpha: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { alpha: 0.98 }
    }
}

/// Real-time scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Target tick period in seconds (also the integration step)
    pub period_s: f64,
    /// Lower bound of the end-of-tick sleep in seconds
    pub min_sleep_s: f64,
    /// Stop after this many ticks (None = run until stopped)
    #[serde(default)]
    pub max_ticks: Option<u64>,
}

impl SchedulerConfig {
    /// Tick period; negative, NaN or out-of-range values are rejected
    pub fn period(&self) -> Result<Duration, ContractError> {
        seconds("engine.scheduler.period_s", self.period_s)
    }

    pub fn min_sleep(&self) -> Result<Duration, ContractError> {
        seconds("engine.scheduler.min_sleep_s", self.min_sleep_s)
    }
}

fn seconds(field: &str, value: f64) -> Result<Duration, ContractError> {
    Duration::try_from_secs_f64(value).map_err(|e| {
        ContractError::config_validation(field, format!("{value} s is not a valid duration: {e}"))
    })
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period_s: 0.02,
            min_sleep_s: 0.001,
            max_ticks: None,
        }
    }
}

/// Sensor full-scale range configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorRangeConfig {
    #[serde(default)]
    pub gyro_range: GyroRange,
    #[serde(default)]
    pub accel_range: AccelRange,
}

/// Gyro full-scale range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GyroRange {
    /// ±250 °/s
    #[default]
    Dps250,
    /// ±500 °/s
    Dps500,
    /// ±1000 °/s
    Dps1000,
    /// ±2000 °/s
    Dps2000,
}

impl GyroRange {
    /// Sensitivity in LSB per °/s
    pub fn sensitivity(self) -> f64 {
        match self {
            Self::Dps250 => 131.0,
            Self::Dps500 => 65.5,
            Self::Dps1000 => 32.8,
            Self::Dps2000 => 16.4,
        }
    }

    /// FS_SEL bits of the gyro configuration register
    pub fn register_bits(self) -> u8 {
        match self {
            Self::Dps250 => 0x00,
            Self::Dps500 => 0x08,
            Self::Dps1000 => 0x10,
            Self::Dps2000 => 0x18,
        }
    }
}

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccelRange {
    /// ±2 g
    #[default]
    G2,
    /// ±4 g
    G4,
    /// ±8 g
    G8,
    /// ±16 g
    G16,
}

impl AccelRange {
    /// Sensitivity in LSB per g
    pub fn sensitivity(self) -> f64 {
        match self {
            Self::G2 => 16384.0,
            Self::G4 => 8192.0,
            Self::G8 => 4096.0,
            Self::G16 => 2048.0,
        }
    }

    /// AFS_SEL bits of the accel configuration register
    pub fn register_bits(self) -> u8 {
        match self {
            Self::G2 => 0x00,
            Self::G4 => 0x08,
            Self::G8 => 0x10,
            Self::G16 => 0x18,
        }
    }
}

//! # Sample Source
//!
//! IMU sample source implementations.
//!
//! Responsibilities:
//! - Synthetic source with seeded noise and injected failures
//! - JSONL replay of recorded samples
//! - MPU-6050 register decoding over an abstract `RegisterBus`
//! - Build a source from `SourceConfig`

pub mod factory;
pub mod mpu6050;
pub mod replay;
pub mod synthetic;

pub use contracts::{SampleSource, SourceConfig};
pub use factory::build_source;
pub use mpu6050::{BusError, Mpu6050Source, RegisterBus, MPU6050_ADDR};
pub use replay::{ReplayRecord, ReplaySource};
pub use synthetic::SyntheticSource;

//! TickReport - Scheduler output per tick
//!
//! Per-iteration timing and attitude, consumed by metrics and run summaries.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::AttitudeState;

/// Per-tick timing report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick index (starts at 0)
    pub tick: u64,

    /// Attitude after this tick's update
    pub attitude: AttitudeState,

    /// Measured processing time (sample read through render)
    pub processing: Duration,

    /// Sleep requested at the end of the tick
    pub sleep: Duration,

    /// Processing exceeded the target period
    pub overrun: bool,
}

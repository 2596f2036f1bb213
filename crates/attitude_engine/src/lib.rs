//! # Attitude Engine
//!
//! 姿态估计引擎：陀螺仪零偏标定、互补滤波、欧拉角旋转矩阵与固定周期调度。
//!
//! 负责：
//! - 静止状态下的陀螺仪零偏标定
//! - 互补滤波更新 roll / pitch / yaw
//! - Rz(yaw)·Ry(pitch)·Rx(roll) 旋转矩阵与几何体顶点变换
//! - 固定周期实时循环（协作式停止）
//!
//! ## 使用示例
//!
//! ```ignore
//! use attitude_engine::Scheduler;
//!
//! let scheduler = Scheduler::new(config.engine, source, renderer);
//! let stop = scheduler.stop_handle();
//!
//! // From another thread: stop.stop();
//! let summary = scheduler.start()?;
//! println!("{}", summary.stats.summary());
//! ```

mod calibrator;
mod clock;
mod composer;
mod estimator;
mod scheduler;

pub use calibrator::Calibrator;
pub use clock::{Clock, ManualClock, SystemClock};
pub use composer::RotationMatrix;
pub use estimator::{accel_tilt, AttitudeEstimator, EstimatorParams};
pub use scheduler::{sleep_budget, RunSummary, Scheduler, StopHandle, StopReason};

// Re-export contracts types
pub use contracts::{AttitudeState, CalibrationOffset, EngineConfig, Geometry, RawSample};

//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace: sample,
//! attitude and geometry data structures plus the `SampleSource` / `Renderer`
//! collaborator traits. Business crates depend on this crate, never the reverse.
//!
//! ## Units
//! - Acceleration in g, angular rate in raw sensor LSB
//! - Attitude angles in radians

mod attitude;
mod blueprint;
mod engine_config;
mod error;
mod geometry;
mod renderer;
mod sample;
mod sample_source;
mod telemetry;

pub use attitude::*;
pub use blueprint::*;
pub use engine_config::*;
pub use error::*;
pub use geometry::*;
pub use renderer::Renderer;
pub use sample::*;
pub use sample_source::SampleSource;
pub use telemetry::TickReport;

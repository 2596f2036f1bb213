//! Renderer trait - engine output interface
//!
//! Defines the abstract interface for geometry consumers.

use crate::{ContractError, RenderFrame};

/// Geometry consumer
///
/// Called once per tick from the scheduler thread; implementations must not
/// block materially relative to the tick period.
pub trait Renderer: Send {
    /// Renderer name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Consume one tick of transformed geometry
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), ContractError>;

    /// Flush and release resources
    fn close(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), ContractError> {
        (**self).render(frame)
    }

    fn close(&mut self) -> Result<(), ContractError> {
        (**self).close()
    }
}

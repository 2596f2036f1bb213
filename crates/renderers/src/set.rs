//! RendererSet - fan-out of one frame to several renderers

use contracts::{ContractError, RenderFrame, Renderer};
use tracing::{debug, warn};

/// Renderer that forwards every frame to each member in order
///
/// The first member failure aborts the tick and is returned. `close` closes
/// every member even if some fail, and returns the first failure.
pub struct RendererSet {
    name: String,
    renderers: Vec<Box<dyn Renderer>>,
}

impl RendererSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            renderers: Vec::new(),
        }
    }

    pub fn with_renderers(name: impl Into<String>, renderers: Vec<Box<dyn Renderer>>) -> Self {
        Self {
            name: name.into(),
            renderers,
        }
    }

    pub fn push(&mut self, renderer: Box<dyn Renderer>) {
        self.renderers.push(renderer);
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Member names, in dispatch order
    pub fn names(&self) -> Vec<&str> {
        self.renderers.iter().map(|r| r.name()).collect()
    }
}

impl Renderer for RendererSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), ContractError> {
        for renderer in &mut self.renderers {
            renderer.render(frame)?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), ContractError> {
        let mut first_error = None;
        for renderer in &mut self.renderers {
            match renderer.close() {
                Ok(()) => debug!(renderer = %renderer.name(), "closed"),
                Err(e) => {
                    warn!(renderer = %renderer.name(), error = %e, "Renderer close failed");
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

//! LogRenderer - logs attitude summary via tracing

use std::collections::HashMap;

use contracts::{ContractError, RenderFrame, Renderer};
use tracing::{info, instrument};

/// Renderer that logs the attitude every `every_n` ticks
pub struct LogRenderer {
    name: String,
    every_n: u64,
    rendered: u64,
}

impl LogRenderer {
    /// Create a new LogRenderer logging every tick
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_interval(name, 1)
    }

    /// Log one tick out of `every_n` (0 is treated as 1)
    pub fn with_interval(name: impl Into<String>, every_n: u64) -> Self {
        Self {
            name: name.into(),
            every_n: every_n.max(1),
            rendered: 0,
        }
    }

    /// Create from params map (for factory)
    ///
    /// Recognised params: `every_n`.
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let every_n = match params.get("every_n") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ContractError::config_validation(
                    format!("renderers.{name}.params.every_n"),
                    format!("invalid integer '{raw}': {e}"),
                )
            })?,
            None => 1,
        };
        Ok(Self::with_interval(name, every_n))
    }

    pub fn every_n(&self) -> u64 {
        self.every_n
    }

    /// Ticks seen so far
    pub fn rendered(&self) -> u64 {
        self.rendered
    }
}

impl Renderer for LogRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), ContractError> {
        self.rendered += 1;
        if !frame.tick.is_multiple_of(self.every_n) {
            return Ok(());
        }

        let [roll, pitch, yaw] = frame.attitude.to_degrees();
        info!(
            renderer = %self.name,
            tick = frame.tick,
            roll_deg = roll,
            pitch_deg = pitch,
            yaw_deg = yaw,
            vertices = frame.vertices.len(),
            "Attitude"
        );
        Ok(())
    }

    #[instrument(name = "log_renderer_close", skip(self))]
    fn close(&mut self) -> Result<(), ContractError> {
        info!(renderer = %self.name, ticks = self.rendered, "LogRenderer closed");
        Ok(())
    }
}

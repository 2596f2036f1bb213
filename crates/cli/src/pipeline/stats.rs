//! Pipeline statistics.

use std::time::Duration;

use attitude_engine::{RunSummary, StopReason};

/// Statistics from a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Engine run summary
    pub summary: RunSummary,

    /// Wall-clock duration including calibration
    pub duration: Duration,

    /// Sample source name
    pub source: String,

    /// Renderer names, in dispatch order
    pub renderers: Vec<String>,
}

impl PipelineStats {
    /// Achieved ticks per second over the whole run
    pub fn tick_rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.summary.ticks as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                     Attitude Run Summary                     ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        let stopped_by = match self.summary.stop_reason {
            StopReason::Stopped => "stop signal",
            StopReason::MaxTicks => "tick limit",
        };

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Ticks: {}", self.summary.ticks);
        println!("   ├─ Rate: {:.2} Hz", self.tick_rate());
        println!("   ├─ Source: {}", self.source);
        println!("   ├─ Renderers: {}", self.renderers.join(", "));
        println!("   └─ Stopped by: {}", stopped_by);

        let bias = self.summary.calibration.vector();
        let [roll, pitch, yaw] = self.summary.final_attitude.to_degrees();
        println!("\n🧭 Attitude");
        println!(
            "   ├─ Gyro bias (LSB): x={:.2}, y={:.2}, z={:.2}",
            bias.x, bias.y, bias.z
        );
        println!(
            "   └─ Final (deg): roll={:.3}, pitch={:.3}, yaw={:.3}",
            roll, pitch, yaw
        );

        println!("\n{}", self.summary.stats.summary());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{AttitudeState, CalibrationOffset};
    use observability::TickStatsAggregator;

    #[test]
    fn test_tick_rate() {
        let stats = PipelineStats {
            summary: RunSummary {
                ticks: 100,
                calibration: CalibrationOffset::default(),
                final_attitude: AttitudeState::default(),
                stop_reason: StopReason::MaxTicks,
                stats: TickStatsAggregator::new(),
            },
            duration: Duration::from_secs(2),
            source: "synthetic".to_string(),
            renderers: vec!["log".to_string()],
        };
        assert!((stats.tick_rate() - 50.0).abs() < 1e-9);
    }
}

//! Pipeline orchestrator - wires source, engine and renderers together.
//!
//! The scheduler is a blocking loop, so it runs on a `spawn_blocking` worker.
//! The async side only waits for the worker or for Ctrl+C/SIGTERM, in which
//! case it raises the stop flag and waits for the current tick to finish.

use std::time::Instant;

use anyhow::{Context, Result};
use attitude_engine::Scheduler;
use contracts::RunBlueprint;
use renderers::create_renderers;
use sample_source::build_source;
use tracing::{info, warn};

use super::PipelineStats;
use crate::error::CliError;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Validated run configuration, CLI overrides applied
    pub blueprint: RunBlueprint,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run until the tick limit, a shutdown signal, or a fatal error
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = self.config.blueprint;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let source = build_source(&blueprint.source)
            .with_context(|| format!("Failed to open sample source '{}'", blueprint.source.name()))?;
        let source_name = source.name().to_string();

        let renderers = create_renderers(&blueprint.renderers).context("Failed to create renderers")?;
        let renderer_names: Vec<String> = renderers.names().into_iter().map(String::from).collect();

        let scheduler = Scheduler::new(blueprint.engine.clone(), source, renderers)
            .with_geometry(blueprint.geometry());
        let stop = scheduler.stop_handle();

        info!(
            source = %source_name,
            renderers = ?renderer_names,
            "Starting estimation loop (keep the platform still during calibration)"
        );

        let mut worker = tokio::task::spawn_blocking(move || scheduler.start());

        let finished = tokio::select! {
            joined = &mut worker => Some(joined),
            _ = shutdown_signal() => None,
        };

        let joined = match finished {
            Some(joined) => joined,
            None => {
                warn!("Received shutdown signal, stopping at the next tick boundary...");
                stop.stop();
                worker.await
            }
        };

        let summary = joined
            .map_err(|e| CliError::worker(e.to_string()))?
            .map_err(CliError::Engine)?;

        Ok(PipelineStats {
            summary,
            duration: start_time.elapsed(),
            source: source_name,
            renderers: renderer_names,
        })
    }
}

/// Resolves on Ctrl+C or SIGTERM
///
/// If a handler cannot be installed the corresponding branch never resolves.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{SourceConfig, SyntheticSourceConfig};

    fn blueprint(max_ticks: u64, fail_after: Option<u64>) -> RunBlueprint {
        let mut blueprint = RunBlueprint {
            version: Default::default(),
            engine: Default::default(),
            source: SourceConfig::Synthetic(SyntheticSourceConfig {
                fail_after,
                ..Default::default()
            }),
            renderers: Vec::new(),
            geometry: None,
        };
        blueprint.engine.calibration.sample_count = 3;
        blueprint.engine.calibration.sample_delay_ms = 0;
        blueprint.engine.scheduler.period_s = 0.002;
        blueprint.engine.scheduler.max_ticks = Some(max_ticks);
        blueprint
    }

    #[tokio::test]
    async fn test_pipeline_runs_to_max_ticks() {
        let stats = Pipeline::new(PipelineConfig {
            blueprint: blueprint(10, None),
            metrics_port: None,
        })
        .run()
        .await
        .unwrap();

        assert_eq!(stats.summary.ticks, 10);
        assert_eq!(stats.source, "synthetic");
        assert!(stats.renderers.is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_surfaces_engine_error() {
        let err = Pipeline::new(PipelineConfig {
            blueprint: blueprint(10, Some(5)),
            metrics_port: None,
        })
        .run()
        .await
        .unwrap_err();

        assert!(err.to_string().contains("Engine run failed"), "{err:#}");
    }
}

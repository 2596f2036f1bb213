//! `run` command implementation.

use anyhow::{Context, Result};
use config_loader::{validate_engine, ConfigLoader};
use contracts::{EngineConfig, RunBlueprint};
use tracing::info;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    // Load and parse configuration
    let mut blueprint = ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    apply_overrides(&mut blueprint.engine, args)?;

    info!(
        source = %blueprint.source.name(),
        renderers = blueprint.renderers.len(),
        alpha = blueprint.engine.filter.alpha,
        period_s = blueprint.engine.scheduler.period_s,
        max_ticks = ?blueprint.engine.scheduler.max_ticks,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    let pipeline_config = PipelineConfig {
        blueprint,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    info!("Starting pipeline...");

    let stats = Pipeline::new(pipeline_config)
        .run()
        .await
        .context("Pipeline execution failed")?;

    info!(
        ticks = stats.summary.ticks,
        overruns = stats.summary.overruns(),
        duration_secs = stats.duration.as_secs_f64(),
        rate_hz = format!("{:.2}", stats.tick_rate()),
        "Pipeline completed successfully"
    );
    stats.print_summary();

    Ok(())
}

/// Apply `--alpha`, `--period` and `--max-ticks`, then re-validate the engine
/// section
fn apply_overrides(engine: &mut EngineConfig, args: &RunArgs) -> Result<(), CliError> {
    if let Some(alpha) = args.alpha {
        info!(alpha, "Overriding filter alpha from CLI");
        engine.filter.alpha = alpha;
    }
    if let Some(period) = args.period {
        info!(period_s = period, "Overriding tick period from CLI");
        engine.scheduler.period_s = period;
    }
    if args.max_ticks > 0 {
        engine.scheduler.max_ticks = Some(args.max_ticks);
    }

    validate_engine(engine).map_err(CliError::InvalidOverride)
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &RunBlueprint) {
    let engine = &blueprint.engine;

    println!("\n=== Configuration Summary ===\n");
    println!("Source: {}", blueprint.source.name());
    println!("\nEngine:");
    println!(
        "  Calibration: {} samples, {} ms apart",
        engine.calibration.sample_count, engine.calibration.sample_delay_ms
    );
    println!("  Filter alpha: {}", engine.filter.alpha);
    println!(
        "  Period: {} s (min sleep {} s)",
        engine.scheduler.period_s, engine.scheduler.min_sleep_s
    );
    match engine.scheduler.max_ticks {
        Some(n) => println!("  Max ticks: {}", n),
        None => println!("  Max ticks: unlimited"),
    }
    println!(
        "  Gyro range: {:?} ({} LSB per deg/s)",
        engine.sensor.gyro_range,
        engine.sensor.gyro_range.sensitivity()
    );

    if !blueprint.renderers.is_empty() {
        println!("\nRenderers ({}):", blueprint.renderers.len());
        for renderer in &blueprint.renderers {
            println!("  - {} ({:?})", renderer.name, renderer.renderer_type);
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> RunArgs {
        RunArgs {
            config: PathBuf::from("config.toml"),
            alpha: None,
            period: None,
            max_ticks: 0,
            dry_run: false,
            metrics_port: 0,
        }
    }

    #[test]
    fn test_overrides_applied() {
        let mut engine = EngineConfig::default();
        let args = RunArgs {
            alpha: Some(0.9),
            period: Some(0.01),
            max_ticks: 42,
            ..args()
        };

        apply_overrides(&mut engine, &args).unwrap();
        assert_eq!(engine.filter.alpha, 0.9);
        assert_eq!(engine.scheduler.period_s, 0.01);
        assert_eq!(engine.scheduler.max_ticks, Some(42));
    }

    #[test]
    fn test_zero_max_ticks_keeps_config() {
        let mut engine = EngineConfig::default();
        engine.scheduler.max_ticks = Some(7);
        apply_overrides(&mut engine, &args()).unwrap();
        assert_eq!(engine.scheduler.max_ticks, Some(7));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut engine = EngineConfig::default();
        let args = RunArgs {
            alpha: Some(1.5),
            ..args()
        };
        assert!(matches!(
            apply_overrides(&mut engine, &args),
            Err(CliError::InvalidOverride(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_config_file() {
        let args = RunArgs {
            config: PathBuf::from("/nonexistent/attitude.toml"),
            ..args()
        };
        let err = run_pipeline(&args).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "[source]\nkind = \"synthetic\"\n").unwrap();

        let args = RunArgs {
            config: path,
            dry_run: true,
            ..args()
        };
        run_pipeline(&args).await.unwrap();
    }
}

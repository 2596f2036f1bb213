//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{RunBlueprint, SourceConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    source: String,
    renderer_count: usize,
    vertex_count: usize,
    face_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            let geometry = blueprint.geometry();

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    source: blueprint.source.name().to_string(),
                    renderer_count: blueprint.renderers.len(),
                    vertex_count: geometry.vertices.len(),
                    face_count: geometry.faces.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &RunBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.renderers.is_empty() {
        warnings.push("No renderers configured - transformed geometry will be discarded".to_string());
    }

    let engine = &blueprint.engine;
    if engine.filter.alpha >= 1.0 {
        warnings.push("engine.filter.alpha = 1 disables accelerometer correction".to_string());
    }
    if engine.scheduler.max_ticks.is_none() {
        warnings.push("engine.scheduler.max_ticks not set - run until stopped".to_string());
    }

    match &blueprint.source {
        SourceConfig::Replay(replay) => {
            if !replay.path.exists() {
                warnings.push(format!(
                    "Replay file '{}' does not exist yet",
                    replay.path.display()
                ));
            }
        }
        SourceConfig::Synthetic(synthetic) => {
            if let Some(n) = synthetic.fail_after {
                warnings.push(format!("Synthetic source will fail after {} reads", n));
            }
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Source: {}", summary.source);
            println!("  Renderers: {}", summary.renderer_count);
            println!(
                "  Geometry: {} vertices, {} faces",
                summary.vertex_count, summary.face_count
            );
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn args(path: &Path) -> ValidateArgs {
        ValidateArgs {
            config: path.to_path_buf(),
            json: true,
        }
    }

    #[test]
    fn test_valid_config_with_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.toml");
        std::fs::write(
            &path,
            "[source]\nkind = \"synthetic\"\nfail_after = 100\n",
        )
        .unwrap();

        let result = validate_config(&args(&path));
        assert!(result.valid);
        let summary = result.summary.unwrap();
        assert_eq!(summary.source, "synthetic");
        assert_eq!(summary.vertex_count, 8);

        let warnings = result.warnings.unwrap();
        assert!(warnings.iter().any(|w| w.contains("No renderers")));
        assert!(warnings.iter().any(|w| w.contains("fail after 100")));
        assert!(run_validate(&args(&path)).is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(
            &path,
            "[engine.filter]\nalpha = 2.0\n\n[source]\nkind = \"synthetic\"\n",
        )
        .unwrap();

        let result = validate_config(&args(&path));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("alpha"));
        assert!(run_validate(&args(&path)).is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = validate_config(&args(&PathBuf::from("/nonexistent/x.toml")));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("File not found"));
    }
}

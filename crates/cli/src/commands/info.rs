//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{RunBlueprint, SourceConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    source: SourceInfo,
    engine: EngineInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    renderers: Vec<RendererInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    geometry: Option<GeometryInfo>,
}

#[derive(Serialize)]
struct SourceInfo {
    name: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

#[derive(Serialize)]
struct EngineInfo {
    calibration_samples: u32,
    calibration_delay_ms: u64,
    alpha: f64,
    period_s: f64,
    min_sleep_s: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_ticks: Option<u64>,
    gyro_sensitivity: f64,
    accel_sensitivity: f64,
}

#[derive(Serialize)]
struct RendererInfo {
    name: String,
    renderer_type: String,
    #[serde(skip_serializing_if = "std::collections::HashMap::is_empty")]
    params: std::collections::HashMap<String, String>,
}

#[derive(Serialize)]
struct GeometryInfo {
    vertices: Vec<[f64; 3]>,
    faces: Vec<FaceInfo>,
}

#[derive(Serialize)]
struct FaceInfo {
    name: String,
    color: String,
    vertices: Vec<usize>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &RunBlueprint, args: &InfoArgs) -> ConfigInfo {
    let source = match &blueprint.source {
        SourceConfig::Synthetic(c) => SourceInfo {
            name: c.name.clone(),
            kind: "synthetic",
            path: None,
        },
        SourceConfig::Replay(c) => SourceInfo {
            name: c.name.clone(),
            kind: "replay",
            path: Some(c.path.display().to_string()),
        },
    };

    let engine = &blueprint.engine;
    let engine_info = EngineInfo {
        calibration_samples: engine.calibration.sample_count,
        calibration_delay_ms: engine.calibration.sample_delay_ms,
        alpha: engine.filter.alpha,
        period_s: engine.scheduler.period_s,
        min_sleep_s: engine.scheduler.min_sleep_s,
        max_ticks: engine.scheduler.max_ticks,
        gyro_sensitivity: engine.sensor.gyro_range.sensitivity(),
        accel_sensitivity: engine.sensor.accel_range.sensitivity(),
    };

    let renderers = if args.renderers {
        blueprint
            .renderers
            .iter()
            .map(|r| RendererInfo {
                name: r.name.clone(),
                renderer_type: format!("{:?}", r.renderer_type),
                params: r.params.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    let geometry = args.geometry.then(|| {
        let geometry = blueprint.geometry();
        GeometryInfo {
            vertices: geometry.vertices.iter().map(|v| v.to_array()).collect(),
            faces: geometry
                .faces
                .iter()
                .map(|f| FaceInfo {
                    name: f.name.clone(),
                    color: f.color.clone(),
                    vertices: f.vertices.clone(),
                })
                .collect(),
        }
    });

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        source,
        engine: engine_info,
        renderers,
        geometry,
    }
}

fn print_config_info(blueprint: &RunBlueprint, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Attitude Configuration                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    // Source
    println!("📡 Source");
    println!("   ├─ Version: {:?}", blueprint.version);
    match &blueprint.source {
        SourceConfig::Synthetic(c) => {
            println!("   ├─ Kind: synthetic");
            println!("   ├─ Accel (g): {:?}", c.accel);
            println!("   ├─ Gyro (LSB): {:?}", c.gyro);
            println!("   └─ Noise: {}", c.noise);
        }
        SourceConfig::Replay(c) => {
            println!("   ├─ Kind: replay");
            println!("   ├─ Path: {}", c.path.display());
            println!("   └─ Loop: {}", c.loop_playback);
        }
    }

    // Engine
    let engine = &blueprint.engine;
    println!("\n⚙️  Engine");
    println!(
        "   ├─ Calibration: {} samples, {} ms apart",
        engine.calibration.sample_count, engine.calibration.sample_delay_ms
    );
    println!("   ├─ Alpha: {}", engine.filter.alpha);
    println!(
        "   ├─ Period: {} s (min sleep {} s)",
        engine.scheduler.period_s, engine.scheduler.min_sleep_s
    );
    println!(
        "   ├─ Gyro: {:?} ({} LSB per deg/s)",
        engine.sensor.gyro_range,
        engine.sensor.gyro_range.sensitivity()
    );
    println!(
        "   └─ Accel: {:?} ({} LSB per g)",
        engine.sensor.accel_range,
        engine.sensor.accel_range.sensitivity()
    );

    // Geometry
    let geometry = blueprint.geometry();
    println!(
        "\n🧊 Geometry ({} vertices, {} faces)",
        geometry.vertices.len(),
        geometry.faces.len()
    );
    if args.geometry {
        for (i, face) in geometry.faces.iter().enumerate() {
            let prefix = if i == geometry.faces.len() - 1 { "└─" } else { "├─" };
            println!(
                "   {} {} {:?} ({})",
                prefix, face.name, face.vertices, face.color
            );
        }
    }

    // Renderers
    if !blueprint.renderers.is_empty() {
        println!("\n📤 Renderers ({})", blueprint.renderers.len());
        if args.renderers {
            for (i, renderer) in blueprint.renderers.iter().enumerate() {
                let is_last = i == blueprint.renderers.len() - 1;
                let prefix = if is_last { "└─" } else { "├─" };
                println!(
                    "   {} {} ({:?})",
                    prefix, renderer.name, renderer.renderer_type
                );
            }
        }
    }

    println!();
}

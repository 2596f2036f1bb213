//! 配置校验模块
//!
//! 校验规则：
//! - calibration.sample_count >= 1
//! - filter.alpha 在 [0, 1] 内
//! - scheduler.period_s > 0 且可表示为 Duration, 0 <= min_sleep_s <= period_s, max_ticks >= 1
//! - 采样源参数合法 (回放路径非空、噪声非负)
//! - renderer 名称非空且唯一
//! - 几何体面索引不越界

use std::collections::HashSet;

use contracts::{ContractError, EngineConfig, RunBlueprint, SourceConfig};

/// 校验 RunBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &RunBlueprint) -> Result<(), ContractError> {
    validate_engine(&blueprint.engine)?;
    validate_source(&blueprint.source)?;
    validate_renderers(blueprint)?;
    validate_geometry(blueprint)?;
    Ok(())
}

/// 校验引擎参数
///
/// CLI 覆盖参数后也会单独调用。
pub fn validate_engine(engine: &EngineConfig) -> Result<(), ContractError> {
    if engine.calibration.sample_count == 0 {
        return Err(ContractError::config_validation(
            "engine.calibration.sample_count",
            "sample_count must be >= 1",
        ));
    }

    let alpha = engine.filter.alpha;
    if !(0.0..=1.0).contains(&alpha) {
        return Err(ContractError::config_validation(
            "engine.filter.alpha",
            format!("alpha must be within [0, 1], got {alpha}"),
        ));
    }

    let scheduler = &engine.scheduler;
    if !scheduler.period_s.is_finite() || scheduler.period_s <= 0.0 {
        return Err(ContractError::config_validation(
            "engine.scheduler.period_s",
            format!("period_s must be > 0, got {}", scheduler.period_s),
        ));
    }
    scheduler.period()?;

    if !scheduler.min_sleep_s.is_finite()
        || scheduler.min_sleep_s < 0.0
        || scheduler.min_sleep_s > scheduler.period_s
    {
        return Err(ContractError::config_validation(
            "engine.scheduler.min_sleep_s",
            format!(
                "min_sleep_s ({}) must be within [0, period_s ({})]",
                scheduler.min_sleep_s, scheduler.period_s
            ),
        ));
    }

    if scheduler.max_ticks == Some(0) {
        return Err(ContractError::config_validation(
            "engine.scheduler.max_ticks",
            "max_ticks must be >= 1 when set",
        ));
    }

    Ok(())
}

/// 校验采样源参数
fn validate_source(source: &SourceConfig) -> Result<(), ContractError> {
    if source.name().is_empty() {
        return Err(ContractError::config_validation(
            "source.name",
            "source name cannot be empty",
        ));
    }

    match source {
        SourceConfig::Synthetic(c) => {
            if !c.noise.is_finite() || c.noise < 0.0 {
                return Err(ContractError::config_validation(
                    "source.noise",
                    format!("noise must be >= 0, got {}", c.noise),
                ));
            }
        }
        SourceConfig::Replay(c) => {
            if c.path.as_os_str().is_empty() {
                return Err(ContractError::config_validation(
                    "source.path",
                    "replay path cannot be empty",
                ));
            }
        }
    }

    Ok(())
}

/// 校验 renderer 配置
fn validate_renderers(blueprint: &RunBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, renderer) in blueprint.renderers.iter().enumerate() {
        if renderer.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("renderers[{}].name", idx),
                "renderer name cannot be empty",
            ));
        }
        if !seen.insert(&renderer.name) {
            return Err(ContractError::config_validation(
                format!("renderers[name={}]", renderer.name),
                "duplicate renderer name",
            ));
        }
    }
    Ok(())
}

/// 校验几何体
fn validate_geometry(blueprint: &RunBlueprint) -> Result<(), ContractError> {
    let Some(geometry) = &blueprint.geometry else {
        return Ok(());
    };

    if let Some((face_idx, vertex)) = geometry.find_dangling_index() {
        return Err(ContractError::config_validation(
            format!("geometry.faces[{}]", face_idx),
            format!(
                "vertex index {} out of range ({} vertices)",
                vertex,
                geometry.vertices.len()
            ),
        ));
    }

    Ok(())
}

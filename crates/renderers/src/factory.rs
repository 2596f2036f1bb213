//! 根据配置构建渲染器

use contracts::{ContractError, RendererConfig, RendererType, Renderer};
use tracing::{info, instrument};

use crate::jsonl::JsonlRenderer;
use crate::log::LogRenderer;
use crate::set::RendererSet;

/// 从单个 `RendererConfig` 构建渲染器
#[instrument(
    name = "renderers_create",
    skip(config),
    fields(renderer = %config.name, renderer_type = ?config.renderer_type)
)]
pub fn create_renderer(config: &RendererConfig) -> Result<Box<dyn Renderer>, ContractError> {
    let renderer: Box<dyn Renderer> = match config.renderer_type {
        RendererType::Log => Box::new(LogRenderer::from_params(&config.name, &config.params)?),
        RendererType::Jsonl => Box::new(JsonlRenderer::from_params(&config.name, &config.params)?),
    };
    Ok(renderer)
}

/// 构建全部渲染器并组合为 `RendererSet`
///
/// 未配置任何渲染器时返回空集合，引擎照常运行。
pub fn create_renderers(configs: &[RendererConfig]) -> Result<RendererSet, ContractError> {
    let mut set = RendererSet::new("renderers");
    for config in configs {
        set.push(create_renderer(config)?);
    }

    info!(renderers = ?set.names(), "Renderers ready");
    Ok(set)
}

//! 根据配置构建采样源

use contracts::{ContractError, SampleSource, SourceConfig};
use tracing::info;

use crate::replay::ReplaySource;
use crate::synthetic::SyntheticSource;

/// 从 `SourceConfig` 构建采样源
///
/// MPU-6050 需要具体的总线实现，不能从配置构建，
/// 调用方直接构造 [`Mpu6050Source`](crate::Mpu6050Source)。
pub fn build_source(config: &SourceConfig) -> Result<Box<dyn SampleSource>, ContractError> {
    let source: Box<dyn SampleSource> = match config {
        SourceConfig::Synthetic(c) => Box::new(SyntheticSource::new(c)),
        SourceConfig::Replay(c) => Box::new(ReplaySource::load(c)?),
    };

    info!(source = %source.name(), "Sample source ready");
    Ok(source)
}

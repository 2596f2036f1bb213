//! # Observability
//!
//! 可观测性模块：Tracing + Prometheus 指标。
//!
//! ## 功能
//!
//! - Tracing 初始化 (JSON/Pretty/Compact 格式)
//! - Prometheus 指标导出
//! - Tick 计时与姿态指标收集与统计
//!
//! ## 使用示例
//!
//! ```ignore
//! use observability::{init, metrics};
//!
//! observability::init()?;
//!
//! // 每个 tick 记录一次
//! metrics::record_tick_metrics(&report);
//! ```

pub mod metrics;

use std::str::FromStr;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Re-exports
pub use crate::metrics::{
    record_calibration, record_render_error, record_sensor_error, record_tick_metrics,
    RunningStats, StatsSummary, TickStatsAggregator, TickSummary,
};

/// 初始化可观测性（Tracing + Prometheus）
///
/// 参数取自环境变量，见 [`ObservabilityConfig::from_env`]。
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::from_env()?)
}

/// 可观测性配置
#[derive(Debug, Clone, PartialEq)]
pub struct ObservabilityConfig {
    /// 日志格式
    pub log_format: LogFormat,
    /// Prometheus 端口 (None = 禁用)
    pub metrics_port: Option<u16>,
    /// 默认日志级别 (`RUST_LOG` 优先)
    pub default_log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            metrics_port: None,
            default_log_level: "info".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// 从环境变量读取
    ///
    /// - `ATTITUDE_LOG_FORMAT`: json / pretty / compact
    /// - `ATTITUDE_LOG_LEVEL`: 默认日志级别
    /// - `ATTITUDE_METRICS_PORT`: Prometheus 端口，0 或未设置为禁用
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(format) = lookup("ATTITUDE_LOG_FORMAT") {
            config.log_format = format.parse()?;
        }
        if let Some(level) = lookup("ATTITUDE_LOG_LEVEL") {
            config.default_log_level = level;
        }
        if let Some(port) = lookup("ATTITUDE_METRICS_PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .with_context(|| format!("invalid ATTITUDE_METRICS_PORT '{port}'"))?;
            config.metrics_port = (port != 0).then_some(port);
        }

        Ok(config)
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON 结构化日志
    #[default]
    Json,
    /// 人类可读格式
    Pretty,
    /// 紧凑单行格式
    Compact,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => anyhow::bail!("unknown log format '{other}' (expected json, pretty or compact)"),
        }
    }
}

/// 使用自定义配置初始化
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    init_tracing(config.log_format, &config.default_log_level)?;

    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::info!(
        log_format = ?config.log_format,
        metrics_port = ?config.metrics_port,
        "Observability initialized"
    );

    Ok(())
}

/// 仅初始化 Tracing
///
/// `RUST_LOG` 优先于 `default_level`。
pub fn init_tracing(format: LogFormat, default_level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    init_tracing_with_filter(format, filter)
}

/// 使用给定过滤器初始化 Tracing
pub fn init_tracing_with_filter(format: LogFormat, filter: EnvFilter) -> Result<()> {
    let fmt_layer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")
}

/// 仅初始化 Prometheus 指标（不初始化 Tracing）
///
/// 用于 Tracing 已由其他模块初始化的场景。
pub fn init_metrics_only(port: u16) -> Result<()> {
    let builder = PrometheusBuilder::new();
    builder
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.metrics_port, None);
        assert_eq!(config.default_log_level, "info");
    }

    #[test]
    fn test_config_from_env_vars() {
        let config = ObservabilityConfig::from_lookup(lookup(&[
            ("ATTITUDE_LOG_FORMAT", "Compact"),
            ("ATTITUDE_LOG_LEVEL", "debug"),
            ("ATTITUDE_METRICS_PORT", "9100"),
        ]))
        .unwrap();

        assert_eq!(config.log_format, LogFormat::Compact);
        assert_eq!(config.default_log_level, "debug");
        assert_eq!(config.metrics_port, Some(9100));
    }

    #[test]
    fn test_zero_port_disables_metrics() {
        let config =
            ObservabilityConfig::from_lookup(lookup(&[("ATTITUDE_METRICS_PORT", "0")])).unwrap();
        assert_eq!(config.metrics_port, None);
    }

    #[test]
    fn test_invalid_env_values() {
        assert!(ObservabilityConfig::from_lookup(lookup(&[("ATTITUDE_LOG_FORMAT", "xml")])).is_err());
        assert!(
            ObservabilityConfig::from_lookup(lookup(&[("ATTITUDE_METRICS_PORT", "70000")])).is_err()
        );
    }
}

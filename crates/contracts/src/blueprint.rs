//! RunBlueprint - Config Loader 输出
//!
//! 描述一次运行的完整配置：引擎参数、采样源、渲染输出、参考几何体。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::{EngineConfig, Geometry};

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的运行配置蓝图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 引擎参数
    #[serde(default)]
    pub engine: EngineConfig,

    /// 采样源
    pub source: SourceConfig,

    /// 渲染输出列表
    #[serde(default)]
    pub renderers: Vec<RendererConfig>,

    /// 参考几何体 (缺省为立方体)
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl RunBlueprint {
    /// 运行使用的几何体
    pub fn geometry(&self) -> Geometry {
        self.geometry.clone().unwrap_or_default()
    }
}

/// 采样源配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// 合成数据 (常量 + 可选噪声)
    Synthetic(SyntheticSourceConfig),

    /// 从 JSONL 录制文件回放
    Replay(ReplaySourceConfig),
}

impl SourceConfig {
    /// 采样源名称
    pub fn name(&self) -> &str {
        match self {
            Self::Synthetic(c) => &c.name,
            Self::Replay(c) => &c.name,
        }
    }
}

/// 合成采样源配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSourceConfig {
    #[serde(default = "default_synthetic_name")]
    pub name: String,

    /// 加速度 (g)
    #[serde(default = "default_upright_accel")]
    pub accel: [f64; 3],

    /// 角速度 (原始 LSB)
    #[serde(default)]
    pub gyro: [f64; 3],

    /// 均匀噪声幅值 (同时作用于加速度与角速度)
    #[serde(default)]
    pub noise: f64,

    /// 随机种子 (None = 从熵源取)
    #[serde(default)]
    pub seed: Option<u64>,

    /// 读取 N 次后模拟总线故障 (用于故障演练)
    #[serde(default)]
    pub fail_after: Option<u64>,
}

impl Default for SyntheticSourceConfig {
    fn default() -> Self {
        Self {
            name: default_synthetic_name(),
            accel: default_upright_accel(),
            gyro: [0.0; 3],
            noise: 0.0,
            seed: None,
            fail_after: None,
        }
    }
}

fn default_synthetic_name() -> String {
    "synthetic".to_string()
}

fn default_upright_accel() -> [f64; 3] {
    [0.0, 0.0, 1.0]
}

/// 回放采样源配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaySourceConfig {
    #[serde(default = "default_replay_name")]
    pub name: String,

    /// JSONL 录制文件路径
    pub path: PathBuf,

    /// 文件结束后从头循环
    #[serde(default)]
    pub loop_playback: bool,
}

fn default_replay_name() -> String {
    "replay".to_string()
}

/// 渲染输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// 输出名称
    pub name: String,

    /// 输出类型
    pub renderer_type: RendererType,

    /// 类型特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// 渲染输出类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererType {
    /// tracing 日志
    Log,
    /// JSONL 文件
    Jsonl,
}

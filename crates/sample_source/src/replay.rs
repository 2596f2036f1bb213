//! Replay source - 从录制文件回放 IMU 采样
//!
//! 读取 JSONL 文件，每行一条记录：
//!
//! ```text
//! {"accel": [0.0, 0.0, 1.0], "gyro": [-41.0, 12.0, 3.0]}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use contracts::{ContractError, RawSample, ReplaySourceConfig, SampleSource, Vector3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// JSONL 中的采样记录
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayRecord {
    /// 加速度 (g)
    pub accel: [f64; 3],
    /// 角速度 (原始 LSB)
    pub gyro: [f64; 3],
}

impl From<ReplayRecord> for RawSample {
    fn from(record: ReplayRecord) -> Self {
        RawSample {
            acceleration: record.accel.into(),
            angular_rate: record.gyro.into(),
        }
    }
}

/// Replay source - 按文件顺序回放采样
///
/// 每次读取消耗一条记录：`read_accel` / `read_gyro` 各取一条记录的对应字段，
/// `read_sample` 取一整条记录。文件读完后，若 `loop_playback` 为真则从头
/// 开始，否则返回 `SensorUnavailable`。
pub struct ReplaySource {
    name: String,
    path: PathBuf,
    records: Vec<ReplayRecord>,
    cursor: usize,
    loop_playback: bool,
    loops: u64,
}

impl ReplaySource {
    /// 从配置加载
    pub fn load(config: &ReplaySourceConfig) -> Result<Self, ContractError> {
        let records = read_records(&config.name, &config.path)?;
        Ok(Self::from_records(
            config.name.clone(),
            config.path.clone(),
            records,
            config.loop_playback,
        ))
    }

    /// 从内存中的记录构建
    pub fn from_records(
        name: String,
        path: PathBuf,
        records: Vec<ReplayRecord>,
        loop_playback: bool,
    ) -> Self {
        info!(
            source = %name,
            path = %path.display(),
            records = records.len(),
            loop_playback,
            "Loaded replay source"
        );

        Self {
            name,
            path,
            records,
            cursor: 0,
            loop_playback,
            loops: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 已完成的完整回放次数
    pub fn loops(&self) -> u64 {
        self.loops
    }

    fn next_record(&mut self) -> Result<ReplayRecord, ContractError> {
        if self.cursor >= self.records.len() {
            if !self.loop_playback || self.records.is_empty() {
                return Err(ContractError::sensor_unavailable(
                    &self.name,
                    format!("end of replay file {}", self.path.display()),
                ));
            }
            self.cursor = 0;
            self.loops += 1;
            debug!(source = %self.name, loops = self.loops, "Replay restarted from beginning");
        }

        let record = self.records[self.cursor];
        self.cursor += 1;
        Ok(record)
    }
}

impl SampleSource for ReplaySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_accel(&mut self) -> Result<Vector3, ContractError> {
        Ok(self.next_record()?.accel.into())
    }

    fn read_gyro(&mut self) -> Result<Vector3, ContractError> {
        Ok(self.next_record()?.gyro.into())
    }

    fn read_sample(&mut self) -> Result<RawSample, ContractError> {
        Ok(self.next_record()?.into())
    }
}

/// 读取 JSONL 文件，跳过空行
fn read_records(name: &str, path: &Path) -> Result<Vec<ReplayRecord>, ContractError> {
    let file = File::open(path).map_err(|e| {
        ContractError::sensor_unavailable(name, format!("cannot open {}: {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: ReplayRecord = serde_json::from_str(line).map_err(|e| {
            ContractError::sensor_unavailable(
                name,
                format!("{}:{}: invalid record: {}", path.display(), index + 1, e),
            )
        })?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(ContractError::sensor_unavailable(
            name,
            format!("replay file {} contains no records", path.display()),
        ));
    }

    Ok(records)
}

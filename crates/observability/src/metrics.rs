//! Attitude engine 指标收集模块
//!
//! 基于 TickReport 收集和统计调度循环的运行指标。

use contracts::{AttitudeState, CalibrationOffset, TickReport};
use metrics::{counter, gauge, histogram};

/// 从 TickReport 记录指标
///
/// 每个 tick 结束时调用。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_tick_metrics;
///
/// let report = scheduler_tick(...);
/// record_tick_metrics(&report);
/// ```
pub fn record_tick_metrics(report: &TickReport) {
    counter!("attitude_engine_ticks_total").increment(1);
    gauge!("attitude_engine_last_tick").set(report.tick as f64);

    histogram!("attitude_engine_tick_processing_ms")
        .record(report.processing.as_secs_f64() * 1000.0);
    histogram!("attitude_engine_tick_sleep_ms").record(report.sleep.as_secs_f64() * 1000.0);

    if report.overrun {
        counter!("attitude_engine_tick_overruns_total").increment(1);
    }

    // 姿态角 (度)
    let [roll, pitch, yaw] = report.attitude.to_degrees();
    gauge!("attitude_engine_roll_deg").set(roll);
    gauge!("attitude_engine_pitch_deg").set(pitch);
    gauge!("attitude_engine_yaw_deg").set(yaw);
}

/// 记录陀螺仪零偏标定结果
pub fn record_calibration(offset: &CalibrationOffset, sample_count: u32) {
    counter!("attitude_engine_calibrations_total").increment(1);
    gauge!("attitude_engine_calibration_samples").set(sample_count as f64);

    let bias = offset.vector();
    gauge!("attitude_engine_gyro_bias_lsb", "axis" => "x").set(bias.x);
    gauge!("attitude_engine_gyro_bias_lsb", "axis" => "y").set(bias.y);
    gauge!("attitude_engine_gyro_bias_lsb", "axis" => "z").set(bias.z);
}

/// 记录采样源故障
pub fn record_sensor_error(source_name: &str) {
    counter!(
        "attitude_engine_sensor_errors_total",
        "source" => source_name.to_string()
    )
    .increment(1);
}

/// 记录渲染输出故障
pub fn record_render_error(renderer: &str) {
    counter!(
        "attitude_engine_render_errors_total",
        "renderer" => renderer.to_string()
    )
    .increment(1);
}

/// Tick 指标聚合器
///
/// 在内存中聚合指标，便于运行结束时输出摘要。
#[derive(Debug, Clone, Default)]
pub struct TickStatsAggregator {
    /// 总 tick 数
    pub total_ticks: u64,

    /// 超出目标周期的 tick 数
    pub overruns: u64,

    /// 处理耗时统计 (毫秒)
    pub processing_stats: RunningStats,

    /// 休眠时长统计 (毫秒)
    pub sleep_stats: RunningStats,

    /// 最近一次姿态
    pub last_attitude: Option<AttitudeState>,
}

impl TickStatsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, report: &TickReport) {
        self.total_ticks += 1;
        if report.overrun {
            self.overruns += 1;
        }

        self.processing_stats
            .push(report.processing.as_secs_f64() * 1000.0);
        self.sleep_stats.push(report.sleep.as_secs_f64() * 1000.0);
        self.last_attitude = Some(report.attitude);
    }

    /// 生成摘要报告
    pub fn summary(&self) -> TickSummary {
        TickSummary {
            total_ticks: self.total_ticks,
            overruns: self.overruns,
            overrun_rate: if self.total_ticks > 0 {
                self.overruns as f64 / self.total_ticks as f64 * 100.0
            } else {
                0.0
            },
            processing_ms: StatsSummary::from(&self.processing_stats),
            sleep_ms: StatsSummary::from(&self.sleep_stats),
            last_attitude: self.last_attitude,
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct TickSummary {
    pub total_ticks: u64,
    pub overruns: u64,
    pub overrun_rate: f64,
    pub processing_ms: StatsSummary,
    pub sleep_ms: StatsSummary,
    pub last_attitude: Option<AttitudeState>,
}

impl std::fmt::Display for TickSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Tick Metrics Summary ===")?;
        writeln!(f, "Total ticks: {}", self.total_ticks)?;
        writeln!(
            f,
            "Overruns: {} ({:.2}%)",
            self.overruns, self.overrun_rate
        )?;
        writeln!(f, "Processing (ms): {}", self.processing_ms)?;
        writeln!(f, "Sleep (ms): {}", self.sleep_ms)?;

        if let Some(attitude) = self.last_attitude {
            let [roll, pitch, yaw] = attitude.to_degrees();
            writeln!(
                f,
                "Last attitude (deg): roll={:.3}, pitch={:.3}, yaw={:.3}",
                roll, pitch, yaw
            )?;
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn report(tick: u64, processing_ms: u64, overrun: bool) -> TickReport {
        TickReport {
            tick,
            attitude: AttitudeState::new(0.1, -0.2, 0.3),
            processing: Duration::from_millis(processing_ms),
            sleep: Duration::from_millis(20u64.saturating_sub(processing_ms).max(1)),
            overrun,
        }
    }

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_update() {
        let mut aggregator = TickStatsAggregator::new();

        aggregator.update(&report(0, 4, false));
        aggregator.update(&report(1, 25, true));

        assert_eq!(aggregator.total_ticks, 2);
        assert_eq!(aggregator.overruns, 1);
        assert_eq!(aggregator.processing_stats.count(), 2);
        assert!((aggregator.processing_stats.max() - 25.0).abs() < 1e-9);
        assert!((aggregator.sleep_stats.min() - 1.0).abs() < 1e-9);
        assert_eq!(
            aggregator.last_attitude,
            Some(AttitudeState::new(0.1, -0.2, 0.3))
        );

        let summary = aggregator.summary();
        assert!((summary.overrun_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = TickStatsAggregator::new();
        for tick in 0..4 {
            aggregator.update(&report(tick, 2, tick == 3));
        }

        let output = format!("{}", aggregator.summary());
        assert!(output.contains("Total ticks: 4"));
        assert!(output.contains("25.00%"));
        assert!(output.contains("Last attitude"));
    }

    #[test]
    fn test_empty_summary() {
        let output = format!("{}", TickStatsAggregator::new().summary());
        assert!(output.contains("Processing (ms): N/A"));
    }

    #[test]
    fn test_record_functions_without_recorder() {
        // No recorder installed: macros fall back to the no-op recorder.
        record_tick_metrics(&report(0, 3, false));
        record_calibration(&CalibrationOffset::default(), 50);
        record_sensor_error("synthetic");
        record_render_error("log");
    }
}

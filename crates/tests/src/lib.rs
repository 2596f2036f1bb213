//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 → 采样源 → 调度器 → 渲染器 e2e 测试（无需硬件）
//! - 故障传播与停止语义

#[cfg(test)]
mod contract_tests {
    use contracts::{ConfigVersion, EngineConfig, Geometry, GyroRange};

    #[test]
    fn test_contract_defaults() {
        let _ = ConfigVersion::V1;

        let engine = EngineConfig::default();
        assert_eq!(engine.calibration.sample_count, 50);
        assert_eq!(engine.filter.alpha, 0.98);
        assert_eq!(engine.scheduler.period_s, 0.02);
        assert_eq!(engine.scheduler.min_sleep_s, 0.001);
        assert_eq!(engine.sensor.gyro_range, GyroRange::Dps250);

        let cube = Geometry::cube();
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.faces.len(), 6);
        assert!(cube.find_dangling_index().is_none());
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use attitude_engine::{ManualClock, RotationMatrix, Scheduler, StopReason};
    use config_loader::{ConfigFormat, ConfigLoader};
    use observability::TickSummary;
    use contracts::{
        AttitudeState, ContractError, Geometry, RenderFrame, Renderer, SyntheticSourceConfig,
        Vector3,
    };
    use renderers::{create_renderers, RendererSet};
    use sample_source::{build_source, SyntheticSource};
    use serde_json::Value;

    /// Frames captured by the test renderer
    #[derive(Default)]
    struct Captured {
        attitudes: Vec<AttitudeState>,
        vertices: Vec<Vec<Vector3>>,
        closed: u32,
    }

    #[derive(Clone, Default)]
    struct CaptureRenderer(Arc<Mutex<Captured>>);

    impl Renderer for CaptureRenderer {
        fn name(&self) -> &str {
            "capture"
        }

        fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), ContractError> {
            let mut captured = self.0.lock().unwrap();
            captured.attitudes.push(frame.attitude);
            captured.vertices.push(frame.vertices.to_vec());
            Ok(())
        }

        fn close(&mut self) -> Result<(), ContractError> {
            self.0.lock().unwrap().closed += 1;
            Ok(())
        }
    }

    /// End-to-end: stationary synthetic source with bias, 50 ticks at 20 ms.
    ///
    /// 验证：
    /// 1. 标定偏移等于常值陀螺读数
    /// 2. 姿态始终为 (0, 0, 0)
    /// 3. 旋转矩阵为单位阵，顶点不变
    #[test]
    fn test_e2e_stationary_identity() {
        let toml = r#"
            [engine.scheduler]
            max_ticks = 50

            [source]
            kind = "synthetic"
            gyro = [-41.0, 12.0, 3.0]
        "#;
        let blueprint = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap();
        let source = build_source(&blueprint.source).unwrap();
        let capture = CaptureRenderer::default();
        let clock = ManualClock::new();

        let summary = Scheduler::with_clock(blueprint.engine.clone(), source, capture.clone(), clock.clone())
            .with_geometry(blueprint.geometry())
            .start()
            .unwrap();

        assert_eq!(summary.ticks, 50);
        assert_eq!(summary.stop_reason, StopReason::MaxTicks);
        assert_eq!(summary.calibration.vector(), Vector3::new(-41.0, 12.0, 3.0));
        assert_eq!(summary.stats.total_ticks, 50);

        let captured = capture.0.lock().unwrap();
        let cube = Geometry::cube();
        assert_eq!(captured.closed, 1);
        for (attitude, vertices) in captured.attitudes.iter().zip(&captured.vertices) {
            assert_eq!(*attitude, AttitudeState::default());
            assert_eq!(RotationMatrix::compose(attitude), RotationMatrix::identity());
            assert_eq!(vertices, &cube.vertices);
        }

        let tick_sleeps: Vec<Duration> = clock.sleeps().into_iter().skip(49).collect();
        assert_eq!(tick_sleeps, vec![Duration::from_millis(20); 50]);
    }

    /// Replay file → scheduler → jsonl renderer; the file runs out and the
    /// run fails with `SensorUnavailable` after the jsonl output is flushed.
    #[test]
    fn test_e2e_replay_to_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let replay_path = dir.path().join("imu.jsonl");
        let out_path = dir.path().join("out.jsonl");

        let mut file = std::fs::File::create(&replay_path).unwrap();
        for _ in 0..12 {
            writeln!(file, r#"{{"accel":[0.0,0.0,1.0],"gyro":[2.0,-1.0,131.0]}}"#).unwrap();
        }
        drop(file);

        let json = serde_json::json!({
            "engine": {
                "calibration": { "sample_count": 2, "sample_delay_ms": 0 }
            },
            "source": {
                "kind": "replay",
                "path": replay_path,
            },
            "renderers": [
                { "name": "file", "renderer_type": "jsonl", "params": { "path": out_path } },
                { "name": "console", "renderer_type": "log", "params": { "every_n": "5" } }
            ]
        });
        let blueprint =
            ConfigLoader::load_from_str(&json.to_string(), ConfigFormat::Json).unwrap();

        let source = build_source(&blueprint.source).unwrap();
        let renderers: RendererSet = create_renderers(&blueprint.renderers).unwrap();

        let err = Scheduler::with_clock(blueprint.engine.clone(), source, renderers, ManualClock::new())
            .start()
            .unwrap_err();
        assert!(matches!(err, ContractError::SensorUnavailable { .. }));

        // 2 records for calibration, 10 ticks
        let contents = std::fs::read_to_string(&out_path).unwrap();
        let lines: Vec<Value> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0]["type"], "header");
        assert_eq!(lines[10]["tick"], 9);

        // Bias fully removed, so roll/pitch stay level and yaw has not moved
        assert_eq!(lines[10]["roll"], 0.0);
        assert_eq!(lines[10]["yaw"], 0.0);
    }

    /// Residual z bias drifts yaw linearly; roll/pitch stay level.
    #[test]
    fn test_e2e_yaw_drift_after_bias_change() {
        let mut engine = contracts::EngineConfig::default();
        engine.calibration.sample_count = 1;
        engine.scheduler.max_ticks = Some(100);

        // Calibrated at 0 LSB, then 1 °/s about z
        struct StepSource {
            reads: u64,
        }
        impl contracts::SampleSource for StepSource {
            fn name(&self) -> &str {
                "step"
            }
            fn read_accel(&mut self) -> Result<Vector3, ContractError> {
                Ok(Vector3::new(0.0, 0.0, 1.0))
            }
            fn read_gyro(&mut self) -> Result<Vector3, ContractError> {
                self.reads += 1;
                Ok(if self.reads == 1 {
                    Vector3::ZERO
                } else {
                    Vector3::new(0.0, 0.0, 131.0)
                })
            }
        }

        let summary = Scheduler::with_clock(
            engine,
            StepSource { reads: 0 },
            CaptureRenderer::default(),
            ManualClock::new(),
        )
        .start()
        .unwrap();

        let expected = 1f64.to_radians() * 0.02 * 100.0;
        assert!((summary.final_attitude.yaw - expected).abs() < 1e-9);
        assert_eq!(summary.final_attitude.roll, 0.0);
        assert_eq!(summary.final_attitude.pitch, 0.0);
    }

    /// Every tick costs longer than the period: all ticks are counted as
    /// overruns, sleeps collapse to the minimum, and the run summary says so.
    #[test]
    fn test_e2e_overrun_statistics() {
        let mut engine = contracts::EngineConfig::default();
        engine.calibration.sample_count = 2;
        engine.scheduler.max_ticks = Some(10);

        struct SlowSource {
            clock: ManualClock,
        }
        impl contracts::SampleSource for SlowSource {
            fn name(&self) -> &str {
                "slow"
            }
            fn read_accel(&mut self) -> Result<Vector3, ContractError> {
                self.clock.advance(Duration::from_millis(30));
                Ok(Vector3::new(0.0, 0.0, 1.0))
            }
            fn read_gyro(&mut self) -> Result<Vector3, ContractError> {
                Ok(Vector3::ZERO)
            }
        }

        let clock = ManualClock::new();
        let summary = Scheduler::with_clock(
            engine,
            SlowSource { clock: clock.clone() },
            CaptureRenderer::default(),
            clock,
        )
        .start()
        .unwrap();

        assert_eq!(summary.overruns(), 10);

        let report: TickSummary = summary.stats.summary();
        assert_eq!(report.total_ticks, 10);
        assert_eq!(report.overrun_rate, 100.0);
        assert_eq!(report.sleep_ms.count, 10);
        assert!((report.sleep_ms.min - 1.0).abs() < 1e-9);
        assert!((report.sleep_ms.max - 1.0).abs() < 1e-9);
        assert!((report.processing_ms.mean - 30.0).abs() < 1e-9);
        assert_eq!(report.last_attitude, Some(summary.final_attitude));
        assert!(report.to_string().contains("Overruns: 10 (100.00%)"));
    }

    /// Injected sensor failure mid-run propagates; renderer closed once.
    #[test]
    fn test_e2e_sensor_failure() {
        let source = SyntheticSource::new(&SyntheticSourceConfig {
            name: "flaky".to_string(),
            fail_after: Some(10 + 2 * 5),
            seed: Some(1),
            ..Default::default()
        });
        let mut engine = contracts::EngineConfig::default();
        engine.calibration.sample_count = 10;
        let capture = CaptureRenderer::default();

        let err = Scheduler::with_clock(engine, source, capture.clone(), ManualClock::new())
            .start()
            .unwrap_err();

        match err {
            ContractError::SensorUnavailable { source_name, .. } => assert_eq!(source_name, "flaky"),
            other => panic!("unexpected error: {other}"),
        }
        let captured = capture.0.lock().unwrap();
        assert_eq!(captured.attitudes.len(), 5);
        assert_eq!(captured.closed, 1);
    }

    /// Blocking loop on a worker thread, stopped from the async side.
    #[tokio::test]
    async fn test_e2e_stop_from_async_side() {
        let mut engine = contracts::EngineConfig::default();
        engine.calibration.sample_count = 5;
        engine.calibration.sample_delay_ms = 1;
        engine.scheduler.period_s = 0.005;

        let source = SyntheticSource::constant(Vector3::new(0.0, 0.0, 1.0), Vector3::ZERO);
        let capture = CaptureRenderer::default();
        let scheduler = Scheduler::new(engine, source, capture.clone());
        let stop = scheduler.stop_handle();

        let worker = tokio::task::spawn_blocking(move || scheduler.start());

        tokio::time::sleep(Duration::from_millis(60)).await;
        stop.stop();

        let summary = worker.await.unwrap().unwrap();
        assert_eq!(summary.stop_reason, StopReason::Stopped);
        assert!(summary.ticks > 0);
        assert_eq!(capture.0.lock().unwrap().closed, 1);
    }
}

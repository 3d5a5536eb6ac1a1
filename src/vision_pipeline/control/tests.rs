#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use crate::vision_pipeline::binarize::ThresholdSearch;
    use crate::vision_pipeline::capture::{FrameSource, Illumination};
    use crate::vision_pipeline::common::error::{Result, VisionError};
    use crate::vision_pipeline::control::{
        Actuator, Clock, ControllerConfig, ControllerState, Cycle, CycleReport,
        LineFollowController,
    };
    use crate::vision_pipeline::decision::SteeringCommand;
    use crate::vision_pipeline::locate::LocatorParams;
    use crate::vision_pipeline::raster::Raster;

    const WIDTH: usize = 160;
    const HEIGHT: usize = 120;

    #[derive(Default)]
    struct SourceLog {
        acquired: usize,
        released: usize,
        outstanding: bool,
    }

    struct MockSource {
        frames: VecDeque<Option<Raster>>,
        fallback: Option<Raster>,
        log: Arc<Mutex<SourceLog>>,
    }

    impl MockSource {
        fn new(
            frames: Vec<Option<Raster>>,
            fallback: Option<Raster>,
        ) -> (Self, Arc<Mutex<SourceLog>>) {
            let log = Arc::new(Mutex::new(SourceLog::default()));
            let source = Self {
                frames: frames.into(),
                fallback,
                log: log.clone(),
            };
            (source, log)
        }
    }

    impl FrameSource for MockSource {
        fn acquire(&mut self) -> Result<Raster> {
            let mut log = self.log.lock().unwrap();
            assert!(!log.outstanding, "frame acquired before the previous one was released");
            let next = self.frames.pop_front().unwrap_or_else(|| self.fallback.clone());
            match next {
                Some(frame) => {
                    log.acquired += 1;
                    log.outstanding = true;
                    Ok(frame)
                }
                None => Err(VisionError::CaptureFailed("Mock capture error".to_string())),
            }
        }

        fn release(&mut self, _frame: Raster) {
            let mut log = self.log.lock().unwrap();
            log.released += 1;
            log.outstanding = false;
        }
    }

    struct MockIllumination {
        should_fail: bool,
        levels: Arc<Mutex<Vec<u8>>>,
    }

    impl Illumination for MockIllumination {
        fn set_brightness(&mut self, level: u8) -> Result<()> {
            self.levels.lock().unwrap().push(level);
            if self.should_fail {
                return Err(VisionError::SensorReadFailed("Mock LED error".to_string()));
            }
            Ok(())
        }
    }

    struct RecordingActuator {
        commands: Arc<Mutex<Vec<SteeringCommand>>>,
    }

    impl Actuator for RecordingActuator {
        fn apply(&mut self, command: SteeringCommand) {
            self.commands.lock().unwrap().push(command);
        }
    }

    struct ManualClock {
        now: Cell<u64>,
        idle_step: u64,
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u64 {
            self.now.get()
        }

        fn idle(&self) {
            self.now.set(self.now.get() + self.idle_step);
        }
    }

    #[derive(Clone)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct Harness {
        controller: LineFollowController<MockSource, MockIllumination, RecordingActuator>,
        source_log: Arc<Mutex<SourceLog>>,
        levels: Arc<Mutex<Vec<u8>>>,
        commands: Arc<Mutex<Vec<SteeringCommand>>>,
    }

    fn harness(
        frames: Vec<Option<Raster>>,
        fallback: Option<Raster>,
        config: ControllerConfig,
        illumination_fails: bool,
    ) -> Harness {
        let (source, source_log) = MockSource::new(frames, fallback);
        let levels = Arc::new(Mutex::new(Vec::new()));
        let commands = Arc::new(Mutex::new(Vec::new()));
        let controller = LineFollowController::with_custom(
            source,
            MockIllumination {
                should_fail: illumination_fails,
                levels: levels.clone(),
            },
            RecordingActuator {
                commands: commands.clone(),
            },
            config,
        )
        .unwrap();
        Harness {
            controller,
            source_log,
            levels,
            commands,
        }
    }

    fn stripe_frame(columns: std::ops::Range<usize>) -> Raster {
        Raster::from_fn(WIDTH, HEIGHT, |x, _| if columns.contains(&x) { 200 } else { 20 }).unwrap()
    }

    fn finish_frame() -> Raster {
        Raster::from_fn(WIDTH, HEIGHT, |x, y| {
            if (95..100).contains(&y) || (70..90).contains(&x) { 200 } else { 20 }
        })
        .unwrap()
    }

    fn processed(cycle: Option<Cycle>) -> CycleReport {
        match cycle {
            Some(Cycle::Processed(report)) => report,
            other => panic!("expected a processed cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_config_builder() {
        let config = ControllerConfig::builder()
            .frame_size(320, 240)
            .threshold(90)
            .white_band(100, 200)
            .poll_interval_ms(10000)
            .detect_finish_line(true)
            .build();

        assert_eq!((config.frame_width, config.frame_height), (320, 240));
        assert_eq!(config.threshold, 90);
        assert_eq!((config.white_band.min, config.white_band.max), (100, 200));
        assert_eq!(config.poll_interval_ms, 10000);
        assert!(config.detect_finish_line);
        assert_eq!(config.locator, LocatorParams::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ControllerConfig::builder().poll_interval_ms(0).build();
        assert!(matches!(
            config.validate().unwrap_err(),
            VisionError::InvalidConfig(_)
        ));

        let config = ControllerConfig::builder().frame_size(0, 120).build();
        assert!(matches!(
            LineFollowController::simulated(config).err(),
            Some(VisionError::InvalidDimensions(0, 120))
        ));

        let config = ControllerConfig::builder().white_band(500, 100).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stripe_frame_turns_left() {
        let mut h = harness(
            vec![Some(stripe_frame(10..30))],
            None,
            ControllerConfig::default(),
            false,
        );

        let report = processed(h.controller.poll(0));
        assert_eq!(report.cycle, 1);
        assert_eq!(report.command, Some(SteeringCommand::TurnLeft));
        assert!(report.line_x.is_some_and(|x| (18..=21).contains(&x)));
        assert_eq!(*h.commands.lock().unwrap(), vec![SteeringCommand::TurnLeft]);

        let names: Vec<_> = report.timings.stages().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["acquire", "binarize", "locate", "decide", "release"]);

        let log = h.source_log.lock().unwrap();
        assert_eq!((log.acquired, log.released), (1, 1));
    }

    #[test]
    fn test_bright_floor_goes_forward_and_dark_floor_finds_nothing() {
        let bright = Raster::new(WIDTH, HEIGHT, vec![250; WIDTH * HEIGHT]).unwrap();
        let dark = Raster::new(WIDTH, HEIGHT, vec![5; WIDTH * HEIGHT]).unwrap();
        let mut h = harness(
            vec![Some(bright), Some(dark)],
            None,
            ControllerConfig::default(),
            false,
        );

        assert_eq!(processed(h.controller.poll(0)).command, Some(SteeringCommand::GoForward));
        let report = processed(h.controller.poll(1000));
        assert_eq!(report.line_x, None);
        assert_eq!(report.command, Some(SteeringCommand::NoLineFound));
    }

    #[test]
    fn test_poll_respects_interval() {
        let mut h = harness(
            Vec::new(),
            Some(stripe_frame(70..90)),
            ControllerConfig::default(),
            false,
        );

        assert!(h.controller.poll(0).is_some());
        assert!(h.controller.poll(999).is_none());
        assert!(h.controller.poll(1000).is_some());
        assert_eq!(h.controller.cycles(), 2);
        assert_eq!(h.source_log.lock().unwrap().acquired, 2);
    }

    #[test]
    fn test_capture_failure_skips_cycle() {
        let mut h = harness(
            vec![None, Some(stripe_frame(70..90))],
            None,
            ControllerConfig::default(),
            false,
        );

        assert!(matches!(
            h.controller.poll(0),
            Some(Cycle::Skipped(VisionError::CaptureFailed(_)))
        ));
        assert!(h.commands.lock().unwrap().is_empty());
        assert!(h.controller.poll(10).is_none());

        let report = processed(h.controller.poll(1000));
        assert_eq!(report.command, Some(SteeringCommand::GoForward));
    }

    #[test]
    fn test_wrong_size_frame_is_still_released() {
        let small = Raster::new(80, 60, vec![0; 80 * 60]).unwrap();
        let mut h = harness(
            vec![Some(small)],
            Some(stripe_frame(130..150)),
            ControllerConfig::default(),
            false,
        );

        assert!(matches!(
            h.controller.poll(0),
            Some(Cycle::Skipped(VisionError::InvalidDimensions(80, 60)))
        ));
        {
            let log = h.source_log.lock().unwrap();
            assert_eq!((log.acquired, log.released), (1, 1));
        }

        let report = processed(h.controller.poll(1000));
        assert_eq!(report.command, Some(SteeringCommand::TurnRight));
    }

    #[test]
    fn test_calibration_runs_on_start_and_on_request() {
        let config = ControllerConfig::builder()
            .calibrate_on_start(true)
            .threshold(250)
            .white_band(2000, 3000)
            .build();
        let mut h = harness(Vec::new(), Some(stripe_frame(70..90)), config, false);

        let report = processed(h.controller.poll(0));
        assert_eq!(report.calibration, Some(ThresholdSearch::Converged));
        assert_eq!(report.threshold, 20);
        assert_eq!(h.controller.threshold(), 20);

        let report = processed(h.controller.poll(1000));
        assert_eq!(report.calibration, None);
        assert_eq!(report.threshold, 20);

        h.controller.request_calibration();
        let report = processed(h.controller.poll(2000));
        assert_eq!(report.calibration, Some(ThresholdSearch::Converged));
    }

    #[test]
    fn test_illumination_failure_is_not_fatal() {
        let mut h = harness(
            Vec::new(),
            Some(stripe_frame(70..90)),
            ControllerConfig::default(),
            true,
        );
        assert_eq!(*h.levels.lock().unwrap(), vec![ControllerConfig::default().brightness]);
        assert!(matches!(h.controller.poll(0), Some(Cycle::Processed(_))));
    }

    #[test]
    fn test_obstacle_suspends_capture() {
        let mut h = harness(
            Vec::new(),
            Some(stripe_frame(70..90)),
            ControllerConfig::default(),
            false,
        );

        h.controller.report_obstacle(true);
        assert_eq!(h.controller.state(), ControllerState::AvoidObstacle);
        assert!(matches!(
            h.controller.poll(0),
            Some(Cycle::Suspended(ControllerState::AvoidObstacle))
        ));
        assert_eq!(h.source_log.lock().unwrap().acquired, 0);

        h.controller.report_obstacle(false);
        assert_eq!(h.controller.state(), ControllerState::FollowLine);
        assert!(matches!(h.controller.poll(1000), Some(Cycle::Processed(_))));
    }

    #[test]
    fn test_finish_line_sequence_stops_run() {
        let config = ControllerConfig::builder()
            .detect_finish_line(true)
            .locator(LocatorParams {
                min_line_length: 60,
                ..LocatorParams::default()
            })
            .build();
        let frames = vec![
            Some(stripe_frame(70..90)),
            Some(finish_frame()),
            Some(finish_frame()),
            Some(stripe_frame(70..90)),
            Some(finish_frame()),
        ];
        let mut h = harness(frames, Some(stripe_frame(70..90)), config, false);
        let clock = ManualClock {
            now: Cell::new(0),
            idle_step: 250,
        };

        let cycles = h.controller.run(&clock, Some(20));

        assert_eq!(cycles, 5);
        assert_eq!(h.controller.state(), ControllerState::Finish);
        assert_eq!(h.commands.lock().unwrap().len(), 4);
        let log = h.source_log.lock().unwrap();
        assert_eq!((log.acquired, log.released), (5, 5));
    }

    #[test]
    fn test_pixel_dump_written_per_frame() {
        let config = ControllerConfig::builder().frame_size(16, 8).build();
        let frame = Raster::from_fn(16, 8, |x, _| x as u8).unwrap();
        let buffer = SharedBuffer(Arc::new(Mutex::new(Vec::new())));
        let h = harness(vec![Some(frame)], None, config, false);
        let mut controller = h.controller.with_pixel_dump(Box::new(buffer.clone()));

        assert!(matches!(controller.poll(0), Some(Cycle::Processed(_))));

        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0].split(' ').count(), 16);
        assert!(lines[0].starts_with("0 1 2"));
    }

    #[test]
    fn test_simulated_controller_runs_requested_cycles() {
        let config = ControllerConfig::builder().poll_interval_ms(10).build();
        let mut controller = LineFollowController::simulated(config).unwrap();
        let clock = ManualClock {
            now: Cell::new(0),
            idle_step: 5,
        };

        assert_eq!(controller.run(&clock, Some(6)), 6);
        assert_eq!(controller.cycles(), 6);
        assert_eq!(controller.state(), ControllerState::FollowLine);
    }
}

use std::io::Write;

use tracing::{debug, info, info_span, instrument, warn};

use crate::vision_pipeline::{
    binarize::{ThresholdSearch, auto_threshold, binarize},
    capture::{FrameSource, Illumination, SimulatedIllumination, SyntheticFrameSource},
    common::error::{Result, VisionError},
    control::{
        Actuator, Clock, ControlEvent, ControllerConfig, ControllerState, FrameTimer,
        LoggingActuator, PipelineTimings, StageTimer,
    },
    decision::SteeringCommand,
    locate::LineLocator,
    raster::{Raster, write_pixel_dump},
};

/// What one processed frame produced.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle: u64,
    pub state: ControllerState,
    pub threshold: u8,
    /// Present when this cycle recalibrated the threshold
    pub calibration: Option<ThresholdSearch>,
    pub line_x: Option<usize>,
    pub horizontal_line: bool,
    /// `None` when the state machine left line following during this cycle
    pub command: Option<SteeringCommand>,
    pub timings: PipelineTimings,
}

/// Result of a poll that was due.
#[derive(Debug)]
pub enum Cycle {
    Processed(CycleReport),
    /// No usable frame this interval; the next attempt happens one interval later.
    Skipped(VisionError),
    /// The current state does not follow the line, so nothing was captured.
    Suspended(ControllerState),
}

/// State carried from one cycle to the next.
#[derive(Debug, Clone, Default)]
struct LoopState {
    timer: FrameTimer,
    threshold: u8,
    calibration_pending: bool,
    state: ControllerState,
    cycles: u64,
}

pub struct LineFollowController<S: FrameSource, I: Illumination, A: Actuator> {
    source: S,
    illumination: I,
    actuator: A,
    config: ControllerConfig,
    locator: LineLocator,
    loop_state: LoopState,
    pixel_dump: Option<Box<dyn Write>>,
}

impl LineFollowController<SyntheticFrameSource, SimulatedIllumination, LoggingActuator> {
    /// Controller fed by a sweeping synthetic stripe, for running without a camera.
    pub fn simulated(config: ControllerConfig) -> Result<Self> {
        config.validate()?;
        let stripe_width = (config.frame_width / 8)
            .max(config.locator.min_run_length)
            .min(config.frame_width);
        let source =
            SyntheticFrameSource::new(config.frame_width, config.frame_height, stripe_width)?;
        Self::with_custom(source, SimulatedIllumination::new(), LoggingActuator, config)
    }
}

impl<S: FrameSource, I: Illumination, A: Actuator> LineFollowController<S, I, A> {
    pub fn with_custom(
        source: S,
        illumination: I,
        actuator: A,
        config: ControllerConfig,
    ) -> Result<Self> {
        config.validate()?;

        let loop_state = LoopState {
            threshold: config.threshold,
            calibration_pending: config.calibrate_on_start,
            ..LoopState::default()
        };
        let mut controller = Self {
            source,
            illumination,
            actuator,
            locator: LineLocator::new(config.locator),
            config,
            loop_state,
            pixel_dump: None,
        };
        controller.apply_illumination();
        Ok(controller)
    }

    /// Writes every captured frame as a text pixel dump to `writer`.
    pub fn with_pixel_dump(mut self, writer: Box<dyn Write>) -> Self {
        self.pixel_dump = Some(writer);
        self
    }

    fn apply_illumination(&mut self) {
        match self.illumination.set_brightness(self.config.brightness) {
            Ok(()) => info!(level = self.config.brightness, "Illumination set"),
            Err(e) => warn!(error = %e, "Illumination unavailable, continuing without it"),
        }
    }

    /// The next captured frame recalibrates the threshold.
    pub fn request_calibration(&mut self) {
        self.loop_state.calibration_pending = true;
    }

    /// Feeds the external obstacle sensor's reading into the state machine.
    pub fn report_obstacle(&mut self, detected: bool) {
        let event = if detected {
            ControlEvent::ObstacleDetected
        } else {
            ControlEvent::ObstacleCleared
        };
        self.apply_event(event);
    }

    fn apply_event(&mut self, event: ControlEvent) {
        let previous = self.loop_state.state;
        let next = previous.transition(event);
        if next != previous {
            info!(from = %previous, to = %next, ?event, "State changed");
        }
        self.loop_state.state = next;
    }

    pub fn state(&self) -> ControllerState {
        self.loop_state.state
    }

    pub fn threshold(&self) -> u8 {
        self.loop_state.threshold
    }

    pub fn cycles(&self) -> u64 {
        self.loop_state.cycles
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Runs one cycle if the poll interval has elapsed since the last attempt.
    pub fn poll(&mut self, now_ms: u64) -> Option<Cycle> {
        if !self
            .loop_state
            .timer
            .is_due(now_ms, self.config.poll_interval_ms)
        {
            return None;
        }
        self.loop_state.timer.mark(now_ms);
        self.loop_state.cycles += 1;

        let state = self.loop_state.state;
        if !state.follows_line() {
            debug!(%state, "Line following suspended");
            return Some(Cycle::Suspended(state));
        }
        Some(self.run_cycle(self.loop_state.cycles))
    }

    /// Polls until the state machine finishes or `max_cycles` due polls have happened.
    pub fn run<C: Clock>(&mut self, clock: &C, max_cycles: Option<u64>) -> u64 {
        info!(
            interval_ms = self.config.poll_interval_ms,
            "Control loop started"
        );
        let mut attempted = 0u64;
        while !self.loop_state.state.is_terminal() && max_cycles.is_none_or(|max| attempted < max)
        {
            match self.poll(clock.now_ms()) {
                Some(_) => attempted += 1,
                None => clock.idle(),
            }
        }
        info!(cycles = attempted, state = %self.loop_state.state, "Control loop stopped");
        attempted
    }

    #[instrument(skip(self))]
    fn run_cycle(&mut self, cycle: u64) -> Cycle {
        let mut timings = PipelineTimings::new();

        let timer = StageTimer::start("acquire");
        let frame = match self.source.acquire() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Capture failed, skipping cycle");
                return Cycle::Skipped(e);
            }
        };
        timings.record(timer.stop());
        debug!(width = frame.width(), height = frame.height(), "Frame captured");

        let result = self.process(&frame, &mut timings);

        let timer = StageTimer::start("release");
        self.source.release(frame);
        timings.record(timer.stop());

        match result {
            Ok(mut report) => {
                timings.log_summary();
                report.cycle = cycle;
                report.timings = timings;
                Cycle::Processed(report)
            }
            Err(e) => {
                warn!(error = %e, "Frame rejected, skipping cycle");
                Cycle::Skipped(e)
            }
        }
    }

    fn process(&mut self, frame: &Raster, timings: &mut PipelineTimings) -> Result<CycleReport> {
        if frame.width() != self.config.frame_width || frame.height() != self.config.frame_height {
            return Err(VisionError::InvalidDimensions(frame.width(), frame.height()));
        }

        if let Some(writer) = self.pixel_dump.as_mut() {
            if let Err(e) = write_pixel_dump(frame, writer.as_mut()) {
                warn!(error = %e, "Pixel dump failed");
            }
        }

        let timer = StageTimer::start("binarize");
        let (binary, calibration) = {
            let _span = info_span!("binarize", threshold = self.loop_state.threshold).entered();
            if self.loop_state.calibration_pending {
                let band = self.config.white_band;
                let calibrated = auto_threshold(frame, band.min, band.max);
                info!(
                    threshold = calibrated.threshold,
                    white_count = calibrated.white_count,
                    "Threshold calibrated"
                );
                self.loop_state.threshold = calibrated.threshold;
                self.loop_state.calibration_pending = false;
                (calibrated.binary, Some(calibrated.search))
            } else {
                (binarize(frame, self.loop_state.threshold), None)
            }
        };
        timings.record(timer.stop());

        let timer = StageTimer::start("locate");
        let line_x = {
            let _span = info_span!("locate").entered();
            self.locator.locate(&binary, &self.config.scan_region)
        };
        let horizontal_line = self.config.detect_finish_line
            && self
                .locator
                .has_horizontal_line(&binary, &self.config.finish_region);
        timings.record(timer.stop());

        if self.config.detect_finish_line {
            if let Some(event) = self.loop_state.state.horizontal_line_event(horizontal_line) {
                self.apply_event(event);
            }
        }

        let timer = StageTimer::start("decide");
        let command = if self.loop_state.state.follows_line() {
            let command = self.config.dead_band.decide(line_x, frame.width());
            self.actuator.apply(command);
            Some(command)
        } else {
            None
        };
        timings.record(timer.stop());

        debug!(
            ?line_x,
            command = command.map(|c| c.code()),
            state = %self.loop_state.state,
            "Cycle decided"
        );

        Ok(CycleReport {
            cycle: 0,
            state: self.loop_state.state,
            threshold: self.loop_state.threshold,
            calibration,
            line_x,
            horizontal_line,
            command,
            timings: PipelineTimings::new(),
        })
    }
}

use std::path::PathBuf;

use anyhow::Context;
use linefollow_rs::logger;
use linefollow_rs::vision_pipeline::{
    ControllerConfig, LineFollowController, LoggingActuator, MonotonicClock,
    SimulatedIllumination, TiffFrameSource,
};

use tracing::info;

/// Runs the controller against recorded TIFF frames when a directory is given, otherwise
/// against a synthetic sweeping stripe. An optional second argument caps the cycle count.
fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting line follower...");

    let mut args = std::env::args().skip(1);
    let frames_dir = args.next().map(PathBuf::from);
    let max_cycles = args
        .next()
        .map(|n| n.parse::<u64>())
        .transpose()
        .context("cycle count must be a non-negative integer")?
        .or(Some(20));

    let config = ControllerConfig::builder()
        .poll_interval_ms(100)
        .calibrate_on_start(frames_dir.is_some())
        .build();
    info!(
        width = config.frame_width,
        height = config.frame_height,
        threshold = config.threshold,
        interval_ms = config.poll_interval_ms,
        "Controller configured"
    );

    let clock = MonotonicClock::new();
    let cycles = match frames_dir {
        Some(dir) => {
            let source = TiffFrameSource::from_dir(&dir)
                .with_context(|| format!("loading frames from {}", dir.display()))?;
            let mut controller = LineFollowController::with_custom(
                source,
                SimulatedIllumination::new(),
                LoggingActuator,
                config,
            )?;
            controller.run(&clock, max_cycles)
        }
        None => {
            let mut controller = LineFollowController::simulated(config)?;
            controller.run(&clock, max_cycles)
        }
    };

    info!(cycles, "Line follower stopped");
    Ok(())
}

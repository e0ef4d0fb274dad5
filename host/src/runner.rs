use anyhow::{Context, Result};
use archery_core::{CalibrationProfile, CommandOutcome, GameConfig, GameSession, SessionStats};
use serde::Serialize;

use crate::render::{log_event, Renderer};
use crate::source::FrameSource;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub score: u32,
    pub stats: SessionStats,
    pub calibration: CalibrationProfile,
    pub final_rng_state: u32,
    /// False when the source ran dry instead of a quit command.
    pub quit: bool,
}

/// Pulls frames until the source is exhausted or a quit command arrives.
/// Each frame is stepped and rendered before its command applies.
pub fn run_session(
    source: &mut dyn FrameSource,
    renderer: &mut dyn Renderer,
    config: GameConfig,
) -> Result<RunSummary> {
    let (frame_width, frame_height) = source.frame_size();
    let config = GameConfig {
        frame_width,
        frame_height,
        ..config
    };
    let mut session = GameSession::new(config).context("failed to start game session")?;
    let mut quit = false;

    tracing::info!(frame_width, frame_height, seed = session.config().seed, "session started");

    while let Some(frame) = source
        .next_frame()
        .with_context(|| format!("frame source failed after {} frames", session.frame_count()))?
    {
        let events = session.step(&frame.input);
        renderer.render(&session.render_snapshot(), &events)?;

        let Some(command) = frame.command else {
            continue;
        };
        let (outcome, event) = session.apply(command, frame.input.now);
        if let Some(event) = event {
            log_event(session.frame_count(), &event);
        }
        if outcome == CommandOutcome::Quit {
            quit = true;
            break;
        }
    }

    renderer.finish()?;

    let summary = RunSummary {
        frames: session.frame_count(),
        score: session.score(),
        stats: session.stats(),
        calibration: *session.calibration(),
        final_rng_state: session.rng_state(),
        quit,
    };
    tracing::info!(
        frames = summary.frames,
        score = summary.score,
        shots = summary.stats.shots,
        quit = summary.quit,
        "session ended"
    );
    Ok(summary)
}

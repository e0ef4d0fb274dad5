use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::calibration::{CalibrationEngine, CalibrationProfile};
use crate::collision;
use crate::config::GameConfig;
use crate::error::{CalibrationError, ConfigError};
use crate::geometry::Point2D;
use crate::gesture::{GestureState, GestureStateMachine, GestureTransition};
use crate::joints::HandJoints;
use crate::projectile::{Advance, Projectile, ProjectileSimulator};
use crate::render::{hand_overlay, ArrowView, RenderSnapshot, Segment, TargetView};
use crate::target::{Target, TargetScheduler};

#[cfg(test)]
mod tests;

/// Gameplay variants. Only one exists; switching still resets the round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Traditional,
}

impl GameMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Traditional => "traditional",
        }
    }
}

impl core::fmt::Display for GameMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exclusive loop modes. While calibrating, gameplay state is frozen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Playing,
    Calibrating,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    SelectMode(GameMode),
    Calibrate,
    /// Aborts calibration when calibrating; ends the session otherwise.
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Quit,
}

/// Detector output for one frame, scaled into pixel space.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Monotonic time since the session started.
    pub now: Duration,
    pub hands: Vec<HandJoints>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    DrawStarted,
    Released { direction: Point2D },
    Hit { score: u32, at: Point2D },
    Missed { exit: Point2D },
    TargetRelocated { position: Point2D },
    ModeChanged(GameMode),
    CalibrationStarted,
    CalibrationCompleted(CalibrationProfile),
    CalibrationFailed(CalibrationError),
    CalibrationCancelled,
}

/// `shots == hits + misses` once no arrow is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub shots: u32,
    pub hits: u32,
    pub misses: u32,
    /// Relocations caused by the move deadline, not by hits or mode changes.
    pub timed_relocations: u32,
}

pub struct GameSession {
    config: GameConfig,
    mode: GameMode,
    run_mode: RunMode,
    score: u32,
    projectile: Projectile,
    gesture: GestureStateMachine,
    simulator: ProjectileSimulator,
    targets: TargetScheduler,
    calibration: CalibrationProfile,
    calibrator: CalibrationEngine,
    frame_count: u64,
    last_hands: Vec<HandJoints>,
    stats: SessionStats,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let bounds = config.target_bounds()?;
        let (width, height) = config.frame_size();

        Ok(Self {
            mode: GameMode::Traditional,
            run_mode: RunMode::Playing,
            score: 0,
            projectile: Projectile::at_rest(config.arrow_rest, config.arrow_speed_px),
            gesture: GestureStateMachine::default(),
            simulator: ProjectileSimulator::new(width, height, config.arrow_rest),
            targets: TargetScheduler::new(
                bounds,
                config.target_radius_px as f32,
                config.target_move_interval(),
                config.seed,
                Duration::ZERO,
            ),
            calibration: CalibrationProfile::unverified(config.default_threshold_px),
            calibrator: CalibrationEngine::new(config.calibration_frames),
            frame_count: 0,
            last_hands: Vec::new(),
            stats: SessionStats::default(),
            config,
        })
    }

    /// One pass of the frame loop.
    pub fn step(&mut self, frame: &FrameInput) -> Vec<GameEvent> {
        self.frame_count += 1;
        self.last_hands.clone_from(&frame.hands);

        match self.run_mode {
            RunMode::Calibrating => self.step_calibration(&frame.hands),
            RunMode::Playing => self.step_playing(frame.now, &frame.hands),
        }
    }

    fn step_calibration(&mut self, hands: &[HandJoints]) -> Vec<GameEvent> {
        self.calibrator.feed_frame(hands);
        if !self.calibrator.is_complete() {
            return Vec::new();
        }

        self.run_mode = RunMode::Playing;
        match self.calibrator.finalize() {
            Ok(profile) => {
                tracing::info!(
                    threshold = profile.threshold,
                    samples = profile.sample_count,
                    frames = self.calibrator.frames_seen(),
                    "calibration complete"
                );
                self.calibration = profile;
                vec![GameEvent::CalibrationCompleted(profile)]
            }
            Err(err) => {
                tracing::warn!(
                    threshold = self.calibration.threshold,
                    "{err}; keeping previous threshold"
                );
                vec![GameEvent::CalibrationFailed(err)]
            }
        }
    }

    fn step_playing(&mut self, now: Duration, hands: &[HandJoints]) -> Vec<GameEvent> {
        let mut events = Vec::new();

        match self
            .gesture
            .step(&mut self.projectile, hands, &self.calibration)
        {
            GestureTransition::Unchanged => {}
            GestureTransition::DrawStarted => events.push(GameEvent::DrawStarted),
            GestureTransition::Released { direction } => {
                self.stats.shots += 1;
                events.push(GameEvent::Released { direction });
            }
        }

        match self.simulator.advance(&mut self.projectile) {
            Advance::Holding => {}
            Advance::InFlight(position) => {
                if collision::hit(position, self.targets.target()) {
                    self.score += 1;
                    self.stats.hits += 1;
                    self.projectile.reset(self.simulator.rest());
                    tracing::info!(
                        score = self.score,
                        x = position.x,
                        y = position.y,
                        "target hit"
                    );
                    events.push(GameEvent::Hit {
                        score: self.score,
                        at: position,
                    });
                    let target = self.targets.on_hit(now);
                    events.push(GameEvent::TargetRelocated {
                        position: target.position,
                    });
                }
            }
            Advance::OutOfBounds(exit) => {
                self.stats.misses += 1;
                tracing::debug!(x = exit.x, y = exit.y, "arrow left the frame");
                events.push(GameEvent::Missed { exit });
            }
        }

        if self.targets.tick(now) {
            self.stats.timed_relocations += 1;
            events.push(GameEvent::TargetRelocated {
                position: self.targets.target().position,
            });
        }

        events
    }

    pub fn apply(
        &mut self,
        command: Command,
        now: Duration,
    ) -> (CommandOutcome, Option<GameEvent>) {
        match (self.run_mode, command) {
            (RunMode::Calibrating, Command::Quit) => {
                (CommandOutcome::Continue, Some(self.cancel_calibration()))
            }
            (RunMode::Calibrating, _) => (CommandOutcome::Continue, None),
            (RunMode::Playing, Command::SelectMode(mode)) => {
                (CommandOutcome::Continue, Some(self.change_mode(mode, now)))
            }
            (RunMode::Playing, Command::Calibrate) => {
                (CommandOutcome::Continue, Some(self.begin_calibration()))
            }
            (RunMode::Playing, Command::Quit) => (CommandOutcome::Quit, None),
        }
    }

    /// Resets projectile and target; score and calibration carry over. An
    /// arrow still in flight is scored as a miss.
    pub fn change_mode(&mut self, mode: GameMode, now: Duration) -> GameEvent {
        self.mode = mode;
        if self.projectile.is_released() {
            self.stats.misses += 1;
        }
        self.projectile.reset(self.simulator.rest());
        self.targets.spawn(now);
        tracing::info!(mode = %mode, "mode selected");
        GameEvent::ModeChanged(mode)
    }

    pub fn begin_calibration(&mut self) -> GameEvent {
        self.calibrator.start();
        self.run_mode = RunMode::Calibrating;
        tracing::info!(
            frames = self.calibrator.target_frames(),
            "calibration started"
        );
        GameEvent::CalibrationStarted
    }

    /// Leaves calibration without finalizing; the previous profile stays.
    pub fn cancel_calibration(&mut self) -> GameEvent {
        self.run_mode = RunMode::Playing;
        tracing::info!(
            frames = self.calibrator.frames_seen(),
            "calibration cancelled"
        );
        GameEvent::CalibrationCancelled
    }

    pub fn render_snapshot(&self) -> RenderSnapshot {
        let calibrating = matches!(self.run_mode, RunMode::Calibrating);
        let boundary_x = self.config.boundary_x_px as f32;
        let target = self.targets.target();
        let arrow = match self.projectile.state {
            GestureState::Idle => None,
            GestureState::Drawing | GestureState::Released => Some(ArrowView::new(
                self.projectile.position,
                self.projectile.direction,
                self.config.arrow_visual_length_px,
                self.config.arrowhead_length_px,
            )),
        };

        RenderSnapshot {
            frame_index: self.frame_count,
            score: self.score,
            gesture: self.projectile.state,
            calibration_progress: calibrating.then(|| self.calibrator.progress()),
            boundary: Segment {
                from: Point2D::new(boundary_x, 0.0),
                to: Point2D::new(boundary_x, self.config.frame_height as f32),
            },
            target: (!calibrating).then_some(TargetView {
                center: target.position,
                radius: target.radius,
            }),
            arrow: if calibrating { None } else { arrow },
            hands: hand_overlay(&self.last_hands),
        }
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[inline]
    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    #[inline]
    pub fn projectile(&self) -> &Projectile {
        &self.projectile
    }

    #[inline]
    pub fn target(&self) -> &Target {
        self.targets.target()
    }

    #[inline]
    pub fn calibration(&self) -> &CalibrationProfile {
        &self.calibration
    }

    #[inline]
    pub fn calibration_progress(&self) -> Option<f32> {
        matches!(self.run_mode, RunMode::Calibrating).then(|| self.calibrator.progress())
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    #[inline]
    pub fn rng_state(&self) -> u32 {
        self.targets.rng_state()
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

use anyhow::{anyhow, Context, Result};
use archery_core::{
    joints::LANDMARK_COUNT, replay, rng::SeededRng, Command, CommandOutcome, GameConfig,
    GameSession, GestureState, Joint, Point2D, RecordedFrame, Recording, RunMode,
};
use serde::Serialize;

const FRAME_INTERVAL_MS: u64 = 33;
const OPEN_GAP_PX: f32 = 64.0;
const PINCH_GAP_PX: f32 = 8.0;
const KNUCKLE_OFFSET_PX: f32 = 40.0;
const DRAW_FRAMES: u32 = 3;
const REST_FRAMES: u32 = 4;
/// Arrow steps between release and the target center, fewer on narrow frames.
const MAX_AIM_STEPS: f32 = 5.0;
const MAX_AIM_DEGREES: u32 = 20;

#[derive(Clone, Debug, Serialize)]
pub struct DemoMetrics {
    pub seed: u32,
    pub shots: u32,
    pub hits: u32,
    pub frame_count: u64,
    pub final_rng_state: u32,
    pub calibrated_threshold: f32,
}

#[derive(Clone, Debug)]
pub struct DemoArtifact {
    pub metrics: DemoMetrics,
    pub recording: Recording,
}

/// Scripts a session against a live game: calibrate with an open hand, then
/// pinch at a point the arrow will reach the target from, and let go.
pub fn generate(config: GameConfig, shots: u32) -> Result<DemoArtifact> {
    if shots == 0 {
        return Err(anyhow!("shots must be > 0"));
    }

    let mut script = Script::new(config.clone())?;
    let mut aim_rng = SeededRng::new(config.seed.rotate_left(16));

    let calibration_tip = Point2D::new(
        config.frame_width as f32 * 0.75,
        config.frame_height as f32 * 0.5,
    );
    script.push(Vec::new(), Some(Command::Calibrate))?;
    while script.session.run_mode() == RunMode::Calibrating {
        let hand = script.pose(calibration_tip, Point2D::new(-1.0, 0.0), OPEN_GAP_PX);
        script.push(vec![hand], None)?;
    }

    for _ in 0..shots {
        script.shoot(&mut aim_rng)?;
    }
    script.push(Vec::new(), Some(Command::Quit))?;

    let Script { session, recording } = script;
    let metrics = DemoMetrics {
        seed: config.seed,
        shots: session.stats().shots,
        hits: session.score(),
        frame_count: session.frame_count(),
        final_rng_state: session.rng_state(),
        calibrated_threshold: session.calibration().threshold,
    };

    let replayed = replay(&recording, config).context("generated recording failed to replay")?;
    if replayed.final_score != metrics.hits || replayed.final_rng_state != metrics.final_rng_state
    {
        return Err(anyhow!(
            "replay diverged from live session: score {} vs {}, rng {:#010x} vs {:#010x}",
            replayed.final_score,
            metrics.hits,
            replayed.final_rng_state,
            metrics.final_rng_state
        ));
    }

    Ok(DemoArtifact { metrics, recording })
}

struct Script {
    session: GameSession,
    recording: Recording,
}

impl Script {
    fn new(config: GameConfig) -> Result<Self> {
        let recording = Recording {
            frame_width: config.frame_width,
            frame_height: config.frame_height,
            mirrored: true,
            frames: Vec::new(),
        };
        let session = GameSession::new(config).context("invalid demo configuration")?;
        Ok(Self { session, recording })
    }

    /// Appends a frame and feeds the live session exactly what a replay will see.
    fn push(&mut self, hands: Vec<Vec<[f32; 2]>>, command: Option<Command>) -> Result<()> {
        let index = self.recording.frames.len();
        self.recording.frames.push(RecordedFrame {
            elapsed_ms: index as u64 * FRAME_INTERVAL_MS,
            hands,
            command,
        });

        let input = self
            .recording
            .frame_input(index)
            .with_context(|| format!("scripted frame {index} is malformed"))?;
        self.session.step(&input);
        if let Some(command) = command {
            if self.session.apply(command, input.now).0 == CommandOutcome::Quit {
                tracing::debug!(frame = index, "demo quit");
            }
        }
        Ok(())
    }

    fn shoot(&mut self, aim_rng: &mut SeededRng) -> Result<()> {
        let config = self.session.config().clone();
        let target = self.session.target().position;

        // Approach from the right, tilted toward the vertical middle so the
        // release point stays inside the frame.
        let tilt = (aim_rng.next_inclusive(0, MAX_AIM_DEGREES) as f32).to_radians();
        let vertical = if target.y < config.frame_height as f32 / 2.0 {
            -1.0
        } else {
            1.0
        };
        let direction = Point2D::new(-tilt.cos(), vertical * tilt.sin());
        let room = config.frame_width as f32 - KNUCKLE_OFFSET_PX - target.x;
        let steps = (room / config.arrow_speed_px).floor().clamp(1.0, MAX_AIM_STEPS);
        let nock = target.offset(direction, -config.arrow_speed_px * steps);

        for _ in 0..DRAW_FRAMES {
            let hand = self.pose(nock, direction, PINCH_GAP_PX);
            self.push(vec![hand], None)?;
        }

        let max_flight = (config.frame_width + config.frame_height) as f32 / config.arrow_speed_px;
        let mut flight = 0;
        loop {
            let hand = self.pose(nock, direction, OPEN_GAP_PX);
            self.push(vec![hand], None)?;
            flight += 1;
            if self.session.projectile().state == GestureState::Idle {
                break;
            }
            if flight as f32 > max_flight + 2.0 {
                return Err(anyhow!("arrow still in flight after {flight} frames"));
            }
        }

        for _ in 0..REST_FRAMES {
            self.push(Vec::new(), None)?;
        }
        Ok(())
    }

    /// Normalized landmarks for a hand whose index finger points along
    /// `direction` with its tip at `tip`, thumb `gap` pixels away.
    fn pose(&self, tip: Point2D, direction: Point2D, gap: f32) -> Vec<[f32; 2]> {
        let width = self.recording.frame_width as f32;
        let height = self.recording.frame_height as f32;
        let knuckle = tip.offset(direction, -KNUCKLE_OFFSET_PX);
        let thumb = tip.offset(direction.rotated(core::f32::consts::FRAC_PI_2), gap);

        let mut landmarks = vec![[knuckle.x / width, knuckle.y / height]; LANDMARK_COUNT];
        for (joint, point) in [
            (Joint::IndexTip, tip),
            (Joint::IndexMcp, knuckle),
            (Joint::ThumbTip, thumb),
        ] {
            landmarks[joint.index()] = [point.x / width, point.y / height];
        }
        landmarks
    }
}

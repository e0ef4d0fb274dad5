use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationProfile;
use crate::config::GameConfig;
use crate::error::{RecordingError, ReplayError};
use crate::joints::{HandJoints, LANDMARK_COUNT};
use crate::session::{Command, CommandOutcome, FrameInput, GameSession, SessionStats};

/// A captured session: per-frame detector output plus the keys pressed on
/// that frame. Stands in for the camera, the detector and the keyboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub frame_width: u32,
    pub frame_height: u32,
    /// True when landmarks were detected on the already-mirrored selfie view.
    #[serde(default)]
    pub mirrored: bool,
    pub frames: Vec<RecordedFrame>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub elapsed_ms: u64,
    /// One entry per detected hand, each holding 21 normalized `[x, y]` landmarks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hands: Vec<Vec<[f32; 2]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,
}

impl Recording {
    pub fn validate(&self) -> Result<(), RecordingError> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(RecordingError::ZeroFrameSize {
                width: self.frame_width,
                height: self.frame_height,
            });
        }

        let mut previous_ms = 0;
        for (index, frame) in self.frames.iter().enumerate() {
            if frame.elapsed_ms < previous_ms {
                return Err(RecordingError::TimeWentBackwards {
                    frame: index,
                    previous_ms,
                    elapsed_ms: frame.elapsed_ms,
                });
            }
            previous_ms = frame.elapsed_ms;
            self.hands_at(index)?;
        }

        Ok(())
    }

    /// Scaled, selfie-view hands for frame `index`.
    pub fn hands_at(&self, index: usize) -> Result<Vec<HandJoints>, RecordingError> {
        let Some(frame) = self.frames.get(index) else {
            return Ok(Vec::new());
        };

        frame
            .hands
            .iter()
            .enumerate()
            .map(|(hand, landmarks)| {
                let landmarks: &[[f32; 2]; LANDMARK_COUNT] =
                    landmarks
                        .as_slice()
                        .try_into()
                        .map_err(|_| RecordingError::LandmarkCount {
                            frame: index,
                            hand,
                            found: landmarks.len(),
                            expected: LANDMARK_COUNT,
                        })?;
                if let Some(landmark) = landmarks
                    .iter()
                    .position(|[x, y]| !(x.is_finite() && y.is_finite()))
                {
                    return Err(RecordingError::NonFiniteLandmark {
                        frame: index,
                        hand,
                        landmark,
                    });
                }
                Ok(HandJoints::from_normalized(
                    landmarks,
                    self.frame_width,
                    self.frame_height,
                    !self.mirrored,
                ))
            })
            .collect()
    }

    pub fn frame_input(&self, index: usize) -> Result<FrameInput, RecordingError> {
        let now = self
            .frames
            .get(index)
            .map(|frame| Duration::from_millis(frame.elapsed_ms))
            .unwrap_or_default();
        Ok(FrameInput {
            now,
            hands: self.hands_at(index)?,
        })
    }

    /// The session config for this recording: `base` with the recording's frame size.
    pub fn game_config(&self, base: GameConfig) -> GameConfig {
        GameConfig {
            frame_width: self.frame_width,
            frame_height: self.frame_height,
            ..base
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub final_score: u32,
    pub frame_count: u64,
    pub final_rng_state: u32,
    pub stats: SessionStats,
    pub calibration: CalibrationProfile,
    /// Frame on which a quit command ended the session early.
    pub quit_at_frame: Option<u64>,
}

/// Runs a whole recording through a fresh session. Each frame is stepped
/// first, then that frame's command applies, matching the live loop where
/// keys are read after the frame is shown.
pub fn replay(recording: &Recording, config: GameConfig) -> Result<ReplayOutcome, ReplayError> {
    recording.validate()?;
    let mut session = GameSession::new(recording.game_config(config))?;
    let mut quit_at_frame = None;

    for (index, recorded) in recording.frames.iter().enumerate() {
        let frame = recording.frame_input(index)?;
        session.step(&frame);

        if let Some(command) = recorded.command {
            let (outcome, _) = session.apply(command, frame.now);
            if outcome == CommandOutcome::Quit {
                quit_at_frame = Some(session.frame_count());
                break;
            }
        }
    }

    Ok(ReplayOutcome {
        final_score: session.score(),
        frame_count: session.frame_count(),
        final_rng_state: session.rng_state(),
        stats: session.stats(),
        calibration: *session.calibration(),
        quit_at_frame,
    })
}

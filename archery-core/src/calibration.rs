use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;
use crate::joints::HandJoints;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    /// Number of pinch-distance samples the threshold was averaged over.
    /// Zero means the profile is a configured default, not a measured one.
    pub sample_count: u32,
    pub threshold: f32,
}

impl CalibrationProfile {
    pub fn unverified(threshold: f32) -> Self {
        Self {
            sample_count: 0,
            threshold,
        }
    }

    #[inline]
    pub fn is_verified(&self) -> bool {
        self.sample_count > 0
    }

    /// Pinch distances strictly below this count as drawing.
    #[inline]
    pub fn pinch_cutoff(&self) -> f32 {
        self.threshold / 2.0
    }
}

/// Collects index-to-thumb distances over a fixed number of frames.
///
/// The frame counter advances on every frame, hand or no hand; only frames
/// with a hand contribute samples.
#[derive(Clone, Debug)]
pub struct CalibrationEngine {
    target_frames: u32,
    frames_seen: u32,
    samples: Vec<f32>,
}

impl CalibrationEngine {
    pub fn new(target_frames: u32) -> Self {
        Self {
            target_frames,
            frames_seen: 0,
            samples: Vec::with_capacity(target_frames as usize),
        }
    }

    pub fn start(&mut self) {
        self.frames_seen = 0;
        self.samples.clear();
    }

    pub fn feed(&mut self, joints: Option<&HandJoints>) {
        match joints {
            Some(hand) => self.feed_frame(core::slice::from_ref(hand)),
            None => self.feed_frame(&[]),
        }
    }

    /// Every hand in the frame contributes one sample; the frame counts once.
    pub fn feed_frame(&mut self, hands: &[HandJoints]) {
        for hand in hands {
            let distance = hand.pinch_distance();
            if distance.is_finite() {
                self.samples.push(distance);
            }
        }
        self.frames_seen = self.frames_seen.saturating_add(1);
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.frames_seen >= self.target_frames
    }

    #[inline]
    pub fn frames_seen(&self) -> u32 {
        self.frames_seen
    }

    #[inline]
    pub fn target_frames(&self) -> u32 {
        self.target_frames
    }

    #[inline]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Fraction of the frame budget consumed, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.target_frames == 0 {
            return 1.0;
        }
        (self.frames_seen as f32 / self.target_frames as f32).min(1.0)
    }

    pub fn finalize(&self) -> Result<CalibrationProfile, CalibrationError> {
        if self.samples.is_empty() {
            return Err(CalibrationError::InsufficientSamples {
                frames: self.frames_seen,
            });
        }

        let sum: f64 = self.samples.iter().map(|sample| *sample as f64).sum();
        let mean = sum / self.samples.len() as f64;

        Ok(CalibrationProfile {
            sample_count: self.samples.len() as u32,
            threshold: mean as f32,
        })
    }
}

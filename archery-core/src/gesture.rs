use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationProfile;
use crate::constants::ARROW_DEFAULT_DIRECTION;
use crate::geometry::Point2D;
use crate::joints::HandJoints;
use crate::projectile::Projectile;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureState {
    #[default]
    Idle,
    Drawing,
    Released,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureTransition {
    Unchanged,
    DrawStarted,
    Released { direction: Point2D },
}

/// Pinch-to-draw, open-to-release.
///
/// The gesture state lives on the [`Projectile`] so the release latch cannot
/// drift away from the projectile it guards. While the projectile is in
/// flight, hands are ignored until the session resets it.
#[derive(Clone, Copy, Debug)]
pub struct GestureStateMachine {
    fallback_direction: Point2D,
}

impl Default for GestureStateMachine {
    fn default() -> Self {
        Self {
            fallback_direction: Point2D::from(ARROW_DEFAULT_DIRECTION),
        }
    }
}

impl GestureStateMachine {
    /// Runs every detected hand through the state machine in detector order;
    /// the last hand processed wins. A release anywhere in the frame is
    /// reported over a draw start.
    pub fn step(
        &self,
        projectile: &mut Projectile,
        hands: &[HandJoints],
        profile: &CalibrationProfile,
    ) -> GestureTransition {
        let mut outcome = GestureTransition::Unchanged;
        for hand in hands {
            match self.step_hand(projectile, hand, profile) {
                GestureTransition::Unchanged => {}
                released @ GestureTransition::Released { .. } => outcome = released,
                GestureTransition::DrawStarted => {
                    if !matches!(outcome, GestureTransition::Released { .. }) {
                        outcome = GestureTransition::DrawStarted;
                    }
                }
            }
        }
        outcome
    }

    pub fn step_hand(
        &self,
        projectile: &mut Projectile,
        hand: &HandJoints,
        profile: &CalibrationProfile,
    ) -> GestureTransition {
        if projectile.is_released() {
            return GestureTransition::Unchanged;
        }

        let distance = hand.pinch_distance();
        let cutoff = profile.pinch_cutoff();

        if distance < cutoff {
            let started = projectile.state == GestureState::Idle;
            projectile.state = GestureState::Drawing;
            projectile.position = hand.index_tip();
            if started {
                tracing::debug!(distance, cutoff, "draw started");
                return GestureTransition::DrawStarted;
            }
            return GestureTransition::Unchanged;
        }

        if distance >= cutoff && projectile.state == GestureState::Drawing {
            let direction = self.release_direction(hand);
            projectile.direction = direction;
            projectile.state = GestureState::Released;
            tracing::debug!(
                distance,
                cutoff,
                dx = direction.x,
                dy = direction.y,
                "arrow released"
            );
            return GestureTransition::Released { direction };
        }

        GestureTransition::Unchanged
    }

    /// Unit vector from the index knuckle to the index fingertip, or the
    /// leftward fallback when the two coincide.
    pub fn release_direction(&self, hand: &HandJoints) -> Point2D {
        hand.index_mcp()
            .delta_to(hand.index_tip())
            .normalized()
            .unwrap_or(self.fallback_direction)
    }
}

use serde::{Deserialize, Serialize};

use crate::constants::ARROW_DEFAULT_DIRECTION;
use crate::geometry::Point2D;
use crate::gesture::GestureState;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub position: Point2D,
    /// Unit vector. Frozen once the projectile is released.
    pub direction: Point2D,
    /// Pixels travelled per processed frame.
    pub speed: f32,
    /// `Released` doubles as the once-per-draw-cycle launch latch.
    pub state: GestureState,
}

impl Projectile {
    pub fn at_rest(rest: Point2D, speed: f32) -> Self {
        Self {
            position: rest,
            direction: Point2D::from(ARROW_DEFAULT_DIRECTION),
            speed,
            state: GestureState::Idle,
        }
    }

    /// Back to "not drawn, not released" at the rest position. The last
    /// direction is kept for drawing the idle arrow.
    pub fn reset(&mut self, rest: Point2D) {
        self.position = rest;
        self.state = GestureState::Idle;
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        matches!(self.state, GestureState::Released)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Advance {
    /// Not released; nothing moved.
    Holding,
    InFlight(Point2D),
    /// Left the frame at this position and was reset to rest.
    OutOfBounds(Point2D),
}

/// Frame-stepped flight: one `speed * direction` step per processed frame,
/// independent of wall-clock time.
#[derive(Clone, Copy, Debug)]
pub struct ProjectileSimulator {
    frame_width: f32,
    frame_height: f32,
    rest: Point2D,
}

impl ProjectileSimulator {
    pub fn new(frame_width: f32, frame_height: f32, rest: Point2D) -> Self {
        Self {
            frame_width,
            frame_height,
            rest,
        }
    }

    pub fn advance(&self, projectile: &mut Projectile) -> Advance {
        if !projectile.is_released() {
            return Advance::Holding;
        }

        let next = projectile
            .position
            .offset(projectile.direction, projectile.speed);

        if !next.within_frame(self.frame_width, self.frame_height) {
            projectile.reset(self.rest);
            return Advance::OutOfBounds(next);
        }

        projectile.position = next;
        Advance::InFlight(next)
    }

    #[inline]
    pub fn rest(&self) -> Point2D {
        self.rest
    }
}

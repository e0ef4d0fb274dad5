use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;
use crate::rng::SeededRng;

/// Inclusive pixel rectangle that target centers are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetBounds {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl TargetBounds {
    pub fn contains(&self, point: Point2D) -> bool {
        point.x >= self.min_x as f32
            && point.x <= self.max_x as f32
            && point.y >= self.min_y as f32
            && point.y <= self.max_y as f32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub position: Point2D,
    pub radius: f32,
    /// Session time after which the target relocates on its own.
    pub next_move_deadline: Duration,
}

#[derive(Clone, Debug)]
pub struct TargetScheduler {
    bounds: TargetBounds,
    radius: f32,
    interval: Duration,
    rng: SeededRng,
    target: Target,
    relocations: u32,
}

impl TargetScheduler {
    pub fn new(
        bounds: TargetBounds,
        radius: f32,
        interval: Duration,
        seed: u32,
        now: Duration,
    ) -> Self {
        debug_assert!(bounds.max_x >= bounds.min_x && bounds.max_y >= bounds.min_y);
        let mut scheduler = Self {
            bounds,
            radius,
            interval,
            rng: SeededRng::new(seed),
            target: Target {
                position: Point2D::default(),
                radius,
                next_move_deadline: Duration::ZERO,
            },
            relocations: 0,
        };
        scheduler.place(now);
        scheduler
    }

    /// Moves the target to a fresh random position and restarts its clock.
    pub fn spawn(&mut self, now: Duration) -> Target {
        self.place(now);
        self.relocations += 1;
        tracing::debug!(
            x = self.target.position.x,
            y = self.target.position.y,
            deadline_ms = self.target.next_move_deadline.as_millis() as u64,
            "target spawned"
        );
        self.target
    }

    /// Relocates the target once its deadline has passed. Returns whether it moved.
    pub fn tick(&mut self, now: Duration) -> bool {
        if now > self.target.next_move_deadline {
            self.spawn(now);
            return true;
        }
        false
    }

    #[inline]
    pub fn on_hit(&mut self, now: Duration) -> Target {
        self.spawn(now)
    }

    #[inline]
    pub fn target(&self) -> &Target {
        &self.target
    }

    #[inline]
    pub fn bounds(&self) -> TargetBounds {
        self.bounds
    }

    #[inline]
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    /// Number of spawns after the initial placement.
    #[inline]
    pub fn relocations(&self) -> u32 {
        self.relocations
    }

    fn place(&mut self, now: Duration) {
        let x = self.rng.next_inclusive(self.bounds.min_x, self.bounds.max_x);
        let y = self.rng.next_inclusive(self.bounds.min_y, self.bounds.max_y);
        self.target = Target {
            position: Point2D::new(x as f32, y as f32),
            radius: self.radius,
            next_move_deadline: now + self.interval,
        };
    }
}

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

/// The 21 hand landmarks reported by the pose detector, in detector order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Joint {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

pub const LANDMARK_COUNT: usize = 21;

impl Joint {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Finger chains drawn for the hand overlay. The palm is left open.
pub const HAND_BONES: [(Joint, Joint); 16] = [
    (Joint::Wrist, Joint::ThumbCmc),
    (Joint::ThumbCmc, Joint::ThumbMcp),
    (Joint::ThumbMcp, Joint::ThumbIp),
    (Joint::ThumbIp, Joint::ThumbTip),
    (Joint::IndexMcp, Joint::IndexPip),
    (Joint::IndexPip, Joint::IndexDip),
    (Joint::IndexDip, Joint::IndexTip),
    (Joint::MiddleMcp, Joint::MiddlePip),
    (Joint::MiddlePip, Joint::MiddleDip),
    (Joint::MiddleDip, Joint::MiddleTip),
    (Joint::RingMcp, Joint::RingPip),
    (Joint::RingPip, Joint::RingDip),
    (Joint::RingDip, Joint::RingTip),
    (Joint::PinkyMcp, Joint::PinkyPip),
    (Joint::PinkyPip, Joint::PinkyDip),
    (Joint::PinkyDip, Joint::PinkyTip),
];

/// One detected hand, already scaled into frame-pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandJoints {
    points: [Point2D; LANDMARK_COUNT],
}

impl HandJoints {
    pub fn from_points(points: [Point2D; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Scales detector output (normalized to `[0, 1]`) by the frame size.
    /// `mirror` flips x for feeds that were not mirrored before detection.
    pub fn from_normalized(
        landmarks: &[[f32; 2]; LANDMARK_COUNT],
        frame_width: u32,
        frame_height: u32,
        mirror: bool,
    ) -> Self {
        let width = frame_width as f32;
        let height = frame_height as f32;
        let mut points = [Point2D::default(); LANDMARK_COUNT];
        for (point, [x, y]) in points.iter_mut().zip(landmarks.iter()) {
            let x = if mirror { 1.0 - *x } else { *x };
            *point = Point2D::new(x * width, y * height);
        }
        Self { points }
    }

    #[must_use]
    pub fn with(mut self, joint: Joint, point: Point2D) -> Self {
        self.points[joint.index()] = point;
        self
    }

    #[inline]
    pub fn get(&self, joint: Joint) -> Point2D {
        self.points[joint.index()]
    }

    #[inline]
    pub fn index_tip(&self) -> Point2D {
        self.get(Joint::IndexTip)
    }

    #[inline]
    pub fn thumb_tip(&self) -> Point2D {
        self.get(Joint::ThumbTip)
    }

    #[inline]
    pub fn index_mcp(&self) -> Point2D {
        self.get(Joint::IndexMcp)
    }

    /// Distance between index fingertip and thumb tip.
    #[inline]
    pub fn pinch_distance(&self) -> f32 {
        self.index_tip().distance(self.thumb_tip())
    }

    pub fn bones(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        HAND_BONES
            .iter()
            .map(move |(from, to)| (self.get(*from), self.get(*to)))
    }

    pub fn points(&self) -> &[Point2D; LANDMARK_COUNT] {
        &self.points
    }
}

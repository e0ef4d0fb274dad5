use serde::Serialize;

use crate::constants::ARROWHEAD_SPREAD_RAD;
use crate::geometry::Point2D;
use crate::gesture::GestureState;
use crate::joints::HandJoints;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point2D,
    pub to: Point2D,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ArrowView {
    pub base: Point2D,
    pub tip: Point2D,
    pub head_left: Point2D,
    pub head_right: Point2D,
}

impl ArrowView {
    /// Shaft of `length` along `direction`, with two barbs of `head_length`
    /// swept back from the tip at ±30°.
    pub fn new(base: Point2D, direction: Point2D, length: f32, head_length: f32) -> Self {
        let tip = base.offset(direction, length);
        let angle = direction.y.atan2(direction.x);
        let barb = |offset: f32| {
            Point2D::new(
                tip.x - head_length * (angle + offset).cos(),
                tip.y - head_length * (angle + offset).sin(),
            )
        };

        Self {
            base,
            tip,
            head_left: barb(-ARROWHEAD_SPREAD_RAD),
            head_right: barb(ARROWHEAD_SPREAD_RAD),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TargetView {
    pub center: Point2D,
    pub radius: f32,
}

/// Everything a renderer needs to draw one frame. Produced by the session;
/// drawing it is the renderer's business.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub frame_index: u64,
    pub score: u32,
    pub gesture: GestureState,
    /// Present while calibrating.
    pub calibration_progress: Option<f32>,
    pub boundary: Segment,
    /// Hidden while calibrating.
    pub target: Option<TargetView>,
    /// Drawn while the arrow is nocked or in flight.
    pub arrow: Option<ArrowView>,
    pub hands: Vec<Vec<Segment>>,
}

pub(crate) fn hand_overlay(hands: &[HandJoints]) -> Vec<Vec<Segment>> {
    hands
        .iter()
        .map(|hand| hand.bones().map(|(from, to)| Segment { from, to }).collect())
        .collect()
}

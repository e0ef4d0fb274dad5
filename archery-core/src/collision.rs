use crate::geometry::Point2D;
use crate::target::Target;

/// Boundary-inclusive circle test between a projectile position and a target.
#[inline]
pub fn hit(position: Point2D, target: &Target) -> bool {
    within_radius(position, target.position, target.radius)
}

#[inline]
pub fn within_radius(a: Point2D, b: Point2D, radius: f32) -> bool {
    a.distance(b) <= radius
}

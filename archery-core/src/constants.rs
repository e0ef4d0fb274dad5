// Default gameplay tuning for a 640x480 selfie-view camera feed.

// Frame
pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 480;

// Calibration
pub const CALIBRATION_FRAMES: u32 = 50;
// Used until a calibration run succeeds. Half of it is the pinch cutoff.
pub const DEFAULT_THRESHOLD_PX: f32 = 60.0;

// Projectile
pub const ARROW_SPEED_PX: f32 = 50.0; // px per processed frame
pub const ARROW_REST_X: f32 = 50.0;
pub const ARROW_REST_Y: f32 = 50.0;
pub const ARROW_DEFAULT_DIRECTION: (f32, f32) = (-1.0, 0.0); // leftward
pub const ARROW_VISUAL_LENGTH_PX: f32 = 75.0;
pub const ARROWHEAD_LENGTH_PX: f32 = 10.0;
pub const ARROWHEAD_SPREAD_RAD: f32 = core::f32::consts::FRAC_PI_6;

// Target
pub const TARGET_RADIUS_PX: u32 = 20;
pub const BOUNDARY_X_PX: u32 = 370;
pub const BOUNDARY_MARGIN_PX: u32 = 100;
pub const TARGET_MOVE_INTERVAL_MS: u64 = 7_000;

pub const DEFAULT_SEED: u32 = 0xA7C4_E7B0;

pub mod calibration;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod joints;
pub mod projectile;
pub mod recording;
pub mod render;
pub mod rng;
pub mod session;
pub mod target;

pub use calibration::{CalibrationEngine, CalibrationProfile};
pub use config::GameConfig;
pub use error::{CalibrationError, ConfigError, RecordingError, ReplayError};
pub use geometry::Point2D;
pub use gesture::{GestureState, GestureStateMachine, GestureTransition};
pub use joints::{HandJoints, Joint};
pub use projectile::{Advance, Projectile, ProjectileSimulator};
pub use recording::{replay, Recording, RecordedFrame, ReplayOutcome};
pub use render::RenderSnapshot;
pub use session::{
    Command, CommandOutcome, FrameInput, GameEvent, GameMode, GameSession, RunMode, SessionStats,
};
pub use target::{Target, TargetBounds, TargetScheduler};

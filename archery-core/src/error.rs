use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationError {
    InsufficientSamples { frames: u32 },
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientSamples { frames } => write!(
                f,
                "insufficient calibration samples: no hand detected in {frames} frames"
            ),
        }
    }
}

impl std::error::Error for CalibrationError {}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    ZeroFrameSize { width: u32, height: u32 },
    ZeroCalibrationFrames,
    NonPositive { field: &'static str, value: f32 },
    NonFinite { field: &'static str },
    EmptySpawnArea { min_x: u32, max_x: u32, min_y: u32, max_y: u32 },
    BoundaryOutsideFrame { boundary_x: u32, frame_width: u32 },
    SpawnAreaOutsideFrame { max_x: u32, radius: u32, frame_width: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroFrameSize { width, height } => {
                write!(f, "frame size must be non-zero: got {width}x{height}")
            }
            Self::ZeroCalibrationFrames => write!(f, "calibration_frames must be > 0"),
            Self::NonFinite { field } => write!(f, "{field} must be finite"),
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be a positive finite number: got {value}")
            }
            Self::EmptySpawnArea {
                min_x,
                max_x,
                min_y,
                max_y,
            } => write!(
                f,
                "target spawn area is empty: x=[{min_x}..={max_x}] y=[{min_y}..={max_y}]"
            ),
            Self::BoundaryOutsideFrame {
                boundary_x,
                frame_width,
            } => write!(
                f,
                "boundary_x_px {boundary_x} lies outside a {frame_width}px-wide frame"
            ),
            Self::SpawnAreaOutsideFrame {
                max_x,
                radius,
                frame_width,
            } => write!(
                f,
                "targets at x={max_x} with radius {radius} overflow a {frame_width}px-wide frame"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, PartialEq)]
pub enum RecordingError {
    ZeroFrameSize { width: u32, height: u32 },
    LandmarkCount { frame: usize, hand: usize, found: usize, expected: usize },
    NonFiniteLandmark { frame: usize, hand: usize, landmark: usize },
    TimeWentBackwards { frame: usize, previous_ms: u64, elapsed_ms: u64 },
}

impl fmt::Display for RecordingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroFrameSize { width, height } => {
                write!(f, "recording frame size must be non-zero: got {width}x{height}")
            }
            Self::LandmarkCount {
                frame,
                hand,
                found,
                expected,
            } => write!(
                f,
                "frame {frame} hand {hand}: expected {expected} landmarks, got {found}"
            ),
            Self::NonFiniteLandmark {
                frame,
                hand,
                landmark,
            } => write!(f, "frame {frame} hand {hand}: landmark {landmark} is not finite"),
            Self::TimeWentBackwards {
                frame,
                previous_ms,
                elapsed_ms,
            } => write!(
                f,
                "frame {frame}: elapsed_ms went backwards ({previous_ms} -> {elapsed_ms})"
            ),
        }
    }
}

impl std::error::Error for RecordingError {}

#[derive(Clone, Debug, PartialEq)]
pub enum ReplayError {
    Config(ConfigError),
    Recording(RecordingError),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid game config: {err}"),
            Self::Recording(err) => write!(f, "invalid recording: {err}"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<ConfigError> for ReplayError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<RecordingError> for ReplayError {
    fn from(err: RecordingError) -> Self {
        Self::Recording(err)
    }
}

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ARROWHEAD_LENGTH_PX, ARROW_REST_X, ARROW_REST_Y, ARROW_SPEED_PX, ARROW_VISUAL_LENGTH_PX,
    BOUNDARY_MARGIN_PX, BOUNDARY_X_PX, CALIBRATION_FRAMES, DEFAULT_SEED, DEFAULT_THRESHOLD_PX,
    FRAME_HEIGHT, FRAME_WIDTH, TARGET_MOVE_INTERVAL_MS, TARGET_RADIUS_PX,
};
use crate::error::ConfigError;
use crate::geometry::Point2D;
use crate::target::TargetBounds;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub frame_width: u32,
    pub frame_height: u32,
    pub calibration_frames: u32,
    pub default_threshold_px: f32,
    pub arrow_speed_px: f32,
    pub arrow_rest: Point2D,
    pub arrow_visual_length_px: f32,
    pub arrowhead_length_px: f32,
    pub target_radius_px: u32,
    pub boundary_x_px: u32,
    pub boundary_margin_px: u32,
    pub target_move_interval_ms: u64,
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            frame_width: FRAME_WIDTH,
            frame_height: FRAME_HEIGHT,
            calibration_frames: CALIBRATION_FRAMES,
            default_threshold_px: DEFAULT_THRESHOLD_PX,
            arrow_speed_px: ARROW_SPEED_PX,
            arrow_rest: Point2D::new(ARROW_REST_X, ARROW_REST_Y),
            arrow_visual_length_px: ARROW_VISUAL_LENGTH_PX,
            arrowhead_length_px: ARROWHEAD_LENGTH_PX,
            target_radius_px: TARGET_RADIUS_PX,
            boundary_x_px: BOUNDARY_X_PX,
            boundary_margin_px: BOUNDARY_MARGIN_PX,
            target_move_interval_ms: TARGET_MOVE_INTERVAL_MS,
            seed: DEFAULT_SEED,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ConfigError::ZeroFrameSize {
                width: self.frame_width,
                height: self.frame_height,
            });
        }
        if self.calibration_frames == 0 {
            return Err(ConfigError::ZeroCalibrationFrames);
        }

        for (field, value) in [
            ("default_threshold_px", self.default_threshold_px),
            ("arrow_speed_px", self.arrow_speed_px),
            ("arrow_visual_length_px", self.arrow_visual_length_px),
            ("arrowhead_length_px", self.arrowhead_length_px),
            ("target_radius_px", self.target_radius_px as f32),
            ("target_move_interval_ms", self.target_move_interval_ms as f32),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if !self.arrow_rest.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "arrow_rest",
            });
        }

        self.target_bounds().map(|_| ())
    }

    /// Spawn rectangle for target centers: left of the UI boundary (minus its
    /// margin) horizontally, full height minus the radius vertically. Every
    /// target drawn from it lies wholly inside the frame.
    pub fn target_bounds(&self) -> Result<TargetBounds, ConfigError> {
        if self.boundary_x_px > self.frame_width {
            return Err(ConfigError::BoundaryOutsideFrame {
                boundary_x: self.boundary_x_px,
                frame_width: self.frame_width,
            });
        }

        let radius = self.target_radius_px;
        let min_x = radius;
        let max_x = self.boundary_x_px.saturating_sub(self.boundary_margin_px);
        let min_y = radius;
        let max_y = self.frame_height.saturating_sub(radius);

        if max_x < min_x || max_y < min_y {
            return Err(ConfigError::EmptySpawnArea {
                min_x,
                max_x,
                min_y,
                max_y,
            });
        }

        if max_x.saturating_add(radius) > self.frame_width {
            return Err(ConfigError::SpawnAreaOutsideFrame {
                max_x,
                radius,
                frame_width: self.frame_width,
            });
        }

        Ok(TargetBounds {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    #[inline]
    pub fn target_move_interval(&self) -> Duration {
        Duration::from_millis(self.target_move_interval_ms)
    }

    #[inline]
    pub fn frame_size(&self) -> (f32, f32) {
        (self.frame_width as f32, self.frame_height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(
            config.target_bounds(),
            Ok(TargetBounds {
                min_x: 20,
                max_x: 270,
                min_y: 20,
                max_y: 460,
            })
        );
    }

    #[test]
    fn boundary_too_close_to_edge_empties_spawn_area() {
        let config = GameConfig {
            boundary_x_px: 110,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptySpawnArea { max_x: 10, .. })
        ));
    }

    #[test]
    fn boundary_past_the_right_edge_is_rejected() {
        let config = GameConfig {
            frame_width: 200,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::BoundaryOutsideFrame {
                boundary_x: 370,
                frame_width: 200,
            })
        );
    }

    #[test]
    fn spawn_area_must_keep_targets_inside_the_frame() {
        let config = GameConfig {
            frame_width: 300,
            boundary_x_px: 300,
            boundary_margin_px: 10,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SpawnAreaOutsideFrame {
                max_x: 290,
                radius: 20,
                frame_width: 300,
            })
        );

        let config = GameConfig {
            boundary_margin_px: 20,
            ..config
        };
        let bounds = config.target_bounds().expect("fits exactly");
        assert_eq!(bounds.max_x + config.target_radius_px, config.frame_width);
    }

    #[test]
    fn non_positive_speed_is_rejected() {
        let config = GameConfig {
            arrow_speed_px: 0.0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "arrow_speed_px",
                value: 0.0,
            })
        );
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "seed": 7, "arrow_speed_px": 30.0 }"#).expect("parse");
        assert_eq!(config.seed, 7);
        assert_eq!(config.arrow_speed_px, 30.0);
        assert_eq!(config.calibration_frames, CALIBRATION_FRAMES);
    }
}

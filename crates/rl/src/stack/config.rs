//! Task configuration
//!
//! Fixed at environment construction. Defaults reproduce the reference
//! Panda stacking setup.

use physics::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("num_blocks must be at least 1")]
    NoObjects,
    #[error("invalid reward type: {0} (expected \"sparse\" or \"dense\")")]
    InvalidRewardType(String),
    #[error("block_half_height must be positive and finite, got {0}")]
    InvalidHalfHeight(f32),
    #[error("invalid value for {field}: {value}")]
    InvalidThreshold { field: &'static str, value: f32 },
    #[error("sampling bounds enclose no area")]
    EmptySamplingBounds,
    #[error("object {index} has no joint or sensor named {name}")]
    MissingObject { index: usize, name: String },
    #[error("gripper joint not found: {0}")]
    MissingGripper(String),
    #[error("image observations enabled but no frame source was provided")]
    MissingFrameSource,
    #[error("frame source provided but image observations are disabled")]
    UnusedFrameSource,
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardType {
    /// 1.0 on the step a stacked block is released, 0.0 otherwise.
    #[default]
    Sparse,
    /// Weighted lift progress plus stacking bonus.
    Dense,
}

impl FromStr for RewardType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sparse" => Ok(Self::Sparse),
            "dense" => Ok(Self::Dense),
            other => Err(ConfigError::InvalidRewardType(other.to_owned())),
        }
    }
}

impl fmt::Display for RewardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sparse => "sparse",
            Self::Dense => "dense",
        })
    }
}

/// Configuration for a block-stacking episode
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Number of tracked blocks
    pub num_blocks: usize,
    pub reward_type: RewardType,
    /// Sample block positions uniformly at reset instead of using a fixed row
    pub random_block_position: bool,
    /// Emit camera images instead of the reference block position
    pub image_obs: bool,
    /// Half edge length of a block (meters)
    pub block_half_height: f32,
    /// `[[min_x, min_y], [max_x, max_y]]` used for placement at reset
    pub sampling_bounds: [[f32; 2]; 2],
    /// Distance the reference block may leave the sampling region before the episode ends
    pub bounds_margin: f32,
    /// Maximum planar offset between two stacked blocks
    pub xy_tolerance: f32,
    /// Minimum height of the upper block above the lower one
    pub min_z_separation: f32,
    /// Allowed deviation of the vertical gap from one block height
    pub z_tolerance: f32,
    /// Driver joint value above which the gripper counts as closed
    pub gripper_threshold: f32,
    pub gripper_joint: String,
    /// Step limit applied by [`crate::TimeLimit`]
    pub max_episode_steps: u32,
    pub seed: u64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            num_blocks: 3,
            reward_type: RewardType::Sparse,
            random_block_position: true,
            image_obs: false,
            block_half_height: 0.02,
            sampling_bounds: [[0.3, -0.15], [0.5, 0.15]],
            bounds_margin: 0.05,
            xy_tolerance: 0.03,
            min_z_separation: 0.03,
            z_tolerance: 0.05,
            gripper_threshold: 0.1,
            gripper_joint: physics::GRIPPER_JOINT.to_owned(),
            max_episode_steps: 100,
            seed: 0,
        }
    }
}

impl TaskConfig {
    /// Parse and validate a JSON configuration. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input or any validation error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_blocks == 0 {
            return Err(ConfigError::NoObjects);
        }
        if !(self.block_half_height.is_finite() && self.block_half_height > 0.0) {
            return Err(ConfigError::InvalidHalfHeight(self.block_half_height));
        }
        for (field, value) in [
            ("bounds_margin", self.bounds_margin),
            ("xy_tolerance", self.xy_tolerance),
            ("min_z_separation", self.min_z_separation),
            ("z_tolerance", self.z_tolerance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidThreshold { field, value });
            }
        }
        if !self.gripper_threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold {
                field: "gripper_threshold",
                value: self.gripper_threshold,
            });
        }
        if self.sampling_rect().is_empty() {
            return Err(ConfigError::EmptySamplingBounds);
        }
        Ok(())
    }

    /// Placement rectangle for randomized resets.
    #[must_use]
    pub fn sampling_rect(&self) -> Rect {
        let [min, max] = self.sampling_bounds;
        Rect::new(Vec2::new(min[0], min[1]), Vec2::new(max[0], max[1]))
    }

    /// Region the reference block must stay inside.
    #[must_use]
    pub fn truncation_rect(&self) -> Rect {
        self.sampling_rect().expanded(self.bounds_margin)
    }

    /// Joint name of object `index`.
    #[must_use]
    pub fn block_joint_name(index: usize) -> String {
        format!("block{}", index + 1)
    }

    /// Position sensor name of object `index`.
    #[must_use]
    pub fn block_sensor_name(index: usize) -> String {
        format!("block{}_pos", index + 1)
    }
}

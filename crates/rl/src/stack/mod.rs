//! Block-stacking task logic: given a physics snapshot each step, assemble the
//! observation, score stacking progress, and decide termination.

pub mod bounds;
pub mod config;
pub mod episode;
pub mod gripper;
pub mod observation;
pub mod reward;
pub mod state;
pub mod success;

use physics::PhysicsError;
use thiserror::Error;

pub use bounds::BoundsMonitor;
pub use config::{ConfigError, RewardType, TaskConfig};
pub use episode::{ObjectHandles, Phase, StackEnv};
pub use gripper::GripperTracker;
pub use observation::{FrameSource, Observation, ObservationSpace};
pub use reward::{RewardEvaluator, RewardOutcome};
pub use state::EpisodeState;
pub use success::{is_stacked, StackCriteria};

#[derive(Error, Debug)]
pub enum StackError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("physics error: {0}")]
    Physics(#[from] PhysicsError),
    #[error("step called before reset")]
    NotReset,
}

//! Sparse and dense stacking rewards.

use physics::{PhysicsState, Vec3};

use super::config::RewardType;
use super::gripper::GripperTracker;
use super::state::EpisodeState;
use super::success::{is_stacked, StackCriteria};

pub const LIFT_WEIGHT: f32 = 0.3;
pub const STACK_WEIGHT: f32 = 0.7;
/// Stack term on the step a stacked block is let go.
pub const RELEASED_STACK_BONUS: f32 = 2.0;
/// Stack term while the stack exists but the gripper is still closed.
pub const HELD_STACK_BONUS: f32 = 0.5;

/// Reward for one step together with the predicates it was derived from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RewardOutcome {
    pub reward: f32,
    pub released: bool,
    pub stacked: bool,
}

impl RewardOutcome {
    /// A stack exists and the gripper opened on this very step.
    #[must_use]
    pub const fn release_confirmed(&self) -> bool {
        self.released && self.stacked
    }
}

/// Largest normalized lift over all blocks, each clipped to `[0, 1]` where 1
/// means raised by one full block height.
#[must_use]
pub fn lift_term(positions: &[Vec3], initial_heights: &[f32], half_height: f32) -> f32 {
    positions
        .iter()
        .zip(initial_heights)
        .map(|(p, z0)| ((p.z - z0) / (2.0 * half_height)).clamp(0.0, 1.0))
        .fold(0.0, f32::max)
}

/// Unclipped stacking term of the dense reward.
#[must_use]
pub const fn stack_term(released: bool, stacked: bool) -> f32 {
    match (released, stacked) {
        (true, true) => RELEASED_STACK_BONUS,
        (false, true) => HELD_STACK_BONUS,
        _ => 0.0,
    }
}

#[must_use]
pub const fn sparse_reward(released: bool, stacked: bool) -> f32 {
    if released && stacked {
        1.0
    } else {
        0.0
    }
}

/// Dense reward can exceed 1.0: the stack term is weighted, not clipped.
#[must_use]
pub fn dense_reward(lift: f32, released: bool, stacked: bool) -> f32 {
    LIFT_WEIGHT * lift + STACK_WEIGHT * stack_term(released, stacked)
}

pub struct RewardEvaluator {
    mode: RewardType,
    criteria: StackCriteria,
    gripper: GripperTracker,
}

impl RewardEvaluator {
    #[must_use]
    pub const fn new(mode: RewardType, criteria: StackCriteria, gripper: GripperTracker) -> Self {
        Self { mode, criteria, gripper }
    }

    #[must_use]
    pub const fn mode(&self) -> RewardType {
        self.mode
    }

    #[must_use]
    pub const fn criteria(&self) -> &StackCriteria {
        &self.criteria
    }

    /// Scores the current snapshot. Samples the gripper exactly once,
    /// independent of mode and of whether a stack exists.
    pub fn evaluate<S: PhysicsState + ?Sized>(
        &self,
        state: &S,
        positions: &[Vec3],
        episode: &mut EpisodeState,
    ) -> RewardOutcome {
        let released = self.gripper.just_released(state, episode);
        let stacked = is_stacked(positions, &self.criteria);
        let reward = match self.mode {
            RewardType::Sparse => sparse_reward(released, stacked),
            RewardType::Dense => {
                let lift = lift_term(positions, &episode.initial_heights, self.criteria.half_height);
                dense_reward(lift, released, stacked)
            }
        };
        RewardOutcome { reward, released, stacked }
    }
}

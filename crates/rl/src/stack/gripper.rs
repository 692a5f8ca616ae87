//! Binary gripper state and release-edge detection.

use physics::{JointHandle, PhysicsState};

use super::state::EpisodeState;

/// Records `current` as the latest gripper state and reports whether the
/// gripper went from closed to open since the previous sample.
///
/// The first sample of an episode (`prev == None`) never reports a release.
pub fn observe_release(prev: &mut Option<bool>, current: bool) -> bool {
    let released = *prev == Some(true) && !current;
    *prev = Some(current);
    released
}

/// Reads the gripper from a single driver joint. Both fingers are mechanically
/// coupled, so one side is enough.
#[derive(Copy, Clone, Debug)]
pub struct GripperTracker {
    joint: JointHandle,
    threshold: f32,
}

impl GripperTracker {
    #[must_use]
    pub const fn new(joint: JointHandle, threshold: f32) -> Self {
        Self { joint, threshold }
    }

    #[must_use]
    pub fn is_closed<S: PhysicsState + ?Sized>(&self, state: &S) -> bool {
        state.joint_scalar(self.joint) > self.threshold
    }

    /// Samples the gripper and advances `episode.prev_gripper_closed`.
    /// Must be called exactly once per step.
    pub fn just_released<S: PhysicsState + ?Sized>(&self, state: &S, episode: &mut EpisodeState) -> bool {
        observe_release(&mut episode.prev_gripper_closed, self.is_closed(state))
    }
}

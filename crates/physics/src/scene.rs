//! # Simulation Boundary
//!
//! Traits through which task logic reads and drives a physics backend. A
//! backend exposes named joints and position sensors; callers resolve names to
//! handles once and index with the handles afterwards.

use crate::error::PhysicsError;
use crate::types::Vec3;

/// Index of a named joint inside a backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct JointHandle(usize);

impl JointHandle {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Index of a named position sensor inside a backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SensorHandle(usize);

impl SensorHandle {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Read/write access to the rigid-body state of a simulation.
pub trait PhysicsState {
    /// Resolve a joint name. Returns `None` when the model has no such joint.
    fn joint(&self, name: &str) -> Option<JointHandle>;

    /// Resolve a position sensor name.
    fn sensor(&self, name: &str) -> Option<SensorHandle>;

    /// Translational part of a free joint (first three generalized coordinates).
    fn joint_position(&self, joint: JointHandle) -> Vec3;

    /// Overwrite the translational part of a free joint.
    fn set_joint_position(&mut self, joint: JointHandle, pos: Vec3);

    /// First generalized coordinate of a joint, e.g. a gripper driver angle.
    fn joint_scalar(&self, joint: JointHandle) -> f32;

    /// Current reading of a 3-D position sensor. May be offset or noisy with
    /// respect to the joint it observes.
    fn sensor_reading(&self, sensor: SensorHandle) -> Vec3;

    /// Restore the canonical model state.
    fn reset(&mut self);

    /// Recompute derived quantities (sensors, kinematics) after positions were
    /// written directly.
    fn forward(&mut self) {}
}

/// Proprioceptive access to the controlled robot.
pub trait Robot {
    /// Length of the vector returned by [`Robot::robot_state`]. Constant for
    /// the lifetime of the backend.
    fn state_dim(&self) -> usize;

    /// Joint/end-effector state vector.
    fn robot_state(&self) -> Vec<f32>;

    /// Move the robot back to its home configuration.
    fn reset_robot(&mut self);

    /// Apply one control action and advance the simulation by one control step.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::ActionDimMismatch`] or
    /// [`PhysicsError::NonFinite`] for malformed actions.
    fn apply_action(&mut self, action: &[f32]) -> Result<(), PhysicsError>;
}

/// A backend that both simulates the scene and drives the robot.
pub trait Backend: PhysicsState + Robot {}

impl<T: PhysicsState + Robot> Backend for T {}

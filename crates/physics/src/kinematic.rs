//! Kinematic block-stacking scene
//!
//! An in-memory backend with free blocks resting on a table, a point
//! end-effector, and a parallel gripper driven by a single joint. It carries no
//! dynamics: a grasped block follows the end-effector exactly and a released
//! block drops onto the highest surface beneath it.

use crate::error::PhysicsError;
use crate::scene::{JointHandle, PhysicsState, Robot, SensorHandle};
use crate::types::{BoundingBox, Vec3};

/// Name of the gripper driver joint.
pub const GRIPPER_JOINT: &str = "left_driver_joint";

/// Dimension of the action vector: end-effector delta `[dx, dy, dz]` and grasp command.
pub const ACTION_DIM: usize = 4;

/// Configuration for a [`KinematicScene`]
#[derive(Clone, Debug)]
pub struct KinematicConfig {
    /// Number of blocks named `block1..=blockN`
    pub num_blocks: usize,
    /// Half edge length of each cubic block (meters)
    pub block_half_height: f32,
    /// End-effector position after [`Robot::reset_robot`]
    pub home: Vec3,
    /// Region the end-effector is clamped to
    pub workspace: BoundingBox,
    /// End-effector displacement for a unit action component (meters)
    pub action_scale: f32,
    /// Duration of one control step (seconds)
    pub control_dt: f32,
    /// Driver joint value with fingers fully closed
    pub closed_qpos: f32,
    /// Grasp command above which the gripper closes
    pub grasp_threshold: f32,
    /// Maximum distance between end-effector and block centre for a grasp
    pub grasp_radius: f32,
}

impl Default for KinematicConfig {
    fn default() -> Self {
        Self {
            num_blocks: 3,
            block_half_height: 0.02,
            home: Vec3::new(0.4, 0.0, 0.3),
            workspace: BoundingBox {
                min: Vec3::new(0.2, -0.3, 0.0),
                max: Vec3::new(0.6, 0.3, 0.5),
            },
            action_scale: 0.025,
            control_dt: 0.1,
            closed_qpos: 0.8,
            grasp_threshold: 0.5,
            grasp_radius: 0.03,
        }
    }
}

#[derive(Clone, Debug)]
struct Block {
    name: String,
    sensor_name: String,
    pos: Vec3,
    sensor_offset: Vec3,
}

/// In-memory backend implementing [`PhysicsState`] and [`Robot`].
pub struct KinematicScene {
    pub config: KinematicConfig,
    blocks: Vec<Block>,
    ee: Vec3,
    ee_vel: Vec3,
    gripper: f32,
    held: Option<usize>,
}

impl KinematicScene {
    /// Create a scene with `config.num_blocks` blocks in their canonical poses
    /// and the robot at home.
    #[must_use]
    pub fn new(config: KinematicConfig) -> Self {
        let blocks = (0..config.num_blocks)
            .map(|i| {
                let name = format!("block{}", i + 1);
                Block {
                    sensor_name: format!("{name}_pos"),
                    name,
                    pos: Vec3::ZERO,
                    sensor_offset: Vec3::ZERO,
                }
            })
            .collect();
        let mut scene = Self {
            ee: config.home,
            config,
            blocks,
            ee_vel: Vec3::ZERO,
            gripper: 0.0,
            held: None,
        };
        PhysicsState::reset(&mut scene);
        scene
    }

    /// Constant bias added to a block's position sensor, emulating a sensor
    /// frame that is not at the block centre.
    pub fn set_sensor_offset(&mut self, sensor: SensorHandle, offset: Vec3) {
        self.blocks[sensor.index()].sensor_offset = offset;
    }

    /// Current end-effector position.
    #[must_use]
    pub fn end_effector(&self) -> Vec3 {
        self.ee
    }

    /// Teleport the end-effector without carrying physics side effects other
    /// than dragging a held block along.
    pub fn set_end_effector(&mut self, pos: Vec3) {
        self.ee = self.config.workspace.clamp(pos);
        if let Some(i) = self.held {
            self.blocks[i].pos = self.ee;
        }
    }

    /// Index of the block currently in the gripper.
    #[must_use]
    pub fn held_block(&self) -> Option<usize> {
        self.held
    }

    fn gripper_handle(&self) -> JointHandle {
        JointHandle::new(self.blocks.len())
    }

    fn is_closed(&self) -> bool {
        self.gripper > self.config.closed_qpos * 0.5
    }

    fn nearest_graspable(&self) -> Option<usize> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let d = b.pos - self.ee;
                (i, (d.x * d.x + d.y * d.y + d.z * d.z).sqrt())
            })
            .filter(|&(_, dist)| dist <= self.config.grasp_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Drop block `i` onto the table or onto the highest block whose footprint
    /// overlaps its own.
    fn settle(&mut self, i: usize) {
        let h = self.config.block_half_height;
        let p = self.blocks[i].pos;
        let support = self
            .blocks
            .iter()
            .enumerate()
            .filter(|&(j, b)| {
                j != i
                    && b.pos.z < p.z
                    && (b.pos.x - p.x).abs() < 2.0 * h
                    && (b.pos.y - p.y).abs() < 2.0 * h
            })
            .map(|(_, b)| b.pos.z + 2.0 * h)
            .fold(h, f32::max);
        self.blocks[i].pos.z = support;
    }

    fn set_gripper(&mut self, qpos: f32) {
        let was_closed = self.is_closed();
        self.gripper = qpos;
        let closed = self.is_closed();
        if !was_closed && closed {
            self.held = self.nearest_graspable();
            if let Some(i) = self.held {
                tracing::debug!("grasped {}", self.blocks[i].name);
            }
        } else if was_closed && !closed {
            if let Some(i) = self.held.take() {
                self.settle(i);
                tracing::debug!("released {} at {:?}", self.blocks[i].name, self.blocks[i].pos);
            }
        }
    }
}

impl Default for KinematicScene {
    fn default() -> Self {
        Self::new(KinematicConfig::default())
    }
}

impl PhysicsState for KinematicScene {
    fn joint(&self, name: &str) -> Option<JointHandle> {
        if name == GRIPPER_JOINT {
            return Some(self.gripper_handle());
        }
        self.blocks.iter().position(|b| b.name == name).map(JointHandle::new)
    }

    fn sensor(&self, name: &str) -> Option<SensorHandle> {
        self.blocks
            .iter()
            .position(|b| b.sensor_name == name)
            .map(SensorHandle::new)
    }

    fn joint_position(&self, joint: JointHandle) -> Vec3 {
        match self.blocks.get(joint.index()) {
            Some(b) => b.pos,
            None => Vec3::new(self.gripper, 0.0, 0.0),
        }
    }

    fn set_joint_position(&mut self, joint: JointHandle, pos: Vec3) {
        if joint == self.gripper_handle() {
            self.set_gripper(pos.x);
        } else {
            if self.held == Some(joint.index()) {
                self.held = None;
            }
            self.blocks[joint.index()].pos = pos;
        }
    }

    fn joint_scalar(&self, joint: JointHandle) -> f32 {
        self.joint_position(joint).x
    }

    fn sensor_reading(&self, sensor: SensorHandle) -> Vec3 {
        let b = &self.blocks[sensor.index()];
        b.pos + b.sensor_offset
    }

    fn reset(&mut self) {
        let h = self.config.block_half_height;
        let n = self.blocks.len();
        for (i, b) in self.blocks.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let y = (i as f32 - (n as f32 - 1.0) / 2.0) * 0.1;
            b.pos = Vec3::new(0.4, y, h);
        }
        self.held = None;
        self.gripper = 0.0;
        self.ee = self.config.home;
        self.ee_vel = Vec3::ZERO;
    }
}

impl Robot for KinematicScene {
    fn state_dim(&self) -> usize {
        7
    }

    /// `[ee_x, ee_y, ee_z, vel_x, vel_y, vel_z, gripper]`
    fn robot_state(&self) -> Vec<f32> {
        let mut state = Vec::with_capacity(self.state_dim());
        state.extend_from_slice(&self.ee.to_array());
        state.extend_from_slice(&self.ee_vel.to_array());
        state.push(self.gripper);
        state
    }

    fn reset_robot(&mut self) {
        self.set_gripper(0.0);
        self.ee = self.config.home;
        self.ee_vel = Vec3::ZERO;
    }

    fn apply_action(&mut self, action: &[f32]) -> Result<(), PhysicsError> {
        if action.len() != ACTION_DIM {
            return Err(PhysicsError::ActionDimMismatch { expected: ACTION_DIM, got: action.len() });
        }
        if action.iter().any(|a| !a.is_finite()) {
            return Err(PhysicsError::NonFinite("action"));
        }

        let delta = Vec3::new(
            action[0].clamp(-1.0, 1.0),
            action[1].clamp(-1.0, 1.0),
            action[2].clamp(-1.0, 1.0),
        ) * self.config.action_scale;
        let prev = self.ee;
        self.set_end_effector(prev + delta);
        self.ee_vel = (self.ee - prev) * (1.0 / self.config.control_dt);

        let target = if action[3] > self.config.grasp_threshold {
            self.config.closed_qpos
        } else {
            0.0
        };
        self.set_gripper(target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_to_distinct_handles() {
        let scene = KinematicScene::default();
        let b1 = scene.joint("block1").unwrap();
        let b3 = scene.joint("block3").unwrap();
        assert_ne!(b1, b3);
        assert!(scene.joint("block4").is_none());
        assert!(scene.sensor("block2_pos").is_some());
        assert!(scene.sensor("block2").is_none());
        assert!(scene.joint(GRIPPER_JOINT).is_some());
    }

    #[test]
    fn sensor_reading_includes_offset() {
        let mut scene = KinematicScene::default();
        let joint = scene.joint("block1").unwrap();
        let sensor = scene.sensor("block1_pos").unwrap();
        scene.set_sensor_offset(sensor, Vec3::new(0.0, 0.0, 0.001));
        let q = scene.joint_position(joint);
        let s = scene.sensor_reading(sensor);
        assert!((s.z - q.z - 0.001).abs() < 1e-6);
    }

    #[test]
    fn released_block_settles_on_support() {
        let mut scene = KinematicScene::default();
        let lower = scene.joint("block1").unwrap();
        let upper = scene.joint("block2").unwrap();
        scene.set_joint_position(lower, Vec3::new(0.5, 0.0, 0.02));
        scene.set_joint_position(upper, Vec3::new(0.3, 0.2, 0.02));

        scene.set_end_effector(Vec3::new(0.3, 0.2, 0.02));
        scene.apply_action(&[0.0, 0.0, 0.0, 1.0]).unwrap();
        assert_eq!(scene.held_block(), Some(upper.index()));

        scene.set_end_effector(Vec3::new(0.5, 0.0, 0.1));
        scene.apply_action(&[0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(scene.held_block(), None);
        let p = scene.joint_position(upper);
        assert!((p.z - 0.06).abs() < 1e-6, "z={}", p.z);
    }

    #[test]
    fn end_effector_is_clamped_to_workspace() {
        let mut scene = KinematicScene::default();
        for _ in 0..100 {
            scene.apply_action(&[1.0, 0.0, 1.0, 0.0]).unwrap();
        }
        let ee = scene.end_effector();
        assert!((ee.x - 0.6).abs() < 1e-6);
        assert!((ee.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn malformed_actions_are_rejected() {
        let mut scene = KinematicScene::default();
        assert_eq!(
            scene.apply_action(&[0.0; 3]),
            Err(PhysicsError::ActionDimMismatch { expected: 4, got: 3 })
        );
        assert_eq!(
            scene.apply_action(&[f32::NAN, 0.0, 0.0, 0.0]),
            Err(PhysicsError::NonFinite("action"))
        );
    }
}

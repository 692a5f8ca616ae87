//! # Block Stacking Environment
//!
//! [`StackEnv`] owns the backend, the resolved object handles and the
//! per-episode state, and wires the gripper tracker, stacking predicate,
//! reward evaluator, bounds monitor and observation assembler into the
//! `reset`/`step` contract of [`Env`].
//!
//! Object `i` is the joint `block{i+1}` observed by the sensor
//! `block{i+1}_pos`; object 0 is the reference block used for the bounds
//! check and the state observation. Names are resolved once in the
//! constructor and a missing object aborts construction.

use physics::{Backend, JointHandle, SensorHandle, Vec3};
use tracing::{debug, trace};

use super::bounds::BoundsMonitor;
use super::config::{ConfigError, RewardType, TaskConfig};
use super::gripper::GripperTracker;
use super::observation::{FrameSource, Observation, ObservationAssembler, ObservationSpace};
use super::reward::{RewardEvaluator, RewardOutcome};
use super::state::EpisodeState;
use super::success::StackCriteria;
use super::StackError;
use crate::env::{Env, Info, Step};

/// Planar position of object 0 for non-randomized resets.
pub const FIXED_ORIGIN: [f32; 2] = [0.5, -0.1];
/// Spacing along +y between consecutive objects for non-randomized resets.
pub const FIXED_SPACING: f32 = 0.1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ObjectHandles {
    pub joint: JointHandle,
    pub sensor: SensorHandle,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, `reset` not yet called.
    Uninitialized,
    /// Episode in progress.
    Ready,
    /// Last step reported `terminated`.
    Terminated,
}

pub struct StackEnv<B> {
    backend: B,
    config: TaskConfig,
    objects: Box<[ObjectHandles]>,
    reward: RewardEvaluator,
    bounds: BoundsMonitor,
    observer: ObservationAssembler,
    rng: fastrand::Rng,
    episode: Option<EpisodeState>,
    phase: Phase,
}

impl<B: Backend> StackEnv<B> {
    /// Build a state-observation environment.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration, a configuration requesting image
    /// observations, or a backend lacking any named object.
    pub fn new(backend: B, config: TaskConfig) -> Result<Self, StackError> {
        Self::build(backend, config, None)
    }

    /// Build an image-observation environment rendering through `frames`.
    ///
    /// # Errors
    ///
    /// Same as [`StackEnv::new`], except that `config.image_obs` must be set:
    /// a frame source the configuration would never use is rejected.
    pub fn with_frame_source(
        backend: B,
        config: TaskConfig,
        frames: Box<dyn FrameSource>,
    ) -> Result<Self, StackError> {
        Self::build(backend, config, Some(frames))
    }

    fn build(backend: B, config: TaskConfig, frames: Option<Box<dyn FrameSource>>) -> Result<Self, StackError> {
        config.validate()?;

        let objects = (0..config.num_blocks)
            .map(|index| -> Result<ObjectHandles, ConfigError> {
                let joint_name = TaskConfig::block_joint_name(index);
                let sensor_name = TaskConfig::block_sensor_name(index);
                let joint = backend
                    .joint(&joint_name)
                    .ok_or(ConfigError::MissingObject { index, name: joint_name })?;
                let sensor = backend
                    .sensor(&sensor_name)
                    .ok_or(ConfigError::MissingObject { index, name: sensor_name })?;
                Ok(ObjectHandles { joint, sensor })
            })
            .collect::<Result<Box<[_]>, ConfigError>>()?;
        let reference = objects[0].sensor;

        let gripper_joint = backend
            .joint(&config.gripper_joint)
            .ok_or_else(|| ConfigError::MissingGripper(config.gripper_joint.clone()))?;
        let criteria = StackCriteria {
            half_height: config.block_half_height,
            xy_tolerance: config.xy_tolerance,
            min_z_separation: config.min_z_separation,
            z_tolerance: config.z_tolerance,
        };
        let reward = RewardEvaluator::new(
            config.reward_type,
            criteria,
            GripperTracker::new(gripper_joint, config.gripper_threshold),
        );
        let bounds = BoundsMonitor::new(reference, config.sampling_rect(), config.bounds_margin);

        let agent_dim = backend.state_dim();
        let observer = match (config.image_obs, frames) {
            (false, None) => ObservationAssembler::state(reference, agent_dim),
            (false, Some(_)) => return Err(ConfigError::UnusedFrameSource.into()),
            (true, Some(frames)) => ObservationAssembler::pixels(reference, agent_dim, frames),
            (true, None) => return Err(ConfigError::MissingFrameSource.into()),
        };

        debug!(
            "stack env: {} blocks, {} reward, random placement {}",
            config.num_blocks, config.reward_type, config.random_block_position
        );

        Ok(Self {
            rng: fastrand::Rng::with_seed(config.seed),
            backend,
            config,
            objects,
            reward,
            bounds,
            observer,
            episode: None,
            phase: Phase::Uninitialized,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Direct access to the simulation, e.g. for scripted perturbations.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[must_use]
    pub fn objects(&self) -> &[ObjectHandles] {
        &self.objects
    }

    #[must_use]
    pub fn episode(&self) -> Option<&EpisodeState> {
        self.episode.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn observation_space(&self) -> ObservationSpace {
        self.observer.space()
    }

    /// Sensor positions of all objects, in object order.
    #[must_use]
    pub fn positions(&self) -> Vec<Vec3> {
        self.objects.iter().map(|o| self.backend.sensor_reading(o.sensor)).collect()
    }

    fn placement(&mut self, index: usize) -> Vec3 {
        let h = self.config.block_half_height;
        if self.config.random_block_position {
            let rect = self.config.sampling_rect();
            let x = rect.min.x + self.rng.f32() * (rect.max.x - rect.min.x);
            let y = rect.min.y + self.rng.f32() * (rect.max.y - rect.min.y);
            Vec3::new(x, y, h)
        } else {
            #[allow(clippy::cast_precision_loss)]
            let y = FIXED_ORIGIN[1] + index as f32 * FIXED_SPACING;
            Vec3::new(FIXED_ORIGIN[0], y, h)
        }
    }

    fn place_objects(&mut self) {
        for index in 0..self.objects.len() {
            let pos = self.placement(index);
            let joint = self.objects[index].joint;
            self.backend.set_joint_position(joint, pos);
        }
        self.backend.forward();
    }
}

impl<B: Backend> Env for StackEnv<B> {
    type Obs = Observation;
    type Action = [f32];
    type Error = StackError;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, Info), StackError> {
        if let Some(seed) = seed {
            self.rng.seed(seed);
        }
        self.backend.reset();
        self.backend.reset_robot();
        self.place_objects();

        let initial_heights: Vec<f32> = self.positions().iter().map(|p| p.z).collect();
        debug!("reset: initial heights {initial_heights:?}");
        self.episode = Some(EpisodeState::new(initial_heights));
        self.phase = Phase::Ready;

        Ok((self.observer.assemble(&self.backend), Info::default()))
    }

    fn step(&mut self, action: &[f32]) -> Result<Step<Observation>, StackError> {
        let Some(episode) = self.episode.as_mut() else {
            return Err(StackError::NotReset);
        };
        self.backend.apply_action(action)?;

        let observation = self.observer.assemble(&self.backend);
        let positions: Vec<Vec3> =
            self.objects.iter().map(|o| self.backend.sensor_reading(o.sensor)).collect();
        let RewardOutcome { reward, released, stacked } =
            self.reward.evaluate(&self.backend, &positions, episode);

        let succeeded = match self.reward.mode() {
            RewardType::Sparse => released && stacked,
            RewardType::Dense => stacked,
        };
        let exceeded_bounds = self.bounds.exceeded(&self.backend);
        let terminated = succeeded || exceeded_bounds;
        trace!("step: reward {reward:.4}, stacked {stacked}, released {released}");
        if terminated {
            debug!("episode terminated: success {succeeded}, out of bounds {exceeded_bounds}");
            self.phase = Phase::Terminated;
        }

        Ok(Step {
            observation,
            reward,
            terminated,
            truncated: false,
            info: Info::step(stacked),
        })
    }
}

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Stacking Task Environments
//!
//! Gym-style environments on top of the [`physics`] boundary. The [`env`]
//! module defines the [`Env`] contract and the [`TimeLimit`] wrapper; the
//! [`stack`] module implements the block-stacking task.
//!
//! ```rust
//! use physics::{KinematicConfig, KinematicScene};
//! use rl::stack::{StackEnv, TaskConfig};
//! use rl::Env;
//!
//! let scene = KinematicScene::new(KinematicConfig::default());
//! let mut env = StackEnv::new(scene, TaskConfig::default()).unwrap();
//! let (obs, _info) = env.reset(Some(1)).unwrap();
//! assert_eq!(obs.agent_pos().len(), 7);
//! let step = env.step(&[0.0, 0.0, -1.0, 0.0]).unwrap();
//! assert!(!step.truncated);
//! ```

pub mod env;
pub mod stack;

pub use env::{Env, Info, Step, TimeLimit};

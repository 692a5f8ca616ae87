#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Physics Boundary
//!
//! The physics layer consumed by the stacking task. Task logic never
//! simulates anything itself: it reads named joints and position sensors and
//! forwards actions through the traits in [`scene`].
//!
//! ## Key Components
//!
//! -   **Value types:** [`Vec3`], [`Vec2`], [`Rect`] and [`BoundingBox`] in
//!     the [`types`] module.
//! -   **Backend traits:** [`PhysicsState`] exposes joints and sensors by
//!     name, [`Robot`] exposes proprioception and action application.
//! -   **Kinematic backend:** [`KinematicScene`] is a dynamics-free block
//!     world used for tests, benchmarks and scripted demos.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{KinematicScene, PhysicsState};
//!
//! let scene = KinematicScene::default();
//! let sensor = scene.sensor("block1_pos").unwrap();
//! assert!(scene.sensor_reading(sensor).z > 0.0);
//! ```

pub mod error;
pub mod kinematic;
pub mod scene;
pub mod types;

pub use error::PhysicsError;
pub use kinematic::{KinematicConfig, KinematicScene, ACTION_DIM, GRIPPER_JOINT};
pub use scene::{Backend, JointHandle, PhysicsState, Robot, SensorHandle};
pub use types::{BoundingBox, Rect, Vec2, Vec3};

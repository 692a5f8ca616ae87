//! # Stackbench
//!
//! Entry point for running block-stacking episodes outside of a learning
//! loop. The binary drives [`rl::stack::StackEnv`] on top of the
//! [`physics::KinematicScene`] backend with the waypoint controller in
//! [`script`], printing one JSON record per step.
//!
//! ## The Crates
//!
//! -   **[`physics`]:** value types, backend traits and the kinematic block
//!     world.
//! -   **[`rl`]:** the `Env` contract, the `TimeLimit` wrapper and the
//!     stacking task itself.

pub mod script;

pub use physics;
pub use rl;

//! Waypoint controller that picks object 1 and places it on object 0.
//!
//! The controller reads privileged block positions from the environment, so
//! it is a demo and test driver rather than a policy.

use physics::Vec3;

/// Extra clearance above the target stacking height when releasing.
const DROP_CLEARANCE: f32 = 0.005;
/// Travel height for moves between blocks.
const TRAVEL_HEIGHT: f32 = 0.15;
/// Distance at which a waypoint counts as reached.
const REACHED: f32 = 1e-4;

#[derive(Copy, Clone, Debug, PartialEq)]
struct Waypoint {
    target: Vec3,
    closed: bool,
}

pub struct PickAndPlace {
    waypoints: Vec<Waypoint>,
    current: usize,
    action_scale: f32,
}

impl PickAndPlace {
    /// Plan a pick of the block at `pick` and a place onto the block at
    /// `place`. `action_scale` is the end-effector displacement of a unit
    /// action component.
    #[must_use]
    pub fn new(pick: Vec3, place: Vec3, half_height: f32, action_scale: f32) -> Self {
        let above = |p: Vec3, z: f32| Vec3::new(p.x, p.y, z);
        let release = place.z + 2.0 * half_height + DROP_CLEARANCE;
        let waypoints = vec![
            Waypoint { target: above(pick, TRAVEL_HEIGHT), closed: false },
            Waypoint { target: pick, closed: false },
            Waypoint { target: pick, closed: true },
            Waypoint { target: above(pick, TRAVEL_HEIGHT), closed: true },
            Waypoint { target: above(place, TRAVEL_HEIGHT), closed: true },
            Waypoint { target: above(place, release), closed: true },
            Waypoint { target: above(place, release), closed: false },
            Waypoint { target: above(place, TRAVEL_HEIGHT), closed: false },
        ];
        Self { waypoints, current: 0, action_scale }
    }

    /// A controller that never moves, for scenes without two blocks.
    #[must_use]
    pub fn idle(action_scale: f32) -> Self {
        Self { waypoints: Vec::new(), current: 0, action_scale }
    }

    #[must_use]
    pub fn finished(&self) -> bool {
        self.current >= self.waypoints.len()
    }

    /// Action `[dx, dy, dz, grasp]` for end-effector position `ee`.
    pub fn act(&mut self, ee: Vec3) -> [f32; 4] {
        while let Some(wp) = self.waypoints.get(self.current) {
            let err = wp.target - ee;
            let reached = err.x.abs().max(err.y.abs()).max(err.z.abs()) < REACHED;
            // grasp/release waypoints share the previous target, so they hold for one step
            let gripper_change = self.current > 0 && self.waypoints[self.current - 1].closed != wp.closed;
            if reached && !gripper_change {
                self.current += 1;
                continue;
            }
            if gripper_change {
                self.current += 1;
            }
            let d = err * (1.0 / self.action_scale);
            let grasp = if wp.closed { 1.0 } else { 0.0 };
            return [d.x.clamp(-1.0, 1.0), d.y.clamp(-1.0, 1.0), d.z.clamp(-1.0, 1.0), grasp];
        }
        [0.0, 0.0, 0.0, 0.0]
    }
}

//! Workspace-bounds truncation for the reference block.

use physics::{PhysicsState, Rect, SensorHandle, Vec3};

/// True when `pos` lies outside `limits` on either planar axis.
/// Non-finite positions count as outside.
#[must_use]
pub fn exceeded(pos: Vec3, limits: &Rect) -> bool {
    !limits.contains(pos.xy())
}

/// Watches the planar position of the reference block.
#[derive(Copy, Clone, Debug)]
pub struct BoundsMonitor {
    sensor: SensorHandle,
    limits: Rect,
}

impl BoundsMonitor {
    /// `sampling` grown by `margin` becomes the allowed region.
    #[must_use]
    pub fn new(sensor: SensorHandle, sampling: Rect, margin: f32) -> Self {
        Self { sensor, limits: sampling.expanded(margin) }
    }

    #[must_use]
    pub fn exceeded<S: PhysicsState + ?Sized>(&self, state: &S) -> bool {
        exceeded(state.sensor_reading(self.sensor), &self.limits)
    }
}

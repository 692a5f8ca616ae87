//! Geometric stacking predicate.

use physics::Vec3;

/// Tolerances for accepting one block as resting on another.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StackCriteria {
    pub half_height: f32,
    pub xy_tolerance: f32,
    pub min_z_separation: f32,
    pub z_tolerance: f32,
}

impl StackCriteria {
    /// Whether `upper` sits on `lower`: nearly aligned in the plane, above it,
    /// and one block height higher within tolerance.
    #[must_use]
    pub fn pair_is_stacked(&self, upper: Vec3, lower: Vec3) -> bool {
        let xy_dist = upper.planar_distance(lower);
        let z_diff = upper.z - lower.z;
        xy_dist < self.xy_tolerance
            && z_diff > self.min_z_separation
            && (z_diff - 2.0 * self.half_height).abs() < self.z_tolerance
    }
}

/// True if any ordered pair of distinct blocks forms a stack. Only adjacent
/// pairs are checked; a full tower is not required.
#[must_use]
pub fn is_stacked(positions: &[Vec3], criteria: &StackCriteria) -> bool {
    positions.iter().enumerate().any(|(i, &upper)| {
        positions
            .iter()
            .enumerate()
            .any(|(j, &lower)| i != j && criteria.pair_is_stacked(upper, lower))
    })
}

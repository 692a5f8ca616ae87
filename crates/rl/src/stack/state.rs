/// Mutable per-episode bookkeeping, replaced on every reset.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeState {
    /// Height of each block right after placement, indexed like the blocks.
    pub initial_heights: Vec<f32>,
    /// Gripper state seen on the previous evaluation. `None` until the first
    /// step of the episode has been evaluated.
    pub prev_gripper_closed: Option<bool>,
}

impl EpisodeState {
    #[must_use]
    pub fn new(initial_heights: Vec<f32>) -> Self {
        Self { initial_heights, prev_gripper_closed: None }
    }
}

//! Observation assembly for the two supported layouts.

use image::RgbImage;
use physics::{Backend, SensorHandle};

/// External renderer producing the front and wrist camera views.
pub trait FrameSource {
    /// `(width, height)` of every frame this source returns.
    fn frame_size(&self) -> (u32, u32);

    /// Render `(front, wrist)` for the current simulation state.
    fn render(&mut self) -> (RgbImage, RgbImage);
}

/// One observation. Both layouts carry the robot's proprioceptive vector.
#[derive(Clone, Debug, PartialEq)]
pub enum Observation {
    /// Robot state plus the reference block's position. Other blocks are not
    /// observed directly.
    State {
        agent_pos: Vec<f32>,
        environment_state: [f32; 3],
    },
    Pixels {
        front: RgbImage,
        wrist: RgbImage,
        agent_pos: Vec<f32>,
    },
}

impl Observation {
    #[must_use]
    pub fn agent_pos(&self) -> &[f32] {
        match self {
            Self::State { agent_pos, .. } | Self::Pixels { agent_pos, .. } => agent_pos,
        }
    }

    #[must_use]
    pub fn environment_state(&self) -> Option<[f32; 3]> {
        match self {
            Self::State { environment_state, .. } => Some(*environment_state),
            Self::Pixels { .. } => None,
        }
    }
}

/// Shapes of the active observation layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObservationSpace {
    State { agent_dim: usize, environment_dim: usize },
    Pixels { agent_dim: usize, height: u32, width: u32, channels: u32 },
}

enum Layout {
    State,
    Pixels(Box<dyn FrameSource>),
}

pub struct ObservationAssembler {
    layout: Layout,
    reference: SensorHandle,
    agent_dim: usize,
}

impl ObservationAssembler {
    /// State layout observing the block behind `reference`.
    #[must_use]
    pub fn state(reference: SensorHandle, agent_dim: usize) -> Self {
        Self { layout: Layout::State, reference, agent_dim }
    }

    /// Pixel layout rendering through `frames`.
    #[must_use]
    pub fn pixels(reference: SensorHandle, agent_dim: usize, frames: Box<dyn FrameSource>) -> Self {
        Self { layout: Layout::Pixels(frames), reference, agent_dim }
    }

    #[must_use]
    pub fn space(&self) -> ObservationSpace {
        match &self.layout {
            Layout::State => ObservationSpace::State { agent_dim: self.agent_dim, environment_dim: 3 },
            Layout::Pixels(frames) => {
                let (width, height) = frames.frame_size();
                ObservationSpace::Pixels { agent_dim: self.agent_dim, height, width, channels: 3 }
            }
        }
    }

    pub fn assemble<B: Backend + ?Sized>(&mut self, backend: &B) -> Observation {
        let agent_pos = backend.robot_state();
        debug_assert_eq!(agent_pos.len(), self.agent_dim);
        match &mut self.layout {
            Layout::State => Observation::State {
                agent_pos,
                environment_state: backend.sensor_reading(self.reference).to_array(),
            },
            Layout::Pixels(frames) => {
                let (front, wrist) = frames.render();
                Observation::Pixels { front, wrist, agent_pos }
            }
        }
    }
}

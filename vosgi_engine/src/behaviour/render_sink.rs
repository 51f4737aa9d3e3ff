/// Draw-time plumbing: where behaviours send what they want rendered.
///
/// The scene core does not talk to a GPU. `draw` hooks push mesh and light
/// submissions into a `RenderSink` provided by the host, together with the
/// frame's frustum and statistics counters.

use glam::Mat4;
use crate::camera::Frustum;
use crate::scene::EntityKey;
use super::light::GpuLight;
use super::model_renderer::{Material, MeshId};

/// Per-frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Renderers whose bounds passed the frustum test
    pub visible: u32,
    /// Meshes submitted
    pub drawn: u32,
    /// Enabled entities visited by the traversal
    pub total: u32,
}

impl FrameStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One mesh to render this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshSubmission {
    pub entity: EntityKey,
    pub mesh: MeshId,
    pub world_matrix: Mat4,
    pub material: Material,
    pub wireframe: bool,
}

/// Receives draw submissions from behaviours
pub trait RenderSink {
    fn submit_mesh(&mut self, submission: MeshSubmission);

    fn submit_light(&mut self, light: GpuLight);
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NoOpSink;

impl RenderSink for NoOpSink {
    fn submit_mesh(&mut self, _submission: MeshSubmission) {}

    fn submit_light(&mut self, _light: GpuLight) {}
}

/// Keeps every submission, in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub meshes: Vec<MeshSubmission>,
    pub lights: Vec<GpuLight>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.meshes.clear();
        self.lights.clear();
    }
}

impl RenderSink for RecordingSink {
    fn submit_mesh(&mut self, submission: MeshSubmission) {
        self.meshes.push(submission);
    }

    fn submit_light(&mut self, light: GpuLight) {
        self.lights.push(light);
    }
}

/// Everything a `draw` hook receives besides its own transform
pub struct DrawContext<'a> {
    pub frustum: &'a Frustum,
    pub sink: &'a mut dyn RenderSink,
    pub stats: &'a mut FrameStats,
}

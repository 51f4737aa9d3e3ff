/// ModelRenderer: submits a model's meshes when its bounds are in view.
///
/// The local bounding volume is fitted once, from every mesh's vertex
/// positions, when the renderer is built. Each frame the volume is refitted
/// with the owner's world matrix and tested against the frustum. A visible
/// model counts once in `FrameStats::visible` and once per mesh in
/// `FrameStats::drawn`.

use glam::Vec3;
use crate::bounds::{Aabb, BoundingVolume, Sphere};
use crate::camera::Frustum;
use crate::engine_warn;
use crate::transform::Transform;
use super::behaviour::{Behaviour, BehaviourContext};
use super::render_sink::{DrawContext, MeshSubmission};

/// Host-side mesh identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// CPU-side mesh description: an id for the renderer plus the vertex
/// positions used to fit bounds
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub id: MeshId,
    pub positions: Vec<Vec3>,
}

impl MeshData {
    pub fn new(id: MeshId, positions: Vec<Vec3>) -> Self {
        Self { id, positions }
    }
}

/// Specular surface parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub specular_intensity: f32,
    pub shininess: f32,
}

impl Material {
    pub fn new(specular_intensity: f32, shininess: f32) -> Self {
        Self { specular_intensity, shininess }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(1.0, 32.0)
    }
}

#[derive(Debug, Clone)]
pub struct ModelRenderer {
    meshes: Vec<MeshData>,
    material: Material,
    bounds: BoundingVolume,
    wireframe: bool,
}

impl ModelRenderer {
    /// Renderer with an AABB fitted around all meshes
    pub fn new(meshes: Vec<MeshData>) -> Self {
        let bounds = Aabb::from_points(meshes.iter().flat_map(|mesh| mesh.positions.iter()));
        Self {
            meshes,
            material: Material::default(),
            bounds: BoundingVolume::Aabb(bounds),
            wireframe: false,
        }
    }

    /// Replace the fitted AABB with a bounding sphere around the same vertices
    pub fn with_sphere_bounds(mut self) -> Self {
        let sphere = Sphere::from_points(self.meshes.iter().flat_map(|mesh| mesh.positions.iter()));
        self.bounds = BoundingVolume::Sphere(sphere);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn meshes(&self) -> &[MeshData] {
        &self.meshes
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    /// Local-space bounds
    pub fn bounds(&self) -> &BoundingVolume {
        &self.bounds
    }

    pub fn is_wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.wireframe = wireframe;
    }

    /// Bounds refitted with the transform's current world matrix
    pub fn world_aabb(&self, transform: &Transform) -> Aabb {
        self.bounds.world_aabb(transform.world_matrix())
    }

    pub fn is_visible(&self, frustum: &Frustum, transform: &Transform) -> bool {
        self.bounds.is_on_frustum(frustum, transform)
    }
}

impl Behaviour for ModelRenderer {
    fn initialize(&mut self, ctx: &mut BehaviourContext<'_>) {
        if self.meshes.is_empty() {
            engine_warn!("vosgi::ModelRenderer", "Renderer attached to {:?} has no meshes", ctx.entity);
        }
    }

    fn draw(&mut self, ctx: &mut BehaviourContext<'_>, draw: &mut DrawContext<'_>) {
        if !self.is_visible(draw.frustum, ctx.transform) {
            return;
        }

        draw.stats.visible += 1;
        for mesh in &self.meshes {
            draw.sink.submit_mesh(MeshSubmission {
                entity: ctx.entity,
                mesh: mesh.id,
                world_matrix: *ctx.transform.world_matrix(),
                material: self.material,
                wireframe: self.wireframe,
            });
            draw.stats.drawn += 1;
        }
    }
}

#[cfg(test)]
#[path = "model_renderer_tests.rs"]
mod tests;

/// Light: directional, point and spot lights as one behaviour.
///
/// All three kinds share colour and intensities; point and spot add
/// distance attenuation and spot adds a cone edge. Each frame the light is
/// packed into a `GpuLight` from its transform and pushed to the sink.
/// Directional lights shine along the transform's world forward, point
/// lights sit at its world position, spot lights use both.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use crate::transform::Transform;
use super::behaviour::{Behaviour, BehaviourContext};
use super::render_sink::DrawContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    Directional,
    Point,
    Spot,
}

impl LightKind {
    /// Value written to `GpuLight::kind`
    pub fn gpu_id(self) -> u32 {
        match self {
            LightKind::Directional => 0,
            LightKind::Point => 1,
            LightKind::Spot => 2,
        }
    }
}

/// Distance falloff: 1 / (constant + linear * d + quadratic * d^2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    /// No falloff
    fn default() -> Self {
        Self { constant: 1.0, linear: 0.0, quadratic: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub ambient_intensity: f32,
    pub diffuse_intensity: f32,
    /// Ignored for directional lights
    pub attenuation: Attenuation,
    /// Cone half angle in degrees, spot lights only
    pub edge_degrees: f32,
}

impl Light {
    pub fn directional(color: Vec3, ambient_intensity: f32, diffuse_intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            color,
            ambient_intensity,
            diffuse_intensity,
            attenuation: Attenuation::default(),
            edge_degrees: 0.0,
        }
    }

    pub fn point(color: Vec3, ambient_intensity: f32, diffuse_intensity: f32, attenuation: Attenuation) -> Self {
        Self {
            kind: LightKind::Point,
            attenuation,
            ..Self::directional(color, ambient_intensity, diffuse_intensity)
        }
    }

    pub fn spot(
        color: Vec3,
        ambient_intensity: f32,
        diffuse_intensity: f32,
        attenuation: Attenuation,
        edge_degrees: f32,
    ) -> Self {
        Self {
            kind: LightKind::Spot,
            attenuation,
            edge_degrees,
            ..Self::directional(color, ambient_intensity, diffuse_intensity)
        }
    }

    /// Pack for upload, using the owner's current world matrix
    pub fn to_gpu(&self, transform: &Transform) -> GpuLight {
        let (position, direction, edge_cos) = match self.kind {
            LightKind::Directional => (Vec3::ZERO, transform.world_forward(), 0.0),
            LightKind::Point => (transform.world_position(), Vec3::ZERO, 0.0),
            LightKind::Spot => (
                transform.world_position(),
                transform.world_forward(),
                self.edge_degrees.to_radians().cos(),
            ),
        };

        GpuLight {
            position: position.to_array(),
            kind: self.kind.gpu_id(),
            color: self.color.to_array(),
            ambient_intensity: self.ambient_intensity,
            direction: direction.to_array(),
            diffuse_intensity: self.diffuse_intensity,
            constant: self.attenuation.constant,
            linear: self.attenuation.linear,
            quadratic: self.attenuation.quadratic,
            edge_cos,
        }
    }
}

impl Default for Light {
    /// White directional light
    fn default() -> Self {
        Self::directional(Vec3::ONE, 0.1, 1.0)
    }
}

impl Behaviour for Light {
    fn draw(&mut self, ctx: &mut BehaviourContext<'_>, draw: &mut DrawContext<'_>) {
        draw.sink.submit_light(self.to_gpu(ctx.transform));
    }
}

/// Light data laid out for a uniform/storage buffer (64 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    pub position: [f32; 3],
    pub kind: u32,
    pub color: [f32; 3],
    pub ambient_intensity: f32,
    pub direction: [f32; 3],
    pub diffuse_intensity: f32,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    /// Cosine of the spot cone edge
    pub edge_cos: f32,
}

#[cfg(test)]
#[path = "light_tests.rs"]
mod tests;

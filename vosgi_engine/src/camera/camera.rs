/// Camera: a free-standing fly camera outside the scene graph.
///
/// Owns a root `Transform`, a `Lens` and a `FlyController`. The world matrix
/// is recomputed after every control call, so the view matrix and frustum
/// are always current. The frustum is rebuilt on each call to `frustum()`,
/// never cached.
///
/// Cameras that live inside the scene graph use the `CameraController`
/// behaviour instead.

use glam::{Mat4, Vec3};
use crate::config::{Config, ControllerConfig, CullingConfig};
use crate::transform::Transform;
use super::fly_controller::{FlyController, Movement};
use super::frustum::{Frustum, FrustumPlane};
use super::lens::Lens;

#[derive(Debug, Clone)]
pub struct Camera {
    transform: Transform,
    lens: Lens,
    controller: FlyController,
    plane_order: [FrustumPlane; 6],
}

impl Camera {
    /// Camera at `position` looking down -Z
    pub fn new(position: Vec3, lens: Lens, controller: ControllerConfig) -> Self {
        let controller = FlyController::new(controller);
        let mut transform = Transform::from_position(position);
        transform.set_local_rotation(controller.orientation());
        transform.compute_world_matrix();
        Self { transform, lens, controller, plane_order: FrustumPlane::DEFAULT_ORDER }
    }

    /// Camera at `position` using every section of `config`
    pub fn from_config(position: Vec3, config: &Config) -> Self {
        Self::new(position, config.lens, config.controller).with_culling(&config.culling)
    }

    /// Test frustum planes in the configured order
    pub fn with_culling(mut self, culling: &CullingConfig) -> Self {
        self.plane_order = culling.plane_order;
        self
    }

    // ===== GETTERS =====

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn lens(&self) -> &Lens {
        &self.lens
    }

    pub fn lens_mut(&mut self) -> &mut Lens {
        &mut self.lens
    }

    pub fn controller(&self) -> &FlyController {
        &self.controller
    }

    pub fn position(&self) -> Vec3 {
        self.transform.world_position()
    }

    pub fn forward(&self) -> Vec3 {
        self.transform.world_forward()
    }

    pub fn right(&self) -> Vec3 {
        self.transform.world_right()
    }

    pub fn up(&self) -> Vec3 {
        self.transform.world_up()
    }

    /// Look-at view matrix from the current position and basis
    pub fn view_matrix(&self) -> Mat4 {
        let position = self.position();
        Mat4::look_at_rh(position, position + self.forward(), self.up())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.lens.projection_matrix()
    }

    /// Combined view-projection matrix (projection * view)
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Frustum for the current pose and lens
    pub fn frustum(&self) -> Frustum {
        Frustum::from_camera(self.position(), self.forward(), self.right(), self.up(), &self.lens)
            .with_plane_order(self.plane_order)
    }

    // ===== CONTROL =====

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.set_local_position(position);
        self.transform.compute_world_matrix();
    }

    pub fn key_control(&mut self, movement: Movement, delta_time: f32) {
        self.controller.apply_movement(&mut self.transform, movement, delta_time);
        self.transform.compute_world_matrix();
    }

    pub fn mouse_control(&mut self, x_delta: f32, y_delta: f32) {
        self.controller.apply_mouse(&mut self.transform, x_delta, y_delta);
        self.transform.compute_world_matrix();
    }

    pub fn scroll_control(&mut self, y_offset: f32) {
        self.controller.apply_scroll(&mut self.lens, y_offset);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Lens::default(), ControllerConfig::default())
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;

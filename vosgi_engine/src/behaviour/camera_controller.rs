/// CameraController: a fly camera living on a scene entity.
///
/// Input is queued by the host between frames and consumed in `update`.
/// The frustum and matrices are derived from the owner's world matrix, so
/// a camera parented to a moving entity follows it.
///
/// On attach the look angles are taken from the entity's current rotation.
/// Roll is not representable by a fly camera and is dropped.

use glam::{Mat4, Vec2, Vec3};
use crate::camera::{FlyController, Frustum, FrustumPlane, Lens, Movement};
use crate::config::{Config, ControllerConfig, CullingConfig};
use crate::transform::Transform;
use super::behaviour::{Behaviour, BehaviourContext};

/// Input gathered since the last update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    pub movement: Movement,
    /// Mouse delta in pixels (x right, y up)
    pub mouse_delta: Vec2,
    pub scroll: f32,
}

#[derive(Debug, Clone)]
pub struct CameraController {
    lens: Lens,
    controller: FlyController,
    plane_order: [FrustumPlane; 6],
    pending: CameraInput,
}

impl CameraController {
    pub fn new(lens: Lens, config: ControllerConfig) -> Self {
        Self {
            lens,
            controller: FlyController::new(config),
            plane_order: FrustumPlane::DEFAULT_ORDER,
            pending: CameraInput::default(),
        }
    }

    /// Controller built from the lens, controller and culling sections
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.lens, config.controller).with_culling(&config.culling)
    }

    /// Test frustum planes in the configured order
    pub fn with_culling(mut self, culling: &CullingConfig) -> Self {
        self.plane_order = culling.plane_order;
        self
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

    /// Accumulate input for the next update
    pub fn queue_input(&mut self, input: CameraInput) {
        self.pending.movement |= input.movement;
        self.pending.mouse_delta += input.mouse_delta;
        self.pending.scroll += input.scroll;
    }

    pub fn pending_input(&self) -> &CameraInput {
        &self.pending
    }

    pub fn frustum(&self, transform: &Transform) -> Frustum {
        Frustum::from_camera(
            transform.world_position(),
            transform.world_forward(),
            transform.world_right(),
            transform.world_up(),
            &self.lens,
        )
        .with_plane_order(self.plane_order)
    }

    pub fn view_matrix(&self, transform: &Transform) -> Mat4 {
        let position = transform.world_position();
        Mat4::look_at_rh(position, position + transform.world_forward(), transform.world_up())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.lens.projection_matrix()
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(Lens::default(), ControllerConfig::default())
    }
}

impl Behaviour for CameraController {
    fn initialize(&mut self, ctx: &mut BehaviourContext<'_>) {
        self.controller.look_along(ctx.transform.local_rotation() * Vec3::NEG_Z);
        ctx.transform.set_local_rotation(self.controller.orientation());
    }

    fn update(&mut self, ctx: &mut BehaviourContext<'_>, delta_time: f32) {
        let input = std::mem::take(&mut self.pending);

        self.controller.apply_movement(ctx.transform, input.movement, delta_time);
        if input.mouse_delta != Vec2::ZERO {
            self.controller.apply_mouse(ctx.transform, input.mouse_delta.x, input.mouse_delta.y);
        }
        if input.scroll != 0.0 {
            self.controller.apply_scroll(&mut self.lens, input.scroll);
        }
    }
}

#[cfg(test)]
#[path = "camera_controller_tests.rs"]
mod tests;

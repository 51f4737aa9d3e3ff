/// Fly-through camera control: yaw/pitch mouse-look, keyboard movement
/// and scroll zoom.
///
/// The controller owns the look angles and writes the resulting orientation
/// and position into a `Transform`. It never reads input devices itself;
/// the host translates key presses into `Movement` flags.

use bitflags::bitflags;
use glam::{Mat3, Quat, Vec3};
use crate::config::ControllerConfig;
use crate::transform::Transform;
use super::lens::Lens;

bitflags! {
    /// Movement directions held during a frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Movement: u32 {
        const FORWARD  = 1 << 0;
        const BACKWARD = 1 << 1;
        const LEFT     = 1 << 2;
        const RIGHT    = 1 << 3;
        const UP       = 1 << 4;
        const DOWN     = 1 << 5;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyController {
    /// Degrees around world up; -90 looks down -Z
    yaw: f32,
    /// Degrees above the horizon, clamped to +/- pitch_limit
    pitch: f32,
    world_up: Vec3,
    config: ControllerConfig,
}

impl FlyController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            yaw: -90.0,
            pitch: 0.0,
            world_up: Vec3::Y,
            config,
        }
    }

    pub fn with_angles(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-self.config.pitch_limit, self.config.pitch_limit);
        self
    }

    /// Take yaw and pitch from a look direction. Roll cannot be expressed
    /// and is lost; a vertical direction keeps the current yaw.
    pub fn look_along(&mut self, direction: Vec3) {
        let front = direction.normalize_or_zero();
        if front == Vec3::ZERO {
            return;
        }
        if front.x.abs() > f32::EPSILON || front.z.abs() > f32::EPSILON {
            self.yaw = front.z.atan2(front.x).to_degrees();
        }
        let pitch = front.y.clamp(-1.0, 1.0).asin().to_degrees();
        self.pitch = pitch.clamp(-self.config.pitch_limit, self.config.pitch_limit);
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Unit look direction from yaw and pitch
    pub fn front(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    /// Rotation whose -Z axis is `front()` and whose X axis stays horizontal
    pub fn orientation(&self) -> Quat {
        let front = self.front();
        let right = front.cross(self.world_up).normalize();
        let up = right.cross(front).normalize();
        Quat::from_mat3(&Mat3::from_cols(right, up, -front)).normalize()
    }

    /// Move the transform along its own axes (world up for UP/DOWN)
    pub fn apply_movement(&self, transform: &mut Transform, movement: Movement, delta_time: f32) {
        if movement.is_empty() {
            return;
        }

        let velocity = self.config.movement_speed * delta_time;
        let mut delta = Vec3::ZERO;
        if movement.contains(Movement::FORWARD) {
            delta += transform.forward();
        }
        if movement.contains(Movement::BACKWARD) {
            delta -= transform.forward();
        }
        if movement.contains(Movement::RIGHT) {
            delta += transform.right();
        }
        if movement.contains(Movement::LEFT) {
            delta -= transform.right();
        }
        if movement.contains(Movement::UP) {
            delta += self.world_up;
        }
        if movement.contains(Movement::DOWN) {
            delta -= self.world_up;
        }

        transform.translate(delta * velocity);
    }

    /// Turn by a mouse delta in pixels and write the new orientation
    pub fn apply_mouse(&mut self, transform: &mut Transform, x_delta: f32, y_delta: f32) {
        self.yaw += x_delta * self.config.turn_speed;
        self.pitch = (self.pitch + y_delta * self.config.turn_speed)
            .clamp(-self.config.pitch_limit, self.config.pitch_limit);
        transform.set_local_rotation(self.orientation());
    }

    /// Zoom by narrowing the field of view
    pub fn apply_scroll(&self, lens: &mut Lens, y_offset: f32) {
        lens.fov_degrees = (lens.fov_degrees - y_offset).clamp(self.config.min_fov, self.config.max_fov);
    }
}

impl Default for FlyController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

#[cfg(test)]
#[path = "fly_controller_tests.rs"]
mod tests;

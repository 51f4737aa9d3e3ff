/// Spins its entity at a constant rate.

use glam::{Quat, Vec3};
use super::behaviour::{Behaviour, BehaviourContext};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotator {
    /// Degrees per second
    pub speed: f32,
    /// Local rotation axis (normalized on use)
    pub axis: Vec3,
}

impl Rotator {
    pub fn new(speed: f32, axis: Vec3) -> Self {
        Self { speed, axis }
    }
}

impl Default for Rotator {
    /// 90 degrees per second around +Y
    fn default() -> Self {
        Self::new(90.0, Vec3::Y)
    }
}

impl Behaviour for Rotator {
    fn update(&mut self, ctx: &mut BehaviourContext<'_>, delta_time: f32) {
        let Some(axis) = self.axis.try_normalize() else {
            return;
        };
        let angle = (self.speed * delta_time).to_radians();
        ctx.transform.rotate(Quat::from_axis_angle(axis, angle));
    }
}

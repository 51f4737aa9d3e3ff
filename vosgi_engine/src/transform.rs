/// Transform: local TRS state plus a cached world matrix.
///
/// The world matrix is valid whenever `is_dirty()` is false. Every local
/// mutator sets the dirty flag; the scene traversal recomputes the matrix
/// from the parent's world matrix and clears it.
///
/// The local matrix is composed as Translate * Rotate * Scale. Rotation is a
/// normalized quaternion. Degenerate scale (zero on an axis) is accepted and
/// produces a degenerate matrix.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    world: Mat4,
    dirty: bool,
}

impl Transform {
    /// Identity transform, dirty until first computed
    pub fn new() -> Self {
        Self::from_trs(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
    }

    /// Transform with just a local position
    pub fn from_position(position: Vec3) -> Self {
        Self::from_trs(position, Quat::IDENTITY, Vec3::ONE)
    }

    /// Transform from local translation, rotation and scale
    pub fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation: rotation.normalize(),
            scale,
            world: Mat4::IDENTITY,
            dirty: true,
        }
    }

    // ===== LOCAL STATE =====

    pub fn local_position(&self) -> Vec3 {
        self.position
    }

    pub fn set_local_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    pub fn local_rotation(&self) -> Quat {
        self.rotation
    }

    pub fn set_local_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
        self.dirty = true;
    }

    /// Local rotation as Euler angles in degrees (applied Y, then X, then Z)
    pub fn local_euler_degrees(&self) -> Vec3 {
        let (y, x, z) = self.rotation.to_euler(EulerRot::YXZ);
        Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
    }

    /// Set the local rotation from Euler angles in degrees (applied Y, then X, then Z)
    pub fn set_local_euler_degrees(&mut self, degrees: Vec3) {
        self.set_local_rotation(Quat::from_euler(
            EulerRot::YXZ,
            degrees.y.to_radians(),
            degrees.x.to_radians(),
            degrees.z.to_radians(),
        ));
    }

    pub fn local_scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_local_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }

    /// Move by `delta` in parent space
    pub fn translate(&mut self, delta: Vec3) {
        self.set_local_position(self.position + delta);
    }

    /// Compose `rotation` after the current local rotation
    pub fn rotate(&mut self, rotation: Quat) {
        self.set_local_rotation(self.rotation * rotation);
    }

    /// Local matrix (T * R * S)
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    // ===== DIRTY FLAG =====

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the world matrix stale
    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    /// Recompute the world matrix of a root transform
    pub fn compute_world_matrix(&mut self) {
        self.world = self.local_matrix();
        self.dirty = false;
    }

    /// Recompute the world matrix from the parent's world matrix
    pub fn compute_world_matrix_with_parent(&mut self, parent_world: &Mat4) {
        self.world = *parent_world * self.local_matrix();
        self.dirty = false;
    }

    // ===== WORLD STATE =====

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    pub fn world_position(&self) -> Vec3 {
        self.world.col(3).truncate()
    }

    /// Length of each world basis column
    pub fn world_scale(&self) -> Vec3 {
        Vec3::new(
            self.world.col(0).truncate().length(),
            self.world.col(1).truncate().length(),
            self.world.col(2).truncate().length(),
        )
    }

    pub fn world_rotation(&self) -> Quat {
        self.world.to_scale_rotation_translation().1
    }

    /// Upper 3x3 of the world matrix (scaled basis vectors as columns)
    pub fn world_basis(&self) -> Mat3 {
        Mat3::from_mat4(self.world)
    }

    /// Normalized world-space forward (-Z column); zero if degenerate
    pub fn world_forward(&self) -> Vec3 {
        (-self.world.col(2).truncate()).normalize_or_zero()
    }

    /// Normalized world-space right (+X column); zero if degenerate
    pub fn world_right(&self) -> Vec3 {
        self.world.col(0).truncate().normalize_or_zero()
    }

    /// Normalized world-space up (+Y column); zero if degenerate
    pub fn world_up(&self) -> Vec3 {
        self.world.col(1).truncate().normalize_or_zero()
    }

    // ===== LOCAL BASIS =====

    /// Local forward (-Z rotated by the local rotation)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn back(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn left(&self) -> Vec3 {
        self.rotation * Vec3::NEG_X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn down(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Y
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;

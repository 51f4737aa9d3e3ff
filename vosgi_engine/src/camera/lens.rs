/// Perspective lens parameters.

use glam::Mat4;

/// Vertical field of view, aspect ratio and clip distances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Width / height
    pub aspect_ratio: f32,
    /// Near clip distance (> 0)
    pub near: f32,
    /// Far clip distance (> near)
    pub far: f32,
}

impl Lens {
    pub fn new(fov_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self { fov_degrees, aspect_ratio, near, far }
    }

    /// Update the aspect ratio from a viewport size. Ignored if height is zero.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// Right-handed perspective projection with [-1, 1] clip depth
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_degrees.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }
}

impl Default for Lens {
    /// 45 degrees, 800x600, near 0.1, far 100
    fn default() -> Self {
        Self::new(45.0, 800.0 / 600.0, 0.1, 100.0)
    }
}

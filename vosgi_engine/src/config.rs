/// Engine configuration: lens defaults, camera control tuning and culling order.
///
/// All values are plain data with defaults. `validate()` checks the
/// combinations that would otherwise produce NaN matrices or inverted
/// frustums.

use crate::camera::{FrustumPlane, Lens};
use crate::error::Result;
use crate::engine_bail;

/// Tuning for `FlyController`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    /// World units per second
    pub movement_speed: f32,
    /// Degrees per pixel of mouse movement
    pub turn_speed: f32,
    /// Lower bound for scroll zoom (degrees)
    pub min_fov: f32,
    /// Upper bound for scroll zoom (degrees)
    pub max_fov: f32,
    /// Pitch is clamped to +/- this many degrees
    pub pitch_limit: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            movement_speed: 5.0,
            turn_speed: 0.1,
            min_fov: 1.0,
            max_fov: 120.0,
            pitch_limit: 89.0,
        }
    }
}

/// Frustum culling options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CullingConfig {
    /// Order in which bounding volumes test the six planes
    pub plane_order: [FrustumPlane; 6],
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self { plane_order: FrustumPlane::DEFAULT_ORDER }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Config {
    pub lens: Lens,
    pub controller: ControllerConfig,
    pub culling: CullingConfig,
}

impl Config {
    /// Reject values that cannot produce a usable projection or controller
    pub fn validate(&self) -> Result<()> {
        let lens = &self.lens;
        let values = [lens.fov_degrees, lens.aspect_ratio, lens.near, lens.far];
        if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            engine_bail!("vosgi::Config", "Lens values must be finite and positive: {:?}", lens);
        }
        if lens.fov_degrees >= 180.0 {
            engine_bail!("vosgi::Config", "Field of view must be below 180 degrees, got {}", lens.fov_degrees);
        }
        if lens.near >= lens.far {
            engine_bail!("vosgi::Config", "Near plane ({}) must be closer than far plane ({})", lens.near, lens.far);
        }

        let controller = &self.controller;
        if controller.min_fov <= 0.0 || controller.min_fov > controller.max_fov || controller.max_fov >= 180.0 {
            engine_bail!(
                "vosgi::Config",
                "Zoom range must satisfy 0 < min_fov <= max_fov < 180, got {}..{}",
                controller.min_fov,
                controller.max_fov
            );
        }
        if !(controller.pitch_limit > 0.0 && controller.pitch_limit < 90.0) {
            engine_bail!("vosgi::Config", "Pitch limit must be in (0, 90), got {}", controller.pitch_limit);
        }

        let order = &self.culling.plane_order;
        let unique = FrustumPlane::DEFAULT_ORDER.iter().all(|plane| order.contains(plane));
        if !unique {
            engine_bail!("vosgi::Config", "Plane order must name each plane once: {:?}", order);
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

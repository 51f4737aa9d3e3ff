/// Frustum: six clipping planes for visibility culling.
///
/// Each plane stores a unit normal pointing INTO the visible volume and the
/// distance `d = dot(normal, point_on_plane)`. A point P is on the visible
/// side when `dot(normal, P) - d >= 0`.
///
/// Two constructors are provided:
/// - `from_camera()` builds the planes from a camera basis and lens
///   (position, front/right/up, fov, aspect, near, far)
/// - `from_view_projection()` extracts them from a combined matrix
///
/// Bounding volumes test planes in the frustum's test order and reject on
/// the first plane they fall behind.

use glam::{Mat4, Vec3, Vec4};
use super::lens::Lens;

/// Oriented plane with a unit normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal, pointing toward the accepted half-space
    pub normal: Vec3,
    /// dot(normal, any point on the plane)
    pub distance: f32,
}

impl Plane {
    /// Plane through `point` with the given (not necessarily unit) normal.
    ///
    /// A zero normal yields a degenerate plane that accepts everything
    /// at or in front of the origin.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    /// Plane from (A, B, C, D) coefficients where Ax + By + Cz + D = 0
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = coefficients.truncate();
        let length = normal.length();
        if length > 0.0 {
            Self {
                normal: normal / length,
                distance: -coefficients.w / length,
            }
        } else {
            Self {
                normal: Vec3::ZERO,
                distance: -coefficients.w,
            }
        }
    }

    /// Signed distance from the plane; positive on the normal side
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }
}

impl Default for Plane {
    /// Plane through the origin facing +Y
    fn default() -> Self {
        Self { normal: Vec3::Y, distance: 0.0 }
    }
}

/// Identifies one of the six frustum planes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrustumPlane {
    Near,
    Far,
    Left,
    Right,
    Top,
    Bottom,
}

impl FrustumPlane {
    /// Default test order used by bounding volumes
    pub const DEFAULT_ORDER: [FrustumPlane; 6] = [
        FrustumPlane::Near,
        FrustumPlane::Far,
        FrustumPlane::Left,
        FrustumPlane::Right,
        FrustumPlane::Top,
        FrustumPlane::Bottom,
    ];

    fn index(self) -> usize {
        match self {
            FrustumPlane::Near => 0,
            FrustumPlane::Far => 1,
            FrustumPlane::Left => 2,
            FrustumPlane::Right => 3,
            FrustumPlane::Top => 4,
            FrustumPlane::Bottom => 5,
        }
    }
}

/// Six inward-facing planes and the order in which to test them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Planes indexed near, far, left, right, top, bottom
    planes: [Plane; 6],
    order: [FrustumPlane; 6],
}

impl Frustum {
    /// Frustum from explicit planes
    pub fn new(near: Plane, far: Plane, left: Plane, right: Plane, top: Plane, bottom: Plane) -> Self {
        Self {
            planes: [near, far, left, right, top, bottom],
            order: FrustumPlane::DEFAULT_ORDER,
        }
    }

    /// Build the frustum of a perspective camera.
    ///
    /// `forward`, `right` and `up` must be an orthonormal basis. The side
    /// planes all pass through `position` and the edges of the far rectangle,
    /// whose half extents are `far * tan(fov / 2)` vertically and that value
    /// times the aspect ratio horizontally.
    pub fn from_camera(position: Vec3, forward: Vec3, right: Vec3, up: Vec3, lens: &Lens) -> Self {
        let half_v = lens.far * (lens.fov_degrees.to_radians() * 0.5).tan();
        let half_h = half_v * lens.aspect_ratio;
        let far_center = forward * lens.far;

        let near = Plane::from_point_normal(position + forward * lens.near, forward);
        let far = Plane::from_point_normal(position + far_center, -forward);

        // Each side plane contains one far edge; the cross order makes the normal face inward
        let left = Plane::from_point_normal(position, (far_center - right * half_h).cross(up));
        let right_plane = Plane::from_point_normal(position, up.cross(far_center + right * half_h));
        let top = Plane::from_point_normal(position, (far_center + up * half_v).cross(right));
        let bottom = Plane::from_point_normal(position, right.cross(far_center - up * half_v));

        Self::new(near, far, left, right_plane, top, bottom)
    }

    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method and assumes a clip-space depth range
    /// of [-1, 1] (for example `Mat4::perspective_rh_gl`). With a [0, 1]
    /// depth projection the near plane ends up conservative.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let m = vp.to_cols_array_2d();

        let row = |i: usize| Vec4::new(m[0][i], m[1][i], m[2][i], m[3][i]);
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        Self::new(
            Plane::from_coefficients(r3 + r2),
            Plane::from_coefficients(r3 - r2),
            Plane::from_coefficients(r3 + r0),
            Plane::from_coefficients(r3 - r0),
            Plane::from_coefficients(r3 - r1),
            Plane::from_coefficients(r3 + r1),
        )
    }

    /// Same planes, tested in a different order
    pub fn with_plane_order(mut self, order: [FrustumPlane; 6]) -> Self {
        self.order = order;
        self
    }

    pub fn plane(&self, which: FrustumPlane) -> &Plane {
        &self.planes[which.index()]
    }

    pub fn near(&self) -> &Plane {
        self.plane(FrustumPlane::Near)
    }

    pub fn far(&self) -> &Plane {
        self.plane(FrustumPlane::Far)
    }

    pub fn left(&self) -> &Plane {
        self.plane(FrustumPlane::Left)
    }

    pub fn right(&self) -> &Plane {
        self.plane(FrustumPlane::Right)
    }

    pub fn top(&self) -> &Plane {
        self.plane(FrustumPlane::Top)
    }

    pub fn bottom(&self) -> &Plane {
        self.plane(FrustumPlane::Bottom)
    }

    /// Planes indexed near, far, left, right, top, bottom
    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    pub fn plane_order(&self) -> &[FrustumPlane; 6] {
        &self.order
    }

    /// Planes in test order
    pub fn ordered_planes(&self) -> impl Iterator<Item = &Plane> + '_ {
        self.order.iter().map(move |which| self.plane(*which))
    }

    /// True if `predicate` accepts every plane, evaluated in test order
    /// with early rejection
    pub fn all_planes<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&Plane) -> bool,
    {
        self.ordered_planes().all(|plane| predicate(plane))
    }

    /// True if the point is on the visible side of every plane
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.all_planes(|plane| plane.signed_distance(point) >= 0.0)
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;

/// Axis-aligned bounding box stored as center and half extents.

use glam::{Mat4, Vec3};
use crate::camera::{Frustum, Plane};
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    /// Half size along each axis (non-negative)
    pub extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, extents: Vec3) -> Self {
        Self { center, extents: extents.abs() }
    }

    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        let center = (min + max) * 0.5;
        Self::new(center, max - center)
    }

    /// Tightest box around the points; a zero box at the origin when empty
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Vec3>,
    {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::new(Vec3::ZERO, Vec3::ZERO);
        };
        let (min, max) = points.fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Self::from_min_max(min, max)
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.extents
    }

    /// The eight corners, min corner first
    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min(), self.max());
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ]
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        ((point - self.center).abs() - self.extents).max_element() <= 0.0
    }

    /// True if `other` lies entirely within this box
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min().cmple(other.min()).all() && self.max().cmpge(other.max()).all()
    }

    /// True if the boxes overlap or touch
    pub fn intersects(&self, other: &Aabb) -> bool {
        ((self.center - other.center).abs() - (self.extents + other.extents)).max_element() <= 0.0
    }

    /// True if any part of the box is on the normal side of the plane (or touches it).
    ///
    /// Projects the extents onto the plane normal to get the box's radius
    /// along it.
    pub fn is_on_or_forward_plane(&self, plane: &Plane) -> bool {
        let r = self.extents.dot(plane.normal.abs());
        -r <= plane.signed_distance(self.center)
    }

    /// World-space box enclosing this box after `matrix`.
    ///
    /// Each new half extent is the sum of the old extents weighted by the
    /// absolute matrix axis components, so rotation grows the box just enough.
    pub fn to_world(&self, matrix: &Mat4) -> Aabb {
        let center = matrix.transform_point3(self.center);
        let x = matrix.col(0).truncate().abs() * self.extents.x;
        let y = matrix.col(1).truncate().abs() * self.extents.y;
        let z = matrix.col(2).truncate().abs() * self.extents.z;
        Aabb { center, extents: x + y + z }
    }

    /// Test a box that is already in world space
    pub fn intersects_frustum(&self, frustum: &Frustum) -> bool {
        frustum.all_planes(|plane| self.is_on_or_forward_plane(plane))
    }

    /// Move this local box to world space with the transform, then test it
    pub fn is_on_frustum(&self, frustum: &Frustum, transform: &Transform) -> bool {
        self.to_world(transform.world_matrix()).intersects_frustum(frustum)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;

/// Bounding sphere.

use glam::{Mat4, Vec3};
use crate::camera::{Frustum, Plane};
use crate::transform::Transform;
use super::aabb::Aabb;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius: radius.abs() }
    }

    /// Sphere around the bounding box of the points (radius = half diagonal)
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Vec3>,
    {
        let aabb = Aabb::from_points(points);
        Self::new(aabb.center, aabb.extents.length())
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Strictly in front of the plane by more than minus the radius.
    ///
    /// A sphere whose center sits exactly `radius` behind the plane is rejected.
    pub fn is_on_or_forward_plane(&self, plane: &Plane) -> bool {
        plane.signed_distance(self.center) > -self.radius
    }

    /// World-space sphere: center transformed, radius scaled by the largest axis scale
    pub fn to_world(&self, matrix: &Mat4) -> Sphere {
        let max_scale = matrix
            .col(0)
            .truncate()
            .length()
            .max(matrix.col(1).truncate().length())
            .max(matrix.col(2).truncate().length());
        Sphere {
            center: matrix.transform_point3(self.center),
            radius: self.radius * max_scale,
        }
    }

    /// Box enclosing the sphere
    pub fn to_aabb(&self) -> Aabb {
        Aabb::new(self.center, Vec3::splat(self.radius))
    }

    /// Test a sphere that is already in world space
    pub fn intersects_frustum(&self, frustum: &Frustum) -> bool {
        frustum.all_planes(|plane| self.is_on_or_forward_plane(plane))
    }

    /// Move this local sphere to world space with the transform, then test it
    pub fn is_on_frustum(&self, frustum: &Frustum, transform: &Transform) -> bool {
        self.to_world(transform.world_matrix()).intersects_frustum(frustum)
    }
}

#[cfg(test)]
#[path = "sphere_tests.rs"]
mod tests;

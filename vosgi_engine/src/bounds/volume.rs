/// Closed set of bounding volume shapes.

use glam::Mat4;
use crate::camera::{Frustum, Plane};
use crate::transform::Transform;
use super::aabb::Aabb;
use super::sphere::Sphere;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundingVolume {
    Aabb(Aabb),
    Sphere(Sphere),
}

impl BoundingVolume {
    pub fn is_on_or_forward_plane(&self, plane: &Plane) -> bool {
        match self {
            BoundingVolume::Aabb(aabb) => aabb.is_on_or_forward_plane(plane),
            BoundingVolume::Sphere(sphere) => sphere.is_on_or_forward_plane(plane),
        }
    }

    pub fn to_world(&self, matrix: &Mat4) -> BoundingVolume {
        match self {
            BoundingVolume::Aabb(aabb) => BoundingVolume::Aabb(aabb.to_world(matrix)),
            BoundingVolume::Sphere(sphere) => BoundingVolume::Sphere(sphere.to_world(matrix)),
        }
    }

    /// World-space axis-aligned box enclosing this volume
    pub fn world_aabb(&self, matrix: &Mat4) -> Aabb {
        match self {
            BoundingVolume::Aabb(aabb) => aabb.to_world(matrix),
            BoundingVolume::Sphere(sphere) => sphere.to_world(matrix).to_aabb(),
        }
    }

    pub fn intersects_frustum(&self, frustum: &Frustum) -> bool {
        match self {
            BoundingVolume::Aabb(aabb) => aabb.intersects_frustum(frustum),
            BoundingVolume::Sphere(sphere) => sphere.intersects_frustum(frustum),
        }
    }

    pub fn is_on_frustum(&self, frustum: &Frustum, transform: &Transform) -> bool {
        match self {
            BoundingVolume::Aabb(aabb) => aabb.is_on_frustum(frustum, transform),
            BoundingVolume::Sphere(sphere) => sphere.is_on_frustum(frustum, transform),
        }
    }
}

impl From<Aabb> for BoundingVolume {
    fn from(aabb: Aabb) -> Self {
        BoundingVolume::Aabb(aabb)
    }
}

impl From<Sphere> for BoundingVolume {
    fn from(sphere: Sphere) -> Self {
        BoundingVolume::Sphere(sphere)
    }
}

#[cfg(test)]
#[path = "volume_tests.rs"]
mod tests;

//! Bounding volumes for frustum culling.
//!
//! Volumes are authored in local space. `to_world()` refits them with a
//! world matrix and `is_on_frustum()` does both steps against a transform.
//! Tests may report a volume visible when it is actually outside.

mod aabb;
mod sphere;
mod volume;

pub use aabb::Aabb;
pub use sphere::Sphere;
pub use volume::BoundingVolume;

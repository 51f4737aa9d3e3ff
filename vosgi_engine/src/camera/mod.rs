//! Camera module: planes, frustum, lens and fly-through control.
//!
//! The frustum is the input to bounding-volume culling. It can be built
//! from a standalone `Camera`, from a `CameraController` behaviour inside
//! the scene, or directly from a view-projection matrix.

mod camera;
mod fly_controller;
mod frustum;
mod lens;

pub use camera::Camera;
pub use fly_controller::{FlyController, Movement};
pub use frustum::{Frustum, FrustumPlane, Plane};
pub use lens::Lens;

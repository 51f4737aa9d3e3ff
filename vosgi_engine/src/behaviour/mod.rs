//! Behaviours: per-frame logic attached to scene entities.
//!
//! `Behaviour` is the extension point. The built-in behaviours cover a
//! spinning object, lights, mesh rendering with frustum culling and an
//! in-scene fly camera.

mod behaviour;
mod camera_controller;
mod light;
mod model_renderer;
mod render_sink;
mod rotator;

pub use behaviour::{AsAny, Behaviour, BehaviourContext, BehaviourSlot};
pub(crate) use behaviour::PendingBehaviour;
pub use camera_controller::{CameraController, CameraInput};
pub use light::{Attenuation, GpuLight, Light, LightKind};
pub use model_renderer::{Material, MeshData, MeshId, ModelRenderer};
pub use render_sink::{DrawContext, FrameStats, MeshSubmission, NoOpSink, RecordingSink, RenderSink};
pub use rotator::Rotator;

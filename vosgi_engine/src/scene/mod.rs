//! Scene graph module
//!
//! Entities form a forest stored in a `Scene` arena. Each entity carries a
//! transform, an enabled flag and a list of behaviours.

mod entity;
mod scene;

pub use entity::{Entity, EntityKey, Guid, DEFAULT_NAME, DEFAULT_TAG};
pub use scene::Scene;

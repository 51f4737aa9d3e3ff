/*!
# Vosgi Engine

Scene-graph and visibility core for a small real-time 3D engine.

The crate holds no GPU code. It keeps a tree of entities with cached world
transforms, runs per-frame behaviours over that tree, and culls renderable
bounds against the camera frustum before handing submissions to a host
supplied `RenderSink`.

## Architecture

- **Scene**: arena of entities linked by generation-checked `EntityKey`s
- **Entity**: name, tag, GUID, transform, enabled flag, behaviours
- **Behaviour**: per-frame hooks (update, late_update, draw, ...)
- **Transform**: local TRS with a lazily recomputed world matrix
- **Frustum / Plane**: six inward planes built from a camera
- **Aabb / Sphere**: local bounds refitted to world space for culling
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod config;
pub mod observable;
pub mod transform;
pub mod camera;
pub mod bounds;
pub mod behaviour;
pub mod scene;

// Main vosgi namespace module
pub mod vosgi {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine-wide services
    pub use crate::engine::Engine;

    pub use crate::config::{Config, ControllerConfig, CullingConfig};
    pub use crate::observable::{Observable, SubscriptionId};
    pub use crate::transform::Transform;

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    pub mod camera {
        pub use crate::camera::*;
    }

    pub mod bounds {
        pub use crate::bounds::*;
    }

    pub mod behaviour {
        pub use crate::behaviour::*;
    }

    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;

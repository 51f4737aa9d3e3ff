/// Behaviour trait and the per-entity slot that owns each instance.
///
/// A behaviour is a pluggable unit of per-frame logic attached to one entity.
/// It never holds a reference to its entity. Each time the scene invokes a
/// hook it passes the transform of the entity holding the slot in a
/// `BehaviourContext`.
///
/// Hook order over a behaviour's life:
/// - `initialize` once, when attached
/// - `on_enable` right after, if the entity is enabled
/// - `start` once, before the first `update`
/// - `update` -> `late_update` -> `draw` each frame while enabled
/// - `on_enable` / `on_disable` whenever the enabled flag actually changes
/// - `terminate` once, when removed or when the entity is destroyed

use std::any::{Any, TypeId};
use crate::observable::Observable;
use crate::scene::EntityKey;
use crate::transform::Transform;
use super::render_sink::DrawContext;

/// Downcast support for `dyn Behaviour`
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// What a hook may touch: the owner's handle and transform
pub struct BehaviourContext<'a> {
    pub entity: EntityKey,
    pub transform: &'a mut Transform,
}

/// Per-frame logic attached to an entity. Every hook defaults to a no-op.
pub trait Behaviour: AsAny {
    fn initialize(&mut self, _ctx: &mut BehaviourContext<'_>) {}

    fn start(&mut self, _ctx: &mut BehaviourContext<'_>) {}

    fn on_enable(&mut self, _ctx: &mut BehaviourContext<'_>) {}

    fn on_disable(&mut self, _ctx: &mut BehaviourContext<'_>) {}

    fn update(&mut self, _ctx: &mut BehaviourContext<'_>, _delta_time: f32) {}

    fn late_update(&mut self, _ctx: &mut BehaviourContext<'_>, _delta_time: f32) {}

    fn draw(&mut self, _ctx: &mut BehaviourContext<'_>, _draw: &mut DrawContext<'_>) {}

    fn terminate(&mut self, _ctx: &mut BehaviourContext<'_>) {}
}

/// A behaviour waiting to be bound to an entity handle
pub(crate) struct PendingBehaviour {
    type_id: TypeId,
    type_name: &'static str,
    behaviour: Box<dyn Behaviour>,
}

impl PendingBehaviour {
    pub(crate) fn new<T: Behaviour>(behaviour: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            behaviour: Box::new(behaviour),
        }
    }

    /// Bind to the owning entity. The owner never changes afterwards.
    pub(crate) fn bind(self, owner: EntityKey, enabled: bool) -> BehaviourSlot {
        BehaviourSlot {
            owner,
            type_id: self.type_id,
            type_name: self.type_name,
            enabled: Observable::new(enabled),
            started: false,
            behaviour: self.behaviour,
        }
    }
}

/// An attached behaviour with its bookkeeping
pub struct BehaviourSlot {
    owner: EntityKey,
    type_id: TypeId,
    type_name: &'static str,
    enabled: Observable<bool>,
    started: bool,
    behaviour: Box<dyn Behaviour>,
}

impl BehaviourSlot {
    pub fn owner(&self) -> EntityKey {
        self.owner
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Behaviour>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn is_enabled(&self) -> bool {
        *self.enabled.get()
    }

    pub fn enabled_mut(&mut self) -> &mut Observable<bool> {
        &mut self.enabled
    }

    pub fn downcast_ref<T: Behaviour>(&self) -> Option<&T> {
        if !self.is::<T>() {
            return None;
        }
        let behaviour: &dyn Behaviour = self.behaviour.as_ref();
        behaviour.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Behaviour>(&mut self) -> Option<&mut T> {
        if !self.is::<T>() {
            return None;
        }
        let behaviour: &mut dyn Behaviour = self.behaviour.as_mut();
        behaviour.as_any_mut().downcast_mut::<T>()
    }

    // ===== HOOK DISPATCH =====

    pub(crate) fn initialize(&mut self, ctx: &mut BehaviourContext<'_>) {
        self.behaviour.initialize(ctx);
    }

    /// Store the flag and run on_enable/on_disable if it changed
    pub(crate) fn set_enabled(&mut self, enabled: bool, ctx: &mut BehaviourContext<'_>) -> bool {
        if !self.enabled.set(enabled) {
            return false;
        }
        if enabled {
            self.behaviour.on_enable(ctx);
        } else {
            self.behaviour.on_disable(ctx);
        }
        true
    }

    pub(crate) fn on_enable(&mut self, ctx: &mut BehaviourContext<'_>) {
        self.behaviour.on_enable(ctx);
    }

    /// Runs `start` the first time only, then `update` and `late_update`
    pub(crate) fn update(&mut self, ctx: &mut BehaviourContext<'_>, delta_time: f32) {
        if !self.started {
            self.started = true;
            self.behaviour.start(ctx);
        }
        self.behaviour.update(ctx, delta_time);
        self.behaviour.late_update(ctx, delta_time);
    }

    pub(crate) fn draw(&mut self, ctx: &mut BehaviourContext<'_>, draw: &mut DrawContext<'_>) {
        self.behaviour.draw(ctx, draw);
    }

    pub(crate) fn terminate(&mut self, ctx: &mut BehaviourContext<'_>) {
        self.behaviour.terminate(ctx);
    }
}

impl std::fmt::Debug for BehaviourSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviourSlot")
            .field("owner", &self.owner)
            .field("type_name", &self.type_name)
            .field("enabled", &self.is_enabled())
            .field("started", &self.started)
            .finish()
    }
}

#[cfg(test)]
#[path = "behaviour_tests.rs"]
mod tests;

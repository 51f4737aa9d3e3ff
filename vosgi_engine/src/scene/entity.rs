/// Entity: a named node of the scene tree.
///
/// An `Entity` is built as a plain value (name, tag, transform, behaviours)
/// and then moved into a `Scene`, which assigns its `EntityKey` and wires
/// parent/child links. Once inside the scene, structure is only changed
/// through `Scene` so the tree can never contain a cycle.

use std::fmt;
use slotmap::new_key_type;
use uuid::Uuid;
use crate::behaviour::{Behaviour, BehaviourSlot, PendingBehaviour};
use crate::observable::Observable;
use crate::transform::Transform;

new_key_type! {
    /// Stable, generation-checked handle to an entity in a `Scene`
    pub struct EntityKey;
}

/// Globally unique entity identifier, assigned at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid(Uuid);

impl Guid {
    /// New random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// First 8 hex digits, for logs
    pub fn short(&self) -> String {
        let mut text = self.0.simple().to_string();
        text.truncate(8);
        text
    }
}

impl Default for Guid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

pub const DEFAULT_NAME: &str = "New Entity";
pub const DEFAULT_TAG: &str = "Untagged";

pub struct Entity {
    name: String,
    tag: String,
    guid: Guid,
    pub(crate) transform: Transform,
    pub(crate) enabled: Observable<bool>,
    pub(crate) parent: Option<EntityKey>,
    pub(crate) children: Vec<EntityKey>,
    pub(crate) behaviours: Vec<BehaviourSlot>,
    /// Behaviours added before the entity joined a scene
    pub(crate) pending: Vec<PendingBehaviour>,
}

impl Entity {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            guid: Guid::new(),
            transform: Transform::new(),
            enabled: Observable::new(true),
            parent: None,
            children: Vec::new(),
            behaviours: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Entity with the default tag
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_TAG)
    }

    // ===== BUILDER =====

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Queue a behaviour; it is attached (initialize, on_enable) when the
    /// entity is inserted into a scene
    pub fn with_behaviour<T: Behaviour>(mut self, behaviour: T) -> Self {
        self.pending.push(PendingBehaviour::new(behaviour));
        self
    }

    /// Start disabled; queued behaviours are attached disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = Observable::new(false);
        self
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    pub fn guid(&self) -> Guid {
        self.guid
    }

    pub(crate) fn reissue_guid(&mut self) {
        self.guid = Guid::new();
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn is_enabled(&self) -> bool {
        *self.enabled.get()
    }

    pub fn parent(&self) -> Option<EntityKey> {
        self.parent
    }

    pub fn children(&self) -> &[EntityKey] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Attached behaviours, in attach order
    pub fn behaviours(&self) -> &[BehaviourSlot] {
        &self.behaviours
    }

    pub fn behaviour_count(&self) -> usize {
        self.behaviours.len() + self.pending.len()
    }

    /// First attached behaviour of type `T`
    pub fn behaviour<T: Behaviour>(&self) -> Option<&T> {
        self.behaviours.iter().find_map(|slot| slot.downcast_ref::<T>())
    }

    pub fn behaviour_mut<T: Behaviour>(&mut self) -> Option<&mut T> {
        self.behaviours.iter_mut().find_map(|slot| slot.downcast_mut::<T>())
    }

    pub fn has_behaviour<T: Behaviour>(&self) -> bool {
        self.behaviours.iter().any(|slot| slot.is::<T>())
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_TAG)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("guid", &self.guid.short())
            .field("enabled", &self.is_enabled())
            .field("parent", &self.parent)
            .field("children", &self.children.len())
            .field("behaviours", &self.behaviour_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;

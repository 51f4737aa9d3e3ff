/// Scene: an arena of entities forming a forest of trees.
///
/// Entities live in a SlotMap and refer to each other by `EntityKey`, so
/// parent links are plain handles and a destroyed entity's key simply stops
/// resolving. Each entity exclusively owns its subtree: destroying a node
/// terminates its behaviours and then destroys its children.
///
/// Per-frame work happens in `draw()` / `draw_self_and_children()`: for
/// every enabled entity, depth first, the world matrix is brought up to date,
/// each enabled behaviour runs update, late_update and draw, then the
/// children are visited. Disabled entities are skipped together with their
/// whole subtree.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use glam::Mat4;
use crate::behaviour::{
    Behaviour, BehaviourContext, CameraController, DrawContext, FrameStats,
    ModelRenderer, PendingBehaviour, RenderSink,
};
use crate::bounds::Aabb;
use crate::camera::Frustum;
use crate::error::{Error, Result};
use crate::observable::SubscriptionId;
use crate::transform::Transform;
use crate::{engine_debug, engine_err, engine_trace, engine_warn};
use super::entity::{Entity, EntityKey, Guid};

const SOURCE: &str = "vosgi::Scene";

#[derive(Default)]
pub struct Scene {
    entities: SlotMap<EntityKey, Entity>,
    /// Entities without a parent, in insertion order
    roots: Vec<EntityKey>,
    guid_index: FxHashMap<Guid, EntityKey>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== STRUCTURE =====

    /// Insert an entity as a new root
    pub fn spawn(&mut self, entity: Entity) -> EntityKey {
        let key = self.insert(entity, None);
        self.roots.push(key);
        key
    }

    /// Insert an entity as the last child of `parent`
    pub fn add_child(&mut self, parent: EntityKey, entity: Entity) -> Result<EntityKey> {
        if !self.entities.contains_key(parent) {
            return Err(invalid_entity(parent, "add_child"));
        }
        let key = self.insert(entity, Some(parent));
        if let Some(parent_entity) = self.entities.get_mut(parent) {
            parent_entity.children.push(key);
        }
        Ok(key)
    }

    /// Destroy `child` (and its subtree), which must be a direct child of `parent`
    pub fn remove_child(&mut self, parent: EntityKey, child: EntityKey) -> Result<()> {
        let index = self.child_index(parent, child, "remove_child")?;
        self.remove_child_at(parent, index)
    }

    /// Destroy the child at `index` (and its subtree)
    pub fn remove_child_at(&mut self, parent: EntityKey, index: usize) -> Result<()> {
        let parent_entity = self
            .entities
            .get_mut(parent)
            .ok_or_else(|| invalid_entity(parent, "remove_child_at"))?;
        if index >= parent_entity.children.len() {
            return Err(invalid_hierarchy(format!(
                "child index {} out of range ({} children)",
                index,
                parent_entity.children.len()
            )));
        }
        let child = parent_entity.children.remove(index);
        self.destroy_subtree(child);
        Ok(())
    }

    /// Detach `child` from `parent` without destroying it; it becomes a root
    pub fn release_child(&mut self, parent: EntityKey, child: EntityKey) -> Result<()> {
        let index = self.child_index(parent, child, "release_child")?;
        if let Some(parent_entity) = self.entities.get_mut(parent) {
            parent_entity.children.remove(index);
        }
        if let Some(child_entity) = self.entities.get_mut(child) {
            child_entity.parent = None;
            child_entity.transform.set_dirty();
        }
        self.roots.push(child);
        engine_debug!(SOURCE, "Released {:?} from {:?}", child, parent);
        Ok(())
    }

    /// Destroy an entity and its subtree, wherever it sits in the tree
    pub fn despawn(&mut self, key: EntityKey) -> Result<()> {
        let entity = self.entities.get(key).ok_or_else(|| invalid_entity(key, "despawn"))?;
        match entity.parent {
            Some(parent) => {
                if let Some(parent_entity) = self.entities.get_mut(parent) {
                    parent_entity.children.retain(|c| *c != key);
                }
            }
            None => self.roots.retain(|r| *r != key),
        }
        self.destroy_subtree(key);
        Ok(())
    }

    /// Destroy every entity
    pub fn clear(&mut self) {
        let roots = std::mem::take(&mut self.roots);
        for root in roots {
            self.destroy_subtree(root);
        }
        engine_debug!(SOURCE, "Scene cleared");
    }

    fn insert(&mut self, mut entity: Entity, parent: Option<EntityKey>) -> EntityKey {
        entity.parent = parent;
        entity.children.clear();
        if self.guid_index.contains_key(&entity.guid()) {
            engine_warn!(SOURCE, "GUID {} already in use, issuing a new one", entity.guid());
            entity.reissue_guid();
        }
        let stale = std::mem::take(&mut entity.behaviours);
        let pending = std::mem::take(&mut entity.pending);
        let guid = entity.guid();
        let name = entity.name().to_string();

        let key = self.entities.insert(entity);
        self.guid_index.insert(guid, key);

        // Slots bound to another entity are never rebound
        if !stale.is_empty() {
            engine_warn!(SOURCE, "Dropping {} behaviour(s) bound elsewhere from '{}'", stale.len(), name);
            if let Some(entity) = self.entities.get_mut(key) {
                let mut ctx = BehaviourContext { entity: key, transform: &mut entity.transform };
                for mut slot in stale {
                    slot.terminate(&mut ctx);
                }
            }
        }
        for behaviour in pending {
            if let Err(e) = self.attach(key, behaviour) {
                engine_warn!(SOURCE, "Failed to attach behaviour to '{}': {}", name, e);
            }
        }

        engine_debug!(SOURCE, "Added '{}' ({}) as {:?} under {:?}", name, guid.short(), key, parent);
        key
    }

    /// Bind, initialize and (if the entity is enabled) enable a behaviour.
    /// Returns its index in the entity's behaviour list.
    fn attach(&mut self, key: EntityKey, pending: PendingBehaviour) -> Result<usize> {
        let entity = self
            .entities
            .get_mut(key)
            .ok_or_else(|| invalid_entity(key, "add_behaviour"))?;
        let enabled = entity.is_enabled();
        let mut slot = pending.bind(key, enabled);

        let mut ctx = BehaviourContext { entity: key, transform: &mut entity.transform };
        slot.initialize(&mut ctx);
        if enabled {
            slot.on_enable(&mut ctx);
        }

        engine_trace!(SOURCE, "Attached {} to {:?}", slot.type_name(), key);
        entity.behaviours.push(slot);
        Ok(entity.behaviours.len() - 1)
    }

    /// Terminate behaviours, then destroy children, then free the slot
    fn destroy_subtree(&mut self, key: EntityKey) {
        let Some(entity) = self.entities.get_mut(key) else {
            engine_warn!(SOURCE, "Skipping destroy of stale entity {:?}", key);
            return;
        };

        let mut slots = std::mem::take(&mut entity.behaviours);
        let mut ctx = BehaviourContext { entity: key, transform: &mut entity.transform };
        for slot in &mut slots {
            slot.terminate(&mut ctx);
        }
        let children = std::mem::take(&mut entity.children);

        for child in children {
            self.destroy_subtree(child);
        }

        if let Some(entity) = self.entities.remove(key) {
            self.guid_index.remove(&entity.guid());
            engine_debug!(SOURCE, "Destroyed '{}' ({:?})", entity.name(), key);
        }
    }

    fn child_index(&self, parent: EntityKey, child: EntityKey, operation: &str) -> Result<usize> {
        let parent_entity = self.entities.get(parent).ok_or_else(|| invalid_entity(parent, operation))?;
        parent_entity
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| invalid_hierarchy(format!("{:?} is not a child of {:?}", child, parent)))
    }

    fn child_at(&self, key: EntityKey, index: usize) -> Option<EntityKey> {
        self.entities.get(key).and_then(|e| e.children.get(index).copied())
    }

    // ===== ENABLE STATE =====

    /// Set the enabled flag of an entity, its behaviours and every descendant.
    ///
    /// Behaviours whose flag actually changes get on_enable / on_disable.
    pub fn set_enabled(&mut self, key: EntityKey, enabled: bool) -> Result<()> {
        if !self.entities.contains_key(key) {
            return Err(invalid_entity(key, "set_enabled"));
        }
        self.propagate_enabled(key, enabled);
        Ok(())
    }

    fn propagate_enabled(&mut self, key: EntityKey, enabled: bool) {
        let Some(entity) = self.entities.get_mut(key) else {
            return;
        };
        entity.enabled.set(enabled);
        let Entity { transform, behaviours, .. } = entity;
        let mut ctx = BehaviourContext { entity: key, transform };
        for slot in behaviours.iter_mut() {
            slot.set_enabled(enabled, &mut ctx);
        }

        let mut i = 0;
        while let Some(child) = self.child_at(key, i) {
            self.propagate_enabled(child, enabled);
            i += 1;
        }
    }

    /// Enabled flag of the entity; false for stale keys
    pub fn is_enabled(&self, key: EntityKey) -> bool {
        self.entities.get(key).is_some_and(|e| e.is_enabled())
    }

    /// Enable or disable the first behaviour of type `T`.
    ///
    /// Returns `Ok(false)` if the entity has no such behaviour.
    pub fn set_behaviour_enabled<T: Behaviour>(&mut self, key: EntityKey, enabled: bool) -> Result<bool> {
        let entity = self
            .entities
            .get_mut(key)
            .ok_or_else(|| invalid_entity(key, "set_behaviour_enabled"))?;
        let Entity { transform, behaviours, .. } = entity;
        let Some(slot) = behaviours.iter_mut().find(|slot| slot.is::<T>()) else {
            return Ok(false);
        };
        let mut ctx = BehaviourContext { entity: key, transform };
        slot.set_enabled(enabled, &mut ctx);
        Ok(true)
    }

    /// Observe an entity's enabled flag
    pub fn subscribe_enabled<F>(&mut self, key: EntityKey, subscriber: F) -> Result<SubscriptionId>
    where
        F: FnMut(&bool) + 'static,
    {
        let entity = self
            .entities
            .get_mut(key)
            .ok_or_else(|| invalid_entity(key, "subscribe_enabled"))?;
        Ok(entity.enabled.subscribe(subscriber))
    }

    pub fn unsubscribe_enabled(&mut self, key: EntityKey, id: SubscriptionId) -> bool {
        self.entities.get_mut(key).is_some_and(|e| e.enabled.unsubscribe(id))
    }

    // ===== BEHAVIOURS =====

    /// Attach a behaviour: it is initialized, then enabled if the entity is.
    /// Several behaviours of the same type may coexist.
    pub fn add_behaviour<T: Behaviour>(&mut self, key: EntityKey, behaviour: T) -> Result<&mut T> {
        let index = self.attach(key, PendingBehaviour::new(behaviour))?;
        self.entities
            .get_mut(key)
            .and_then(|e| e.behaviours.get_mut(index))
            .and_then(|slot| slot.downcast_mut::<T>())
            .ok_or_else(|| engine_err!(SOURCE, "{} was not attached to {:?}", std::any::type_name::<T>(), key))
    }

    /// First behaviour of type `T`, in attach order
    pub fn behaviour<T: Behaviour>(&self, key: EntityKey) -> Option<&T> {
        self.entities.get(key)?.behaviour::<T>()
    }

    pub fn behaviour_mut<T: Behaviour>(&mut self, key: EntityKey) -> Option<&mut T> {
        self.entities.get_mut(key)?.behaviour_mut::<T>()
    }

    /// Every behaviour of type `T`, in attach order
    pub fn behaviours_of<T: Behaviour>(&self, key: EntityKey) -> Vec<&T> {
        self.entities
            .get(key)
            .map(|e| e.behaviours.iter().filter_map(|slot| slot.downcast_ref::<T>()).collect())
            .unwrap_or_default()
    }

    pub fn has_behaviour<T: Behaviour>(&self, key: EntityKey) -> bool {
        self.entities.get(key).is_some_and(|e| e.has_behaviour::<T>())
    }

    /// Terminate and remove every behaviour of type `T`. Returns how many were removed.
    pub fn remove_behaviour<T: Behaviour>(&mut self, key: EntityKey) -> Result<usize> {
        let entity = self
            .entities
            .get_mut(key)
            .ok_or_else(|| invalid_entity(key, "remove_behaviour"))?;
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut entity.behaviours).into_iter().partition(|slot| slot.is::<T>());
        entity.behaviours = kept;

        let count = removed.len();
        let mut ctx = BehaviourContext { entity: key, transform: &mut entity.transform };
        for mut slot in removed {
            slot.terminate(&mut ctx);
        }
        Ok(count)
    }

    // ===== TRANSFORMS =====

    /// Recompute world matrices below `key`, starting at the first dirty node
    /// on each path. A dirty node recomputes its whole subtree.
    pub fn update_self_and_children(&mut self, key: EntityKey) -> Result<()> {
        if !self.entities.contains_key(key) {
            return Err(invalid_entity(key, "update_self_and_children"));
        }
        self.update_node(key);
        Ok(())
    }

    /// Recompute world matrices of `key` and its whole subtree
    pub fn force_update_self_and_children(&mut self, key: EntityKey) -> Result<()> {
        if !self.entities.contains_key(key) {
            return Err(invalid_entity(key, "force_update_self_and_children"));
        }
        self.force_node(key);
        Ok(())
    }

    /// Bring every world matrix in the scene up to date
    pub fn update_transforms(&mut self) {
        let mut i = 0;
        while let Some(root) = self.roots.get(i).copied() {
            self.update_node(root);
            i += 1;
        }
    }

    fn update_node(&mut self, key: EntityKey) {
        let Some(entity) = self.entities.get(key) else {
            return;
        };
        if entity.transform.is_dirty() {
            self.force_node(key);
            return;
        }
        let mut i = 0;
        while let Some(child) = self.child_at(key, i) {
            self.update_node(child);
            i += 1;
        }
    }

    fn force_node(&mut self, key: EntityKey) {
        let parent_world = self
            .entities
            .get(key)
            .and_then(|e| e.parent)
            .and_then(|parent| self.entities.get(parent))
            .map(|parent| *parent.transform.world_matrix());
        let Some(entity) = self.entities.get_mut(key) else {
            return;
        };
        match parent_world {
            Some(parent_world) => entity.transform.compute_world_matrix_with_parent(&parent_world),
            None => entity.transform.compute_world_matrix(),
        }

        let mut i = 0;
        while let Some(child) = self.child_at(key, i) {
            self.force_node(child);
            i += 1;
        }
    }

    // ===== FRAME =====

    /// Run one frame over every root and return the frame's counters
    pub fn draw(&mut self, delta_time: f32, frustum: &Frustum, sink: &mut dyn RenderSink) -> FrameStats {
        let mut stats = FrameStats::default();
        let mut i = 0;
        while let Some(root) = self.roots.get(i).copied() {
            self.draw_node(root, delta_time, frustum, sink, &mut stats);
            i += 1;
        }
        engine_trace!(
            SOURCE,
            "Frame: {} visible, {} drawn, {} entities",
            stats.visible,
            stats.drawn,
            stats.total
        );
        stats
    }

    /// Run one frame over the subtree at `key`, adding to `stats`
    pub fn draw_self_and_children(
        &mut self,
        key: EntityKey,
        delta_time: f32,
        frustum: &Frustum,
        sink: &mut dyn RenderSink,
        stats: &mut FrameStats,
    ) -> Result<()> {
        if !self.entities.contains_key(key) {
            return Err(invalid_entity(key, "draw_self_and_children"));
        }
        self.draw_node(key, delta_time, frustum, sink, stats);
        Ok(())
    }

    fn draw_node(
        &mut self,
        key: EntityKey,
        delta_time: f32,
        frustum: &Frustum,
        sink: &mut dyn RenderSink,
        stats: &mut FrameStats,
    ) {
        if !self.is_enabled(key) {
            return;
        }
        // Ancestors were visited first, so a clean node already has a valid world matrix
        if self.entities.get(key).is_some_and(|e| e.transform.is_dirty()) {
            self.force_node(key);
        }

        let mut slots = match self.entities.get_mut(key) {
            Some(entity) => std::mem::take(&mut entity.behaviours),
            None => return,
        };

        for slot in slots.iter_mut().filter(|slot| slot.is_enabled()) {
            let Some(entity) = self.entities.get_mut(key) else {
                break;
            };
            let mut ctx = BehaviourContext { entity: key, transform: &mut entity.transform };
            slot.update(&mut ctx, delta_time);

            // Draw must see the matrix after this frame's movement
            if entity.transform.is_dirty() {
                self.force_node(key);
            }

            if let Some(entity) = self.entities.get_mut(key) {
                let mut ctx = BehaviourContext { entity: key, transform: &mut entity.transform };
                let mut draw = DrawContext { frustum, sink: &mut *sink, stats: &mut *stats };
                slot.draw(&mut ctx, &mut draw);
            }
        }

        if let Some(entity) = self.entities.get_mut(key) {
            entity.behaviours = slots;
        }
        stats.total += 1;

        let mut i = 0;
        while let Some(child) = self.child_at(key, i) {
            self.draw_node(child, delta_time, frustum, sink, stats);
            i += 1;
        }
    }

    // ===== RENDERING HELPERS =====

    /// World-space box of the entity's first `ModelRenderer`.
    ///
    /// The world matrix is composed from the local transforms up the parent
    /// chain, so pending (dirty) changes are already included.
    pub fn world_aabb(&self, key: EntityKey) -> Option<Aabb> {
        let entity = self.entities.get(key)?;
        let renderer = entity.behaviour::<ModelRenderer>()?;
        let world = self.fresh_world_matrix(key)?;
        Some(renderer.bounds().world_aabb(&world))
    }

    fn fresh_world_matrix(&self, key: EntityKey) -> Option<Mat4> {
        let mut entity = self.entities.get(key)?;
        let mut world = entity.transform.local_matrix();
        while let Some(parent) = entity.parent {
            entity = self.entities.get(parent)?;
            world = entity.transform.local_matrix() * world;
        }
        Some(world)
    }

    /// Frustum of the entity's `CameraController`
    pub fn camera_frustum(&self, key: EntityKey) -> Option<Frustum> {
        let entity = self.entities.get(key)?;
        let camera = entity.behaviour::<CameraController>()?;
        Some(camera.frustum(&entity.transform))
    }

    /// Projection * view of the entity's `CameraController`
    pub fn camera_view_projection(&self, key: EntityKey) -> Option<Mat4> {
        let entity = self.entities.get(key)?;
        let camera = entity.behaviour::<CameraController>()?;
        Some(camera.projection_matrix() * camera.view_matrix(&entity.transform))
    }

    // ===== QUERIES =====

    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn transform(&self, key: EntityKey) -> Option<&Transform> {
        self.entities.get(key).map(|e| &e.transform)
    }

    pub fn transform_mut(&mut self, key: EntityKey) -> Option<&mut Transform> {
        self.entities.get_mut(key).map(|e| &mut e.transform)
    }

    pub fn set_name(&mut self, key: EntityKey, name: impl Into<String>) -> Result<()> {
        let entity = self.entities.get_mut(key).ok_or_else(|| invalid_entity(key, "set_name"))?;
        entity.set_name(name);
        Ok(())
    }

    pub fn set_tag(&mut self, key: EntityKey, tag: impl Into<String>) -> Result<()> {
        let entity = self.entities.get_mut(key).ok_or_else(|| invalid_entity(key, "set_tag"))?;
        entity.set_tag(tag);
        Ok(())
    }

    pub fn parent(&self, key: EntityKey) -> Option<EntityKey> {
        self.entities.get(key)?.parent
    }

    /// Direct children in order; empty for stale keys
    pub fn children(&self, key: EntityKey) -> &[EntityKey] {
        self.entities.get(key).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[EntityKey] {
        &self.roots
    }

    /// Every entity below `key`, depth first, parents before children
    pub fn descendants(&self, key: EntityKey) -> Vec<EntityKey> {
        let mut out = Vec::new();
        let mut stack: Vec<EntityKey> = self.children(key).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Every entity in the scene, depth first from each root in order
    pub fn depth_first(&self) -> Vec<EntityKey> {
        let mut out = Vec::with_capacity(self.entities.len());
        for root in &self.roots {
            out.push(*root);
            out.extend(self.descendants(*root));
        }
        out
    }

    /// First entity with this name, depth first
    pub fn find_by_name(&self, name: &str) -> Option<EntityKey> {
        self.depth_first().into_iter().find(|key| self.entities.get(*key).is_some_and(|e| e.name() == name))
    }

    /// All entities with this tag, depth first
    pub fn find_by_tag(&self, tag: &str) -> Vec<EntityKey> {
        self.depth_first()
            .into_iter()
            .filter(|key| self.entities.get(*key).is_some_and(|e| e.tag() == tag))
            .collect()
    }

    pub fn find_by_guid(&self, guid: Guid) -> Option<EntityKey> {
        self.guid_index.get(&guid).copied()
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        if !self.is_empty() {
            self.clear();
        }
    }
}

fn invalid_entity(key: EntityKey, operation: &str) -> Error {
    engine_warn!(SOURCE, "{}: entity {:?} does not exist", operation, key);
    Error::InvalidEntity(format!("{:?} ({})", key, operation))
}

fn invalid_hierarchy(message: String) -> Error {
    engine_warn!(SOURCE, "{}", message);
    Error::InvalidHierarchy(message)
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;

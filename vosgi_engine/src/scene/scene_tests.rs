use super::*;
use crate::behaviour::{
    MeshData, MeshId, NoOpSink, RecordingSink, Rotator,
};
use crate::camera::Lens;
use crate::transform::Transform;
use glam::{Quat, Vec3};
use std::cell::RefCell;
use std::rc::Rc;

type CallLog = Rc<RefCell<Vec<String>>>;

/// Records every hook call as "<label>:<hook>"
struct Probe {
    label: &'static str,
    log: CallLog,
}

impl Probe {
    fn new(label: &'static str, log: &CallLog) -> Self {
        Self { label, log: log.clone() }
    }

    fn record(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.label, hook));
    }
}

impl Behaviour for Probe {
    fn initialize(&mut self, _ctx: &mut BehaviourContext<'_>) {
        self.record("initialize");
    }
    fn start(&mut self, _ctx: &mut BehaviourContext<'_>) {
        self.record("start");
    }
    fn on_enable(&mut self, _ctx: &mut BehaviourContext<'_>) {
        self.record("on_enable");
    }
    fn on_disable(&mut self, _ctx: &mut BehaviourContext<'_>) {
        self.record("on_disable");
    }
    fn update(&mut self, _ctx: &mut BehaviourContext<'_>, _delta_time: f32) {
        self.record("update");
    }
    fn late_update(&mut self, _ctx: &mut BehaviourContext<'_>, _delta_time: f32) {
        self.record("late_update");
    }
    fn draw(&mut self, _ctx: &mut BehaviourContext<'_>, _draw: &mut DrawContext<'_>) {
        self.record("draw");
    }
    fn terminate(&mut self, _ctx: &mut BehaviourContext<'_>) {
        self.record("terminate");
    }
}

/// Second behaviour type for type-lookup tests
struct Marker(u32);

impl Behaviour for Marker {}

/// Moves its entity one unit along +X per second
struct Mover;

impl Behaviour for Mover {
    fn update(&mut self, ctx: &mut BehaviourContext<'_>, delta_time: f32) {
        ctx.transform.translate(Vec3::X * delta_time);
    }
}

fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

fn take_log(log: &CallLog) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

fn camera_frustum() -> Frustum {
    Frustum::from_camera(Vec3::ZERO, Vec3::NEG_Z, Vec3::X, Vec3::Y, &Lens::new(45.0, 1.0, 0.1, 100.0))
}

fn cube_mesh(id: u32) -> MeshData {
    MeshData::new(MeshId(id), vec![Vec3::splat(-1.0), Vec3::splat(1.0)])
}

fn at(position: Vec3) -> Transform {
    Transform::from_position(position)
}

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_spawn_and_add_child() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::named("Root"));
    let child = scene.add_child(root, Entity::named("Child")).unwrap();

    assert_eq!(scene.len(), 2);
    assert_eq!(scene.roots(), &[root]);
    assert_eq!(scene.children(root), &[child]);
    assert_eq!(scene.parent(child), Some(root));
    assert_eq!(scene.parent(root), None);
}

#[test]
fn test_children_keep_insertion_order() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default());
    let a = scene.add_child(root, Entity::named("A")).unwrap();
    let b = scene.add_child(root, Entity::named("B")).unwrap();
    let c = scene.add_child(root, Entity::named("C")).unwrap();
    assert_eq!(scene.children(root), &[a, b, c]);
}

#[test]
fn test_add_child_to_stale_parent_fails() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default());
    scene.despawn(root).unwrap();

    let result = scene.add_child(root, Entity::default());
    assert!(matches!(result, Err(Error::InvalidEntity(_))));
    assert!(scene.is_empty());
}

#[test]
fn test_remove_child_destroys_subtree() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default());
    let child = scene.add_child(root, Entity::default()).unwrap();
    let grandchild = scene.add_child(child, Entity::default()).unwrap();
    let guid = scene.entity(grandchild).unwrap().guid();

    scene.remove_child(root, child).unwrap();

    assert!(scene.children(root).is_empty());
    assert!(!scene.contains(child));
    assert!(!scene.contains(grandchild));
    assert!(scene.find_by_guid(guid).is_none());
    assert_eq!(scene.len(), 1);
}

#[test]
fn test_remove_child_terminates_parent_before_children() {
    let log = new_log();
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default());
    let child = scene
        .add_child(root, Entity::default().with_behaviour(Probe::new("child", &log)))
        .unwrap();
    scene
        .add_child(child, Entity::default().with_behaviour(Probe::new("grandchild", &log)))
        .unwrap();
    take_log(&log);

    scene.remove_child(root, child).unwrap();

    assert_eq!(take_log(&log), vec!["child:terminate", "grandchild:terminate"]);
}

#[test]
fn test_remove_child_rejects_non_child() {
    let mut scene = Scene::new();
    let a = scene.spawn(Entity::default());
    let b = scene.spawn(Entity::default());

    assert!(matches!(scene.remove_child(a, b), Err(Error::InvalidHierarchy(_))));
    assert!(scene.contains(b));
}

#[test]
fn test_remove_child_at() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default());
    let a = scene.add_child(root, Entity::default()).unwrap();
    let b = scene.add_child(root, Entity::default()).unwrap();

    assert!(matches!(scene.remove_child_at(root, 5), Err(Error::InvalidHierarchy(_))));
    scene.remove_child_at(root, 0).unwrap();

    assert!(!scene.contains(a));
    assert_eq!(scene.children(root), &[b]);
}

#[test]
fn test_release_child_becomes_root() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default().with_transform(at(Vec3::new(10.0, 0.0, 0.0))));
    let child = scene
        .add_child(root, Entity::default().with_transform(at(Vec3::new(0.0, 1.0, 0.0))))
        .unwrap();
    scene.update_transforms();
    assert!(approx(scene.transform(child).unwrap().world_position(), Vec3::new(10.0, 1.0, 0.0)));

    scene.release_child(root, child).unwrap();
    scene.update_transforms();

    assert_eq!(scene.parent(child), None);
    assert_eq!(scene.roots(), &[root, child]);
    assert!(approx(scene.transform(child).unwrap().world_position(), Vec3::new(0.0, 1.0, 0.0)));
}

#[test]
fn test_despawn_root_and_inner_node() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default());
    let other = scene.spawn(Entity::default());
    let child = scene.add_child(root, Entity::default()).unwrap();

    scene.despawn(child).unwrap();
    assert!(scene.children(root).is_empty());

    scene.despawn(root).unwrap();
    assert_eq!(scene.roots(), &[other]);
    assert!(matches!(scene.despawn(root), Err(Error::InvalidEntity(_))));
}

#[test]
fn test_clear_and_drop_terminate_everything() {
    let log = new_log();
    {
        let mut scene = Scene::new();
        let root = scene.spawn(Entity::default().with_behaviour(Probe::new("a", &log)));
        scene.add_child(root, Entity::default().with_behaviour(Probe::new("b", &log))).unwrap();
        scene.clear();
        assert!(scene.is_empty());
        assert!(scene.roots().is_empty());
    }
    let calls = take_log(&log);
    assert!(calls.contains(&"a:terminate".to_string()));
    assert!(calls.contains(&"b:terminate".to_string()));

    {
        let mut scene = Scene::new();
        scene.spawn(Entity::default().with_behaviour(Probe::new("c", &log)));
    }
    assert_eq!(take_log(&log).last().map(String::as_str), Some("c:terminate"));
}

// ============================================================================
// Transforms
// ============================================================================

#[test]
fn test_world_matrix_is_parent_times_local() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default().with_transform(at(Vec3::new(0.0, 0.0, -10.0))));
    let child = scene
        .add_child(root, Entity::default().with_transform(at(Vec3::new(2.0, 0.0, 0.0))))
        .unwrap();

    scene.update_self_and_children(root).unwrap();

    let parent_world = *scene.transform(root).unwrap().world_matrix();
    let child_transform = scene.transform(child).unwrap();
    let expected = parent_world * child_transform.local_matrix();
    assert!(child_transform.world_matrix().abs_diff_eq(expected, 1e-5));
    assert!(!child_transform.is_dirty());
}

#[test]
fn test_dirty_parent_recomputes_whole_subtree() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default());
    let child = scene.add_child(root, Entity::default().with_transform(at(Vec3::X))).unwrap();
    let grandchild = scene.add_child(child, Entity::default().with_transform(at(Vec3::X))).unwrap();
    scene.update_transforms();

    scene.transform_mut(root).unwrap().set_local_position(Vec3::new(0.0, 5.0, 0.0));
    scene.update_self_and_children(root).unwrap();

    assert!(approx(scene.transform(grandchild).unwrap().world_position(), Vec3::new(2.0, 5.0, 0.0)));
}

#[test]
fn test_rotating_parent_moves_child() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default());
    let child = scene.add_child(root, Entity::default().with_transform(at(Vec3::X))).unwrap();
    scene.update_transforms();

    scene
        .transform_mut(root)
        .unwrap()
        .set_local_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
    scene.update_transforms();

    assert!(approx(scene.transform(child).unwrap().world_position(), Vec3::new(0.0, 0.0, -1.0)));
}

#[test]
fn test_clean_subtree_is_left_alone() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default());
    let child = scene.add_child(root, Entity::default().with_transform(at(Vec3::X))).unwrap();
    scene.update_transforms();

    // Dirty child under a clean parent is recomputed on the next pass
    scene.transform_mut(child).unwrap().set_local_position(Vec3::Y);
    scene.update_self_and_children(root).unwrap();
    assert!(approx(scene.transform(child).unwrap().world_position(), Vec3::Y));
    assert!(!scene.transform(root).unwrap().is_dirty());
}

#[test]
fn test_force_update_ignores_dirty_flag() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default().with_transform(at(Vec3::Z)));
    scene.force_update_self_and_children(root).unwrap();
    assert!(approx(scene.transform(root).unwrap().world_position(), Vec3::Z));
    assert!(scene.force_update_self_and_children(EntityKey::default()).is_err());
}

#[test]
fn test_recomputing_static_chain_is_bit_identical() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default().with_transform(Transform::from_trs(
        Vec3::new(1.5, -2.0, 3.25),
        Quat::from_rotation_y(0.7) * Quat::from_rotation_x(0.3),
        Vec3::new(2.0, 0.5, 1.0),
    )));
    let child = scene
        .add_child(root, Entity::default().with_transform(Transform::from_trs(
            Vec3::new(0.1, 0.2, 0.3),
            Quat::from_rotation_z(1.1),
            Vec3::splat(3.0),
        )))
        .unwrap();
    let grandchild = scene.add_child(child, Entity::default().with_transform(at(Vec3::new(7.0, 0.0, -1.0)))).unwrap();

    scene.update_self_and_children(root).unwrap();
    let first = *scene.transform(grandchild).unwrap().world_matrix();

    scene.update_self_and_children(root).unwrap();
    assert_eq!(*scene.transform(grandchild).unwrap().world_matrix(), first);

    scene.force_update_self_and_children(root).unwrap();
    assert_eq!(*scene.transform(grandchild).unwrap().world_matrix(), first);
}

#[test]
fn test_moving_parent_carries_child() {
    let mut scene = Scene::new();
    let a = scene.spawn(Entity::named("A"));
    let b = scene.add_child(a, Entity::named("B").with_transform(at(Vec3::new(10.0, 0.0, 0.0)))).unwrap();
    scene.update_transforms();

    scene.transform_mut(a).unwrap().set_local_position(Vec3::new(5.0, 0.0, 0.0));
    scene.update_self_and_children(a).unwrap();

    assert_eq!(scene.transform(b).unwrap().world_position(), Vec3::new(15.0, 0.0, 0.0));
}

// ============================================================================
// Enable state
// ============================================================================

#[test]
fn test_disable_propagates_to_descendants() {
    let log = new_log();
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default().with_behaviour(Probe::new("root", &log)));
    let child = scene
        .add_child(root, Entity::default().with_behaviour(Probe::new("child", &log)))
        .unwrap();
    take_log(&log);

    scene.set_enabled(root, false).unwrap();

    assert!(!scene.is_enabled(root));
    assert!(!scene.is_enabled(child));
    assert_eq!(take_log(&log), vec!["root:on_disable", "child:on_disable"]);

    scene.set_enabled(root, true).unwrap();
    assert!(scene.is_enabled(child));
    assert_eq!(take_log(&log), vec!["root:on_enable", "child:on_enable"]);
}

#[test]
fn test_setting_same_value_runs_no_hooks() {
    let log = new_log();
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default().with_behaviour(Probe::new("root", &log)));
    take_log(&log);

    scene.set_enabled(root, true).unwrap();
    assert!(take_log(&log).is_empty());

    scene.set_enabled(root, false).unwrap();
    scene.set_enabled(root, false).unwrap();
    assert_eq!(take_log(&log), vec!["root:on_disable"]);
}

#[test]
fn test_reenabling_parent_enables_disabled_child() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default());
    let child = scene.add_child(root, Entity::default()).unwrap();

    scene.set_enabled(child, false).unwrap();
    assert!(scene.is_enabled(root));

    scene.set_enabled(root, false).unwrap();
    scene.set_enabled(root, true).unwrap();
    assert!(scene.is_enabled(child));
}

#[test]
fn test_set_behaviour_enabled() {
    let log = new_log();
    let mut scene = Scene::new();
    let key = scene.spawn(Entity::default().with_behaviour(Probe::new("p", &log)));
    take_log(&log);

    assert!(scene.set_behaviour_enabled::<Probe>(key, false).unwrap());
    assert!(!scene.set_behaviour_enabled::<Marker>(key, false).unwrap());
    assert_eq!(take_log(&log), vec!["p:on_disable"]);

    // Disabled behaviour is skipped in the frame but the entity still counts
    let stats = scene.draw(0.016, &camera_frustum(), &mut NoOpSink);
    assert!(take_log(&log).is_empty());
    assert_eq!(stats.total, 1);
}

#[test]
fn test_subscribe_enabled() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default());
    let child = scene.add_child(root, Entity::default()).unwrap();
    let sink = seen.clone();
    let id = scene
        .subscribe_enabled(child, move |value: &bool| sink.borrow_mut().push(*value))
        .unwrap();

    scene.set_enabled(root, false).unwrap();
    scene.set_enabled(root, false).unwrap();
    assert!(scene.unsubscribe_enabled(child, id));
    scene.set_enabled(root, true).unwrap();

    assert_eq!(*seen.borrow(), vec![false]);
}

// ============================================================================
// Behaviours
// ============================================================================

#[test]
fn test_attach_runs_initialize_then_on_enable() {
    let log = new_log();
    let mut scene = Scene::new();
    let key = scene.spawn(Entity::default());

    scene.add_behaviour(key, Probe::new("p", &log)).unwrap();

    assert_eq!(take_log(&log), vec!["p:initialize", "p:on_enable"]);
}

#[test]
fn test_attach_to_disabled_entity_skips_on_enable() {
    let log = new_log();
    let mut scene = Scene::new();
    let key = scene.spawn(Entity::default().disabled().with_behaviour(Probe::new("p", &log)));

    assert_eq!(take_log(&log), vec!["p:initialize"]);

    scene.set_enabled(key, true).unwrap();
    assert_eq!(take_log(&log), vec!["p:on_enable"]);
}

#[test]
fn test_behaviour_lookup_by_type() {
    let mut scene = Scene::new();
    let key = scene.spawn(Entity::default());
    scene.add_behaviour(key, Marker(1)).unwrap();
    scene.add_behaviour(key, Rotator::default()).unwrap();
    scene.add_behaviour(key, Marker(2)).unwrap().0 += 10;

    assert_eq!(scene.behaviour::<Marker>(key).map(|m| m.0), Some(1));
    let all: Vec<u32> = scene.behaviours_of::<Marker>(key).iter().map(|m| m.0).collect();
    assert_eq!(all, vec![1, 12]);
    assert!(scene.has_behaviour::<Rotator>(key));
    assert!(scene.behaviour::<Probe>(key).is_none());

    scene.behaviour_mut::<Rotator>(key).unwrap().speed = 45.0;
    assert_eq!(scene.behaviour::<Rotator>(key).unwrap().speed, 45.0);
}

#[test]
fn test_remove_behaviour_removes_all_of_type() {
    let log = new_log();
    let mut scene = Scene::new();
    let key = scene.spawn(Entity::default());
    scene.add_behaviour(key, Probe::new("a", &log)).unwrap();
    scene.add_behaviour(key, Marker(0)).unwrap();
    scene.add_behaviour(key, Probe::new("b", &log)).unwrap();
    take_log(&log);

    assert_eq!(scene.remove_behaviour::<Probe>(key).unwrap(), 2);
    assert_eq!(take_log(&log), vec!["a:terminate", "b:terminate"]);
    assert!(!scene.has_behaviour::<Probe>(key));
    assert!(scene.has_behaviour::<Marker>(key));
    assert_eq!(scene.remove_behaviour::<Probe>(key).unwrap(), 0);
}

#[test]
fn test_stale_key_lookups() {
    let mut scene = Scene::new();
    let key = scene.spawn(Entity::default().with_behaviour(Marker(0)));
    scene.despawn(key).unwrap();

    assert!(!scene.contains(key));
    assert!(scene.behaviour::<Marker>(key).is_none());
    assert!(scene.entity(key).is_none());
    assert!(scene.children(key).is_empty());
    assert!(!scene.is_enabled(key));
    assert!(matches!(scene.set_enabled(key, true), Err(Error::InvalidEntity(_))));
    assert!(matches!(scene.add_behaviour(key, Marker(1)), Err(Error::InvalidEntity(_))));
}

// ============================================================================
// Frame
// ============================================================================

#[test]
fn test_frame_hook_order() {
    let log = new_log();
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default().with_behaviour(Probe::new("root", &log)));
    scene
        .add_child(root, Entity::default().with_behaviour(Probe::new("child", &log)))
        .unwrap();
    take_log(&log);

    scene.draw(0.016, &camera_frustum(), &mut NoOpSink);
    assert_eq!(
        take_log(&log),
        vec![
            "root:start", "root:update", "root:late_update", "root:draw",
            "child:start", "child:update", "child:late_update", "child:draw",
        ]
    );

    scene.draw(0.016, &camera_frustum(), &mut NoOpSink);
    assert_eq!(
        take_log(&log),
        vec![
            "root:update", "root:late_update", "root:draw",
            "child:update", "child:late_update", "child:draw",
        ]
    );
}

#[test]
fn test_disabled_subtree_is_skipped() {
    let log = new_log();
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default());
    let child = scene
        .add_child(root, Entity::default().with_behaviour(Probe::new("child", &log)))
        .unwrap();
    scene
        .add_child(child, Entity::default().with_behaviour(Probe::new("grandchild", &log)))
        .unwrap();
    scene.set_enabled(child, false).unwrap();
    take_log(&log);

    let stats = scene.draw(0.016, &camera_frustum(), &mut NoOpSink);

    assert!(take_log(&log).is_empty());
    assert_eq!(stats.total, 1);
}

#[test]
fn test_draw_counts_visible_and_drawn() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::named("Root"));
    scene
        .add_child(
            root,
            Entity::named("InView")
                .with_transform(at(Vec3::new(0.0, 0.0, -20.0)))
                .with_behaviour(ModelRenderer::new(vec![cube_mesh(1), cube_mesh(2)])),
        )
        .unwrap();
    scene
        .add_child(
            root,
            Entity::named("Behind")
                .with_transform(at(Vec3::new(0.0, 0.0, 20.0)))
                .with_behaviour(ModelRenderer::new(vec![cube_mesh(3)])),
        )
        .unwrap();

    let mut sink = RecordingSink::new();
    let stats = scene.draw(0.016, &camera_frustum(), &mut sink);

    assert_eq!(stats, FrameStats { visible: 1, drawn: 2, total: 3 });
    let ids: Vec<MeshId> = sink.meshes.iter().map(|m| m.mesh).collect();
    assert_eq!(ids, vec![MeshId(1), MeshId(2)]);
}

#[test]
fn test_parent_transform_affects_culling() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default().with_transform(at(Vec3::new(0.0, 0.0, 40.0))));
    let child = scene
        .add_child(
            root,
            Entity::default()
                .with_transform(at(Vec3::new(0.0, 0.0, -20.0)))
                .with_behaviour(ModelRenderer::new(vec![cube_mesh(1)])),
        )
        .unwrap();

    let stats = scene.draw(0.0, &camera_frustum(), &mut NoOpSink);
    assert_eq!(stats.visible, 0);

    scene.transform_mut(root).unwrap().set_local_position(Vec3::ZERO);
    let stats = scene.draw(0.0, &camera_frustum(), &mut NoOpSink);
    assert_eq!(stats.visible, 1);
    assert!(approx(scene.world_aabb(child).unwrap().center, Vec3::new(0.0, 0.0, -20.0)));
}

#[test]
fn test_draw_sees_this_frames_rotation() {
    let mut scene = Scene::new();
    let key = scene.spawn(
        Entity::default()
            .with_behaviour(Rotator::new(90.0, Vec3::Y))
            .with_behaviour(ModelRenderer::new(vec![cube_mesh(1)])),
    );

    let mut sink = RecordingSink::new();
    scene.draw(1.0, &camera_frustum(), &mut sink);

    let transform = scene.transform(key).unwrap();
    assert!(!transform.is_dirty());
    assert_eq!(sink.meshes[0].world_matrix, *transform.world_matrix());
    assert!(approx(transform.forward(), Vec3::NEG_X));
}

#[test]
fn test_draw_self_and_children_accumulates() {
    let mut scene = Scene::new();
    let a = scene.spawn(Entity::default());
    let b = scene.spawn(Entity::default());
    scene.add_child(b, Entity::default()).unwrap();

    let mut stats = FrameStats::default();
    let frustum = camera_frustum();
    scene.draw_self_and_children(a, 0.0, &frustum, &mut NoOpSink, &mut stats).unwrap();
    scene.draw_self_and_children(b, 0.0, &frustum, &mut NoOpSink, &mut stats).unwrap();

    assert_eq!(stats.total, 3);
}

// ============================================================================
// Camera and queries
// ============================================================================

#[test]
fn test_camera_frustum_from_entity() {
    let mut scene = Scene::new();
    let camera = scene.spawn(
        Entity::named("Camera")
            .with_transform(at(Vec3::new(0.0, 0.0, 10.0)))
            .with_behaviour(CameraController::default()),
    );
    let plain = scene.spawn(Entity::default());
    scene.update_transforms();

    let frustum = scene.camera_frustum(camera).unwrap();
    assert!(frustum.contains_point(Vec3::ZERO));
    assert!(scene.camera_view_projection(camera).is_some());
    assert!(scene.camera_frustum(plain).is_none());
}

#[test]
fn test_find_by_name_tag_and_guid() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::new("Root", "World"));
    let a = scene.add_child(root, Entity::new("Asteroid", "Rock")).unwrap();
    let b = scene.add_child(a, Entity::new("Asteroid", "Rock")).unwrap();
    let guid = scene.entity(b).unwrap().guid();

    assert_eq!(scene.find_by_name("Asteroid"), Some(a));
    assert_eq!(scene.find_by_name("Missing"), None);
    assert_eq!(scene.find_by_tag("Rock"), vec![a, b]);
    assert_eq!(scene.find_by_guid(guid), Some(b));
}

#[test]
fn test_descendants_depth_first() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::default());
    let a = scene.add_child(root, Entity::default()).unwrap();
    let a1 = scene.add_child(a, Entity::default()).unwrap();
    let b = scene.add_child(root, Entity::default()).unwrap();
    let other = scene.spawn(Entity::default());

    assert_eq!(scene.descendants(root), vec![a, a1, b]);
    assert_eq!(scene.depth_first(), vec![root, a, a1, b, other]);
}

#[test]
fn test_rename_and_retag_in_scene() {
    let mut scene = Scene::new();
    let key = scene.spawn(Entity::default());
    scene.set_name(key, "Renamed").unwrap();
    scene.set_tag(key, "Player").unwrap();
    assert_eq!(scene.find_by_name("Renamed"), Some(key));
    assert_eq!(scene.find_by_tag("Player"), vec![key]);

    scene.despawn(key).unwrap();
    assert!(matches!(scene.set_name(key, "Gone"), Err(Error::InvalidEntity(_))));
    assert!(matches!(scene.set_tag(key, "Gone"), Err(Error::InvalidEntity(_))));
}

// ============================================================================
// Behaviour binding
// ============================================================================

#[test]
fn test_slots_bound_elsewhere_are_terminated_on_insert() {
    let log = new_log();
    let mut scene = Scene::new();
    let source = scene.spawn(Entity::named("Source"));

    let mut entity = Entity::named("Copy").with_behaviour(Probe::new("queued", &log));
    entity.behaviours.push(PendingBehaviour::new(Probe::new("foreign", &log)).bind(source, true));
    let key = scene.spawn(entity);

    assert_eq!(take_log(&log), vec!["foreign:terminate", "queued:initialize", "queued:on_enable"]);
    let behaviours = scene.entity(key).unwrap().behaviours();
    assert_eq!(behaviours.len(), 1);
    assert_eq!(behaviours[0].owner(), key);
}

#[test]
fn test_behaviour_drives_the_entity_it_runs_on() {
    let mut scene = Scene::new();
    let a = scene.spawn(Entity::named("A"));
    let b = scene.spawn(Entity::named("B"));
    // Slot carrying a key other than the entity holding it
    scene.entities[b].behaviours.push(PendingBehaviour::new(Mover).bind(a, true));

    scene.draw(1.0, &camera_frustum(), &mut NoOpSink);

    assert_eq!(scene.transform(a).unwrap().local_position(), Vec3::ZERO);
    assert_eq!(scene.transform(b).unwrap().local_position(), Vec3::X);
}

#[test]
fn test_world_aabb_includes_pending_changes() {
    let mut scene = Scene::new();
    let parent = scene.spawn(Entity::named("Parent"));
    let model = scene
        .add_child(
            parent,
            Entity::named("Model")
                .with_transform(at(Vec3::new(0.0, 1.0, 0.0)))
                .with_behaviour(ModelRenderer::new(vec![cube_mesh(1)])),
        )
        .unwrap();
    scene.update_transforms();

    // No update pass after the move
    scene.transform_mut(parent).unwrap().set_local_position(Vec3::new(3.0, 0.0, 0.0));

    let aabb = scene.world_aabb(model).unwrap();
    assert!(approx(aabb.center, Vec3::new(3.0, 1.0, 0.0)));
    assert!(approx(aabb.extents, Vec3::ONE));
}

use glam::Vec3;
use super::*;

const EPS: f32 = 1e-4;

fn create_test_camera() -> Camera {
    Camera::new(Vec3::new(0.0, 0.0, -10.0), Lens::default(), ControllerConfig::default())
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_camera_new_looks_down_negative_z() {
    let camera = create_test_camera();
    assert!((camera.position() - Vec3::new(0.0, 0.0, -10.0)).length() < EPS);
    assert!((camera.forward() - Vec3::NEG_Z).length() < EPS);
    assert!((camera.right() - Vec3::X).length() < EPS);
    assert!((camera.up() - Vec3::Y).length() < EPS);
    assert!(!camera.transform().is_dirty());
}

#[test]
fn test_view_matrix_moves_position_to_origin() {
    let camera = create_test_camera();
    let view_space = camera.view_matrix().transform_point3(camera.position());
    assert!(view_space.length() < EPS);

    let ahead = camera.view_matrix().transform_point3(Vec3::new(0.0, 0.0, -20.0));
    assert!((ahead - Vec3::new(0.0, 0.0, -10.0)).length() < EPS);
}

#[test]
fn test_view_projection_is_product() {
    let camera = create_test_camera();
    let expected = camera.projection_matrix() * camera.view_matrix();
    assert!(camera.view_projection_matrix().abs_diff_eq(expected, EPS));
}

// ============================================================================
// Frustum
// ============================================================================

#[test]
fn test_frustum_follows_camera() {
    let mut camera = create_test_camera();
    assert!(camera.frustum().contains_point(Vec3::new(0.0, 0.0, -20.0)));
    assert!(!camera.frustum().contains_point(Vec3::ZERO));

    camera.set_position(Vec3::new(0.0, 0.0, 10.0));
    assert!(camera.frustum().contains_point(Vec3::ZERO));
}

#[test]
fn test_frustum_uses_configured_plane_order() {
    let mut config = Config::default();
    config.culling.plane_order = [
        FrustumPlane::Far,
        FrustumPlane::Top,
        FrustumPlane::Near,
        FrustumPlane::Bottom,
        FrustumPlane::Left,
        FrustumPlane::Right,
    ];

    let camera = Camera::from_config(Vec3::new(0.0, 0.0, -10.0), &config);
    assert_eq!(*camera.frustum().plane_order(), config.culling.plane_order);
    assert_eq!(*create_test_camera().frustum().plane_order(), FrustumPlane::DEFAULT_ORDER);
}

// ============================================================================
// Control
// ============================================================================

#[test]
fn test_key_control_moves_forward() {
    let mut camera = create_test_camera();
    camera.key_control(Movement::FORWARD, 1.0);
    assert!((camera.position() - Vec3::new(0.0, 0.0, -15.0)).length() < EPS);
}

#[test]
fn test_mouse_control_turns() {
    let mut camera = create_test_camera();
    // 900 pixels at 0.1 degrees per pixel = 90 degrees of yaw
    camera.mouse_control(900.0, 0.0);
    assert!((camera.forward() - Vec3::X).length() < EPS);
    assert!((camera.controller().yaw() - 0.0).abs() < EPS);
}

#[test]
fn test_scroll_control_clamps_fov() {
    let mut camera = create_test_camera();
    camera.scroll_control(10.0);
    assert!((camera.lens().fov_degrees - 35.0).abs() < EPS);

    camera.scroll_control(1000.0);
    assert_eq!(camera.lens().fov_degrees, 1.0);

    camera.scroll_control(-1000.0);
    assert_eq!(camera.lens().fov_degrees, 120.0);
}

#[test]
fn test_lens_viewport_size() {
    let mut camera = Camera::default();
    camera.lens_mut().set_viewport_size(1920, 1080);
    assert!((camera.lens().aspect_ratio - 16.0 / 9.0).abs() < EPS);

    camera.lens_mut().set_viewport_size(100, 0);
    assert!((camera.lens().aspect_ratio - 16.0 / 9.0).abs() < EPS);
}

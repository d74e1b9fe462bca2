#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_distance_is_euclidean() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(3.0, 4.0);
    assert!(approx_eq(a.distance(b), 5.0));
}

#[test]
fn point_distance_is_symmetric() {
    let a = Point::new(10.0, -2.0);
    let b = Point::new(-7.5, 30.0);
    assert!(approx_eq(a.distance(b), b.distance(a)));
}

#[test]
fn point_distance_to_self_is_zero() {
    let a = Point::new(12.0, 9.0);
    assert_eq!(a.distance(a), 0.0);
}

#[test]
fn point_deserializes_from_xy_object() {
    let p: Point = serde_json::from_str(r#"{"x": 1.5, "y": -2.0}"#).unwrap();
    assert_eq!(p, Point::new(1.5, -2.0));
}

// --- Viewport ---

#[test]
fn viewport_default_is_empty_with_unit_dpr() {
    let v = Viewport::default();
    assert_eq!(v.width, 0.0);
    assert_eq!(v.height, 0.0);
    assert_eq!(v.dpr, 1.0);
}

// --- PerspectiveCamera ---

#[test]
fn camera_default_planes() {
    let cam = PerspectiveCamera::default();
    assert_eq!(cam.fov_y_degrees, 75.0);
    assert_eq!(cam.near, 0.1);
    assert_eq!(cam.far, 1000.0);
    assert_eq!(cam.aspect, 1.0);
}

#[test]
fn camera_with_fov_keeps_other_defaults() {
    let cam = PerspectiveCamera::with_fov(60.0);
    assert_eq!(cam.fov_y_degrees, 60.0);
    assert_eq!(cam.near, 0.1);
}

#[test]
fn camera_set_viewport_updates_aspect() {
    let mut cam = PerspectiveCamera::default();
    assert!(cam.set_viewport(Viewport { width: 800.0, height: 400.0, dpr: 2.0 }));
    assert!((cam.aspect - 2.0).abs() < 1e-6);
}

#[test]
fn camera_set_viewport_ignores_zero_height() {
    let mut cam = PerspectiveCamera::default();
    cam.set_viewport(Viewport { width: 300.0, height: 600.0, dpr: 1.0 });
    assert!(!cam.set_viewport(Viewport { width: 300.0, height: 0.0, dpr: 1.0 }));
    assert!((cam.aspect - 0.5).abs() < 1e-6);
}

#[test]
fn camera_set_viewport_ignores_zero_width() {
    let mut cam = PerspectiveCamera::default();
    assert!(!cam.set_viewport(Viewport { width: 0.0, height: 600.0, dpr: 1.0 }));
    assert_eq!(cam.aspect, 1.0);
}

#[test]
fn camera_projection_reflects_aspect() {
    let mut cam = PerspectiveCamera::default();
    let square = cam.projection();
    cam.set_viewport(Viewport { width: 200.0, height: 100.0, dpr: 1.0 });
    let wide = cam.projection();
    // Horizontal focal length shrinks as the viewport widens.
    assert!((wide.x_axis.x * 2.0 - square.x_axis.x).abs() < 1e-5);
    assert!((wide.y_axis.y - square.y_axis.y).abs() < 1e-6);
}

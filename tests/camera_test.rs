use cgmath::{Deg, Matrix4, Point3, SquareMatrix, Vector3, Vector4};
use learn_ngin::camera::{CameraUniform, Exposure, Projection, look_at, view_matrix};

use crate::common::test_utils::{assert_close, assert_close_slice};

mod common;

#[test]
fn ortho_zoom_widens_with_aspect() {
    let projection = Projection::ortho_zoom(1.5, 2.0);
    assert_eq!(
        projection,
        Projection::Ortho {
            left: -3.0,
            right: 3.0,
            bottom: -1.5,
            top: 1.5,
            near: 0.0,
            far: 1.0,
        }
    );
}

#[test]
fn ortho_resize_keeps_zoom() {
    let resized = Projection::ortho_zoom(1.5, 800.0 / 600.0).resize(1000, 500);
    assert_eq!(resized, Projection::ortho_zoom(1.5, 2.0));
}

#[test]
fn perspective_resize_only_changes_aspect() {
    let resized = Projection::perspective(45.0, 1.0, 0.1, 100.0).resize(1600, 900);
    let Projection::Perspective {
        fovy,
        aspect,
        near,
        far,
    } = resized
    else {
        panic!("resize changed the projection kind");
    };
    assert_eq!(fovy, Deg(45.0));
    assert_close(aspect, 16.0 / 9.0);
    assert_eq!((near, far), (0.1, 100.0));
}

#[test]
fn ortho_maps_depth_into_wgpu_range() {
    let clip = Projection::ortho_zoom(1.0, 1.0).calc_matrix() * Vector4::new(1.0, 1.0, -0.5, 1.0);
    assert_close_slice(&[clip.x, clip.y, clip.z, clip.w], &[1.0, 1.0, 0.5, 1.0]);
}

#[test]
fn perspective_maps_near_and_far_planes() {
    let projection = Projection::perspective(45.0, 1.0, 0.1, 100.0).calc_matrix();
    let near = projection * Vector4::new(0.0, 0.0, -0.1, 1.0);
    let far = projection * Vector4::new(0.0, 0.0, -100.0, 1.0);
    assert_close(near.z / near.w, 0.0);
    assert_close(far.z / far.w, 1.0);
}

#[test]
fn default_exposure_is_sunny_sixteen() {
    let exposure = Exposure::default();
    assert_eq!(exposure.aperture, 16.0);
    assert_eq!(exposure.shutter_speed, 1.0 / 125.0);
    assert_eq!(exposure.sensitivity, 100.0);
    assert_close(exposure.ev100(), 32000f32.log2());
    assert!((exposure.exposure() - 1.0 / (1.2 * 32000.0)).abs() < 1e-9);
}

#[test]
fn look_at_places_the_camera_at_eye() {
    let eye = Point3::new(0.0, 0.3, 3.0);
    let model = look_at(eye, Point3::new(0.0, 0.0, 0.0), Vector3::unit_y());
    assert_close_slice(&[model.w.x, model.w.y, model.w.z], &[0.0, 0.3, 3.0]);

    let view = view_matrix(&model);
    let at_eye = view * Vector4::new(0.0, 0.3, 3.0, 1.0);
    assert_close_slice(&[at_eye.x, at_eye.y, at_eye.z], &[0.0, 0.0, 0.0]);
}

#[test]
fn uniform_centres_the_target() {
    let mut uniform = CameraUniform::new();
    let model = look_at(
        Point3::new(2.0, 1.0, 5.0),
        Point3::new(0.0, 0.0, -1.0),
        Vector3::unit_y(),
    );
    uniform.update_view_proj(
        &model,
        &Projection::perspective(45.0, 4.0 / 3.0, 0.1, 100.0),
        &Exposure::default(),
    );

    let view_proj = Matrix4::from(uniform.view_proj);
    let target = view_proj * Vector4::new(0.0, 0.0, -1.0, 1.0);
    assert_close(target.x / target.w, 0.0);
    assert_close(target.y / target.w, 0.0);
    assert_close_slice(&uniform.position, &[2.0, 1.0, 5.0, 1.0]);
    assert_close(uniform.exposure[0], Exposure::default().exposure());
}

#[test]
fn post_processing_flag_round_trips() {
    let mut uniform = CameraUniform::new();
    assert!(!uniform.post_processing());
    uniform.set_post_processing(true);
    assert!(uniform.post_processing());
    uniform.set_post_processing(false);
    assert!(!uniform.post_processing());
}

#[test]
fn singular_camera_model_falls_back_to_identity() {
    let singular = Matrix4::from_scale(0.0);
    assert_eq!(view_matrix(&singular), Matrix4::identity());
}

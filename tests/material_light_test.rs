use learn_ngin::{
    EntityAllocator,
    data_structures::{
        light::{Light, LightDesc, LightKind, srgb_to_linear, srgb_to_linear_rgb},
        material::{MaterialUniform, Parameter},
        scene::Viewport,
        texture::{Filter, SamplerDesc, Wrap},
    },
    pipelines::light::LightUniform,
    render::{ClearOptions, Renderer},
};

use crate::common::test_utils::{assert_close, assert_close_slice};

mod common;

#[test]
fn material_defaults_are_dielectric_and_rough() {
    let uniform = MaterialUniform::default();
    assert_eq!(uniform.base_color, [1.0; 4]);
    assert_eq!(uniform.metallic(), 0.0);
    assert_eq!(uniform.roughness(), 1.0);
    assert_eq!(uniform.reflectance(), 0.5);
    assert!(!uniform.has_albedo());
}

#[test]
fn scalar_parameters_are_clamped() {
    let mut uniform = MaterialUniform::default();
    assert!(uniform.apply(&Parameter::Metallic(1.0)));
    assert!(uniform.apply(&Parameter::Roughness(0.4)));
    assert!(uniform.apply(&Parameter::Reflectance(7.0)));
    assert_eq!(uniform.metallic(), 1.0);
    assert_close(uniform.roughness(), 0.4);
    assert_eq!(uniform.reflectance(), 1.0);

    uniform.apply(&Parameter::Metallic(-3.0));
    assert_eq!(uniform.metallic(), 0.0);
}

#[test]
fn base_colour_is_stored_as_given() {
    let mut uniform = MaterialUniform::default();
    uniform.apply(&Parameter::BaseColor([0.8, 0.8, 0.8, 1.0]));
    assert_eq!(uniform.base_color, [0.8, 0.8, 0.8, 1.0]);
}

#[test]
fn sampler_defaults_to_linear_repeat() {
    let sampler = SamplerDesc::default();
    assert_eq!(sampler.min_filter, Filter::Linear);
    assert_eq!(sampler.mag_filter, Filter::Linear);
    assert_eq!(sampler.wrap_s, Wrap::Repeat);

    let clamped = SamplerDesc::linear_clamped();
    assert_eq!(clamped.wrap_s, Wrap::ClampToEdge);
    assert_eq!(clamped.wrap_t, Wrap::ClampToEdge);
    assert_eq!(clamped.mag_filter, Filter::Linear);
    assert_eq!(
        wgpu::AddressMode::from(Wrap::MirroredRepeat),
        wgpu::AddressMode::MirrorRepeat
    );
    assert_eq!(wgpu::FilterMode::from(Filter::Nearest), wgpu::FilterMode::Nearest);
}

#[test]
fn srgb_conversion_matches_reference_points() {
    assert_eq!(srgb_to_linear(0.0), 0.0);
    assert_close(srgb_to_linear(1.0), 1.0);
    assert_close(srgb_to_linear(0.5), 0.21404);
    assert_close(srgb_to_linear(0.04), 0.04 / 12.92);
    assert_close_slice(
        &srgb_to_linear_rgb([0.98, 0.92, 0.89]),
        &[0.955102, 0.827571, 0.767769],
    );
}

#[test]
fn sun_light_uniform_carries_disc_and_intensity() {
    let mut entities = EntityAllocator::new();
    let sun = Light {
        entity: entities.create(),
        desc: LightDesc {
            intensity: 110_000.0,
            direction: [0.0, -2.0, 0.0],
            sun_angular_radius: 1.9,
            ..LightDesc::sun()
        },
    };
    assert_eq!(sun.desc.kind, LightKind::Sun);

    let uniform = LightUniform::from_light(&sun);
    assert_close_slice(&uniform.direction, &[0.0, -1.0, 0.0, 0.0]);
    assert_eq!(uniform.color_intensity[3], 110_000.0);
    assert_close(uniform.sun[0], 1.9f32.to_radians().cos());
    assert_close(uniform.sun[1], 1.9f32.to_radians().sin());
    assert_eq!(uniform.sun[2], 1.0);
    assert_eq!(uniform.sun[3], 1.0);
}

#[test]
fn directional_light_has_no_sun_disc() {
    let mut entities = EntityAllocator::new();
    let light = Light {
        entity: entities.create(),
        desc: LightDesc::default(),
    };
    let uniform = LightUniform::from_light(&light);
    assert_eq!(uniform.sun[2], 0.0);
    assert_eq!(uniform.sun[3], 1.0);
}

#[test]
fn degenerate_direction_points_down() {
    let desc = LightDesc {
        direction: [0.0; 3],
        ..Default::default()
    };
    let direction = desc.normalized_direction();
    assert_close_slice(&[direction.x, direction.y, direction.z], &[0.0, -1.0, 0.0]);
}

#[test]
fn scenes_without_light_are_dark() {
    let dark = LightUniform::default();
    assert_eq!(dark, LightUniform::dark());
    assert_eq!(dark.color_intensity, [0.0; 4]);
    assert_eq!(dark.sun[3], 0.0);
}

#[test]
fn skybox_wins_over_clear_colour() {
    let mut renderer = Renderer::default();
    let sky = wgpu::Color {
        r: 0.1,
        g: 0.125,
        b: 0.25,
        a: 1.0,
    };
    assert_eq!(renderer.clear_color(None), wgpu::Color::BLACK);
    assert_eq!(renderer.clear_color(Some(sky)), sky);

    renderer.clear_options = ClearOptions {
        clear_color: wgpu::Color::RED,
        clear: true,
    };
    assert_eq!(renderer.clear_color(None), wgpu::Color::RED);

    renderer.clear_options.clear = false;
    assert_eq!(renderer.clear_color(None), wgpu::Color::TRANSPARENT);
    assert_eq!(renderer.clear_color(Some(sky)), sky);
    assert_eq!(renderer.frame_count(), 0);
}

#[test]
fn viewport_aspect_tolerates_zero_height() {
    assert_close(Viewport::new(800, 600).aspect(), 4.0 / 3.0);
    assert!(Viewport::new(800, 0).is_empty());
    assert_eq!(Viewport::new(800, 0).aspect(), 800.0);
}

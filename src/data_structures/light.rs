//! Light components.

use cgmath::{InnerSpace, Vector3};

use crate::entity::Entity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    /// Directional light drawn with a sun disc in specular highlights.
    Sun,
    Directional,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightDesc {
    pub kind: LightKind,
    /// Linear RGB.
    pub color: [f32; 3],
    /// Illuminance in lux.
    pub intensity: f32,
    pub direction: [f32; 3],
    /// Angular radius of the sun disc in degrees.
    pub sun_angular_radius: f32,
    pub cast_shadows: bool,
}

impl Default for LightDesc {
    fn default() -> Self {
        Self {
            kind: LightKind::Directional,
            color: [1.0; 3],
            intensity: 100_000.0,
            direction: [0.0, -1.0, 0.0],
            sun_angular_radius: 0.545,
            cast_shadows: false,
        }
    }
}

impl LightDesc {
    pub fn sun() -> Self {
        Self {
            kind: LightKind::Sun,
            ..Default::default()
        }
    }

    /// Unit vector the light travels along. Degenerate input points straight
    /// down.
    pub fn normalized_direction(&self) -> Vector3<f32> {
        let direction = Vector3::from(self.direction);
        if direction.magnitude2() <= f32::EPSILON {
            return -Vector3::unit_y();
        }
        direction.normalize()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Light {
    pub entity: Entity,
    pub desc: LightDesc,
}

/// sRGB encoded component to linear.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn srgb_to_linear_rgb(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(srgb_to_linear)
}

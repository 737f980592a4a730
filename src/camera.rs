//! Cameras, projections and the camera uniform.
//!
//! A [`Camera`] is a component attached to an entity. It owns a projection and
//! physical exposure settings; its model matrix (camera-to-world) is the
//! transform of its entity. Each frame the renderer turns both into a
//! [`CameraUniform`].

use cgmath::{Deg, Matrix4, Point3, SquareMatrix, Vector3};

use crate::entity::Entity;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    Ortho {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    Perspective {
        /// Vertical field of view.
        fovy: Deg<f32>,
        aspect: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    /// Orthographic box that keeps `zoom` world units above and below the
    /// centre and widens horizontally with the aspect ratio.
    pub fn ortho_zoom(zoom: f32, aspect: f32) -> Self {
        Projection::Ortho {
            left: -aspect * zoom,
            right: aspect * zoom,
            bottom: -zoom,
            top: zoom,
            near: 0.0,
            far: 1.0,
        }
    }

    pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        Projection::Perspective {
            fovy: Deg(fovy),
            aspect,
            near,
            far,
        }
    }

    /// Same projection adapted to a new viewport.
    pub fn resize(&self, width: u32, height: u32) -> Self {
        let aspect = width as f32 / height.max(1) as f32;
        match *self {
            Projection::Ortho {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => {
                let zoom = (top - bottom) / 2.0;
                let centre = (left + right) / 2.0;
                Projection::Ortho {
                    left: centre - aspect * zoom,
                    right: centre + aspect * zoom,
                    bottom,
                    top,
                    near,
                    far,
                }
            }
            Projection::Perspective {
                fovy, near, far, ..
            } => Projection::Perspective {
                fovy,
                aspect,
                near,
                far,
            },
        }
    }

    /// Clip-space matrix for wgpu's `[0, 1]` depth range.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        let gl = match *self {
            Projection::Ortho {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => cgmath::ortho(left, right, bottom, top, near, far),
            Projection::Perspective {
                fovy,
                aspect,
                near,
                far,
            } => cgmath::perspective(fovy, aspect, near, far),
        };
        OPENGL_TO_WGPU_MATRIX * gl
    }
}

/// Physical camera settings, defaulting to f/16, 1/125 s, ISO 100.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Exposure {
    pub aperture: f32,
    pub shutter_speed: f32,
    pub sensitivity: f32,
}

impl Default for Exposure {
    fn default() -> Self {
        Self {
            aperture: 16.0,
            shutter_speed: 1.0 / 125.0,
            sensitivity: 100.0,
        }
    }
}

impl Exposure {
    pub fn ev100(&self) -> f32 {
        ((self.aperture * self.aperture) / self.shutter_speed * 100.0 / self.sensitivity).log2()
    }

    /// Scale from photometric units (lux) to the normalised range the shaders
    /// work in.
    pub fn exposure(&self) -> f32 {
        1.0 / (1.2 * 2f32.powf(self.ev100()))
    }
}

#[derive(Debug)]
pub struct Camera {
    pub entity: Entity,
    pub projection: Projection,
    pub exposure: Exposure,
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

impl Camera {
    pub fn uniform(&self, model: &Matrix4<f32>, post_processing: bool) -> CameraUniform {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(model, &self.projection, &self.exposure);
        uniform.set_post_processing(post_processing);
        uniform
    }
}

/// Camera-to-world transform of a camera at `eye` looking at `target`.
pub fn look_at(eye: Point3<f32>, target: Point3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    view_matrix(&Matrix4::look_at_rh(eye, target, up))
}

pub fn view_matrix(model: &Matrix4<f32>) -> Matrix4<f32> {
    model.invert().unwrap_or_else(|| {
        log::warn!("camera model matrix is not invertible, using identity");
        Matrix4::identity()
    })
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
    // x: exposure, y: post-processing flag
    pub exposure: [f32; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::identity().into(),
            position: [0.0, 0.0, 0.0, 1.0],
            exposure: [1.0, 0.0, 0.0, 0.0],
        }
    }

    pub fn update_view_proj(
        &mut self,
        model: &Matrix4<f32>,
        projection: &Projection,
        exposure: &Exposure,
    ) {
        self.view_proj = (projection.calc_matrix() * view_matrix(model)).into();
        self.position = model.w.into();
        self.exposure[0] = exposure.exposure();
    }

    pub fn set_post_processing(&mut self, enabled: bool) {
        self.exposure[1] = if enabled { 1.0 } else { 0.0 };
    }

    pub fn post_processing(&self) -> bool {
        self.exposure[1] > 0.5
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

//! Materials and material instances.
//!
//! A [`Material`] is a compiled shader package: one WGSL module turned into
//! render pipelines for a single vertex layout. A [`MaterialInstance`] carries
//! the parameter values and textures a renderable is drawn with. Every material
//! owns a default instance.

use crate::{
    data_structures::{texture::SamplerDesc, vertex::VertexLayout},
    pipelines::MaterialPackage,
    teardown::Handle,
};

use super::texture::Texture;

/// Parameters every material accepts. Unused ones are ignored by the shader.
#[derive(Clone, Copy, Debug)]
pub enum Parameter {
    /// Linear RGBA multiplier for the vertex colour or albedo texture.
    BaseColor([f32; 4]),
    Metallic(f32),
    /// Perceptual roughness.
    Roughness(f32),
    Reflectance(f32),
    Albedo(Handle<Texture>, SamplerDesc),
}

#[derive(Clone, Copy, Debug)]
pub struct MaterialDesc<'a> {
    pub label: &'a str,
    pub package: &'static MaterialPackage,
    pub layout: VertexLayout,
    /// Build the pipelines that read a morph target buffer in vertex slot 1.
    pub morphing: bool,
}

#[derive(Debug)]
pub struct Material {
    pub label: String,
    pub package: &'static MaterialPackage,
    pub layout: VertexLayout,
    pub morphing: bool,
    pub(crate) culled: wgpu::RenderPipeline,
    pub(crate) unculled: wgpu::RenderPipeline,
    pub(crate) default_instance: Option<Handle<MaterialInstance>>,
}

impl Material {
    pub(crate) fn pipeline(&self, culling: bool) -> &wgpu::RenderPipeline {
        if culling {
            &self.culled
        } else {
            &self.unculled
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    // metallic, roughness, reflectance, has albedo texture
    pub params: [f32; 4],
}

impl Default for MaterialUniform {
    fn default() -> Self {
        Self {
            base_color: [1.0; 4],
            params: [0.0, 1.0, 0.5, 0.0],
        }
    }
}

impl MaterialUniform {
    pub fn metallic(&self) -> f32 {
        self.params[0]
    }

    pub fn roughness(&self) -> f32 {
        self.params[1]
    }

    pub fn reflectance(&self) -> f32 {
        self.params[2]
    }

    pub fn has_albedo(&self) -> bool {
        self.params[3] > 0.5
    }

    /// Apply a scalar or colour parameter. Returns `false` for texture
    /// parameters, which need a new bind group instead of a buffer write.
    pub fn apply(&mut self, parameter: &Parameter) -> bool {
        match *parameter {
            Parameter::BaseColor(color) => self.base_color = color,
            Parameter::Metallic(v) => self.params[0] = v.clamp(0.0, 1.0),
            Parameter::Roughness(v) => self.params[1] = v.clamp(0.0, 1.0),
            Parameter::Reflectance(v) => self.params[2] = v.clamp(0.0, 1.0),
            Parameter::Albedo(..) => {
                self.params[3] = 1.0;
                return false;
            }
        }
        true
    }
}

#[derive(Debug)]
pub struct MaterialInstance {
    pub material: Handle<Material>,
    pub(crate) uniform: MaterialUniform,
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) albedo: Option<(Handle<Texture>, SamplerDesc)>,
}

impl MaterialInstance {
    pub fn uniform(&self) -> &MaterialUniform {
        &self.uniform
    }

    pub fn albedo(&self) -> Option<(Handle<Texture>, SamplerDesc)> {
        self.albedo
    }
}

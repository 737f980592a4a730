//! Renderable components.

use cgmath::{Matrix4, SquareMatrix};

use crate::{
    data_structures::{
        geometry::{Aabb, IndexBuffer, MorphTargetBuffer, VertexBuffer},
        material::MaterialInstance,
        vertex::MAX_MORPH_TARGETS,
    },
    entity::Entity,
    teardown::Handle,
};

/// One indexed draw of a renderable.
#[derive(Clone, Copy, Debug)]
pub struct Primitive {
    pub vertices: Handle<VertexBuffer>,
    pub indices: Handle<IndexBuffer>,
    pub material: Handle<MaterialInstance>,
    /// First index to draw.
    pub offset: u32,
    /// Number of indices to draw. `None` draws to the end of the index buffer.
    pub count: Option<u32>,
}

impl Primitive {
    pub fn new(
        vertices: Handle<VertexBuffer>,
        indices: Handle<IndexBuffer>,
        material: Handle<MaterialInstance>,
    ) -> Self {
        Self {
            vertices,
            indices,
            material,
            offset: 0,
            count: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderableDesc {
    pub bounding_box: Aabb,
    pub primitives: Vec<Primitive>,
    /// Back-face culling.
    pub culling: bool,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
    pub morph_targets: Option<Handle<MorphTargetBuffer>>,
}

impl Default for RenderableDesc {
    fn default() -> Self {
        Self {
            bounding_box: Aabb::default(),
            primitives: Vec::new(),
            culling: true,
            cast_shadows: false,
            receive_shadows: false,
            morph_targets: None,
        }
    }
}

impl RenderableDesc {
    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitives.push(primitive);
        self
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderableUniform {
    pub model: [[f32; 4]; 4],
    pub morph_weights: [f32; MAX_MORPH_TARGETS],
}

impl Default for RenderableUniform {
    fn default() -> Self {
        Self {
            model: Matrix4::identity().into(),
            morph_weights: [0.0; MAX_MORPH_TARGETS],
        }
    }
}

#[derive(Debug)]
pub struct Renderable {
    pub entity: Entity,
    pub bounding_box: Aabb,
    pub primitives: Vec<Primitive>,
    pub culling: bool,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
    pub morph_targets: Option<Handle<MorphTargetBuffer>>,
    pub(crate) morph_weights: [f32; MAX_MORPH_TARGETS],
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

impl Renderable {
    pub fn morph_weights(&self) -> &[f32; MAX_MORPH_TARGETS] {
        &self.morph_weights
    }

    pub(crate) fn uniform(&self, model: &Matrix4<f32>) -> RenderableUniform {
        RenderableUniform {
            model: (*model).into(),
            morph_weights: self.morph_weights,
        }
    }
}

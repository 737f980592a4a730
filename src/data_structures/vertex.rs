//! Vertex formats understood by the built-in materials.
//!
//! Strides match the classic tutorial layouts: 12 bytes for a 2D coloured
//! vertex, 16 for 3D coloured, 20 for position + UV and 32 for mesh files.

/// Pack a colour so its bytes land in memory as `r, g, b, a`, which is what
/// the `Unorm8x4` colour attribute expects.
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (a as u32) << 24 | (b as u32) << 16 | (g as u32) << 8 | r as u32
}

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex2 {
    pub position: [f32; 2],
    pub color: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex3 {
    pub position: [f32; 3],
    pub color: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Up to this many morph targets can be blended on one renderable.
pub const MAX_MORPH_TARGETS: usize = 4;

/// Per-vertex morph target positions, one slot per target. Unused slots are
/// zero.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MorphVertex {
    pub positions: [[f32; 3]; MAX_MORPH_TARGETS],
}

const COLOR2_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Unorm8x4];
const COLOR3_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Unorm8x4];
const TEXTURED_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];
const MESH_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];
const MORPH_ATTRIBUTES: [wgpu::VertexAttribute; MAX_MORPH_TARGETS] =
    wgpu::vertex_attr_array![8 => Float32x3, 9 => Float32x3, 10 => Float32x3, 11 => Float32x3];

impl Vertex for ColorVertex2 {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &COLOR2_ATTRIBUTES,
        }
    }
}

impl Vertex for ColorVertex3 {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &COLOR3_ATTRIBUTES,
        }
    }
}

impl Vertex for TexturedVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &TEXTURED_ATTRIBUTES,
        }
    }
}

impl Vertex for MeshVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &MESH_ATTRIBUTES,
        }
    }
}

impl Vertex for MorphVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &MORPH_ATTRIBUTES,
        }
    }
}

/// Runtime tag for the vertex format stored in a vertex buffer and expected by
/// a material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexLayout {
    Color2D,
    Color3D,
    Textured,
    Mesh,
}

impl VertexLayout {
    pub fn stride(&self) -> usize {
        self.desc().array_stride as usize
    }

    pub fn desc(&self) -> wgpu::VertexBufferLayout<'static> {
        match self {
            VertexLayout::Color2D => ColorVertex2::desc(),
            VertexLayout::Color3D => ColorVertex3::desc(),
            VertexLayout::Textured => TexturedVertex::desc(),
            VertexLayout::Mesh => MeshVertex::desc(),
        }
    }

    /// Vertex shader entry point a material package must export for this
    /// layout.
    pub fn entry_point(&self, morphing: bool) -> &'static str {
        match (self, morphing) {
            (VertexLayout::Color2D, false) => "vs_color2d",
            (VertexLayout::Color2D, true) => "vs_color2d_morph",
            (VertexLayout::Color3D, false) => "vs_color3d",
            (VertexLayout::Color3D, true) => "vs_color3d_morph",
            (VertexLayout::Textured, false) => "vs_textured",
            (VertexLayout::Textured, true) => "vs_textured_morph",
            (VertexLayout::Mesh, false) => "vs_mesh",
            (VertexLayout::Mesh, true) => "vs_mesh_morph",
        }
    }
}

//! GPU geometry: vertex, index and morph target buffers.

use cgmath::Point3;

use crate::{
    data_structures::vertex::{MAX_MORPH_TARGETS, MorphVertex, VertexLayout},
    error::{DemoError, InitStage, Result},
};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Smallest box containing every point. An empty input gives a degenerate
    /// box at the origin.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a [f32; 3]>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::new([0.0; 3], [0.0; 3]);
        };
        points.fold(Self::new(*first, *first), |mut aabb, p| {
            aabb.min.x = aabb.min.x.min(p[0]);
            aabb.min.y = aabb.min.y.min(p[1]);
            aabb.min.z = aabb.min.z.min(p[2]);
            aabb.max.x = aabb.max.x.max(p[0]);
            aabb.max.y = aabb.max.y.max(p[1]);
            aabb.max.z = aabb.max.z.max(p[2]);
            aabb
        })
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new([-1.0; 3], [1.0; 3])
    }
}

#[derive(Clone, Copy, Debug)]
pub struct VertexBufferDesc<'a> {
    pub label: &'a str,
    pub layout: VertexLayout,
    pub vertex_count: u32,
    pub data: &'a [u8],
}

impl<'a> VertexBufferDesc<'a> {
    /// Describe a slice of vertices stored with `layout`.
    pub fn new<V: bytemuck::Pod>(label: &'a str, layout: VertexLayout, vertices: &'a [V]) -> Self {
        Self {
            label,
            layout,
            vertex_count: vertices.len() as u32,
            data: bytemuck::cast_slice(vertices),
        }
    }
}

#[derive(Debug)]
pub struct VertexBuffer {
    pub(crate) buffer: wgpu::Buffer,
    pub layout: VertexLayout,
    pub vertex_count: u32,
}

impl VertexBuffer {
    pub(crate) fn validate(desc: &VertexBufferDesc) -> Result<()> {
        let expected = desc.vertex_count as usize * desc.layout.stride();
        if desc.data.len() != expected {
            return Err(DemoError::init(
                InitStage::Renderable,
                format!(
                    "vertex buffer {} expects {} bytes ({} x {:?}), got {}",
                    desc.label,
                    expected,
                    desc.vertex_count,
                    desc.layout,
                    desc.data.len()
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Indices<'a> {
    U16(&'a [u16]),
    U32(&'a [u32]),
}

impl Indices<'_> {
    pub fn len(&self) -> usize {
        match self {
            Indices::U16(i) => i.len(),
            Indices::U32(i) => i.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn format(&self) -> wgpu::IndexFormat {
        match self {
            Indices::U16(_) => wgpu::IndexFormat::Uint16,
            Indices::U32(_) => wgpu::IndexFormat::Uint32,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Indices::U16(i) => bytemuck::cast_slice(i),
            Indices::U32(i) => bytemuck::cast_slice(i),
        }
    }
}

#[derive(Debug)]
pub struct IndexBuffer {
    pub(crate) buffer: wgpu::Buffer,
    pub format: wgpu::IndexFormat,
    pub index_count: u32,
}

/// Per-vertex position deltas for up to [`MAX_MORPH_TARGETS`] targets.
///
/// The CPU copy is kept so individual targets can be replaced and the whole
/// buffer re-uploaded.
#[derive(Debug)]
pub struct MorphTargetBuffer {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) vertices: Vec<MorphVertex>,
    pub count: usize,
}

impl MorphTargetBuffer {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Write the deltas of `target` into the CPU copy.
    pub(crate) fn set_positions(&mut self, target: usize, positions: &[[f32; 3]]) -> Result<()> {
        if target >= self.count {
            return Err(DemoError::init(
                InitStage::Renderable,
                format!("morph target {target} out of range (count {})", self.count),
            ));
        }
        if positions.len() != self.vertices.len() {
            return Err(DemoError::init(
                InitStage::Renderable,
                format!(
                    "morph target {target} has {} positions, buffer has {} vertices",
                    positions.len(),
                    self.vertices.len()
                ),
            ));
        }
        self.vertices
            .iter_mut()
            .zip(positions)
            .for_each(|(vertex, p)| vertex.positions[target] = *p);
        Ok(())
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub(crate) fn validate_count(count: usize) -> Result<()> {
        if count == 0 || count > MAX_MORPH_TARGETS {
            return Err(DemoError::init(
                InitStage::Renderable,
                format!("morph target count must be 1..={MAX_MORPH_TARGETS}, got {count}"),
            ));
        }
        Ok(())
    }
}

//! Loading meshes and textures from files and turning them into engine objects.

use std::path::Path;

use crate::{
    data_structures::{
        geometry::{IndexBuffer, Indices, VertexBuffer, VertexBufferDesc},
        material::MaterialInstance,
        renderable::{Primitive, Renderable, RenderableDesc},
        vertex::VertexLayout,
    },
    engine::Engine,
    entity::{Entity, EntityAllocator},
    error::{DemoError, Result},
    teardown::Handle,
};

pub mod mesh;
pub mod texture;

use mesh::MeshData;

pub async fn load_binary(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| DemoError::asset(path, e))
}

/// A mesh uploaded to the GPU and attached to its own entity.
#[derive(Clone, Copy, Debug)]
pub struct Mesh {
    pub entity: Entity,
    pub renderable: Handle<Renderable>,
    pub vertex_buffer: Handle<VertexBuffer>,
    pub index_buffer: Handle<IndexBuffer>,
}

/// Upload `data` and create a renderable drawing it with `material`.
pub fn create_mesh(
    engine: &mut Engine,
    entities: &mut EntityAllocator,
    label: &str,
    data: &MeshData,
    material: Handle<MaterialInstance>,
) -> Result<Mesh> {
    let vertex_buffer =
        engine.create_vertex_buffer(VertexBufferDesc::new(label, VertexLayout::Mesh, &data.vertices))?;
    let index_buffer = engine.create_index_buffer(label, Indices::U32(&data.indices))?;
    let entity = entities.create();
    let renderable = engine.create_renderable(
        entity,
        RenderableDesc {
            bounding_box: data.bounds(),
            ..Default::default()
        }
        .with_primitive(Primitive::new(vertex_buffer, index_buffer, material)),
    )?;
    Ok(Mesh {
        entity,
        renderable,
        vertex_buffer,
        index_buffer,
    })
}

/// Read a mesh container file and create a renderable for it.
pub async fn load_mesh(
    engine: &mut Engine,
    entities: &mut EntityAllocator,
    path: &Path,
    material: Handle<MaterialInstance>,
) -> Result<Mesh> {
    let bytes = load_binary(path).await?;
    let data = mesh::parse_mesh(&bytes, path)?;
    log::info!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        data.vertices.len(),
        data.triangle_count()
    );
    create_mesh(engine, entities, &path.display().to_string(), &data, material)
}

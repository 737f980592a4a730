//! Mesh container parsing.
//!
//! Wavefront OBJ files go through `tobj`, binary glTF through `gltf`. Either
//! way the result is a single indexed triangle list in [`MeshData`]; multiple
//! objects or primitives in one file are concatenated.

use std::{
    io::{BufReader, Cursor},
    path::Path,
};

use cgmath::{InnerSpace, Vector3};

use crate::{
    data_structures::{geometry::Aabb, vertex::MeshVertex},
    error::{DemoError, Result},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Gltf,
}

impl MeshFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "obj" => Some(MeshFormat::Obj),
            "glb" | "gltf" => Some(MeshFormat::Gltf),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Concatenate one object or primitive. Its indices must stay within its
    /// own vertices.
    fn append(
        &mut self,
        vertices: Vec<MeshVertex>,
        indices: impl IntoIterator<Item = u32>,
        path: &Path,
    ) -> Result<()> {
        let base = self.vertices.len() as u32;
        let count = vertices.len();
        let mut shifted = Vec::new();
        for index in indices {
            if index as usize >= count {
                return Err(DemoError::asset(
                    path,
                    format!("index {index} out of range for {count} vertices"),
                ));
            }
            shifted.push(index + base);
        }
        self.vertices.extend(vertices);
        self.indices.extend(shifted);
        Ok(())
    }

    /// Area weighted vertex normals, for files that ship without any.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vector3::new(0.0f32, 0.0, 0.0); self.vertices.len()];
        for c in self.indices.chunks_exact(3) {
            let [a, b, d] = [c[0] as usize, c[1] as usize, c[2] as usize];
            let p0 = Vector3::from(self.vertices[a].position);
            let p1 = Vector3::from(self.vertices[b].position);
            let p2 = Vector3::from(self.vertices[d].position);
            let face = (p1 - p0).cross(p2 - p0);
            normals[a] += face;
            normals[b] += face;
            normals[d] += face;
        }
        for (vertex, normal) in self.vertices.iter_mut().zip(normals) {
            if normal.magnitude2() > 0.0 {
                vertex.normal = normal.normalize().into();
            }
        }
    }

    fn validate(self, path: &Path) -> Result<Self> {
        if self.indices.is_empty() {
            return Err(DemoError::asset(path, "mesh contains no triangles"));
        }
        if let Some(bad) = self
            .indices
            .iter()
            .find(|i| **i as usize >= self.vertices.len())
        {
            return Err(DemoError::asset(
                path,
                format!("index {bad} out of range for {} vertices", self.vertices.len()),
            ));
        }
        Ok(self)
    }
}

/// Parse a whole mesh file held in memory. `path` is used for format
/// detection and error messages only.
pub fn parse_mesh(bytes: &[u8], path: &Path) -> Result<MeshData> {
    let format = MeshFormat::from_path(path)
        .ok_or_else(|| DemoError::asset(path, "unknown mesh format"))?;
    let mesh = match format {
        MeshFormat::Obj => parse_obj(bytes, path)?,
        MeshFormat::Gltf => parse_gltf(bytes, path)?,
    };
    mesh.validate(path)
}

pub fn parse_obj(bytes: &[u8], path: &Path) -> Result<MeshData> {
    let mut reader = BufReader::new(Cursor::new(bytes));
    // materials are set up by the caller, referenced .mtl files are ignored
    let (models, _) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Ok(Default::default()),
    )
    .map_err(|e| DemoError::asset(path, e))?;

    let mut data = MeshData::default();
    let mut missing_normals = false;
    for m in &models {
        let mesh = &m.mesh;
        missing_normals |= mesh.normals.is_empty();
        let vertices = (0..mesh.positions.len() / 3)
            .map(|i| MeshVertex {
                position: [
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ],
                normal: [
                    mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                    mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                    mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                ],
                // OBJ has v pointing up, textures are stored top row first
                uv: [
                    mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                    1.0 - mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                ],
            })
            .collect();
        data.append(vertices, mesh.indices.iter().copied(), path)?;
    }
    if missing_normals {
        log::debug!("{} has no normals, computing them", path.display());
        data.compute_normals();
    }
    Ok(data)
}

pub fn parse_gltf(bytes: &[u8], path: &Path) -> Result<MeshData> {
    let (document, buffers, _) =
        gltf::import_slice(bytes).map_err(|e| DemoError::asset(path, e))?;

    let mut data = MeshData::default();
    let mut missing_normals = false;
    for mesh in document.meshes() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "{}: skipping {:?} primitive of mesh {}",
                    path.display(),
                    primitive.mode(),
                    mesh.index()
                );
                continue;
            }
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let mut vertices: Vec<MeshVertex> = positions
                .map(|position| MeshVertex {
                    position,
                    ..Default::default()
                })
                .collect();
            match reader.read_normals() {
                Some(normals) => vertices
                    .iter_mut()
                    .zip(normals)
                    .for_each(|(v, n)| v.normal = n),
                None => missing_normals = true,
            }
            if let Some(uvs) = reader.read_tex_coords(0) {
                vertices
                    .iter_mut()
                    .zip(uvs.into_f32())
                    .for_each(|(v, uv)| v.uv = uv);
            }
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertices.len() as u32).collect(),
            };
            data.append(vertices, indices, path)?;
        }
    }
    if missing_normals {
        data.compute_normals();
    }
    Ok(data)
}

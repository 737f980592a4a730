//! Built-in shader packages and pipeline construction.
//!
//! Every package is a single WGSL module embedded at build time. Vertex entry
//! points are named after the vertex layout they consume (see
//! [`VertexLayout::entry_point`](crate::data_structures::vertex::VertexLayout::entry_point));
//! the fragment entry point is `fs_main`.
//!
//! All packages share one pipeline layout:
//!
//! | group | contents |
//! |---|---|
//! | 0 | camera uniform |
//! | 1 | material uniform, albedo texture, sampler |
//! | 2 | renderable uniform (model matrix, morph weights) |
//! | 3 | scene light uniform |

pub mod basic;
pub mod light;

#[derive(Debug, PartialEq, Eq)]
pub struct MaterialPackage {
    pub name: &'static str,
    pub source: &'static str,
}

/// Vertex colour passed straight through. Supports morphing.
pub static BAKED_COLOR: MaterialPackage = MaterialPackage {
    name: "baked_color",
    source: include_str!("baked_color.wgsl"),
};

/// Albedo texture times base colour, no lighting.
pub static BAKED_TEXTURE: MaterialPackage = MaterialPackage {
    name: "baked_texture",
    source: include_str!("baked_texture.wgsl"),
};

/// Metallic-roughness shading under the scene's directional light.
pub static LIT: MaterialPackage = MaterialPackage {
    name: "lit",
    source: include_str!("lit.wgsl"),
};

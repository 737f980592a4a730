//! Engine data structures.
//!
//! - `vertex` holds the vertex formats and their wgpu layouts
//! - `geometry` holds vertex, index and morph target buffers
//! - `texture` wraps GPU textures and sampler descriptions
//! - `material` holds shader packages compiled for a layout and their instances
//! - `renderable` is the drawable component attached to entities
//! - `light` is the light component
//! - `scene` contains scenes, views and skyboxes

pub mod geometry;
pub mod light;
pub mod material;
pub mod renderable;
pub mod scene;
pub mod texture;
pub mod vertex;

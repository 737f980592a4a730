//! learn-ngin
//!
//! A small retained-mode rendering engine and the tutorial demos built on it.
//! Each demo is a standalone program that opens a window, assembles a scene
//! through the [`engine::Engine`] and animates it until the window is closed.
//!
//! High-level modules
//! - `engine`: GPU device, queue and every object created through them
//! - `flow`: lifecycle driver, the [`flow::Demo`] trait and the event loop
//! - `teardown`: handles and the reverse-order resource stack
//! - `camera`: projections, exposure and camera uniforms
//! - `data_structures`: vertex formats, buffers, materials, renderables, scenes
//! - `pipelines`: shader packages and pipeline/bind group construction
//! - `resources`: mesh and texture files
//! - `animation`: time driven transforms and morph weights
//! - `render`, `swap_chain`: per-frame state and render targets
//!

pub mod animation;
pub mod camera;
pub mod config;
pub mod data_structures;
pub mod engine;
pub mod entity;
pub mod error;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod swap_chain;
pub mod teardown;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use config::DemoConfig;
pub use engine::Engine;
pub use entity::{Entity, EntityAllocator};
pub use error::{DemoError, InitStage, Result};
pub use flow::{Demo, Setup, Stage, launch};
pub use teardown::{Handle, ResourceStack};
pub use wgpu;

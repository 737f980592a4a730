//! Scenes, views and skyboxes.
//!
//! A [`Scene`] is a flat list of entities plus an optional skybox. A [`View`]
//! ties a scene to a camera and a viewport; the renderer draws views.

use crate::{entity::Entity, teardown::Handle};

/// Solid colour background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Skybox {
    pub color: wgpu::Color,
}

#[derive(Debug)]
pub struct Scene {
    pub(crate) entities: Vec<Entity>,
    pub skybox: Option<Handle<Skybox>>,
    pub(crate) light_buffer: wgpu::Buffer,
    pub(crate) light_bind_group: wgpu::BindGroup,
}

impl Scene {
    /// Adding the same entity twice is a no-op.
    pub fn add_entity(&mut self, entity: Entity) {
        if !self.entities.contains(&entity) {
            self.entities.push(entity);
        }
    }

    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        let before = self.entities.len();
        self.entities.retain(|e| *e != entity);
        before != self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

/// Pixel rectangle a view renders into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub left: u32,
    pub bottom: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            bottom: 0,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Clone, Copy, Debug)]
pub struct View {
    pub scene: Option<Handle<Scene>>,
    pub camera: Option<Entity>,
    pub viewport: Viewport,
    /// Tone mapping in the lit material. Unlit materials ignore it.
    pub post_processing: bool,
}

impl Default for View {
    fn default() -> Self {
        Self {
            scene: None,
            camera: None,
            viewport: Viewport::default(),
            post_processing: true,
        }
    }
}

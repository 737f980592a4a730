//! Renderer settings and the per-frame state.

use crate::{swap_chain::SwapChain, teardown::Handle};

/// What the renderer does with the colour buffer before drawing a view
/// without a skybox.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClearOptions {
    pub clear_color: wgpu::Color,
    pub clear: bool,
}

impl Default for ClearOptions {
    fn default() -> Self {
        Self {
            clear_color: wgpu::Color::BLACK,
            clear: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct Renderer {
    pub clear_options: ClearOptions,
    pub(crate) frames: u64,
}

impl Renderer {
    /// Frames submitted so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Colour a view is cleared to. A skybox colour wins over the clear
    /// options; with clearing disabled the buffer is still cleared to
    /// transparent black since nothing else initialises it.
    pub fn clear_color(&self, skybox: Option<wgpu::Color>) -> wgpu::Color {
        match skybox {
            Some(color) => color,
            None if self.clear_options.clear => self.clear_options.clear_color,
            None => wgpu::Color::TRANSPARENT,
        }
    }
}

/// A frame between `begin_frame` and `end_frame`.
pub(crate) struct Frame {
    pub(crate) swap_chain: Handle<SwapChain>,
    pub(crate) renderer: Handle<Renderer>,
    pub(crate) surface_texture: Option<wgpu::SurfaceTexture>,
    pub(crate) view: wgpu::TextureView,
    pub(crate) encoder: wgpu::CommandEncoder,
    /// The first view drawn clears the target, later ones load it.
    pub(crate) cleared: bool,
}

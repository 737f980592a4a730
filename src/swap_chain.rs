//! Render targets.
//!
//! A [`SwapChain`] is either bound to a window surface or is an offscreen
//! texture whose pixels can be read back. Both carry a matching depth buffer.

use crate::{
    data_structures::texture::Texture,
    error::{DemoError, InitStage, Result},
};

/// Colour format of headless swap chains.
pub const HEADLESS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

#[derive(Debug)]
pub enum Target {
    Surface {
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    },
    Headless {
        texture: wgpu::Texture,
    },
}

#[derive(Debug)]
pub struct SwapChain {
    pub(crate) target: Target,
    pub(crate) depth: Texture,
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
}

impl SwapChain {
    pub fn is_headless(&self) -> bool {
        matches!(self.target, Target::Headless { .. })
    }

    pub(crate) fn surface(
        device: &wgpu::Device,
        adapter: &wgpu::Adapter,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let surface_caps = surface.get_capabilities(adapter);
        if surface_caps.formats.is_empty() {
            return Err(DemoError::init(
                InitStage::SwapChain,
                "surface is not supported by the adapter",
            ));
        }
        // Shaders output linear colour and rely on an sRGB target for encoding.
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(device, &config);
        let depth = Texture::create_depth_texture(device, [config.width, config.height], "depth_texture");
        Ok(Self {
            width: config.width,
            height: config.height,
            target: Target::Surface { surface, config },
            depth,
            format,
        })
    }

    pub(crate) fn headless(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("headless swap chain"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: HEADLESS_FORMAT,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth = Texture::create_depth_texture(device, [size.width, size.height], "depth_texture");
        Self {
            target: Target::Headless { texture },
            depth,
            format: HEADLESS_FORMAT,
            width: size.width,
            height: size.height,
        }
    }

    /// Zero sized requests are ignored (minimised windows report 0x0).
    pub(crate) fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("ignoring swap chain resize to {width}x{height}");
            return;
        }
        if self.is_headless() {
            *self = Self::headless(device, width, height);
            return;
        }
        if let Target::Surface { surface, config } = &mut self.target {
            config.width = width;
            config.height = height;
            surface.configure(device, config);
        }
        self.width = width;
        self.height = height;
        self.depth = Texture::create_depth_texture(device, [width, height], "depth_texture");
    }

    /// Re-apply the current configuration after the surface was lost.
    pub(crate) fn reconfigure(&self, device: &wgpu::Device) {
        if let Target::Surface { surface, config } = &self.target {
            surface.configure(device, config);
        }
    }
}

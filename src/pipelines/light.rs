use wgpu::util::DeviceExt;

use crate::data_structures::light::{Light, LightKind};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// Direction the light travels, w unused.
    pub direction: [f32; 4],
    /// Linear colour in xyz, illuminance in w.
    pub color_intensity: [f32; 4],
    // cos and sin of the sun's angular radius, sun flag, light present flag
    pub sun: [f32; 4],
}

impl LightUniform {
    /// A scene without lights.
    pub fn dark() -> Self {
        Self {
            direction: [0.0, -1.0, 0.0, 0.0],
            color_intensity: [0.0; 4],
            sun: [1.0, 0.0, 0.0, 0.0],
        }
    }

    pub fn from_light(light: &Light) -> Self {
        let desc = &light.desc;
        let direction = desc.normalized_direction();
        let radius = desc.sun_angular_radius.to_radians();
        let is_sun = if desc.kind == LightKind::Sun { 1.0 } else { 0.0 };
        Self {
            direction: [direction.x, direction.y, direction.z, 0.0],
            color_intensity: [desc.color[0], desc.color[1], desc.color[2], desc.intensity],
            sun: [radius.cos(), radius.sin(), is_sun, 1.0],
        }
    }
}

impl Default for LightUniform {
    fn default() -> Self {
        Self::dark()
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Uniform Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[super::basic::uniform_entry(0)],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}

//! The engine: GPU device, queue and every object created through them.
//!
//! All objects live on the engine's [`ResourceStack`] and are addressed through
//! typed [`Handle`]s. Components (cameras, renderables, lights) and transforms
//! are additionally indexed by [`Entity`]. Dropping the engine releases every
//! object in reverse order of creation and then the device.

use std::{collections::HashMap, iter, sync::Arc};

use cgmath::{Matrix4, SquareMatrix};
use image::RgbaImage;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraUniform, Exposure, Projection},
    config::DemoConfig,
    data_structures::{
        geometry::{
            IndexBuffer, Indices, MorphTargetBuffer, VertexBuffer, VertexBufferDesc,
        },
        light::{Light, LightDesc},
        material::{
            Material, MaterialDesc, MaterialInstance, MaterialUniform, Parameter,
        },
        renderable::{Renderable, RenderableDesc, RenderableUniform},
        scene::{Scene, Skybox, View, Viewport},
        texture::{SamplerDesc, Texture},
        vertex::{MAX_MORPH_TARGETS, MorphVertex},
    },
    entity::Entity,
    error::{DemoError, InitStage, Result},
    pipelines::{
        basic::{Layouts, mk_material_pipelines},
        light::{self, LightUniform},
    },
    render::{ClearOptions, Frame, Renderer},
    swap_chain::{SwapChain, Target},
    teardown::{Handle, ResourceStack},
};

/// World transforms keyed by entity. Entities without one sit at the origin.
#[derive(Debug, Default)]
pub struct TransformManager {
    transforms: HashMap<Entity, Matrix4<f32>>,
}

impl TransformManager {
    pub fn set(&mut self, entity: Entity, transform: Matrix4<f32>) {
        self.transforms.insert(entity, transform);
    }

    pub fn get(&self, entity: Entity) -> Matrix4<f32> {
        self.transforms
            .get(&entity)
            .copied()
            .unwrap_or_else(Matrix4::identity)
    }

    pub fn has(&self, entity: Entity) -> bool {
        self.transforms.contains_key(&entity)
    }
}

pub struct Engine {
    // Field order is drop order: the frame goes before the surface it borrows
    // a texture from, everything goes before the device.
    frame: Option<Frame>,
    resources: ResourceStack,
    transforms: TransformManager,
    cameras: HashMap<Entity, Handle<Camera>>,
    renderables: HashMap<Entity, Handle<Renderable>>,
    lights: HashMap<Entity, Handle<Light>>,
    default_texture: Handle<Texture>,
    color_format: Option<wgpu::TextureFormat>,
    pending_surface: Option<wgpu::Surface<'static>>,
    layouts: Layouts,
    queue: wgpu::Queue,
    device: wgpu::Device,
    adapter: wgpu::Adapter,
    #[allow(unused)]
    instance: wgpu::Instance,
}

impl Engine {
    /// Create the engine for `config.backends`.
    ///
    /// With a window, a surface is created for it and the adapter is chosen to
    /// be compatible with it; the surface is handed to the first
    /// [`create_swap_chain`](Self::create_swap_chain) call. Without one the
    /// engine can only render into headless swap chains.
    pub async fn new(config: &DemoConfig, window: Option<Arc<Window>>) -> Result<Self> {
        log::info!("creating engine for backends {:?}", config.backends);
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: config.backends,
            ..Default::default()
        });

        let pending_surface = window
            .map(|window| instance.create_surface(window))
            .transpose()
            .map_err(|e| DemoError::init(InitStage::Surface, e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference,
                compatible_surface: pending_surface.as_ref(),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| DemoError::init(InitStage::Adapter, e))?;
        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("learn-ngin device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| DemoError::init(InitStage::Device, e))?;
        device.on_uncaptured_error(Box::new(|error| log::error!("wgpu: {error}")));

        let layouts = Layouts::new(&device);
        let mut resources = ResourceStack::new();
        let default_texture = resources.push(
            "default texture",
            Texture::solid_color(&device, &queue, [255; 4], 1, 1, "default texture"),
        );

        Ok(Self {
            frame: None,
            resources,
            transforms: TransformManager::default(),
            cameras: HashMap::new(),
            renderables: HashMap::new(),
            lights: HashMap::new(),
            default_texture,
            color_format: None,
            pending_surface,
            layouts,
            queue,
            device,
            adapter,
            instance,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn resources(&self) -> &ResourceStack {
        &self.resources
    }

    pub fn get<T: 'static>(&self, handle: Handle<T>) -> Result<&T> {
        self.resources.resolve(handle)
    }

    // ---- swap chains, renderers, scenes, views ----

    /// Swap chain presenting to the window the engine was created with.
    pub fn create_swap_chain(&mut self, width: u32, height: u32) -> Result<Handle<SwapChain>> {
        let surface = self.pending_surface.take().ok_or_else(|| {
            DemoError::init(
                InitStage::SwapChain,
                "engine has no window surface left to attach to",
            )
        })?;
        let swap_chain = SwapChain::surface(&self.device, &self.adapter, surface, width, height)?;
        log::info!(
            "swap chain {}x{} ({:?})",
            swap_chain.width,
            swap_chain.height,
            swap_chain.format
        );
        self.color_format.get_or_insert(swap_chain.format);
        Ok(self.resources.push("swap chain", swap_chain))
    }

    /// Offscreen swap chain whose pixels can be read back with
    /// [`read_pixels`](Self::read_pixels).
    pub fn create_headless_swap_chain(&mut self, width: u32, height: u32) -> Handle<SwapChain> {
        let swap_chain = SwapChain::headless(&self.device, width, height);
        self.color_format.get_or_insert(swap_chain.format);
        self.resources.push("headless swap chain", swap_chain)
    }

    pub fn resize_swap_chain(
        &mut self,
        swap_chain: Handle<SwapChain>,
        width: u32,
        height: u32,
    ) -> Result<()> {
        let device = &self.device;
        self.resources
            .resolve_mut(swap_chain)?
            .resize(device, width, height);
        Ok(())
    }

    pub fn create_renderer(&mut self) -> Handle<Renderer> {
        self.resources.push("renderer", Renderer::default())
    }

    pub fn set_clear_options(
        &mut self,
        renderer: Handle<Renderer>,
        options: ClearOptions,
    ) -> Result<()> {
        self.resources.resolve_mut(renderer)?.clear_options = options;
        Ok(())
    }

    pub fn create_scene(&mut self) -> Handle<Scene> {
        let light_buffer = light::mk_buffer(&self.device, LightUniform::dark());
        let light_bind_group =
            light::mk_bind_group(&self.device, &self.layouts.light, &light_buffer);
        self.resources.push(
            "scene",
            Scene {
                entities: Vec::new(),
                skybox: None,
                light_buffer,
                light_bind_group,
            },
        )
    }

    pub fn scene_add_entity(&mut self, scene: Handle<Scene>, entity: Entity) -> Result<()> {
        self.resources.resolve_mut(scene)?.add_entity(entity);
        Ok(())
    }

    pub fn create_skybox(&mut self, color: wgpu::Color) -> Handle<Skybox> {
        self.resources.push("skybox", Skybox { color })
    }

    pub fn scene_set_skybox(
        &mut self,
        scene: Handle<Scene>,
        skybox: Option<Handle<Skybox>>,
    ) -> Result<()> {
        if let Some(skybox) = skybox {
            self.resources.resolve(skybox)?;
        }
        self.resources.resolve_mut(scene)?.skybox = skybox;
        Ok(())
    }

    pub fn create_view(&mut self) -> Handle<View> {
        self.resources.push("view", View::default())
    }

    pub fn view_set_scene(&mut self, view: Handle<View>, scene: Handle<Scene>) -> Result<()> {
        self.resources.resolve(scene)?;
        self.resources.resolve_mut(view)?.scene = Some(scene);
        Ok(())
    }

    pub fn view_set_camera(&mut self, view: Handle<View>, camera: Entity) -> Result<()> {
        self.camera(camera)?;
        self.resources.resolve_mut(view)?.camera = Some(camera);
        Ok(())
    }

    pub fn view_set_viewport(&mut self, view: Handle<View>, viewport: Viewport) -> Result<()> {
        self.resources.resolve_mut(view)?.viewport = viewport;
        Ok(())
    }

    pub fn view_set_post_processing(&mut self, view: Handle<View>, enabled: bool) -> Result<()> {
        self.resources.resolve_mut(view)?.post_processing = enabled;
        Ok(())
    }

    // ---- transforms and cameras ----

    pub fn transforms(&self) -> &TransformManager {
        &self.transforms
    }

    pub fn set_transform(&mut self, entity: Entity, transform: Matrix4<f32>) {
        self.transforms.set(entity, transform);
    }

    pub fn transform(&self, entity: Entity) -> Matrix4<f32> {
        self.transforms.get(entity)
    }

    pub fn create_camera(&mut self, entity: Entity, projection: Projection) -> Handle<Camera> {
        let uniform = CameraUniform::new();
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.layouts.camera,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });
        let handle = self.resources.push(
            format!("camera {entity}"),
            Camera {
                entity,
                projection,
                exposure: Exposure::default(),
                buffer,
                bind_group,
            },
        );
        self.cameras.insert(entity, handle);
        handle
    }

    pub fn camera(&self, entity: Entity) -> Result<&Camera> {
        let handle = self.cameras.get(&entity).ok_or(DemoError::InvalidHandle {
            kind: "Camera",
        })?;
        self.resources.resolve(*handle)
    }

    fn camera_mut(&mut self, entity: Entity) -> Result<&mut Camera> {
        let handle = self.cameras.get(&entity).ok_or(DemoError::InvalidHandle {
            kind: "Camera",
        })?;
        self.resources.resolve_mut(*handle)
    }

    pub fn set_projection(&mut self, camera: Entity, projection: Projection) -> Result<()> {
        self.camera_mut(camera)?.projection = projection;
        Ok(())
    }

    /// Adapt the camera's projection to a new viewport size.
    pub fn resize_camera(&mut self, camera: Entity, width: u32, height: u32) -> Result<()> {
        let camera = self.camera_mut(camera)?;
        camera.projection = camera.projection.resize(width, height);
        Ok(())
    }

    pub fn set_exposure(&mut self, camera: Entity, exposure: Exposure) -> Result<()> {
        self.camera_mut(camera)?.exposure = exposure;
        Ok(())
    }

    // ---- geometry ----

    pub fn create_vertex_buffer(&mut self, desc: VertexBufferDesc) -> Result<Handle<VertexBuffer>> {
        VertexBuffer::validate(&desc)?;
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(desc.label),
                contents: desc.data,
                usage: wgpu::BufferUsages::VERTEX,
            });
        Ok(self.resources.push(
            format!("vertex buffer {}", desc.label),
            VertexBuffer {
                buffer,
                layout: desc.layout,
                vertex_count: desc.vertex_count,
            },
        ))
    }

    pub fn create_index_buffer(
        &mut self,
        label: &str,
        indices: Indices,
    ) -> Result<Handle<IndexBuffer>> {
        if indices.is_empty() {
            return Err(DemoError::init(
                InitStage::Renderable,
                format!("index buffer {label} is empty"),
            ));
        }
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: indices.bytes(),
                usage: wgpu::BufferUsages::INDEX,
            });
        Ok(self.resources.push(
            format!("index buffer {label}"),
            IndexBuffer {
                buffer,
                format: indices.format(),
                index_count: indices.len() as u32,
            },
        ))
    }

    /// Zero-filled morph target storage for `count` targets.
    pub fn create_morph_target_buffer(
        &mut self,
        label: &str,
        vertex_count: u32,
        count: usize,
    ) -> Result<Handle<MorphTargetBuffer>> {
        MorphTargetBuffer::validate_count(count)?;
        let vertices = vec![MorphVertex::default(); vertex_count as usize];
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        Ok(self.resources.push(
            format!("morph targets {label}"),
            MorphTargetBuffer {
                buffer,
                vertices,
                count,
            },
        ))
    }

    /// Upload the per-vertex deltas of one morph target.
    pub fn set_morph_target_positions(
        &mut self,
        morph_targets: Handle<MorphTargetBuffer>,
        target: usize,
        positions: &[[f32; 3]],
    ) -> Result<()> {
        let morph_targets = self.resources.resolve_mut(morph_targets)?;
        morph_targets.set_positions(target, positions)?;
        self.queue
            .write_buffer(&morph_targets.buffer, 0, morph_targets.bytes());
        Ok(())
    }

    // ---- textures and materials ----

    pub fn create_texture(&mut self, label: &str, image: &RgbaImage) -> Handle<Texture> {
        let texture = Texture::from_image(&self.device, &self.queue, image, label, true);
        log::info!("texture {label} uploaded {}x{}", texture.width(), texture.height());
        self.resources.push(format!("texture {label}"), texture)
    }

    /// Compile a shader package for one vertex layout.
    ///
    /// Shader or pipeline validation failures are reported as
    /// [`InitStage::Material`] errors. The material comes with a default
    /// instance, see [`default_instance`](Self::default_instance).
    pub fn create_material(&mut self, desc: MaterialDesc) -> Result<Handle<Material>> {
        let color_format = self.color_format.ok_or_else(|| {
            DemoError::init(
                InitStage::Material,
                format!("{}: create a swap chain before any material", desc.label),
            )
        })?;

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(desc.package.name),
                source: wgpu::ShaderSource::Wgsl(desc.package.source.into()),
            });
        let (culled, unculled) = mk_material_pipelines(
            &self.device,
            &self.layouts,
            &shader,
            color_format,
            desc.layout,
            desc.morphing,
        );
        if let Some(error) = futures::executor::block_on(self.device.pop_error_scope()) {
            return Err(DemoError::init(
                InitStage::Material,
                format!("{}: {error}", desc.label),
            ));
        }

        let material = self.resources.push(
            format!("material {}", desc.label),
            Material {
                label: desc.label.to_string(),
                package: desc.package,
                layout: desc.layout,
                morphing: desc.morphing,
                culled,
                unculled,
                default_instance: None,
            },
        );
        let instance = self.create_material_instance(material)?;
        self.resources.resolve_mut(material)?.default_instance = Some(instance);
        Ok(material)
    }

    pub fn default_instance(&self, material: Handle<Material>) -> Result<Handle<MaterialInstance>> {
        self.resources
            .resolve(material)?
            .default_instance
            .ok_or(DemoError::InvalidHandle {
                kind: "MaterialInstance",
            })
    }

    pub fn create_material_instance(
        &mut self,
        material: Handle<Material>,
    ) -> Result<Handle<MaterialInstance>> {
        let label = format!("instance of {}", self.resources.resolve(material)?.label);
        let uniform = MaterialUniform::default();
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&label),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let view = &self.resources.resolve(self.default_texture)?.view;
        let bind_group = self.mk_material_bind_group(&buffer, view, &SamplerDesc::default());
        Ok(self.resources.push(
            label,
            MaterialInstance {
                material,
                uniform,
                buffer,
                bind_group,
                albedo: None,
            },
        ))
    }

    fn mk_material_bind_group(
        &self,
        buffer: &wgpu::Buffer,
        view: &wgpu::TextureView,
        sampler: &SamplerDesc,
    ) -> wgpu::BindGroup {
        let sampler = sampler.create(&self.device);
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.layouts.material,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some("material_bind_group"),
        })
    }

    pub fn set_parameter(
        &mut self,
        instance: Handle<MaterialInstance>,
        parameter: Parameter,
    ) -> Result<()> {
        if let Parameter::Albedo(texture, sampler) = parameter {
            let view = &self.resources.resolve(texture)?.view;
            let buffer = &self.resources.resolve(instance)?.buffer;
            let bind_group = self.mk_material_bind_group(buffer, view, &sampler);
            let instance = self.resources.resolve_mut(instance)?;
            instance.bind_group = bind_group;
            instance.albedo = Some((texture, sampler));
        }
        let instance = self.resources.resolve_mut(instance)?;
        instance.uniform.apply(&parameter);
        self.queue
            .write_buffer(&instance.buffer, 0, bytemuck::cast_slice(&[instance.uniform]));
        Ok(())
    }

    // ---- renderables and lights ----

    /// Attach a renderable component to `entity`.
    ///
    /// Every primitive's vertex layout must match its material, and materials
    /// built for morphing need a morph target buffer covering every vertex.
    pub fn create_renderable(
        &mut self,
        entity: Entity,
        desc: RenderableDesc,
    ) -> Result<Handle<Renderable>> {
        self.validate_renderable(entity, &desc)?;

        let uniform = RenderableUniform::default();
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Renderable Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.layouts.renderable,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("renderable_bind_group"),
        });

        let handle = self.resources.push(
            format!("renderable {entity}"),
            Renderable {
                entity,
                bounding_box: desc.bounding_box,
                primitives: desc.primitives,
                culling: desc.culling,
                cast_shadows: desc.cast_shadows,
                receive_shadows: desc.receive_shadows,
                morph_targets: desc.morph_targets,
                morph_weights: uniform.morph_weights,
                buffer,
                bind_group,
            },
        );
        if self.renderables.insert(entity, handle).is_some() {
            log::warn!("{entity} already had a renderable, replacing it");
        }
        Ok(handle)
    }

    fn validate_renderable(&self, entity: Entity, desc: &RenderableDesc) -> Result<()> {
        let fail = |reason: String| {
            Err(DemoError::init(
                InitStage::Renderable,
                format!("{entity}: {reason}"),
            ))
        };
        if desc.primitives.is_empty() {
            return fail("no primitives".to_string());
        }
        let morph_targets = desc
            .morph_targets
            .map(|h| self.resources.resolve(h))
            .transpose()?;
        for (i, primitive) in desc.primitives.iter().enumerate() {
            let vertices = self.resources.resolve(primitive.vertices)?;
            let indices = self.resources.resolve(primitive.indices)?;
            let instance = self.resources.resolve(primitive.material)?;
            let material = self.resources.resolve(instance.material)?;
            if vertices.layout != material.layout {
                return fail(format!(
                    "primitive {i} has {:?} vertices but material {} expects {:?}",
                    vertices.layout, material.label, material.layout
                ));
            }
            let count = primitive.count.unwrap_or(indices.index_count.saturating_sub(primitive.offset));
            if primitive.offset.saturating_add(count) > indices.index_count {
                return fail(format!(
                    "primitive {i} draws indices {}..{} of {}",
                    primitive.offset,
                    primitive.offset.saturating_add(count),
                    indices.index_count
                ));
            }
            if material.morphing {
                let Some(morph_targets) = morph_targets else {
                    return fail(format!(
                        "material {} morphs but no morph target buffer was given",
                        material.label
                    ));
                };
                if morph_targets.vertex_count() != vertices.vertex_count as usize {
                    return fail(format!(
                        "morph target buffer has {} vertices, primitive {i} has {}",
                        morph_targets.vertex_count(),
                        vertices.vertex_count
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn renderable(&self, entity: Entity) -> Result<&Renderable> {
        let handle = self
            .renderables
            .get(&entity)
            .ok_or(DemoError::InvalidHandle { kind: "Renderable" })?;
        self.resources.resolve(*handle)
    }

    fn renderable_mut(&mut self, entity: Entity) -> Result<&mut Renderable> {
        let handle = self
            .renderables
            .get(&entity)
            .ok_or(DemoError::InvalidHandle { kind: "Renderable" })?;
        self.resources.resolve_mut(*handle)
    }

    pub fn set_material_instance_at(
        &mut self,
        entity: Entity,
        primitive: usize,
        instance: Handle<MaterialInstance>,
    ) -> Result<()> {
        self.resources.resolve(instance)?;
        let renderable = self.renderable_mut(entity)?;
        let slot = renderable.primitives.get_mut(primitive).ok_or_else(|| {
            DemoError::init(
                InitStage::Renderable,
                format!("{entity} has no primitive {primitive}"),
            )
        })?;
        slot.material = instance;
        Ok(())
    }

    /// Set the blend weights of the renderable's morph targets. Missing
    /// weights are zero.
    pub fn set_morph_weights(&mut self, entity: Entity, weights: &[f32]) -> Result<()> {
        if weights.len() > MAX_MORPH_TARGETS {
            return Err(DemoError::init(
                InitStage::Renderable,
                format!(
                    "{} morph weights given, at most {MAX_MORPH_TARGETS} are supported",
                    weights.len()
                ),
            ));
        }
        let renderable = self.renderable_mut(entity)?;
        renderable.morph_weights = [0.0; MAX_MORPH_TARGETS];
        renderable.morph_weights[..weights.len()].copy_from_slice(weights);
        Ok(())
    }

    pub fn create_light(&mut self, entity: Entity, desc: LightDesc) -> Handle<Light> {
        let handle = self
            .resources
            .push(format!("light {entity}"), Light { entity, desc });
        self.lights.insert(entity, handle);
        handle
    }

    pub fn light(&self, entity: Entity) -> Result<&Light> {
        let handle = self
            .lights
            .get(&entity)
            .ok_or(DemoError::InvalidHandle { kind: "Light" })?;
        self.resources.resolve(*handle)
    }

    // ---- frames ----

    /// Start a frame on `swap_chain`.
    ///
    /// Returns `false` when no target texture is available. The caller skips
    /// the frame; a lost or outdated surface is reconfigured for the next one.
    pub fn begin_frame(
        &mut self,
        renderer: Handle<Renderer>,
        swap_chain: Handle<SwapChain>,
    ) -> Result<bool> {
        if self.frame.take().is_some() {
            log::warn!("begin_frame without end_frame, dropping the previous frame");
        }
        self.resources.resolve(renderer)?;
        let chain = self.resources.resolve(swap_chain)?;
        let (surface_texture, view) = match &chain.target {
            Target::Surface { surface, .. } => match surface.get_current_texture() {
                Ok(texture) => {
                    let view = texture
                        .texture
                        .create_view(&wgpu::TextureViewDescriptor::default());
                    (Some(texture), view)
                }
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::debug!("surface lost or outdated, reconfiguring");
                    chain.reconfigure(&self.device);
                    return Ok(false);
                }
                Err(wgpu::SurfaceError::Timeout) => {
                    log::debug!("surface timed out, skipping frame");
                    return Ok(false);
                }
                Err(e) => {
                    log::warn!("skipping frame: {e}");
                    return Ok(false);
                }
            },
            Target::Headless { texture } => (
                None,
                texture.create_view(&wgpu::TextureViewDescriptor::default()),
            ),
        };
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.frame = Some(Frame {
            swap_chain,
            renderer,
            surface_texture,
            view,
            encoder,
            cleared: false,
        });
        Ok(true)
    }

    /// Record `view` into the current frame. Outside a frame this does
    /// nothing.
    pub fn render(&mut self, view: Handle<View>) -> Result<()> {
        let Some(mut frame) = self.frame.take() else {
            log::warn!("render called outside begin_frame/end_frame");
            return Ok(());
        };
        let result = self.encode_view(&mut frame, view);
        self.frame = Some(frame);
        result
    }

    fn encode_view(&self, frame: &mut Frame, view: Handle<View>) -> Result<()> {
        let view = *self.resources.resolve(view)?;
        let renderer = self.resources.resolve(frame.renderer)?;
        let chain = self.resources.resolve(frame.swap_chain)?;
        let scene = view
            .scene
            .map(|scene| self.resources.resolve(scene))
            .transpose()?;
        let skybox = scene
            .and_then(|scene| scene.skybox)
            .map(|skybox| self.resources.resolve(skybox).map(|skybox| skybox.color))
            .transpose()?;
        let camera = match view.camera {
            Some(entity) => Some((entity, self.camera(entity)?)),
            None => None,
        };

        if let (Some(scene), Some((entity, camera))) = (scene, camera) {
            let uniform = camera.uniform(&self.transforms.get(entity), view.post_processing);
            self.queue
                .write_buffer(&camera.buffer, 0, bytemuck::cast_slice(&[uniform]));
            let light = scene
                .entities
                .iter()
                .find_map(|e| self.lights.get(e))
                .map(|handle| self.resources.resolve(*handle))
                .transpose()?
                .map_or_else(LightUniform::dark, LightUniform::from_light);
            self.queue
                .write_buffer(&scene.light_buffer, 0, bytemuck::cast_slice(&[light]));
            for entity in &scene.entities {
                if let Some(handle) = self.renderables.get(entity) {
                    let renderable = self.resources.resolve(*handle)?;
                    let uniform = renderable.uniform(&self.transforms.get(*entity));
                    self.queue
                        .write_buffer(&renderable.buffer, 0, bytemuck::cast_slice(&[uniform]));
                }
            }
        } else if scene.is_some() {
            log::warn!("view has a scene but no camera, only clearing");
        }

        let load = if frame.cleared {
            wgpu::LoadOp::Load
        } else {
            wgpu::LoadOp::Clear(renderer.clear_color(skybox))
        };
        let mut render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("View Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &chain.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        frame.cleared = true;

        let (x, y, width, height) = pass_viewport(&view.viewport, chain.width, chain.height);
        render_pass.set_viewport(x, y, width, height, 0.0, 1.0);

        let (Some(scene), Some((_, camera))) = (scene, camera) else {
            return Ok(());
        };
        render_pass.set_bind_group(0, &camera.bind_group, &[]);
        render_pass.set_bind_group(3, &scene.light_bind_group, &[]);
        for entity in &scene.entities {
            let Some(handle) = self.renderables.get(entity) else {
                continue;
            };
            let renderable = self.resources.resolve(*handle)?;
            let morph_targets = renderable
                .morph_targets
                .map(|h| self.resources.resolve(h))
                .transpose()?;
            render_pass.set_bind_group(2, &renderable.bind_group, &[]);
            for primitive in &renderable.primitives {
                let instance = self.resources.resolve(primitive.material)?;
                let material = self.resources.resolve(instance.material)?;
                let vertices = self.resources.resolve(primitive.vertices)?;
                let indices = self.resources.resolve(primitive.indices)?;
                render_pass.set_pipeline(material.pipeline(renderable.culling));
                render_pass.set_bind_group(1, &instance.bind_group, &[]);
                render_pass.set_vertex_buffer(0, vertices.buffer.slice(..));
                if let (true, Some(morph_targets)) = (material.morphing, morph_targets) {
                    render_pass.set_vertex_buffer(1, morph_targets.buffer.slice(..));
                }
                render_pass.set_index_buffer(indices.buffer.slice(..), indices.format);
                let end = primitive
                    .count
                    .map_or(indices.index_count, |count| primitive.offset + count)
                    .min(indices.index_count);
                render_pass.draw_indexed(primitive.offset..end, 0, 0..1);
            }
        }
        Ok(())
    }

    /// Submit the current frame and present it.
    pub fn end_frame(&mut self) -> Result<()> {
        let Some(mut frame) = self.frame.take() else {
            log::warn!("end_frame without begin_frame");
            return Ok(());
        };
        if !frame.cleared {
            let color = self.resources.resolve(frame.renderer)?.clear_color(None);
            frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
        }
        self.queue.submit(iter::once(frame.encoder.finish()));
        if let Some(surface_texture) = frame.surface_texture {
            surface_texture.present();
        }
        self.resources.resolve_mut(frame.renderer)?.frames += 1;
        Ok(())
    }

    /// Copy a headless swap chain back to the CPU.
    pub async fn read_pixels(&self, swap_chain: Handle<SwapChain>) -> Result<RgbaImage> {
        let chain = self.resources.resolve(swap_chain)?;
        let Target::Headless { texture } = &chain.target else {
            return Err(DemoError::init(
                InitStage::SwapChain,
                "only headless swap chains can be read back",
            ));
        };
        let (width, height) = (chain.width, chain.height);
        // copies need rows aligned to 256 bytes
        let unpadded_row = 4 * width;
        let padded_row = unpadded_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("read back buffer"),
            size: (padded_row * height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Read Back Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(iter::once(encoder.finish()));

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| DemoError::init(InitStage::SwapChain, e))?;
        rx.receive()
            .await
            .ok_or_else(|| DemoError::init(InitStage::SwapChain, "read back was cancelled"))?
            .map_err(|e| DemoError::init(InitStage::SwapChain, e))?;

        let pixels = {
            let data = buffer_slice.get_mapped_range();
            data.chunks(padded_row as usize)
                .flat_map(|row| &row[..unpadded_row as usize])
                .copied()
                .collect::<Vec<u8>>()
        };
        output_buffer.unmap();
        RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
            DemoError::init(InitStage::SwapChain, "read back produced a short image")
        })
    }
}

/// Viewport rectangle in wgpu's top-left convention, clamped to the target.
/// An empty or out of range viewport covers the whole target.
fn pass_viewport(viewport: &Viewport, width: u32, height: u32) -> (f32, f32, f32, f32) {
    let w = viewport.width.min(width.saturating_sub(viewport.left));
    let h = viewport.height.min(height.saturating_sub(viewport.bottom));
    if w == 0 || h == 0 {
        return (0.0, 0.0, width as f32, height as f32);
    }
    let top = height - viewport.bottom - h;
    (viewport.left as f32, top as f32, w as f32, h as f32)
}

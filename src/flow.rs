//! Lifecycle driver and event loop.
//!
//! Every demo follows the same shape: bootstrap (event loop, window, surface,
//! engine, swap chain), assembly of the demo's scene, the frame loop and
//! teardown. [`launch`] runs all of it for a [`Demo`] and turns any failure
//! into exit status 1.
//!
//! # Lifecycle
//!
//! 1. `resumed`: create the window and the engine, then call [`Demo::assemble`]
//! 2. window events are mapped to [`LoopEvent`]s and fed to the [`FrameLoop`]
//! 3. on redraw: [`Demo::update`] with the elapsed time, then one frame
//! 4. on exit the session is dropped, releasing everything in reverse order

use std::{process::ExitCode, sync::Arc};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::{
    animation::Clock,
    config::DemoConfig,
    data_structures::scene::{Scene, View, Viewport},
    engine::Engine,
    entity::EntityAllocator,
    error::{DemoError, InitStage, Result},
    render::Renderer,
    swap_chain::SwapChain,
    teardown::Handle,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Input events the frame loop cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopEvent {
    Quit,
    Resized { width: u32, height: u32 },
    Other,
}

impl LoopEvent {
    pub fn from_window_event(event: &WindowEvent) -> Self {
        match event {
            WindowEvent::CloseRequested => LoopEvent::Quit,
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => LoopEvent::Quit,
            WindowEvent::Resized(size) => LoopEvent::Resized {
                width: size.width,
                height: size.height,
            },
            _ => LoopEvent::Other,
        }
    }
}

/// Running/Terminated state machine of the frame loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLoop {
    state: LoopState,
    viewport: Viewport,
}

impl FrameLoop {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: LoopState::Running,
            viewport: Viewport::new(width, height),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Feed one event. Returns the new viewport when a resize was applied.
    /// Events after termination are ignored.
    pub fn handle(&mut self, event: LoopEvent) -> Option<Viewport> {
        if self.state == LoopState::Terminated {
            return None;
        }
        match event {
            LoopEvent::Quit => {
                self.state = LoopState::Terminated;
                None
            }
            LoopEvent::Resized { width, height } => {
                self.viewport = Viewport::new(width, height);
                Some(self.viewport)
            }
            LoopEvent::Other => None,
        }
    }
}

/// The objects every windowed demo renders with.
#[derive(Clone, Copy, Debug)]
pub struct Stage {
    pub swap_chain: Handle<SwapChain>,
    pub renderer: Handle<Renderer>,
    pub scene: Handle<Scene>,
    pub view: Handle<View>,
}

impl Stage {
    /// Renderer, scene and a view of the scene covering the whole swap chain.
    pub fn create(
        engine: &mut Engine,
        swap_chain: Handle<SwapChain>,
        viewport: Viewport,
    ) -> Result<Self> {
        let renderer = engine.create_renderer();
        let scene = engine.create_scene();
        let view = engine.create_view();
        engine.view_set_scene(view, scene)?;
        engine.view_set_viewport(view, viewport)?;
        Ok(Self {
            swap_chain,
            renderer,
            scene,
            view,
        })
    }

    /// Render one frame of the view. Skipped frames are not an error.
    pub fn draw(&self, engine: &mut Engine) -> Result<bool> {
        if !engine.begin_frame(self.renderer, self.swap_chain)? {
            return Ok(false);
        }
        engine.render(self.view)?;
        engine.end_frame()?;
        Ok(true)
    }

    /// Apply a new window size to the swap chain, the view and its camera.
    pub fn resize(&self, engine: &mut Engine, viewport: Viewport) -> Result<()> {
        engine.resize_swap_chain(self.swap_chain, viewport.width, viewport.height)?;
        engine.view_set_viewport(self.view, viewport)?;
        if viewport.is_empty() {
            return Ok(());
        }
        if let Some(camera) = engine.get(self.view)?.camera {
            engine.resize_camera(camera, viewport.width, viewport.height)?;
        }
        Ok(())
    }
}

/// What [`Demo::assemble`] gets to build its scene with.
pub struct Setup<'a> {
    pub engine: &'a mut Engine,
    pub entities: &'a mut EntityAllocator,
    pub stage: Stage,
    pub config: &'a DemoConfig,
}

/// One tutorial program.
#[allow(async_fn_in_trait)]
pub trait Demo: Sized {
    /// Build buffers, materials, camera and lights. Runs once, before the
    /// first frame.
    async fn assemble(setup: Setup<'_>) -> Result<Self>;

    /// Push this frame's animation state. `time` is seconds since the loop
    /// started.
    fn update(&mut self, engine: &mut Engine, stage: &Stage, time: f32) -> Result<()>;
}

/// Everything alive while the window is open. Fields drop in order, so the
/// window goes last.
struct Session<D> {
    demo: D,
    engine: Engine,
    entities: EntityAllocator,
    stage: Stage,
    frame_loop: FrameLoop,
    clock: Clock,
    window: Arc<Window>,
}

struct App<D> {
    async_runtime: tokio::runtime::Runtime,
    config: DemoConfig,
    session: Option<Session<D>>,
    failure: Option<DemoError>,
}

impl<D: Demo> App<D> {
    fn new(config: DemoConfig, async_runtime: tokio::runtime::Runtime) -> Self {
        Self {
            async_runtime,
            config,
            session: None,
            failure: None,
        }
    }

    fn bootstrap(&self, event_loop: &ActiveEventLoop) -> Result<Session<D>> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ))
            .with_resizable(self.config.resizable);
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .map_err(|e| DemoError::init(InitStage::Window, e))?,
        );
        let size = window.inner_size();

        let config = &self.config;
        self.async_runtime.block_on(async {
            let mut engine = Engine::new(config, Some(window.clone())).await?;
            let swap_chain = engine.create_swap_chain(size.width, size.height)?;
            let viewport = Viewport::new(size.width, size.height);
            let stage = Stage::create(&mut engine, swap_chain, viewport)?;
            let mut entities = EntityAllocator::new();
            let demo = D::assemble(Setup {
                engine: &mut engine,
                entities: &mut entities,
                stage,
                config,
            })
            .await?;
            log::info!("{} assembled", config.title);
            Ok::<_, DemoError>(Session {
                demo,
                engine,
                entities,
                stage,
                frame_loop: FrameLoop::new(size.width, size.height),
                clock: Clock::start(),
                window,
            })
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: DemoError) {
        log::error!("{error}");
        self.failure.get_or_insert(error);
        event_loop.exit();
    }
}

impl<D: Demo> ApplicationHandler for App<D> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() || self.failure.is_some() {
            return;
        }
        match self.bootstrap(event_loop) {
            Ok(session) => {
                session.window.request_redraw();
                self.session = Some(session);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        let Some(session) = &mut self.session else {
            return;
        };

        if let Some(viewport) = session
            .frame_loop
            .handle(LoopEvent::from_window_event(&event))
        {
            if let Err(e) = session.stage.resize(&mut session.engine, viewport) {
                return self.fail(event_loop, e);
            }
        }
        if !session.frame_loop.is_running() {
            event_loop.exit();
            return;
        }

        if let WindowEvent::RedrawRequested = event {
            let time = session.clock.seconds();
            let frame = session
                .demo
                .update(&mut session.engine, &session.stage, time)
                .and_then(|_| session.stage.draw(&mut session.engine));
            if let Err(e) = frame {
                self.fail(event_loop, e);
            }
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(session) = &self.session {
            if session.frame_loop.is_running() {
                session.window.request_redraw();
            }
        }
    }

    fn exiting(&mut self, _: &ActiveEventLoop) {
        if let Some(session) = self.session.take() {
            log::info!("tearing down {}", self.config.title);
            drop(session);
        }
    }
}

/// Run `D` in a window until it is closed.
pub fn launch<D: Demo>(config: DemoConfig) -> ExitCode {
    init_logging();
    match run::<D>(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

pub fn init_logging() {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }
}

fn run<D: Demo>(config: DemoConfig) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|e| DemoError::init(InitStage::EventLoop, e))?;
    let async_runtime =
        tokio::runtime::Runtime::new().map_err(|e| DemoError::init(InitStage::EventLoop, e))?;
    let mut app = App::<D>::new(config, async_runtime);
    event_loop
        .run_app(&mut app)
        .map_err(|e| DemoError::init(InitStage::EventLoop, e))?;
    // normally torn down in `exiting` already
    drop(app.session.take());
    match app.failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

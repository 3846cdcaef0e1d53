//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]: it creates the
//! window and GPU resources on `resumed`, routes input through
//! [`Controls`], and redraws continuously so the animation clock drives the
//! orbits.

use std::path::PathBuf;
use std::sync::Arc;

use orrery_config::Config;
use orrery_input::{KeyboardState, MouseState};
use orrery_log::LogHandle;
use orrery_render::{
    RenderContextError, SceneDetail, SurfaceWrapper, TextureError, WgpuBackend,
    init_render_context_blocking,
};
use orrery_scene::{Action, AnimationClock, ButtonMask, Flow, Scene, compose_frame};
use tracing::{debug, error, info, instrument};
use winit::application::ApplicationHandler;
use winit::error::EventLoopError;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::controls::{Controls, Dispatched};

/// Window attributes for the configured size, title and fullscreen mode.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
        .with_fullscreen(
            config
                .window
                .fullscreen
                .then_some(Fullscreen::Borderless(None)),
        )
}

/// Failure to bring up the renderer. Fatal: the event loop exits.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("GPU initialization failed: {0}")]
    Gpu(#[from] RenderContextError),

    #[error("renderer setup failed: {0}")]
    Renderer(#[from] TextureError),
}

fn scene_detail(config: &Config) -> SceneDetail {
    SceneDetail {
        sphere_slices: config.render.sphere_slices,
        sphere_stacks: config.render.sphere_stacks,
        ring_segments: config.render.ring_segments,
        axes_length: config.render.axes_length,
    }
}

pub struct AppState {
    config: Config,
    texture_dir: PathBuf,
    log_handle: LogHandle,
    window: Option<Arc<Window>>,
    surface_wrapper: SurfaceWrapper,
    backend: Option<WgpuBackend>,
    scene: Option<Scene<WgpuBackend>>,
    mouse: MouseState,
    keyboard: KeyboardState,
    controls: Controls,
    clock: AnimationClock,
    title: String,
}

impl AppState {
    pub fn new(config: Config, texture_dir: PathBuf, log_handle: LogHandle) -> Self {
        let controls = Controls::from_config(&config);
        if controls.viewer.toggles.debug {
            log_handle.set_debug(true);
        }
        let clock = AnimationClock::new(config.animation.cycle());
        let title = config.window.title.clone();
        Self {
            surface_wrapper: SurfaceWrapper::new(config.window.width, config.window.height, 1.0),
            config,
            texture_dir,
            log_handle,
            window: None,
            backend: None,
            scene: None,
            mouse: MouseState::new(),
            keyboard: KeyboardState::new(),
            controls,
            clock,
            title,
        }
    }

    fn initialize_rendering(&mut self, window: Arc<Window>) -> Result<(), InitError> {
        let context = init_render_context_blocking(window, self.config.window.vsync)?;
        let mut backend = WgpuBackend::new(context, self.config.textures.generate_mipmaps)?;

        info!("Loading textures from {}", self.texture_dir.display());
        let scene = backend.build_scene(&self.texture_dir, &scene_detail(&self.config));
        self.scene = Some(scene);
        self.backend = Some(backend);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(resize) = self.surface_wrapper.handle_resize(width, height) {
            let w = resize.physical.width;
            let h = resize.physical.height;
            if let Some(backend) = &mut self.backend {
                backend.resize(w, h);
            }
            info!(
                "Window resized to {}x{} (viewport {:?})",
                w, h, resize.viewport
            );
        }
    }

    /// Side effects of an applied action outside the viewer state.
    fn after_action(&mut self, dispatched: Dispatched, event_loop: &ActiveEventLoop) {
        if dispatched.flow == Flow::Quit {
            info!("Quit requested, shutting down");
            event_loop.exit();
            return;
        }
        match dispatched.action {
            Action::SetDebug(on) => self.log_handle.set_debug(on),
            Action::Reset => {
                self.mouse.clear_buttons();
                self.log_handle.set_debug(self.controls.viewer.toggles.debug);
            }
            _ => {}
        }
    }

    fn refresh_title(&mut self) {
        let title = self.controls.title(&self.config.window.title);
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }

    fn redraw(&mut self) {
        if let (Some(backend), Some(scene)) = (&mut self.backend, &self.scene) {
            let surface = backend.surface_size();
            compose_frame(
                scene,
                &self.controls.viewer,
                self.clock.phase(),
                surface,
                backend,
            );
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = window_attributes_from_config(&self.config);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let scale_factor = window.scale_factor();
        let inner_size = window.inner_size();
        self.surface_wrapper =
            SurfaceWrapper::new(inner_size.width, inner_size.height, scale_factor);
        info!(
            "Surface wrapper initialized: {}x{} (scale: {:.2})",
            inner_size.width, inner_size.height, scale_factor
        );

        if let Err(e) = self.initialize_rendering(window.clone()) {
            error!("{e}");
            event_loop.exit();
            return;
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size.width, new_size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let inner = window.inner_size();
                    if let Some(resize) = self.surface_wrapper.handle_scale_factor_changed(
                        scale_factor,
                        inner.width,
                        inner.height,
                    ) && let Some(backend) = &mut self.backend
                    {
                        backend.resize(resize.physical.width, resize.physical.height);
                        info!("Scale factor changed to {scale_factor:.2}");
                    }
                }
            }
            WindowEvent::Focused(false) => {
                self.keyboard.clear();
                self.mouse.clear_buttons();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(key) = self.keyboard.process_event(&event) {
                    if let Some(dispatched) = self.controls.on_key(key) {
                        self.after_action(dispatched, event_loop);
                    }
                    self.refresh_title();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(drag) = self.mouse.on_cursor_moved(position.x, position.y) {
                    debug!("Drag {:?} ({}, {})", drag.buttons, drag.dx, drag.dy);
                    self.controls.on_drag(drag);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = self.mouse.on_button(button, state);
                if pressed == Some(ButtonMask::RIGHT) && state == ElementState::Pressed {
                    self.controls.open_menu();
                    self.refresh_title();
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let clicks = self.mouse.on_scroll(delta);
                if clicks != 0 {
                    debug!("Scroll {clicks} click(s)");
                    self.controls.on_scroll(clicks);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Create an event loop and run the viewer until it quits.
#[instrument(skip_all)]
pub fn run_with_config(
    config: Config,
    texture_dir: PathBuf,
    log_handle: LogHandle,
) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config, texture_dir, log_handle);
    event_loop.run_app(&mut app)
}

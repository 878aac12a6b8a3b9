use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use scalar_field::ScalarField;
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::compile::ShaderSources;
use crate::gpu::Scene;
use crate::types::RendererConfig;

/// Pairs the window with the scene drawn into it.
///
/// `scene` is declared first so it drops before the window its surface was
/// created from.
struct WindowState {
    scene: Option<Scene>,
    window: Arc<Window>,
}

impl WindowState {
    fn new(window: Arc<Window>, field: &ScalarField, sources: &ShaderSources) -> Result<Self> {
        let scene = Scene::new(window.as_ref(), window.inner_size(), field, sources)?;
        Ok(Self {
            scene: Some(scene),
            window,
        })
    }

    fn window(&self) -> &Window {
        &self.window
    }

    fn size(&self) -> PhysicalSize<u32> {
        self.scene
            .as_ref()
            .map_or_else(|| self.window.inner_size(), Scene::size)
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if !is_drawable(new_size) {
            // Minimised; the next non-zero resize redraws.
            return;
        }
        if let Some(scene) = self.scene.as_mut() {
            scene.resize(new_size);
        }
        self.window.request_redraw();
    }

    fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        match self.scene.as_mut() {
            Some(scene) => scene.render(),
            None => Ok(()),
        }
    }

    fn reconfigure(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            scene.reconfigure();
        }
    }

    fn shutdown(&mut self) {
        if let Some(scene) = self.scene.take() {
            scene.shutdown();
        }
    }
}

fn is_drawable(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}

/// What the loop does after a frame fails to acquire its surface texture.
///
/// No variant requests another redraw; the next platform event does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceErrorAction {
    Reconfigure,
    Skip,
    Exit,
}

fn surface_error_action(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigure,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Exit,
        _ => SurfaceErrorAction::Skip,
    }
}

/// Opens the window, builds the scene and drives the `winit` event loop until
/// the window is closed.
///
/// Every initialisation step (event loop, window, surface, device, uploads,
/// shader program) happens before the loop starts; any failure is returned.
pub(crate) fn run(config: &RendererConfig, field: &ScalarField, sources: &ShaderSources) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.window_size.0, config.window_size.1);
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(window_size)
        .build(&event_loop)
        .context("failed to create window")?;
    let window = Arc::new(window);

    let mut state = WindowState::new(window, field, sources)?;
    tracing::info!(
        width = window_size.width,
        height = window_size.height,
        title = %config.title,
        "window ready"
    );
    state.window().request_redraw();

    event_loop
        .run(move |event, elwt| {
            // The image never changes, so only redraw when the platform asks.
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            elwt.exit();
                        }
                        WindowEvent::Resized(new_size) => {
                            state.resize(new_size);
                        }
                        WindowEvent::ScaleFactorChanged {
                            mut inner_size_writer,
                            ..
                        } => {
                            let _ = inner_size_writer.request_inner_size(state.size());
                        }
                        WindowEvent::RedrawRequested => {
                            if let Err(err) = state.render_frame() {
                                match surface_error_action(&err) {
                                    SurfaceErrorAction::Reconfigure => {
                                        tracing::debug!("surface {err:?}; reconfiguring");
                                        state.reconfigure();
                                    }
                                    SurfaceErrorAction::Skip => {
                                        tracing::warn!("surface error: {err:?}; skipping frame");
                                    }
                                    SurfaceErrorAction::Exit => {
                                        tracing::error!("surface out of memory; exiting");
                                        elwt.exit();
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::LoopExiting => {
                    state.shutdown();
                    tracing::info!("window closed");
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}

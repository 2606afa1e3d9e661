//! Platform layer: window, event loop and the per-frame driver that feeds
//! a [`Scene`] through the renderer.
//!
//! The loop runs continuously (`ControlFlow::Poll`): every `about_to_wait`
//! requests a redraw, every redraw updates the scene with the elapsed time
//! and renders one frame.

mod clock;
mod overlay;

use std::sync::Arc;

use anyhow::{Context, Result};
use corelib::Viewport;
use renderer::{GpuContext, Scene};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

pub use clock::FrameClock;
pub use overlay::FpsOverlay;

/// Window and device options for [`run_with_renderer`].
#[derive(Clone, Debug)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub backends: wgpu::Backends,
    pub show_fps: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "texlab".to_owned(),
            width: 800,
            height: 600,
            backends: wgpu::Backends::all(),
            show_fps: false,
        }
    }
}

/// Open the window, initialise `scene` on the GPU and drive it until the
/// window is closed or Escape is pressed.
pub fn run_with_renderer(scene: Scene, config: PlatformConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(scene, config);
    event_loop
        .run_app(&mut app)
        .context("Event loop terminated abnormally")?;

    log::info!("Event loop finished after {} frames", app.frames);
    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    config: PlatformConfig,
    scene: Scene,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    overlay: Option<FpsOverlay>,
    clock: FrameClock,
    frames: u64,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(scene: Scene, config: PlatformConfig) -> Self {
        Self {
            config,
            scene,
            window: None,
            gpu: None,
            overlay: None,
            clock: FrameClock::new(),
            frames: 0,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );
        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        let gpu = pollster::block_on(GpuContext::new(window.clone(), self.config.backends))
            .context("Failed to initialise GPU")?;
        self.scene.init_scene(&gpu)?;
        let (width, height) = gpu.size();
        self.scene.resize(width, height);

        if self.config.show_fps {
            self.overlay = Some(FpsOverlay::new(&window, &gpu));
        }
        self.gpu = Some(gpu);
        self.window = Some(window);
        self.clock.reset();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self) -> Result<()> {
        let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) else {
            return Ok(());
        };

        gpu.check_for_errors();
        self.scene.update(self.clock.tick());

        let Some(target) = gpu.acquire()? else {
            return Ok(());
        };
        let mut frame = gpu.begin_frame();
        self.scene.render(&mut frame)?;

        let mut encoder = gpu.create_encoder("frame encoder");
        let (width, height) = gpu.size();
        frame.encode(
            &mut encoder,
            &target.view,
            gpu.depth_view(),
            Viewport::new(width, height),
        );
        if let Some(overlay) = &mut self.overlay {
            overlay.draw(window, gpu, &mut encoder, &target.view, self.clock.fps());
        }
        gpu.present(encoder, target);
        self.frames += 1;
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let (Some(overlay), Some(window)) = (&mut self.overlay, &self.window) {
            if overlay.on_window_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                log::info!("Resized: {}x{}", size.width, size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                    let (width, height) = gpu.size();
                    self.scene.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_opens_800_by_600() {
        let config = PlatformConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert!(!config.show_fps);
        assert_eq!(config.backends, wgpu::Backends::all());
    }
}

//! Window-backed display for the playback loop
//!
//! The event loop is pumped without blocking from [`Display::pump`], so the
//! player keeps ownership of the thread. In quick mode each published image is
//! drawn immediately; in safe mode it is drawn on the next redraw event with
//! vsync.

use crate::backend::ImageRenderer;
use crate::colormap::{colorize, Colormap};
use crate::error::DisplayError;
use crate::window::{key_name, window_attributes, WindowConfig};
use replay_core::{Display, DisplayStatus, RateCommand, SensorGeometry, Snapshot};
use replay_services::{CommandQueue, DisplayMode, KeyBindings};
use std::sync::Arc;
use std::time::Duration;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowId},
};

#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub title: String,
    pub scale: u32,
    pub mode: DisplayMode,
    pub bindings: KeyBindings,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "DAVIS Replay".to_string(),
            scale: 3,
            mode: DisplayMode::Quick,
            bindings: KeyBindings::default(),
        }
    }
}

fn present_mode(mode: DisplayMode) -> wgpu::PresentMode {
    match mode {
        DisplayMode::Quick => wgpu::PresentMode::AutoNoVsync,
        DisplayMode::Safe => wgpu::PresentMode::Fifo,
    }
}

/// Window state driven by the pumped event loop.
struct DisplayApp {
    config: DisplayConfig,
    geometry: SensorGeometry,
    window: Option<Arc<Window>>,
    renderer: Option<ImageRenderer>,
    commands: CommandQueue,
    rgba: Vec<u8>,
    title: String,
    redraw_pending: bool,
    error: Option<DisplayError>,
}

impl DisplayApp {
    fn draw(&mut self) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };
        renderer.upload(&self.rgba);
        match renderer.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost; reconfiguring");
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.error = Some(DisplayError::OutOfMemory);
            }
            Err(err) => tracing::warn!(error = %err, "frame dropped"),
        }
        self.redraw_pending = false;
    }
}

impl ApplicationHandler for DisplayApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_config = WindowConfig::for_sensor(
            self.config.title.clone(),
            self.geometry,
            self.config.scale,
        );
        let window = match event_loop.create_window(window_attributes(&window_config)) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.error = Some(DisplayError::Window(err.to_string()));
                event_loop.exit();
                return;
            }
        };

        let renderer = pollster::block_on(ImageRenderer::new(
            Arc::clone(&window),
            self.geometry,
            present_mode(self.config.mode),
        ));
        match renderer {
            Ok(renderer) => {
                tracing::info!(
                    width = window_config.width,
                    height = window_config.height,
                    mode = ?self.config.mode,
                    "window ready"
                );
                self.renderer = Some(renderer);
                self.redraw_pending = !self.rgba.is_empty();
                window.request_redraw();
                self.window = Some(window);
            }
            Err(err) => {
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                if let Some(name) = key_name(&event.logical_key) {
                    if !self.commands.push_key(&self.config.bindings, &name) {
                        tracing::trace!(key = %name, "unbound key");
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if self.redraw_pending {
                    self.draw();
                }
            }
            _ => {}
        }
    }
}

/// [`Display`] that shows the image in a native window.
pub struct WindowDisplay {
    event_loop: EventLoop<()>,
    app: DisplayApp,
}

impl WindowDisplay {
    /// Create the event loop. The window itself opens on the first pump.
    pub fn new(config: DisplayConfig, geometry: SensorGeometry) -> Result<Self, DisplayError> {
        let event_loop = EventLoop::new().map_err(|err| DisplayError::EventLoop(err.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        let title = config.title.clone();
        Ok(Self {
            event_loop,
            app: DisplayApp {
                config,
                geometry,
                window: None,
                renderer: None,
                commands: CommandQueue::new(),
                rgba: Vec::new(),
                title,
                redraw_pending: false,
                error: None,
            },
        })
    }
}

impl Display for WindowDisplay {
    type Error = DisplayError;

    fn present(&mut self, snapshot: &Snapshot<'_>) -> Result<(), DisplayError> {
        if let Some(err) = self.app.error.take() {
            return Err(err);
        }

        let colormap = Colormap::for_mode(snapshot.status.mode);
        colorize(snapshot.image, colormap, snapshot.marker, &mut self.app.rgba);

        let title = format!("{}  {}", self.app.config.title, snapshot.status);
        if let Some(window) = &self.app.window {
            if title != self.app.title {
                window.set_title(&title);
                self.app.title = title;
            }
        }

        self.app.redraw_pending = true;
        match self.app.config.mode {
            DisplayMode::Quick => self.app.draw(),
            DisplayMode::Safe => {
                if let Some(window) = &self.app.window {
                    window.request_redraw();
                }
            }
        }

        match self.app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn pump(&mut self, commands: &mut Vec<RateCommand>) -> DisplayStatus {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app);
        self.app.commands.drain_into(commands);

        // Let the next present report the failure instead of a clean close.
        if self.app.error.is_some() {
            return DisplayStatus::Continue;
        }
        match status {
            PumpStatus::Continue => DisplayStatus::Continue,
            PumpStatus::Exit(code) => {
                tracing::info!(code, "window closed");
                DisplayStatus::Closed
            }
        }
    }
}

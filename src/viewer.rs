//! Standalone galaxy window backed by winit.
//!
//! When the `gui` feature is enabled, a wry webview panel is created
//! alongside the 3D viewport for the schema-driven options UI.
//!
//! ```no_run
//! # use galaxy::Viewer;
//! Viewer::builder()
//!     .with_textures("assets/textures")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    error::GalaxyError, options::Options, textures::TextureLoader,
    GalaxyEngine, InputEvent, MouseButton,
};
#[cfg(feature = "gui")]
use crate::GalaxyCommand;

/// Preset file written by the panel's save button when no `--options`
/// file was given.
const DEFAULT_OPTIONS_PATH: &str = "galaxy.toml";

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    options_path: Option<PathBuf>,
    textures: Option<PathBuf>,
    title: String,
}

impl ViewerBuilder {
    /// Create a builder with defaults (title "Galaxy", default options,
    /// no textures).
    fn new() -> Self {
        Self {
            options: None,
            options_path: None,
            textures: None,
            title: "Galaxy".into(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Preset file the panel saves to.
    #[must_use]
    pub fn with_options_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options_path = Some(path.into());
        self
    }

    /// Directory holding the planet's material maps.
    #[must_use]
    pub fn with_textures(mut self, dir: impl Into<PathBuf>) -> Self {
        self.textures = Some(dir.into());
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options.unwrap_or_default(),
            options_path: self
                .options_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OPTIONS_PATH)),
            textures: self.textures,
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays the galaxy.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    #[cfg_attr(not(feature = "gui"), allow(dead_code))]
    options_path: PathBuf,
    textures: Option<PathBuf>,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError::Viewer`] if the event loop cannot be created
    /// or exits abnormally.
    pub fn run(self) -> Result<(), GalaxyError> {
        let event_loop =
            EventLoop::new().map_err(|e| GalaxyError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            options: Some(self.options),
            textures: self.textures,
            title: self.title,
            #[cfg(feature = "gui")]
            panel: crate::gui::panel::PanelController::new(self.options_path),
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| GalaxyError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<GalaxyEngine>,
    /// Taken when the engine is created.
    options: Option<Options>,
    textures: Option<PathBuf>,
    title: String,
    #[cfg(feature = "gui")]
    panel: crate::gui::panel::PanelController,
}

/// The wgpu surface always covers the full window; the options panel
/// overlays its right edge.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

/// Start the background texture load, if a directory was given.
fn start_texture_loader(dir: Option<&PathBuf>) -> Option<TextureLoader> {
    let dir = dir?;
    match TextureLoader::spawn(dir.clone()) {
        Ok(loader) => Some(loader),
        Err(e) => {
            log::warn!("planet textures disabled: {e}");
            None
        }
    }
}

impl ViewerApp {
    fn redraw(&mut self) {
        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };

        #[cfg(feature = "gui")]
        self.panel.drain_and_apply(engine, window);

        engine.update();
        match engine.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let (vp_w, vp_h) = viewport_size(window.inner_size());
                engine.resize(vp_w, vp_h);
                engine.reconfigure();
            }
            Err(e) => log::error!("render error: {e:?}"),
        }

        #[cfg(feature = "gui")]
        self.panel
            .push_stats_if_due(std::time::Instant::now(), engine);

        window.request_redraw();
    }

    fn key_pressed(&mut self, code: KeyCode) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        let command = engine.handle_key_press(&format!("{code:?}"));

        #[cfg(feature = "gui")]
        if command == Some(GalaxyCommand::TogglePanel) {
            if let Some(window) = &self.window {
                self.panel.toggle(window);
            }
        }
        #[cfg(not(feature = "gui"))]
        let _ = command;
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            let logical_w = (mon_size.width as f64 / scale * 0.75) as u32;
            let logical_h = (mon_size.height as f64 / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let options = self.options.take().unwrap_or_default();
        let textures = start_texture_loader(self.textures.as_ref());
        let engine = match pollster::block_on(GalaxyEngine::new(
            window.clone(),
            viewport_size(window.inner_size()),
            options,
            textures,
        )) {
            Ok(e) => e,
            Err(e) => {
                log::error!("Failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(feature = "gui")]
        self.panel.init_webview(window.as_ref(), &engine);

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        // Guard: both window and engine must be initialised.
        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                let (vp_w, vp_h) = viewport_size(size);
                if let Some(engine) = &mut self.engine {
                    engine.resize(vp_w, vp_h);
                }
                #[cfg(feature = "gui")]
                if let Some(window) = &self.window {
                    self.panel.apply_layout(window);
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let inner = self.window.as_ref().map(|w| w.inner_size());
                if let (Some(engine), Some(inner)) = (&mut self.engine, inner) {
                    let (vp_w, vp_h) = viewport_size(inner);
                    engine.resize(vp_w, vp_h);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(engine) = &mut self.engine {
                    engine.handle_input(InputEvent::MouseButton {
                        button: MouseButton::from(button),
                        pressed: state == ElementState::Pressed,
                    });
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(engine) = &mut self.engine {
                    engine.handle_input(InputEvent::CursorMoved {
                        x: position.x as f32,
                        y: position.y as f32,
                    });
                }

                #[cfg(feature = "gui")]
                if let Some(window) = &self.window {
                    self.panel.update_peek(position.x as f32, window);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                if let Some(engine) = &mut self.engine {
                    engine.handle_input(InputEvent::Scroll {
                        delta: scroll_delta,
                    });
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                if let Some(engine) = &mut self.engine {
                    engine.handle_input(InputEvent::ModifiersChanged {
                        shift: modifiers.state().shift_key(),
                    });
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.key_pressed(code);
                }
            }

            _ => (),
        }
    }
}

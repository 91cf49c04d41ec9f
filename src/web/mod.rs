//! Browser entry point: renders into a `<canvas>` and drives frames with
//! `requestAnimationFrame`.
//!
//! An options panel built from the same schema as the native one is
//! mounted next to the canvas; `\` (or whatever `toggle_panel` is bound
//! to) shows and hides it.
//!
//! ```js
//! import init, { run } from "./galaxy.js";
//! await init();
//! const galaxy = await run("galaxy-canvas", "assets/textures");
//! galaxy.setOption("galaxy", "branches", "5");
//! ```

mod panel;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement,
    KeyboardEvent, MouseEvent, WheelEvent,
};

use self::panel::WebPanel;
use crate::options::Options;
use crate::textures::TextureLoader;
use crate::{GalaxyCommand, GalaxyEngine, InputEvent, MouseButton};

/// Canvas backing store is capped at twice the CSS size.
const MAX_PIXEL_RATIO: f64 = 2.0;

/// Browser pixels per wheel "line" step.
const WHEEL_PIXELS_PER_STEP: f64 = 100.0;

type SharedEngine = Rc<RefCell<GalaxyEngine>>;
type SharedPanel = Rc<RefCell<WebPanel>>;
type Listener = Closure<dyn FnMut(Event)>;

/// Install the panic hook and console logger. Runs when the module loads.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Handle returned to JavaScript. It owns the input listeners, so keep
/// it alive for as long as the canvas is on the page.
#[wasm_bindgen]
pub struct GalaxyHandle {
    engine: SharedEngine,
    panel: SharedPanel,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl GalaxyHandle {
    /// Apply one `section.field = value` edit. `value` is JSON text.
    /// Returns `false` if the edit was rejected.
    #[wasm_bindgen(js_name = setOption)]
    pub fn set_option(&self, section: &str, field: &str, value: &str) -> bool {
        let Ok(value) = serde_json::from_str(value) else {
            return false;
        };
        self.engine
            .try_borrow_mut()
            .is_ok_and(|mut engine| engine.set_option(section, field, value))
    }

    /// Current options as JSON.
    #[wasm_bindgen(js_name = optionsJson)]
    #[must_use]
    pub fn options_json(&self) -> String {
        self.engine
            .try_borrow()
            .ok()
            .and_then(|engine| serde_json::to_string(engine.options()).ok())
            .unwrap_or_default()
    }

    /// JSON schema describing the options, for building a panel.
    #[wasm_bindgen(js_name = schemaJson)]
    #[must_use]
    pub fn schema_json() -> String {
        serde_json::to_string(&Options::json_schema()).unwrap_or_default()
    }

    /// Regenerate with a fresh random seed.
    pub fn regenerate(&self) {
        if let Ok(mut engine) = self.engine.try_borrow_mut() {
            engine.execute(GalaxyCommand::Regenerate);
        }
    }

    /// Show or hide the options panel.
    #[wasm_bindgen(js_name = togglePanel)]
    pub fn toggle_panel(&self) {
        self.panel.borrow().toggle();
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.engine.try_borrow().map_or(0.0, |engine| engine.fps())
    }
}

/// Mount the galaxy on the canvas with id `canvas_id`. Planet textures are
/// fetched from `texture_base` when given.
///
/// # Errors
///
/// Rejects if the canvas is missing or the GPU cannot be initialised.
#[wasm_bindgen]
pub async fn run(
    canvas_id: String,
    texture_base: Option<String>,
) -> Result<GalaxyHandle, JsValue> {
    let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
    let document = window.document().ok_or_else(|| js_error("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(&canvas_id)
        .ok_or_else(|| js_error(&format!("no element #{canvas_id}")))?
        .dyn_into()
        .map_err(|_| js_error(&format!("#{canvas_id} is not a canvas")))?;

    let size = fit_canvas(&window, &canvas);
    let textures = texture_base.as_deref().map(TextureLoader::fetch);
    let engine = GalaxyEngine::new(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        size,
        Options::default(),
        textures,
    )
    .await
    .map_err(|e| js_error(&e.to_string()))?;

    let engine = Rc::new(RefCell::new(engine));
    let panel = Rc::new(RefCell::new(WebPanel::mount(&document, &engine)?));
    let listeners = install_listeners(&window, &canvas, &engine, &panel)?;
    start_animation_loop(&window, Rc::clone(&engine), Rc::clone(&panel))?;

    Ok(GalaxyHandle {
        engine,
        panel,
        _listeners: listeners,
    })
}

fn js_error(message: &str) -> JsValue {
    JsValue::from_str(message)
}

fn pixel_ratio(window: &web_sys::Window) -> f64 {
    window.device_pixel_ratio().min(MAX_PIXEL_RATIO)
}

/// Size the canvas backing store to its CSS box times the capped pixel
/// ratio. Returns the new size in physical pixels.
fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
    let ratio = pixel_ratio(window);
    let width = ((f64::from(canvas.client_width()) * ratio) as u32).max(1);
    let height = ((f64::from(canvas.client_height()) * ratio) as u32).max(1);
    canvas.set_width(width);
    canvas.set_height(height);
    (width, height)
}

// ── Frame loop ───────────────────────────────────────────────────────────

fn frame(engine: &mut GalaxyEngine) {
    engine.update();
    match engine.render() {
        Ok(()) => {}
        Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
            engine.reconfigure();
        }
        Err(e) => log::error!("render error: {e:?}"),
    }
}

fn start_animation_loop(
    window: &web_sys::Window,
    engine: SharedEngine,
    panel: SharedPanel,
) -> Result<(), JsValue> {
    let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> =
        Rc::new(RefCell::new(None));
    let next = Rc::clone(&callback);
    let scheduler = window.clone();

    *callback.borrow_mut() = Some(Closure::new(move || {
        if let Ok(mut engine) = engine.try_borrow_mut() {
            frame(&mut engine);
            if let Ok(mut panel) = panel.try_borrow_mut() {
                panel.update_stats(&engine);
            }
        }
        if let Some(cb) = next.borrow().as_ref() {
            if let Err(e) =
                scheduler.request_animation_frame(cb.as_ref().unchecked_ref())
            {
                log::error!("requestAnimationFrame failed: {e:?}");
            }
        }
    }));

    let first = callback.borrow();
    let cb = first
        .as_ref()
        .ok_or_else(|| js_error("animation callback missing"))?;
    let _ = window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    Ok(())
}

// ── Event listeners ──────────────────────────────────────────────────────

fn listen(
    target: &EventTarget,
    kind: &str,
    engine: &SharedEngine,
    handler: impl Fn(&mut GalaxyEngine, &Event) + 'static,
) -> Result<Listener, JsValue> {
    let engine = Rc::clone(engine);
    let closure = Listener::new(move |event: Event| {
        if let Ok(mut engine) = engine.try_borrow_mut() {
            handler(&mut engine, &event);
        }
    });
    let options = AddEventListenerOptions::new();
    options.set_passive(false);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        kind,
        closure.as_ref().unchecked_ref(),
        &options,
    )?;
    Ok(closure)
}

fn install_listeners(
    window: &web_sys::Window,
    canvas: &HtmlCanvasElement,
    engine: &SharedEngine,
    panel: &SharedPanel,
) -> Result<Vec<Listener>, JsValue> {
    let key_panel = Rc::clone(panel);
    let move_window = window.clone();
    let resize_window = window.clone();
    let resize_canvas = canvas.clone();

    Ok(vec![
        listen(canvas, "mousedown", engine, |engine, event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                engine.handle_input(InputEvent::ModifiersChanged {
                    shift: mouse.shift_key(),
                });
                engine.handle_input(InputEvent::MouseButton {
                    button: MouseButton::from_dom(mouse.button()),
                    pressed: true,
                });
            }
        })?,
        listen(window, "mouseup", engine, |engine, event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                engine.handle_input(InputEvent::MouseButton {
                    button: MouseButton::from_dom(mouse.button()),
                    pressed: false,
                });
            }
        })?,
        listen(window, "mousemove", engine, move |engine, event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                let ratio = pixel_ratio(&move_window);
                engine.handle_input(InputEvent::CursorMoved {
                    x: (f64::from(mouse.client_x()) * ratio) as f32,
                    y: (f64::from(mouse.client_y()) * ratio) as f32,
                });
            }
        })?,
        listen(canvas, "wheel", engine, |engine, event| {
            if let Some(wheel) = event.dyn_ref::<WheelEvent>() {
                event.prevent_default();
                let steps = if wheel.delta_mode() == WheelEvent::DOM_DELTA_PIXEL {
                    wheel.delta_y() / WHEEL_PIXELS_PER_STEP
                } else {
                    wheel.delta_y()
                };
                engine.handle_input(InputEvent::Scroll {
                    delta: -steps as f32,
                });
            }
        })?,
        listen(canvas, "contextmenu", engine, |_, event| {
            event.prevent_default();
        })?,
        listen(window, "keydown", engine, move |engine, event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if key.repeat() || typing_in_panel(event) {
                return;
            }
            match engine.handle_key_press(&key.code()) {
                Some(GalaxyCommand::TogglePanel) => {
                    event.prevent_default();
                    key_panel.borrow().toggle();
                }
                Some(_) => event.prevent_default(),
                None => {}
            }
        })?,
        listen(window, "resize", engine, move |engine, _| {
            let (width, height) = fit_canvas(&resize_window, &resize_canvas);
            engine.resize(width, height);
        })?,
    ])
}

/// Keys typed into a panel text field are not shortcuts.
fn typing_in_panel(event: &Event) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .is_some_and(|input| input.type_() == "text")
}

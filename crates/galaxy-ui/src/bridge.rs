//! IPC bridge between the wry webview (native) and the Dioxus WASM app.
//!
//! **Inbound** (native → WASM): the native side calls
//! `window.__galaxy_push_schema(json)`, `__galaxy_push_options(json)`,
//! `__galaxy_push_stats(json)` and `__galaxy_push_panel_pinned(bool)`,
//! which dispatch `CustomEvent`s that we listen to here.
//!
//! **Outbound** (WASM → native): we call `window.ipc.postMessage(json)` to
//! send actions back to the engine.

use dioxus::signals::{Signal, Writable};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

// ── Inbound listeners ────────────────────────────────────────────────────

/// Attach a window listener for `event`, handing each event's `detail`
/// to `on_detail`. The closure lives for the rest of the page.
fn listen(event: &str, mut on_detail: impl FnMut(JsValue) + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::<dyn FnMut(web_sys::CustomEvent)>::new(
        move |evt: web_sys::CustomEvent| on_detail(evt.detail()),
    );
    if window
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_ok()
    {
        closure.forget();
    }
}

/// Parse a JSON-string event detail.
fn detail_json(detail: &JsValue) -> Option<Value> {
    serde_json::from_str(&detail.as_string()?).ok()
}

/// Register `CustomEvent` listeners that push schema and options JSON into
/// the provided signals. Call once at app startup.
pub fn register_listeners(
    mut schema_sig: Signal<Option<Value>>,
    mut options_sig: Signal<Option<Value>>,
) {
    listen("galaxy-schema", move |detail| {
        if let Some(val) = detail_json(&detail) {
            schema_sig.set(Some(val));
        }
    });
    listen("galaxy-options", move |detail| {
        if let Some(val) = detail_json(&detail) {
            options_sig.set(Some(val));
        }
    });
}

/// Register a listener for stats updates (FPS, particle count, buffers,
/// seed) from the native engine.
pub fn register_stats_listener(mut stats_sig: Signal<Option<Value>>) {
    listen("galaxy-stats", move |detail| {
        if let Some(val) = detail_json(&detail) {
            stats_sig.set(Some(val));
        }
    });
}

/// Register a listener for panel pinned state changes from the native
/// engine.
pub fn register_panel_listener(mut pinned_sig: Signal<bool>) {
    listen("galaxy-panel-pinned", move |detail| {
        if let Some(pinned) = detail.as_bool() {
            pinned_sig.set(pinned);
        }
    });
}

// ── Outbound actions ─────────────────────────────────────────────────────

/// Send a `toggle_panel` action to the native engine.
pub fn send_toggle_panel() {
    post_message(&serde_json::json!({ "action": "toggle_panel" }));
}

/// Send a `resize_panel` action to the native engine.
pub fn send_resize_panel(width: u32) {
    post_message(&serde_json::json!({ "action": "resize_panel", "width": width }));
}

/// Send a `save_options` action to the native engine.
pub fn send_save_options() {
    post_message(&serde_json::json!({ "action": "save_options" }));
}

/// Send a `set_option` action to the native engine.
pub fn send_set_option(path: &str, field: &str, value: &Value) {
    post_message(&serde_json::json!({
        "action": "set_option",
        "path": path,
        "field": field,
        "value": value,
    }));
}

/// Call `window.ipc.postMessage(json)` to send a message to the native
/// wry IPC handler.
fn post_message(msg: &Value) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(ipc) = js_sys::Reflect::get(&window, &JsValue::from_str("ipc")) else {
        return;
    };
    let Ok(post) = js_sys::Reflect::get(&ipc, &JsValue::from_str("postMessage"))
    else {
        return;
    };
    if let Some(post) = post.dyn_ref::<js_sys::Function>() {
        let _ = post.call1(&ipc, &JsValue::from_str(&msg.to_string()));
    }
}

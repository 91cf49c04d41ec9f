//! Wry webview child of the winit window.
//!
//! Creates a [`wry::WebView`] positioned at the right edge of the window,
//! loads the galaxy-ui WASM bundle via a custom `galaxy://` protocol, and
//! bridges IPC between the Dioxus web app and the native engine.

use std::borrow::Cow;
use std::sync::mpsc;

use rust_embed::RustEmbed;
use wry::http::{header::CONTENT_TYPE, Response};
use wry::{dpi, Rect, WebView, WebViewBuilder};

use crate::engine::EngineStats;
use crate::options::Options;

/// Embedded galaxy-ui dist output (built by `trunk build`).
#[derive(RustEmbed)]
#[folder = "crates/galaxy-ui/dist/"]
struct UiAssets;

/// Default width of the options panel in physical pixels.
pub const PANEL_WIDTH: u32 = 320;

/// Actions sent from the webview WASM app to the native engine.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Set a single option field: `options[path][field] = value`.
    SetOption {
        /// Top-level section key (e.g. `"galaxy"`).
        path: String,
        /// Field key within the section (e.g. `"spin"`).
        field: String,
        /// New JSON value.
        value: serde_json::Value,
    },
    /// Pin or unpin the panel.
    TogglePanel,
    /// The user dragged the panel's left edge.
    ResizePanel {
        /// Requested width in physical pixels.
        width: u32,
    },
    /// Write the current options to the preset file.
    SaveOptions,
}

/// Create the wry webview as a child of the given window.
///
/// Returns `(webview, action_rx)`. The receiver yields [`UiAction`]s
/// from the WASM app.
///
/// # Errors
///
/// Returns the [`wry::Error`] if the webview cannot be created.
pub fn create_webview<W: wry::raw_window_handle::HasWindowHandle>(
    window: &W,
    window_width: u32,
    window_height: u32,
    panel_width: u32,
) -> Result<(WebView, mpsc::Receiver<UiAction>), wry::Error> {
    let (tx, rx) = mpsc::channel();

    let bounds = panel_bounds(window_width, window_height, panel_width);

    let webview = WebViewBuilder::new()
        .with_bounds(bounds)
        .with_transparent(true)
        .with_custom_protocol("galaxy".into(), |_id, request| {
            let path = request.uri().path();
            let path = if path == "/" { "index.html" } else { &path[1..] };

            match UiAssets::get(path) {
                Some(asset) => {
                    let mime = mime_guess::from_path(path)
                        .first_or_octet_stream()
                        .to_string();
                    Response::builder()
                        .header(CONTENT_TYPE, mime)
                        .body(Cow::from(asset.data.to_vec()))
                        .unwrap_or_else(|_| Response::new(Cow::from(Vec::new())))
                }
                None => Response::builder()
                    .status(404)
                    .body(Cow::from(Vec::new()))
                    .unwrap_or_else(|_| Response::new(Cow::from(Vec::new()))),
            }
        })
        .with_url("galaxy://localhost/")
        .with_initialization_script(BRIDGE_JS)
        .with_ipc_handler(move |req| {
            let Ok(msg) = serde_json::from_str::<serde_json::Value>(req.body())
            else {
                return;
            };
            match parse_action(&msg) {
                Some(action) => {
                    let _ = tx.send(action);
                }
                None => log::debug!("ignored panel message: {msg}"),
            }
        })
        .build_as_child(window)?;

    Ok((webview, rx))
}

/// Compute the [`Rect`] for a pinned panel flush with the right edge.
#[must_use]
pub fn panel_bounds(
    window_width: u32,
    window_height: u32,
    panel_width: u32,
) -> Rect {
    let width = panel_width.min(window_width);
    physical_rect(window_width - width, 0, width, window_height)
}

/// Compute the [`Rect`] for a floating (peeked) panel inset by `margin`.
#[must_use]
pub fn panel_bounds_floating(
    window_width: u32,
    window_height: u32,
    panel_width: u32,
    margin: u32,
) -> Rect {
    let width = panel_width.min(window_width.saturating_sub(2 * margin));
    let x = window_width.saturating_sub(width + margin);
    physical_rect(
        x,
        margin,
        width,
        window_height.saturating_sub(2 * margin),
    )
}

/// A rect parked just past the right edge of the window.
#[must_use]
pub fn hidden_bounds(
    window_width: u32,
    window_height: u32,
    panel_width: u32,
) -> Rect {
    physical_rect(window_width, 0, panel_width, window_height)
}

fn physical_rect(x: u32, y: u32, width: u32, height: u32) -> Rect {
    Rect {
        position: dpi::Position::Physical(dpi::PhysicalPosition::new(
            x as i32, y as i32,
        )),
        size: dpi::Size::Physical(dpi::PhysicalSize::new(width, height)),
    }
}

/// Push the Options JSON schema to the webview, followed by the current
/// values (call once after creation).
pub fn push_schema(webview: &WebView, options: &Options) {
    let schema = Options::json_schema();
    let json = serde_json::to_string(&schema).unwrap_or_default();
    call_bridge(webview, "__galaxy_push_schema", &json);
    push_options(webview, options);
}

/// Push the current Options state to the webview.
pub fn push_options(webview: &WebView, options: &Options) {
    let json = serde_json::to_string(options).unwrap_or_default();
    call_bridge(webview, "__galaxy_push_options", &json);
}

/// Push frame statistics to the webview.
pub fn push_stats(webview: &WebView, stats: &EngineStats) {
    let json = serde_json::to_string(stats).unwrap_or_default();
    call_bridge(webview, "__galaxy_push_stats", &json);
}

/// Tell the webview whether the panel is pinned.
pub fn push_panel_pinned(webview: &WebView, pinned: bool) {
    let _ = webview
        .evaluate_script(&format!("window.__galaxy_push_panel_pinned({pinned})"));
}

// ── Internals ────────────────────────────────────────────────────────────

/// Build `window.<function>('<payload>')` with the payload as a JS string
/// literal.
fn bridge_call(function: &str, payload: &str) -> String {
    let literal = serde_json::to_string(payload).unwrap_or_else(|_| "''".to_owned());
    format!("window.{function}({literal})")
}

fn call_bridge(webview: &WebView, function: &str, payload: &str) {
    let _ = webview.evaluate_script(&bridge_call(function, payload));
}

/// JavaScript injected before page load. Defines the bridge functions that
/// native code calls, and dispatches `CustomEvent`s to the WASM app.
///
/// Calls that arrive before the WASM app has registered listeners are
/// buffered. When a listener attaches it replays any pending data.
const BRIDGE_JS: &str = r#"
(function() {
    var pending = { schema: null, options: null, stats: null, pinned: null };

    function dispatch(name, detail) {
        window.dispatchEvent(new CustomEvent(name, { detail: detail }));
    }

    window.__galaxy_push_schema = function(json) {
        pending.schema = json;
        dispatch('galaxy-schema', json);
    };
    window.__galaxy_push_options = function(json) {
        pending.options = json;
        dispatch('galaxy-options', json);
    };
    window.__galaxy_push_stats = function(json) {
        pending.stats = json;
        dispatch('galaxy-stats', json);
    };
    window.__galaxy_push_panel_pinned = function(pinned) {
        pending.pinned = pinned;
        dispatch('galaxy-panel-pinned', pinned);
    };

    var replay = {
        'galaxy-schema': 'schema',
        'galaxy-options': 'options',
        'galaxy-stats': 'stats',
        'galaxy-panel-pinned': 'pinned'
    };
    var origAdd = EventTarget.prototype.addEventListener;
    EventTarget.prototype.addEventListener = function(type, fn, opts) {
        origAdd.call(this, type, fn, opts);
        var key = replay[type];
        if (this === window && key && pending[key] !== null) {
            dispatch(type, pending[key]);
        }
    };
})();
"#;

/// Parse an IPC message from the WASM side into a [`UiAction`].
fn parse_action(msg: &serde_json::Value) -> Option<UiAction> {
    let action = msg.get("action")?.as_str()?;
    match action {
        "set_option" => {
            let path = msg.get("path")?.as_str()?.to_owned();
            let field = msg.get("field")?.as_str()?.to_owned();
            let value = msg.get("value")?.clone();
            Some(UiAction::SetOption { path, field, value })
        }
        "toggle_panel" => Some(UiAction::TogglePanel),
        "resize_panel" => {
            let width = msg.get("width")?.as_f64()?;
            (width.is_finite() && width > 0.0).then(|| UiAction::ResizePanel {
                width: width.round() as u32,
            })
        }
        "save_options" => Some(UiAction::SaveOptions),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_set_option() {
        let msg = json!({
            "action": "set_option",
            "path": "galaxy",
            "field": "branches",
            "value": 5,
        });
        assert_eq!(
            parse_action(&msg),
            Some(UiAction::SetOption {
                path: "galaxy".to_owned(),
                field: "branches".to_owned(),
                value: json!(5),
            })
        );
    }

    #[test]
    fn parses_panel_actions() {
        assert_eq!(
            parse_action(&json!({"action": "toggle_panel"})),
            Some(UiAction::TogglePanel)
        );
        assert_eq!(
            parse_action(&json!({"action": "resize_panel", "width": 410.4})),
            Some(UiAction::ResizePanel { width: 410 })
        );
        assert_eq!(
            parse_action(&json!({"action": "save_options"})),
            Some(UiAction::SaveOptions)
        );
    }

    #[test]
    fn rejects_malformed_messages() {
        assert_eq!(parse_action(&json!({})), None);
        assert_eq!(parse_action(&json!({"action": "explode"})), None);
        assert_eq!(
            parse_action(&json!({"action": "set_option", "path": "galaxy"})),
            None
        );
        assert_eq!(
            parse_action(&json!({"action": "resize_panel", "width": "wide"})),
            None
        );
        assert_eq!(
            parse_action(&json!({"action": "resize_panel", "width": -3})),
            None
        );
    }

    #[test]
    fn bridge_call_escapes_payload() {
        let call = bridge_call("__galaxy_push_options", r#"{"a":"it's \"x\""}"#);
        assert_eq!(
            call,
            r#"window.__galaxy_push_options("{\"a\":\"it's \\\"x\\\"\"}")"#
        );
    }

    #[test]
    fn pinned_bounds_hug_right_edge() {
        let rect = panel_bounds(1000, 700, 320);
        assert_eq!(
            rect.position,
            dpi::Position::Physical(dpi::PhysicalPosition::new(680, 0))
        );
        assert_eq!(
            rect.size,
            dpi::Size::Physical(dpi::PhysicalSize::new(320, 700))
        );

        let narrow = panel_bounds(200, 700, 320);
        assert_eq!(
            narrow.size,
            dpi::Size::Physical(dpi::PhysicalSize::new(200, 700))
        );
    }

    #[test]
    fn floating_bounds_respect_margin() {
        let rect = panel_bounds_floating(1000, 700, 320, 10);
        assert_eq!(
            rect.position,
            dpi::Position::Physical(dpi::PhysicalPosition::new(670, 10))
        );
        assert_eq!(
            rect.size,
            dpi::Size::Physical(dpi::PhysicalSize::new(320, 680))
        );
    }
}

//! Dioxus web app for the galaxy options panel.
//!
//! Compiled to WASM and loaded into a wry webview by the native viewer.
//! Communicates with the engine via a JSON IPC bridge.

mod bridge;
mod schema_ui;

use dioxus::prelude::*;
use serde_json::Value;

fn main() {
    launch(app);
}

fn app() -> Element {
    let schema: Signal<Option<Value>> = use_signal(|| None);
    let options: Signal<Option<Value>> = use_signal(|| None);
    let stats: Signal<Option<Value>> = use_signal(|| None);
    let panel_pinned: Signal<bool> = use_signal(|| true);

    // Register IPC listeners once on mount.
    let _ = use_effect(move || {
        bridge::register_listeners(schema, options);
        bridge::register_stats_listener(stats);
        bridge::register_panel_listener(panel_pinned);
    });

    let schema_val = schema.read();
    let ready = options.read().is_some();

    match &*schema_val {
        Some(s) if ready => rsx! {
            schema_ui::SchemaPanel {
                schema: s.clone(),
                options_sig: options,
                stats_sig: stats,
                panel_pinned: panel_pinned,
            }
        },
        _ => rsx! {
            div {
                style: "padding: 16px; color: #585b70;",
                "Waiting for engine..."
            }
        },
    }
}

//! Schema-driven UI generation.
//!
//! Walks a JSON Schema object produced by `schemars` and renders Dioxus
//! controls that match each field's type. When a user changes a value, the
//! bridge sends a `set_option` IPC message to the native engine.
//!
//! Schema extensions understood here: `step` (slider granularity),
//! `format = "color"` (color picker), and `on_finish` (send only when the
//! control is released instead of on every input event).

// `rsx!` expands event-handler closures in a way that trips this lint.
#![allow(unused_qualifications)]

use dioxus::prelude::*;
use serde_json::Value;

use crate::bridge;

/// Convert a `snake_case` string to `Title Case`.
fn display_name(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    format!("{upper}{}", chars.as_str())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a slider value with as many decimals as its step uses.
fn format_value(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10()).round().max(0.0) as usize
    };
    format!("{value:.decimals$}")
}

/// Send an edit to the engine and mirror it into the local options so
/// value labels update immediately.
fn commit(
    mut options_sig: Signal<Option<Value>>,
    section: &str,
    field: &str,
    value: Value,
) {
    bridge::send_set_option(section, field, &value);
    if let Some(slot) = options_sig
        .write()
        .as_mut()
        .and_then(|o| o.get_mut(section))
        .and_then(|s| s.get_mut(field))
    {
        *slot = value;
    }
}

/// Leaf component that reads the stats signal. Only this component
/// re-renders when stats update, leaving the rest of the panel untouched.
#[component]
fn StatsBlock(stats_sig: Signal<Option<Value>>) -> Element {
    let stats = stats_sig.read();
    let number = |key: &str, decimals: usize| {
        stats
            .as_ref()
            .and_then(|s| s.get(key))
            .and_then(Value::as_f64)
            .map_or_else(|| "--".to_owned(), |v| format!("{v:.decimals$}"))
    };
    let fps = number("fps", 0);
    let particles = number("particles", 0);
    let buffers = number("live_buffers", 0);
    let resolution = format!("{}×{}", number("width", 0), number("height", 0));
    let seed = stats
        .as_ref()
        .and_then(|s| s.get("seed"))
        .and_then(Value::as_u64)
        .map_or_else(|| "--".to_owned(), |v| v.to_string());

    rsx! {
        div { class: "field-row",
            label { class: "field-label", "FPS" }
            span {}
            span { class: "stat-value", "{fps}" }
        }
        div { class: "field-row",
            label { class: "field-label", "Particles" }
            span {}
            span { class: "stat-value", "{particles}" }
        }
        div { class: "field-row",
            label { class: "field-label", "GPU Buffers" }
            span {}
            span { class: "stat-value", "{buffers}" }
        }
        div { class: "field-row seed-row",
            label { class: "field-label", "Resolution" }
            span { class: "stat-value", "{resolution}" }
        }
        div { class: "field-row seed-row",
            label { class: "field-label", "Seed" }
            span { class: "stat-value", "{seed}" }
        }
    }
}

/// Toolbar with the pin toggle and preset save button.
#[component]
fn Toolbar(panel_pinned: Signal<bool>) -> Element {
    let pin_label = if *panel_pinned.read() { "Unpin" } else { "Pin" };
    rsx! {
        div { class: "panel-toolbar",
            button {
                onclick: move |_| bridge::send_toggle_panel(),
                "{pin_label}"
            }
            button {
                onclick: move |_| bridge::send_save_options(),
                "Save preset"
            }
        }
    }
}

/// Drag strip on the panel's left edge. Dragging left widens the panel.
#[component]
fn ResizeHandle() -> Element {
    let mut drag_start: Signal<Option<(f64, f64)>> = use_signal(|| None);

    let window_width = || {
        web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    };
    let pixel_ratio = || web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());

    rsx! {
        div {
            class: "resize-handle",
            onpointerdown: move |evt: Event<PointerData>| {
                drag_start.set(Some((evt.screen_coordinates().x, window_width())));
            },
            onpointermove: move |evt: Event<PointerData>| {
                if let Some((start_x, start_width)) = *drag_start.read() {
                    let css_width = start_width + (start_x - evt.screen_coordinates().x);
                    bridge::send_resize_panel((css_width * pixel_ratio()).max(0.0) as u32);
                }
            },
            onpointerup: move |_| drag_start.set(None),
            onpointerleave: move |_| drag_start.set(None),
        }
    }
}

/// Top-level component: renders collapsible sections for each schema
/// property group.
#[component]
pub fn SchemaPanel(
    schema: Value,
    options_sig: Signal<Option<Value>>,
    stats_sig: Signal<Option<Value>>,
    panel_pinned: Signal<bool>,
) -> Element {
    let Some(props) = schema.pointer("/properties").and_then(Value::as_object)
    else {
        return rsx! { p { "No schema loaded" } };
    };

    let options = options_sig.read().clone().unwrap_or(Value::Null);
    let show_stats = options
        .pointer("/debug/show_stats")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    rsx! {
        div { class: "side-panel",
            ResizeHandle {}
            Toolbar { panel_pinned }
            for (section_key, section_schema) in props.iter() {
                {render_section(
                    section_key,
                    section_schema,
                    options.get(section_key),
                    options_sig,
                    (section_key == "debug" && show_stats).then_some(stats_sig),
                )}
            }
        }
    }
}

/// Render a collapsible section (one top-level Options field).
///
/// When `stats_sig` is provided (for the Debug section), a `StatsBlock`
/// is rendered at the top of the section body.
fn render_section(
    key: &str,
    schema: &Value,
    current: Option<&Value>,
    options_sig: Signal<Option<Value>>,
    stats_sig: Option<Signal<Option<Value>>>,
) -> Element {
    let title = schema
        .get("title")
        .and_then(Value::as_str)
        .map_or_else(|| display_name(key), String::from);

    let properties = schema.pointer("/properties").and_then(Value::as_object);

    rsx! {
        details { open: true,
            summary { class: "section-header",
                "{title}"
            }
            div { class: "section-body",
                if let Some(sig) = stats_sig {
                    StatsBlock { stats_sig: sig }
                }
                if let Some(props) = properties {
                    for (field_key, field_schema) in props.iter() {
                        {render_field(
                            key,
                            field_key,
                            field_schema,
                            current.and_then(|c| c.get(field_key)),
                            options_sig,
                        )}
                    }
                }
            }
        }
    }
}

/// Render a single field control based on its schema type.
fn render_field(
    section: &str,
    field: &str,
    schema: &Value,
    current: Option<&Value>,
    options_sig: Signal<Option<Value>>,
) -> Element {
    let label = schema
        .get("title")
        .and_then(Value::as_str)
        .map_or_else(|| display_name(field), String::from);

    let field_type = schema.get("type").and_then(Value::as_str);
    let is_color = schema.get("format").and_then(Value::as_str) == Some("color");
    let target = FieldTarget {
        section: section.to_owned(),
        field: field.to_owned(),
        on_finish: schema.get("on_finish").and_then(Value::as_bool) == Some(true),
        options_sig,
    };

    rsx! {
        div { class: "field-row",
            label { class: "field-label",
                "{label}"
            }
            {match field_type {
                Some("number" | "integer") => render_number_field(target, schema, current),
                Some("boolean") => render_bool_field(target, current),
                Some("string") if is_color => render_color_field(target, current),
                Some("string") => render_string_field(target, current),
                _ => rsx! {
                    span { class: "field-value", "(unsupported type)" }
                },
            }}
        }
    }
}

/// Where a control's edits go.
#[derive(Clone)]
struct FieldTarget {
    section: String,
    field: String,
    on_finish: bool,
    options_sig: Signal<Option<Value>>,
}

impl FieldTarget {
    fn send(&self, value: Value) {
        commit(self.options_sig, &self.section, &self.field, value);
    }
}

/// Range slider with min/max/step from the schema and a value label.
fn render_number_field(
    target: FieldTarget,
    schema: &Value,
    current: Option<&Value>,
) -> Element {
    let current_val = current.and_then(Value::as_f64).unwrap_or(0.0);
    let min = schema.get("minimum").and_then(Value::as_f64);
    let max = schema.get("maximum").and_then(Value::as_f64);
    let is_int = schema.get("type").and_then(Value::as_str) == Some("integer");
    let step = schema
        .get("step")
        .and_then(Value::as_f64)
        .unwrap_or(if is_int { 1.0 } else { 0.01 });
    let shown = format_value(current_val, step);

    let parse = move |raw: String| {
        raw.parse::<f64>().ok().map(|v| {
            if is_int {
                Value::from(v.round() as i64)
            } else {
                Value::from(v)
            }
        })
    };
    let on_input = target.clone();
    let on_change = target.clone();

    rsx! {
        input {
            r#type: "range",
            value: "{current_val}",
            step: "{step}",
            min: min.map(|v| format!("{v}")).unwrap_or_default(),
            max: max.map(|v| format!("{v}")).unwrap_or_default(),
            oninput: move |evt: Event<FormData>| {
                if !on_input.on_finish {
                    if let Some(val) = parse(evt.value()) {
                        on_input.send(val);
                    }
                }
            },
            onchange: move |evt: Event<FormData>| {
                if on_change.on_finish {
                    if let Some(val) = parse(evt.value()) {
                        on_change.send(val);
                    }
                }
            },
        }
        span { class: "field-value", "{shown}" }
    }
}

/// Boolean toggle checkbox.
fn render_bool_field(target: FieldTarget, current: Option<&Value>) -> Element {
    let checked = current.and_then(Value::as_bool).unwrap_or(false);

    rsx! {
        input {
            r#type: "checkbox",
            checked: "{checked}",
            onchange: move |evt: Event<FormData>| {
                target.send(Value::Bool(evt.checked()));
            },
        }
        span {}
    }
}

/// Color picker for `#rrggbb` strings.
fn render_color_field(target: FieldTarget, current: Option<&Value>) -> Element {
    let current_str = current.and_then(Value::as_str).unwrap_or("#ffffff").to_owned();
    let on_input = target.clone();

    rsx! {
        input {
            r#type: "color",
            value: "{current_str}",
            oninput: move |evt: Event<FormData>| {
                if !on_input.on_finish {
                    on_input.send(Value::String(evt.value()));
                }
            },
            onchange: move |evt: Event<FormData>| {
                if target.on_finish {
                    target.send(Value::String(evt.value()));
                }
            },
        }
        span { class: "field-value", "{current_str}" }
    }
}

/// Plain text input for string fields.
fn render_string_field(target: FieldTarget, current: Option<&Value>) -> Element {
    let current_str = current.and_then(Value::as_str).unwrap_or("").to_owned();

    rsx! {
        input {
            r#type: "text",
            class: "text-input",
            value: "{current_str}",
            onchange: move |evt: Event<FormData>| {
                target.send(Value::String(evt.value()));
            },
        }
        span {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_title_cases() {
        assert_eq!(display_name("randomness_power"), "Randomness Power");
        assert_eq!(display_name("spin"), "Spin");
    }

    #[test]
    fn format_value_follows_step() {
        assert_eq!(format_value(3.0, 1.0), "3");
        assert_eq!(format_value(0.2, 0.001), "0.200");
        assert_eq!(format_value(1.25, 0.01), "1.25");
        assert_eq!(format_value(100_000.0, 100.0), "100000");
    }
}

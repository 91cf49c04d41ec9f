//! DOM options panel for the browser build.
//!
//! Built from [`Options::panel_sections`], the same schema the native
//! webview panel renders, so both hosts show the same controls. Fields
//! tagged `on_finish` commit on `change` (slider released); the rest
//! commit on every `input`. After each commit the control is reset to
//! whatever the engine holds, so a rejected edit snaps back.

use std::rc::Rc;

use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement};
use web_time::{Duration, Instant};

use super::SharedEngine;
use crate::options::{FieldKind, FieldSpec, Options};
use crate::GalaxyEngine;

/// Minimum time between stats refreshes.
const STATS_INTERVAL: Duration = Duration::from_millis(250);

const PANEL_CSS: &str = "
#galaxy-panel {
    position: fixed; top: 0; right: 0; width: 320px; max-height: 100vh;
    overflow-y: auto; background: rgba(17, 17, 27, 0.92); color: #cdd6f4;
    font: 12px/1.4 system-ui, sans-serif; user-select: none;
}
#galaxy-panel .section-header { padding: 6px 10px; font-weight: 600; cursor: pointer; }
#galaxy-panel .section-body { padding: 0 10px 8px; }
#galaxy-panel .field-row {
    display: grid; grid-template-columns: 110px 1fr 56px;
    align-items: center; gap: 6px; min-height: 24px;
}
#galaxy-panel .field-value, #galaxy-panel .stat-value {
    text-align: right; color: #a6adc8; font-variant-numeric: tabular-nums;
}
#galaxy-panel input[type=range] { width: 100%; }
#galaxy-panel input[type=color] { width: 100%; height: 20px; border: none; background: none; }
";

type Listener = Closure<dyn FnMut(Event)>;

/// The mounted panel. Dropping it detaches the control listeners.
pub(super) struct WebPanel {
    root: HtmlElement,
    stats: Option<StatsRows>,
    last_stats: Option<Instant>,
    _listeners: Vec<Listener>,
}

impl WebPanel {
    /// Build the panel from the options schema and append it to `<body>`.
    pub(super) fn mount(
        document: &Document,
        engine: &SharedEngine,
    ) -> Result<Self, JsValue> {
        let style = document.create_element("style")?;
        style.set_text_content(Some(PANEL_CSS));
        let _ = document
            .head()
            .ok_or_else(|| JsValue::from_str("no <head>"))?
            .append_child(&style)?;

        let root: HtmlElement = document.create_element("aside")?.dyn_into()?;
        root.set_id("galaxy-panel");

        let current = engine
            .try_borrow()
            .ok()
            .and_then(|engine| serde_json::to_value(engine.options()).ok())
            .unwrap_or(Value::Null);

        let mut listeners = Vec::new();
        let mut stats = None;
        for section in Options::panel_sections() {
            let details = element(document, "details", None)?;
            details.set_attribute("open", "")?;
            let summary = element(document, "summary", Some("section-header"))?;
            summary.set_text_content(Some(&section.title));
            let body = element(document, "div", Some("section-body"))?;
            let _ = details.append_child(&summary)?;
            let _ = details.append_child(&body)?;

            if section.key == "debug" {
                stats = Some(StatsRows::build(document, &body)?);
            }
            for spec in section.fields {
                let value = current.get(&section.key).and_then(|s| s.get(&spec.field));
                let binding = Binding::build(document, &body, &section.key, spec, value)?;
                binding.listen(engine, &mut listeners)?;
            }
            let _ = root.append_child(&details)?;
        }

        let _ = document
            .body()
            .ok_or_else(|| JsValue::from_str("no <body>"))?
            .append_child(&root)?;

        Ok(Self {
            root,
            stats,
            last_stats: None,
            _listeners: listeners,
        })
    }

    /// Show or hide the panel.
    pub(super) fn toggle(&self) {
        self.root.set_hidden(!self.root.hidden());
    }

    /// Refresh the stats rows, at most every [`STATS_INTERVAL`]. Hidden
    /// when `debug.show_stats` is off.
    pub(super) fn update_stats(&mut self, engine: &GalaxyEngine) {
        let now = Instant::now();
        if self
            .last_stats
            .is_some_and(|last| now.duration_since(last) < STATS_INTERVAL)
        {
            return;
        }
        self.last_stats = Some(now);
        if let Some(rows) = &self.stats {
            rows.show(engine);
        }
    }
}

// ── Stats ────────────────────────────────────────────────────────────────

struct StatsRows {
    block: Element,
    fps: Element,
    particles: Element,
    buffers: Element,
    resolution: Element,
    seed: Element,
}

impl StatsRows {
    fn build(document: &Document, parent: &Element) -> Result<Self, JsValue> {
        let block = element(document, "div", None)?;
        let row = |title: &str| -> Result<Element, JsValue> {
            let row = element(document, "div", Some("field-row"))?;
            let label = element(document, "label", Some("field-label"))?;
            label.set_text_content(Some(title));
            let value = element(document, "span", Some("stat-value"))?;
            let _ = row.append_child(&label)?;
            let _ = row.append_child(&element(document, "span", None)?)?;
            let _ = row.append_child(&value)?;
            let _ = block.append_child(&row)?;
            Ok(value)
        };
        let fps = row("FPS")?;
        let particles = row("Particles")?;
        let buffers = row("GPU Buffers")?;
        let resolution = row("Resolution")?;
        let seed = row("Seed")?;
        let _ = parent.append_child(&block)?;
        Ok(Self {
            block,
            fps,
            particles,
            buffers,
            resolution,
            seed,
        })
    }

    fn show(&self, engine: &GalaxyEngine) {
        let visible = engine.options().debug.show_stats;
        let _ = self.block.toggle_attribute_with_force("hidden", !visible);
        if !visible {
            return;
        }
        let stats = engine.stats();
        self.fps.set_text_content(Some(&format!("{:.0}", stats.fps)));
        self.particles
            .set_text_content(Some(&stats.particles.to_string()));
        self.buffers
            .set_text_content(Some(&stats.live_buffers.to_string()));
        self.resolution
            .set_text_content(Some(&format!("{}×{}", stats.width, stats.height)));
        self.seed.set_text_content(Some(&stats.seed.to_string()));
    }
}

// ── Controls ─────────────────────────────────────────────────────────────

/// One form control bound to `section.field`.
#[derive(Clone)]
struct Binding {
    section: String,
    spec: FieldSpec,
    input: HtmlInputElement,
    value_label: Element,
}

impl Binding {
    fn build(
        document: &Document,
        parent: &Element,
        section: &str,
        spec: FieldSpec,
        current: Option<&Value>,
    ) -> Result<Self, JsValue> {
        let row = element(document, "div", Some("field-row"))?;
        let label = element(document, "label", Some("field-label"))?;
        label.set_text_content(Some(&spec.label));
        let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
        match &spec.kind {
            FieldKind::Number { min, max, step, .. } => {
                input.set_type("range");
                input.set_step(&step.to_string());
                if let Some(min) = min {
                    input.set_min(&min.to_string());
                }
                if let Some(max) = max {
                    input.set_max(&max.to_string());
                }
            }
            FieldKind::Toggle => input.set_type("checkbox"),
            FieldKind::Color => input.set_type("color"),
            FieldKind::Text => input.set_type("text"),
        }
        let value_label = element(document, "span", Some("field-value"))?;

        let _ = row.append_child(&label)?;
        let _ = row.append_child(&input)?;
        let _ = row.append_child(&value_label)?;
        let _ = parent.append_child(&row)?;

        let binding = Self {
            section: section.to_owned(),
            spec,
            input,
            value_label,
        };
        if let Some(value) = current {
            binding.show(value);
        }
        Ok(binding)
    }

    /// Attach the commit listener, plus a label preview while an
    /// `on_finish` slider is dragged.
    fn listen(
        &self,
        engine: &SharedEngine,
        listeners: &mut Vec<Listener>,
    ) -> Result<(), JsValue> {
        let commit_on = if self.spec.on_finish { "change" } else { "input" };
        let commit = self.clone();
        let engine = Rc::clone(engine);
        listeners.push(self.on(commit_on, move || commit.commit(&engine))?);

        if self.spec.on_finish {
            let preview = self.clone();
            listeners.push(self.on("input", move || preview.preview())?);
        }
        Ok(())
    }

    fn on(
        &self,
        kind: &str,
        mut handler: impl FnMut() + 'static,
    ) -> Result<Listener, JsValue> {
        let closure = Listener::new(move |_: Event| handler());
        self.input
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(closure)
    }

    fn raw(&self) -> String {
        if self.spec.kind == FieldKind::Toggle {
            self.input.checked().to_string()
        } else {
            self.input.value()
        }
    }

    fn preview(&self) {
        if let Some(value) = self.spec.parse(&self.raw()) {
            self.value_label
                .set_text_content(Some(&self.spec.display(&value)));
        }
    }

    fn commit(&self, engine: &SharedEngine) {
        let Ok(mut engine) = engine.try_borrow_mut() else {
            return;
        };
        if let Some(value) = self.spec.parse(&self.raw()) {
            let _ = engine.set_option(&self.section, &self.spec.field, value);
        }
        let held = serde_json::to_value(engine.options())
            .ok()
            .and_then(|o| o.get(&self.section)?.get(&self.spec.field).cloned());
        if let Some(held) = held {
            self.show(&held);
        }
    }

    fn show(&self, value: &Value) {
        match (&self.spec.kind, value) {
            (FieldKind::Toggle, _) => {
                self.input.set_checked(value.as_bool().unwrap_or(false));
            }
            (_, Value::String(s)) => self.input.set_value(s),
            _ => self.input.set_value(&value.to_string()),
        }
        self.value_label
            .set_text_content(Some(&self.spec.display(value)));
    }
}

fn element(
    document: &Document,
    tag: &str,
    class: Option<&str>,
) -> Result<Element, JsValue> {
    let element = document.create_element(tag)?;
    if let Some(class) = class {
        element.set_class_name(class);
    }
    Ok(element)
}

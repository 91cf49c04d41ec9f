//! Panel field descriptions read back out of the options JSON schema.
//!
//! The schema is the single description of what the panel may edit:
//! titles, ranges, slider steps, `format = "color"` and `on_finish`. Both
//! the edit validation in [`Options::with_field`](super::Options::with_field)
//! and the browser panel work from the [`SectionSpec`]s built here.

use serde_json::Value;

use crate::color::Rgb;

/// Control a field is edited with.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Slider over `min..=max` in increments of `step`.
    Number {
        /// Lowest accepted value.
        min: Option<f64>,
        /// Highest accepted value.
        max: Option<f64>,
        /// Slider granularity.
        step: f64,
        /// Whether only whole numbers are accepted.
        integer: bool,
    },
    /// Checkbox.
    Toggle,
    /// `#rrggbb` color picker.
    Color,
    /// Free text.
    Text,
}

/// One editable option as the panel presents it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name inside its section.
    pub field: String,
    /// Human-readable label.
    pub label: String,
    /// Control type and limits.
    pub kind: FieldKind,
    /// Send the value only once the control is released.
    pub on_finish: bool,
}

/// A titled group of fields: one top-level options section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpec {
    /// Section name in the options tree (`galaxy`, `planet`, ...).
    pub key: String,
    /// Human-readable title.
    pub title: String,
    /// Editable fields, in schema order.
    pub fields: Vec<FieldSpec>,
}

impl SectionSpec {
    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.field == name)
    }
}

/// Walk the top-level `properties` of `schema` into section specs.
/// Fields of a type the panel cannot edit are left out.
#[must_use]
pub fn sections(schema: &Value) -> Vec<SectionSpec> {
    let Some(props) = schema.pointer("/properties").and_then(Value::as_object)
    else {
        return Vec::new();
    };
    props
        .iter()
        .map(|(key, section)| SectionSpec {
            key: key.clone(),
            title: title_or(section, key),
            fields: section
                .pointer("/properties")
                .and_then(Value::as_object)
                .map(|fields| {
                    fields
                        .iter()
                        .filter_map(|(name, s)| FieldSpec::from_schema(name, s))
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}

impl FieldSpec {
    fn from_schema(name: &str, schema: &Value) -> Option<Self> {
        let number = |integer: bool| FieldKind::Number {
            min: schema.get("minimum").and_then(Value::as_f64),
            max: schema.get("maximum").and_then(Value::as_f64),
            step: schema
                .get("step")
                .and_then(Value::as_f64)
                .unwrap_or(if integer { 1.0 } else { 0.01 }),
            integer,
        };
        let kind = match schema.get("type").and_then(Value::as_str)? {
            "integer" => number(true),
            "number" => number(false),
            "boolean" => FieldKind::Toggle,
            "string" if schema.get("format").and_then(Value::as_str) == Some("color") => {
                FieldKind::Color
            }
            "string" => FieldKind::Text,
            _ => return None,
        };
        Some(Self {
            field: name.to_owned(),
            label: title_or(schema, name),
            kind,
            on_finish: schema.get("on_finish").and_then(Value::as_bool) == Some(true),
        })
    }

    /// Whether `value` has the right type and lies inside the field's
    /// range.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match &self.kind {
            FieldKind::Number {
                min, max, integer, ..
            } => {
                if *integer && value.as_i64().is_none() && value.as_u64().is_none() {
                    return false;
                }
                value.as_f64().is_some_and(|v| {
                    v.is_finite()
                        && min.is_none_or(|lo| v >= lo)
                        && max.is_none_or(|hi| v <= hi)
                })
            }
            FieldKind::Toggle => value.is_boolean(),
            FieldKind::Color => value.as_str().and_then(Rgb::from_hex).is_some(),
            FieldKind::Text => value.is_string(),
        }
    }

    /// Turn the raw string of a form control into a JSON value of the
    /// field's type. Checkboxes report `"true"`/`"false"`.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Option<Value> {
        match &self.kind {
            FieldKind::Number { integer: true, .. } => {
                let v = raw.trim().parse::<f64>().ok()?;
                v.is_finite().then(|| Value::from(v.round() as i64))
            }
            FieldKind::Number { .. } => {
                let v = raw.trim().parse::<f64>().ok()?;
                v.is_finite().then(|| Value::from(v))
            }
            FieldKind::Toggle => raw.parse::<bool>().ok().map(Value::Bool),
            FieldKind::Color | FieldKind::Text => Some(Value::String(raw.to_owned())),
        }
    }

    /// Text shown next to the control for `value`.
    #[must_use]
    pub fn display(&self, value: &Value) -> String {
        match (&self.kind, value) {
            (FieldKind::Number { step, .. }, _) => value
                .as_f64()
                .map_or_else(String::new, |v| format_number(v, *step)),
            (FieldKind::Color | FieldKind::Text, Value::String(s)) => s.clone(),
            _ => String::new(),
        }
    }
}

fn title_or(schema: &Value, key: &str) -> String {
    schema
        .get("title")
        .and_then(Value::as_str)
        .map_or_else(|| display_name(key), str::to_owned)
}

/// Convert a `snake_case` key to `Title Case`.
#[must_use]
pub fn display_name(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |c| {
                c.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format `value` with as many decimals as `step` uses.
#[must_use]
pub fn format_number(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10()).round().max(0.0) as usize
    };
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::options::Options;

    fn galaxy_field(name: &str) -> FieldSpec {
        Options::panel_sections()
            .into_iter()
            .find(|s| s.key == "galaxy")
            .and_then(|s| s.field(name).cloned())
            .unwrap()
    }

    #[test]
    fn galaxy_section_carries_panel_ranges() {
        let count = galaxy_field("count");
        assert_eq!(count.label, "Particle Count");
        assert!(count.on_finish);
        assert_eq!(
            count.kind,
            FieldKind::Number {
                min: Some(100.0),
                max: Some(1_000_000.0),
                step: 100.0,
                integer: true,
            }
        );
        assert_eq!(galaxy_field("inside_color").kind, FieldKind::Color);
    }

    #[test]
    fn hidden_fields_are_not_listed() {
        let camera = Options::panel_sections()
            .into_iter()
            .find(|s| s.key == "camera")
            .unwrap();
        assert!(camera.field("fovy").is_some());
        assert!(camera.field("znear").is_none());
        assert!(!Options::panel_sections().iter().any(|s| s.key == "keybindings"));
    }

    #[test]
    fn accepts_checks_type_and_range() {
        let count = galaxy_field("count");
        assert!(count.accepts(&json!(100)));
        assert!(count.accepts(&json!(1_000_000)));
        assert!(!count.accepts(&json!(0)));
        assert!(!count.accepts(&json!(1_000_100)));
        assert!(!count.accepts(&json!(150.5)));
        assert!(!count.accepts(&json!("200")));

        let spin = galaxy_field("spin");
        assert!(spin.accepts(&json!(-5.0)));
        assert!(!spin.accepts(&json!(5.5)));

        let color = galaxy_field("outside_color");
        assert!(color.accepts(&json!("#0b3cba")));
        assert!(!color.accepts(&json!("blue")));
    }

    #[test]
    fn parse_follows_field_type() {
        assert_eq!(galaxy_field("count").parse("2500.4"), Some(json!(2500)));
        assert_eq!(galaxy_field("spin").parse("-1.25"), Some(json!(-1.25)));
        assert_eq!(galaxy_field("spin").parse("fast"), None);
        assert_eq!(
            galaxy_field("inside_color").parse("#00ff00"),
            Some(json!("#00ff00"))
        );
    }

    #[test]
    fn display_uses_step_decimals() {
        assert_eq!(galaxy_field("randomness").display(&json!(0.2)), "0.200");
        assert_eq!(galaxy_field("count").display(&json!(5000)), "5000");
        assert_eq!(format_number(1.25, 0.01), "1.25");
        assert_eq!(display_name("randomness_power"), "Randomness Power");
    }
}

// Prompt Compiler: pure FieldState -> PromptDocument transform.
//
// Deterministic and side-effect free, so it is safe to re-run on every
// keystroke. The document is rebuilt from scratch each time, never
// patched. Key order is fixed: prompt, style, camera, film_stock,
// lighting, colors, composition (serde_json's preserve_order feature
// keeps insertion order).

use serde_json::{Map, Value};

use crate::builder::field_state::FieldState;

/// The compiled nested JSON result. A derived, disposable snapshot with
/// no lifecycle of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptDocument {
    fields: Map<String, Value>,
}

/// Accumulates key/value slots in insertion order, applying the single
/// inclusion rule: a scalar is written iff non-empty or `include_empty`.
struct DocumentBuilder {
    include_empty: bool,
    fields: Map<String, Value>,
}

impl DocumentBuilder {
    fn new(include_empty: bool) -> Self {
        DocumentBuilder {
            include_empty,
            fields: Map::new(),
        }
    }

    /// Whether a slot sourced from `value` should be written at all.
    fn includes(&self, value: &str) -> bool {
        !value.is_empty() || self.include_empty
    }

    /// Gated text slot.
    fn text(&mut self, key: &str, value: &str) {
        if self.includes(value) {
            self.fields.insert(key.to_string(), Value::from(value));
        }
    }

    /// Ungated slot for values whose inclusion was already decided.
    fn value(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }

    fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

/// First run of ASCII digits in `s`, parsed as an integer. None when no
/// digits exist or the run overflows, in which case the caller keeps the
/// raw string.
fn first_digit_run(s: &str) -> Option<u64> {
    let digits: String = s
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Compile a FieldState snapshot into the nested prompt document.
pub fn compile(state: &FieldState) -> PromptDocument {
    let include_empty = state.include_empty;
    let mut doc = DocumentBuilder::new(include_empty);

    doc.text("prompt", &state.prompt);
    doc.text("style", &state.style);

    let mut camera = DocumentBuilder::new(include_empty);
    camera.text("angle", &state.camera.angle);
    camera.text("distance", &state.camera.shot);

    if camera.includes(&state.camera.lens) {
        // Exactly one of lens-mm / lens is written, never both.
        if state.numeric_lens {
            match first_digit_run(&state.camera.lens) {
                Some(mm) => camera.value("lens-mm", Value::from(mm)),
                None => camera.value("lens", Value::from(state.camera.lens.as_str())),
            }
        } else {
            camera.value("lens", Value::from(state.camera.lens.as_str()));
        }
    }

    camera.text("f-number", &state.camera.aperture);

    if camera.includes(&state.camera.iso) {
        let iso = match state.camera.iso.trim().parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::from(state.camera.iso.as_str()),
        };
        camera.value("ISO", iso);
    }

    camera.text("focus", &state.camera.focus);

    if !camera.is_empty() || include_empty {
        doc.value("camera", Value::Object(camera.into_map()));
    }

    // Film stock is an optional flourish: always omitted when empty,
    // deliberately exempt from include_empty.
    if !state.camera.model.is_empty() {
        doc.value("film_stock", Value::from(state.camera.model.as_str()));
    }

    doc.text("lighting", &state.lighting);

    let palette: Vec<&str> = state
        .colors
        .iter()
        .filter(|c| !c.trim().is_empty())
        .map(String::as_str)
        .collect();
    if !palette.is_empty() || !state.color_mood.is_empty() || include_empty {
        let mut colors = DocumentBuilder::new(include_empty);
        if !palette.is_empty() || include_empty {
            colors.value("palette", Value::from(palette));
        }
        colors.text("mood", &state.color_mood);
        doc.value("colors", Value::Object(colors.into_map()));
    }

    doc.text("composition", &state.composition);

    PromptDocument {
        fields: doc.into_map(),
    }
}

impl PromptDocument {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Canonical 2-space-indented JSON text for clipboard export.
    pub fn to_pretty_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(&self.fields)
            .map_err(|e| format!("Failed to serialize prompt document: {}", e))
    }

    fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
        map.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// Flatten the document into one descriptive sentence: present
    /// top-level fields joined with ". " in document key order. The
    /// camera sub-object becomes a comma-joined clause, followed by an
    /// optional focus clause and the film stock.
    pub fn to_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(prompt) = Self::str_field(&self.fields, "prompt") {
            parts.push(prompt.to_string());
        }
        if let Some(style) = Self::str_field(&self.fields, "style") {
            parts.push(format!("Style: {}", style));
        }

        if let Some(camera) = self.fields.get("camera").and_then(Value::as_object) {
            if !camera.is_empty() {
                let mut desc: Vec<String> = Vec::new();
                if let Some(angle) = Self::str_field(camera, "angle") {
                    desc.push(format!("{} angle", angle));
                }
                if let Some(distance) = Self::str_field(camera, "distance") {
                    desc.push(distance.to_string());
                }
                if let Some(mm) = camera.get("lens-mm").and_then(Value::as_u64) {
                    desc.push(format!("{}mm lens", mm));
                } else if let Some(lens) = Self::str_field(camera, "lens") {
                    desc.push(format!("{} lens", lens));
                }
                if let Some(aperture) = Self::str_field(camera, "f-number") {
                    desc.push(aperture.to_string());
                }
                if !desc.is_empty() {
                    parts.push(format!("Camera: {}", desc.join(", ")));
                }
                if let Some(focus) = Self::str_field(camera, "focus") {
                    parts.push(format!("Focus: {}", focus));
                }
                // Film stock only reads naturally after a camera clause
                if let Some(film) = Self::str_field(&self.fields, "film_stock") {
                    parts.push(film.to_string());
                }
            }
        }

        if let Some(lighting) = Self::str_field(&self.fields, "lighting") {
            parts.push(format!("Lighting: {}", lighting));
        }

        if let Some(colors) = self.fields.get("colors").and_then(Value::as_object) {
            let palette: Vec<&str> = colors
                .get("palette")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            if !palette.is_empty() {
                parts.push(format!("Colors: {}", palette.join(", ")));
            }
            if let Some(mood) = Self::str_field(colors, "mood") {
                parts.push(format!("Mood: {}", mood));
            }
        }

        if let Some(composition) = Self::str_field(&self.fields, "composition") {
            parts.push(format!("Composition: {}", composition));
        }

        parts.join(". ")
    }
}

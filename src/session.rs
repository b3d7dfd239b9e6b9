// Editing session
//
// Owns the one mutable FieldState per editor instance, along with the
// loaded catalogs and the per-selector raw-edit flags. All mutation
// flows through explicit setters; the setters for text fields with a
// paired dropdown re-run selector sync so the dropdown always reflects
// the text. The compiler stays pure — the session just hands it
// snapshots.
//
// For the editor-embedded variant the whole state round-trips through
// one opaque JSON string attached to the host's persistable node.

use std::collections::HashSet;

use crate::builder::{compile, sync_selector, FieldState, PromptDocument, CUSTOM_PRESET};
use crate::catalog::{CatalogSet, SelectorKind};

pub struct Session {
    state: FieldState,
    catalogs: CatalogSet,
    raw_edit: HashSet<SelectorKind>,
}

/// Parse a persisted builder payload, substituting the default state on
/// missing or malformed input.
pub fn restore_state(payload: &str) -> FieldState {
    if payload.trim().is_empty() {
        return FieldState::default();
    }
    match serde_json::from_str(payload) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!("Invalid builder payload, falling back to defaults: {}", e);
            FieldState::default()
        }
    }
}

impl Session {
    pub fn new(catalogs: CatalogSet) -> Session {
        Session {
            state: FieldState::default(),
            catalogs,
            raw_edit: HashSet::new(),
        }
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn catalogs(&self) -> &CatalogSet {
        &self.catalogs
    }

    /// Compile the current snapshot. Pure and idempotent, so callers
    /// re-run it after every micro-edit.
    pub fn compile(&self) -> PromptDocument {
        compile(&self.state)
    }

    // --- Plain field setters ---

    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.state.prompt = text.into();
    }

    pub fn set_camera_angle(&mut self, text: impl Into<String>) {
        self.state.camera.angle = text.into();
    }

    pub fn set_camera_shot(&mut self, text: impl Into<String>) {
        self.state.camera.shot = text.into();
    }

    pub fn set_camera_lens(&mut self, text: impl Into<String>) {
        self.state.camera.lens = text.into();
    }

    pub fn set_camera_aperture(&mut self, text: impl Into<String>) {
        self.state.camera.aperture = text.into();
    }

    pub fn set_camera_iso(&mut self, text: impl Into<String>) {
        self.state.camera.iso = text.into();
    }

    pub fn set_camera_focus(&mut self, text: impl Into<String>) {
        self.state.camera.focus = text.into();
    }

    pub fn set_include_empty(&mut self, enabled: bool) {
        self.state.include_empty = enabled;
    }

    pub fn set_numeric_lens(&mut self, enabled: bool) {
        self.state.numeric_lens = enabled;
    }

    // --- Setters for fields with a paired dropdown ---
    //
    // Each returns the dropdown value after sync: the matched catalog
    // prompt, or None for "none selected".

    pub fn set_style(&mut self, text: impl Into<String>) -> Option<String> {
        self.state.style = text.into();
        self.selector_value(SelectorKind::Style).map(str::to_string)
    }

    pub fn set_camera_model(&mut self, text: impl Into<String>) -> Option<String> {
        self.state.camera.model = text.into();
        self.selector_value(SelectorKind::Camera).map(str::to_string)
    }

    pub fn set_lighting(&mut self, text: impl Into<String>) -> Option<String> {
        self.state.lighting = text.into();
        self.selector_value(SelectorKind::Lighting).map(str::to_string)
    }

    pub fn set_color_mood(&mut self, text: impl Into<String>) -> Option<String> {
        self.state.color_mood = text.into();
        self.selector_value(SelectorKind::Mood).map(str::to_string)
    }

    pub fn set_composition(&mut self, text: impl Into<String>) -> Option<String> {
        self.state.composition = text.into();
        self.selector_value(SelectorKind::Composition).map(str::to_string)
    }

    /// The text field paired with a selector.
    pub fn selector_text(&self, kind: SelectorKind) -> &str {
        match kind {
            SelectorKind::Style => &self.state.style,
            SelectorKind::Camera => &self.state.camera.model,
            SelectorKind::Lighting => &self.state.lighting,
            SelectorKind::Mood => &self.state.color_mood,
            SelectorKind::Composition => &self.state.composition,
        }
    }

    /// Current dropdown value for a selector, derived from its text.
    pub fn selector_value(&self, kind: SelectorKind) -> Option<&str> {
        sync_selector(self.selector_text(kind), self.catalogs.catalog(kind))
    }

    // --- Raw-edit mode ---

    pub fn set_raw_edit(&mut self, kind: SelectorKind, enabled: bool) {
        if enabled {
            self.raw_edit.insert(kind);
        } else {
            self.raw_edit.remove(&kind);
        }
    }

    pub fn is_raw_edit(&self, kind: SelectorKind) -> bool {
        self.raw_edit.contains(&kind)
    }

    // --- Palette ---

    pub fn add_color(&mut self) -> usize {
        self.state.add_color()
    }

    pub fn remove_color(&mut self, index: usize) {
        self.state.remove_color(index);
    }

    pub fn set_color(&mut self, index: usize, value: impl Into<String>) {
        self.state.set_color(index, value);
    }

    /// Feed an eyedropper result into a palette entry. None means the
    /// user cancelled; the entry is left untouched.
    pub fn apply_eyedropper(&mut self, index: usize, picked: Option<String>) {
        if let Some(hex) = picked {
            self.state.set_color(index, hex);
        }
    }

    /// Append a color picked from the image canvas.
    pub fn append_picked_color(&mut self, hex: impl Into<String>) -> usize {
        self.state.colors.push(hex.into());
        self.state.colors.len() - 1
    }

    // --- Presets ---

    /// Apply a stored preset: every field overwritten, raw-edit mode
    /// cleared. The "custom" sentinel and unknown ids are no-ops.
    /// Returns whether a preset was applied.
    pub fn apply_preset(&mut self, id: &str) -> bool {
        if id == CUSTOM_PRESET {
            return false;
        }
        let Some(preset) = self.catalogs.presets.get(id) else {
            tracing::warn!("Unknown preset '{}', leaving state untouched", id);
            return false;
        };
        self.state = self.state.with_preset(id, preset);
        self.raw_edit.clear();
        true
    }

    // --- Host round-trip ---

    /// Serialize the whole FieldState into the opaque payload string
    /// the host persists with its node.
    pub fn payload(&self) -> Result<String, String> {
        serde_json::to_string(&self.state)
            .map_err(|e| format!("Failed to serialize builder state: {}", e))
    }

    /// Replace the state from a persisted payload; malformed payloads
    /// fall back to defaults.
    pub fn restore(&mut self, payload: &str) {
        self.state = restore_state(payload);
        self.raw_edit.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Preset, PresetCamera};
    use serde_json::json;

    fn test_catalogs() -> CatalogSet {
        let mut set = CatalogSet::default();
        set.styles = Catalog::from_value(&json!({
            "Documentary": [{"name": "Street", "prompt": "candid street photography"}]
        }));
        set.cameras = Catalog::from_value(&json!({
            "Film": [{"name": "Portra", "prompt": "Kodak Portra 400"}]
        }));
        set.presets.insert(
            "street".to_string(),
            Preset {
                name: "Street".to_string(),
                prompt: "rain-slick crosswalk".to_string(),
                style: "candid street photography".to_string(),
                camera: PresetCamera {
                    model: "unlisted rangefinder".to_string(),
                    ..PresetCamera::default()
                },
                ..Preset::default()
            },
        );
        set
    }

    #[test]
    fn test_synced_setter_resolves_catalog_match() {
        let mut session = Session::new(test_catalogs());
        assert_eq!(
            session.set_style("candid street photography").as_deref(),
            Some("candid street photography")
        );
        assert_eq!(session.set_style("something else"), None);
    }

    #[test]
    fn test_apply_preset_overwrites_and_syncs_selectors() {
        let mut session = Session::new(test_catalogs());
        session.set_raw_edit(SelectorKind::Style, true);
        session.set_lighting("left over");

        assert!(session.apply_preset("street"));
        assert_eq!(session.state().prompt, "rain-slick crosswalk");
        assert_eq!(session.state().lighting, "");

        // Style selector reflects the preset value; the camera selector
        // resets because the preset's model is not in the catalog
        assert_eq!(
            session.selector_value(SelectorKind::Style),
            Some("candid street photography")
        );
        assert_eq!(session.selector_value(SelectorKind::Camera), None);

        // Raw-edit mode is always cleared by preset application
        assert!(!session.is_raw_edit(SelectorKind::Style));
    }

    #[test]
    fn test_custom_and_unknown_presets_are_no_ops() {
        let mut session = Session::new(test_catalogs());
        session.set_prompt("typed by hand");

        assert!(!session.apply_preset("custom"));
        assert!(!session.apply_preset("does-not-exist"));
        assert_eq!(session.state().prompt, "typed by hand");
    }

    #[test]
    fn test_payload_round_trip() {
        let mut session = Session::new(test_catalogs());
        session.set_prompt("a fox");
        session.set_camera_lens("85mm");
        session.set_color(0, "#FF0000");

        let payload = session.payload().unwrap();
        let mut restored = Session::new(test_catalogs());
        restored.restore(&payload);
        assert_eq!(restored.state(), session.state());
    }

    #[test]
    fn test_restore_malformed_payload_falls_back_to_defaults() {
        let mut session = Session::new(test_catalogs());
        session.set_prompt("will be lost");

        session.restore("{definitely not json");
        assert_eq!(session.state(), &FieldState::default());

        session.set_prompt("will also be lost");
        session.restore("");
        assert_eq!(session.state(), &FieldState::default());
    }

    #[test]
    fn test_eyedropper_cancellation_leaves_entry_unchanged() {
        let mut session = Session::new(test_catalogs());
        session.apply_eyedropper(0, None);
        assert_eq!(session.state().colors[0], "#2A5BDA");

        session.apply_eyedropper(0, Some("#123456".to_string()));
        assert_eq!(session.state().colors[0], "#123456");
    }

    #[test]
    fn test_append_picked_color() {
        let mut session = Session::new(test_catalogs());
        let index = session.append_picked_color("#AB0CEF");
        assert_eq!(session.state().colors[index], "#AB0CEF");
    }

    #[test]
    fn test_compile_reflects_session_edits() {
        let mut session = Session::new(test_catalogs());
        session.restore("{}");
        session.set_prompt("A fox");
        session.set_camera_angle("low angle");

        let doc = session.compile();
        assert_eq!(
            doc.to_value(),
            json!({
                "prompt": "A fox",
                "camera": {"angle": "low angle"},
                "colors": {"palette": ["#2A5BDA", "amber glow"]}
            })
        );
    }
}

// Field State: the live, editable snapshot of all user-entered values.
//
// One instance per editing session. Every field is always present —
// "no input yet" is an empty string or empty list, never a missing key.
// Serde uses the flat camelCase keys of the web app's builder payload so
// persisted host state keeps round-tripping.

use serde::{Deserialize, Serialize};

use crate::catalog::Preset;

/// Sentinel preset id meaning "no preset applied".
pub const CUSTOM_PRESET: &str = "custom";

/// The seven camera sub-fields, flattened into the payload as
/// `cameraAngle`, `cameraShot`, etc.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraFields {
    #[serde(rename = "cameraAngle")]
    pub angle: String,
    #[serde(rename = "cameraShot")]
    pub shot: String,
    #[serde(rename = "cameraLens")]
    pub lens: String,
    #[serde(rename = "cameraAperture")]
    pub aperture: String,
    #[serde(rename = "cameraISO")]
    pub iso: String,
    #[serde(rename = "cameraFocus")]
    pub focus: String,
    #[serde(rename = "cameraModel")]
    pub model: String,
}

/// Flat mapping of all user-entered prompt fields plus the two output
/// toggles and the selected preset id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldState {
    pub preset: String,
    pub prompt: String,
    pub style: String,
    #[serde(flatten)]
    pub camera: CameraFields,
    pub lighting: String,
    /// Ordered palette; duplicates and blanks are allowed while editing.
    pub colors: Vec<String>,
    pub color_mood: String,
    pub composition: String,
    pub include_empty: bool,
    pub numeric_lens: bool,
}

impl Default for FieldState {
    fn default() -> Self {
        FieldState {
            preset: CUSTOM_PRESET.to_string(),
            prompt: String::new(),
            style: String::new(),
            camera: CameraFields::default(),
            lighting: String::new(),
            colors: vec!["#2A5BDA".to_string(), "amber glow".to_string()],
            color_mood: String::new(),
            composition: String::new(),
            include_empty: false,
            numeric_lens: true,
        }
    }
}

impl FieldState {
    /// A new state with every preset field overwritten: present preset
    /// values replace the current ones, absent values clear to empty.
    /// The output toggles are not preset data and carry over unchanged.
    /// The preset itself is never mutated.
    pub fn with_preset(&self, id: &str, preset: &Preset) -> FieldState {
        FieldState {
            preset: id.to_string(),
            prompt: preset.prompt.clone(),
            style: preset.style.clone(),
            camera: CameraFields {
                angle: preset.camera.angle.clone(),
                shot: preset.camera.shot.clone(),
                lens: preset.camera.lens.clone(),
                aperture: preset.camera.aperture.clone(),
                iso: preset.camera.iso.clone(),
                focus: preset.camera.focus.clone(),
                model: preset.camera.model.clone(),
            },
            lighting: preset.lighting.clone(),
            colors: preset.colors.palette.clone(),
            color_mood: preset.colors.mood.clone(),
            composition: preset.composition.clone(),
            include_empty: self.include_empty,
            numeric_lens: self.numeric_lens,
        }
    }
}

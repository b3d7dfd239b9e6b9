// Catalog and preset store
//
// Catalogs are the read-only, categorized lists of named prompt fragments
// (styles, cameras, lighting, mood, composition) the selectors offer.
// Presets are full FieldState templates. Both are loaded once per session
// from the JSON files shipped with the web app and never mutated.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One selectable prompt fragment: display label + the value written
/// into the paired text field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub prompt: String,
}

/// A named category of entries. Group order follows the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogGroup {
    pub name: String,
    pub entries: Vec<CatalogEntry>,
}

/// One catalog: ordered groups of entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub groups: Vec<CatalogGroup>,
}

impl Catalog {
    /// Build a catalog from a parsed JSON document shaped as
    /// `{ "Category": [ { "name": ..., "prompt": ... }, ... ], ... }`.
    /// Entries that don't match the shape are skipped; anything that
    /// isn't an object yields an empty catalog.
    pub fn from_value(value: &Value) -> Catalog {
        let Some(map) = value.as_object() else {
            return Catalog::default();
        };

        let groups = map
            .iter()
            .map(|(name, entries)| CatalogGroup {
                name: name.clone(),
                entries: entries
                    .as_array()
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|item| {
                                serde_json::from_value::<CatalogEntry>(item.clone()).ok()
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        Catalog { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.entries.is_empty())
    }

    /// Flattened dropdown choices: a leading empty choice ("none
    /// selected") followed by every prompt value in group order.
    pub fn choices(&self) -> Vec<String> {
        let mut choices = vec![String::new()];
        for group in &self.groups {
            for entry in &group.entries {
                choices.push(entry.prompt.clone());
            }
        }
        choices
    }
}

/// A named, pre-filled FieldState template. Absent fields deserialize to
/// empty strings so applying a sparse preset clears the rest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Preset {
    pub name: String,
    pub prompt: String,
    pub style: String,
    pub camera: PresetCamera,
    pub lighting: String,
    pub colors: PresetColors,
    pub composition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PresetCamera {
    pub angle: String,
    pub shot: String,
    pub lens: String,
    pub aperture: String,
    pub iso: String,
    pub focus: String,
    pub model: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PresetColors {
    pub palette: Vec<String>,
    pub mood: String,
}

/// Identifies a free-text field with a paired catalog dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    Style,
    Camera,
    Lighting,
    Mood,
    Composition,
}

/// The five catalogs plus the preset map, loaded together.
#[derive(Debug, Clone, Default)]
pub struct CatalogSet {
    pub styles: Catalog,
    pub cameras: Catalog,
    pub lighting: Catalog,
    pub mood: Catalog,
    pub composition: Catalog,
    pub presets: BTreeMap<String, Preset>,
}

impl CatalogSet {
    /// Load every catalog from `data_dir`. A missing or malformed file is
    /// logged and degrades to an empty catalog; loading never fails.
    pub fn load(data_dir: &Path) -> CatalogSet {
        CatalogSet {
            styles: load_catalog(data_dir, "styles.json"),
            cameras: load_catalog(data_dir, "cameras.json"),
            lighting: load_catalog(data_dir, "lighting.json"),
            mood: load_catalog(data_dir, "mood.json"),
            composition: load_catalog(data_dir, "composition.json"),
            presets: load_presets(data_dir),
        }
    }

    pub fn catalog(&self, kind: SelectorKind) -> &Catalog {
        match kind {
            SelectorKind::Style => &self.styles,
            SelectorKind::Camera => &self.cameras,
            SelectorKind::Lighting => &self.lighting,
            SelectorKind::Mood => &self.mood,
            SelectorKind::Composition => &self.composition,
        }
    }

    /// Preset ids for the preset dropdown: the "custom" sentinel first,
    /// then the stored presets in sorted order.
    pub fn preset_names(&self) -> Vec<String> {
        let mut names = vec![crate::builder::field_state::CUSTOM_PRESET.to_string()];
        names.extend(self.presets.keys().cloned());
        names
    }
}

/// Read and parse one JSON document from the data directory. Shared
/// with the server's data endpoint, which serves the raw documents.
pub fn load_document(data_dir: &Path, file_name: &str) -> Result<Value, String> {
    let path = data_dir.join(file_name);
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&raw).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

fn load_catalog(data_dir: &Path, file_name: &str) -> Catalog {
    match load_document(data_dir, file_name) {
        Ok(value) => Catalog::from_value(&value),
        Err(e) => {
            tracing::warn!("{} unavailable, selectors degrade to free text: {}", file_name, e);
            Catalog::default()
        }
    }
}

fn load_presets(data_dir: &Path) -> BTreeMap<String, Preset> {
    match load_document(data_dir, "presets.json") {
        Ok(value) => match serde_json::from_value(value) {
            Ok(presets) => presets,
            Err(e) => {
                tracing::warn!("presets.json has unexpected shape, ignoring presets: {}", e);
                BTreeMap::new()
            }
        },
        Err(e) => {
            tracing::warn!("presets.json unavailable, no presets offered: {}", e);
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write_data_file(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_catalog_preserves_group_and_entry_order() {
        let value = json!({
            "Portrait": [
                {"name": "Classic", "prompt": "85mm portrait"},
                {"name": "Wide", "prompt": "35mm environmental"}
            ],
            "Landscape": [
                {"name": "Sweeping", "prompt": "14mm ultra-wide"}
            ]
        });

        let catalog = Catalog::from_value(&value);
        assert_eq!(catalog.groups.len(), 2);
        assert_eq!(catalog.groups[0].name, "Portrait");
        assert_eq!(catalog.groups[1].name, "Landscape");
        assert_eq!(
            catalog.choices(),
            vec!["", "85mm portrait", "35mm environmental", "14mm ultra-wide"]
        );
    }

    #[test]
    fn test_catalog_skips_malformed_entries() {
        let value = json!({
            "Mixed": [
                {"name": "Good", "prompt": "golden hour"},
                "not an object",
                {"name": "Missing prompt"}
            ]
        });

        let catalog = Catalog::from_value(&value);
        assert_eq!(catalog.groups[0].entries.len(), 1);
        assert_eq!(catalog.groups[0].entries[0].prompt, "golden hour");
    }

    #[test]
    fn test_catalog_from_non_object_is_empty() {
        assert!(Catalog::from_value(&json!([1, 2, 3])).is_empty());
        assert!(Catalog::from_value(&json!(null)).is_empty());
    }

    #[test]
    fn test_load_missing_files_degrade_to_empty() {
        let dir = TempDir::new().unwrap();
        let set = CatalogSet::load(dir.path());

        assert!(set.styles.is_empty());
        assert!(set.cameras.is_empty());
        assert!(set.presets.is_empty());
        assert_eq!(set.preset_names(), vec!["custom"]);
    }

    #[test]
    fn test_load_malformed_file_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        write_data_file(&dir, "styles.json", "{not valid json");

        let set = CatalogSet::load(dir.path());
        assert!(set.styles.is_empty());
    }

    #[test]
    fn test_load_full_set() {
        let dir = TempDir::new().unwrap();
        write_data_file(
            &dir,
            "lighting.json",
            r#"{"Natural": [{"name": "Golden Hour", "prompt": "golden hour glow"}]}"#,
        );
        write_data_file(
            &dir,
            "presets.json",
            r#"{"noir": {"name": "Noir", "prompt": "rain-slick alley", "lighting": "hard key light"}}"#,
        );

        let set = CatalogSet::load(dir.path());
        assert_eq!(set.lighting.groups[0].entries[0].prompt, "golden hour glow");

        let preset = &set.presets["noir"];
        assert_eq!(preset.prompt, "rain-slick alley");
        assert_eq!(preset.lighting, "hard key light");
        // Absent preset fields come back empty, not missing
        assert_eq!(preset.style, "");
        assert!(preset.colors.palette.is_empty());
        assert_eq!(set.preset_names(), vec!["custom", "noir"]);
    }

    #[test]
    fn test_catalog_lookup_by_kind() {
        let mut set = CatalogSet::default();
        set.mood = Catalog::from_value(&json!({
            "Warm": [{"name": "Amber", "prompt": "warm amber tones"}]
        }));

        assert!(!set.catalog(SelectorKind::Mood).is_empty());
        assert!(set.catalog(SelectorKind::Style).is_empty());
    }
}

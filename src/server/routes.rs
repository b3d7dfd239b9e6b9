// Read-only data routes for the prompt builder app

use std::path::Path;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Map, Value};

use super::AppServerState;
use crate::catalog;

pub fn api_routes() -> Router<Arc<AppServerState>> {
    Router::new().route("/api/data", get(get_data))
}

/// All five catalogs plus the presets in one payload, read fresh per
/// request so data-file edits show up on the next reload.
async fn get_data(State(state): State<Arc<AppServerState>>) -> Json<Value> {
    Json(load_data_bundle(&state.data_dir))
}

/// Assemble the catalog bundle. A missing or malformed file is logged
/// and served as an empty document so the app's other selectors keep
/// working.
pub fn load_data_bundle(data_dir: &Path) -> Value {
    json!({
        "presets": load_or_empty(data_dir, "presets.json"),
        "styles": load_or_empty(data_dir, "styles.json"),
        "cameras": load_or_empty(data_dir, "cameras.json"),
        "lighting": load_or_empty(data_dir, "lighting.json"),
        "mood": load_or_empty(data_dir, "mood.json"),
        "composition": load_or_empty(data_dir, "composition.json"),
    })
}

fn load_or_empty(data_dir: &Path, file_name: &str) -> Value {
    match catalog::load_document(data_dir, file_name) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Serving empty document for {}: {}", file_name, e);
            Value::Object(Map::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_bundle_contains_all_documents_in_order() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("styles.json"),
            r#"{"Film": [{"name": "Noir", "prompt": "film noir"}]}"#,
        )
        .unwrap();

        let bundle = load_data_bundle(dir.path());
        let keys: Vec<&str> = bundle
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            vec!["presets", "styles", "cameras", "lighting", "mood", "composition"]
        );

        assert_eq!(
            bundle["styles"]["Film"][0]["prompt"],
            Value::from("film noir")
        );
    }

    #[test]
    fn test_missing_documents_degrade_to_empty_objects() {
        let dir = TempDir::new().unwrap();
        let bundle = load_data_bundle(dir.path());

        assert_eq!(bundle["presets"], json!({}));
        assert_eq!(bundle["cameras"], json!({}));
    }

    #[test]
    fn test_malformed_document_degrades_to_empty_object() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mood.json"), "{broken").unwrap();

        let bundle = load_data_bundle(dir.path());
        assert_eq!(bundle["mood"], json!({}));
    }
}

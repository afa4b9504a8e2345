//! Consumer settings file (the JSON the downstream CLI reads its key from)
//!
//! Only four leaves are written:
//! `security.auth.selectedType`, `security.auth.apiKey`,
//! `security.auth.baseUrl` and `model.name`. Everything else is passed through.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};

use crate::backup::backup_file;
use crate::consts::{SELECTED_AUTH_TYPE, SETTINGS_VERSION};
use crate::error::AppError;

/// The key being activated
#[derive(Debug, Clone, Copy)]
pub(crate) struct ActiveKey<'a> {
    pub(crate) api_key: &'a str,
    pub(crate) base_url: &'a str,
    pub(crate) model_name: &'a str,
}

/// Get `parent[key]` as an object, replacing a missing or non-object value with `{}`.
fn object_entry<'a>(parent: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    let Value::Object(map) = slot else {
        unreachable!("slot was just made an object");
    };
    map
}

/// Upsert the active key into a settings document.
pub(crate) fn apply_key(settings: &mut Map<String, Value>, key: &ActiveKey<'_>) {
    settings
        .entry("$version".to_string())
        .or_insert_with(|| json!(SETTINGS_VERSION));

    let security = object_entry(settings, "security");
    let auth = object_entry(security, "auth");
    auth.insert("selectedType".to_string(), json!(SELECTED_AUTH_TYPE));
    auth.insert("apiKey".to_string(), json!(key.api_key));
    auth.insert("baseUrl".to_string(), json!(key.base_url));

    let model = object_entry(settings, "model");
    model.insert("name".to_string(), json!(key.model_name));
}

fn load_settings(path: &Path) -> Result<Map<String, Value>, AppError> {
    if !path.exists() {
        return Ok(Map::new());
    }

    let content = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    if content.trim().is_empty() {
        return Ok(Map::new());
    }

    let value: Value = serde_json::from_str(&content).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::SettingsNotObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Write `key` into the settings file at `path`, creating it if needed.
/// An existing file is backed up first; the backup path is returned.
pub(crate) fn write_settings(path: &Path, key: &ActiveKey<'_>) -> Result<Option<PathBuf>, AppError> {
    let mut settings = load_settings(path)?;
    apply_key(&mut settings, key);

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
    }

    let backup = backup_file(path)?;
    let mut content = serde_json::to_string_pretty(&settings).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    content.push('\n');
    fs::write(path, content).map_err(|e| AppError::io(path, e))?;
    tracing::debug!(path = %path.display(), "settings written");

    Ok(backup)
}

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Event wiping the persisted selection (RPC `clear_saved_model`).
#[derive(Event)]
pub struct ClearSavedModelEvent;

/// Last model selection, round-tripped through browser localStorage so a
/// returning visitor resumes their previous model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredModelSelection {
    pub model_id: Option<String>,
    pub model_url: Option<String>,
    pub scale: f32,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
}

impl Default for StoredModelSelection {
    fn default() -> Self {
        Self {
            model_id: None,
            model_url: None,
            scale: 1.0,
            position: [0.0; 3],
            rotation: [0.0; 3],
        }
    }
}

fn encode_field<T: Serialize>(value: &T) -> Option<String> {
    serde_json::to_string(value).ok()
}

fn decode_field<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!("Stored entry for '{key}' is malformed, ignoring it: {error}");
            None
        }
    }
}

/// Serialize a selection into its per-key field values, in storage key
/// order. One key per field keeps a single corrupt entry from taking the
/// whole selection down.
fn fields_from_selection(selection: &StoredModelSelection) -> Vec<(&'static str, String)> {
    let mut fields = Vec::new();
    if let Some(value) = encode_field(&selection.model_id) {
        fields.push((constants::storage::SELECTED_MODEL_ID, value));
    }
    if let Some(value) = encode_field(&selection.model_url) {
        fields.push((constants::storage::SELECTED_MODEL_URL, value));
    }
    if let Some(value) = encode_field(&selection.scale) {
        fields.push((constants::storage::SELECTED_MODEL_SCALE, value));
    }
    if let Some(value) = encode_field(&selection.position) {
        fields.push((constants::storage::SELECTED_MODEL_POSITION, value));
    }
    if let Some(value) = encode_field(&selection.rotation) {
        fields.push((constants::storage::SELECTED_MODEL_ROTATION, value));
    }
    fields
}

/// Rebuild a selection from raw per-key values. Returns `None` when
/// neither a model id nor a URL survives decoding, since there is nothing
/// to restore; malformed secondary fields fall back to defaults.
fn selection_from_fields(
    id: Option<&str>,
    url: Option<&str>,
    scale: Option<&str>,
    position: Option<&str>,
    rotation: Option<&str>,
) -> Option<StoredModelSelection> {
    let defaults = StoredModelSelection::default();

    let model_id: Option<String> = id
        .and_then(|raw| decode_field(constants::storage::SELECTED_MODEL_ID, raw))
        .flatten();
    let model_url: Option<String> = url
        .and_then(|raw| decode_field(constants::storage::SELECTED_MODEL_URL, raw))
        .flatten();

    if model_id.is_none() && model_url.is_none() {
        return None;
    }

    Some(StoredModelSelection {
        model_id,
        model_url,
        scale: scale
            .and_then(|raw| decode_field(constants::storage::SELECTED_MODEL_SCALE, raw))
            .unwrap_or(defaults.scale),
        position: position
            .and_then(|raw| decode_field(constants::storage::SELECTED_MODEL_POSITION, raw))
            .unwrap_or(defaults.position),
        rotation: rotation
            .and_then(|raw| decode_field(constants::storage::SELECTED_MODEL_ROTATION, raw))
            .unwrap_or(defaults.rotation),
    })
}

#[cfg(target_arch = "wasm32")]
fn browser_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(target_arch = "wasm32")]
fn read_key(storage: &web_sys::Storage, key: &str) -> Option<String> {
    storage.get_item(key).ok().flatten()
}

/// Read the persisted selection. Native builds have no browser storage
/// and always start from the catalog default.
pub fn load_stored_selection() -> Option<StoredModelSelection> {
    #[cfg(target_arch = "wasm32")]
    {
        let storage = browser_storage()?;
        let id = read_key(&storage, constants::storage::SELECTED_MODEL_ID);
        let url = read_key(&storage, constants::storage::SELECTED_MODEL_URL);
        let scale = read_key(&storage, constants::storage::SELECTED_MODEL_SCALE);
        let position = read_key(&storage, constants::storage::SELECTED_MODEL_POSITION);
        let rotation = read_key(&storage, constants::storage::SELECTED_MODEL_ROTATION);
        selection_from_fields(
            id.as_deref(),
            url.as_deref(),
            scale.as_deref(),
            position.as_deref(),
            rotation.as_deref(),
        )
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

/// Persist the selection, written on every model change.
pub fn store_selection(selection: &StoredModelSelection) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(storage) = browser_storage() else {
            warn!("localStorage unavailable, selection not persisted");
            return;
        };
        for (key, value) in fields_from_selection(selection) {
            if storage.set_item(key, &value).is_err() {
                warn!("Failed to persist '{key}'");
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = selection;
    }
}

/// Drop every persisted key.
pub fn clear_stored_selection() {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(storage) = browser_storage() else {
            return;
        };
        for key in constants::storage::ALL_KEYS {
            let _ = storage.remove_item(key);
        }
    }
}

pub fn handle_clear_saved_model(mut events: EventReader<ClearSavedModelEvent>) {
    if !events.is_empty() {
        events.clear();
        clear_stored_selection();
        info!("Persisted model selection cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> StoredModelSelection {
        StoredModelSelection {
            model_id: Some("unbranded_white_sneaker".into()),
            model_url: Some("models/unbranded_white_sneaker.glb".into()),
            scale: 0.0033,
            position: [0.0, 0.1, 0.0],
            rotation: [0.0, 1.5707964, 0.0],
        }
    }

    fn roundtrip(selection: &StoredModelSelection) -> Option<StoredModelSelection> {
        let fields = fields_from_selection(selection);
        let get = |key: &str| {
            fields
                .iter()
                .find(|(field_key, _)| *field_key == key)
                .map(|(_, value)| value.as_str())
        };
        selection_from_fields(
            get(constants::storage::SELECTED_MODEL_ID),
            get(constants::storage::SELECTED_MODEL_URL),
            get(constants::storage::SELECTED_MODEL_SCALE),
            get(constants::storage::SELECTED_MODEL_POSITION),
            get(constants::storage::SELECTED_MODEL_ROTATION),
        )
    }

    #[test]
    fn selection_roundtrips_through_field_encoding() {
        assert_eq!(roundtrip(&selection()), Some(selection()));
    }

    #[test]
    fn missing_id_and_url_mean_nothing_to_restore() {
        assert_eq!(selection_from_fields(None, None, None, None, None), None);
        // Keys present but encoding null still count as absent.
        assert_eq!(
            selection_from_fields(Some("null"), Some("null"), None, None, None),
            None
        );
    }

    #[test]
    fn malformed_secondary_fields_fall_back_to_defaults() {
        let restored = selection_from_fields(
            Some("\"runner\""),
            None,
            Some("not json"),
            Some("[broken"),
            None,
        )
        .unwrap();

        assert_eq!(restored.model_id.as_deref(), Some("runner"));
        assert_eq!(restored.scale, 1.0);
        assert_eq!(restored.position, [0.0; 3]);
    }
}

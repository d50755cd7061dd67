/// Browser localStorage keys for the persisted model selection.
///
/// One key per field so a stale or malformed entry only loses that field,
/// not the whole selection.
pub const SELECTED_MODEL_ID: &str = "configurator:selectedModelId";
pub const SELECTED_MODEL_URL: &str = "configurator:selectedModelUrl";
pub const SELECTED_MODEL_SCALE: &str = "configurator:selectedModelScale";
pub const SELECTED_MODEL_POSITION: &str = "configurator:selectedModelPosition";
pub const SELECTED_MODEL_ROTATION: &str = "configurator:selectedModelRotation";

/// Every key the engine owns, for wholesale clearing.
pub const ALL_KEYS: &[&str] = &[
    SELECTED_MODEL_ID,
    SELECTED_MODEL_URL,
    SELECTED_MODEL_SCALE,
    SELECTED_MODEL_POSITION,
    SELECTED_MODEL_ROTATION,
];

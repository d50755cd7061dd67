use bevy::prelude::*;

/// Completion flags for the startup and model-load pipeline.
#[derive(Resource, Default)]
pub struct LoadingProgress {
    pub catalogs_loaded: bool,
    pub initial_model_requested: bool,
    /// Cleared whenever a model (re)load or refresh invalidates the
    /// component map; set once extraction has run for the current scene.
    pub components_extracted: bool,
}

use crate::engine::assets::catalog::{BackgroundCatalog, ModelCatalog};
use crate::engine::materials::definition::MaterialCatalog;
use bevy::prelude::*;

/// Handles to the three static catalogs the configurator runs on.
///
/// Catalog assets are requested once at startup and kept alive for the
/// whole session; everything else (model scenes, material instances,
/// textures) comes and goes with the selected model.
#[derive(Resource, Default)]
pub struct ConfiguratorAssets {
    pub model_catalog: Handle<ModelCatalog>,
    pub material_catalog: Handle<MaterialCatalog>,
    pub background_catalog: Handle<BackgroundCatalog>,
}

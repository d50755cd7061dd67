use crate::engine::assets::catalog::{BackgroundCatalog, ModelCatalog};
use crate::engine::assets::configurator_assets::ConfiguratorAssets;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::materials::definition::MaterialCatalog;
use bevy::prelude::*;
use constants::path::{
    BACKGROUND_CATALOG_FILE, MATERIAL_CATALOG_FILE, MODEL_CATALOG_FILE, RELATIVE_CATALOG_PATH,
};

/// Request the three catalog files. The material listing is served in the
/// same catalog JSON shape, so it loads through the same path.
pub fn start_loading(mut assets: ResMut<ConfiguratorAssets>, asset_server: Res<AssetServer>) {
    println!("Loading catalogs from: {RELATIVE_CATALOG_PATH}/");
    assets.model_catalog =
        asset_server.load(format!("{RELATIVE_CATALOG_PATH}/{MODEL_CATALOG_FILE}"));
    assets.material_catalog =
        asset_server.load(format!("{RELATIVE_CATALOG_PATH}/{MATERIAL_CATALOG_FILE}"));
    assets.background_catalog =
        asset_server.load(format!("{RELATIVE_CATALOG_PATH}/{BACKGROUND_CATALOG_FILE}"));
}

/// Flip the progress flag once all three catalogs have parsed.
pub fn check_catalogs_ready(
    mut progress: ResMut<LoadingProgress>,
    assets: Res<ConfiguratorAssets>,
    model_catalogs: Res<Assets<ModelCatalog>>,
    material_catalogs: Res<Assets<MaterialCatalog>>,
    background_catalogs: Res<Assets<BackgroundCatalog>>,
) {
    if progress.catalogs_loaded {
        return;
    }

    let models_ready = model_catalogs.get(&assets.model_catalog).is_some();
    let materials_ready = material_catalogs.get(&assets.material_catalog).is_some();
    let backgrounds_ready = background_catalogs.get(&assets.background_catalog).is_some();

    if models_ready && materials_ready && backgrounds_ready {
        println!("✓ Catalogs loaded successfully");
        progress.catalogs_loaded = true;
    }
}

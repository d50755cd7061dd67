/// Catalog files relative to the asset root.
pub const RELATIVE_CATALOG_PATH: &str = "catalogs";

pub const MODEL_CATALOG_FILE: &str = "sneakers.models.json";
pub const MATERIAL_CATALOG_FILE: &str = "library.materials.json";
pub const BACKGROUND_CATALOG_FILE: &str = "studios.backgrounds.json";

/// Public base URL of the remote object store serving models and textures.
/// Compile-time override: CONFIGURATOR_ASSET_BASE_URL.
pub const DEFAULT_ASSET_BASE_URL: &str = "";

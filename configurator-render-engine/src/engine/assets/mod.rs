//! Static catalog data and remote asset access.
//!
//! Catalogs (models, materials, backgrounds) are read-only JSON assets;
//! the asset store resolves their paths into fetchable locations.

/// Remote object store path resolution for models, textures, and
/// environment maps.
pub mod asset_store;

/// Model and background catalog structures, mirroring their JSON files.
pub mod catalog;

/// Catalog handles held for the lifetime of the session.
pub mod configurator_assets;

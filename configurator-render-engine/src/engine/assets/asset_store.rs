use bevy::prelude::*;

/// Remote object store access for models, textures, and environment maps.
///
/// The store's whole contract is path resolution: given a catalog path,
/// produce something the asset server can fetch. Absolute `http(s)` URLs
/// pass through untouched, leading-slash paths are treated as site-local,
/// and bare relative paths are joined onto the configured public base URL.
#[derive(Resource, Clone, Debug)]
pub struct AssetStore {
    base_url: String,
}

impl AssetStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Store configured at build time via CONFIGURATOR_ASSET_BASE_URL.
    pub fn from_build_env() -> Self {
        let base = option_env!("CONFIGURATOR_ASSET_BASE_URL")
            .unwrap_or(constants::path::DEFAULT_ASSET_BASE_URL);
        if base.is_empty() {
            warn!("CONFIGURATOR_ASSET_BASE_URL is not set, serving assets from the asset root");
        }
        Self::new(base)
    }

    /// Resolve a catalog asset path into a fetchable location.
    pub fn resolve(&self, asset_path: &str) -> String {
        if asset_path.starts_with("http://") || asset_path.starts_with("https://") {
            return asset_path.to_string();
        }

        let clean_path = asset_path.trim_start_matches('/');
        if self.base_url.is_empty() {
            clean_path.to_string()
        } else {
            format!("{}/{}", self.base_url, clean_path)
        }
    }
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::from_build_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_urls_pass_through() {
        let store = AssetStore::new("cdn");
        assert_eq!(
            store.resolve("https://assets.example.com/shoe.glb"),
            "https://assets.example.com/shoe.glb"
        );
        assert_eq!(
            store.resolve("http://assets.example.com/shoe.glb"),
            "http://assets.example.com/shoe.glb"
        );
    }

    #[test]
    fn relative_paths_join_the_base() {
        let store = AssetStore::new("remote/store/");
        assert_eq!(
            store.resolve("models/runner.glb"),
            "remote/store/models/runner.glb"
        );
    }

    #[test]
    fn leading_slash_is_stripped() {
        let store = AssetStore::new("remote");
        assert_eq!(
            store.resolve("/textures/leather.jpg"),
            "remote/textures/leather.jpg"
        );
    }

    #[test]
    fn empty_base_keeps_paths_site_local() {
        let store = AssetStore::new("");
        assert_eq!(store.resolve("/models/runner.glb"), "models/runner.glb");
        assert_eq!(store.resolve("models/runner.glb"), "models/runner.glb");
    }
}

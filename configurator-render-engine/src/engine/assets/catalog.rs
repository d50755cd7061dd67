use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Shoe model entry in the model catalog. Mirrors the JSON structure
/// exactly; transform parameters were authored per model when the GLB
/// files were prepared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoeModelDefinition {
    pub id: String,
    pub name: String,
    pub kind: ModelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Model path in the remote store, or an absolute URL.
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default = "default_model_scale")]
    pub scale: f32,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
}

fn default_model_scale() -> f32 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Blank,
    Branded,
}

impl ShoeModelDefinition {
    /// World transform applied to the spawned scene root.
    pub fn transform(&self) -> Transform {
        Transform::from_translation(Vec3::from(self.position))
            .with_rotation(Quat::from_euler(
                EulerRot::XYZ,
                self.rotation[0],
                self.rotation[1],
                self.rotation[2],
            ))
            .with_scale(Vec3::splat(self.scale))
    }
}

/// Model catalog as a Bevy asset, fetched from `catalogs/` at startup.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath)]
pub struct ModelCatalog {
    pub models: Vec<ShoeModelDefinition>,
}

impl ModelCatalog {
    pub fn find(&self, id: &str) -> Option<&ShoeModelDefinition> {
        self.models.iter().find(|model| model.id == id)
    }

    /// Catalog order is significant: the first entry is the default model
    /// shown to a first-time visitor.
    pub fn default_model(&self) -> Option<&ShoeModelDefinition> {
        self.models.first()
    }
}

/// Studio environment entry. The skybox image is the visual backdrop, the
/// diffuse/specular pair lights the product from the same environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundDefinition {
    pub id: String,
    pub name: String,
    pub skybox: String,
    pub diffuse_map: String,
    pub specular_map: String,
    #[serde(default = "default_environment_intensity")]
    pub intensity: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

fn default_environment_intensity() -> f32 {
    constants::render_settings::DEFAULT_ENVIRONMENT_INTENSITY
}

#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath)]
pub struct BackgroundCatalog {
    pub backgrounds: Vec<BackgroundDefinition>,
}

impl BackgroundCatalog {
    pub fn find(&self, id: &str) -> Option<&BackgroundDefinition> {
        self.backgrounds.iter().find(|background| background.id == id)
    }

    pub fn default_background(&self) -> Option<&BackgroundDefinition> {
        self.backgrounds.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_catalog_parses_and_defaults() {
        let json = r#"{
            "models": [
                {
                    "id": "unbranded_white_sneaker",
                    "name": "Unbranded White Sneaker",
                    "kind": "blank",
                    "model": "models/unbranded_white_sneaker.glb",
                    "scale": 0.0033
                },
                {
                    "id": "court_classic",
                    "name": "Court Classic",
                    "kind": "branded",
                    "brand": "Atlas",
                    "model": "models/court_classic.glb",
                    "position": [0.0, 0.1, 0.0]
                }
            ]
        }"#;

        let catalog: ModelCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.models.len(), 2);
        assert_eq!(
            catalog.default_model().unwrap().id,
            "unbranded_white_sneaker"
        );

        let branded = catalog.find("court_classic").unwrap();
        assert_eq!(branded.scale, 1.0);
        assert_eq!(branded.brand.as_deref(), Some("Atlas"));
        assert!(catalog.find("missing").is_none());
    }

    #[test]
    fn model_transform_applies_scale_and_position() {
        let model = ShoeModelDefinition {
            id: "m".into(),
            name: "M".into(),
            kind: ModelKind::Blank,
            brand: None,
            model: "models/m.glb".into(),
            thumbnail: None,
            scale: 0.5,
            position: [1.0, 2.0, 3.0],
            rotation: [0.0, 0.0, 0.0],
        };

        let transform = model.transform();
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.scale, Vec3::splat(0.5));
    }

    #[test]
    fn background_catalog_parses() {
        let json = r#"{
            "backgrounds": [
                {
                    "id": "brown_photostudio",
                    "name": "Brown Photo Studio",
                    "skybox": "environments/brown_photostudio_skybox.ktx2",
                    "diffuse_map": "environments/brown_photostudio_diffuse.ktx2",
                    "specular_map": "environments/brown_photostudio_specular.ktx2"
                }
            ]
        }"#;

        let catalog: BackgroundCatalog = serde_json::from_str(json).unwrap();
        let background = catalog.default_background().unwrap();
        assert_eq!(background.id, "brown_photostudio");
        assert_eq!(
            background.intensity,
            constants::render_settings::DEFAULT_ENVIRONMENT_INTENSITY
        );
    }
}

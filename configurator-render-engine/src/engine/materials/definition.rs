use bevy::prelude::*;
use constants::component::ShoeComponent;
use serde::{Deserialize, Serialize};

/// Broad material families used by the frontend to group swatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialFamily {
    Leather,
    Fabric,
    Synthetic,
    Rubber,
    Metal,
    Premium,
}

/// PBR appearance description for one material. All fields optional; an
/// absent field leaves the renderer default in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PbrProperties {
    /// Base colour as a `#rrggbb` hex literal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f32>,
    /// Albedo texture path in the remote store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_map: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness_map: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metalness_map: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ao_map: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
}

impl PbrProperties {
    /// Cache key over the present fields, concatenated in fixed order.
    /// Two property sets with identical content always produce identical
    /// signatures, so they share one cached material template.
    pub fn signature(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(color) = &self.color {
            parts.push(format!("c:{}", color.to_ascii_lowercase()));
        }
        if let Some(roughness) = self.roughness {
            parts.push(format!("r:{roughness}"));
        }
        if let Some(metalness) = self.metalness {
            parts.push(format!("m:{metalness}"));
        }
        if let Some(map) = &self.map {
            parts.push(format!("map:{map}"));
        }
        if let Some(normal_map) = &self.normal_map {
            parts.push(format!("n:{normal_map}"));
        }
        if let Some(roughness_map) = &self.roughness_map {
            parts.push(format!("rm:{roughness_map}"));
        }
        if let Some(metalness_map) = &self.metalness_map {
            parts.push(format!("mm:{metalness_map}"));
        }
        if let Some(ao_map) = &self.ao_map {
            parts.push(format!("ao:{ao_map}"));
        }
        if let Some(opacity) = self.opacity {
            parts.push(format!("o:{opacity}"));
        }

        parts.join("|")
    }
}

/// One entry of the material catalog. Read-only at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialDefinition {
    pub id: String,
    pub name: String,
    pub family: MaterialFamily,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub properties: PbrProperties,
    #[serde(default)]
    pub price_modifier: f32,
    #[serde(default)]
    pub premium: bool,
    /// Components this material may be applied to. Absent = any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatible_components: Option<Vec<ShoeComponent>>,
}

impl MaterialDefinition {
    pub fn is_compatible_with(&self, component: ShoeComponent) -> bool {
        match &self.compatible_components {
            Some(components) => components.contains(&component),
            None => true,
        }
    }
}

/// Material catalog as a Bevy asset, fetched from `catalogs/` at startup.
/// The backing listing service returns exactly this shape.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath)]
pub struct MaterialCatalog {
    pub materials: Vec<MaterialDefinition>,
}

impl MaterialCatalog {
    pub fn find(&self, id: &str) -> Option<&MaterialDefinition> {
        self.materials.iter().find(|material| material.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_leather_properties() -> PbrProperties {
        PbrProperties {
            color: Some("#8b1a1a".into()),
            roughness: Some(0.6),
            metalness: Some(0.0),
            map: Some("textures/leather/albedo.jpg".into()),
            normal_map: Some("textures/leather/normal.jpg".into()),
            ..Default::default()
        }
    }

    #[test]
    fn signature_concatenates_present_fields_in_fixed_order() {
        let signature = red_leather_properties().signature();
        assert_eq!(
            signature,
            "c:#8b1a1a|r:0.6|m:0|map:textures/leather/albedo.jpg|n:textures/leather/normal.jpg"
        );
    }

    #[test]
    fn identical_properties_share_a_signature() {
        assert_eq!(
            red_leather_properties().signature(),
            red_leather_properties().signature()
        );
    }

    #[test]
    fn differing_properties_do_not_collide() {
        let mut other = red_leather_properties();
        other.roughness = Some(0.7);
        assert_ne!(red_leather_properties().signature(), other.signature());

        // A field moving between slots must not alias another layout.
        let map_only = PbrProperties {
            map: Some("a.jpg".into()),
            ..Default::default()
        };
        let normal_only = PbrProperties {
            normal_map: Some("a.jpg".into()),
            ..Default::default()
        };
        assert_ne!(map_only.signature(), normal_only.signature());
    }

    #[test]
    fn empty_properties_have_an_empty_signature() {
        assert_eq!(PbrProperties::default().signature(), "");
    }

    #[test]
    fn catalog_parses_and_checks_compatibility() {
        let json = r##"{
            "materials": [
                {
                    "id": "red-leather",
                    "name": "Red Leather",
                    "family": "leather",
                    "properties": { "color": "#8b1a1a", "roughness": 0.6 },
                    "price_modifier": 12.5,
                    "premium": true,
                    "compatible_components": ["upper", "tongue"]
                },
                {
                    "id": "gum-rubber",
                    "name": "Gum Rubber",
                    "family": "rubber",
                    "properties": { "color": "#c9a875", "roughness": 0.9 }
                }
            ]
        }"##;

        let catalog: MaterialCatalog = serde_json::from_str(json).unwrap();
        let leather = catalog.find("red-leather").unwrap();
        assert!(leather.premium);
        assert!(leather.is_compatible_with(ShoeComponent::Upper));
        assert!(!leather.is_compatible_with(ShoeComponent::Sole));

        let rubber = catalog.find("gum-rubber").unwrap();
        assert!(rubber.is_compatible_with(ShoeComponent::Sole));
        assert_eq!(rubber.price_modifier, 0.0);
    }
}

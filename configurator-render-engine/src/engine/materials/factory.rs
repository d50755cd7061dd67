use crate::engine::error::SwapError;
use crate::engine::materials::definition::PbrProperties;
use bevy::asset::LoadState;
use bevy::prelude::*;
use std::collections::HashMap;

/// Texture slots of the renderer material. Bevy packs roughness and
/// metalness into one glTF-style map, so both catalog fields feed the
/// `MetallicRoughness` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    BaseColor,
    Normal,
    MetallicRoughness,
    Occlusion,
}

struct PendingTexture {
    signature: String,
    slot: TextureSlot,
    path: String,
    handle: Handle<Image>,
}

/// Explicit material cache with an injected lifetime: owned by the app,
/// cleared on model teardown, never a module-level singleton.
///
/// Templates are cached per property signature; every caller receives an
/// independent clone under a fresh handle so per-mesh state never leaks
/// between meshes sharing a definition. Texture loads resolve in any
/// order; a failed load clears just that slot on the template and its
/// live clones while the signature is still cached (stale completions are
/// dropped on the floor).
#[derive(Resource, Default)]
pub struct MaterialFactory {
    cache: HashMap<String, Handle<StandardMaterial>>,
    instances: HashMap<String, Vec<AssetId<StandardMaterial>>>,
    pending_textures: Vec<PendingTexture>,
}

impl MaterialFactory {
    /// Realize PBR properties as a renderable material instance.
    ///
    /// `load_texture` turns a catalog texture path into an image handle;
    /// the production caller routes it through the asset server and the
    /// remote store.
    pub fn realize(
        &mut self,
        properties: &PbrProperties,
        materials: &mut Assets<StandardMaterial>,
        mut load_texture: impl FnMut(&str) -> Handle<Image>,
    ) -> Result<Handle<StandardMaterial>, SwapError> {
        let signature = properties.signature();

        if let Some(template) = self.cache.get(&signature) {
            if let Some(material) = materials.get(template).cloned() {
                return Ok(self.register_instance(signature, material, materials));
            }
        }

        let mut material = base_material(properties)?;
        for (slot, path) in texture_requests(properties) {
            let handle = load_texture(&path);
            assign_texture(&mut material, slot, handle.clone());
            self.pending_textures.push(PendingTexture {
                signature: signature.clone(),
                slot,
                path,
                handle,
            });
        }

        let template = materials.add(material.clone());
        self.cache.insert(signature.clone(), template);
        Ok(self.register_instance(signature, material, materials))
    }

    fn register_instance(
        &mut self,
        signature: String,
        material: StandardMaterial,
        materials: &mut Assets<StandardMaterial>,
    ) -> Handle<StandardMaterial> {
        let instance = materials.add(material);
        self.instances
            .entry(signature)
            .or_default()
            .push(instance.id());
        instance
    }

    /// Poll in-flight texture loads. Successes are already wired into
    /// their slots; failures are logged and the slot cleared so the
    /// material stays usable with whichever maps arrived.
    pub fn process_texture_loads(
        &mut self,
        asset_server: &AssetServer,
        materials: &mut Assets<StandardMaterial>,
    ) {
        let mut index = 0;
        while index < self.pending_textures.len() {
            match asset_server.get_load_state(&self.pending_textures[index].handle) {
                Some(LoadState::Loaded) => {
                    self.pending_textures.swap_remove(index);
                }
                Some(LoadState::Failed(_)) => {
                    let pending = self.pending_textures.swap_remove(index);
                    // Guard against stale completion: only repair materials
                    // whose signature is still a referenced cache entry.
                    if let Some(template) = self.cache.get(&pending.signature) {
                        warn!(
                            "Texture '{}' failed to load, material continues without it",
                            pending.path
                        );
                        if let Some(material) = materials.get_mut(template) {
                            clear_texture(material, pending.slot);
                        }
                        for id in self
                            .instances
                            .get(&pending.signature)
                            .map(|ids| ids.as_slice())
                            .unwrap_or(&[])
                        {
                            if let Some(material) = materials.get_mut(*id) {
                                clear_texture(material, pending.slot);
                            }
                        }
                    }
                }
                _ => {
                    index += 1;
                }
            }
        }
    }

    /// Drop every cached template and tracking entry. Called on model
    /// teardown; unreferenced material and texture assets free once their
    /// remaining handles drop.
    pub fn clear(&mut self) {
        let released = self.cache.len();
        self.cache.clear();
        self.instances.clear();
        self.pending_textures.clear();
        if released > 0 {
            info!("Material cache cleared, {released} template(s) released");
        }
    }

    pub fn cached_template_count(&self) -> usize {
        self.cache.len()
    }
}

/// Parse a `#rrggbb` (or `#rrggbbaa`) colour literal.
pub fn parse_hex_color(literal: &str) -> Result<Color, SwapError> {
    Srgba::hex(literal)
        .map(Color::from)
        .map_err(|_| SwapError::InvalidColor(literal.to_string()))
}

/// Build the untextured material for a property set.
pub fn base_material(properties: &PbrProperties) -> Result<StandardMaterial, SwapError> {
    let mut material = StandardMaterial::default();

    if let Some(color) = &properties.color {
        material.base_color = parse_hex_color(color)?;
    }
    if let Some(roughness) = properties.roughness {
        material.perceptual_roughness = roughness.clamp(0.0, 1.0);
    }
    if let Some(metalness) = properties.metalness {
        material.metallic = metalness.clamp(0.0, 1.0);
    }
    if let Some(opacity) = properties.opacity {
        material.base_color = material.base_color.with_alpha(opacity);
        if opacity < 1.0 {
            material.alpha_mode = AlphaMode::Blend;
        }
    }

    Ok(material)
}

fn texture_requests(properties: &PbrProperties) -> Vec<(TextureSlot, String)> {
    let mut requests = Vec::new();

    if let Some(map) = &properties.map {
        requests.push((TextureSlot::BaseColor, map.clone()));
    }
    if let Some(normal_map) = &properties.normal_map {
        requests.push((TextureSlot::Normal, normal_map.clone()));
    }
    match (&properties.metalness_map, &properties.roughness_map) {
        (Some(metalness_map), roughness_map) => {
            if roughness_map.is_some() && roughness_map.as_ref() != Some(metalness_map) {
                warn!(
                    "Material carries separate roughness and metalness maps, using '{metalness_map}' for the combined slot"
                );
            }
            requests.push((TextureSlot::MetallicRoughness, metalness_map.clone()));
        }
        (None, Some(roughness_map)) => {
            requests.push((TextureSlot::MetallicRoughness, roughness_map.clone()));
        }
        (None, None) => {}
    }
    if let Some(ao_map) = &properties.ao_map {
        requests.push((TextureSlot::Occlusion, ao_map.clone()));
    }

    requests
}

fn assign_texture(material: &mut StandardMaterial, slot: TextureSlot, handle: Handle<Image>) {
    match slot {
        TextureSlot::BaseColor => material.base_color_texture = Some(handle),
        TextureSlot::Normal => material.normal_map_texture = Some(handle),
        TextureSlot::MetallicRoughness => material.metallic_roughness_texture = Some(handle),
        TextureSlot::Occlusion => material.occlusion_texture = Some(handle),
    }
}

fn clear_texture(material: &mut StandardMaterial, slot: TextureSlot) {
    match slot {
        TextureSlot::BaseColor => material.base_color_texture = None,
        TextureSlot::Normal => material.normal_map_texture = None,
        TextureSlot::MetallicRoughness => material.metallic_roughness_texture = None,
        TextureSlot::Occlusion => material.occlusion_texture = None,
    }
}

/// Poll pending texture loads against the asset server every frame.
pub fn watch_material_textures(
    mut factory: ResMut<MaterialFactory>,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    factory.process_texture_loads(&asset_server, &mut materials);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_properties() -> PbrProperties {
        PbrProperties {
            color: Some("#8b1a1a".into()),
            roughness: Some(0.6),
            metalness: Some(0.1),
            ..Default::default()
        }
    }

    #[test]
    fn hex_colors_parse_or_reject() {
        let color = parse_hex_color("#8b1a1a").unwrap();
        let srgba = color.to_srgba();
        assert!((srgba.red - 0x8b as f32 / 255.0).abs() < 1e-6);

        assert!(parse_hex_color("not-a-color").is_err());
        assert!(parse_hex_color("#12345").is_err());
    }

    #[test]
    fn base_material_applies_pbr_fields() {
        let material = base_material(&PbrProperties {
            color: Some("#ffffff".into()),
            roughness: Some(0.25),
            metalness: Some(1.0),
            opacity: Some(0.5),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(material.perceptual_roughness, 0.25);
        assert_eq!(material.metallic, 1.0);
        assert_eq!(material.base_color.alpha(), 0.5);
        assert!(matches!(material.alpha_mode, AlphaMode::Blend));
    }

    #[test]
    fn cache_hits_return_independent_clones() {
        let mut factory = MaterialFactory::default();
        let mut materials = Assets::<StandardMaterial>::default();

        let first = factory
            .realize(&red_properties(), &mut materials, |_| Handle::default())
            .unwrap();
        let second = factory
            .realize(&red_properties(), &mut materials, |_| Handle::default())
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(factory.cached_template_count(), 1);

        // Mutating one clone must not leak into the other.
        materials.get_mut(&first).unwrap().base_color = Color::BLACK;
        let second_color = materials.get(&second).unwrap().base_color;
        assert_ne!(second_color, Color::BLACK);
    }

    #[test]
    fn distinct_properties_build_distinct_templates() {
        let mut factory = MaterialFactory::default();
        let mut materials = Assets::<StandardMaterial>::default();

        factory
            .realize(&red_properties(), &mut materials, |_| Handle::default())
            .unwrap();
        let mut blue = red_properties();
        blue.color = Some("#1a1a8b".into());
        factory
            .realize(&blue, &mut materials, |_| Handle::default())
            .unwrap();

        assert_eq!(factory.cached_template_count(), 2);
    }

    #[test]
    fn invalid_color_fails_the_whole_material() {
        let mut factory = MaterialFactory::default();
        let mut materials = Assets::<StandardMaterial>::default();

        let result = factory.realize(
            &PbrProperties {
                color: Some("#zzzzzz".into()),
                ..Default::default()
            },
            &mut materials,
            |_| Handle::default(),
        );
        assert!(result.is_err());
        assert_eq!(factory.cached_template_count(), 0);
    }

    #[test]
    fn texture_requests_pack_the_combined_slot() {
        let requests = texture_requests(&PbrProperties {
            map: Some("albedo.jpg".into()),
            roughness_map: Some("rough.jpg".into()),
            metalness_map: Some("metal.jpg".into()),
            ao_map: Some("ao.jpg".into()),
            ..Default::default()
        });

        assert_eq!(
            requests,
            vec![
                (TextureSlot::BaseColor, "albedo.jpg".to_string()),
                (TextureSlot::MetallicRoughness, "metal.jpg".to_string()),
                (TextureSlot::Occlusion, "ao.jpg".to_string()),
            ]
        );
    }

    #[test]
    fn clear_releases_every_template() {
        let mut factory = MaterialFactory::default();
        let mut materials = Assets::<StandardMaterial>::default();

        factory
            .realize(&red_properties(), &mut materials, |_| Handle::default())
            .unwrap();
        factory.clear();
        assert_eq!(factory.cached_template_count(), 0);
    }
}

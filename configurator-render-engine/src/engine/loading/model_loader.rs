use crate::engine::assets::asset_store::AssetStore;
use crate::engine::assets::catalog::{ModelCatalog, ShoeModelDefinition};
use crate::engine::assets::configurator_assets::ConfiguratorAssets;
use crate::engine::core::session::{self, StoredModelSelection};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::materials::factory::MaterialFactory;
use crate::engine::materials::swapper::AppliedMaterials;
use crate::engine::scene::component_map::ComponentMap;
use crate::tools::highlighter::TintRecords;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;

/// Event requesting a model switch. Carries the full transform so both
/// catalog picks and restored sessions route through one path.
#[derive(Event)]
pub struct SelectModelEvent {
    pub model_id: Option<String>,
    pub url: String,
    pub scale: f32,
    pub position: Vec3,
    pub rotation: Vec3,
}

impl SelectModelEvent {
    pub fn from_definition(model: &ShoeModelDefinition) -> Self {
        Self {
            model_id: Some(model.id.clone()),
            url: model.model.clone(),
            scale: model.scale,
            position: Vec3::from(model.position),
            rotation: Vec3::from(model.rotation),
        }
    }
}

/// The model currently in the viewport.
#[derive(Resource, Default)]
pub struct CurrentModel {
    pub root: Option<Entity>,
    pub model_id: Option<String>,
    pub url: Option<String>,
    pub scene: Option<Handle<Scene>>,
}

/// Marker for the spawned model's scene root.
#[derive(Component)]
pub struct ModelRoot;

/// Pick the restored or default model once the catalogs are in.
pub fn select_initial_model(
    assets: Res<ConfiguratorAssets>,
    model_catalogs: Res<Assets<ModelCatalog>>,
    mut select_events: EventWriter<SelectModelEvent>,
    mut progress: ResMut<LoadingProgress>,
) {
    if progress.initial_model_requested {
        return;
    }
    let Some(catalog) = model_catalogs.get(&assets.model_catalog) else {
        return;
    };

    if let Some(stored) = session::load_stored_selection() {
        if let Some(url) = stored.model_url.clone() {
            println!("→ Restoring previous model selection");
            select_events.write(SelectModelEvent {
                model_id: stored.model_id.clone(),
                url,
                scale: stored.scale,
                position: Vec3::from(stored.position),
                rotation: Vec3::from(stored.rotation),
            });
            progress.initial_model_requested = true;
            return;
        }
        if let Some(model) = stored.model_id.as_deref().and_then(|id| catalog.find(id)) {
            println!("→ Restoring previous model selection by id");
            select_events.write(SelectModelEvent::from_definition(model));
            progress.initial_model_requested = true;
            return;
        }
    }

    match catalog.default_model() {
        Some(model) => {
            select_events.write(SelectModelEvent::from_definition(model));
        }
        None => warn!("Model catalog is empty, nothing to show"),
    }
    progress.initial_model_requested = true;
}

/// Tear down the previous model and spawn the requested one.
///
/// Every per-scene cache goes with the old root: component map, applied
/// materials, tint records, and the material cache. The assignment map
/// survives so the user's choices reapply to the incoming model.
pub fn handle_select_model(
    mut events: EventReader<SelectModelEvent>,
    mut commands: Commands,
    mut current: ResMut<CurrentModel>,
    mut component_map: ResMut<ComponentMap>,
    mut applied: ResMut<AppliedMaterials>,
    mut tints: ResMut<TintRecords>,
    mut factory: ResMut<MaterialFactory>,
    mut progress: ResMut<LoadingProgress>,
    asset_server: Res<AssetServer>,
    store: Res<AssetStore>,
) {
    let Some(event) = events.read().last() else {
        return;
    };

    if let Some(root) = current.root.take() {
        commands.entity(root).despawn();
    }
    component_map.clear();
    applied.clear();
    tints.forget_all();
    factory.clear();
    progress.components_extracted = false;

    let path = store.resolve(&event.url);
    println!("→ Loading model from: {path}");
    let scene: Handle<Scene> = asset_server.load(GltfAssetLabel::Scene(0).from_asset(path));

    let transform = Transform::from_translation(event.position)
        .with_rotation(Quat::from_euler(
            EulerRot::XYZ,
            event.rotation.x,
            event.rotation.y,
            event.rotation.z,
        ))
        .with_scale(Vec3::splat(event.scale));

    let root = commands
        .spawn((
            SceneRoot(scene.clone()),
            transform,
            ModelRoot,
            Name::new(
                event
                    .model_id
                    .clone()
                    .unwrap_or_else(|| "custom_model".to_string()),
            ),
        ))
        .id();

    current.root = Some(root);
    current.model_id = event.model_id.clone();
    current.url = Some(event.url.clone());
    current.scene = Some(scene);

    session::store_selection(&StoredModelSelection {
        model_id: event.model_id.clone(),
        model_url: Some(event.url.clone()),
        scale: event.scale,
        position: event.position.into(),
        rotation: event.rotation.into(),
    });
}

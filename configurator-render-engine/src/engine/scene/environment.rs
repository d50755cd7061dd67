use crate::engine::assets::asset_store::AssetStore;
use crate::engine::assets::catalog::BackgroundCatalog;
use crate::engine::assets::configurator_assets::ConfiguratorAssets;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::core_pipeline::Skybox;
use bevy::prelude::*;

/// Event switching the studio environment to a catalog entry.
#[derive(Event)]
pub struct SetBackgroundEvent {
    pub id: String,
}

#[derive(Resource, Default)]
pub struct CurrentBackground {
    pub id: Option<String>,
}

/// Swap the camera's skybox and environment light to the requested
/// catalog background. The environment is the backdrop and the ambient
/// light source at once, so both components change together.
pub fn handle_background_events(
    mut events: EventReader<SetBackgroundEvent>,
    mut commands: Commands,
    assets: Res<ConfiguratorAssets>,
    catalogs: Res<Assets<BackgroundCatalog>>,
    asset_server: Res<AssetServer>,
    store: Res<AssetStore>,
    cameras: Query<Entity, With<Camera3d>>,
    mut current: ResMut<CurrentBackground>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let Some(event) = events.read().last() else {
        return;
    };
    if current.id.as_deref() == Some(event.id.as_str()) {
        return;
    }

    let Some(catalog) = catalogs.get(&assets.background_catalog) else {
        warn!("Background catalog not loaded yet, ignoring '{}'", event.id);
        return;
    };
    let Some(background) = catalog.find(&event.id) else {
        warn!("Unknown background id '{}'", event.id);
        rpc_interface.send_notification(
            "swap_failed",
            serde_json::json!({ "background": event.id, "reason": "unknown background id" }),
        );
        return;
    };

    let skybox_image: Handle<Image> = asset_server.load(store.resolve(&background.skybox));
    let diffuse_map: Handle<Image> = asset_server.load(store.resolve(&background.diffuse_map));
    let specular_map: Handle<Image> = asset_server.load(store.resolve(&background.specular_map));

    for camera in &cameras {
        commands.entity(camera).insert((
            Skybox {
                image: skybox_image.clone(),
                brightness: background.intensity,
                rotation: Quat::IDENTITY,
            },
            EnvironmentMapLight {
                diffuse_map: diffuse_map.clone(),
                specular_map: specular_map.clone(),
                intensity: background.intensity,
                ..default()
            },
        ));
    }

    println!("→ Environment switched to '{}'", background.id);
    current.id = Some(background.id.clone());
}

/// Request the catalog's first background once, unless the frontend beat
/// us to a pick.
pub fn apply_default_background(
    assets: Res<ConfiguratorAssets>,
    catalogs: Res<Assets<BackgroundCatalog>>,
    current: Res<CurrentBackground>,
    mut events: EventWriter<SetBackgroundEvent>,
    mut requested: Local<bool>,
) {
    if *requested || current.id.is_some() {
        return;
    }
    let Some(catalog) = catalogs.get(&assets.background_catalog) else {
        return;
    };
    let Some(background) = catalog.default_background() else {
        *requested = true;
        return;
    };

    events.write(SetBackgroundEvent {
        id: background.id.clone(),
    });
    *requested = true;
}

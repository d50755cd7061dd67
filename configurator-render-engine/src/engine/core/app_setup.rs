use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
// Crate engine modules
use crate::engine::assets::asset_store::AssetStore;
use crate::engine::assets::catalog::{BackgroundCatalog, ModelCatalog};
use crate::engine::assets::configurator_assets::ConfiguratorAssets;
use crate::engine::camera::{OrbitCamera, camera_controller};
use crate::engine::core::app_state::{
    AppState, FpsText, transition_to_catalogs_ready, transition_to_running,
};
use crate::engine::core::session::{ClearSavedModelEvent, handle_clear_saved_model};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::catalog_loader::{check_catalogs_ready, start_loading};
use crate::engine::loading::model_loader::{
    CurrentModel, SelectModelEvent, handle_select_model, select_initial_model,
};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::materials::definition::MaterialCatalog;
use crate::engine::materials::factory::{MaterialFactory, watch_material_textures};
use crate::engine::materials::swapper::{
    AppliedMaterials, ApplyMaterialEvent, ClearAllMaterialsEvent, ClearMaterialEvent,
    MaterialAssignments, SwapFailedEvent, apply_material_assignments, handle_material_events,
    init_neutral_material,
};
use crate::engine::scene::component_map::{
    ComponentMap, RefreshComponentsEvent, extract_components_when_ready, handle_refresh_requests,
};
use crate::engine::scene::environment::{
    CurrentBackground, SetBackgroundEvent, apply_default_background, handle_background_events,
};
use crate::engine::systems::status_feed::{fps_notification_system, loading_status_feed};
// Crate tools and Web RPC modules
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::InteractionToolsPlugin;
use constants::render_settings::{
    AMBIENT_BRIGHTNESS, CAMERA_START_POSITION, FILL_LIGHT_ILLUMINANCE,
};

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::status_feed::fps_text_update_system;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers each catalog as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ModelCatalog>::new(&["models.json"]))
        .add_plugins(JsonAssetPlugin::<MaterialCatalog>::new(&["materials.json"]))
        .add_plugins(JsonAssetPlugin::<BackgroundCatalog>::new(&["backgrounds.json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(InteractionToolsPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ConfiguratorAssets>()
        .init_resource::<ComponentMap>()
        .init_resource::<MaterialAssignments>()
        .init_resource::<AppliedMaterials>()
        .init_resource::<MaterialFactory>()
        .init_resource::<CurrentModel>()
        .init_resource::<CurrentBackground>()
        .init_resource::<OrbitCamera>()
        .insert_resource(AssetStore::from_build_env())
        .add_event::<SelectModelEvent>()
        .add_event::<ApplyMaterialEvent>()
        .add_event::<ClearMaterialEvent>()
        .add_event::<ClearAllMaterialsEvent>()
        .add_event::<SwapFailedEvent>()
        .add_event::<SetBackgroundEvent>()
        .add_event::<RefreshComponentsEvent>()
        .add_event::<ClearSavedModelEvent>();

    // State-based system scheduling
    app.add_systems(Startup, (setup, init_neutral_material, start_loading).chain())
        .add_systems(
            Update,
            (check_catalogs_ready, transition_to_catalogs_ready)
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            (select_initial_model, transition_to_running)
                .chain()
                .run_if(in_state(AppState::CatalogsReady)),
        );

    // Base runtime systems that run on all platforms.
    let runtime_systems = (
        // Model lifecycle
        handle_select_model,
        extract_components_when_ready,
        handle_refresh_requests,
        // Material pipeline
        handle_material_events,
        apply_material_assignments,
        watch_material_textures,
        // Environment
        apply_default_background,
        handle_background_events,
        // Session persistence
        handle_clear_saved_model,
        // Viewport
        camera_controller,
    );

    app.add_systems(
        Update,
        runtime_systems.chain().run_if(in_state(AppState::Running)),
    );

    app.add_systems(Update, (loading_status_feed, fps_notification_system));

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

// Startup system that only handles basic scene furniture
fn setup(mut commands: Commands) {
    spawn_camera(&mut commands);
    spawn_lighting(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(CAMERA_START_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Fallback lighting underneath the HDR environment, so the product is
/// never pitch black while environment maps stream in.
fn spawn_lighting(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: FILL_LIGHT_ILLUMINANCE,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(10.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

use crate::engine::assets::asset_store::AssetStore;
use crate::engine::materials::definition::MaterialDefinition;
use crate::engine::materials::factory::MaterialFactory;
use crate::engine::scene::classifier::classify_mesh_name;
use crate::engine::scene::component_map::ComponentMap;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;
use constants::component::ShoeComponent;
use constants::render_settings::NEUTRAL_BASE_COLOR;
use std::collections::HashMap;

/// Event assigning a catalog material to a component category.
#[derive(Event)]
pub struct ApplyMaterialEvent {
    pub component: ShoeComponent,
    pub material: MaterialDefinition,
}

/// Event clearing one category back to the neutral default look.
#[derive(Event)]
pub struct ClearMaterialEvent {
    pub component: ShoeComponent,
}

/// Event clearing every category at once.
#[derive(Event)]
pub struct ClearAllMaterialsEvent;

/// Per-category swap failure. Other categories keep swapping.
#[derive(Event)]
pub struct SwapFailedEvent {
    pub component: ShoeComponent,
    pub reason: String,
}

/// Current category → material choice. Absence means "no override".
#[derive(Resource, Default)]
pub struct MaterialAssignments {
    map: HashMap<ShoeComponent, MaterialDefinition>,
}

impl MaterialAssignments {
    pub fn set(&mut self, component: ShoeComponent, material: MaterialDefinition) {
        self.map.insert(component, material);
    }

    pub fn remove(&mut self, component: ShoeComponent) {
        self.map.remove(&component);
    }

    pub fn clear_all(&mut self) {
        self.map.clear();
    }

    pub fn get(&self, component: ShoeComponent) -> Option<&MaterialDefinition> {
        self.map.get(&component)
    }

    pub fn map(&self) -> &HashMap<ShoeComponent, MaterialDefinition> {
        &self.map
    }
}

/// Material ids already applied per category. Makes reapplication
/// idempotent and drives reset detection.
#[derive(Resource, Default)]
pub struct AppliedMaterials {
    map: HashMap<ShoeComponent, String>,
}

impl AppliedMaterials {
    pub fn insert(&mut self, component: ShoeComponent, material_id: String) {
        self.map.insert(component, material_id);
    }

    pub fn remove(&mut self, component: ShoeComponent) {
        self.map.remove(&component);
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn map(&self) -> &HashMap<ShoeComponent, String> {
        &self.map
    }
}

/// Neutral template a cleared category falls back to.
#[derive(Resource, Default)]
pub struct NeutralMaterial {
    pub template: Handle<StandardMaterial>,
}

pub fn init_neutral_material(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let template = materials.add(StandardMaterial {
        base_color: NEUTRAL_BASE_COLOR,
        ..default()
    });
    commands.insert_resource(NeutralMaterial { template });
}

#[derive(Debug, Clone)]
pub enum SwapAction {
    Apply(MaterialDefinition),
    Reset,
}

/// Diff the applied-material tracking against the assignment map.
///
/// Pure so it can run from any event loop: categories whose assigned
/// material id differs from the applied one produce `Apply`, categories
/// applied but no longer assigned produce `Reset`. Unchanged categories
/// produce nothing, which is what makes repeated swaps idempotent.
pub fn assignment_deltas(
    applied: &HashMap<ShoeComponent, String>,
    assignments: &HashMap<ShoeComponent, MaterialDefinition>,
) -> Vec<(ShoeComponent, SwapAction)> {
    let mut deltas = Vec::new();

    for (component, material) in assignments {
        if applied.get(component) != Some(&material.id) {
            deltas.push((*component, SwapAction::Apply(material.clone())));
        }
    }
    for component in applied.keys() {
        if !assignments.contains_key(component) {
            deltas.push((*component, SwapAction::Reset));
        }
    }

    deltas
}

/// Fold material events into the assignment map. The swapper reacts to
/// the resulting resource change.
pub fn handle_material_events(
    mut apply_events: EventReader<ApplyMaterialEvent>,
    mut clear_events: EventReader<ClearMaterialEvent>,
    mut clear_all_events: EventReader<ClearAllMaterialsEvent>,
    mut assignments: ResMut<MaterialAssignments>,
) {
    for event in apply_events.read() {
        assignments.set(event.component, event.material.clone());
    }
    for event in clear_events.read() {
        assignments.remove(event.component);
    }
    if !clear_all_events.is_empty() {
        clear_all_events.clear();
        assignments.clear_all();
    }
}

/// Apply assignment deltas to the live scene.
///
/// Each resolved mesh receives its own material clone. A category that
/// fails (bad colour literal) is reported and skipped without blocking the
/// rest; a category with no resolvable meshes is logged and retried on the
/// next change.
pub fn apply_material_assignments(
    mut commands: Commands,
    assignments: Res<MaterialAssignments>,
    mut applied: ResMut<AppliedMaterials>,
    component_map: Res<ComponentMap>,
    named_meshes: Query<(Entity, &Name), With<Mesh3d>>,
    mut factory: ResMut<MaterialFactory>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    store: Res<AssetStore>,
    neutral: Res<NeutralMaterial>,
    mut swap_failed: EventWriter<SwapFailedEvent>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if !assignments.is_changed() && !component_map.is_changed() {
        return;
    }

    for (component, action) in assignment_deltas(applied.map(), assignments.map()) {
        let meshes = resolve_meshes(component, &component_map, &named_meshes);
        if meshes.is_empty() {
            warn!(
                "No meshes resolved for component '{}', swap deferred",
                component.as_str()
            );
            continue;
        }

        match action {
            SwapAction::Apply(definition) => {
                let mut failure: Option<String> = None;
                for entity in &meshes {
                    let instance = factory.realize(&definition.properties, &mut materials, |path| {
                        asset_server.load(store.resolve(path))
                    });
                    match instance {
                        Ok(instance) => {
                            commands.entity(*entity).insert(MeshMaterial3d(instance));
                        }
                        Err(error) => {
                            failure = Some(error.to_string());
                            break;
                        }
                    }
                }

                match failure {
                    None => {
                        info!(
                            "Material '{}' applied to {} mesh(es) of '{}'",
                            definition.id,
                            meshes.len(),
                            component.as_str()
                        );
                        applied.insert(component, definition.id.clone());
                    }
                    Some(reason) => {
                        warn!(
                            "Material swap failed for '{}': {reason}",
                            component.as_str()
                        );
                        rpc_interface.send_notification(
                            "swap_failed",
                            serde_json::json!({
                                "component": component.as_str(),
                                "material": definition.id,
                                "reason": reason.clone(),
                            }),
                        );
                        swap_failed.write(SwapFailedEvent { component, reason });
                    }
                }
            }
            SwapAction::Reset => {
                let Some(base) = materials.get(&neutral.template).cloned() else {
                    continue;
                };
                for entity in &meshes {
                    commands
                        .entity(*entity)
                        .insert(MeshMaterial3d(materials.add(base.clone())));
                }
                applied.remove(component);
                info!(
                    "Component '{}' reset to the neutral material",
                    component.as_str()
                );
            }
        }
    }
}

/// Meshes for a category, preferring the component map and falling back
/// to reclassifying live mesh names when the map has gone stale.
fn resolve_meshes(
    component: ShoeComponent,
    component_map: &ComponentMap,
    named_meshes: &Query<(Entity, &Name), With<Mesh3d>>,
) -> Vec<Entity> {
    let from_map: Vec<Entity> = component_map
        .records(component)
        .iter()
        .map(|record| record.entity)
        .collect();
    if !from_map.is_empty() {
        return from_map;
    }

    named_meshes
        .iter()
        .filter(|(_, name)| classify_mesh_name(name.as_str()) == component)
        .map(|(entity, _)| entity)
        .collect()
}

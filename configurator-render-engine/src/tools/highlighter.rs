use crate::engine::scene::component_map::ComponentMap;
use bevy::prelude::*;
use constants::component::ShoeComponent;
use constants::render_settings::{HIGHLIGHT_INTENSITY, HOVER_TINT, SELECTED_TINT};
use std::collections::{HashMap, HashSet};

/// Current hover/selection categories driving the tint pass.
#[derive(Resource, Default)]
pub struct HighlightState {
    pub hovered: Option<ShoeComponent>,
    pub selected: Option<ShoeComponent>,
}

pub struct TintRecord {
    /// The tinted clone we put on the mesh.
    tinted: AssetId<StandardMaterial>,
    /// The material the mesh wore before tinting.
    original: Handle<StandardMaterial>,
}

/// Per-mesh tint bookkeeping so un-hovered meshes revert to exactly the
/// material the swapper gave them.
#[derive(Resource, Default)]
pub struct TintRecords {
    records: HashMap<Entity, TintRecord>,
}

impl TintRecords {
    fn drain(&mut self) -> Vec<(Entity, TintRecord)> {
        self.records.drain().collect()
    }

    fn insert(&mut self, entity: Entity, record: TintRecord) {
        self.records.insert(entity, record);
    }

    /// Forget everything without touching meshes. Used on model teardown
    /// when the recorded entities are gone anyway.
    pub fn forget_all(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Clone of the mesh's current material with the emissive channel tinted.
pub fn tinted_clone(base: &StandardMaterial, tint: Color, intensity: f32) -> StandardMaterial {
    let mut clone = base.clone();
    clone.emissive = tint.to_linear() * intensity;
    clone
}

/// Recompute highlight tints for the hovered and selected categories.
///
/// Every recompute first restores previously tinted meshes to their
/// pre-tint material, then tints the current targets: selected meshes get
/// the selection tint, hovered meshes not already selected get the hover
/// tint. The tint always clones whatever material is on the mesh right
/// now, so a swapped look survives un-hover. A mesh whose material the
/// swapper replaced since tinting just drops its stale record; the swap
/// result stays untouched.
pub fn apply_highlight_tints(
    mut commands: Commands,
    state: Res<HighlightState>,
    component_map: Res<ComponentMap>,
    mut tints: ResMut<TintRecords>,
    mesh_materials: Query<&MeshMaterial3d<StandardMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !state.is_changed() && !component_map.is_changed() {
        return;
    }

    // Restore pass.
    let mut restored: HashMap<Entity, Handle<StandardMaterial>> = HashMap::new();
    for (entity, record) in tints.drain() {
        let Ok(current) = mesh_materials.get(entity) else {
            continue;
        };
        if current.0.id() == record.tinted {
            commands
                .entity(entity)
                .insert(MeshMaterial3d(record.original.clone()));
            restored.insert(entity, record.original);
        }
    }

    // Apply pass: selected first, hovered fills in the rest.
    let mut plan: Vec<(Entity, Color)> = Vec::new();
    let mut planned: HashSet<Entity> = HashSet::new();

    if let Some(selected) = state.selected {
        if selected != ShoeComponent::Unknown {
            for record in component_map.records(selected) {
                if planned.insert(record.entity) {
                    plan.push((record.entity, SELECTED_TINT));
                }
            }
        }
    }
    if let Some(hovered) = state.hovered {
        if hovered != ShoeComponent::Unknown && state.selected != Some(hovered) {
            for record in component_map.records(hovered) {
                if planned.insert(record.entity) {
                    plan.push((record.entity, HOVER_TINT));
                }
            }
        }
    }

    for (entity, tint) in plan {
        // The restore pass may have rolled this mesh back within the same
        // run; commands have not applied yet, so prefer its original over
        // the still-tinted handle the query would report.
        let base_handle = restored.get(&entity).cloned().or_else(|| {
            mesh_materials
                .get(entity)
                .ok()
                .map(|material| material.0.clone())
        });
        let Some(base_handle) = base_handle else {
            continue;
        };
        let Some(base) = materials.get(&base_handle).cloned() else {
            continue;
        };

        let tinted = materials.add(tinted_clone(&base, tint, HIGHLIGHT_INTENSITY));
        tints.insert(
            entity,
            TintRecord {
                tinted: tinted.id(),
                original: base_handle,
            },
        );
        commands.entity(entity).insert(MeshMaterial3d(tinted));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::extractor::ComponentRecord;

    #[test]
    fn tinted_clone_sets_only_the_emissive_channel() {
        let base = StandardMaterial {
            base_color: Color::srgb(0.5, 0.1, 0.1),
            perceptual_roughness: 0.7,
            ..default()
        };

        let tinted = tinted_clone(&base, HOVER_TINT, HIGHLIGHT_INTENSITY);
        assert_eq!(tinted.base_color, base.base_color);
        assert_eq!(tinted.perceptual_roughness, base.perceptual_roughness);
        assert_eq!(tinted.emissive, HOVER_TINT.to_linear() * HIGHLIGHT_INTENSITY);
    }

    fn record(component: ShoeComponent, entity: Entity, name: &str) -> ComponentRecord {
        ComponentRecord {
            component,
            entity,
            name: name.to_string(),
            original_name: name.to_string(),
        }
    }

    fn build_app() -> (App, Entity, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(Assets::<StandardMaterial>::default());
        app.init_resource::<HighlightState>();
        app.init_resource::<TintRecords>();
        app.init_resource::<ComponentMap>();
        app.add_systems(Update, apply_highlight_tints);

        let (laces_material, sole_material) = {
            let mut materials = app
                .world_mut()
                .resource_mut::<Assets<StandardMaterial>>();
            (
                materials.add(StandardMaterial::default()),
                materials.add(StandardMaterial::default()),
            )
        };

        let laces = app
            .world_mut()
            .spawn((Name::new("lace_left"), MeshMaterial3d(laces_material)))
            .id();
        let sole = app
            .world_mut()
            .spawn((Name::new("sole"), MeshMaterial3d(sole_material)))
            .id();

        *app.world_mut().resource_mut::<ComponentMap>() = ComponentMap::from_records(vec![
            record(ShoeComponent::Laces, laces, "lace_left"),
            record(ShoeComponent::Sole, sole, "sole"),
        ]);

        (app, laces, sole)
    }

    fn material_of(app: &App, entity: Entity) -> Handle<StandardMaterial> {
        app.world()
            .get::<MeshMaterial3d<StandardMaterial>>(entity)
            .unwrap()
            .0
            .clone()
    }

    fn emissive_of(app: &App, entity: Entity) -> LinearRgba {
        let handle = material_of(app, entity);
        app.world()
            .resource::<Assets<StandardMaterial>>()
            .get(&handle)
            .unwrap()
            .emissive
    }

    #[test]
    fn hover_moving_between_categories_restores_before_tinting() {
        let (mut app, laces, sole) = build_app();
        let laces_original = material_of(&app, laces);
        app.update();

        app.world_mut().resource_mut::<HighlightState>().hovered =
            Some(ShoeComponent::Laces);
        app.update();

        assert_ne!(material_of(&app, laces), laces_original);
        assert_eq!(
            emissive_of(&app, laces),
            HOVER_TINT.to_linear() * HIGHLIGHT_INTENSITY
        );

        // The hover jumps laces → sole in one frame.
        app.world_mut().resource_mut::<HighlightState>().hovered =
            Some(ShoeComponent::Sole);
        app.update();

        // Laces revert to the exact pre-tint material, sole is now tinted.
        assert_eq!(material_of(&app, laces), laces_original);
        assert_eq!(
            emissive_of(&app, sole),
            HOVER_TINT.to_linear() * HIGHLIGHT_INTENSITY
        );
        assert_eq!(app.world().resource::<TintRecords>().len(), 1);
    }

    #[test]
    fn selected_meshes_take_the_selection_tint_over_hover() {
        let (mut app, laces, _) = build_app();
        app.update();

        {
            let mut state = app.world_mut().resource_mut::<HighlightState>();
            state.hovered = Some(ShoeComponent::Laces);
            state.selected = Some(ShoeComponent::Laces);
        }
        app.update();

        assert_eq!(
            emissive_of(&app, laces),
            SELECTED_TINT.to_linear() * HIGHLIGHT_INTENSITY
        );
    }

    #[test]
    fn swapped_meshes_are_not_clobbered_by_restore() {
        let (mut app, laces, _) = build_app();
        app.update();

        app.world_mut().resource_mut::<HighlightState>().hovered =
            Some(ShoeComponent::Laces);
        app.update();

        // A material swap lands while the mesh is tinted.
        let swapped = {
            let mut materials = app
                .world_mut()
                .resource_mut::<Assets<StandardMaterial>>();
            materials.add(StandardMaterial {
                base_color: Color::srgb(0.5, 0.1, 0.1),
                ..default()
            })
        };
        app.world_mut()
            .entity_mut(laces)
            .insert(MeshMaterial3d(swapped.clone()));

        app.world_mut().resource_mut::<HighlightState>().hovered = None;
        app.update();

        // The stale tint record is dropped, the swap result stays.
        assert_eq!(material_of(&app, laces), swapped);
        assert!(app.world().resource::<TintRecords>().is_empty());
    }
}

use crate::engine::error::ExtractionError;
use crate::engine::scene::classifier::classify_mesh_name;
use bevy::prelude::*;
use constants::component::ShoeComponent;

/// Name substituted for meshes whose glTF node carries no name.
pub const UNNAMED_MESH: &str = "unnamed";

/// One classified mesh from the spawned model scene. Created once per
/// extraction pass and immutable afterwards; records die with the scene.
#[derive(Debug, Clone)]
pub struct ComponentRecord {
    pub component: ShoeComponent,
    pub entity: Entity,
    pub name: String,
    pub original_name: String,
}

/// Walk the spawned scene below `root` depth-first and classify every
/// mesh node into a component record.
///
/// Child order is preserved, so repeated extraction of an unchanged scene
/// yields the same records in the same order. Read-only; the scene graph
/// is never touched. Fails as a whole (`MissingRoot`, `SceneNotSpawned`),
/// so callers get either every record or none.
pub fn extract_components(
    world: &World,
    root: Entity,
) -> Result<Vec<ComponentRecord>, ExtractionError> {
    if !world.entities().contains(root) {
        return Err(ExtractionError::MissingRoot);
    }

    if world.get::<Children>(root).is_none() {
        // The glTF scene spawns its node hierarchy under the root once the
        // asset is ready; until then there is nothing to classify.
        return Err(ExtractionError::SceneNotSpawned);
    }

    let mut records = Vec::new();
    collect_records(world, root, &mut records);
    Ok(records)
}

fn collect_records(world: &World, entity: Entity, records: &mut Vec<ComponentRecord>) {
    if world.get::<Mesh3d>(entity).is_some() {
        let original_name = world
            .get::<Name>(entity)
            .map(|name| name.as_str().to_string())
            .unwrap_or_else(|| UNNAMED_MESH.to_string());

        records.push(ComponentRecord {
            component: classify_mesh_name(&original_name),
            entity,
            name: original_name.clone(),
            original_name,
        });
    }

    if let Some(children) = world.get::<Children>(entity) {
        let children: &[Entity] = children;
        for &child in children {
            collect_records(world, child, records);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_mesh(world: &mut World, name: &str) -> Entity {
        world
            .spawn((Name::new(name.to_string()), Mesh3d(Handle::default())))
            .id()
    }

    fn spawn_test_scene(world: &mut World) -> Entity {
        let root = world.spawn(Name::new("scene_root")).id();
        let body = world.spawn(Name::new("body_group")).id();
        let upper = spawn_mesh(world, "Upper_Suede_L");
        let lace_left = spawn_mesh(world, "lace_left");
        let lace_right = spawn_mesh(world, "lace_right");
        let mystery = spawn_mesh(world, "Cube.004");

        world.entity_mut(body).add_children(&[upper, mystery]);
        world
            .entity_mut(root)
            .add_children(&[body, lace_left, lace_right]);
        root
    }

    #[test]
    fn extracts_every_mesh_with_its_classification() {
        let mut world = World::new();
        let root = spawn_test_scene(&mut world);

        let records = extract_components(&world, root).unwrap();
        let summary: Vec<(ShoeComponent, &str)> = records
            .iter()
            .map(|record| (record.component, record.name.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (ShoeComponent::Upper, "Upper_Suede_L"),
                (ShoeComponent::Unknown, "Cube.004"),
                (ShoeComponent::Laces, "lace_left"),
                (ShoeComponent::Laces, "lace_right"),
            ]
        );
    }

    #[test]
    fn extraction_is_idempotent_on_a_static_scene() {
        let mut world = World::new();
        let root = spawn_test_scene(&mut world);

        let first = extract_components(&world, root).unwrap();
        let second = extract_components(&world, root).unwrap();

        let pairs = |records: &[ComponentRecord]| {
            records
                .iter()
                .map(|record| (record.component, record.name.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(pairs(&first), pairs(&second));
    }

    #[test]
    fn nameless_meshes_get_the_unnamed_placeholder() {
        let mut world = World::new();
        let root = world.spawn_empty().id();
        let mesh = world.spawn(Mesh3d(Handle::default())).id();
        world.entity_mut(root).add_children(&[mesh]);

        let records = extract_components(&world, root).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, UNNAMED_MESH);
        assert_eq!(records[0].component, ShoeComponent::Unknown);
    }

    #[test]
    fn missing_root_is_an_error() {
        let mut world = World::new();
        let root = world.spawn_empty().id();
        world.despawn(root);

        assert_eq!(
            extract_components(&world, root).unwrap_err(),
            ExtractionError::MissingRoot
        );
    }

    #[test]
    fn unspawned_scene_is_an_error_not_an_empty_result() {
        let mut world = World::new();
        let root = world.spawn(Name::new("pending_model")).id();

        assert_eq!(
            extract_components(&world, root).unwrap_err(),
            ExtractionError::SceneNotSpawned
        );
    }
}

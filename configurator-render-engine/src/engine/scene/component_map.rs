use crate::engine::error::ExtractionError;
use crate::engine::loading::model_loader::CurrentModel;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::extractor::{ComponentRecord, extract_components};
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::component::ShoeComponent;

/// Component records grouped by category, in first-seen category order.
///
/// This is a cache over the live scene, not a source of truth: it is
/// rebuilt wholesale on every model load and on demand (RPC
/// `refresh_components`), never partially mutated. Consumers that find it
/// stale fall back to rescanning the scene by name.
#[derive(Resource, Default)]
pub struct ComponentMap {
    groups: Vec<ComponentGroup>,
}

pub struct ComponentGroup {
    pub component: ShoeComponent,
    pub records: Vec<ComponentRecord>,
}

impl ComponentMap {
    /// Group records by category. Duplicate-category meshes all stay (a
    /// shoe legitimately has e.g. two lace meshes); record order within a
    /// category follows extraction order.
    pub fn from_records(records: Vec<ComponentRecord>) -> Self {
        let mut groups: Vec<ComponentGroup> = Vec::new();

        for record in records {
            match groups
                .iter_mut()
                .find(|group| group.component == record.component)
            {
                Some(group) => group.records.push(record),
                None => groups.push(ComponentGroup {
                    component: record.component,
                    records: vec![record],
                }),
            }
        }

        Self { groups }
    }

    pub fn records(&self, component: ShoeComponent) -> &[ComponentRecord] {
        self.groups
            .iter()
            .find(|group| group.component == component)
            .map(|group| group.records.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentGroup> {
        self.groups.iter()
    }

    /// Total record count across all categories.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Frontend-facing summary for the `component_map` notification.
    pub fn summary_json(&self) -> serde_json::Value {
        serde_json::json!({
            "total_meshes": self.len(),
            "components": self
                .groups
                .iter()
                .map(|group| {
                    serde_json::json!({
                        "component": group.component.as_str(),
                        "display_name": group.component.display_name(),
                        "meshes": group
                            .records
                            .iter()
                            .map(|record| record.name.clone())
                            .collect::<Vec<_>>(),
                    })
                })
                .collect::<Vec<_>>(),
        })
    }
}

/// Event requesting a wholesale component map rebuild from the live scene.
#[derive(Event)]
pub struct RefreshComponentsEvent;

pub fn handle_refresh_requests(
    mut events: EventReader<RefreshComponentsEvent>,
    mut progress: ResMut<LoadingProgress>,
) {
    if !events.is_empty() {
        events.clear();
        progress.components_extracted = false;
    }
}

/// Extract and group components once the current model's scene instance
/// has spawned. Exclusive: the traversal reads the whole scene graph.
pub fn extract_components_when_ready(world: &mut World) {
    if world.resource::<LoadingProgress>().components_extracted {
        return;
    }

    let (root, scene) = {
        let current = world.resource::<CurrentModel>();
        (current.root, current.scene.clone())
    };
    let Some(root) = root else {
        return;
    };

    // A failed model fetch leaves the viewport empty rather than showing a
    // broken partial render.
    if let Some(scene) = &scene {
        let load_state = world.resource::<AssetServer>().get_load_state(scene);
        if matches!(load_state, Some(LoadState::Failed(_))) {
            error!("Model scene failed to load, keeping the viewport empty");
            world.resource_mut::<ComponentMap>().clear();
            world.resource_mut::<LoadingProgress>().components_extracted = true;
            world.resource_mut::<WebRpcInterface>().send_notification(
                "model_loaded",
                serde_json::json!({ "success": false }),
            );
            return;
        }
    }

    match extract_components(world, root) {
        Ok(records) => {
            log_detection_summary(&records);

            let map = ComponentMap::from_records(records);
            let summary = map.summary_json();
            *world.resource_mut::<ComponentMap>() = map;
            world.resource_mut::<LoadingProgress>().components_extracted = true;

            let mut rpc = world.resource_mut::<WebRpcInterface>();
            rpc.send_notification("model_loaded", serde_json::json!({ "success": true }));
            rpc.send_notification("component_map", summary);
        }
        Err(ExtractionError::SceneNotSpawned) => {
            // Still instantiating; try again next frame.
        }
        Err(error) => {
            warn!("Component extraction failed: {error}");
            world.resource_mut::<ComponentMap>().clear();
            world.resource_mut::<LoadingProgress>().components_extracted = true;
            world.resource_mut::<WebRpcInterface>().send_notification(
                "model_loaded",
                serde_json::json!({ "success": false, "reason": error.to_string() }),
            );
        }
    }
}

fn log_detection_summary(records: &[ComponentRecord]) {
    println!("=== COMPONENT DETECTION SUMMARY ===");
    println!("Total meshes found: {}", records.len());
    for record in records {
        println!(
            "  \"{}\" → {}",
            record.original_name,
            record.component.as_str()
        );
    }

    let unknown_count = records
        .iter()
        .filter(|record| record.component == ShoeComponent::Unknown)
        .count();
    if unknown_count > 0 {
        println!(
            "  {unknown_count} mesh(es) unmatched, extend the pattern table if they should be selectable"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(component: ShoeComponent, name: &str) -> ComponentRecord {
        ComponentRecord {
            component,
            entity: Entity::PLACEHOLDER,
            name: name.to_string(),
            original_name: name.to_string(),
        }
    }

    #[test]
    fn grouping_never_loses_a_record() {
        let records = vec![
            record(ShoeComponent::Laces, "lace_left"),
            record(ShoeComponent::Upper, "upper"),
            record(ShoeComponent::Laces, "lace_right"),
            record(ShoeComponent::Unknown, "Cube.004"),
        ];
        let total = records.len();

        let map = ComponentMap::from_records(records);
        assert_eq!(map.len(), total);
        assert_eq!(map.records(ShoeComponent::Laces).len(), 2);
        assert_eq!(map.records(ShoeComponent::Upper).len(), 1);
        assert_eq!(map.records(ShoeComponent::Unknown).len(), 1);
    }

    #[test]
    fn first_seen_order_is_preserved() {
        let map = ComponentMap::from_records(vec![
            record(ShoeComponent::Laces, "lace_left"),
            record(ShoeComponent::Upper, "upper"),
            record(ShoeComponent::Laces, "lace_right"),
        ]);

        let categories: Vec<ShoeComponent> =
            map.iter().map(|group| group.component).collect();
        assert_eq!(categories, vec![ShoeComponent::Laces, ShoeComponent::Upper]);

        let lace_names: Vec<&str> = map
            .records(ShoeComponent::Laces)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(lace_names, vec!["lace_left", "lace_right"]);
    }

    #[test]
    fn empty_input_builds_an_empty_map() {
        let map = ComponentMap::from_records(Vec::new());
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert!(map.records(ShoeComponent::Sole).is_empty());
    }
}

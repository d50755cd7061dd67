use crate::engine::camera::OrbitCamera;
use crate::engine::scene::component_map::ComponentMap;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::highlighter::HighlightState;
use crate::tools::ray::ray_hits_obb;
use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use bevy::window::PrimaryWindow;
use constants::component::ShoeComponent;
use std::collections::HashMap;

/// Pointer travel (in pixels) below which a released left button counts
/// as a click instead of an orbit drag.
const CLICK_DRAG_TOLERANCE: f32 = 5.0;

/// Reverse lookup from pickable mesh entity to its component category.
/// Unknown-category meshes never enter the set.
#[derive(Resource, Default)]
pub struct PickTargets {
    by_entity: HashMap<Entity, ShoeComponent>,
}

impl PickTargets {
    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, ShoeComponent)> + '_ {
        self.by_entity.iter().map(|(entity, component)| (*entity, *component))
    }
}

/// Hover state machine: `None` is idle, `Some(category)` is hovering.
/// Transitions between two categories never pass through idle.
#[derive(Resource, Default)]
pub struct HoverTracker {
    pub current: Option<ShoeComponent>,
}

#[derive(Event)]
pub struct HoverChangedEvent {
    pub component: Option<ShoeComponent>,
}

#[derive(Event)]
pub struct SelectionChangedEvent {
    pub component: Option<ShoeComponent>,
}

/// Rebuild the entity → category lookup whenever the component map is
/// replaced.
pub fn rebuild_pick_targets(component_map: Res<ComponentMap>, mut targets: ResMut<PickTargets>) {
    if !component_map.is_changed() {
        return;
    }

    targets.by_entity.clear();
    for group in component_map.iter() {
        if group.component == ShoeComponent::Unknown {
            continue;
        }
        for record in &group.records {
            targets.by_entity.insert(record.entity, group.component);
        }
    }
}

/// One transition of the hover state machine. `None` means no change (no
/// event); `Some(next)` is emitted exactly once per change, including the
/// direct hovering → hovering jump between two categories in one frame.
pub fn hover_transition(
    previous: Option<ShoeComponent>,
    hit: Option<ShoeComponent>,
) -> Option<Option<ShoeComponent>> {
    if previous == hit { None } else { Some(hit) }
}

/// Nearest positive ray hit over the candidate volumes.
pub fn nearest_hit(
    origin: Vec3,
    dir: Vec3,
    candidates: impl Iterator<Item = (ShoeComponent, GlobalTransform, Aabb)>,
) -> Option<ShoeComponent> {
    let mut best: Option<(ShoeComponent, f32)> = None;
    for (component, xf, aabb) in candidates {
        if let Some(t) = ray_hits_obb(origin, dir, &xf, &aabb) {
            if t > 0.0 && best.map_or(true, |(_, best_t)| t < best_t) {
                best = Some((component, t));
            }
        }
    }
    best.map(|(component, _)| component)
}

fn cursor_ray(
    windows: &Query<&Window, With<PrimaryWindow>>,
    cameras: &Query<(&GlobalTransform, &Camera), With<Camera3d>>,
) -> Option<(Vec3, Vec3)> {
    let window = windows.single().ok()?;
    let cursor_pos = window.cursor_position()?;
    let (cam_xf, camera) = cameras.single().ok()?;
    let ray = camera.viewport_to_world(cam_xf, cursor_pos).ok()?;
    Some((ray.origin, ray.direction.as_vec3()))
}

fn pick_under_cursor(
    windows: &Query<&Window, With<PrimaryWindow>>,
    cameras: &Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    targets: &PickTargets,
    volumes: &Query<(&GlobalTransform, &Aabb)>,
) -> Option<ShoeComponent> {
    if targets.is_empty() {
        return None;
    }
    let (origin, dir) = cursor_ray(windows, cameras)?;
    nearest_hit(
        origin,
        dir,
        targets.iter().filter_map(|(entity, component)| {
            volumes
                .get(entity)
                .ok()
                .map(|(xf, aabb)| (component, *xf, *aabb))
        }),
    )
}

/// Cast the pointer ray against all pickable meshes every frame and emit
/// hover transitions.
pub fn hover_picking(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    targets: Res<PickTargets>,
    volumes: Query<(&GlobalTransform, &Aabb)>,
    mut tracker: ResMut<HoverTracker>,
    mut highlight: ResMut<HighlightState>,
    mut hover_events: EventWriter<HoverChangedEvent>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let hit = pick_under_cursor(&windows, &cameras, &targets, &volumes);

    if let Some(next) = hover_transition(tracker.current, hit) {
        tracker.current = next;
        highlight.hovered = next;
        hover_events.write(HoverChangedEvent { component: next });
        rpc_interface.send_notification(
            "hover_changed",
            serde_json::json!({
                "component": next.map(|component| component.as_str()),
            }),
        );
    }
}

/// Run the same ray test on click release and emit a selection for the
/// hit category. Escape clears the selection.
pub fn click_selection(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    orbit: Res<OrbitCamera>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    targets: Res<PickTargets>,
    volumes: Query<(&GlobalTransform, &Aabb)>,
    mut highlight: ResMut<HighlightState>,
    mut selection_events: EventWriter<SelectionChangedEvent>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if keyboard.just_pressed(KeyCode::Escape) && highlight.selected.is_some() {
        highlight.selected = None;
        selection_events.write(SelectionChangedEvent { component: None });
        rpc_interface.send_notification(
            "selection_changed",
            serde_json::json!({ "component": serde_json::Value::Null }),
        );
        return;
    }

    if !mouse_button.just_released(MouseButton::Left) {
        return;
    }
    if orbit.drag_distance > CLICK_DRAG_TOLERANCE {
        return;
    }

    let Some(component) = pick_under_cursor(&windows, &cameras, &targets, &volumes) else {
        return;
    };
    if highlight.selected == Some(component) {
        return;
    }

    highlight.selected = Some(component);
    selection_events.write(SelectionChangedEvent {
        component: Some(component),
    });
    rpc_interface.send_notification(
        "selection_changed",
        serde_json::json!({ "component": component.as_str() }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec3A;

    #[test]
    fn idle_to_hover_emits_one_transition() {
        assert_eq!(
            hover_transition(None, Some(ShoeComponent::Laces)),
            Some(Some(ShoeComponent::Laces))
        );
    }

    #[test]
    fn unchanged_hover_emits_nothing() {
        assert_eq!(
            hover_transition(Some(ShoeComponent::Laces), Some(ShoeComponent::Laces)),
            None
        );
        assert_eq!(hover_transition(None, None), None);
    }

    #[test]
    fn hover_jumps_between_categories_without_passing_idle() {
        // laces → sole in one frame: exactly one transition, to sole.
        assert_eq!(
            hover_transition(Some(ShoeComponent::Laces), Some(ShoeComponent::Sole)),
            Some(Some(ShoeComponent::Sole))
        );
    }

    #[test]
    fn hover_to_idle_clears() {
        assert_eq!(
            hover_transition(Some(ShoeComponent::Sole), None),
            Some(None)
        );
    }

    fn volume_at(z: f32) -> (GlobalTransform, Aabb) {
        (
            GlobalTransform::from(Transform::from_xyz(0.0, 0.0, z)),
            Aabb {
                center: Vec3A::ZERO,
                half_extents: Vec3A::splat(0.5),
            },
        )
    }

    #[test]
    fn nearest_hit_prefers_the_closer_mesh() {
        let (laces_xf, laces_aabb) = volume_at(-5.0);
        let (sole_xf, sole_aabb) = volume_at(-3.0);
        let candidates = vec![
            (ShoeComponent::Laces, laces_xf, laces_aabb),
            (ShoeComponent::Sole, sole_xf, sole_aabb),
        ];

        let hit = nearest_hit(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            candidates.into_iter(),
        );
        assert_eq!(hit, Some(ShoeComponent::Sole));
    }

    #[test]
    fn nearest_hit_misses_off_axis() {
        let (xf, aabb) = volume_at(-3.0);
        let hit = nearest_hit(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
            vec![(ShoeComponent::Sole, xf, aabb)].into_iter(),
        );
        assert_eq!(hit, None);
    }
}

//! Pointer interaction tools for the viewport.
//!
//! Every frame the picker casts the pointer ray against the pickable
//! component meshes and drives the hover state machine; clicks run the
//! same test once for selection. The highlighter turns the resulting
//! state into emissive tints, restoring each mesh's prior material before
//! retinting so it never fights the material swapper.

/// Emissive tinting of hovered and selected component meshes.
pub mod highlighter;

/// Pointer-ray hover and click-selection picking.
pub mod picker;

/// Ray intersection utilities shared by the picking systems.
///
/// Slab method raycast against mesh AABBs in mesh-local space.
pub mod ray;

use crate::engine::core::app_state::AppState;
use bevy::prelude::*;

use highlighter::{HighlightState, TintRecords, apply_highlight_tints};
use picker::{
    HoverChangedEvent, HoverTracker, PickTargets, SelectionChangedEvent, click_selection,
    hover_picking, rebuild_pick_targets,
};

// Registers picking and highlighting resources and the per-frame systems.
pub struct InteractionToolsPlugin;

impl Plugin for InteractionToolsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PickTargets>()
            .init_resource::<HoverTracker>()
            .init_resource::<HighlightState>()
            .init_resource::<TintRecords>()
            .add_event::<HoverChangedEvent>()
            .add_event::<SelectionChangedEvent>()
            .add_systems(
                Update,
                (
                    rebuild_pick_targets,
                    hover_picking,
                    click_selection,
                    apply_highlight_tints,
                )
                    .chain()
                    .run_if(in_state(AppState::Running)),
            );
    }
}

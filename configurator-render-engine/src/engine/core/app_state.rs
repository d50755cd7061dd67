use crate::engine::loading::progress::LoadingProgress;
use bevy::prelude::*;

/// Application lifecycle: catalogs load first, then the initial model is
/// requested, then the configurator runs. Model switches after startup
/// happen inside `Running` through per-scene flags, not state changes.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    CatalogsReady,
    Running,
}

#[derive(Component)]
pub struct FpsText;

// Transition once all three catalogs have parsed
pub fn transition_to_catalogs_ready(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.catalogs_loaded {
        println!("→ Transitioning to CatalogsReady state");
        next_state.set(AppState::CatalogsReady);
    }
}

// Final transition once the restored or default model has been requested
pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.initial_model_requested {
        println!("→ All systems ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

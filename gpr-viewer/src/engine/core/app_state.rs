use bevy::prelude::*;

/// Top-level lifecycle. Dataset switches happen inside `Running` behind the
/// load guard; the app never returns to `Loading`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    /// Waiting for the dataset manifest.
    #[default]
    Loading,
    Running,
}

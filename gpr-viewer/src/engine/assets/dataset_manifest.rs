use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::core::viewer_state::ClipMode;
use crate::engine::filtering::intensity::IntensityScheme;

/// One selectable point cloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub name: String,
    /// Asset path of the `.ply` file, relative to the asset root.
    pub path: String,
    #[serde(default)]
    pub scheme: IntensityScheme,
}

/// Viewer behaviour switches shared by every dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewerOptions {
    #[serde(default)]
    pub clip_mode: ClipMode,
    #[serde(default = "default_enabled")]
    pub dataset_picker: bool,
    #[serde(default = "default_enabled")]
    pub touch_input: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            clip_mode: ClipMode::default(),
            dataset_picker: true,
            touch_input: true,
        }
    }
}

/// Fixed dataset catalogue and viewer options, loaded from `datasets.json`.
#[derive(Resource, Asset, TypePath, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub datasets: Vec<DatasetEntry>,
    #[serde(default)]
    pub default_dataset: Option<String>,
    #[serde(default)]
    pub viewer: ViewerOptions,
}

impl DatasetManifest {
    pub fn find(&self, name: &str) -> Option<&DatasetEntry> {
        self.datasets.iter().find(|entry| entry.name == name)
    }

    /// Dataset shown at startup: the configured default, else the first entry.
    pub fn initial_dataset(&self) -> Option<&DatasetEntry> {
        self.default_dataset
            .as_deref()
            .and_then(|name| self.find(name))
            .or_else(|| self.datasets.first())
    }

    /// Entry after `current` in catalogue order, wrapping around.
    pub fn next_after(&self, current: Option<&str>) -> Option<&DatasetEntry> {
        let position = current.and_then(|name| {
            self.datasets
                .iter()
                .position(|entry| entry.name == name)
        });

        match position {
            Some(index) => self.datasets.get((index + 1) % self.datasets.len()),
            None => self.datasets.first(),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.datasets.iter().map(|entry| entry.name.as_str()).collect()
    }
}

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::assets::bounds::PointCloudBounds;
use crate::engine::filtering::clip_planes::{ClipAxis, ClipPlaneSet};
use crate::engine::filtering::intensity::{IntensityScheme, intensity_of};
use crate::engine::filtering::range_filter::{RangeError, RangeFilter};
use crate::tools::range_slider::{DualHandleSlider, SliderEvent, SliderOutcome};

/// Which clip planes the panel may move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipMode {
    /// Only the depth plane is adjustable.
    Single,
    #[default]
    Triple,
}

impl ClipMode {
    pub fn allows(self, axis: ClipAxis) -> bool {
        match self {
            Self::Single => axis == ClipAxis::Z,
            Self::Triple => true,
        }
    }
}

/// Interactive state of the viewer: intensity window, slider handles and
/// clip planes for the active dataset. Mutated by the slider widget, native
/// shortcuts and RPC; read by the point material every frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct ViewerState {
    pub range: RangeFilter,
    pub slider: DualHandleSlider,
    pub clip_planes: ClipPlaneSet,
    pub clip_mode: ClipMode,
    pub scheme: IntensityScheme,
    pub bounds: Option<PointCloudBounds>,
    pub dataset: Option<String>,
}

impl ViewerState {
    /// Replace all per-dataset state for a freshly loaded cloud.
    pub fn reset_for_dataset(
        &mut self,
        name: &str,
        bounds: PointCloudBounds,
        scheme: IntensityScheme,
    ) {
        self.dataset = Some(name.to_string());
        self.bounds = Some(bounds);
        self.scheme = scheme;
        self.reset_filters();
    }

    /// Forget the active dataset, e.g. after a failed load.
    pub fn clear_dataset(&mut self) {
        self.dataset = None;
        self.bounds = None;
        self.reset_filters();
    }

    /// Full intensity window and unclipped planes for the current bounds.
    pub fn reset_filters(&mut self) {
        self.range = RangeFilter::FULL;
        self.slider.reset();
        self.clip_planes = ClipPlaneSet::from_bounds(&self.bounds.unwrap_or_default());
    }

    /// Feed a pointer event to the slider; the window follows accepted moves.
    pub fn apply_slider_event(&mut self, event: SliderEvent) -> bool {
        match self.slider.advance(event) {
            SliderOutcome::Moved { lower, upper } => {
                match RangeFilter::from_percentages(lower, upper) {
                    Ok(range) => {
                        self.range = range;
                        true
                    }
                    Err(_) => false,
                }
            }
            SliderOutcome::Unchanged => false,
        }
    }

    /// Set the window directly; the handles follow.
    pub fn set_intensity_range(&mut self, low: f32, high: f32) -> Result<RangeFilter, RangeError> {
        let range = RangeFilter::new(low, high)?;
        self.range = range;
        self.slider.sync_to(range.low(), range.high());
        Ok(range)
    }

    /// Move a clip plane. `None` when the clip mode locks that axis.
    pub fn set_clip_offset(&mut self, axis: ClipAxis, offset: f32) -> Option<f32> {
        self.clip_mode
            .allows(axis)
            .then(|| self.clip_planes.set_offset(axis, offset))
    }

    pub fn set_clip_mirrored(&mut self, axis: ClipAxis, mirrored: bool) -> bool {
        let allowed = self.clip_mode.allows(axis);
        if allowed {
            self.clip_planes.set_mirrored(axis, mirrored);
        }
        allowed
    }

    pub fn set_clip_helper(&mut self, axis: ClipAxis, visible: bool) {
        self.clip_planes.set_helper_visible(axis, visible);
    }

    /// Draw-time visibility of a single point.
    pub fn point_visible(&self, position: Vec3, colour: [f32; 3]) -> bool {
        self.range.contains(intensity_of(colour, self.scheme)) && self.clip_planes.keeps(position)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "dataset": self.dataset,
            "scheme": self.scheme.as_str(),
            "clip_mode": self.clip_mode,
            "intensity_range": {
                "low": self.range.low(),
                "high": self.range.high(),
                "full": self.range.is_full(),
            },
            "slider": {
                "lower": self.slider.lower(),
                "upper": self.slider.upper(),
            },
            "clip_planes": self.clip_planes.to_json(),
            "bounds": self.bounds.map(|bounds| bounds.to_json()),
        })
    }
}

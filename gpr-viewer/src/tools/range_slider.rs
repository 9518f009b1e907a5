//! Dual-handle slider state machine driving the intensity window.
//!
//! Pure state and transitions only; the Bevy widget lives in `slider_widget`.

use constants::render_settings::INTENSITY_EPSILON;

/// Smallest handle separation, in percent, used when syncing a collapsed window.
pub const MIN_HANDLE_GAP: f32 = INTENSITY_EPSILON * 100.0;

/// Which handle a pointer interaction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderHandle {
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SliderPhase {
    #[default]
    Idle,
    DraggingLower,
    DraggingUpper,
}

/// Horizontal extent of the slider track, in the same units as pointer x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackBounds {
    pub left: f32,
    pub width: f32,
}

impl TrackBounds {
    /// Pointer x as a percentage along the track, clamped to [0, 100].
    pub fn percentage(&self, x: f32) -> Option<f32> {
        if self.width.is_nan() || self.width <= 0.0 || !x.is_finite() {
            return None;
        }
        Some(((x - self.left) / self.width * 100.0).clamp(0.0, 100.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliderEvent {
    /// Press on the widget; `None` when no handle was hit.
    PointerDown(Option<SliderHandle>),
    PointerMove { x: f32, track: TrackBounds },
    PointerUp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliderOutcome {
    Unchanged,
    /// A handle moved; carries both handle positions in percent.
    Moved { lower: f32, upper: f32 },
}

/// Shaded region of the track outside the selected window, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRegion {
    pub left: f32,
    pub width: f32,
}

/// Handle positions in percent. `lower < upper` holds after every transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualHandleSlider {
    phase: SliderPhase,
    lower: f32,
    upper: f32,
}

impl Default for DualHandleSlider {
    fn default() -> Self {
        Self {
            phase: SliderPhase::Idle,
            lower: 0.0,
            upper: 100.0,
        }
    }
}

/// Advance the slider by one input event.
pub fn advance_slider(
    slider: DualHandleSlider,
    event: SliderEvent,
) -> (DualHandleSlider, SliderOutcome) {
    let mut next = slider;

    match event {
        SliderEvent::PointerDown(Some(handle)) if slider.phase == SliderPhase::Idle => {
            next.phase = match handle {
                SliderHandle::Lower => SliderPhase::DraggingLower,
                SliderHandle::Upper => SliderPhase::DraggingUpper,
            };
            (next, SliderOutcome::Unchanged)
        }
        SliderEvent::PointerDown(_) => (next, SliderOutcome::Unchanged),
        SliderEvent::PointerMove { x, track } => {
            let Some(position) = track.percentage(x) else {
                return (next, SliderOutcome::Unchanged);
            };

            let accepted = match slider.phase {
                SliderPhase::Idle => false,
                SliderPhase::DraggingLower if position < slider.upper => {
                    next.lower = position;
                    true
                }
                SliderPhase::DraggingUpper if position > slider.lower => {
                    next.upper = position;
                    true
                }
                // Move would cross the other handle; ignored.
                _ => false,
            };

            if accepted && next != slider {
                let (lower, upper) = (next.lower, next.upper);
                (next, SliderOutcome::Moved { lower, upper })
            } else {
                (next, SliderOutcome::Unchanged)
            }
        }
        SliderEvent::PointerUp => {
            next.phase = SliderPhase::Idle;
            (next, SliderOutcome::Unchanged)
        }
    }
}

impl DualHandleSlider {
    pub fn advance(&mut self, event: SliderEvent) -> SliderOutcome {
        let (next, outcome) = advance_slider(*self, event);
        *self = next;
        outcome
    }

    pub fn phase(&self) -> SliderPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase != SliderPhase::Idle
    }

    pub fn lower(&self) -> f32 {
        self.lower
    }

    pub fn upper(&self) -> f32 {
        self.upper
    }

    /// Regions left of the lower handle and right of the upper handle.
    pub fn overlays(&self) -> (OverlayRegion, OverlayRegion) {
        (
            OverlayRegion {
                left: 0.0,
                width: self.lower,
            },
            OverlayRegion {
                left: self.upper,
                width: 100.0 - self.upper,
            },
        )
    }

    /// Place both handles from a normalised window set elsewhere (RPC).
    /// A collapsed window parts the handles by `MIN_HANDLE_GAP` so ordering holds.
    pub fn sync_to(&mut self, low: f32, high: f32) {
        let lower = (low * 100.0).clamp(0.0, 100.0);
        let upper = (high * 100.0).clamp(0.0, 100.0);
        if lower < upper {
            self.lower = lower;
            self.upper = upper;
        } else if lower + MIN_HANDLE_GAP <= 100.0 {
            self.lower = lower;
            self.upper = lower + MIN_HANDLE_GAP;
        } else {
            self.lower = 100.0 - MIN_HANDLE_GAP;
            self.upper = 100.0;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

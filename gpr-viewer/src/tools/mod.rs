//! Interactive input tools for the intensity window.
//!
//! The slider is split in two: a pure state machine that owns handle
//! ordering, and a Bevy UI widget that feeds it pointer and touch events.
//!
//! ## Slider Event Flow
//!
//! ```text
//! Mouse / first touch
//!   └─> slider_pointer_input()
//!       └─> ViewerState::apply_slider_event()
//!           ├─> advance_slider()          (reject crossing moves)
//!           ├─> RangeFilter update        (on accepted moves)
//!           └─> intensity_range_changed   (RPC notification)
//! ```
//!
//! ## Cross-Platform Considerations
//!
//! Touch input follows the manifest's `touch_input` switch. The panel can
//! also set the window over RPC, in which case the handles follow it.

/// Dual-handle slider state machine with strict handle ordering.
pub mod range_slider;

/// Track, handles and shaded overlays built with `bevy_ui`.
pub mod slider_widget;

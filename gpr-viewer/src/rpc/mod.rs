//! JSON-RPC 2.0 bridge between the viewer and its parameter panel.
//!
//! On wasm the viewer runs inside an iframe; the panel in the parent window
//! drives filtering and dataset selection over `postMessage`, and the viewer
//! pushes load progress and statistics back as notifications. Native builds
//! keep the same queues so systems never branch on the target.
//!
//! ```text
//! Panel (parent window)                      Viewer (iframe)
//!   │ set_intensity_range {low, high} ──────> │ ViewerState::set_intensity_range
//!   │ <──────────────── {success, low, high}  │
//!   │ select_dataset {name} ────────────────> │ DatasetLoader::begin
//!   │ <───────── dataset_loading / dataset_loaded / dataset_load_failed
//! ```
//!
//! A message without an `id` is a notification: it still acts, but gets no
//! reply.
//!
//! ## Requests
//!
//! ```typescript
//! frame.contentWindow.postMessage({
//!   jsonrpc: "2.0",
//!   method: "set_clip_plane",
//!   params: { axis: "z", offset: -0.4, mirrored: true },
//!   id: 7
//! }, "*");
//! ```
//!
//! - `set_intensity_range` `{low, high}`: window in [0, 1]; `low > high` is rejected
//! - `set_clip_plane` `{axis, offset?, mirrored?, show_helper?}`: offsets clamp to the plane range
//! - `get_datasets`: catalogue, active dataset and loading status
//! - `select_dataset` `{name}`: start a load; refused while another is in flight
//!   or when the manifest disables the dataset picker
//! - `get_viewer_state`: window, slider, planes, bounds
//! - `get_fps`: current frame rate
//!
//! ## Notifications from the viewer
//!
//! `datasets_available`, `dataset_loading`, `dataset_loaded`,
//! `dataset_load_failed`, `intensity_range_changed`, `visible_points`,
//! `fps_update`.
//!
//! ## Error codes
//!
//! - `-32601`: unknown method
//! - `-32602`: invalid params, unknown dataset, inverted window or picker disabled
//! - `-32603`: dataset manifest not loaded yet
//! - `-32000`: dataset load already in flight

/// Message types, the request dispatcher and the wasm `message` listener.
pub mod web_rpc;

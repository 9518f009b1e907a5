use bevy::diagnostic::DiagnosticsStore;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::assets::dataset_manifest::DatasetManifest;
use crate::engine::core::viewer_state::ViewerState;
use crate::engine::filtering::clip_planes::ClipAxis;
use crate::engine::loading::dataset_loader::{DatasetLoader, LoadRequestError};
use crate::engine::systems::fps_tracking::current_fps;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the panel and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the frontend without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the frontend.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(e) = window
                .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
            }
        }
        None => error!("Window object not available"),
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the frontend.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// World access needed by the RPC method handlers.
#[derive(SystemParam)]
pub struct RpcContext<'w> {
    viewer_state: ResMut<'w, ViewerState>,
    loader: ResMut<'w, DatasetLoader>,
    manifest: Option<Res<'w, DatasetManifest>>,
    diagnostics: Res<'w, DiagnosticsStore>,
}

/// Plain borrows of the RPC context, so handlers run without an ECS world.
struct RpcTargets<'a> {
    viewer_state: &'a mut ViewerState,
    loader: &'a mut DatasetLoader,
    manifest: Option<&'a DatasetManifest>,
    fps: f32,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut context: RpcContext,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                let mut targets = RpcTargets {
                    viewer_state: &mut context.viewer_state,
                    loader: &mut context.loader,
                    manifest: context.manifest.as_deref(),
                    fps: current_fps(&context.diagnostics),
                };

                if let Some(response) =
                    handle_rpc_request(&request, &mut targets, &mut rpc_interface)
                {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Dropping malformed RPC message: {}", parse_error);
            }
        }
    }
}

/// Handle individual RPC request and generate response based on method.
fn handle_rpc_request(
    request: &RpcRequest,
    targets: &mut RpcTargets,
    rpc_interface: &mut WebRpcInterface,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "set_clip_plane" => handle_set_clip_plane(&request.params, targets),
        "set_intensity_range" => {
            handle_set_intensity_range(&request.params, targets, rpc_interface)
        }
        "select_dataset" => handle_select_dataset(&request.params, targets),
        "get_datasets" => handle_get_datasets(targets),
        "get_viewer_state" => Ok(targets.viewer_state.to_json()),
        "get_fps" => Ok(serde_json::json!({ "fps": targets.fps })),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError::method_not_found(&request.method))
        }
    };

    // Only generate responses for requests with IDs (notifications have no ID).
    let id = request.id.clone()?;

    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Apply any subset of offset, mirror and helper to one plane.
fn handle_set_clip_plane(
    params: &serde_json::Value,
    targets: &mut RpcTargets,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct ClipPlaneParams {
        axis: String,
        offset: Option<f32>,
        mirrored: Option<bool>,
        show_helper: Option<bool>,
    }

    let clip_params = serde_json::from_value::<ClipPlaneParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'axis' parameter"))?;

    let axis = ClipAxis::from_string(&clip_params.axis)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown axis: {}", clip_params.axis)))?;

    let state = &mut *targets.viewer_state;
    let locked = !state.clip_mode.allows(axis);
    if locked && (clip_params.offset.is_some() || clip_params.mirrored.is_some()) {
        warn!("Ignoring clip plane {} update in single-plane mode", axis.as_str());
    }

    if let Some(offset) = clip_params.offset {
        state.set_clip_offset(axis, offset);
    }
    if let Some(mirrored) = clip_params.mirrored {
        state.set_clip_mirrored(axis, mirrored);
    }
    if let Some(show_helper) = clip_params.show_helper {
        state.set_clip_helper(axis, show_helper);
    }

    let plane = state.clip_planes.plane(axis);
    Ok(serde_json::json!({
        "success": !locked,
        "axis": axis.as_str(),
        "offset": plane.offset,
        "mirrored": plane.mirrored,
        "show_helper": plane.show_helper,
    }))
}

fn handle_set_intensity_range(
    params: &serde_json::Value,
    targets: &mut RpcTargets,
    rpc_interface: &mut WebRpcInterface,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct RangeParams {
        low: f32,
        high: f32,
    }

    let range_params = serde_json::from_value::<RangeParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'low' and 'high' parameters"))?;

    let range = targets
        .viewer_state
        .set_intensity_range(range_params.low, range_params.high)
        .map_err(|error| RpcError::invalid_params(&error.to_string()))?;

    let payload = serde_json::json!({
        "low": range.low(),
        "high": range.high(),
    });
    rpc_interface.send_notification("intensity_range_changed", payload.clone());
    Ok(payload)
}

fn handle_select_dataset(
    params: &serde_json::Value,
    targets: &mut RpcTargets,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct SelectParams {
        name: String,
    }

    let select_params = serde_json::from_value::<SelectParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'name' parameter"))?;

    let manifest = targets
        .manifest
        .ok_or_else(|| RpcError::internal_error("Dataset manifest not loaded"))?;
    if !manifest.viewer.dataset_picker {
        return Err(RpcError::invalid_params("Dataset picker is disabled"));
    }

    let entry = targets
        .loader
        .begin(manifest, &select_params.name)
        .map_err(|error| {
            warn!("{}", error);
            match error {
                LoadRequestError::Busy { .. } => RpcError::busy(&error.to_string()),
                LoadRequestError::UnknownDataset(_) => RpcError::invalid_params(&error.to_string()),
            }
        })?;

    info!("Dataset selection accepted: {}", entry.name);
    Ok(serde_json::json!({
        "success": true,
        "dataset": entry.name,
    }))
}

fn handle_get_datasets(targets: &RpcTargets) -> Result<serde_json::Value, RpcError> {
    let datasets: Vec<serde_json::Value> = targets
        .manifest
        .map(|manifest| {
            manifest
                .datasets
                .iter()
                .map(|entry| {
                    serde_json::json!({
                        "name": entry.name,
                        "scheme": entry.scheme.as_str(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(serde_json::json!({
        "datasets": datasets,
        "active": targets.viewer_state.dataset,
        "loading": targets.loader.is_loading(),
        "picker_enabled": targets.manifest.is_none_or(|manifest| manifest.viewer.dataset_picker),
    }))
}

/// Send queued notifications and responses to the frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }

    /// Server-defined: a dataset load is already in flight.
    pub fn busy(message: &str) -> Self {
        Self {
            code: -32000,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::bounds::PointCloudBounds;
    use crate::engine::core::viewer_state::ClipMode;
    use crate::engine::filtering::intensity::IntensityScheme;

    struct Fixture {
        viewer_state: ViewerState,
        loader: DatasetLoader,
        manifest: DatasetManifest,
        rpc: WebRpcInterface,
    }

    impl Fixture {
        fn new() -> Self {
            let mut viewer_state = ViewerState::default();
            viewer_state.reset_for_dataset(
                "column",
                PointCloudBounds::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
                IntensityScheme::Direct,
            );
            let manifest = serde_json::from_value(serde_json::json!({
                "datasets": [
                    { "name": "column", "path": "data/01_column.ply" },
                    { "name": "ground", "path": "data/02_ground.ply" }
                ]
            }))
            .unwrap();

            Self {
                viewer_state,
                loader: DatasetLoader::default(),
                manifest,
                rpc: WebRpcInterface::default(),
            }
        }

        fn call(&mut self, method: &str, params: serde_json::Value) -> RpcResponse {
            let request = RpcRequest {
                jsonrpc: "2.0".into(),
                method: method.into(),
                params,
                id: Some(serde_json::json!(1)),
            };
            let mut targets = RpcTargets {
                viewer_state: &mut self.viewer_state,
                loader: &mut self.loader,
                manifest: Some(&self.manifest),
                fps: 60.0,
            };
            handle_rpc_request(&request, &mut targets, &mut self.rpc).unwrap()
        }
    }

    #[test]
    fn inverted_intensity_range_is_invalid_params() {
        let mut fixture = Fixture::new();
        let response = fixture.call(
            "set_intensity_range",
            serde_json::json!({ "low": 0.8, "high": 0.2 }),
        );

        assert_eq!(response.error.unwrap().code, -32602);
        assert!(fixture.viewer_state.range.is_full());
    }

    #[test]
    fn unknown_method_is_not_found() {
        let mut fixture = Fixture::new();
        let response = fixture.call("teleport", serde_json::Value::Null);

        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert_eq!(error.data.unwrap()["method"], "teleport");
    }

    #[test]
    fn intensity_range_is_applied_and_announced() {
        let mut fixture = Fixture::new();
        let response = fixture.call(
            "set_intensity_range",
            serde_json::json!({ "low": 0.25, "high": 0.75 }),
        );

        assert_eq!(response.result.unwrap()["low"], 0.25);
        assert_eq!(fixture.viewer_state.range.high(), 0.75);
        assert_eq!(fixture.viewer_state.slider.lower(), 25.0);
        assert_eq!(
            fixture.rpc.outgoing_notifications[0].method,
            "intensity_range_changed"
        );
    }

    #[test]
    fn clip_plane_offset_is_clamped_to_bounds() {
        let mut fixture = Fixture::new();
        let response = fixture.call(
            "set_clip_plane",
            serde_json::json!({ "axis": "x", "offset": 10.0, "mirrored": true }),
        );

        let result = response.result.unwrap();
        assert!((result["offset"].as_f64().unwrap() - 1.0).abs() < 1e-5);
        assert_eq!(result["mirrored"], true);
        assert!(fixture.viewer_state.clip_planes.plane(ClipAxis::X).mirrored);
    }

    #[test]
    fn single_mode_ignores_lateral_planes() {
        let mut fixture = Fixture::new();
        fixture.viewer_state.clip_mode = ClipMode::Single;
        let response = fixture.call(
            "set_clip_plane",
            serde_json::json!({ "axis": "y", "offset": 0.0 }),
        );

        assert_eq!(response.result.unwrap()["success"], false);
        assert!((fixture.viewer_state.clip_planes.plane(ClipAxis::Y).offset - 1.0).abs() < 1e-5);
    }

    #[test]
    fn bad_axis_is_invalid_params() {
        let mut fixture = Fixture::new();
        let response = fixture.call("set_clip_plane", serde_json::json!({ "axis": "w" }));
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn second_dataset_request_while_loading_is_busy() {
        let mut fixture = Fixture::new();
        let first = fixture.call("select_dataset", serde_json::json!({ "name": "ground" }));
        assert_eq!(first.result.unwrap()["dataset"], "ground");

        let second = fixture.call("select_dataset", serde_json::json!({ "name": "column" }));
        assert_eq!(second.error.unwrap().code, -32000);
    }

    #[test]
    fn unknown_dataset_is_invalid_params() {
        let mut fixture = Fixture::new();
        let response = fixture.call("select_dataset", serde_json::json!({ "name": "nope" }));
        assert_eq!(response.error.unwrap().code, -32602);
        assert!(!fixture.loader.is_loading());
    }

    #[test]
    fn disabled_picker_refuses_dataset_selection() {
        let mut fixture = Fixture::new();
        fixture.manifest.viewer.dataset_picker = false;

        let response = fixture.call("select_dataset", serde_json::json!({ "name": "ground" }));

        assert_eq!(response.error.unwrap().code, -32602);
        assert!(!fixture.loader.is_loading());
    }

    #[test]
    fn get_datasets_lists_catalogue_and_active() {
        let mut fixture = Fixture::new();
        let result = fixture
            .call("get_datasets", serde_json::Value::Null)
            .result
            .unwrap();

        assert_eq!(result["datasets"].as_array().unwrap().len(), 2);
        assert_eq!(result["active"], "column");
        assert_eq!(result["loading"], false);
    }

    #[test]
    fn notifications_without_id_get_no_response() {
        let mut fixture = Fixture::new();
        let request = RpcRequest {
            jsonrpc: "2.0".into(),
            method: "set_intensity_range".into(),
            params: serde_json::json!({ "low": 0.1, "high": 0.2 }),
            id: None,
        };
        let mut targets = RpcTargets {
            viewer_state: &mut fixture.viewer_state,
            loader: &mut fixture.loader,
            manifest: Some(&fixture.manifest),
            fps: 0.0,
        };

        assert!(handle_rpc_request(&request, &mut targets, &mut fixture.rpc).is_none());
        assert!((fixture.viewer_state.range.low() - 0.1).abs() < 1e-6);
    }
}

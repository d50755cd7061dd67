use crate::engine::assets::catalog::ModelCatalog;
use crate::engine::assets::configurator_assets::ConfiguratorAssets;
use crate::engine::core::session::ClearSavedModelEvent;
use crate::engine::loading::model_loader::SelectModelEvent;
use crate::engine::materials::definition::MaterialCatalog;
use crate::engine::materials::swapper::{
    ApplyMaterialEvent, ClearAllMaterialsEvent, ClearMaterialEvent,
};
use crate::engine::scene::component_map::{ComponentMap, RefreshComponentsEvent};
use crate::engine::scene::environment::SetBackgroundEvent;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use constants::component::ShoeComponent;
use serde::{Deserialize, Serialize};

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

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the React
/// frontend and the engine. Handles both request-response patterns and
/// notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the frontend without expecting a response.
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

/// Plugin establishing the RPC communication layer for iframe-based
/// deployment.
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
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            // Attempt JSON parsing to validate RPC format before queuing.
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        window
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            .expect("Failed to register message listener");
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

/// Engine events a frontend request can dispatch into.
#[derive(SystemParam)]
pub struct ConfiguratorEvents<'w> {
    select_model: EventWriter<'w, SelectModelEvent>,
    apply_material: EventWriter<'w, ApplyMaterialEvent>,
    clear_material: EventWriter<'w, ClearMaterialEvent>,
    clear_all_materials: EventWriter<'w, ClearAllMaterialsEvent>,
    set_background: EventWriter<'w, SetBackgroundEvent>,
    refresh_components: EventWriter<'w, RefreshComponentsEvent>,
    clear_saved_model: EventWriter<'w, ClearSavedModelEvent>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    component_map: Res<ComponentMap>,
    assets: Res<ConfiguratorAssets>,
    model_catalogs: Res<Assets<ModelCatalog>>,
    material_catalogs: Res<Assets<MaterialCatalog>>,
    mut configurator_events: ConfiguratorEvents,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                let context = RequestContext {
                    diagnostics: &diagnostics,
                    component_map: &component_map,
                    model_catalog: model_catalogs.get(&assets.model_catalog),
                    material_catalog: material_catalogs.get(&assets.material_catalog),
                };
                if let Some(response) =
                    handle_rpc_request(&request, &context, &mut configurator_events)
                {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Parse error: {parse_error}")
                    }),
                );
            }
        }
    }
}

struct RequestContext<'a> {
    diagnostics: &'a DiagnosticsStore,
    component_map: &'a ComponentMap,
    model_catalog: Option<&'a ModelCatalog>,
    material_catalog: Option<&'a MaterialCatalog>,
}

/// Handle individual RPC request and generate response based on method.
fn handle_rpc_request(
    request: &RpcRequest,
    context: &RequestContext,
    events: &mut ConfiguratorEvents,
) -> Option<RpcResponse> {
    // Only generate responses for requests with IDs (notifications have no ID).
    let id = request.id.clone()?;

    let result = match request.method.as_str() {
        "select_model" => handle_select_model(&request.params, context, events),
        "apply_material" => handle_apply_material(&request.params, context, events),
        "clear_material" => handle_clear_material(&request.params, events),
        "clear_all_materials" => {
            events.clear_all_materials.write(ClearAllMaterialsEvent);
            Ok(serde_json::json!({ "success": true }))
        }
        "set_background" => handle_set_background(&request.params, events),
        "refresh_components" => {
            events.refresh_components.write(RefreshComponentsEvent);
            Ok(serde_json::json!({ "success": true }))
        }
        "get_components" => Ok(context.component_map.summary_json()),
        "clear_saved_model" => {
            events.clear_saved_model.write(ClearSavedModelEvent);
            Ok(serde_json::json!({ "success": true }))
        }
        "get_fps" => handle_get_fps(context.diagnostics),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

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

/// Handle model selection, either by catalog id or by direct URL with an
/// explicit transform.
fn handle_select_model(
    params: &serde_json::Value,
    context: &RequestContext,
    events: &mut ConfiguratorEvents,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct SelectModelParams {
        id: Option<String>,
        url: Option<String>,
        scale: Option<f32>,
        position: Option<[f32; 3]>,
        rotation: Option<[f32; 3]>,
    }

    let model_params = serde_json::from_value::<SelectModelParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'id' or 'url' parameter"))?;

    if let Some(id) = model_params.id {
        let catalog = context
            .model_catalog
            .ok_or_else(|| RpcError::internal_error("Model catalog not loaded yet"))?;
        let model = catalog
            .find(&id)
            .ok_or_else(|| RpcError::invalid_params(&format!("Unknown model: {id}")))?;

        events.select_model.write(SelectModelEvent::from_definition(model));
        return Ok(serde_json::json!({ "success": true, "model": id }));
    }

    let url = model_params
        .url
        .ok_or_else(|| RpcError::invalid_params("Expected 'id' or 'url' parameter"))?;
    events.select_model.write(SelectModelEvent {
        model_id: None,
        url: url.clone(),
        scale: model_params.scale.unwrap_or(1.0),
        position: Vec3::from(model_params.position.unwrap_or_default()),
        rotation: Vec3::from(model_params.rotation.unwrap_or_default()),
    });

    Ok(serde_json::json!({ "success": true, "model": url }))
}

/// Handle material application with component and catalog validation.
fn handle_apply_material(
    params: &serde_json::Value,
    context: &RequestContext,
    events: &mut ConfiguratorEvents,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct ApplyMaterialParams {
        component: String,
        material_id: String,
    }

    let material_params = serde_json::from_value::<ApplyMaterialParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'component' and 'material_id'"))?;

    let component = parse_component(&material_params.component)?;
    let catalog = context
        .material_catalog
        .ok_or_else(|| RpcError::internal_error("Material catalog not loaded yet"))?;
    let material = catalog.find(&material_params.material_id).ok_or_else(|| {
        RpcError::invalid_params(&format!(
            "Unknown material: {}",
            material_params.material_id
        ))
    })?;

    if !material.is_compatible_with(component) {
        return Err(RpcError::invalid_params(&format!(
            "Material '{}' is not compatible with '{}'",
            material.id,
            component.as_str()
        )));
    }

    events.apply_material.write(ApplyMaterialEvent {
        component,
        material: material.clone(),
    });

    Ok(serde_json::json!({
        "success": true,
        "component": component.as_str(),
        "material": material.id,
    }))
}

fn handle_clear_material(
    params: &serde_json::Value,
    events: &mut ConfiguratorEvents,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct ClearMaterialParams {
        component: String,
    }

    let clear_params = serde_json::from_value::<ClearMaterialParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'component' parameter"))?;
    let component = parse_component(&clear_params.component)?;

    events.clear_material.write(ClearMaterialEvent { component });
    Ok(serde_json::json!({ "success": true, "component": component.as_str() }))
}

fn handle_set_background(
    params: &serde_json::Value,
    events: &mut ConfiguratorEvents,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct SetBackgroundParams {
        id: String,
    }

    let background_params = serde_json::from_value::<SetBackgroundParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'id' parameter"))?;

    events.set_background.write(SetBackgroundEvent {
        id: background_params.id.clone(),
    });
    Ok(serde_json::json!({ "success": true, "background": background_params.id }))
}

fn parse_component(raw: &str) -> Result<ShoeComponent, RpcError> {
    let component = ShoeComponent::from_string(raw)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown component: {raw}")))?;
    if component == ShoeComponent::Unknown {
        return Err(RpcError::invalid_params(
            "The 'unknown' component is not selectable",
        ));
    }
    Ok(component)
}

/// Handle FPS retrieval with diagnostic system integration.
fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32;

    Ok(serde_json::json!({
        "fps": fps
    }))
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the parent frontend.
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

/// Send serialized message to parent window (frontend).
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
}

use wasm_bindgen::prelude::*;

use classroom_editor_lib::command::{execute_json, execute_json_batch};
use classroom_editor_lib::state::{EditorSettings, SceneState};
use shared::Primitive;

/// Editing store driven from the browser through JSON commands
#[wasm_bindgen]
pub struct WasmEditor {
    scene: SceneState,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an empty editor. `history_limit` of 0 keeps the default.
    #[wasm_bindgen(constructor)]
    pub fn new(history_limit: usize) -> WasmEditor {
        let mut settings = EditorSettings::default();
        if history_limit > 0 {
            settings.history_limit = history_limit;
        }
        WasmEditor {
            scene: SceneState::with_settings(settings),
        }
    }

    /// Execute one command object and return the response JSON
    pub fn execute(&mut self, command_json: &str) -> Result<String, JsError> {
        let resp = execute_json(&mut self.scene, command_json).map_err(|e| JsError::new(&e))?;
        if let Some(err) = &resp.error {
            web_sys::console::warn_1(&JsValue::from_str(err));
        }
        serde_json::to_string(&resp).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Execute an array of commands and return the array of responses
    pub fn execute_batch(&mut self, commands_json: &str) -> Result<String, JsError> {
        let responses = execute_json_batch(&mut self.scene, commands_json).map_err(|e| JsError::new(&e))?;
        serde_json::to_string(&responses).map_err(|e| JsError::new(&e.to_string()))
    }

    pub fn export_scene(&self) -> Result<String, JsError> {
        self.scene.export_json().map_err(|e| JsError::new(&e))
    }

    pub fn load_scene(&mut self, scene_json: &str) -> Result<(), JsError> {
        self.scene.import_json(scene_json).map_err(|e| JsError::new(&e))
    }

    /// Interleaved position + normal buffer of an object's mesh
    pub fn mesh_vertices(&self, object_id: &str) -> Option<js_sys::Float32Array> {
        let obj = self.scene.get_object(object_id)?;
        Some(js_sys::Float32Array::from(obj.payload.mesh.vertices.as_slice()))
    }

    pub fn mesh_indices(&self, object_id: &str) -> Option<js_sys::Uint32Array> {
        let obj = self.scene.get_object(object_id)?;
        Some(js_sys::Uint32Array::from(obj.payload.mesh.indices.as_slice()))
    }

    /// Mesh revision; changes whenever a drag edits the buffer
    pub fn mesh_revision(&self, object_id: &str) -> Option<f64> {
        self.scene
            .get_object(object_id)
            .map(|o| o.payload.mesh.revision as f64)
    }

    pub fn can_undo(&self) -> bool {
        self.scene.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.scene.can_redo()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.scene.has_unsaved_changes()
    }

    /// Scene version for render cache invalidation
    pub fn version(&self) -> f64 {
        self.scene.version() as f64
    }
}

/// Validate a primitive descriptor, returning its shape name
#[wasm_bindgen]
pub fn primitive_kind(primitive_json: &str) -> Result<String, JsError> {
    let primitive: Primitive = serde_json::from_str(primitive_json).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(primitive.kind().display_name().to_string())
}

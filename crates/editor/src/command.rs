//! JSON command protocol.
//!
//! Every store operation is reachable as a tagged JSON object, so the editor
//! can be scripted from the headless runner, the browser binding or tests.
//! A refused operation is reported as `success: false` with the reason.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shared::{LightKind, Primitive, Transform};

use crate::state::scene::{light_display_name, object_display_name, shape_icon};
use crate::state::{
    EditMode, ElementKind, LightUpdate, Outcome, PendingPlacement, Refusal, SceneState, SettingsUpdate,
    TransformMode,
};

/// A command the editor can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    // ── Objects ──
    AddPrimitive {
        name: String,
        primitive: Primitive,
        #[serde(default)]
        transform: Transform,
    },
    RemoveObject {
        id: String,
    },
    ToggleVisibility {
        id: String,
    },
    ToggleLock {
        id: String,
    },
    RenameObject {
        id: String,
        name: String,
    },
    SetObjectTransform {
        id: String,
        transform: Transform,
    },
    /// Acts on the selected object
    UpdateObjectColor {
        color: String,
    },
    UpdateObjectOpacity {
        opacity: f32,
    },
    DuplicateObject,
    MirrorObject,
    UpdateVertexCount {
        count: u32,
    },
    ResetScene,

    // ── Groups ──
    CreateGroup {
        name: String,
        #[serde(default)]
        object_ids: Vec<String>,
    },
    RemoveGroup {
        id: String,
    },
    AddObjectToGroup {
        object_id: String,
        group_id: String,
    },
    RemoveObjectFromGroup {
        object_id: String,
    },
    ToggleGroupExpanded {
        id: String,
    },
    ToggleGroupVisibility {
        id: String,
    },
    ToggleGroupLock {
        id: String,
    },
    RenameGroup {
        id: String,
        name: String,
    },
    /// `group_id: null` ungroups
    MoveObjectsToGroup {
        object_ids: Vec<String>,
        #[serde(default)]
        group_id: Option<String>,
    },

    // ── Lights & settings ──
    AddLight {
        kind: LightKind,
        #[serde(default)]
        position: Option<[f64; 3]>,
    },
    RemoveLight {
        id: String,
    },
    UpdateLight {
        id: String,
        #[serde(default)]
        properties: LightUpdate,
    },
    ToggleLightVisibility {
        id: String,
    },
    UpdateSceneSettings {
        #[serde(default)]
        settings: SettingsUpdate,
    },

    // ── Selection & modes ──
    /// `id: null` deselects
    SelectObject {
        #[serde(default)]
        id: Option<String>,
    },
    SelectLight {
        #[serde(default)]
        id: Option<String>,
    },
    SetTransformMode {
        mode: TransformMode,
    },
    SetEditMode {
        mode: EditMode,
    },
    SetSelectedElements {
        kind: ElementKind,
        indices: Vec<usize>,
    },

    // ── Drag ──
    StartVertexDrag {
        index: usize,
        position: [f32; 3],
    },
    UpdateVertexDrag {
        position: [f32; 3],
    },
    EndVertexDrag,
    StartEdgeDrag {
        edge: [usize; 2],
        endpoints: [[f32; 3]; 2],
        midpoint: [f32; 3],
    },
    UpdateEdgeDrag {
        position: [f32; 3],
    },
    EndEdgeDrag,
    CancelDrag,

    // ── Placement ──
    StartPlacement {
        name: String,
        primitive: Primitive,
        #[serde(default)]
        color: Option<String>,
    },
    PlaceObject {
        position: [f64; 3],
        #[serde(default)]
        rotation: Option<[f64; 3]>,
    },
    CancelPlacement,

    // ── History & document ──
    Undo,
    Redo,
    /// List objects, groups, lights and editor state
    Inspect,
    ExportScene,
    LoadScene {
        scene_json: String,
    },
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn created(id: String) -> Self {
        Self::ok_with_data(serde_json::json!({ "id": id }))
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

impl From<Outcome> for CommandResponse {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Applied => Self::ok(),
            Outcome::Refused(r) => Self::err(r.to_string()),
        }
    }
}

impl From<Result<String, Refusal>> for CommandResponse {
    fn from(result: Result<String, Refusal>) -> Self {
        match result {
            Ok(id) => Self::created(id),
            Err(r) => Self::err(r.to_string()),
        }
    }
}

/// Execute a single command on the scene.
pub fn execute_command(scene: &mut SceneState, cmd: EditorCommand) -> CommandResponse {
    match cmd {
        EditorCommand::AddPrimitive {
            name,
            primitive,
            transform,
        } => CommandResponse::created(scene.add_primitive(primitive, name, transform)),
        EditorCommand::RemoveObject { id } => scene.remove_object(&id).into(),
        EditorCommand::ToggleVisibility { id } => scene.toggle_visibility(&id).into(),
        EditorCommand::ToggleLock { id } => scene.toggle_lock(&id).into(),
        EditorCommand::RenameObject { id, name } => scene.rename_object(&id, name).into(),
        EditorCommand::SetObjectTransform { id, transform } => scene.set_object_transform(&id, transform).into(),
        EditorCommand::UpdateObjectColor { color } => scene.update_object_color(color).into(),
        EditorCommand::UpdateObjectOpacity { opacity } => scene.update_object_opacity(opacity).into(),
        EditorCommand::DuplicateObject => scene.duplicate_object().into(),
        EditorCommand::MirrorObject => scene.mirror_object().into(),
        EditorCommand::UpdateVertexCount { count } => scene.update_vertex_count(count).into(),
        EditorCommand::ResetScene => scene.reset_scene().into(),

        EditorCommand::CreateGroup { name, object_ids } => scene.create_group(name, &object_ids).into(),
        EditorCommand::RemoveGroup { id } => scene.remove_group(&id).into(),
        EditorCommand::AddObjectToGroup { object_id, group_id } => {
            scene.add_object_to_group(&object_id, &group_id).into()
        }
        EditorCommand::RemoveObjectFromGroup { object_id } => scene.remove_object_from_group(&object_id).into(),
        EditorCommand::ToggleGroupExpanded { id } => scene.toggle_group_expanded(&id).into(),
        EditorCommand::ToggleGroupVisibility { id } => scene.toggle_group_visibility(&id).into(),
        EditorCommand::ToggleGroupLock { id } => scene.toggle_group_lock(&id).into(),
        EditorCommand::RenameGroup { id, name } => scene.rename_group(&id, name).into(),
        EditorCommand::MoveObjectsToGroup { object_ids, group_id } => {
            scene.move_objects_to_group(&object_ids, group_id.as_deref()).into()
        }

        EditorCommand::AddLight { kind, position } => CommandResponse::created(scene.add_light(kind, position)),
        EditorCommand::RemoveLight { id } => scene.remove_light(&id).into(),
        EditorCommand::UpdateLight { id, properties } => scene.update_light(&id, properties).into(),
        EditorCommand::ToggleLightVisibility { id } => scene.toggle_light_visibility(&id).into(),
        EditorCommand::UpdateSceneSettings { settings } => scene.update_scene_settings(settings).into(),

        EditorCommand::SelectObject { id } => scene.select_object(id.as_deref()).into(),
        EditorCommand::SelectLight { id } => scene.select_light(id.as_deref()).into(),
        EditorCommand::SetTransformMode { mode } => scene.set_transform_mode(mode).into(),
        EditorCommand::SetEditMode { mode } => scene.set_edit_mode(mode).into(),
        EditorCommand::SetSelectedElements { kind, indices } => scene.set_selected_elements(kind, indices).into(),

        EditorCommand::StartVertexDrag { index, position } => {
            scene.start_vertex_drag(index, Vec3::from_array(position)).into()
        }
        EditorCommand::UpdateVertexDrag { position } => scene.update_vertex_drag(Vec3::from_array(position)).into(),
        EditorCommand::EndVertexDrag => scene.end_vertex_drag().into(),
        EditorCommand::StartEdgeDrag {
            edge,
            endpoints,
            midpoint,
        } => scene
            .start_edge_drag(
                edge,
                endpoints.map(Vec3::from_array),
                Vec3::from_array(midpoint),
            )
            .into(),
        EditorCommand::UpdateEdgeDrag { position } => scene.update_edge_drag(Vec3::from_array(position)).into(),
        EditorCommand::EndEdgeDrag => scene.end_edge_drag().into(),
        EditorCommand::CancelDrag => scene.cancel_drag().into(),

        EditorCommand::StartPlacement { name, primitive, color } => {
            let mut pending = PendingPlacement::new(primitive, name);
            pending.color = color;
            scene.start_object_placement(pending).into()
        }
        EditorCommand::PlaceObject { position, rotation } => scene.place_object_at(position, rotation).into(),
        EditorCommand::CancelPlacement => scene.cancel_object_placement().into(),

        EditorCommand::Undo => scene.undo().into(),
        EditorCommand::Redo => scene.redo().into(),
        EditorCommand::Inspect => CommandResponse::ok_with_data(inspect(scene)),
        EditorCommand::ExportScene => match scene.export_json() {
            Ok(json) => CommandResponse::ok_with_data(serde_json::json!({ "scene_json": json })),
            Err(e) => CommandResponse::err(e),
        },
        EditorCommand::LoadScene { scene_json } => match scene.import_json(&scene_json) {
            Ok(()) => CommandResponse::ok(),
            Err(e) => CommandResponse::err(e),
        },
    }
}

/// Snapshot of the scene and editor state as JSON
fn inspect(scene: &SceneState) -> serde_json::Value {
    let objects: Vec<serde_json::Value> = scene
        .objects()
        .iter()
        .map(|obj| {
            let kind = obj.payload.kind();
            serde_json::json!({
                "id": obj.id,
                "name": obj.name,
                "label": format!("{} {}", shape_icon(kind), object_display_name(obj)),
                "shape": kind.display_name(),
                "visible": scene.is_visible(&obj.id),
                "locked": scene.is_locked(&obj.id),
                "group_id": obj.group_id,
                "position": obj.payload.transform.position,
                "color": obj.payload.material.color,
                "vertex_count": obj.payload.mesh.vertex_count(),
            })
        })
        .collect();
    let groups: Vec<serde_json::Value> = scene
        .groups()
        .iter()
        .map(|g| {
            serde_json::json!({
                "id": g.id,
                "name": g.name,
                "visible": g.visible,
                "locked": g.locked,
                "object_ids": g.object_ids,
            })
        })
        .collect();
    let lights: Vec<serde_json::Value> = scene
        .lights()
        .iter()
        .map(|l| {
            serde_json::json!({
                "id": l.light.id,
                "label": light_display_name(&l.light),
                "kind": l.light.kind,
                "visible": l.light.visible,
                "intensity": l.native.intensity,
            })
        })
        .collect();

    serde_json::json!({
        "object_count": objects.len(),
        "objects": objects,
        "groups": groups,
        "lights": lights,
        "selected_object": scene.selection().object(),
        "selected_light": scene.selection().light(),
        "transform_mode": scene.transform_mode(),
        "edit_mode": scene.edit_mode(),
        "placing": scene.is_placing(),
        "dragging": !scene.drag().is_idle(),
        "can_undo": scene.can_undo(),
        "can_redo": scene.can_redo(),
        "history_len": scene.history_len(),
        "unsaved": scene.has_unsaved_changes(),
        "version": scene.version(),
    })
}

/// Parse and execute a single JSON command string.
pub fn execute_json(scene: &mut SceneState, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand = serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    tracing::debug!("Executing {cmd:?}");
    Ok(execute_command(scene, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(scene: &mut SceneState, json: &str) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds.into_iter().map(|cmd| execute_command(scene, cmd)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_of(resp: &CommandResponse) -> String {
        resp.data.as_ref().unwrap()["id"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_command_serde_undo() {
        let json = r#"{"command": "undo"}"#;
        let cmd: EditorCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, EditorCommand::Undo));
    }

    #[test]
    fn test_command_serde_add_primitive() {
        let json = r#"{"command": "add_primitive", "name": "Cube1", "primitive": {"type": "box", "width": 1.0, "height": 1.0, "depth": 1.0}}"#;
        let cmd: EditorCommand = serde_json::from_str(json).unwrap();
        match cmd {
            EditorCommand::AddPrimitive { name, transform, .. } => {
                assert_eq!(name, "Cube1");
                assert_eq!(transform, Transform::new());
            }
            _ => panic!("Expected AddPrimitive"),
        }
    }

    #[test]
    fn test_command_serde_select_null() {
        let cmd: EditorCommand = serde_json::from_str(r#"{"command": "select_object", "id": null}"#).unwrap();
        assert!(matches!(cmd, EditorCommand::SelectObject { id: None }));
    }

    #[test]
    fn test_command_serde_update_light_partial() {
        let json = r#"{"command": "update_light", "id": "l1", "properties": {"intensity": 2.0}}"#;
        let cmd: EditorCommand = serde_json::from_str(json).unwrap();
        match cmd {
            EditorCommand::UpdateLight { properties, .. } => {
                assert_eq!(properties.intensity, Some(2.0));
                assert!(properties.color.is_none());
            }
            _ => panic!("Expected UpdateLight"),
        }
    }

    #[test]
    fn test_execute_add_and_inspect() {
        let mut scene = SceneState::new();
        let json = r#"{"command": "add_primitive", "name": "Cube1", "primitive": {"type": "box", "width": 2.0, "height": 2.0, "depth": 2.0}}"#;
        let resp = execute_json(&mut scene, json).unwrap();
        assert!(resp.success);
        assert_eq!(scene.object_count(), 1);

        let resp = execute_json(&mut scene, r#"{"command": "inspect"}"#).unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data["object_count"], 1);
        assert_eq!(data["objects"][0]["shape"], "Box");
        assert_eq!(data["transform_mode"], "none");
    }

    #[test]
    fn test_refusal_maps_to_error() {
        let mut scene = SceneState::new();
        let resp = execute_json(&mut scene, r#"{"command": "remove_object", "id": "ghost"}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("no such entity"));

        let resp = execute_json(&mut scene, r#"{"command": "undo"}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("nothing to undo"));
    }

    #[test]
    fn test_execute_undo_redo() {
        let mut scene = SceneState::new();
        scene.add_primitive(Primitive::unit_box(), "c1", Transform::new());

        let resp = execute_json(&mut scene, r#"{"command": "undo"}"#).unwrap();
        assert!(resp.success);
        assert_eq!(scene.object_count(), 0);

        let resp = execute_json(&mut scene, r#"{"command": "redo"}"#).unwrap();
        assert!(resp.success);
        assert_eq!(scene.object_count(), 1);
    }

    #[test]
    fn test_execute_placement_flow() {
        let mut scene = SceneState::new();
        let batch = r##"[
            {"command": "start_placement", "name": "Ball", "primitive": {"type": "sphere", "radius": 0.5}, "color": "#ff0000"},
            {"command": "place_object", "position": [1.0, 0.5, 0.0]}
        ]"##;
        let responses = execute_json_batch(&mut scene, batch).unwrap();
        assert!(responses.iter().all(|r| r.success));
        let id = id_of(&responses[1]);
        assert!(scene.selection().is_object(&id));
        assert_eq!(scene.get_object(&id).unwrap().payload.material.color, "#ff0000");
    }

    #[test]
    fn test_execute_drag_commands() {
        let mut scene = SceneState::new();
        let resp = execute_json(
            &mut scene,
            r#"{"command": "add_primitive", "name": "Cube", "primitive": {"type": "box", "width": 1.0, "height": 1.0, "depth": 1.0}}"#,
        )
        .unwrap();
        let id = id_of(&resp);
        scene.select_object(Some(id.as_str()));
        let p = scene.get_object(&id).unwrap().payload.mesh.position(0).unwrap();

        let start = format!(
            r#"{{"command": "start_vertex_drag", "index": 0, "position": [{}, {}, {}]}}"#,
            p.x, p.y, p.z
        );
        assert!(execute_json(&mut scene, &start).unwrap().success);
        let update = r#"{"command": "update_vertex_drag", "position": [2.0, 2.0, 2.0]}"#;
        assert!(execute_json(&mut scene, update).unwrap().success);
        assert!(execute_json(&mut scene, r#"{"command": "end_vertex_drag"}"#).unwrap().success);
        assert_eq!(
            scene.get_object(&id).unwrap().payload.mesh.position(0),
            Some(Vec3::splat(2.0))
        );
    }

    #[test]
    fn test_execute_export_and_load() {
        let mut scene = SceneState::new();
        scene.add_primitive(Primitive::unit_box(), "c1", Transform::new());

        let resp = execute_json(&mut scene, r#"{"command": "export_scene"}"#).unwrap();
        let data = resp.data.unwrap();
        let scene_json = data["scene_json"].as_str().unwrap().to_string();
        assert!(scene_json.contains("objects"));

        let mut other = SceneState::new();
        let cmd = serde_json::json!({ "command": "load_scene", "scene_json": scene_json });
        let resp = execute_json(&mut other, &cmd.to_string()).unwrap();
        assert!(resp.success);
        assert_eq!(other.object_count(), 1);
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut scene = SceneState::new();
        assert!(execute_json(&mut scene, "not valid json").is_err());
    }
}

//! Scene state management
//!
//! `SceneState` is the single editing store: objects, groups, lights and
//! scene settings, plus the transient selection / mode / drag / placement
//! state and the undo history. Operations are split across the sibling
//! modules by concern; every one of them is a synchronous transition that
//! either applies or is refused without touching the store.

mod cascade;
mod display;
mod drag_ops;
mod group_ops;
mod history;
mod light_ops;
mod object_ops;
mod persistence;
mod placement_ops;
mod selection_ops;

pub use display::{light_display_name, object_display_name, shape_icon, short_id};
pub use light_ops::{LightUpdate, SettingsUpdate};
pub use history::{HistoryLog, Snapshot};

use std::sync::Arc;
use std::time::SystemTime;

use shared::{Group, Light, Material, ObjectId, Primitive, SceneSettings, ShapeKind, Transform};

use crate::backend::{CpuBackend, NativeLight, RenderBackend};
use crate::mesh::MeshData;

use super::drag::DragState;
use super::outcome::{Outcome, Refusal};
use super::placement::PendingPlacement;
use super::selection::{EditMode, ElementSelection, ModeState, Selection, TransformMode};
use super::settings::EditorSettings;

/// Geometry + material + transform owned by one scene object.
///
/// The mesh buffer is shared copy-on-write with history snapshots; editing it
/// through `mesh_mut` detaches this payload's copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    pub primitive: Primitive,
    pub transform: Transform,
    pub material: Material,
    pub mesh: Arc<MeshData>,
}

impl Renderable {
    pub fn new(primitive: Primitive, mesh: MeshData, material: Material, transform: Transform) -> Self {
        Self {
            primitive,
            transform,
            material,
            mesh: Arc::new(mesh),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.primitive.kind()
    }

    pub fn mesh_mut(&mut self) -> &mut MeshData {
        Arc::make_mut(&mut self.mesh)
    }
}

/// User-visible 3D entity
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub payload: Renderable,
    pub visible: bool,
    pub locked: bool,
    pub group_id: Option<shared::GroupId>,
}

/// Light description plus the renderer instance it drives
#[derive(Debug, Clone)]
pub struct LightEntity {
    pub light: Light,
    pub native: NativeLight,
}

/// Scene state with entities, editing state and undo/redo history
pub struct SceneState {
    pub(crate) objects: Vec<SceneObject>,
    pub(crate) groups: Vec<Group>,
    pub(crate) lights: Vec<LightEntity>,
    pub(crate) settings: SceneSettings,
    pub(crate) selection: Selection,
    pub(crate) modes: ModeState,
    pub(crate) elements: ElementSelection,
    pub(crate) drag: DragState,
    pub(crate) placement: Option<PendingPlacement>,
    pub(crate) history: HistoryLog,
    pub(crate) editor: EditorSettings,
    pub(crate) backend: Box<dyn RenderBackend>,
    /// Monotonically increasing version counter for renderer cache invalidation
    pub(crate) version: u64,
    pub(crate) unsaved: bool,
    pub(crate) last_saved: Option<SystemTime>,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneState {
    /// Empty scene on the CPU backend with default settings
    pub fn new() -> Self {
        Self::with_backend(Box::new(CpuBackend), EditorSettings::default())
    }

    pub fn with_settings(editor: EditorSettings) -> Self {
        Self::with_backend(Box::new(CpuBackend), editor)
    }

    pub fn with_backend(backend: Box<dyn RenderBackend>, editor: EditorSettings) -> Self {
        let editor = editor.sanitized();
        let mut state = Self {
            objects: Vec::new(),
            groups: Vec::new(),
            lights: Vec::new(),
            settings: SceneSettings::default(),
            selection: Selection::None,
            modes: ModeState::default(),
            elements: ElementSelection::default(),
            drag: DragState::Idle,
            placement: None,
            history: HistoryLog::new(editor.history_limit),
            editor,
            backend,
            version: 0,
            unsaved: false,
            last_saved: None,
        };
        state.reset_history();
        state
    }

    // ── Read access ───────────────────────────────────────────

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn lights(&self) -> &[LightEntity] {
        &self.lights
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn editor_settings(&self) -> &EditorSettings {
        &self.editor
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selection.object().and_then(|id| self.get_object(id))
    }

    pub fn selected_light(&self) -> Option<&LightEntity> {
        self.selection.light().and_then(|id| self.get_light(id))
    }

    pub fn modes(&self) -> &ModeState {
        &self.modes
    }

    pub fn transform_mode(&self) -> TransformMode {
        self.modes.transform
    }

    pub fn edit_mode(&self) -> EditMode {
        self.modes.edit
    }

    pub fn element_selection(&self) -> &ElementSelection {
        &self.elements
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn pending_placement(&self) -> Option<&PendingPlacement> {
        self.placement.as_ref()
    }

    pub fn is_placing(&self) -> bool {
        self.placement.is_some()
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get_object(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub(crate) fn get_object_mut(&mut self, id: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn get_group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub(crate) fn get_group_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    pub fn get_light(&self, id: &str) -> Option<&LightEntity> {
        self.lights.iter().find(|l| l.light.id == id)
    }

    pub(crate) fn get_light_mut(&mut self, id: &str) -> Option<&mut LightEntity> {
        self.lights.iter_mut().find(|l| l.light.id == id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    // ── Internal helpers ──────────────────────────────────────

    /// Build a payload for `primitive` through the render backend. Segment
    /// counts are clamped before the descriptor is stored.
    pub fn build_payload(&self, primitive: Primitive, material: Material, transform: Transform) -> Renderable {
        let primitive = primitive.clamped();
        let mesh = self.backend.build_mesh(&primitive);
        Renderable::new(primitive, mesh, material, transform)
    }

    /// Log and report a refused operation
    pub(crate) fn refuse(&self, op: &str, reason: Refusal) -> Outcome {
        Outcome::Refused(self.reject(op, reason))
    }

    /// Log a refusal for operations that return `Result`
    pub(crate) fn reject(&self, op: &str, reason: Refusal) -> Refusal {
        tracing::debug!("{op} refused: {reason}");
        reason
    }

    /// Id of the selected object if it exists and is editable
    pub(crate) fn editable_selection(&self) -> Result<ObjectId, Refusal> {
        let id = self.selection.object().ok_or(Refusal::NoSelection)?;
        if self.get_object(id).is_none() {
            return Err(Refusal::NoSelection);
        }
        if self.is_locked(id) {
            return Err(Refusal::Locked);
        }
        Ok(id.clone())
    }

    /// Drop the selection without touching the active modes
    pub(crate) fn clear_selection(&mut self) {
        self.selection = Selection::None;
        self.elements.clear();
        self.drag = DragState::Idle;
    }

    pub(crate) fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

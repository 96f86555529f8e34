//! Selection and tool mode transitions

use super::SceneState;
use crate::state::outcome::{Outcome, Refusal};
use crate::state::selection::{EditMode, ElementKind, Selection, TransformMode};

impl SceneState {
    /// Select an object (or clear the selection with `None`).
    ///
    /// The remembered transform / edit modes are re-applied to the new
    /// selection; round shapes enter vertex editing on their own.
    pub fn select_object(&mut self, id: Option<&str>) -> Outcome {
        if self.is_placing() {
            return self.refuse("select_object", Refusal::PlacementActive);
        }
        if !self.drag.is_idle() {
            return self.refuse("select_object", Refusal::DragInProgress);
        }

        let Some(id) = id else {
            self.clear_selection();
            self.modes.on_deselect();
            return Outcome::Applied;
        };
        let Some(kind) = self.get_object(id).map(|o| o.payload.kind()) else {
            return self.refuse("select_object", Refusal::NotFound);
        };
        if !self.can_select(id) {
            return self.refuse("select_object", Refusal::Locked);
        }

        self.elements.clear();
        self.selection = Selection::Object(id.to_string());
        self.modes.on_select(kind);
        Outcome::Applied
    }

    /// Select a light (or clear a light selection with `None`).
    /// Any object selection is dropped.
    pub fn select_light(&mut self, id: Option<&str>) -> Outcome {
        if self.is_placing() {
            return self.refuse("select_light", Refusal::PlacementActive);
        }
        if !self.drag.is_idle() {
            return self.refuse("select_light", Refusal::DragInProgress);
        }

        match id {
            Some(id) => {
                if self.get_light(id).is_none() {
                    return self.refuse("select_light", Refusal::NotFound);
                }
                self.clear_selection();
                self.modes.on_deselect();
                self.selection = Selection::Light(id.to_string());
            }
            None => {
                if self.selection.light().is_some() {
                    self.selection = Selection::None;
                }
            }
        }
        Outcome::Applied
    }

    /// Explicit gizmo mode choice; remembered for later selections
    pub fn set_transform_mode(&mut self, mode: TransformMode) -> Outcome {
        self.modes.choose_transform(mode);
        Outcome::Applied
    }

    /// Explicit edit mode choice; remembered for later selections.
    /// Edge editing is unavailable on round shapes.
    pub fn set_edit_mode(&mut self, mode: EditMode) -> Outcome {
        if !self.drag.is_idle() {
            return self.refuse("set_edit_mode", Refusal::DragInProgress);
        }
        if mode == EditMode::Edge {
            let round = self
                .selected_object()
                .is_some_and(|o| !o.payload.kind().has_editable_edges());
            if round {
                return self.refuse("set_edit_mode", Refusal::UnsupportedGeometry);
            }
        }

        if self.modes.edit != mode {
            self.elements.clear();
        }
        self.modes.choose_edit(mode);
        Outcome::Applied
    }

    /// Replace the picked vertex / edge / face indices on the selected object
    pub fn set_selected_elements(&mut self, kind: ElementKind, indices: Vec<usize>) -> Outcome {
        let Some(obj) = self.selected_object() else {
            return self.refuse("set_selected_elements", Refusal::NoSelection);
        };
        let limit = match kind {
            ElementKind::Vertices => Some(obj.payload.mesh.vertex_count()),
            ElementKind::Faces => Some(obj.payload.mesh.triangle_count()),
            ElementKind::Edges => None,
        };
        if let Some(limit) = limit {
            if indices.iter().any(|&i| i >= limit) {
                return self.refuse("set_selected_elements", Refusal::InvalidVertex);
            }
        }

        self.elements.set(kind, indices);
        Outcome::Applied
    }
}

use serde::{Deserialize, Serialize};
use shared::{LightId, ObjectId, ShapeKind};

/// What the user has selected. Object and light selection are exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Object(ObjectId),
    Light(LightId),
}

impl Selection {
    pub fn object(&self) -> Option<&ObjectId> {
        match self {
            Selection::Object(id) => Some(id),
            _ => None,
        }
    }

    pub fn light(&self) -> Option<&LightId> {
        match self {
            Selection::Light(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_object(&self, id: &str) -> bool {
        self.object().is_some_and(|s| s == id)
    }

    pub fn is_light(&self, id: &str) -> bool {
        self.light().is_some_and(|s| s == id)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}

/// Gizmo mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMode {
    #[default]
    None,
    Translate,
    Rotate,
    Scale,
}

/// Mesh element editing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    None,
    Vertex,
    Edge,
}

/// Element kind for per-element selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Vertices,
    Edges,
    Faces,
}

/// Vertex / edge / face indices picked on the selected mesh
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementSelection {
    pub vertices: Vec<usize>,
    pub edges: Vec<usize>,
    pub faces: Vec<usize>,
}

impl ElementSelection {
    pub fn set(&mut self, kind: ElementKind, indices: Vec<usize>) {
        match kind {
            ElementKind::Vertices => self.vertices = indices,
            ElementKind::Edges => self.edges = indices,
            ElementKind::Faces => self.faces = indices,
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }
}

/// Active tool modes plus the user's last explicit choices.
///
/// The persistent fields stick across selection changes: whatever the user
/// last picked on the toolbar is re-applied to the next selected or placed
/// object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModeState {
    pub transform: TransformMode,
    pub edit: EditMode,
    pub persistent_transform: TransformMode,
    pub persistent_edit: EditMode,
}

impl ModeState {
    /// Explicit toolbar choice of gizmo mode
    pub fn choose_transform(&mut self, mode: TransformMode) {
        self.transform = mode;
        self.persistent_transform = mode;
    }

    /// Explicit toolbar choice of edit mode
    pub fn choose_edit(&mut self, mode: EditMode) {
        self.edit = mode;
        self.persistent_edit = mode;
    }

    /// Modes for a freshly selected object of shape `kind`
    pub fn on_select(&mut self, kind: ShapeKind) {
        if self.persistent_transform != TransformMode::None {
            self.transform = self.persistent_transform;
        }
        if let Some(edit) = self.edit_for(kind) {
            self.edit = edit;
        }
    }

    /// Modes for a freshly placed object: the persistent choices replace the
    /// active ones outright.
    pub fn on_place(&mut self, kind: ShapeKind) {
        self.transform = self.persistent_transform;
        self.edit = self.edit_for(kind).unwrap_or(EditMode::None);
    }

    /// Modes after the selection is cleared
    pub fn on_deselect(&mut self) {
        if self.persistent_edit == EditMode::None {
            self.edit = EditMode::None;
        }
        if self.persistent_transform == TransformMode::None {
            self.transform = TransformMode::None;
        }
    }

    /// Active modes off, persistent memory kept
    pub fn suspend(&mut self) {
        self.transform = TransformMode::None;
        self.edit = EditMode::None;
    }

    fn edit_for(&self, kind: ShapeKind) -> Option<EditMode> {
        match self.persistent_edit {
            EditMode::Edge if !kind.has_editable_edges() => Some(EditMode::Vertex),
            EditMode::None if kind.is_round() => Some(EditMode::Vertex),
            EditMode::None => None,
            mode => Some(mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_empty() {
        let s = Selection::default();
        assert!(s.is_none());
        assert!(s.object().is_none());
        assert!(s.light().is_none());
    }

    #[test]
    fn test_object_and_light_exclusive() {
        let s = Selection::Object("a".to_string());
        assert!(s.is_object("a"));
        assert!(!s.is_light("a"));
        let s = Selection::Light("l".to_string());
        assert!(s.light().is_some());
        assert!(s.object().is_none());
    }

    #[test]
    fn test_choose_sets_persistent() {
        let mut m = ModeState::default();
        m.choose_transform(TransformMode::Rotate);
        m.choose_edit(EditMode::Edge);
        assert_eq!(m.persistent_transform, TransformMode::Rotate);
        assert_eq!(m.persistent_edit, EditMode::Edge);
    }

    #[test]
    fn test_select_round_shape_auto_vertex() {
        let mut m = ModeState::default();
        m.on_select(ShapeKind::Sphere);
        assert_eq!(m.edit, EditMode::Vertex);
    }

    #[test]
    fn test_select_box_keeps_current_edit() {
        let mut m = ModeState::default();
        m.on_select(ShapeKind::Box);
        assert_eq!(m.edit, EditMode::None);
    }

    #[test]
    fn test_persistent_edge_degrades_on_round() {
        let mut m = ModeState::default();
        m.choose_edit(EditMode::Edge);
        m.on_select(ShapeKind::Cone);
        assert_eq!(m.edit, EditMode::Vertex);
        m.on_select(ShapeKind::Box);
        assert_eq!(m.edit, EditMode::Edge);
    }

    #[test]
    fn test_deselect_keeps_persistent() {
        let mut m = ModeState::default();
        m.choose_transform(TransformMode::Scale);
        m.on_select(ShapeKind::Cylinder);
        m.on_deselect();
        assert_eq!(m.transform, TransformMode::Scale);
        assert_eq!(m.edit, EditMode::None);
    }

    #[test]
    fn test_place_uses_persistent() {
        let mut m = ModeState {
            transform: TransformMode::Rotate,
            ..ModeState::default()
        };
        m.on_place(ShapeKind::Box);
        assert_eq!(m.transform, TransformMode::None);
        assert_eq!(m.edit, EditMode::None);
        m.on_place(ShapeKind::Sphere);
        assert_eq!(m.edit, EditMode::Vertex);
    }

    #[test]
    fn test_element_selection_set_and_clear() {
        let mut e = ElementSelection::default();
        e.set(ElementKind::Vertices, vec![1, 2]);
        e.set(ElementKind::Faces, vec![0]);
        assert_eq!(e.vertices, vec![1, 2]);
        assert!(!e.is_empty());
        e.clear();
        assert!(e.is_empty());
    }
}

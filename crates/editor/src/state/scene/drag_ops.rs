//! Vertex / edge drag operations on the selected object

use glam::Vec3;

use super::SceneState;
use crate::state::drag::{DragState, EdgeDrag, VertexDrag};
use crate::state::outcome::{Outcome, Refusal};

impl SceneState {
    fn check_drag_start(&self) -> Result<String, Refusal> {
        if !self.drag.is_idle() {
            return Err(Refusal::DragInProgress);
        }
        self.editable_selection()
    }

    /// Grab vertex `index` of the selected object together with every
    /// vertex sharing its position
    pub fn start_vertex_drag(&mut self, index: usize, position: Vec3) -> Outcome {
        let id = match self.check_drag_start() {
            Ok(id) => id,
            Err(r) => return self.refuse("start_vertex_drag", r),
        };
        let Some(obj) = self.get_object(&id) else {
            return self.refuse("start_vertex_drag", Refusal::NoSelection);
        };
        let Some(drag) = VertexDrag::begin(id, &obj.payload.mesh, index, position) else {
            return self.refuse("start_vertex_drag", Refusal::InvalidVertex);
        };

        self.elements.vertices = drag.indices.clone();
        self.drag = DragState::Vertex(drag);
        Outcome::Applied
    }

    pub fn update_vertex_drag(&mut self, position: Vec3) -> Outcome {
        if !matches!(self.drag, DragState::Vertex(_)) {
            return self.refuse("update_vertex_drag", Refusal::NoActiveDrag);
        }
        let objects = &mut self.objects;
        if let DragState::Vertex(drag) = &mut self.drag {
            if let Some(obj) = objects.iter_mut().find(|o| o.id == drag.object_id) {
                drag.apply(obj.payload.mesh_mut(), position);
            }
        }
        self.version += 1;
        Outcome::Applied
    }

    /// Commit the gesture as one history entry
    pub fn end_vertex_drag(&mut self) -> Outcome {
        if !matches!(self.drag, DragState::Vertex(_)) {
            return self.refuse("end_vertex_drag", Refusal::NoActiveDrag);
        }
        self.drag = DragState::Idle;
        self.save_to_history();
        Outcome::Applied
    }

    /// Grab the edge `a`-`b` of the selected object. Every duplicate of the
    /// edge moves with it.
    pub fn start_edge_drag(&mut self, edge: [usize; 2], endpoints: [Vec3; 2], midpoint: Vec3) -> Outcome {
        let id = match self.check_drag_start() {
            Ok(id) => id,
            Err(r) => return self.refuse("start_edge_drag", r),
        };
        let Some(obj) = self.get_object(&id) else {
            return self.refuse("start_edge_drag", Refusal::NoSelection);
        };
        if !obj.payload.kind().has_editable_edges() {
            return self.refuse("start_edge_drag", Refusal::UnsupportedGeometry);
        }
        let Some(drag) = EdgeDrag::begin(id, &obj.payload.mesh, edge, endpoints, midpoint) else {
            return self.refuse("start_edge_drag", Refusal::InvalidVertex);
        };

        self.elements.vertices = drag.connected.iter().copied().collect();
        self.drag = DragState::Edge(drag);
        Outcome::Applied
    }

    pub fn update_edge_drag(&mut self, position: Vec3) -> Outcome {
        if !matches!(self.drag, DragState::Edge(_)) {
            return self.refuse("update_edge_drag", Refusal::NoActiveDrag);
        }
        let objects = &mut self.objects;
        if let DragState::Edge(drag) = &mut self.drag {
            if let Some(obj) = objects.iter_mut().find(|o| o.id == drag.object_id) {
                drag.apply(obj.payload.mesh_mut(), position);
            }
        }
        self.version += 1;
        Outcome::Applied
    }

    pub fn end_edge_drag(&mut self) -> Outcome {
        if !matches!(self.drag, DragState::Edge(_)) {
            return self.refuse("end_edge_drag", Refusal::NoActiveDrag);
        }
        self.drag = DragState::Idle;
        self.save_to_history();
        Outcome::Applied
    }

    /// Abort the open gesture and put the mesh back. Nothing is recorded.
    pub fn cancel_drag(&mut self) -> Outcome {
        let drag = std::mem::take(&mut self.drag);
        let Some(object_id) = drag.object_id().cloned() else {
            return self.refuse("cancel_drag", Refusal::NoActiveDrag);
        };
        if let Some(obj) = self.get_object_mut(&object_id) {
            let mesh = obj.payload.mesh_mut();
            match &drag {
                DragState::Vertex(d) => d.restore(mesh),
                DragState::Edge(d) => d.restore(mesh),
                DragState::Idle => {}
            }
        }
        self.version += 1;
        Outcome::Applied
    }
}

//! Vertex / edge drag gestures.
//!
//! A gesture is opened by `start`, moved by any number of `update`s and
//! closed by `end` (or `cancel`). Only one gesture can be open at a time.
//! Coincident vertex-buffer entries (UV seams, split cube corners) are welded
//! for the duration of the gesture so the visible point or edge moves as one.

use std::collections::BTreeSet;

use glam::Vec3;
use shared::ObjectId;

use crate::mesh::MeshData;

#[derive(Debug, Clone, PartialEq)]
pub struct VertexDrag {
    pub object_id: ObjectId,
    /// Every vertex coincident with the grabbed one
    pub indices: Vec<usize>,
    pub position: Vec3,
    pub initial_position: Vec3,
    /// Buffer positions before the gesture, for `cancel`
    pub(crate) original: Vec<(usize, Vec3)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDrag {
    pub object_id: ObjectId,
    /// Every duplicate of the edge: coincident set of endpoint A × that of B
    pub pairs: Vec<(usize, usize)>,
    /// Union of both coincident sets
    pub connected: BTreeSet<usize>,
    /// Endpoint positions handed in at start
    pub endpoints: [Vec3; 2],
    /// Buffer position of each connected vertex at start
    pub initial_positions: Vec<(usize, Vec3)>,
    /// Current grab point; offsets are measured from here
    pub midpoint: Vec3,
}

/// Drag sub-state of the editor
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Vertex(VertexDrag),
    Edge(EdgeDrag),
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    pub fn object_id(&self) -> Option<&ObjectId> {
        match self {
            DragState::Idle => None,
            DragState::Vertex(d) => Some(&d.object_id),
            DragState::Edge(d) => Some(&d.object_id),
        }
    }
}

impl VertexDrag {
    /// Weld group around `index`. `None` when the index is out of range.
    pub fn begin(object_id: ObjectId, mesh: &MeshData, index: usize, position: Vec3) -> Option<Self> {
        let indices = mesh.coincident_vertices(index);
        if indices.is_empty() {
            return None;
        }
        let original = indices
            .iter()
            .filter_map(|&i| mesh.position(i).map(|p| (i, p)))
            .collect();
        Some(Self {
            object_id,
            indices,
            position,
            initial_position: position,
            original,
        })
    }

    /// Move the whole weld group to `position`
    pub fn apply(&mut self, mesh: &mut MeshData, position: Vec3) {
        for &i in &self.indices {
            mesh.set_position(i, position);
        }
        mesh.touch();
        mesh.compute_vertex_normals();
        self.position = position;
    }

    /// Put every welded vertex back where it was
    pub fn restore(&self, mesh: &mut MeshData) {
        for &(i, p) in &self.original {
            mesh.set_position(i, p);
        }
        mesh.touch();
        mesh.compute_vertex_normals();
    }
}

impl EdgeDrag {
    /// `None` when either endpoint is out of range.
    pub fn begin(
        object_id: ObjectId,
        mesh: &MeshData,
        edge: [usize; 2],
        endpoints: [Vec3; 2],
        midpoint: Vec3,
    ) -> Option<Self> {
        let a = mesh.coincident_vertices(edge[0]);
        let b = mesh.coincident_vertices(edge[1]);
        if a.is_empty() || b.is_empty() {
            return None;
        }

        let pairs = a
            .iter()
            .flat_map(|&va| b.iter().map(move |&vb| (va, vb)))
            .collect();
        let connected: BTreeSet<usize> = a.iter().chain(b.iter()).copied().collect();
        let initial_positions = connected
            .iter()
            .filter_map(|&i| mesh.position(i).map(|p| (i, p)))
            .collect();

        Some(Self {
            object_id,
            pairs,
            connected,
            endpoints,
            initial_positions,
            midpoint,
        })
    }

    /// Translate the edge so its grab point lands on `position`
    pub fn apply(&mut self, mesh: &mut MeshData, position: Vec3) {
        let offset = position - self.midpoint;
        for &i in &self.connected {
            if let Some(p) = mesh.position(i) {
                mesh.set_position(i, p + offset);
            }
        }
        mesh.touch();
        mesh.compute_vertex_normals();
        self.midpoint = position;
    }

    pub fn restore(&self, mesh: &mut MeshData) {
        for &(i, p) in &self.initial_positions {
            mesh.set_position(i, p);
        }
        mesh.touch();
        mesh.compute_vertex_normals();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_vertex_drag_welds_cube_corner() {
        let mut m = mesh::cube(2.0, 2.0, 2.0);
        let corner = m.position(0).unwrap();
        let mut drag = VertexDrag::begin("o".into(), &m, 0, corner).unwrap();
        assert_eq!(drag.indices.len(), 3);

        let target = Vec3::new(-3.0, -3.0, 3.0);
        drag.apply(&mut m, target);
        for &i in &drag.indices {
            assert!(approx(m.position(i).unwrap(), target));
        }
        assert_eq!(drag.position, target);
        assert_eq!(drag.initial_position, corner);
        assert_eq!(m.revision, 1);
    }

    #[test]
    fn test_vertex_drag_out_of_range() {
        let m = mesh::plane(1.0, 1.0);
        assert!(VertexDrag::begin("o".into(), &m, 4, Vec3::ZERO).is_none());
    }

    #[test]
    fn test_vertex_drag_restore() {
        let mut m = mesh::cube(1.0, 1.0, 1.0);
        let before = m.clone();
        let mut drag = VertexDrag::begin("o".into(), &m, 5, Vec3::ZERO).unwrap();
        drag.apply(&mut m, Vec3::splat(4.0));
        drag.restore(&mut m);
        for i in 0..m.vertex_count() {
            assert!(approx(m.position(i).unwrap(), before.position(i).unwrap()));
        }
    }

    #[test]
    fn test_edge_drag_pairs_are_cartesian_product() {
        let m = mesh::cube(1.0, 1.0, 1.0);
        // Front face bottom edge: vertices 0 and 1, each welded to 3 entries
        let a = m.position(0).unwrap();
        let b = m.position(1).unwrap();
        let drag = EdgeDrag::begin("o".into(), &m, [0, 1], [a, b], (a + b) * 0.5).unwrap();
        assert_eq!(drag.pairs.len(), 9);
        assert_eq!(drag.connected.len(), 6);
        assert_eq!(drag.initial_positions.len(), 6);
    }

    #[test]
    fn test_edge_drag_applies_offset() {
        let mut m = mesh::cube(1.0, 1.0, 1.0);
        let a = m.position(0).unwrap();
        let b = m.position(1).unwrap();
        let mid = (a + b) * 0.5;
        let mut drag = EdgeDrag::begin("o".into(), &m, [0, 1], [a, b], mid).unwrap();

        drag.apply(&mut m, mid + Vec3::new(0.0, -1.0, 0.0));
        drag.apply(&mut m, mid + Vec3::new(0.0, -2.0, 0.0));

        for &i in &drag.connected {
            let start = drag
                .initial_positions
                .iter()
                .find(|(j, _)| *j == i)
                .map(|(_, p)| *p)
                .unwrap();
            assert!(approx(m.position(i).unwrap(), start + Vec3::new(0.0, -2.0, 0.0)));
        }
        // Untouched vertex stays put
        let top = m.coincident_vertices(3);
        assert!(top.iter().all(|i| !drag.connected.contains(i)));
    }

    #[test]
    fn test_edge_drag_degenerate_edge_moves_once() {
        let mut m = mesh::cube(1.0, 1.0, 1.0);
        let a = m.position(0).unwrap();
        let mut drag = EdgeDrag::begin("o".into(), &m, [0, 0], [a, a], a).unwrap();
        assert_eq!(drag.connected.len(), 3);
        drag.apply(&mut m, a + Vec3::X);
        assert!(approx(m.position(0).unwrap(), a + Vec3::X));
    }

    #[test]
    fn test_drag_state_object_id() {
        let m = mesh::plane(1.0, 1.0);
        let drag = VertexDrag::begin("obj".into(), &m, 0, Vec3::ZERO).unwrap();
        let state = DragState::Vertex(drag);
        assert!(!state.is_idle());
        assert_eq!(state.object_id().map(String::as_str), Some("obj"));
        assert!(DragState::Idle.object_id().is_none());
    }
}

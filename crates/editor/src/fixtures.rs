//! Factory functions for creating test data.
//!
//! Provides helpers to construct `ObjectRecord`, `Group`, `SceneDocument`
//! and ready-made `SceneState`s used by tests and scripted sessions.

use shared::*;

use crate::state::SceneState;

// ── Record factories ────────────────────────────────────────────

/// Create an object record with an explicit primitive.
pub fn record(id: &str, name: &str, primitive: Primitive) -> ObjectRecord {
    ObjectRecord {
        id: id.to_string(),
        name: name.to_string(),
        primitive,
        transform: Transform::new(),
        material: Material::default(),
        visible: true,
        locked: false,
        group_id: None,
    }
}

/// Create a unit box record (1x1x1).
pub fn box_record(id: &str, name: &str) -> ObjectRecord {
    record(id, name, Primitive::unit_box())
}

/// Create a record at a specific position.
pub fn record_at(id: &str, name: &str, primitive: Primitive, pos: [f64; 3]) -> ObjectRecord {
    ObjectRecord {
        transform: Transform::at(pos),
        ..record(id, name, primitive)
    }
}

/// Create a group listing `members`. Member records must carry the
/// matching `group_id` (see [`grouped`]).
pub fn group(id: &str, name: &str, members: &[&str]) -> Group {
    Group {
        id: id.to_string(),
        name: name.to_string(),
        expanded: true,
        visible: true,
        locked: false,
        object_ids: members.iter().map(|m| m.to_string()).collect(),
    }
}

/// Mark a record as member of `group_id`.
pub fn grouped(mut rec: ObjectRecord, group_id: &str) -> ObjectRecord {
    rec.group_id = Some(group_id.to_string());
    rec
}

/// Create a light description with defaults for `kind`.
pub fn light(id: &str, kind: LightKind, pos: [f64; 3]) -> Light {
    Light::new(id.to_string(), format!("{} Light", kind.display_name()), kind, pos)
}

// ── Document factories ──────────────────────────────────────────

/// Create a document from objects and groups.
pub fn document(objects: Vec<ObjectRecord>, groups: Vec<Group>) -> SceneDocument {
    SceneDocument {
        objects,
        groups,
        ..SceneDocument::default()
    }
}

/// The classroom sample: two desks in a locked group, a free chair, a lamp.
pub fn classroom_document() -> SceneDocument {
    let desk = Primitive::Box {
        width: 1.2,
        height: 0.75,
        depth: 0.6,
    };
    let chair = Primitive::Cylinder {
        radius_top: 0.25,
        radius_bottom: 0.25,
        height: 0.45,
        radial_segments: 16,
    };
    let mut desks = group("desks", "Desks", &["desk1", "desk2"]);
    desks.locked = true;

    SceneDocument {
        objects: vec![
            grouped(record_at("desk1", "Desk 1", desk.clone(), [-1.0, 0.375, 0.0]), "desks"),
            grouped(record_at("desk2", "Desk 2", desk, [1.0, 0.375, 0.0]), "desks"),
            record_at("chair", "Chair", chair, [0.0, 0.225, 1.0]),
        ],
        groups: vec![desks],
        lights: vec![light("lamp", LightKind::Point, [0.0, 3.0, 0.0])],
        ..SceneDocument::default()
    }
}

// ── Scene factories ─────────────────────────────────────────────

/// Create a scene loaded from `doc`.
pub fn scene_from(doc: SceneDocument) -> SceneState {
    let mut scene = SceneState::new();
    scene.load_document(doc);
    scene
}

/// Create a scene with `n` unit boxes named `Cube1..=n`; returns their ids.
pub fn scene_with_cubes(n: usize) -> (SceneState, Vec<ObjectId>) {
    let mut scene = SceneState::new();
    let ids = (1..=n)
        .map(|i| scene.add_primitive(Primitive::unit_box(), format!("Cube{i}"), Transform::new()))
        .collect();
    (scene, ids)
}

/// Create a scene with one object of `primitive`, selected.
pub fn selected_scene(primitive: Primitive) -> (SceneState, ObjectId) {
    let mut scene = SceneState::new();
    let id = scene.add_primitive(primitive, "Object", Transform::new());
    scene.select_object(Some(id.as_str()));
    (scene, id)
}

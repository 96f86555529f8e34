//! Document export/import and autosave
//!
//! The document keeps each object's geometry descriptor, not its mesh
//! buffer: vertex edits do not survive a save/load round-trip.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::SystemTime;

use shared::{ObjectRecord, SceneDocument};

use super::{LightEntity, SceneObject, SceneState};

impl SceneState {
    /// Serializable projection of the persistent scene
    pub fn to_document(&self) -> SceneDocument {
        SceneDocument {
            version: 1,
            objects: self
                .objects
                .iter()
                .map(|o| ObjectRecord {
                    id: o.id.clone(),
                    name: o.name.clone(),
                    primitive: o.payload.primitive.clone(),
                    transform: o.payload.transform.clone(),
                    material: o.payload.material.clone(),
                    visible: o.visible,
                    locked: o.locked,
                    group_id: o.group_id.clone(),
                })
                .collect(),
            groups: self.groups.clone(),
            lights: self.lights.iter().map(|l| l.light.clone()).collect(),
            settings: self.settings.clone(),
        }
    }

    /// Replace the whole scene with `doc`.
    ///
    /// Meshes and native lights are rebuilt through the backend, broken group
    /// membership is repaired, and history restarts from the loaded scene.
    pub fn load_document(&mut self, doc: SceneDocument) {
        let mut objects: Vec<SceneObject> = Vec::with_capacity(doc.objects.len());
        let mut seen = HashSet::new();
        for record in doc.objects {
            if !seen.insert(record.id.clone()) {
                tracing::warn!("Dropping duplicate object id {}", record.id);
                continue;
            }
            let payload = self.build_payload(record.primitive, record.material, record.transform);
            objects.push(SceneObject {
                id: record.id,
                name: record.name,
                payload,
                visible: record.visible,
                locked: record.locked,
                group_id: record.group_id,
            });
        }

        let mut groups = doc.groups;
        let mut owner: HashMap<String, String> = HashMap::new();
        for group in &mut groups {
            let before = group.object_ids.len();
            let group_id = group.id.clone();
            group.object_ids.retain(|id| {
                seen.contains(id) && !owner.contains_key(id) && {
                    owner.insert(id.clone(), group_id.clone());
                    true
                }
            });
            if group.object_ids.len() != before {
                tracing::warn!(
                    "Group {} listed {} unknown or already grouped objects",
                    group.id,
                    before - group.object_ids.len()
                );
            }
        }
        for obj in &mut objects {
            if let Some(group_id) = owner.get(&obj.id) {
                obj.group_id = Some(group_id.clone());
                continue;
            }
            let Some(wanted) = obj.group_id.take() else {
                continue;
            };
            match groups.iter_mut().find(|g| g.id == wanted) {
                Some(group) => {
                    group.object_ids.push(obj.id.clone());
                    obj.group_id = Some(wanted);
                }
                None => tracing::warn!("Object {} referenced missing group {wanted}", obj.id),
            }
        }

        self.lights = doc
            .lights
            .into_iter()
            .map(|light| LightEntity {
                native: self.backend.create_light(&light),
                light,
            })
            .collect();
        self.objects = objects;
        self.groups = groups;
        self.settings = doc.settings;

        self.clear_selection();
        self.modes.on_deselect();
        self.placement = None;
        self.reset_history();
        self.version += 1;
        self.unsaved = false;

        tracing::info!(
            "Loaded scene: {} objects, {} groups, {} lights",
            self.objects.len(),
            self.groups.len(),
            self.lights.len()
        );
    }

    pub fn export_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(&self.to_document()).map_err(|e| format!("Serialize error: {e}"))
    }

    pub fn import_json(&mut self, json: &str) -> Result<(), String> {
        let doc: SceneDocument = serde_json::from_str(json).map_err(|e| format!("Parse error: {e}"))?;
        self.load_document(doc);
        Ok(())
    }

    /// Write the scene to `path` and mark it saved
    pub fn save_to_path(&mut self, path: &Path) -> Result<(), String> {
        let json = self.export_json()?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
        self.mark_saved();
        tracing::info!("Saved scene to {}", path.display());
        Ok(())
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<(), String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        self.import_json(&json)?;
        self.last_saved = Some(SystemTime::now());
        Ok(())
    }

    fn autosave_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "classroom", "classroom-editor")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Save scene to autosave file
    pub fn autosave(&self) {
        let Some(path) = Self::autosave_path() else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match self.export_json() {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::error!("Autosave failed: {e}");
                }
            }
            Err(e) => tracing::error!("Autosave failed: {e}"),
        }
    }

    /// Load scene from autosave file
    pub fn load_autosave() -> Option<SceneDocument> {
        let path = Self::autosave_path()?;
        let json = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&json).ok()
    }

    pub fn has_autosave() -> bool {
        Self::autosave_path().is_some_and(|p| p.exists())
    }

    pub fn mark_saved(&mut self) {
        self.unsaved = false;
        self.last_saved = Some(SystemTime::now());
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn last_saved(&self) -> Option<SystemTime> {
        self.last_saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Group, LightKind, Primitive, Transform};

    #[test]
    fn test_document_round_trip() {
        let mut scene = SceneState::new();
        let a = scene.add_primitive(Primitive::unit_box(), "A", Transform::at([1.0, 2.0, 3.0]));
        scene.add_primitive(Primitive::sphere(0.5), "B", Transform::new());
        scene.create_group("G", &[a.clone()]).unwrap();
        scene.add_light(LightKind::Spot, None);

        let json = scene.export_json().unwrap();
        let mut loaded = SceneState::new();
        loaded.import_json(&json).unwrap();

        assert_eq!(loaded.to_document(), scene.to_document());
        assert!(!loaded.can_undo());
        assert!(!loaded.has_unsaved_changes());
        assert_eq!(loaded.get_object(&a).unwrap().payload.mesh.vertex_count(), 24);
    }

    #[test]
    fn test_load_repairs_group_references() {
        let mut doc = SceneDocument::default();
        let record = |id: &str, group: Option<&str>| ObjectRecord {
            id: id.to_string(),
            name: id.to_string(),
            primitive: Primitive::unit_box(),
            transform: Transform::new(),
            material: Default::default(),
            visible: true,
            locked: false,
            group_id: group.map(str::to_string),
        };
        doc.objects.push(record("a", Some("g1")));
        doc.objects.push(record("b", Some("missing")));
        doc.objects.push(record("c", Some("g2")));
        doc.groups.push(Group {
            id: "g1".into(),
            name: "G1".into(),
            expanded: true,
            visible: true,
            locked: false,
            object_ids: vec!["a".into(), "ghost".into()],
        });
        doc.groups.push(Group {
            id: "g2".into(),
            name: "G2".into(),
            expanded: true,
            visible: true,
            locked: false,
            object_ids: vec!["a".into()],
        });

        let mut scene = SceneState::new();
        scene.load_document(doc);

        assert_eq!(scene.get_group("g1").unwrap().object_ids, vec!["a".to_string()]);
        assert_eq!(scene.get_group("g2").unwrap().object_ids, vec!["c".to_string()]);
        assert!(scene.get_object("b").unwrap().group_id.is_none());
        assert_eq!(scene.get_object("c").unwrap().group_id.as_deref(), Some("g2"));
    }

    #[test]
    fn test_dirty_tracking() {
        let mut scene = SceneState::new();
        assert!(!scene.has_unsaved_changes());
        scene.add_primitive(Primitive::unit_box(), "A", Transform::new());
        assert!(scene.has_unsaved_changes());
        scene.mark_saved();
        assert!(!scene.has_unsaved_changes());
        assert!(scene.last_saved().is_some());
    }

    #[test]
    fn test_import_rejects_garbage() {
        let mut scene = SceneState::new();
        assert!(scene.import_json("{not json").is_err());
    }
}

//! Object CRUD operations

use shared::{ObjectId, Primitive, Transform};

use super::{Renderable, SceneObject, SceneState};
use crate::state::outcome::{Outcome, Refusal};
use crate::state::selection::Selection;

impl SceneState {
    /// Existing and effectively unlocked
    pub(crate) fn check_editable(&self, id: &str) -> Result<(), Refusal> {
        if self.get_object(id).is_none() {
            return Err(Refusal::NotFound);
        }
        if self.is_locked(id) {
            return Err(Refusal::Locked);
        }
        Ok(())
    }

    /// Deselect `id` if it is the selected object
    fn deselect_if(&mut self, id: &str) {
        if self.selection.is_object(id) {
            self.clear_selection();
            self.modes.on_deselect();
        }
    }

    /// Add a fully built object to the scene
    pub fn add_object(&mut self, payload: Renderable, name: impl Into<String>) -> ObjectId {
        let id = Self::new_id();
        self.objects.push(SceneObject {
            id: id.clone(),
            name: name.into(),
            payload,
            visible: true,
            locked: false,
            group_id: None,
        });
        self.save_to_history();
        id
    }

    /// Build the mesh for `primitive` through the backend and add it
    pub fn add_primitive(
        &mut self,
        primitive: Primitive,
        name: impl Into<String>,
        transform: Transform,
    ) -> ObjectId {
        let material = shared::Material::with_color(self.editor.default_object_color.clone());
        let payload = self.build_payload(primitive, material, transform);
        self.add_object(payload, name)
    }

    /// Delete an object and strip it from its group
    pub fn remove_object(&mut self, id: &str) -> Outcome {
        if let Err(r) = self.check_editable(id) {
            return self.refuse("remove_object", r);
        }

        for group in &mut self.groups {
            group.object_ids.retain(|o| o != id);
        }
        self.objects.retain(|o| o.id != id);
        self.deselect_if(id);

        self.save_to_history();
        Outcome::Applied
    }

    pub fn toggle_visibility(&mut self, id: &str) -> Outcome {
        if let Err(r) = self.check_editable(id) {
            return self.refuse("toggle_visibility", r);
        }

        let Some(obj) = self.get_object_mut(id) else {
            return Outcome::Refused(Refusal::NotFound);
        };
        obj.visible = !obj.visible;
        if !obj.visible {
            self.deselect_if(id);
        }

        self.save_to_history();
        Outcome::Applied
    }

    /// Flip the object's own lock. Only a locked owning group prevents this.
    pub fn toggle_lock(&mut self, id: &str) -> Outcome {
        let Some(obj) = self.get_object(id) else {
            return self.refuse("toggle_lock", Refusal::NotFound);
        };
        let group_locked = obj
            .group_id
            .as_deref()
            .and_then(|g| self.get_group(g))
            .is_some_and(|g| g.locked);
        if group_locked {
            return self.refuse("toggle_lock", Refusal::Locked);
        }

        let Some(obj) = self.get_object_mut(id) else {
            return Outcome::Refused(Refusal::NotFound);
        };
        obj.locked = !obj.locked;
        if obj.locked {
            self.deselect_if(id);
        }

        self.save_to_history();
        Outcome::Applied
    }

    pub fn rename_object(&mut self, id: &str, name: impl Into<String>) -> Outcome {
        if let Err(r) = self.check_editable(id) {
            return self.refuse("rename_object", r);
        }
        if let Some(obj) = self.get_object_mut(id) {
            obj.name = name.into();
        }
        self.save_to_history();
        Outcome::Applied
    }

    /// Commit a gizmo transform
    pub fn set_object_transform(&mut self, id: &str, transform: Transform) -> Outcome {
        if let Err(r) = self.check_editable(id) {
            return self.refuse("set_object_transform", r);
        }
        if let Some(obj) = self.get_object_mut(id) {
            obj.payload.transform = transform;
        }
        self.save_to_history();
        Outcome::Applied
    }

    /// Recolor the selected object
    pub fn update_object_color(&mut self, color: impl Into<String>) -> Outcome {
        let id = match self.editable_selection() {
            Ok(id) => id,
            Err(r) => return self.refuse("update_object_color", r),
        };
        if let Some(obj) = self.get_object_mut(&id) {
            obj.payload.material.color = color.into();
        }
        self.save_to_history();
        Outcome::Applied
    }

    /// Set the selected object's opacity, clamped to [0, 1]
    pub fn update_object_opacity(&mut self, opacity: f32) -> Outcome {
        let id = match self.editable_selection() {
            Ok(id) => id,
            Err(r) => return self.refuse("update_object_opacity", r),
        };
        let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
        if let Some(obj) = self.get_object_mut(&id) {
            obj.payload.material.opacity = opacity;
            obj.payload.material.transparent = opacity < 1.0;
        }
        self.save_to_history();
        Outcome::Applied
    }

    /// Copy the selected object next to itself and select the copy
    pub fn duplicate_object(&mut self) -> Result<ObjectId, Refusal> {
        let source_id = self
            .editable_selection()
            .map_err(|r| self.reject("duplicate_object", r))?;
        let Some(source) = self.get_object(&source_id) else {
            return Err(Refusal::NoSelection);
        };

        let id = Self::new_id();
        let mut payload = source.payload.clone();
        payload.transform.position[0] += self.editor.duplicate_offset;
        let copy = SceneObject {
            id: id.clone(),
            name: format!("{} Copy", source.name),
            payload,
            visible: true,
            locked: false,
            group_id: source.group_id.clone(),
        };

        if let Some(group_id) = copy.group_id.clone() {
            if let Some(group) = self.get_group_mut(&group_id) {
                group.object_ids.push(id.clone());
            }
        }
        self.objects.push(copy);
        self.selection = Selection::Object(id.clone());
        self.elements.clear();

        self.save_to_history();
        Ok(id)
    }

    /// Flip the selected object along X
    pub fn mirror_object(&mut self) -> Outcome {
        let id = match self.editable_selection() {
            Ok(id) => id,
            Err(r) => return self.refuse("mirror_object", r),
        };
        if let Some(obj) = self.get_object_mut(&id) {
            obj.payload.transform.scale[0] = -obj.payload.transform.scale[0];
        }
        self.save_to_history();
        Outcome::Applied
    }

    /// Rebuild the selected sphere / cylinder / cone with `count` radial segments.
    /// Vertex edits on the old mesh are discarded.
    pub fn update_vertex_count(&mut self, count: u32) -> Outcome {
        let id = match self.editable_selection() {
            Ok(id) => id,
            Err(r) => return self.refuse("update_vertex_count", r),
        };
        if !self.drag.is_idle() {
            return self.refuse("update_vertex_count", Refusal::DragInProgress);
        }
        let Some(primitive) = self
            .get_object(&id)
            .and_then(|o| o.payload.primitive.with_segments(count))
        else {
            return self.refuse("update_vertex_count", Refusal::UnsupportedGeometry);
        };

        let mesh = self.backend.build_mesh(&primitive);
        if let Some(obj) = self.get_object_mut(&id) {
            obj.payload.primitive = primitive;
            obj.payload.mesh = std::sync::Arc::new(mesh);
        }
        self.elements.clear();

        self.save_to_history();
        Outcome::Applied
    }

    /// Remove every object, group and light
    pub fn reset_scene(&mut self) -> Outcome {
        if !self.drag.is_idle() {
            return self.refuse("reset_scene", Refusal::DragInProgress);
        }
        self.objects.clear();
        self.groups.clear();
        self.lights.clear();
        self.clear_selection();
        self.modes.on_deselect();

        self.save_to_history();
        tracing::info!("Scene reset");
        Outcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::selection::{EditMode, TransformMode};

    fn scene_with_box() -> (SceneState, ObjectId) {
        let mut scene = SceneState::new();
        let id = scene.add_primitive(Primitive::unit_box(), "Cube", Transform::new());
        (scene, id)
    }

    #[test]
    fn test_add_object_defaults() {
        let (scene, id) = scene_with_box();
        let obj = scene.get_object(&id).unwrap();
        assert!(obj.visible);
        assert!(!obj.locked);
        assert!(obj.group_id.is_none());
        assert_eq!(obj.payload.material.color, "#44aa88");
        assert_eq!(obj.payload.mesh.vertex_count(), 24);
        assert!(scene.can_undo());
    }

    #[test]
    fn test_remove_unknown_is_refused() {
        let (mut scene, _) = scene_with_box();
        let v = scene.version();
        assert_eq!(scene.remove_object("nope"), Outcome::Refused(Refusal::NotFound));
        assert_eq!(scene.version(), v);
    }

    #[test]
    fn test_remove_clears_selection() {
        let (mut scene, id) = scene_with_box();
        scene.select_object(Some(id.as_str()));
        assert!(scene.remove_object(&id).is_applied());
        assert!(scene.selection().is_none());
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn test_locked_object_refuses_edits() {
        let (mut scene, id) = scene_with_box();
        assert!(scene.toggle_lock(&id).is_applied());
        assert_eq!(scene.rename_object(&id, "X"), Outcome::Refused(Refusal::Locked));
        assert_eq!(scene.toggle_visibility(&id), Outcome::Refused(Refusal::Locked));
        assert_eq!(scene.get_object(&id).unwrap().name, "Cube");
        // Own lock can always be released
        assert!(scene.toggle_lock(&id).is_applied());
        assert!(scene.rename_object(&id, "X").is_applied());
    }

    #[test]
    fn test_hiding_selected_deselects() {
        let (mut scene, id) = scene_with_box();
        scene.select_object(Some(id.as_str()));
        scene.toggle_visibility(&id);
        assert!(scene.selection().is_none());
        assert!(!scene.is_visible(&id));
    }

    #[test]
    fn test_opacity_clamped_and_transparent() {
        let (mut scene, id) = scene_with_box();
        scene.select_object(Some(id.as_str()));
        scene.update_object_opacity(1.7);
        let m = &scene.get_object(&id).unwrap().payload.material;
        assert_eq!(m.opacity, 1.0);
        assert!(!m.transparent);
        scene.update_object_opacity(0.25);
        let m = &scene.get_object(&id).unwrap().payload.material;
        assert_eq!(m.opacity, 0.25);
        assert!(m.transparent);
    }

    #[test]
    fn test_color_without_selection() {
        let (mut scene, _) = scene_with_box();
        assert_eq!(scene.update_object_color("#ff0000"), Outcome::Refused(Refusal::NoSelection));
    }

    #[test]
    fn test_duplicate_offsets_and_selects_copy() {
        let (mut scene, id) = scene_with_box();
        scene.select_object(Some(id.as_str()));
        let copy = scene.duplicate_object().unwrap();
        assert_ne!(copy, id);
        let obj = scene.get_object(&copy).unwrap();
        assert_eq!(obj.name, "Cube Copy");
        assert_eq!(obj.payload.transform.position, [1.0, 0.0, 0.0]);
        assert!(scene.selection().is_object(&copy));
    }

    #[test]
    fn test_duplicate_joins_group() {
        let (mut scene, id) = scene_with_box();
        let group = scene.create_group("G", &[id.clone()]).unwrap();
        scene.select_object(Some(id.as_str()));
        let copy = scene.duplicate_object().unwrap();
        assert_eq!(scene.get_object(&copy).unwrap().group_id.as_deref(), Some(group.as_str()));
        assert_eq!(scene.get_group(&group).unwrap().object_ids, vec![id, copy]);
    }

    #[test]
    fn test_mirror_negates_x_scale() {
        let (mut scene, id) = scene_with_box();
        scene.select_object(Some(id.as_str()));
        scene.mirror_object();
        assert_eq!(scene.get_object(&id).unwrap().payload.transform.scale, [-1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_update_vertex_count() {
        let mut scene = SceneState::new();
        let id = scene.add_primitive(Primitive::cylinder(0.5, 1.0), "Cyl", Transform::new());
        scene.select_object(Some(id.as_str()));
        let before = scene.get_object(&id).unwrap().payload.mesh.vertex_count();
        assert!(scene.update_vertex_count(8).is_applied());
        let after = scene.get_object(&id).unwrap().payload.mesh.vertex_count();
        assert!(after < before);
        assert_eq!(scene.edit_mode(), EditMode::Vertex);
    }

    #[test]
    fn test_update_vertex_count_is_capped() {
        let mut scene = SceneState::new();
        let id = scene.add_primitive(Primitive::cylinder(0.5, 1.0), "Cyl", Transform::new());
        scene.select_object(Some(id.as_str()));
        assert!(scene.update_vertex_count(2_000_000).is_applied());

        let obj = scene.get_object(&id).unwrap();
        assert!(matches!(
            obj.payload.primitive,
            Primitive::Cylinder { radial_segments, .. } if radial_segments == shared::MAX_SEGMENTS
        ));
        let capped = crate::mesh::cylinder(0.5, 0.5, 1.0, shared::MAX_SEGMENTS);
        assert_eq!(obj.payload.mesh.vertex_count(), capped.vertex_count());
    }

    #[test]
    fn test_add_primitive_stores_capped_segments() {
        let mut scene = SceneState::new();
        let cone = Primitive::Cone {
            radius: 0.5,
            height: 1.0,
            radial_segments: u32::MAX,
        };
        let id = scene.add_primitive(cone, "Cone", Transform::new());
        assert_eq!(
            scene.get_object(&id).unwrap().payload.primitive,
            Primitive::Cone {
                radius: 0.5,
                height: 1.0,
                radial_segments: shared::MAX_SEGMENTS
            }
        );
    }

    #[test]
    fn test_update_vertex_count_box_refused() {
        let (mut scene, id) = scene_with_box();
        scene.select_object(Some(id.as_str()));
        assert_eq!(
            scene.update_vertex_count(8),
            Outcome::Refused(Refusal::UnsupportedGeometry)
        );
    }

    #[test]
    fn test_reset_scene() {
        let (mut scene, id) = scene_with_box();
        scene.set_transform_mode(TransformMode::Translate);
        scene.select_object(Some(id.as_str()));
        scene.add_light(shared::LightKind::Point, None);
        assert!(scene.reset_scene().is_applied());
        assert_eq!(scene.object_count(), 0);
        assert!(scene.lights().is_empty());
        assert!(scene.can_undo());
        scene.undo();
        assert_eq!(scene.object_count(), 1);
    }
}

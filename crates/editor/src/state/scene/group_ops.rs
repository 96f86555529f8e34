//! Group operations
//!
//! Every operation keeps membership single-parent: an object id is listed by
//! at most one group, and its `group_id` names that group.

use shared::{Group, GroupId, ObjectId};

use super::SceneState;
use crate::state::outcome::{Outcome, Refusal};

impl SceneState {
    /// Strip `object_id` from every group and clear its back-reference
    fn detach(&mut self, object_id: &str) {
        for group in &mut self.groups {
            group.object_ids.retain(|o| o != object_id);
        }
        if let Some(obj) = self.get_object_mut(object_id) {
            obj.group_id = None;
        }
    }

    /// Move `object_id` into `group_id` (both assumed to exist)
    fn attach(&mut self, object_id: &str, group_id: &str) {
        self.detach(object_id);
        if let Some(group) = self.get_group_mut(group_id) {
            group.object_ids.push(object_id.to_string());
        }
        if let Some(obj) = self.get_object_mut(object_id) {
            obj.group_id = Some(group_id.to_string());
        }
    }

    fn check_group(&self, id: &str) -> Result<&Group, Refusal> {
        let group = self.get_group(id).ok_or(Refusal::NotFound)?;
        if group.locked {
            return Err(Refusal::Locked);
        }
        Ok(group)
    }

    /// Deselect the selected object if it belongs to `group_id`
    fn deselect_member_of(&mut self, group_id: &str) {
        let member = self
            .selected_object()
            .is_some_and(|o| o.group_id.as_deref() == Some(group_id));
        if member {
            self.clear_selection();
            self.modes.on_deselect();
        }
    }

    /// Create a group from `seeds`. Unknown ids are skipped; seeds leave
    /// their previous group.
    pub fn create_group(&mut self, name: impl Into<String>, seeds: &[ObjectId]) -> Result<GroupId, Refusal> {
        if seeds.iter().any(|id| self.is_locked(id)) {
            return Err(self.reject("create_group", Refusal::Locked));
        }

        let id = Self::new_id();
        self.groups.push(Group {
            id: id.clone(),
            name: name.into(),
            expanded: true,
            visible: true,
            locked: false,
            object_ids: Vec::new(),
        });
        for seed in seeds {
            let known = self.get_object(seed).is_some();
            let seen = self.get_group(&id).is_some_and(|g| g.contains(seed));
            if known && !seen {
                self.attach(seed, &id);
            }
        }

        self.save_to_history();
        Ok(id)
    }

    /// Delete a group; members stay in the scene ungrouped
    pub fn remove_group(&mut self, id: &str) -> Outcome {
        if let Err(r) = self.check_group(id) {
            return self.refuse("remove_group", r);
        }

        for obj in &mut self.objects {
            if obj.group_id.as_deref() == Some(id) {
                obj.group_id = None;
            }
        }
        self.groups.retain(|g| g.id != id);

        self.save_to_history();
        Outcome::Applied
    }

    pub fn add_object_to_group(&mut self, object_id: &str, group_id: &str) -> Outcome {
        if let Err(r) = self.check_editable(object_id) {
            return self.refuse("add_object_to_group", r);
        }
        if let Err(r) = self.check_group(group_id) {
            return self.refuse("add_object_to_group", r);
        }

        self.attach(object_id, group_id);
        self.save_to_history();
        Outcome::Applied
    }

    pub fn remove_object_from_group(&mut self, object_id: &str) -> Outcome {
        if let Err(r) = self.check_editable(object_id) {
            return self.refuse("remove_object_from_group", r);
        }
        if self.get_object(object_id).is_some_and(|o| o.group_id.is_none()) {
            return self.refuse("remove_object_from_group", Refusal::NotInGroup);
        }

        self.detach(object_id);
        self.save_to_history();
        Outcome::Applied
    }

    /// Outliner fold state. Not an edit: no history entry, no unsaved mark.
    pub fn toggle_group_expanded(&mut self, id: &str) -> Outcome {
        let Some(group) = self.get_group_mut(id) else {
            return self.refuse("toggle_group_expanded", Refusal::NotFound);
        };
        group.expanded = !group.expanded;
        self.version += 1;
        Outcome::Applied
    }

    /// Flip group visibility and push it onto every member
    pub fn toggle_group_visibility(&mut self, id: &str) -> Outcome {
        if let Err(r) = self.check_group(id) {
            return self.refuse("toggle_group_visibility", r);
        }

        let Some(group) = self.get_group_mut(id) else {
            return Outcome::Refused(Refusal::NotFound);
        };
        group.visible = !group.visible;
        let visible = group.visible;
        let members = group.object_ids.clone();
        for obj in self.objects.iter_mut().filter(|o| members.contains(&o.id)) {
            obj.visible = visible;
        }
        if !visible {
            self.deselect_member_of(id);
        }

        self.save_to_history();
        Outcome::Applied
    }

    /// Flip the group lock. Member flags are untouched; the lock applies
    /// to them through `is_locked`.
    pub fn toggle_group_lock(&mut self, id: &str) -> Outcome {
        let Some(group) = self.get_group_mut(id) else {
            return self.refuse("toggle_group_lock", Refusal::NotFound);
        };
        group.locked = !group.locked;
        if group.locked {
            self.deselect_member_of(id);
        }

        self.save_to_history();
        Outcome::Applied
    }

    pub fn rename_group(&mut self, id: &str, name: impl Into<String>) -> Outcome {
        if let Err(r) = self.check_group(id) {
            return self.refuse("rename_group", r);
        }
        if let Some(group) = self.get_group_mut(id) {
            group.name = name.into();
        }
        self.save_to_history();
        Outcome::Applied
    }

    /// Move `ids` into `group_id`, or out of any group with `None`.
    /// Unknown ids are skipped.
    pub fn move_objects_to_group(&mut self, ids: &[ObjectId], group_id: Option<&str>) -> Outcome {
        if let Some(gid) = group_id {
            if let Err(r) = self.check_group(gid) {
                return self.refuse("move_objects_to_group", r);
            }
        }
        if ids.iter().any(|id| self.is_locked(id)) {
            return self.refuse("move_objects_to_group", Refusal::Locked);
        }

        for id in ids {
            if self.get_object(id).is_none() {
                continue;
            }
            match group_id {
                Some(gid) => self.attach(id, gid),
                None => self.detach(id),
            }
        }

        self.save_to_history();
        Outcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Primitive, Transform};

    fn scene_with(n: usize) -> (SceneState, Vec<ObjectId>) {
        let mut scene = SceneState::new();
        let ids = (0..n)
            .map(|i| scene.add_primitive(Primitive::unit_box(), format!("Cube{i}"), Transform::new()))
            .collect();
        (scene, ids)
    }

    fn assert_single_parent(scene: &SceneState) {
        for obj in scene.objects() {
            let owners: Vec<_> = scene.groups().iter().filter(|g| g.contains(&obj.id)).collect();
            assert!(owners.len() <= 1, "{} listed by {} groups", obj.id, owners.len());
            assert_eq!(owners.first().map(|g| g.id.clone()), obj.group_id);
        }
    }

    #[test]
    fn test_create_group_sets_back_references() {
        let (mut scene, ids) = scene_with(2);
        let g = scene.create_group("G", &ids).unwrap();
        assert_eq!(scene.get_group(&g).unwrap().object_ids, ids);
        assert_single_parent(&scene);
    }

    #[test]
    fn test_create_group_steals_from_previous() {
        let (mut scene, ids) = scene_with(2);
        let g1 = scene.create_group("G1", &ids).unwrap();
        let g2 = scene.create_group("G2", &ids[..1]).unwrap();
        assert_eq!(scene.get_group(&g1).unwrap().object_ids, vec![ids[1].clone()]);
        assert_eq!(scene.get_group(&g2).unwrap().object_ids, vec![ids[0].clone()]);
        assert_single_parent(&scene);
    }

    #[test]
    fn test_create_group_ignores_unknown_and_duplicates() {
        let (mut scene, ids) = scene_with(1);
        let seeds = vec![ids[0].clone(), "ghost".to_string(), ids[0].clone()];
        let g = scene.create_group("G", &seeds).unwrap();
        assert_eq!(scene.get_group(&g).unwrap().object_ids, ids);
    }

    #[test]
    fn test_create_group_with_locked_seed_refused() {
        let (mut scene, ids) = scene_with(1);
        scene.toggle_lock(&ids[0]);
        assert_eq!(scene.create_group("G", &ids), Err(Refusal::Locked));
        assert!(scene.groups().is_empty());
    }

    #[test]
    fn test_remove_group_keeps_members() {
        let (mut scene, ids) = scene_with(2);
        let g = scene.create_group("G", &ids).unwrap();
        assert!(scene.remove_group(&g).is_applied());
        assert_eq!(scene.object_count(), 2);
        assert!(scene.objects().iter().all(|o| o.group_id.is_none()));
    }

    #[test]
    fn test_remove_from_group_when_ungrouped() {
        let (mut scene, ids) = scene_with(1);
        assert_eq!(
            scene.remove_object_from_group(&ids[0]),
            Outcome::Refused(Refusal::NotInGroup)
        );
    }

    #[test]
    fn test_group_visibility_cascades() {
        let (mut scene, ids) = scene_with(2);
        let g = scene.create_group("G", &ids).unwrap();
        scene.select_object(Some(ids[0].as_str()));
        scene.toggle_group_visibility(&g);
        assert!(scene.objects().iter().all(|o| !o.visible));
        assert!(scene.selection().is_none());
        scene.toggle_group_visibility(&g);
        assert!(ids.iter().all(|id| scene.is_visible(id)));
    }

    #[test]
    fn test_group_lock_applies_through_cascade() {
        let (mut scene, ids) = scene_with(1);
        let g = scene.create_group("G", &ids).unwrap();
        scene.select_object(Some(ids[0].as_str()));
        scene.toggle_group_lock(&g);
        assert!(scene.selection().is_none());
        assert!(!scene.get_object(&ids[0]).unwrap().locked);
        assert!(scene.is_locked(&ids[0]));
        assert!(!scene.can_select(&ids[0]));
        assert_eq!(scene.toggle_lock(&ids[0]), Outcome::Refused(Refusal::Locked));
        assert_eq!(scene.rename_group(&g, "New"), Outcome::Refused(Refusal::Locked));
    }

    #[test]
    fn test_move_objects_between_groups() {
        let (mut scene, ids) = scene_with(3);
        let g1 = scene.create_group("G1", &ids[..2]).unwrap();
        let g2 = scene.create_group("G2", &ids[2..]).unwrap();
        let moving = vec![ids[0].clone(), "ghost".to_string(), ids[2].clone()];
        assert!(scene.move_objects_to_group(&moving, Some(g1.as_str())).is_applied());
        assert_single_parent(&scene);
        assert!(scene.get_group(&g2).unwrap().object_ids.is_empty());
        assert_eq!(scene.get_group(&g1).unwrap().object_ids.len(), 3);

        scene.move_objects_to_group(&ids, None);
        assert!(scene.groups().iter().all(|g| g.object_ids.is_empty()));
        assert_single_parent(&scene);
    }

    #[test]
    fn test_toggle_expanded_and_rename() {
        let (mut scene, ids) = scene_with(1);
        let g = scene.create_group("G", &ids).unwrap();
        scene.toggle_group_expanded(&g);
        assert!(!scene.get_group(&g).unwrap().expanded);
        scene.rename_group(&g, "Desks");
        assert_eq!(scene.get_group(&g).unwrap().name, "Desks");
    }

    #[test]
    fn test_toggle_expanded_records_no_history() {
        let (mut scene, ids) = scene_with(1);
        let g = scene.create_group("G", &ids).unwrap();
        scene.mark_saved();
        let len = scene.history_len();

        assert!(scene.toggle_group_expanded(&g).is_applied());
        assert_eq!(scene.history_len(), len);
        assert!(!scene.has_unsaved_changes());

        // Undo reverts the grouping, not the fold
        assert!(scene.undo().is_applied());
        assert!(scene.groups().is_empty());
    }
}

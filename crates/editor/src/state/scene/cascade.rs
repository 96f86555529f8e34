//! Effective lock / visibility through group membership

use super::SceneState;

impl SceneState {
    fn owning_group(&self, object_id: &str) -> Option<&shared::Group> {
        let group_id = self.get_object(object_id)?.group_id.as_deref()?;
        self.get_group(group_id)
    }

    /// Own lock flag or owning group's lock. Unknown ids are not locked.
    pub fn is_locked(&self, object_id: &str) -> bool {
        let Some(obj) = self.get_object(object_id) else {
            return false;
        };
        obj.locked || self.owning_group(object_id).is_some_and(|g| g.locked)
    }

    /// Own visibility and owning group's visibility
    pub fn is_visible(&self, object_id: &str) -> bool {
        let Some(obj) = self.get_object(object_id) else {
            return false;
        };
        obj.visible && self.owning_group(object_id).map_or(true, |g| g.visible)
    }

    pub fn can_select(&self, object_id: &str) -> bool {
        !self.is_locked(object_id)
    }
}

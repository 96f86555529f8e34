//! Click-to-place flow: stage an object, then drop it at a picked point

use shared::{Material, ObjectId, Transform};

use super::SceneState;
use crate::state::outcome::{Outcome, Refusal};
use crate::state::placement::PendingPlacement;
use crate::state::selection::Selection;

impl SceneState {
    /// Stage `pending` for placement. Selection and active tool modes are
    /// cleared until the object is dropped.
    pub fn start_object_placement(&mut self, pending: PendingPlacement) -> Outcome {
        if !self.drag.is_idle() {
            return self.refuse("start_object_placement", Refusal::DragInProgress);
        }
        self.clear_selection();
        self.modes.suspend();
        tracing::debug!("Placing {}", pending.name);
        self.placement = Some(pending);
        Outcome::Applied
    }

    /// Drop the staged object at `position` and select it
    pub fn place_object_at(&mut self, position: [f64; 3], rotation: Option<[f64; 3]>) -> Result<ObjectId, Refusal> {
        let Some(pending) = self.placement.take() else {
            return Err(self.reject("place_object_at", Refusal::NotPlacing));
        };

        let color = pending
            .color
            .unwrap_or_else(|| self.editor.default_object_color.clone());
        let transform = Transform {
            position,
            rotation: rotation.unwrap_or([0.0; 3]),
            ..Transform::new()
        };
        let kind = pending.primitive.kind();
        let payload = self.build_payload(pending.primitive, Material::with_color(color), transform);
        let id = self.add_object(payload, pending.name);

        self.selection = Selection::Object(id.clone());
        self.elements.clear();
        self.modes.on_place(kind);
        Ok(id)
    }

    pub fn cancel_object_placement(&mut self) -> Outcome {
        if self.placement.take().is_none() {
            return self.refuse("cancel_object_placement", Refusal::NotPlacing);
        }
        Outcome::Applied
    }
}

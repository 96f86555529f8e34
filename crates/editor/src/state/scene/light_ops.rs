//! Light and scene settings operations

use serde::{Deserialize, Serialize};
use shared::{Light, LightId, LightKind};

use super::{LightEntity, SceneState};
use crate::state::outcome::{Outcome, Refusal};
use crate::state::selection::Selection;

/// Partial light update; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightUpdate {
    pub name: Option<String>,
    pub position: Option<[f64; 3]>,
    pub target: Option<[f64; 3]>,
    pub intensity: Option<f64>,
    pub color: Option<String>,
    pub visible: Option<bool>,
    pub cast_shadow: Option<bool>,
    pub distance: Option<f64>,
    pub decay: Option<f64>,
    pub angle: Option<f64>,
    pub penumbra: Option<f64>,
}

impl LightUpdate {
    fn apply_to(self, light: &mut Light) {
        if let Some(v) = self.name {
            light.name = v;
        }
        if let Some(v) = self.position {
            light.position = v;
        }
        if let Some(v) = self.target {
            light.target = v;
        }
        if let Some(v) = self.intensity {
            light.intensity = v.max(0.0);
        }
        if let Some(v) = self.color {
            light.color = v;
        }
        if let Some(v) = self.visible {
            light.visible = v;
        }
        if let Some(v) = self.cast_shadow {
            light.cast_shadow = v;
        }
        if let Some(v) = self.distance {
            light.distance = v.max(0.0);
        }
        if let Some(v) = self.decay {
            light.decay = v;
        }
        if let Some(v) = self.angle {
            light.angle = v.clamp(0.0, std::f64::consts::FRAC_PI_2);
        }
        if let Some(v) = self.penumbra {
            light.penumbra = v.clamp(0.0, 1.0);
        }
    }
}

/// Partial scene settings update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsUpdate {
    pub background_color: Option<String>,
    pub show_grid: Option<bool>,
    pub grid_size: Option<f64>,
    pub grid_divisions: Option<u32>,
    pub hide_all_menus: Option<bool>,
    pub show_light_helpers: Option<bool>,
}

impl SceneState {
    /// Add a light and select it. Without an explicit position it goes next
    /// to the selected object (or the origin). While an object is being
    /// placed or dragged the light is added but not selected.
    pub fn add_light(&mut self, kind: LightKind, position: Option<[f64; 3]>) -> LightId {
        let position = position.unwrap_or_else(|| {
            let base = self
                .selected_object()
                .map(|o| o.payload.transform.position)
                .unwrap_or([0.0; 3]);
            let offset = self.editor.default_light_offset;
            [base[0] + offset[0], base[1] + offset[1], base[2] + offset[2]]
        });

        let count = self.lights.iter().filter(|l| l.light.kind == kind).count();
        let id = Self::new_id();
        let name = format!("{} Light {}", kind.display_name(), count + 1);
        let light = Light::new(id.clone(), name, kind, position);
        let native = self.backend.create_light(&light);
        self.lights.push(LightEntity { light, native });

        // Placement and drags own the selection until they finish
        if !self.is_placing() && self.drag.is_idle() {
            self.clear_selection();
            self.modes.on_deselect();
            self.selection = Selection::Light(id.clone());
        }

        self.save_to_history();
        id
    }

    pub fn remove_light(&mut self, id: &str) -> Outcome {
        if self.get_light(id).is_none() {
            return self.refuse("remove_light", Refusal::NotFound);
        }
        self.lights.retain(|l| l.light.id != id);
        if self.selection.is_light(id) {
            self.selection = Selection::None;
        }
        self.save_to_history();
        Outcome::Applied
    }

    /// Apply a partial update and push it to the renderer instance
    pub fn update_light(&mut self, id: &str, update: LightUpdate) -> Outcome {
        if self.get_light(id).is_none() {
            return self.refuse("update_light", Refusal::NotFound);
        }
        let backend = &self.backend;
        if let Some(entity) = self.lights.iter_mut().find(|l| l.light.id == id) {
            update.apply_to(&mut entity.light);
            backend.sync_light(&mut entity.native, &entity.light);
        }

        self.save_to_history();
        Outcome::Applied
    }

    pub fn toggle_light_visibility(&mut self, id: &str) -> Outcome {
        let visible = match self.get_light(id) {
            Some(l) => !l.light.visible,
            None => return self.refuse("toggle_light_visibility", Refusal::NotFound),
        };
        self.update_light(
            id,
            LightUpdate {
                visible: Some(visible),
                ..LightUpdate::default()
            },
        )
    }

    pub fn update_scene_settings(&mut self, update: SettingsUpdate) -> Outcome {
        let s = &mut self.settings;
        if let Some(v) = update.background_color {
            s.background_color = v;
        }
        if let Some(v) = update.show_grid {
            s.show_grid = v;
        }
        if let Some(v) = update.grid_size {
            s.grid_size = v.max(1.0);
        }
        if let Some(v) = update.grid_divisions {
            s.grid_divisions = v.max(1);
        }
        if let Some(v) = update.hide_all_menus {
            s.hide_all_menus = v;
        }
        if let Some(v) = update.show_light_helpers {
            s.show_light_helpers = v;
        }
        self.save_to_history();
        Outcome::Applied
    }
}

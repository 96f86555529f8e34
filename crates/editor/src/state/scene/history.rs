//! Undo/redo functionality
//!
//! Linear snapshot log with a cursor. The entry under the cursor always
//! equals the live scene; a new edit drops everything after the cursor.

use std::collections::VecDeque;

use shared::{Group, Light, SceneSettings};

use super::{LightEntity, SceneObject, SceneState};
use crate::state::drag::DragState;
use crate::state::outcome::{Outcome, Refusal};

/// Restorable copy of the persistent part of the scene.
///
/// Object mesh buffers are shared with the live scene until one side edits.
/// Lights are kept as descriptions only; renderer instances are rebuilt.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub objects: Vec<SceneObject>,
    pub groups: Vec<Group>,
    pub lights: Vec<Light>,
    pub settings: SceneSettings,
}

/// Bounded history of snapshots
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<Snapshot>,
    cursor: usize,
    capacity: usize,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Drop the redo tail, append, evict the oldest past capacity
    pub fn push(&mut self, snapshot: Snapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Forget everything and start over from `baseline`
    pub fn reset(&mut self, baseline: Snapshot) {
        self.entries.clear();
        self.entries.push_back(baseline);
        self.cursor = 0;
    }

    pub fn step_back(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    pub fn step_forward(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl SceneState {
    fn capture(&self) -> Snapshot {
        Snapshot {
            objects: self.objects.clone(),
            groups: self.groups.clone(),
            lights: self.lights.iter().map(|l| l.light.clone()).collect(),
            settings: self.settings.clone(),
        }
    }

    /// Replace the persistent scene with `snapshot`, rebuilding native lights
    fn restore(&mut self, snapshot: Snapshot) {
        self.objects = snapshot.objects;
        self.groups = snapshot.groups;
        self.settings = snapshot.settings;
        self.lights = snapshot
            .lights
            .into_iter()
            .map(|light| LightEntity {
                native: self.backend.create_light(&light),
                light,
            })
            .collect();
        self.clear_selection();
        self.modes.on_deselect();
        self.version += 1;
        self.unsaved = true;
    }

    /// Record the current scene as the newest history entry
    pub(crate) fn save_to_history(&mut self) {
        let snapshot = self.capture();
        self.history.push(snapshot);
        self.version += 1;
        self.unsaved = true;
    }

    /// Make the current scene the only history entry
    pub(crate) fn reset_history(&mut self) {
        let baseline = self.capture();
        self.history.reset(baseline);
    }

    /// Undo last change
    pub fn undo(&mut self) -> Outcome {
        if !matches!(self.drag, DragState::Idle) {
            return self.refuse("undo", Refusal::DragInProgress);
        }
        match self.history.step_back().cloned() {
            Some(snapshot) => {
                self.restore(snapshot);
                Outcome::Applied
            }
            None => self.refuse("undo", Refusal::NothingToUndo),
        }
    }

    /// Redo last undone change
    pub fn redo(&mut self) -> Outcome {
        if !matches!(self.drag, DragState::Idle) {
            return self.refuse("redo", Refusal::DragInProgress);
        }
        match self.history.step_forward().cloned() {
            Some(snapshot) => {
                self.restore(snapshot);
                Outcome::Applied
            }
            None => self.refuse("redo", Refusal::NothingToRedo),
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_cursor(&self) -> usize {
        self.history.cursor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(n: usize) -> Snapshot {
        let settings = SceneSettings {
            grid_divisions: n as u32,
            ..SceneSettings::default()
        };
        Snapshot {
            objects: Vec::new(),
            groups: Vec::new(),
            lights: Vec::new(),
            settings,
        }
    }

    #[test]
    fn test_push_truncates_redo_tail() {
        let mut log = HistoryLog::new(10);
        log.reset(snap(0));
        log.push(snap(1));
        log.push(snap(2));
        assert!(log.step_back().is_some());
        log.push(snap(3));
        assert_eq!(log.len(), 3);
        assert!(!log.can_redo());
        assert_eq!(log.step_back().map(|s| s.settings.grid_divisions), Some(1));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut log = HistoryLog::new(3);
        log.reset(snap(0));
        for i in 1..=5 {
            log.push(snap(i));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.cursor(), 2);
        log.step_back();
        let oldest = log.step_back().map(|s| s.settings.grid_divisions);
        assert_eq!(oldest, Some(3));
        assert!(!log.can_undo());
    }

    #[test]
    fn test_empty_log_cannot_step() {
        let mut log = HistoryLog::new(5);
        assert!(log.is_empty());
        assert!(log.step_back().is_none());
        assert!(log.step_forward().is_none());
    }
}

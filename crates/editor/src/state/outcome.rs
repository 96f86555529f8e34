//! Result of a store operation.
//!
//! Refusals are not failures: the store stays unchanged and the caller (a UI
//! gesture, a command, a test) can see why.

use std::fmt;

/// Why an operation left the store unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// Target object (or its owning group) is locked
    Locked,
    /// Id does not name an existing entity
    NotFound,
    /// Operation needs a selected object
    NoSelection,
    /// Edge editing requested on a sphere / cylinder / cone, or a
    /// vertex-count change on a shape without segments
    UnsupportedGeometry,
    /// A drag gesture is already open
    DragInProgress,
    /// No drag of the requested kind is open
    NoActiveDrag,
    /// Vertex index outside the mesh buffer
    InvalidVertex,
    /// Object placement is in progress
    PlacementActive,
    /// No pending placement to commit or cancel
    NotPlacing,
    /// Object is not a member of any group
    NotInGroup,
    NothingToUndo,
    NothingToRedo,
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Refusal::Locked => "target is locked",
            Refusal::NotFound => "no such entity",
            Refusal::NoSelection => "no object selected",
            Refusal::UnsupportedGeometry => "not supported for this geometry",
            Refusal::DragInProgress => "a drag is already in progress",
            Refusal::NoActiveDrag => "no matching drag in progress",
            Refusal::InvalidVertex => "vertex index out of range",
            Refusal::PlacementActive => "object placement in progress",
            Refusal::NotPlacing => "no object placement in progress",
            Refusal::NotInGroup => "object is not in a group",
            Refusal::NothingToUndo => "nothing to undo",
            Refusal::NothingToRedo => "nothing to redo",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Refusal {}

/// Applied, or refused with a reason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Refused(Refusal),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub fn refusal(&self) -> Option<Refusal> {
        match self {
            Outcome::Applied => None,
            Outcome::Refused(r) => Some(*r),
        }
    }
}

impl From<Result<(), Refusal>> for Outcome {
    fn from(result: Result<(), Refusal>) -> Self {
        match result {
            Ok(()) => Outcome::Applied,
            Err(r) => Outcome::Refused(r),
        }
    }
}

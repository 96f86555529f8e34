pub mod drag;
pub mod outcome;
pub mod placement;
pub mod scene;
pub mod selection;
pub mod settings;

pub use drag::{DragState, EdgeDrag, VertexDrag};
pub use outcome::{Outcome, Refusal};
pub use placement::PendingPlacement;
pub use scene::{
    light_display_name, object_display_name, shape_icon, short_id, LightEntity, LightUpdate, Renderable,
    SceneObject, SceneState, SettingsUpdate,
};
pub use selection::{EditMode, ElementKind, ElementSelection, ModeState, Selection, TransformMode};
pub use settings::EditorSettings;

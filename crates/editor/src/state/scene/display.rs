//! Display helper functions for objects and lights

use shared::{Light, ShapeKind};

use super::SceneObject;

/// Get display name for an object
pub fn object_display_name(obj: &SceneObject) -> String {
    format!("{} ({})", obj.name, short_id(&obj.id))
}

/// Get display name for a light
pub fn light_display_name(light: &Light) -> String {
    format!("{} [{}]", light.name, light.kind.display_name())
}

/// Get outliner icon for a shape
pub fn shape_icon(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Box => "[B]",
        ShapeKind::Sphere => "[S]",
        ShapeKind::Cylinder => "[Y]",
        ShapeKind::Cone => "[K]",
        ShapeKind::Plane => "[P]",
        ShapeKind::Torus => "[T]",
        ShapeKind::Composite => "[*]",
    }
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

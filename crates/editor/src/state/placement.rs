use serde::{Deserialize, Serialize};
use shared::Primitive;

/// Object waiting to be dropped into the scene.
///
/// The payload is produced on commit by running `primitive` through the
/// render backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPlacement {
    pub primitive: Primitive,
    pub name: String,
    /// Preview / material color; the configured default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl PendingPlacement {
    pub fn new(primitive: Primitive, name: impl Into<String>) -> Self {
        Self {
            primitive,
            name: name.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

//! Serializable scene document types shared by the editor core, the headless
//! runner and the wasm binding.

use serde::{Deserialize, Serialize};

/// Unique id of a scene object
pub type ObjectId = String;

/// Unique id of a group
pub type GroupId = String;

/// Unique id of a light
pub type LightId = String;

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    1
}

fn default_opacity() -> f32 {
    1.0
}

fn default_color() -> String {
    "#44aa88".to_string()
}

/// Object transform (radians for rotation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    pub fn at(position: [f64; 3]) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape tag carried alongside a renderable payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Plane,
    Torus,
    Composite,
}

impl ShapeKind {
    /// Sphere, cylinder and cone have no discrete editable edges in this model.
    pub fn has_editable_edges(self) -> bool {
        !self.is_round()
    }

    /// Shapes that enter vertex editing automatically when selected.
    pub fn is_round(self) -> bool {
        matches!(self, ShapeKind::Sphere | ShapeKind::Cylinder | ShapeKind::Cone)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ShapeKind::Box => "Box",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Cylinder => "Cylinder",
            ShapeKind::Cone => "Cone",
            ShapeKind::Plane => "Plane",
            ShapeKind::Torus => "Torus",
            ShapeKind::Composite => "Composite",
        }
    }
}

/// Geometry descriptor: primitive type plus its numeric parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Box {
        width: f64,
        height: f64,
        depth: f64,
    },
    Sphere {
        radius: f64,
        #[serde(default = "default_width_segments")]
        width_segments: u32,
        #[serde(default = "default_height_segments")]
        height_segments: u32,
    },
    Cylinder {
        radius_top: f64,
        radius_bottom: f64,
        height: f64,
        #[serde(default = "default_radial_segments")]
        radial_segments: u32,
    },
    Cone {
        radius: f64,
        height: f64,
        #[serde(default = "default_radial_segments")]
        radial_segments: u32,
    },
    Plane {
        width: f64,
        height: f64,
    },
    Torus {
        radius: f64,
        tube: f64,
        #[serde(default = "default_torus_radial")]
        radial_segments: u32,
        #[serde(default = "default_torus_tubular")]
        tubular_segments: u32,
    },
    /// Multi-part object (e.g. a tree: trunk + crown)
    Composite {
        parts: Vec<CompositePart>,
    },
}

/// Upper bound for any segment count. Commands reach the store without a UI
/// slider in between, so larger requests are clamped to this.
pub const MAX_SEGMENTS: u32 = 256;

fn default_width_segments() -> u32 {
    32
}

fn default_height_segments() -> u32 {
    16
}

fn default_radial_segments() -> u32 {
    32
}

fn default_torus_radial() -> u32 {
    16
}

fn default_torus_tubular() -> u32 {
    48
}

/// One piece of a composite object, placed relative to the object origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositePart {
    pub primitive: Primitive,
    #[serde(default)]
    pub offset: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Primitive {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Primitive::Box { .. } => ShapeKind::Box,
            Primitive::Sphere { .. } => ShapeKind::Sphere,
            Primitive::Cylinder { .. } => ShapeKind::Cylinder,
            Primitive::Cone { .. } => ShapeKind::Cone,
            Primitive::Plane { .. } => ShapeKind::Plane,
            Primitive::Torus { .. } => ShapeKind::Torus,
            Primitive::Composite { .. } => ShapeKind::Composite,
        }
    }

    pub fn unit_box() -> Self {
        Primitive::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }

    pub fn sphere(radius: f64) -> Self {
        Primitive::Sphere {
            radius,
            width_segments: default_width_segments(),
            height_segments: default_height_segments(),
        }
    }

    pub fn cylinder(radius: f64, height: f64) -> Self {
        Primitive::Cylinder {
            radius_top: radius,
            radius_bottom: radius,
            height,
            radial_segments: default_radial_segments(),
        }
    }

    pub fn cone(radius: f64, height: f64) -> Self {
        Primitive::Cone {
            radius,
            height,
            radial_segments: default_radial_segments(),
        }
    }

    /// Same shape with a different segment count. `None` for shapes without
    /// a vertex-count parameter.
    pub fn with_segments(&self, count: u32) -> Option<Primitive> {
        let count = count.clamp(3, MAX_SEGMENTS);
        match self {
            Primitive::Sphere { radius, .. } => Some(Primitive::Sphere {
                radius: *radius,
                width_segments: count,
                height_segments: (count / 2).max(2),
            }),
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                height,
                ..
            } => Some(Primitive::Cylinder {
                radius_top: *radius_top,
                radius_bottom: *radius_bottom,
                height: *height,
                radial_segments: count,
            }),
            Primitive::Cone { radius, height, .. } => Some(Primitive::Cone {
                radius: *radius,
                height: *height,
                radial_segments: count,
            }),
            _ => None,
        }
    }

    /// Same descriptor with every segment count brought into
    /// `[minimum, MAX_SEGMENTS]`; composite parts are clamped recursively.
    pub fn clamped(self) -> Primitive {
        let seg = |n: u32, min: u32| n.clamp(min, MAX_SEGMENTS);
        match self {
            Primitive::Sphere {
                radius,
                width_segments,
                height_segments,
            } => Primitive::Sphere {
                radius,
                width_segments: seg(width_segments, 3),
                height_segments: seg(height_segments, 2),
            },
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => Primitive::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments: seg(radial_segments, 3),
            },
            Primitive::Cone {
                radius,
                height,
                radial_segments,
            } => Primitive::Cone {
                radius,
                height,
                radial_segments: seg(radial_segments, 3),
            },
            Primitive::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => Primitive::Torus {
                radius,
                tube,
                radial_segments: seg(radial_segments, 3),
                tubular_segments: seg(tubular_segments, 3),
            },
            Primitive::Composite { parts } => Primitive::Composite {
                parts: parts
                    .into_iter()
                    .map(|part| CompositePart {
                        primitive: part.primitive.clamped(),
                        ..part
                    })
                    .collect(),
            },
            other => other,
        }
    }
}

/// Surface material parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// CSS-style hex color, e.g. `#44aa88`
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default)]
    pub metalness: f32,
    #[serde(default = "default_roughness")]
    pub roughness: f32,
}

fn default_roughness() -> f32 {
    1.0
}

impl Material {
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            ..Self::default()
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: default_color(),
            opacity: 1.0,
            transparent: false,
            metalness: 0.0,
            roughness: default_roughness(),
        }
    }
}

/// Named collection of object ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default = "default_true")]
    pub expanded: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    /// Member ids, ordered for display
    #[serde(default)]
    pub object_ids: Vec<ObjectId>,
}

impl Group {
    pub fn contains(&self, object_id: &str) -> bool {
        self.object_ids.iter().any(|id| id == object_id)
    }
}

/// Light variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    Directional,
    Point,
    Spot,
}

impl LightKind {
    pub fn display_name(self) -> &'static str {
        match self {
            LightKind::Directional => "Directional",
            LightKind::Point => "Point",
            LightKind::Spot => "Spot",
        }
    }

    /// Distance/decay are meaningful
    pub fn has_range(self) -> bool {
        matches!(self, LightKind::Point | LightKind::Spot)
    }

    /// Target position is meaningful
    pub fn has_target(self) -> bool {
        matches!(self, LightKind::Directional | LightKind::Spot)
    }
}

/// Light description. Fields irrelevant to `kind` are kept but unused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub id: LightId,
    pub name: String,
    pub kind: LightKind,
    pub position: [f64; 3],
    #[serde(default)]
    pub target: [f64; 3],
    pub intensity: f64,
    pub color: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub cast_shadow: bool,
    #[serde(default)]
    pub distance: f64,
    #[serde(default = "default_decay")]
    pub decay: f64,
    #[serde(default = "default_angle")]
    pub angle: f64,
    #[serde(default)]
    pub penumbra: f64,
}

fn default_decay() -> f64 {
    2.0
}

fn default_angle() -> f64 {
    std::f64::consts::FRAC_PI_3
}

impl Light {
    /// New light with the editor's default parameters for `kind`
    pub fn new(id: LightId, name: String, kind: LightKind, position: [f64; 3]) -> Self {
        Self {
            id,
            name,
            kind,
            position,
            target: [0.0, 0.0, 0.0],
            intensity: 1.0,
            color: "#ffffff".to_string(),
            visible: true,
            cast_shadow: true,
            distance: if kind == LightKind::Directional { 0.0 } else { 10.0 },
            decay: default_decay(),
            angle: default_angle(),
            penumbra: 0.0,
        }
    }
}

/// Global render/UI settings of a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSettings {
    pub background_color: String,
    pub show_grid: bool,
    pub grid_size: f64,
    pub grid_divisions: u32,
    #[serde(default)]
    pub hide_all_menus: bool,
    #[serde(default = "default_true")]
    pub show_light_helpers: bool,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            background_color: "#0f0f23".to_string(),
            show_grid: true,
            grid_size: 10.0,
            grid_divisions: 10,
            hide_all_menus: false,
            show_light_helpers: true,
        }
    }
}

/// Persisted form of a scene object: geometry descriptor instead of a mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: ObjectId,
    pub name: String,
    pub primitive: Primitive,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub material: Material,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
}

/// Whole-scene document handed to (and received from) the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub lights: Vec<Light>,
    #[serde(default)]
    pub settings: SceneSettings,
}

impl Default for SceneDocument {
    fn default() -> Self {
        Self {
            version: default_version(),
            objects: Vec::new(),
            groups: Vec::new(),
            lights: Vec::new(),
            settings: SceneSettings::default(),
        }
    }
}

//! Seam between the editor core and the renderer.
//!
//! The core never touches renderer objects directly: it asks the backend to
//! build mesh buffers from geometry descriptors and to create / update the
//! renderer-side light instances that mirror each `Light` description.

use std::sync::atomic::{AtomicU64, Ordering};

use shared::{Light, LightKind, Primitive};

use crate::mesh::{self, MeshData};

static NEXT_LIGHT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Renderer-side light instance owned by one light entity
#[derive(Debug, Clone, PartialEq)]
pub struct NativeLight {
    /// Identity of this instance; a rebuilt light gets a new one
    pub instance: u64,
    pub kind: LightKind,
    pub position: [f64; 3],
    pub target: [f64; 3],
    pub intensity: f64,
    pub color: String,
    pub visible: bool,
    pub cast_shadow: bool,
    pub distance: f64,
    pub decay: f64,
    pub angle: f64,
    pub penumbra: f64,
}

impl NativeLight {
    /// Fresh instance with renderer defaults for `kind`
    pub fn new(kind: LightKind, position: [f64; 3], target: [f64; 3]) -> Self {
        Self {
            instance: NEXT_LIGHT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            kind,
            position,
            target,
            intensity: 1.0,
            color: "#ffffff".to_string(),
            visible: true,
            cast_shadow: true,
            distance: 0.0,
            decay: 2.0,
            angle: std::f64::consts::FRAC_PI_3,
            penumbra: 0.0,
        }
    }

    /// Copy the fields that matter for this instance's kind from `light`
    pub fn apply(&mut self, light: &Light) {
        self.intensity = light.intensity;
        self.color.clone_from(&light.color);
        self.visible = light.visible;
        self.cast_shadow = light.cast_shadow;
        self.position = light.position;

        match self.kind {
            LightKind::Directional => {
                self.target = light.target;
            }
            LightKind::Point => {
                self.distance = light.distance;
                self.decay = light.decay;
            }
            LightKind::Spot => {
                self.target = light.target;
                self.distance = light.distance;
                self.decay = light.decay;
                self.angle = light.angle;
                self.penumbra = light.penumbra;
            }
        }
    }
}

/// Capabilities the core consumes from the rendering collaborator
pub trait RenderBackend {
    /// Build an owned mesh buffer for a geometry descriptor
    fn build_mesh(&self, primitive: &Primitive) -> MeshData;

    /// Create the renderer instance for a light description
    fn create_light(&self, light: &Light) -> NativeLight {
        let mut native = NativeLight::new(light.kind, light.position, light.target);
        native.apply(light);
        native
    }

    /// Push an updated description onto an existing instance
    fn sync_light(&self, native: &mut NativeLight, light: &Light) {
        native.apply(light);
    }
}

/// Headless backend generating buffers on the CPU
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuBackend;

impl RenderBackend for CpuBackend {
    fn build_mesh(&self, primitive: &Primitive) -> MeshData {
        mesh::build_primitive(primitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_light_copies_description() {
        let mut light = Light::new("l".into(), "Spot".into(), LightKind::Spot, [1.0, 2.0, 3.0]);
        light.intensity = 3.5;
        light.penumbra = 0.4;
        let native = CpuBackend.create_light(&light);
        assert_eq!(native.position, [1.0, 2.0, 3.0]);
        assert_eq!(native.intensity, 3.5);
        assert_eq!(native.penumbra, 0.4);
    }

    #[test]
    fn test_instances_are_unique() {
        let light = Light::new("l".into(), "P".into(), LightKind::Point, [0.0; 3]);
        let a = CpuBackend.create_light(&light);
        let b = CpuBackend.create_light(&light);
        assert_ne!(a.instance, b.instance);
    }

    #[test]
    fn test_point_light_ignores_spot_fields() {
        let mut light = Light::new("l".into(), "P".into(), LightKind::Point, [0.0; 3]);
        let mut native = CpuBackend.create_light(&light);
        light.angle = 0.1;
        light.distance = 42.0;
        CpuBackend.sync_light(&mut native, &light);
        assert_eq!(native.distance, 42.0);
        assert_eq!(native.angle, std::f64::consts::FRAC_PI_3);
    }
}

//! CPU-side mesh buffers, primitive generation and vertex welding helpers.

use glam::Vec3;
use shared::{CompositePart, Primitive, MAX_SEGMENTS};

/// Floats per vertex: position(3) + normal(3)
pub const STRIDE: usize = 6;

/// Distance under which two vertex-buffer entries count as the same point
/// (local object space).
pub const COINCIDENT_EPSILON: f32 = 1e-4;

/// Interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z] plus triangle indices
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    /// Bumped on every in-place edit so the renderer knows to re-upload
    pub revision: u64,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Buffer range of vertex `index` starting at float `offset`; `None`
    /// when the index is past the end
    fn slot(&self, index: usize, offset: usize) -> Option<std::ops::Range<usize>> {
        if index >= self.vertex_count() {
            return None;
        }
        let base = index * STRIDE + offset;
        Some(base..base + 3)
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        let p = self.vertices.get(self.slot(index, 0)?)?;
        Some(Vec3::new(p[0], p[1], p[2]))
    }

    pub fn normal(&self, index: usize) -> Option<Vec3> {
        let n = self.vertices.get(self.slot(index, 3)?)?;
        Some(Vec3::new(n[0], n[1], n[2]))
    }

    pub fn set_position(&mut self, index: usize, p: Vec3) {
        if let Some(range) = self.slot(index, 0) {
            self.vertices[range].copy_from_slice(&[p.x, p.y, p.z]);
        }
    }

    fn set_normal(&mut self, index: usize, n: Vec3) {
        if let Some(range) = self.slot(index, 3) {
            self.vertices[range].copy_from_slice(&[n.x, n.y, n.z]);
        }
    }

    /// Mark the buffer dirty
    pub fn touch(&mut self) {
        self.revision += 1;
    }

    /// All vertex indices whose position lies within `COINCIDENT_EPSILON` of
    /// vertex `index` (including `index` itself), in ascending order.
    pub fn coincident_vertices(&self, index: usize) -> Vec<usize> {
        let Some(target) = self.position(index) else {
            return Vec::new();
        };
        (0..self.vertex_count())
            .filter(|&i| {
                self.position(i)
                    .map(|p| p.distance(target) < COINCIDENT_EPSILON)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Smooth normals from indexed triangles (area-weighted face normals).
    pub fn compute_vertex_normals(&mut self) {
        let count = self.vertex_count();
        let mut acc = vec![Vec3::ZERO; count];

        for tri in self.indices.chunks_exact(3) {
            let (ia, ib, ic) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (Some(a), Some(b), Some(c)) =
                (self.position(ia), self.position(ib), self.position(ic))
            else {
                continue;
            };
            let face = (c - b).cross(a - b);
            acc[ia] += face;
            acc[ib] += face;
            acc[ic] += face;
        }

        for (i, n) in acc.into_iter().enumerate() {
            self.set_normal(i, n.normalize_or_zero());
        }
    }

    /// Append `other` translated by `offset`
    fn append(&mut self, other: &MeshData, offset: Vec3) {
        let base = self.vertex_count() as u32;
        for v in other.vertices.chunks_exact(STRIDE) {
            self.vertices.extend_from_slice(&[
                v[0] + offset.x,
                v[1] + offset.y,
                v[2] + offset.z,
                v[3],
                v[4],
                v[5],
            ]);
        }
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

// ── Primitive generation ─────────────────────────────────────

fn segments(count: u32, min: u32) -> u32 {
    count.clamp(min, MAX_SEGMENTS)
}

/// Build the mesh buffer described by `primitive`. Segment counts are
/// clamped to `[minimum, MAX_SEGMENTS]`.
pub fn build_primitive(primitive: &Primitive) -> MeshData {
    match primitive {
        Primitive::Box {
            width,
            height,
            depth,
        } => cube(*width as f32, *height as f32, *depth as f32),
        Primitive::Sphere {
            radius,
            width_segments,
            height_segments,
        } => sphere(*radius as f32, segments(*height_segments, 2), segments(*width_segments, 3)),
        Primitive::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        } => cylinder(
            *radius_top as f32,
            *radius_bottom as f32,
            *height as f32,
            segments(*radial_segments, 3),
        ),
        Primitive::Cone {
            radius,
            height,
            radial_segments,
        } => cone(*radius as f32, *height as f32, segments(*radial_segments, 3)),
        Primitive::Plane { width, height } => plane(*width as f32, *height as f32),
        Primitive::Torus {
            radius,
            tube,
            radial_segments,
            tubular_segments,
        } => torus(
            *radius as f32,
            *tube as f32,
            segments(*radial_segments, 3),
            segments(*tubular_segments, 3),
        ),
        Primitive::Composite { parts } => composite(parts),
    }
}

pub fn cube(w: f32, h: f32, d: f32) -> MeshData {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let faces: [([Vec3; 4], Vec3); 6] = [
        // Front (+Z)
        ([Vec3::new(-hw, -hh, hd), Vec3::new(hw, -hh, hd), Vec3::new(hw, hh, hd), Vec3::new(-hw, hh, hd)], Vec3::Z),
        // Back (-Z)
        ([Vec3::new(hw, -hh, -hd), Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, hh, -hd), Vec3::new(hw, hh, -hd)], Vec3::NEG_Z),
        // Right (+X)
        ([Vec3::new(hw, -hh, hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, hh, -hd), Vec3::new(hw, hh, hd)], Vec3::X),
        // Left (-X)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, -hh, hd), Vec3::new(-hw, hh, hd), Vec3::new(-hw, hh, -hd)], Vec3::NEG_X),
        // Top (+Y)
        ([Vec3::new(-hw, hh, hd), Vec3::new(hw, hh, hd), Vec3::new(hw, hh, -hd), Vec3::new(-hw, hh, -hd)], Vec3::Y),
        // Bottom (-Y)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, -hh, hd), Vec3::new(-hw, -hh, hd)], Vec3::NEG_Y),
    ];

    let mut vertices = Vec::with_capacity(24 * STRIDE);
    let mut indices = Vec::with_capacity(36);

    for (quad, normal) in &faces {
        let base = (vertices.len() / STRIDE) as u32;
        for v in quad {
            push_vert(&mut vertices, v.x, v.y, v.z, *normal);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData {
        vertices,
        indices,
        revision: 0,
    }
}

pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> MeshData {
    let hh = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);

    // Side faces
    for i in 0..segments {
        let a0 = (i as f32) * std::f32::consts::TAU / segments as f32;
        let a1 = ((i + 1) as f32) * std::f32::consts::TAU / segments as f32;

        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();

        let n0 = Vec3::new(c0, slope, s0).normalize();
        let n1 = Vec3::new(c1, slope, s1).normalize();

        let base = (vertices.len() / STRIDE) as u32;

        push_vert(&mut vertices, radius_bottom * c0, -hh, radius_bottom * s0, n0);
        push_vert(&mut vertices, radius_bottom * c1, -hh, radius_bottom * s1, n1);
        push_vert(&mut vertices, radius_top * c1, hh, radius_top * s1, n1);
        push_vert(&mut vertices, radius_top * c0, hh, radius_top * s0, n0);

        indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    add_cap(&mut vertices, &mut indices, radius_top, hh, segments, Vec3::Y, false);
    add_cap(&mut vertices, &mut indices, radius_bottom, -hh, segments, Vec3::NEG_Y, true);

    MeshData {
        vertices,
        indices,
        revision: 0,
    }
}

pub fn sphere(radius: f32, rings: u32, sectors: u32) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for r in 0..=rings {
        let phi = std::f32::consts::PI * r as f32 / rings as f32;
        let (sp, cp) = phi.sin_cos();

        for s in 0..=sectors {
            let theta = std::f32::consts::TAU * s as f32 / sectors as f32;
            let (st, ct) = theta.sin_cos();

            let n = Vec3::new(sp * ct, cp, sp * st);
            push_vert(&mut vertices, radius * n.x, radius * n.y, radius * n.z, n);
        }
    }

    for r in 0..rings {
        for s in 0..sectors {
            let i0 = r * (sectors + 1) + s;
            let i1 = i0 + 1;
            let i2 = i0 + sectors + 1;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i1, i2, i1, i3, i2]);
        }
    }

    MeshData {
        vertices,
        indices,
        revision: 0,
    }
}

pub fn cone(radius: f32, height: f32, segments: u32) -> MeshData {
    let hh = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let slope = radius / height.max(f32::EPSILON);
    for i in 0..segments {
        let a0 = (i as f32) * std::f32::consts::TAU / segments as f32;
        let a1 = ((i + 1) as f32) * std::f32::consts::TAU / segments as f32;

        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();

        let n0 = Vec3::new(c0, slope, s0).normalize();
        let n1 = Vec3::new(c1, slope, s1).normalize();
        let n_top = (n0 + n1).normalize();

        let base = (vertices.len() / STRIDE) as u32;

        push_vert(&mut vertices, 0.0, hh, 0.0, n_top); // apex
        push_vert(&mut vertices, radius * c0, -hh, radius * s0, n0);
        push_vert(&mut vertices, radius * c1, -hh, radius * s1, n1);

        indices.extend_from_slice(&[base, base + 2, base + 1]);
    }

    add_cap(&mut vertices, &mut indices, radius, -hh, segments, Vec3::NEG_Y, true);

    MeshData {
        vertices,
        indices,
        revision: 0,
    }
}

/// XZ-plane quad facing +Y
pub fn plane(w: f32, d: f32) -> MeshData {
    let hw = w * 0.5;
    let hd = d * 0.5;
    let mut vertices = Vec::with_capacity(4 * STRIDE);
    push_vert(&mut vertices, -hw, 0.0, hd, Vec3::Y);
    push_vert(&mut vertices, hw, 0.0, hd, Vec3::Y);
    push_vert(&mut vertices, hw, 0.0, -hd, Vec3::Y);
    push_vert(&mut vertices, -hw, 0.0, -hd, Vec3::Y);

    MeshData {
        vertices,
        indices: vec![0, 1, 2, 0, 2, 3],
        revision: 0,
    }
}

pub fn torus(radius: f32, tube: f32, radial: u32, tubular: u32) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for j in 0..=radial {
        let v = std::f32::consts::TAU * j as f32 / radial as f32;
        let (sv, cv) = v.sin_cos();
        for i in 0..=tubular {
            let u = std::f32::consts::TAU * i as f32 / tubular as f32;
            let (su, cu) = u.sin_cos();

            let center = Vec3::new(radius * cu, 0.0, radius * su);
            let p = Vec3::new((radius + tube * cv) * cu, tube * sv, (radius + tube * cv) * su);
            let n = (p - center).normalize_or_zero();
            push_vert(&mut vertices, p.x, p.y, p.z, n);
        }
    }

    for j in 1..=radial {
        for i in 1..=tubular {
            let a = (tubular + 1) * j + i - 1;
            let b = (tubular + 1) * (j - 1) + i - 1;
            let c = (tubular + 1) * (j - 1) + i;
            let d = (tubular + 1) * j + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshData {
        vertices,
        indices,
        revision: 0,
    }
}

/// Parts merged into one buffer. Nested composites are flattened.
pub fn composite(parts: &[CompositePart]) -> MeshData {
    let mut mesh = MeshData::default();
    for part in parts {
        let offset = Vec3::new(
            part.offset[0] as f32,
            part.offset[1] as f32,
            part.offset[2] as f32,
        );
        mesh.append(&build_primitive(&part.primitive), offset);
    }
    mesh
}

// ── Helpers ──────────────────────────────────────────────────

fn push_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, n: Vec3) {
    v.extend_from_slice(&[px, py, pz, n.x, n.y, n.z]);
}

fn add_cap(
    vertices: &mut Vec<f32>,
    indices: &mut Vec<u32>,
    radius: f32,
    y: f32,
    segments: u32,
    normal: Vec3,
    reversed: bool,
) {
    let center_idx = (vertices.len() / STRIDE) as u32;
    push_vert(vertices, 0.0, y, 0.0, normal);

    for i in 0..segments {
        let angle = (i as f32) * std::f32::consts::TAU / segments as f32;
        push_vert(vertices, radius * angle.cos(), y, radius * angle.sin(), normal);
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        if reversed {
            indices.extend_from_slice(&[center_idx, center_idx + 1 + i, center_idx + 1 + next]);
        } else {
            indices.extend_from_slice(&[center_idx, center_idx + 1 + next, center_idx + 1 + i]);
        }
    }
}

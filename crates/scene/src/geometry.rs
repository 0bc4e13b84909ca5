use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// CPU-side mesh: positions, normals, and texture coordinates, indexed.
///
/// The renderer interleaves these into GPU vertex buffers at startup and
/// never reads them again.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Generate a (p,q) torus knot tube.
///
/// The centerline is sampled along the knot curve; a Frenet-style frame at
/// each sample sweeps a circle of radius `tube` around it. Matches the
/// parameterization of the common web-library geometry of the same name.
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> MeshData {
    let curve = |u: f32| -> Vec3 {
        let qu_over_p = q as f32 / p as f32 * u;
        let cs = qu_over_p.cos();
        Vec3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * 0.5 * u.sin(),
            radius * qu_over_p.sin() * 0.5,
        )
    };

    let vert_count = ((tubular_segments + 1) * (radial_segments + 1)) as usize;
    let mut positions = Vec::with_capacity(vert_count);
    let mut normals = Vec::with_capacity(vert_count);
    let mut uvs = Vec::with_capacity(vert_count);

    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32 * p as f32 * TAU;

        // Frame from two close curve samples
        let p1 = curve(u);
        let p2 = curve(u + 0.01);
        let tangent = p2 - p1;
        let bitangent = tangent.cross(p2 + p1).normalize();
        let normal_axis = bitangent.cross(tangent).normalize();

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();

            let pos = p1 + cx * normal_axis + cy * bitangent;
            positions.push(pos);
            normals.push((pos - p1).normalize());
            uvs.push(Vec2::new(
                i as f32 / tubular_segments as f32,
                j as f32 / radial_segments as f32,
            ));
        }
    }

    let mut indices = Vec::with_capacity((tubular_segments * radial_segments * 6) as usize);
    for j in 1..=tubular_segments {
        for i in 1..=radial_segments {
            let a = (radial_segments + 1) * (j - 1) + (i - 1);
            let b = (radial_segments + 1) * j + (i - 1);
            let c = (radial_segments + 1) * j + i;
            let d = (radial_segments + 1) * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshData {
        positions,
        normals,
        uvs,
        indices,
    }
}

/// Generate an apex-up cone with a capped base.
///
/// Side normals follow the slant; the base cap faces down.
pub fn cone(radius: f32, height: f32, radial_segments: u32) -> MeshData {
    let half = height * 0.5;
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();

    // Side: one base ring vertex and one apex vertex per segment, so the
    // slant normal stays per-segment instead of degenerating at the tip.
    for i in 0..=radial_segments {
        let theta = i as f32 / radial_segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        let slant = Vec3::new(height * cos, radius, height * sin).normalize();

        positions.push(Vec3::new(radius * cos, -half, radius * sin));
        normals.push(slant);
        uvs.push(Vec2::new(i as f32 / radial_segments as f32, 1.0));

        positions.push(Vec3::new(0.0, half, 0.0));
        normals.push(slant);
        uvs.push(Vec2::new(i as f32 / radial_segments as f32, 0.0));
    }
    for i in 0..radial_segments {
        let base = i * 2;
        let apex = i * 2 + 1;
        let next = (i + 1) * 2;
        indices.extend_from_slice(&[base, apex, next]);
    }

    // Base cap, wound to face -Y
    let cap_start = positions.len() as u32;
    positions.push(Vec3::new(0.0, -half, 0.0));
    normals.push(Vec3::NEG_Y);
    uvs.push(Vec2::new(0.5, 0.5));
    for i in 0..=radial_segments {
        let theta = i as f32 / radial_segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        positions.push(Vec3::new(radius * cos, -half, radius * sin));
        normals.push(Vec3::NEG_Y);
        uvs.push(Vec2::new(cos * 0.5 + 0.5, sin * 0.5 + 0.5));
    }
    for i in 0..radial_segments {
        indices.extend_from_slice(&[cap_start, cap_start + 1 + i, cap_start + 2 + i]);
    }

    MeshData {
        positions,
        normals,
        uvs,
        indices,
    }
}

/// Generate a `width` x `height` quad in the XY plane, facing +Z.
///
/// The ground plane gets its floor orientation from its node transform, not
/// from the geometry.
pub fn plane(width: f32, height: f32) -> MeshData {
    let hw = width * 0.5;
    let hh = height * 0.5;
    MeshData {
        positions: vec![
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ],
        normals: vec![Vec3::Z; 4],
        uvs: vec![
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
        ],
        indices: vec![0, 1, 2, 2, 3, 0],
    }
}

//! Procedural primitive meshes served by the built-in provider.
//!
//! All primitives are centered on the origin, wound counter-clockwise when
//! seen from outside, and carry normals and texture coordinates.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::mesh::MeshData;

/// Default number of sphere slices (around the Y axis).
pub const DEFAULT_SPHERE_SLICES: u32 = 20;
/// Default number of sphere stacks (pole to pole).
pub const DEFAULT_SPHERE_STACKS: u32 = 10;
/// Default sphere radius.
pub const DEFAULT_SPHERE_RADIUS: f32 = 1.0;
/// Default cube edge length.
pub const DEFAULT_CUBE_LENGTH: f32 = 1.0;
/// Upper bound on sphere slices and stacks.
pub const MAX_SPHERE_SEGMENTS: u32 = 4096;
/// Upper bound on the vertex count of a generated sphere.
pub const MAX_SPHERE_VERTICES: u32 = 1 << 20;

/// A single triangle in the XY plane, facing +Z.
pub fn triangle() -> MeshData {
    let half_sqrt3 = 3.0_f32.sqrt() * 0.5;
    MeshData {
        name: "Triangle".into(),
        positions: vec![
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-half_sqrt3, -0.5, 0.0),
            Vec3::new(half_sqrt3, -0.5, 0.0),
        ],
        normals: vec![Vec3::Z; 3],
        uvs: vec![Vec2::new(0.5, 1.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)],
        indices: vec![0, 1, 2],
    }
}

/// A 2x2 quad in the XY plane, facing +Z.
pub fn plane() -> MeshData {
    MeshData {
        name: "Plane".into(),
        positions: vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ],
        normals: vec![Vec3::Z; 4],
        uvs: vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

/// Vertex count of a sphere with the given segments, `None` on overflow.
pub fn sphere_vertex_count(slices: u32, stacks: u32) -> Option<u32> {
    slices.checked_add(1)?.checked_mul(stacks.checked_add(1)?)
}

/// A UV sphere. `slices` is clamped to `3..=MAX_SPHERE_SEGMENTS` and `stacks`
/// to `2..=MAX_SPHERE_SEGMENTS`.
pub fn uv_sphere(slices: u32, stacks: u32, radius: f32) -> MeshData {
    let slices = slices.clamp(3, MAX_SPHERE_SEGMENTS);
    let stacks = stacks.clamp(2, MAX_SPHERE_SEGMENTS);
    let ring = slices + 1;
    let vertex_count = sphere_vertex_count(slices, stacks).unwrap_or(u32::MAX);

    let mut positions = Vec::with_capacity(vertex_count as usize);
    let mut normals = Vec::with_capacity(positions.capacity());
    let mut uvs = Vec::with_capacity(positions.capacity());

    for j in 0..=stacks {
        let v = j as f32 / stacks as f32;
        let phi = v * PI;
        for i in 0..=slices {
            let u = i as f32 / slices as f32;
            let theta = u * TAU;
            let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            positions.push(normal * radius);
            normals.push(normal);
            uvs.push(Vec2::new(u, 1.0 - v));
        }
    }

    let mut indices = Vec::with_capacity(slices as usize * stacks as usize * 6);
    for j in 0..stacks {
        for i in 0..slices {
            let a = j * ring + i;
            let b = a + ring;
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }

    MeshData {
        name: "UVSphere".into(),
        positions,
        normals,
        uvs,
        indices,
    }
}

/// An axis-aligned cube with the given edge length.
pub fn cube(length: f32) -> MeshData {
    let half = length * 0.5;
    // (normal, u, v) with u x v == normal so each face winds outwards.
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut data = MeshData {
        name: "Cube".into(),
        ..Default::default()
    };
    for (normal, u, v) in faces {
        let base = data.positions.len() as u32;
        for (su, sv) in corners {
            data.positions.push((normal + u * su + v * sv) * half);
            data.normals.push(normal);
            data.uvs.push(Vec2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5));
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    data
}

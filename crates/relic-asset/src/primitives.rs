//! Procedural primitive generators
//!
//! Used for the fallback placeholder artifact. All generators produce
//! indexed primitives with outward normals.

use std::f32::consts::PI;

use glam::Vec3;

use crate::mesh::MeshPrimitive;

/// Generate an axis-aligned cuboid centered on the origin.
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshPrimitive {
    let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);

    // Four corners + normal per face.
    let faces: [([Vec3; 4], Vec3); 6] = [
        (
            [
                Vec3::new(-hw, -hh, hd),
                Vec3::new(hw, -hh, hd),
                Vec3::new(hw, hh, hd),
                Vec3::new(-hw, hh, hd),
            ],
            Vec3::Z,
        ),
        (
            [
                Vec3::new(hw, -hh, -hd),
                Vec3::new(-hw, -hh, -hd),
                Vec3::new(-hw, hh, -hd),
                Vec3::new(hw, hh, -hd),
            ],
            Vec3::NEG_Z,
        ),
        (
            [
                Vec3::new(hw, -hh, hd),
                Vec3::new(hw, -hh, -hd),
                Vec3::new(hw, hh, -hd),
                Vec3::new(hw, hh, hd),
            ],
            Vec3::X,
        ),
        (
            [
                Vec3::new(-hw, -hh, -hd),
                Vec3::new(-hw, -hh, hd),
                Vec3::new(-hw, hh, hd),
                Vec3::new(-hw, hh, -hd),
            ],
            Vec3::NEG_X,
        ),
        (
            [
                Vec3::new(-hw, hh, hd),
                Vec3::new(hw, hh, hd),
                Vec3::new(hw, hh, -hd),
                Vec3::new(-hw, hh, -hd),
            ],
            Vec3::Y,
        ),
        (
            [
                Vec3::new(-hw, -hh, -hd),
                Vec3::new(hw, -hh, -hd),
                Vec3::new(hw, -hh, hd),
                Vec3::new(-hw, -hh, hd),
            ],
            Vec3::NEG_Y,
        ),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (corners, normal) in faces {
        let base = positions.len() as u32;
        for corner in corners {
            positions.push(corner.to_array());
            normals.push(normal.to_array());
        }
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshPrimitive {
        positions,
        normals,
        indices: Some(indices),
        ..Default::default()
    }
}

/// Generate an open-ended vertical cylinder (optionally tapered) plus caps.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> MeshPrimitive {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;

    // Side rings, top then bottom.
    for (y, radius) in [(half, radius_top), (-half, radius_bottom)] {
        for seg in 0..=segments {
            let theta = 2.0 * PI * seg as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();
            let normal = Vec3::new(cos, slope, sin).normalize();
            positions.push([radius * cos, y, radius * sin]);
            normals.push(normal.to_array());
        }
    }

    for seg in 0..segments {
        let top = seg;
        let bottom = seg + segments + 1;
        indices.extend([top, bottom, top + 1, top + 1, bottom, bottom + 1]);
    }

    // Caps as triangle fans around a center vertex.
    for (y, radius, up) in [(half, radius_top, 1.0f32), (-half, radius_bottom, -1.0)] {
        let center = positions.len() as u32;
        positions.push([0.0, y, 0.0]);
        normals.push([0.0, up, 0.0]);
        for seg in 0..=segments {
            let theta = 2.0 * PI * seg as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();
            positions.push([radius * cos, y, radius * sin]);
            normals.push([0.0, up, 0.0]);
        }
        for seg in 0..segments {
            let a = center + 1 + seg;
            let b = center + 2 + seg;
            if up > 0.0 {
                indices.extend([center, b, a]);
            } else {
                indices.extend([center, a, b]);
            }
        }
    }

    MeshPrimitive {
        positions,
        normals,
        indices: Some(indices),
        ..Default::default()
    }
}

/// Generate a UV sphere centered on the origin.
pub fn sphere(radius: f32, segments: u32, rings: u32) -> MeshPrimitive {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let y = radius * phi.cos();
        let ring_radius = radius * phi.sin();

        for seg in 0..=segments {
            let theta = 2.0 * PI * seg as f32 / segments as f32;
            let x = ring_radius * theta.cos();
            let z = ring_radius * theta.sin();

            let normal = Vec3::new(x, y, z).normalize_or_zero();
            positions.push([x, y, z]);
            normals.push(normal.to_array());
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;

            indices.extend([current, next, current + 1]);
            indices.extend([current + 1, next, next + 1]);
        }
    }

    MeshPrimitive {
        positions,
        normals,
        indices: Some(indices),
        ..Default::default()
    }
}

//! Deterministic placeholder artifact
//!
//! Substituted whenever loading or parsing fails so the viewer always has
//! something to render. The fixed earth-tone palette makes it visually
//! distinguishable from real scans, and it flows through normalization
//! and face decomposition like any loaded model.

use glam::Vec3;
use relic_core::{Color, Transform};

use crate::mesh::{MeshAsset, SubMesh};
use crate::primitives;

const BASE_COLOR: u32 = 0x8B4513;
const BODY_COLOR: u32 = 0xD2691E;
const HEAD_COLOR: u32 = 0xCD853F;

/// Build the placeholder: a plinth, a tapered body, and a spherical head,
/// loosely evoking a statue on a pedestal.
pub fn placeholder_artifact() -> MeshAsset {
    let mut base = SubMesh::new("base", primitives::cuboid(2.0, 0.3, 2.0));
    base.transform = Transform::from_position(Vec3::new(0.0, -1.5, 0.0));
    base.base_color = Color::from_hex(BASE_COLOR);

    let mut body = SubMesh::new("body", primitives::cylinder(0.8, 1.0, 2.0, 16));
    body.transform = Transform::from_position(Vec3::new(0.0, -0.3, 0.0));
    body.base_color = Color::from_hex(BODY_COLOR);

    let mut head = SubMesh::new("head", primitives::sphere(0.6, 16, 16));
    head.transform = Transform::from_position(Vec3::new(0.0, 1.2, 0.0));
    head.base_color = Color::from_hex(HEAD_COLOR);

    let mut asset = MeshAsset::new("placeholder", vec![base, body, head]);
    asset.normalize();
    asset
}

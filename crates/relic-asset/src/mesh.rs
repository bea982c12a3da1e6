//! Parsed mesh representation and normalization
//!
//! All parsers produce a [`MeshAsset`]; the loader then normalizes it so
//! the bounding-box center sits at the origin and the largest dimension
//! equals [`CANONICAL_SIZE`].

use glam::Vec3;
use relic_core::{Aabb, Color, Transform};

use crate::texture::TextureAsset;

/// Largest bounding-box dimension after normalization, in world units.
pub const CANONICAL_SIZE: f32 = 2.0;

/// Raw vertex data for one draw primitive.
#[derive(Debug, Clone, Default)]
pub struct MeshPrimitive {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub indices: Option<Vec<u32>>,
}

impl MeshPrimitive {
    /// Number of triangles this primitive resolves to.
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }
}

/// One rigid piece of a loaded model.
#[derive(Debug, Clone)]
pub struct SubMesh {
    pub name: String,
    /// Placement of this piece, flattened from any scene hierarchy.
    pub transform: Transform,
    pub primitive: MeshPrimitive,
    /// Base color factor of the native material.
    pub base_color: Color,
    /// Index into [`MeshAsset::textures`], if the material has one.
    pub texture: Option<usize>,
}

impl SubMesh {
    pub fn new(name: impl Into<String>, primitive: MeshPrimitive) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            primitive,
            base_color: Color::rgb(0.53, 0.53, 0.53),
            texture: None,
        }
    }
}

/// A parsed, normalized model ready for decomposition and rendering.
///
/// Immutable after [`MeshAsset::normalize`]; replaced wholesale when a new
/// resource is loaded.
#[derive(Debug, Clone)]
pub struct MeshAsset {
    pub name: String,
    pub sub_meshes: Vec<SubMesh>,
    pub textures: Vec<TextureAsset>,
    /// World-space bounds (post-normalization once normalized).
    pub bounds: Aabb,
    /// Translation that was applied to recenter the model.
    pub center_offset: Vec3,
    /// Uniform scale that was applied to reach the canonical size.
    pub scale: f32,
}

impl MeshAsset {
    pub fn new(name: impl Into<String>, sub_meshes: Vec<SubMesh>) -> Self {
        let mut asset = Self {
            name: name.into(),
            sub_meshes,
            textures: Vec::new(),
            bounds: Aabb::EMPTY,
            center_offset: Vec3::ZERO,
            scale: 1.0,
        };
        asset.bounds = asset.compute_bounds();
        asset
    }

    /// Total triangle count across all sub-meshes.
    pub fn triangle_count(&self) -> usize {
        self.sub_meshes
            .iter()
            .map(|m| m.primitive.triangle_count())
            .sum()
    }

    /// World-space bounding box of all sub-mesh vertices.
    pub fn compute_bounds(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for sub in &self.sub_meshes {
            for p in &sub.primitive.positions {
                bounds.include(sub.transform.transform_point(Vec3::from(*p)));
            }
        }
        bounds
    }

    /// Recenter on the origin and scale uniformly so the largest bounding
    /// dimension equals [`CANONICAL_SIZE`].
    ///
    /// The adjustment is folded into each sub-mesh transform so vertex
    /// buffers stay untouched.
    pub fn normalize(&mut self) {
        let bounds = self.compute_bounds();
        if bounds.is_empty() {
            return;
        }

        let center = bounds.center();
        let max_dim = bounds.max_dimension();
        let scale = if max_dim > f32::EPSILON {
            CANONICAL_SIZE / max_dim
        } else {
            1.0
        };

        for sub in &mut self.sub_meshes {
            sub.transform.position = (sub.transform.position - center) * scale;
            sub.transform.scale *= scale;
        }

        self.center_offset = -center;
        self.scale = scale;
        self.bounds = self.compute_bounds();
    }
}

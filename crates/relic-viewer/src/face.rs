//! Face decomposition
//!
//! Walks a normalized [`MeshAsset`] and flattens it into an arena of
//! triangle records plus a parallel array of sub-mesh transform
//! snapshots. Faces are addressed by their stable extraction index.

use glam::Vec3;
use relic_core::{Color, Transform};
use relic_asset::MeshAsset;
use tracing::debug;

use crate::config::DEFAULT_FACE_COLOR;

/// One extracted triangle, independently positionable and colorable.
#[derive(Debug, Clone)]
pub struct Face {
    /// Stable zero-based index in traversal order.
    pub index: u32,
    /// Vertex positions in sub-mesh local space.
    pub vertices: [Vec3; 3],
    /// Arithmetic mean of the three vertices, in sub-mesh local space.
    pub centroid: Vec3,
    /// Index into [`FaceSet::transforms`] for the owning sub-mesh.
    pub sub_mesh: usize,
    /// Current interpolated render position (world space).
    pub position: Vec3,
    /// Current resolved render color.
    pub color: Color,
}

/// The decomposed face arena for one loaded asset.
///
/// Recreated wholesale on every load; face indices are only meaningful
/// against the asset they were extracted from.
#[derive(Debug, Clone, Default)]
pub struct FaceSet {
    pub faces: Vec<Face>,
    /// Transform snapshots per sub-mesh, referenced by `Face::sub_mesh`.
    /// Sub-meshes are rigid during viewing, so a snapshot is sufficient.
    pub transforms: Vec<Transform>,
    /// Whether extraction stopped at the face cap.
    pub truncated: bool,
}

impl FaceSet {
    /// Decompose an asset into at most `cap` faces.
    ///
    /// Sub-meshes are visited depth-first in stored order; indexed
    /// geometry is grouped in consecutive index triples, non-indexed in
    /// consecutive vertex triples. Indices are assigned sequentially
    /// across the whole traversal.
    pub fn decompose(asset: &MeshAsset, cap: usize) -> Self {
        let mut set = FaceSet::default();

        'outer: for sub in &asset.sub_meshes {
            let sub_mesh = set.transforms.len();
            set.transforms.push(sub.transform);

            let positions = &sub.primitive.positions;
            let mut triangles: Box<dyn Iterator<Item = [Vec3; 3]>> =
                match &sub.primitive.indices {
                    Some(indices) => Box::new(indices.chunks_exact(3).filter_map(|tri| {
                        let a = positions.get(tri[0] as usize)?;
                        let b = positions.get(tri[1] as usize)?;
                        let c = positions.get(tri[2] as usize)?;
                        Some([Vec3::from(*a), Vec3::from(*b), Vec3::from(*c)])
                    })),
                    None => Box::new(
                        positions
                            .chunks_exact(3)
                            .map(|tri| [Vec3::from(tri[0]), Vec3::from(tri[1]), Vec3::from(tri[2])]),
                    ),
                };

            for vertices in &mut triangles {
                if set.faces.len() >= cap {
                    set.truncated = true;
                    break 'outer;
                }

                let centroid = (vertices[0] + vertices[1] + vertices[2]) / 3.0;
                set.faces.push(Face {
                    index: set.faces.len() as u32,
                    vertices,
                    centroid,
                    sub_mesh,
                    position: sub.transform.position,
                    color: DEFAULT_FACE_COLOR,
                });
            }
        }

        debug!(
            faces = set.faces.len(),
            truncated = set.truncated,
            "decomposed asset"
        );
        set
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Transform of the sub-mesh owning the given face.
    pub fn transform_of(&self, face: &Face) -> &Transform {
        &self.transforms[face.sub_mesh]
    }

    /// The face's triangle in world space, using its current interpolated
    /// render position (so picking tracks exploded faces).
    pub fn world_triangle(&self, face: &Face) -> [Vec3; 3] {
        let transform = self.transform_of(face);
        face.vertices
            .map(|v| face.position + transform.rotation * (transform.scale * v))
    }
}

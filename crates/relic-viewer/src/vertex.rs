//! Vertex layout handed to host renderers

use bytemuck::{Pod, Zeroable};

use crate::face::FaceSet;

/// Flat-shaded vertex for the decomposed-face view, ready for upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FaceVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl FaceSet {
    /// Build a triangle-list vertex buffer reflecting current render
    /// positions and colors. Three vertices per face, flat normals.
    pub fn vertex_buffer(&self) -> Vec<FaceVertex> {
        let mut out = Vec::with_capacity(self.faces.len() * 3);
        for face in &self.faces {
            let tri = self.world_triangle(face);
            let normal = (tri[1] - tri[0])
                .cross(tri[2] - tri[0])
                .normalize_or_zero();
            let color = face.color.to_array();
            for v in tri {
                out.push(FaceVertex {
                    position: v.to_array(),
                    normal: normal.to_array(),
                    color,
                });
            }
        }
        out
    }
}

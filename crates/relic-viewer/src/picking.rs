//! Ray-based face picking
//!
//! Converts pointer positions into face hits against the current face
//! arena. A miss is a normal, silent outcome; this module never errors.

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::face::FaceSet;

/// A ray in world space.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Get a point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Moller-Trumbore ray-triangle intersection, double-sided.
///
/// Returns the ray parameter of the hit, if any.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < EPSILON {
        return None; // Ray parallel to triangle
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > EPSILON).then_some(t)
}

/// Nearest face hit by the ray, as (face index, ray parameter).
pub fn pick(faces: &FaceSet, ray: &Ray) -> Option<(u32, f32)> {
    let mut nearest: Option<(u32, f32)> = None;
    for face in &faces.faces {
        let [v0, v1, v2] = faces.world_triangle(face);
        if let Some(t) = ray_triangle_intersect(ray, v0, v1, v2) {
            if nearest.map_or(true, |(_, best)| t < best) {
                nearest = Some((face.index, t));
            }
        }
    }
    nearest
}

/// Tracks hover state between pointer events.
#[derive(Debug, Default)]
pub struct PickController {
    hovered: Option<u32>,
}

impl PickController {
    /// Handle a pointer move at the given normalized device coordinates.
    ///
    /// Updates hover state and returns it; `None` clears any previous
    /// hover (and the caller's pointer affordance with it).
    pub fn pointer_move(&mut self, ndc: Vec2, camera: &Camera, faces: &FaceSet) -> Option<u32> {
        let ray = camera.ray_from_ndc(ndc);
        self.hovered = pick(faces, &ray).map(|(index, _)| index);
        self.hovered
    }

    /// Handle a pointer activation (click/tap). Returns the face to
    /// select, if one is hovered. Selection state lives with the caller.
    pub fn pointer_down(&self) -> Option<u32> {
        self.hovered
    }

    /// Currently hovered face, if any.
    pub fn hovered(&self) -> Option<u32> {
        self.hovered
    }

    /// Whether the pointer is over a pickable face (cursor affordance).
    pub fn pointer_over_face(&self) -> bool {
        self.hovered.is_some()
    }

    pub fn clear(&mut self) {
        self.hovered = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relic_asset::{MeshAsset, MeshPrimitive, SubMesh};

    fn two_triangle_set() -> FaceSet {
        // Two parallel triangles facing +Z, the second further away.
        let positions = vec![
            [-0.5, -0.5, 0.0],
            [0.5, -0.5, 0.0],
            [0.0, 0.5, 0.0],
            [-0.5, -0.5, -2.0],
            [0.5, -0.5, -2.0],
            [0.0, 0.5, -2.0],
        ];
        let sub = SubMesh::new(
            "pair",
            MeshPrimitive {
                positions,
                ..Default::default()
            },
        );
        FaceSet::decompose(&MeshAsset::new("test", vec![sub]), 100)
    }

    #[test]
    fn ray_hits_facing_triangle() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
        };
        let t = ray_triangle_intersect(
            &ray,
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!((t - 5.0).abs() < 1e-5);
        assert!((ray.point_at(t) - Vec3::ZERO).length() < 1e-5);
    }

    #[test]
    fn ray_misses_outside_triangle() {
        let ray = Ray {
            origin: Vec3::new(5.0, 5.0, 5.0),
            direction: Vec3::NEG_Z,
        };
        assert!(ray_triangle_intersect(
            &ray,
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn intersection_is_double_sided() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, -5.0),
            direction: Vec3::Z,
        };
        assert!(ray_triangle_intersect(
            &ray,
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .is_some());
    }

    #[test]
    fn pick_returns_nearest_face() {
        let faces = two_triangle_set();
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
        };
        let (index, _) = pick(&faces, &ray).unwrap();
        assert_eq!(index, 0);

        // From behind, the far triangle is nearest.
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, -5.0),
            direction: Vec3::Z,
        };
        let (index, _) = pick(&faces, &ray).unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn hover_updates_and_clears() {
        let faces = two_triangle_set();
        let mut camera = Camera::new(50.0, 1.0);
        camera.position = Vec3::new(0.0, 0.0, 5.0);
        camera.target = Vec3::ZERO;

        let mut controller = PickController::default();
        assert_eq!(controller.pointer_move(Vec2::ZERO, &camera, &faces), Some(0));
        assert!(controller.pointer_over_face());
        assert_eq!(controller.pointer_down(), Some(0));

        // Way off to the side: miss clears hover.
        assert_eq!(
            controller.pointer_move(Vec2::new(0.99, 0.99), &camera, &faces),
            None
        );
        assert!(!controller.pointer_over_face());
        assert_eq!(controller.pointer_down(), None);
    }

    #[test]
    fn hovering_tracks_aimed_face_centroid() {
        let faces = two_triangle_set();
        let mut camera = Camera::new(50.0, 1.0);
        camera.position = Vec3::new(0.0, 0.0, 5.0);
        camera.target = Vec3::ZERO;

        // Project face 0's world centroid and aim exactly there.
        let face = &faces.faces[0];
        let tri = faces.world_triangle(face);
        let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
        let clip = camera.view_projection() * centroid.extend(1.0);
        let ndc = clip.truncate() / clip.w;

        let mut controller = PickController::default();
        let hovered = controller.pointer_move(Vec2::new(ndc.x, ndc.y), &camera, &faces);
        assert_eq!(hovered, Some(0));
    }
}

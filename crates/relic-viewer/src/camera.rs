//! Orbit camera with one-shot bounds fitting

use glam::{Mat4, Vec2, Vec3, Vec4};
use relic_core::Aabb;

use crate::picking::Ray;

/// Default viewing direction, from the model toward the camera.
const VIEW_DIRECTION: Vec3 = Vec3::new(1.0, 1.0, 1.0);

/// Perspective camera aimed at an orbit target.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// Camera world position
    pub position: Vec3,
    /// Point the camera orbits and looks at
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Render surface aspect ratio (width / height)
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(fov_degrees: f32, aspect_ratio: f32) -> Self {
        Self {
            position: VIEW_DIRECTION.normalize() * 4.0,
            target: Vec3::ZERO,
            fov_degrees,
            aspect_ratio,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Frame the given bounds completely, with a safety margin so the
    /// silhouette never touches the viewport edge.
    ///
    /// One-shot: called on load commit and explicit camera reset, never
    /// per frame.
    pub fn fit(&mut self, bounds: &Aabb, margin: f32) {
        if bounds.is_empty() {
            return;
        }

        let center = bounds.center();
        let radius = bounds.bounding_radius().max(f32::EPSILON);

        // The tighter of the vertical and horizontal half-angles bounds
        // the distance.
        let half_v = self.fov_degrees.to_radians() * 0.5;
        let half_h = (half_v.tan() * self.aspect_ratio).atan();
        let half = half_v.min(half_h);

        let distance = margin * radius / half.sin();
        self.target = center;
        self.position = center + VIEW_DIRECTION.normalize() * distance;
    }

    /// Cast a ray from the camera through a pointer position given in
    /// normalized device coordinates (x, y each in [-1, 1]).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();

        let near = inv * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        Ray {
            origin: near,
            direction: (far - near).normalize_or_zero(),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(50.0, 16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Project a world point and return NDC x/y plus depth.
    fn project(camera: &Camera, point: Vec3) -> Vec3 {
        let clip = camera.view_projection() * point.extend(1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn unit_cube_fits_in_frustum() {
        let mut camera = Camera::new(50.0, 1.0);
        let bounds = Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        camera.fit(&bounds, 1.2);

        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { -0.5 } else { 0.5 },
                if i & 2 == 0 { -0.5 } else { 0.5 },
                if i & 4 == 0 { -0.5 } else { 0.5 },
            );
            let ndc = project(&camera, corner);
            assert!(ndc.x.abs() <= 1.0, "corner {corner} x out of view: {ndc}");
            assert!(ndc.y.abs() <= 1.0, "corner {corner} y out of view: {ndc}");
            assert!((0.0..=1.0).contains(&ndc.z), "corner {corner} depth: {ndc}");
        }
    }

    #[test]
    fn fit_targets_bounds_center() {
        let mut camera = Camera::default();
        let bounds = Aabb::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(3.0, 4.0, 5.0));
        camera.fit(&bounds, 1.2);
        assert!((camera.target - Vec3::new(2.0, 3.0, 4.0)).length() < 1e-5);
        // Positioned along the (1,1,1) direction from the center.
        let dir = (camera.position - camera.target).normalize();
        assert!((dir - Vec3::ONE.normalize()).length() < 1e-5);
    }

    #[test]
    fn fit_ignores_empty_bounds() {
        let mut camera = Camera::default();
        let before = camera.position;
        camera.fit(&Aabb::EMPTY, 1.2);
        assert_eq!(camera.position, before);
    }

    #[test]
    fn ndc_ray_through_center_hits_target() {
        let mut camera = Camera::new(50.0, 1.0);
        camera.fit(&Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)), 1.2);

        let ray = camera.ray_from_ndc(Vec2::ZERO);
        // Ray direction should point from camera toward the target.
        let expected = (camera.target - camera.position).normalize();
        assert!((ray.direction - expected).length() < 1e-3);
    }

    #[test]
    fn projected_point_unprojects_to_itself() {
        let camera = Camera::new(50.0, 1.5);
        let point = Vec3::new(0.3, -0.2, -0.4);
        let ndc = project(&camera, point);
        let ray = camera.ray_from_ndc(Vec2::new(ndc.x, ndc.y));

        // The ray must pass within numerical tolerance of the point.
        let to_point = point - ray.origin;
        let along = to_point.dot(ray.direction);
        let closest = ray.origin + ray.direction * along;
        assert!((closest - point).length() < 1e-3);
    }
}

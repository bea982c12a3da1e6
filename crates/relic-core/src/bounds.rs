//! Axis-aligned bounding boxes
//!
//! Used for model normalization (recenter + uniform scale) and for
//! camera fitting.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An empty box that any point or box will expand
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Build a box containing all the given points
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.include(p);
        }
        aabb
    }

    /// Whether any point has been included yet
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Expand to contain the given point
    pub fn include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Expand to contain another box
    pub fn union(&mut self, other: &Aabb) {
        if !other.is_empty() {
            self.min = self.min.min(other.min);
            self.max = self.max.max(other.max);
        }
    }

    /// Center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent of the box along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest extent across the three axes
    pub fn max_dimension(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }

    /// Radius of the sphere centered at `center()` containing the box
    pub fn bounding_radius(&self) -> f32 {
        self.size().length() * 0.5
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_covers_extremes() {
        let aabb = Aabb::from_points([
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(3.0, -2.0, 0.0),
            Vec3::ZERO,
        ]);
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 0.0, 2.0));
    }

    #[test]
    fn center_and_size() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(3.0, 1.0, 1.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(aabb.size(), Vec3::new(4.0, 2.0, 2.0));
        assert_eq!(aabb.max_dimension(), 4.0);
    }

    #[test]
    fn unit_cube_bounding_radius() {
        let aabb = Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        let expected = (3.0_f32).sqrt() * 0.5;
        assert!((aabb.bounding_radius() - expected).abs() < 1e-6);
    }

    #[test]
    fn empty_box_union_is_identity() {
        let mut aabb = Aabb::from_points([Vec3::ONE]);
        let before = aabb;
        aabb.union(&Aabb::EMPTY);
        assert_eq!(aabb, before);
        assert!(Aabb::EMPTY.is_empty());
    }
}

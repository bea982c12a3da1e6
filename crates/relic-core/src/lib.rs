//! Relic Core - shared types for the relic viewer stack
//!
//! This crate provides the foundational types used throughout the viewer:
//! - Mathematical primitives (re-exported from glam)
//! - Transform snapshot for sub-mesh placement
//! - Axis-aligned bounding boxes for normalization and camera fitting
//! - Color type speaking the color-picker hex contract

pub mod bounds;
pub mod types;

pub use bounds::Aabb;
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use types::{Color, ColorParseError, Transform};

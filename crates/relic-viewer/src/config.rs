//! Viewer tunables

use relic_core::Color;
use serde::{Deserialize, Serialize};

/// Face color when no explicit assignment, selection, or hover applies
pub const DEFAULT_FACE_COLOR: Color = Color::rgb(110.0 / 255.0, 86.0 / 255.0, 207.0 / 255.0);
/// Highlight for the currently selected face
pub const SELECTED_FACE_COLOR: Color = Color::rgb(1.0, 107.0 / 255.0, 107.0 / 255.0);
/// Highlight for the currently hovered face
pub const HOVERED_FACE_COLOR: Color = Color::rgb(78.0 / 255.0, 205.0 / 255.0, 196.0 / 255.0);

/// Viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Maximum number of faces to extract; denser meshes are silently
    /// truncated (a performance guard, not an error)
    pub face_cap: usize,
    /// Per-frame interpolation factor for the explode animation (0-1)
    pub explode_damping: f32,
    /// Safety margin applied to the camera fit distance
    pub fit_margin: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Render surface aspect ratio (width / height)
    pub aspect_ratio: f32,
    /// Face color when nothing else applies
    pub default_color: Color,
    /// Selection highlight
    pub selected_color: Color,
    /// Hover highlight
    pub hovered_color: Color,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            face_cap: 1000,
            explode_damping: 0.1,
            fit_margin: 1.2,
            fov_degrees: 50.0,
            aspect_ratio: 16.0 / 9.0,
            default_color: DEFAULT_FACE_COLOR,
            selected_color: SELECTED_FACE_COLOR,
            hovered_color: HOVERED_FACE_COLOR,
        }
    }
}

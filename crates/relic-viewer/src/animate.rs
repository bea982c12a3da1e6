//! Per-frame explode interpolation and color resolution

use std::collections::HashMap;

use relic_core::Color;

use crate::config::ViewerConfig;
use crate::face::FaceSet;

/// Advance every face toward its explode target.
///
/// Target = sub-mesh position + normalize(centroid) * amount, so faces
/// displace outward along the direction of their centroid from the
/// sub-mesh origin. Movement is damped rather than snapped, so changing
/// the amount animates over several frames.
pub fn tick_explode(faces: &mut FaceSet, amount: f32, damping: f32, dt: f32) {
    // Frame-rate independent smoothing, calibrated so `damping` is the
    // per-frame factor at 60 fps.
    let factor = 1.0 - (1.0 - damping.clamp(0.0, 1.0)).powf(dt * 60.0);

    for face in &mut faces.faces {
        let transform = faces.transforms[face.sub_mesh];
        let direction = face.centroid.normalize_or_zero();
        let target = transform.position + direction * amount;
        face.position = face.position.lerp(target, factor);
    }
}

/// Resolve the render color for one face.
///
/// Precedence, highest first: explicit assignment, selection highlight,
/// hover highlight, default.
pub fn resolve_color(
    index: u32,
    assignment: &HashMap<u32, Color>,
    selected: Option<u32>,
    hovered: Option<u32>,
    config: &ViewerConfig,
) -> Color {
    if let Some(color) = assignment.get(&index) {
        return *color;
    }
    if selected == Some(index) {
        return config.selected_color;
    }
    if hovered == Some(index) {
        return config.hovered_color;
    }
    config.default_color
}

/// Recolor every face for the current frame.
pub fn tick_colors(
    faces: &mut FaceSet,
    assignment: &HashMap<u32, Color>,
    selected: Option<u32>,
    hovered: Option<u32>,
    config: &ViewerConfig,
) {
    for face in &mut faces.faces {
        face.color = resolve_color(face.index, assignment, selected, hovered, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use relic_asset::{MeshAsset, MeshPrimitive, SubMesh};

    const DT: f32 = 1.0 / 60.0;

    fn single_face() -> FaceSet {
        let sub = SubMesh::new(
            "tri",
            MeshPrimitive {
                positions: vec![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
                ..Default::default()
            },
        );
        FaceSet::decompose(&MeshAsset::new("test", vec![sub]), 100)
    }

    #[test]
    fn explode_moves_outward_along_centroid() {
        let mut faces = single_face();
        let centroid_dir = faces.faces[0].centroid.normalize();

        for _ in 0..300 {
            tick_explode(&mut faces, 2.0, 0.1, DT);
        }

        let expected = centroid_dir * 2.0;
        assert!((faces.faces[0].position - expected).length() < 1e-3);
    }

    #[test]
    fn zero_amount_converges_to_rest_position() {
        let mut faces = single_face();
        // Start exploded.
        for _ in 0..120 {
            tick_explode(&mut faces, 3.0, 0.1, DT);
        }
        assert!(faces.faces[0].position.length() > 1.0);

        // Then relax back.
        for _ in 0..300 {
            tick_explode(&mut faces, 0.0, 0.1, DT);
        }
        let rest = faces.transforms[faces.faces[0].sub_mesh].position;
        assert!((faces.faces[0].position - rest).length() < 1e-3);
        assert_eq!(rest, Vec3::ZERO);
    }

    #[test]
    fn movement_is_damped_not_snapped() {
        let mut faces = single_face();
        tick_explode(&mut faces, 2.0, 0.1, DT);
        let after_one = faces.faces[0].position;
        // One frame covers roughly a tenth of the distance, not all of it.
        assert!(after_one.length() > 0.0);
        assert!(after_one.length() < 1.0);
    }

    #[test]
    fn assignment_beats_selection_highlight() {
        let config = ViewerConfig::default();
        let mut assignment = HashMap::new();
        let assigned = Color::from_hex(0x123456);
        assignment.insert(7, assigned);

        let resolved = resolve_color(7, &assignment, Some(7), Some(7), &config);
        assert_eq!(resolved, assigned);
    }

    #[test]
    fn selection_beats_hover_beats_default() {
        let config = ViewerConfig::default();
        let empty = HashMap::new();

        assert_eq!(
            resolve_color(3, &empty, Some(3), Some(3), &config),
            config.selected_color
        );
        assert_eq!(
            resolve_color(3, &empty, None, Some(3), &config),
            config.hovered_color
        );
        assert_eq!(
            resolve_color(3, &empty, Some(9), Some(9), &config),
            config.default_color
        );
    }

    #[test]
    fn tick_colors_writes_every_face() {
        let mut faces = single_face();
        let config = ViewerConfig::default();
        let empty = HashMap::new();
        tick_colors(&mut faces, &empty, None, Some(0), &config);
        assert_eq!(faces.faces[0].color, config.hovered_color);
    }
}

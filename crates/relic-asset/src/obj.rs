//! Wavefront OBJ text parser
//!
//! Produces one sub-mesh per `o` statement (or a single unnamed one) with
//! non-indexed triangles; polygons are fan-triangulated.

use crate::error::AssetError;
use crate::format::MeshFormat;
use crate::mesh::{MeshAsset, MeshPrimitive, SubMesh};

pub fn parse_obj(text: &str) -> Result<MeshAsset, AssetError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();

    let mut sub_meshes: Vec<SubMesh> = Vec::new();
    let mut current = MeshPrimitive::default();
    let mut current_name = String::from("default");
    let mut current_uvs: Vec<[f32; 2]> = Vec::new();

    let mut flush = |name: &str, prim: &mut MeshPrimitive, uvs: &mut Vec<[f32; 2]>| {
        if !prim.positions.is_empty() {
            let mut prim = std::mem::take(prim);
            if !uvs.is_empty() {
                prim.tex_coords = Some(std::mem::take(uvs));
            }
            sub_meshes.push(SubMesh::new(name, prim));
        }
        uvs.clear();
    };

    for line in text.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() || parts[0].starts_with('#') {
            continue;
        }

        match parts[0] {
            "o" | "g" => {
                flush(&current_name, &mut current, &mut current_uvs);
                current_name = parts.get(1).unwrap_or(&"default").to_string();
            }
            "v" if parts.len() >= 4 => {
                positions.push([
                    parts[1].parse().unwrap_or(0.0),
                    parts[2].parse().unwrap_or(0.0),
                    parts[3].parse().unwrap_or(0.0),
                ]);
            }
            "vn" if parts.len() >= 4 => {
                normals.push([
                    parts[1].parse().unwrap_or(0.0),
                    parts[2].parse().unwrap_or(1.0),
                    parts[3].parse().unwrap_or(0.0),
                ]);
            }
            "vt" if parts.len() >= 3 => {
                uvs.push([
                    parts[1].parse().unwrap_or(0.0),
                    parts[2].parse().unwrap_or(0.0),
                ]);
            }
            "f" if parts.len() >= 4 => {
                let corners: Vec<ObjCorner> = parts[1..]
                    .iter()
                    .filter_map(|p| ObjCorner::parse(p, positions.len(), uvs.len(), normals.len()))
                    .collect();
                if corners.len() < 3 {
                    continue;
                }

                // Fan triangulation around the first corner.
                for i in 1..corners.len() - 1 {
                    for corner in [&corners[0], &corners[i], &corners[i + 1]] {
                        let Some(&pos) = positions.get(corner.position) else {
                            continue;
                        };
                        current.positions.push(pos);
                        if let Some(n) = corner.normal.and_then(|i| normals.get(i)) {
                            current.normals.push(*n);
                        }
                        if let Some(uv) = corner.uv.and_then(|i| uvs.get(i)) {
                            current_uvs.push(*uv);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    flush(&current_name, &mut current, &mut current_uvs);

    if sub_meshes.is_empty() {
        return Err(AssetError::parse(MeshFormat::Obj, "no face data found"));
    }

    Ok(MeshAsset::new("obj", sub_meshes))
}

/// One `v/vt/vn` reference within a face statement.
struct ObjCorner {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

impl ObjCorner {
    fn parse(token: &str, n_pos: usize, n_uv: usize, n_norm: usize) -> Option<Self> {
        let mut fields = token.split('/');
        let position = resolve_index(fields.next()?, n_pos)?;
        let uv = fields.next().and_then(|f| resolve_index(f, n_uv));
        let normal = fields.next().and_then(|f| resolve_index(f, n_norm));
        Some(Self {
            position,
            uv,
            normal,
        })
    }
}

/// OBJ indices are 1-based; negative values count back from the end.
fn resolve_index(field: &str, len: usize) -> Option<usize> {
    let value: i64 = field.parse().ok()?;
    let index = if value < 0 {
        len as i64 + value
    } else {
        value - 1
    };
    (0..len as i64).contains(&index).then_some(index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
# simple triangle
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";

    #[test]
    fn parses_minimal_triangle() {
        let asset = parse_obj(TRIANGLE).unwrap();
        assert_eq!(asset.sub_meshes.len(), 1);
        assert_eq!(asset.triangle_count(), 1);
        assert_eq!(asset.sub_meshes[0].primitive.positions[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn fan_triangulates_quads() {
        let obj = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let asset = parse_obj(obj).unwrap();
        assert_eq!(asset.triangle_count(), 2);
    }

    #[test]
    fn handles_negative_and_slashed_indices() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
vt 0 0
vt 1 0
vt 0 1
f -3/1/1 -2/2/1 -1/3/1
";
        let asset = parse_obj(obj).unwrap();
        let prim = &asset.sub_meshes[0].primitive;
        assert_eq!(prim.positions.len(), 3);
        assert_eq!(prim.normals.len(), 3);
        assert_eq!(prim.tex_coords.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn splits_objects_into_sub_meshes() {
        let obj = "\
o first
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o second
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
";
        let asset = parse_obj(obj).unwrap();
        assert_eq!(asset.sub_meshes.len(), 2);
        assert_eq!(asset.sub_meshes[0].name, "first");
        assert_eq!(asset.sub_meshes[1].name, "second");
    }

    #[test]
    fn rejects_faceless_input() {
        assert!(parse_obj("v 0 0 0\nv 1 1 1\n").is_err());
        assert!(parse_obj("hello world").is_err());
    }
}

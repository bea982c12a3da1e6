//! STL (stereolithography) parser
//!
//! Detects ascii vs binary from the content itself: a leading `solid`
//! token is not enough, since binary exporters routinely write it into
//! the 80-byte header.

use crate::error::AssetError;
use crate::format::MeshFormat;
use crate::mesh::{MeshAsset, MeshPrimitive, SubMesh};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

pub fn parse_stl(bytes: &[u8]) -> Result<MeshAsset, AssetError> {
    if looks_ascii(bytes) {
        parse_ascii(bytes)
    } else {
        parse_binary(bytes)
    }
}

fn looks_ascii(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    text.trim_start().starts_with("solid") && text.contains("facet")
}

fn parse_binary(bytes: &[u8]) -> Result<MeshAsset, AssetError> {
    let bad = |reason: String| AssetError::parse(MeshFormat::Stl, reason);

    if bytes.len() < HEADER_LEN + 4 {
        return Err(bad("file too small for header + triangle count".into()));
    }

    let count = u32::from_le_bytes([
        bytes[HEADER_LEN],
        bytes[HEADER_LEN + 1],
        bytes[HEADER_LEN + 2],
        bytes[HEADER_LEN + 3],
    ]) as usize;

    let expected = HEADER_LEN + 4 + count * FACET_LEN;
    if bytes.len() < expected {
        return Err(bad(format!(
            "truncated: expected {expected} bytes for {count} triangles, got {}",
            bytes.len()
        )));
    }

    let mut positions = Vec::with_capacity(count * 3);
    let mut normals = Vec::with_capacity(count * 3);

    let mut offset = HEADER_LEN + 4;
    for _ in 0..count {
        let normal = read_vec3(bytes, offset);
        offset += 12;
        for _ in 0..3 {
            positions.push(read_vec3(bytes, offset));
            // Repeated per vertex for flat shading.
            normals.push(normal);
            offset += 12;
        }
        // Attribute byte count, unused.
        offset += 2;
    }

    if positions.is_empty() {
        return Err(bad("no triangles".into()));
    }

    let primitive = MeshPrimitive {
        positions,
        normals,
        ..Default::default()
    };
    Ok(MeshAsset::new("stl", vec![SubMesh::new("stl", primitive)]))
}

fn parse_ascii(bytes: &[u8]) -> Result<MeshAsset, AssetError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| AssetError::parse(MeshFormat::Stl, "ascii body is not UTF-8"))?;

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut facet_normal = [0.0f32; 3];

    for line in text.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["facet", "normal", x, y, z] => {
                facet_normal = [
                    x.parse().unwrap_or(0.0),
                    y.parse().unwrap_or(0.0),
                    z.parse().unwrap_or(0.0),
                ];
            }
            ["vertex", x, y, z] => {
                let vertex = [
                    x.parse().unwrap_or(0.0),
                    y.parse().unwrap_or(0.0),
                    z.parse().unwrap_or(0.0),
                ];
                positions.push(vertex);
                normals.push(facet_normal);
            }
            _ => {}
        }
    }

    if positions.is_empty() || positions.len() % 3 != 0 {
        return Err(AssetError::parse(
            MeshFormat::Stl,
            format!("expected vertex count divisible by 3, got {}", positions.len()),
        ));
    }

    let primitive = MeshPrimitive {
        positions,
        normals,
        ..Default::default()
    };
    Ok(MeshAsset::new("stl", vec![SubMesh::new("stl", primitive)]))
}

fn read_vec3(bytes: &[u8], offset: usize) -> [f32; 3] {
    let f = |i: usize| {
        f32::from_le_bytes([
            bytes[offset + i * 4],
            bytes[offset + i * 4 + 1],
            bytes[offset + i * 4 + 2],
            bytes[offset + i * 4 + 3],
        ])
    };
    [f(0), f(1), f(2)]
}

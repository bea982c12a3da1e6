//! Relic Asset - mesh parsing and normalization
//!
//! Turns raw scan bytes (OBJ, PLY, STL, GLB, GLTF) into a normalized
//! [`MeshAsset`], with a deterministic procedural fallback for anything
//! that fails to parse.

mod error;
mod fallback;
mod format;
mod gltf_loader;
mod mesh;
mod obj;
mod ply;
pub mod primitives;
mod stl;
mod texture;

use tracing::{debug, warn};

pub use error::AssetError;
pub use fallback::placeholder_artifact;
pub use format::MeshFormat;
pub use mesh::{MeshAsset, MeshPrimitive, SubMesh, CANONICAL_SIZE};
pub use texture::{TextureAsset, TextureFormat};

/// Parse raw bytes in the declared format and normalize the result.
pub fn load_mesh(bytes: &[u8], format: MeshFormat) -> Result<MeshAsset, AssetError> {
    let mut asset = match format {
        MeshFormat::Obj => {
            let text = std::str::from_utf8(bytes)
                .map_err(|_| AssetError::parse(MeshFormat::Obj, "not valid UTF-8"))?;
            obj::parse_obj(text)?
        }
        MeshFormat::Ply => ply::parse_ply(bytes)?,
        MeshFormat::Stl => stl::parse_stl(bytes)?,
        MeshFormat::Glb | MeshFormat::Gltf => gltf_loader::load_gltf(bytes)?,
    };

    asset.normalize();
    debug!(
        format = %format,
        triangles = asset.triangle_count(),
        scale = asset.scale,
        "loaded mesh"
    );
    Ok(asset)
}

/// Parse with a declared format tag, substituting the placeholder artifact
/// on any failure. This is the loader boundary: errors never travel past
/// it toward the renderer.
pub fn load_mesh_or_placeholder(bytes: &[u8], format_tag: &str) -> MeshAsset {
    let result = format_tag
        .parse::<MeshFormat>()
        .and_then(|format| load_mesh(bytes, format));

    match result {
        Ok(asset) => asset,
        Err(e) => {
            warn!("mesh load failed, substituting placeholder: {e}");
            placeholder_artifact()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_mesh_normalizes() {
        let obj = "v 0 0 0\nv 10 0 0\nv 0 10 0\nf 1 2 3\n";
        let asset = load_mesh(obj.as_bytes(), MeshFormat::Obj).unwrap();
        assert!((asset.bounds.max_dimension() - CANONICAL_SIZE).abs() < 1e-4);
        assert!(asset.bounds.center().length() < 1e-4);
    }

    #[test]
    fn unsupported_tag_yields_placeholder() {
        let asset = load_mesh_or_placeholder(b"whatever", "fbx");
        assert_eq!(asset.name, "placeholder");
        assert!(asset.triangle_count() > 0);
    }

    #[test]
    fn garbage_bytes_yield_placeholder() {
        let asset = load_mesh_or_placeholder(b"\x00\x01\x02garbage", "ply");
        assert_eq!(asset.name, "placeholder");
    }

    #[test]
    fn valid_bytes_do_not_fall_back() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let asset = load_mesh_or_placeholder(obj.as_bytes(), "obj");
        assert_eq!(asset.name, "obj");
    }
}

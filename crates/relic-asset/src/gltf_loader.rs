//! glTF 2.0 loading (.glb and .gltf with embedded buffers)
//!
//! Built on the gltf crate's slice import since resource bytes arrive
//! over HTTP rather than from disk. Scene hierarchy is flattened: each
//! mesh primitive becomes one sub-mesh carrying its world transform.

use glam::Mat4;
use tracing::debug;

use relic_core::{Color, Transform};

use crate::error::AssetError;
use crate::format::MeshFormat;
use crate::mesh::{MeshAsset, MeshPrimitive, SubMesh};
use crate::texture;

pub fn load_gltf(bytes: &[u8]) -> Result<MeshAsset, AssetError> {
    let (document, buffers, images) = gltf::import_slice(bytes)
        .map_err(|e| AssetError::parse(MeshFormat::Gltf, e.to_string()))?;

    let mut sub_meshes = Vec::new();

    // Depth-first over the default scene so sub-mesh order is stable.
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| AssetError::parse(MeshFormat::Gltf, "no scenes"))?;

    for node in scene.nodes() {
        visit_node(&node, Mat4::IDENTITY, &buffers, &mut sub_meshes);
    }

    if sub_meshes.is_empty() {
        return Err(AssetError::parse(MeshFormat::Gltf, "no mesh primitives"));
    }

    let mut asset = MeshAsset::new("gltf", sub_meshes);
    asset.textures = images
        .iter()
        .filter_map(texture::from_gltf_image)
        .collect();

    debug!(
        sub_meshes = asset.sub_meshes.len(),
        textures = asset.textures.len(),
        "loaded glTF scene"
    );
    Ok(asset)
}

fn visit_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<SubMesh>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let name = mesh.name().unwrap_or("unnamed").to_string();

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|iter| iter.collect())
                .unwrap_or_default();
            if positions.is_empty() {
                continue;
            }

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|iter| iter.collect())
                .unwrap_or_default();

            let tex_coords: Option<Vec<[f32; 2]>> = reader
                .read_tex_coords(0)
                .map(|tc| tc.into_f32().collect());

            let indices: Option<Vec<u32>> = reader
                .read_indices()
                .map(|idx| idx.into_u32().collect());

            let pbr = primitive.material().pbr_metallic_roughness();
            let [r, g, b, a] = pbr.base_color_factor();
            let texture = pbr
                .base_color_texture()
                .map(|info| info.texture().source().index());

            let mut sub = SubMesh::new(
                name.clone(),
                MeshPrimitive {
                    positions,
                    normals,
                    tex_coords,
                    indices,
                },
            );
            sub.transform = Transform::from_matrix(world);
            sub.base_color = Color::rgba(r, g, b, a);
            sub.texture = texture;
            out.push(sub);
        }
    }

    for child in node.children() {
        visit_node(&child, world, buffers, out);
    }
}

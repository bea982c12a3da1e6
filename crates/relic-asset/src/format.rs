use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// The declared format of an uploaded scan.
///
/// The caller passes the authoritative format tag alongside the resource
/// URL; resource endpoints do not encode the extension in their path, so
/// dispatch never sniffs the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshFormat {
    /// Wavefront OBJ text
    Obj,
    /// Polygon file format, ascii or binary
    Ply,
    /// Stereolithography, ascii or binary
    Stl,
    /// Binary glTF container
    Glb,
    /// glTF JSON with embedded buffers
    Gltf,
}

impl MeshFormat {
    pub const ALL: [MeshFormat; 5] = [
        MeshFormat::Obj,
        MeshFormat::Ply,
        MeshFormat::Stl,
        MeshFormat::Glb,
        MeshFormat::Gltf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeshFormat::Obj => "obj",
            MeshFormat::Ply => "ply",
            MeshFormat::Stl => "stl",
            MeshFormat::Glb => "glb",
            MeshFormat::Gltf => "gltf",
        }
    }
}

impl std::fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MeshFormat {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "obj" => Ok(MeshFormat::Obj),
            "ply" => Ok(MeshFormat::Ply),
            "stl" => Ok(MeshFormat::Stl),
            "glb" => Ok(MeshFormat::Glb),
            "gltf" => Ok(MeshFormat::Gltf),
            other => Err(AssetError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrip() {
        for format in MeshFormat::ALL {
            assert_eq!(format.as_str().parse::<MeshFormat>().unwrap(), format);
        }
    }

    #[test]
    fn tag_is_case_insensitive() {
        assert_eq!("STL".parse::<MeshFormat>().unwrap(), MeshFormat::Stl);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "fbx".parse::<MeshFormat>().unwrap_err();
        assert!(matches!(err, AssetError::UnsupportedFormat(tag) if tag == "fbx"));
    }
}

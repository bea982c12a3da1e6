//! PLY (polygon file format) parser
//!
//! Handles the ascii, binary_little_endian, and binary_big_endian body
//! encodings. Vertex positions (and normals when present) are read from
//! the `vertex` element, triangles from the `face` element's index lists;
//! other elements are skipped row by row.

use crate::error::AssetError;
use crate::format::MeshFormat;
use crate::mesh::{MeshAsset, MeshPrimitive, SubMesh};

pub fn parse_ply(bytes: &[u8]) -> Result<MeshAsset, AssetError> {
    let (header, body) = split_header(bytes)?;
    let header = parse_header(&header)?;

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    let mut reader = BodyReader::new(body, header.encoding)?;

    for element in &header.elements {
        match element.name.as_str() {
            "vertex" => {
                for _ in 0..element.count {
                    let mut pos = [0.0f32; 3];
                    let mut normal = [0.0f32; 3];
                    let mut has_normal = false;

                    for prop in &element.properties {
                        match &prop.kind {
                            PropKind::Scalar(ty) => {
                                let value = reader.read_scalar(*ty)? as f32;
                                match prop.name.as_str() {
                                    "x" => pos[0] = value,
                                    "y" => pos[1] = value,
                                    "z" => pos[2] = value,
                                    "nx" => {
                                        normal[0] = value;
                                        has_normal = true;
                                    }
                                    "ny" => normal[1] = value,
                                    "nz" => normal[2] = value,
                                    _ => {}
                                }
                            }
                            PropKind::List { count, item } => {
                                reader.skip_list(*count, *item)?;
                            }
                        }
                    }

                    positions.push(pos);
                    if has_normal {
                        normals.push(normal);
                    }
                }
            }
            "face" => {
                for _ in 0..element.count {
                    for prop in &element.properties {
                        match &prop.kind {
                            PropKind::List { count, item }
                                if prop.name == "vertex_indices"
                                    || prop.name == "vertex_index" =>
                            {
                                let n = reader.read_scalar(*count)? as usize;
                                if n > 255 {
                                    return Err(AssetError::parse(
                                        MeshFormat::Ply,
                                        format!("implausible face arity {n}"),
                                    ));
                                }
                                let mut face = Vec::with_capacity(n);
                                for _ in 0..n {
                                    face.push(reader.read_scalar(*item)? as u32);
                                }
                                // Fan triangulation for polygons.
                                for i in 1..face.len().saturating_sub(1) {
                                    indices.extend([face[0], face[i], face[i + 1]]);
                                }
                            }
                            PropKind::List { count, item } => {
                                reader.skip_list(*count, *item)?;
                            }
                            PropKind::Scalar(ty) => {
                                reader.read_scalar(*ty)?;
                            }
                        }
                    }
                }
            }
            _ => {
                for _ in 0..element.count {
                    for prop in &element.properties {
                        match &prop.kind {
                            PropKind::Scalar(ty) => {
                                reader.read_scalar(*ty)?;
                            }
                            PropKind::List { count, item } => {
                                reader.skip_list(*count, *item)?;
                            }
                        }
                    }
                }
            }
        }
    }

    if positions.is_empty() {
        return Err(AssetError::parse(MeshFormat::Ply, "no vertex data found"));
    }
    if let Some(&max) = indices.iter().max() {
        if max as usize >= positions.len() {
            return Err(AssetError::parse(
                MeshFormat::Ply,
                format!("face index {max} out of range"),
            ));
        }
    }

    let primitive = MeshPrimitive {
        positions,
        normals,
        tex_coords: None,
        indices: (!indices.is_empty()).then_some(indices),
    };
    Ok(MeshAsset::new("ply", vec![SubMesh::new("ply", primitive)]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Ascii,
    BinaryLittle,
    BinaryBig,
}

#[derive(Debug, Clone, Copy)]
enum ScalarType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl ScalarType {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "char" | "int8" => Some(Self::I8),
            "uchar" | "uint8" => Some(Self::U8),
            "short" | "int16" => Some(Self::I16),
            "ushort" | "uint16" => Some(Self::U16),
            "int" | "int32" => Some(Self::I32),
            "uint" | "uint32" => Some(Self::U32),
            "float" | "float32" => Some(Self::F32),
            "double" | "float64" => Some(Self::F64),
            _ => None,
        }
    }

    fn size(&self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }
}

#[derive(Debug)]
enum PropKind {
    Scalar(ScalarType),
    List { count: ScalarType, item: ScalarType },
}

#[derive(Debug)]
struct Property {
    name: String,
    kind: PropKind,
}

#[derive(Debug)]
struct Element {
    name: String,
    count: usize,
    properties: Vec<Property>,
}

#[derive(Debug)]
struct Header {
    encoding: Encoding,
    elements: Vec<Element>,
}

/// Split raw bytes into the ascii header text and the body that follows
/// `end_header`.
fn split_header(bytes: &[u8]) -> Result<(String, &[u8]), AssetError> {
    const MARKER: &[u8] = b"end_header";
    let start = bytes
        .windows(MARKER.len())
        .position(|w| w == MARKER)
        .ok_or_else(|| AssetError::parse(MeshFormat::Ply, "missing end_header"))?;

    let after = start + MARKER.len();
    let body_start = bytes[after..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| after + i + 1)
        .unwrap_or(bytes.len());

    let header = String::from_utf8_lossy(&bytes[..start]).into_owned();
    Ok((header, &bytes[body_start..]))
}

fn parse_header(text: &str) -> Result<Header, AssetError> {
    let bad = |reason: &str| AssetError::parse(MeshFormat::Ply, reason.to_string());

    let mut lines = text.lines();
    if lines.next().map(str::trim) != Some("ply") {
        return Err(bad("missing ply magic"));
    }

    let mut encoding = None;
    let mut elements: Vec<Element> = Vec::new();

    for line in lines {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] | ["comment", ..] | ["obj_info", ..] => {}
            ["format", kind, _version] => {
                encoding = Some(match *kind {
                    "ascii" => Encoding::Ascii,
                    "binary_little_endian" => Encoding::BinaryLittle,
                    "binary_big_endian" => Encoding::BinaryBig,
                    other => return Err(bad(&format!("unknown format '{other}'"))),
                });
            }
            ["element", name, count] => {
                let count = count
                    .parse()
                    .map_err(|_| bad(&format!("bad element count '{count}'")))?;
                elements.push(Element {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            ["property", "list", count_ty, item_ty, name] => {
                let element = elements.last_mut().ok_or_else(|| bad("property before element"))?;
                let count = ScalarType::from_name(count_ty)
                    .ok_or_else(|| bad(&format!("unknown type '{count_ty}'")))?;
                let item = ScalarType::from_name(item_ty)
                    .ok_or_else(|| bad(&format!("unknown type '{item_ty}'")))?;
                element.properties.push(Property {
                    name: name.to_string(),
                    kind: PropKind::List { count, item },
                });
            }
            ["property", ty, name] => {
                let element = elements.last_mut().ok_or_else(|| bad("property before element"))?;
                let ty = ScalarType::from_name(ty)
                    .ok_or_else(|| bad(&format!("unknown type '{ty}'")))?;
                element.properties.push(Property {
                    name: name.to_string(),
                    kind: PropKind::Scalar(ty),
                });
            }
            _ => return Err(bad(&format!("unrecognized header line '{line}'"))),
        }
    }

    Ok(Header {
        encoding: encoding.ok_or_else(|| bad("missing format line"))?,
        elements,
    })
}

/// Sequential reader over the element body, ascii or binary.
enum BodyReader<'a> {
    Ascii(std::str::SplitWhitespace<'a>),
    Binary {
        bytes: &'a [u8],
        pos: usize,
        big_endian: bool,
    },
}

/// Decode a fixed-width value of the given type from a byte slice.
macro_rules! decode {
    ($ty:ty, $slice:expr, $be:expr) => {{
        let mut array = [0u8; std::mem::size_of::<$ty>()];
        array.copy_from_slice($slice);
        if $be {
            <$ty>::from_be_bytes(array) as f64
        } else {
            <$ty>::from_le_bytes(array) as f64
        }
    }};
}

impl<'a> BodyReader<'a> {
    fn new(body: &'a [u8], encoding: Encoding) -> Result<Self, AssetError> {
        match encoding {
            Encoding::Ascii => {
                let text = std::str::from_utf8(body)
                    .map_err(|_| AssetError::parse(MeshFormat::Ply, "ascii body is not UTF-8"))?;
                Ok(Self::Ascii(text.split_whitespace()))
            }
            Encoding::BinaryLittle => Ok(Self::Binary {
                bytes: body,
                pos: 0,
                big_endian: false,
            }),
            Encoding::BinaryBig => Ok(Self::Binary {
                bytes: body,
                pos: 0,
                big_endian: true,
            }),
        }
    }

    fn read_scalar(&mut self, ty: ScalarType) -> Result<f64, AssetError> {
        match self {
            Self::Ascii(tokens) => {
                let token = tokens
                    .next()
                    .ok_or_else(|| AssetError::parse(MeshFormat::Ply, "unexpected end of body"))?;
                token
                    .parse()
                    .map_err(|_| AssetError::parse(MeshFormat::Ply, format!("bad number '{token}'")))
            }
            Self::Binary {
                bytes,
                pos,
                big_endian,
            } => {
                let size = ty.size();
                let slice = bytes
                    .get(*pos..*pos + size)
                    .ok_or_else(|| AssetError::parse(MeshFormat::Ply, "body truncated"))?;
                *pos += size;

                let be = *big_endian;
                let value = match ty {
                    ScalarType::I8 => slice[0] as i8 as f64,
                    ScalarType::U8 => slice[0] as f64,
                    ScalarType::I16 => decode!(i16, slice, be),
                    ScalarType::U16 => decode!(u16, slice, be),
                    ScalarType::I32 => decode!(i32, slice, be),
                    ScalarType::U32 => decode!(u32, slice, be),
                    ScalarType::F32 => decode!(f32, slice, be),
                    ScalarType::F64 => decode!(f64, slice, be),
                };
                Ok(value)
            }
        }
    }

    fn skip_list(&mut self, count: ScalarType, item: ScalarType) -> Result<(), AssetError> {
        let n = self.read_scalar(count)? as usize;
        for _ in 0..n {
            self.read_scalar(item)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII_TETRA: &str = "\
ply
format ascii 1.0
comment a tetrahedron
element vertex 4
property float x
property float y
property float z
element face 4
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
0 1 0
0 0 1
3 0 1 2
3 0 1 3
3 0 2 3
3 1 2 3
";

    #[test]
    fn parses_ascii_file() {
        let asset = parse_ply(ASCII_TETRA.as_bytes()).unwrap();
        let prim = &asset.sub_meshes[0].primitive;
        assert_eq!(prim.positions.len(), 4);
        assert_eq!(prim.indices.as_ref().unwrap().len(), 12);
    }

    #[test]
    fn fan_triangulates_quads() {
        let ply = "\
ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
1 1 0
0 1 0
4 0 1 2 3
";
        let asset = parse_ply(ply.as_bytes()).unwrap();
        assert_eq!(asset.triangle_count(), 2);
    }

    fn binary_triangle() -> Vec<u8> {
        let header = "\
ply
format binary_little_endian 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar uint vertex_indices
end_header
";
        let mut bytes = header.as_bytes().to_vec();
        for v in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            for c in v {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        bytes.push(3);
        for i in [0u32, 1, 2] {
            bytes.extend_from_slice(&i.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn parses_binary_little_endian() {
        let asset = parse_ply(&binary_triangle()).unwrap();
        let prim = &asset.sub_meshes[0].primitive;
        assert_eq!(prim.positions[1], [1.0, 0.0, 0.0]);
        assert_eq!(prim.indices.as_deref(), Some(&[0u32, 1, 2][..]));
    }

    #[test]
    fn rejects_truncated_binary_body() {
        let mut bytes = binary_triangle();
        bytes.truncate(bytes.len() - 4);
        assert!(parse_ply(&bytes).is_err());
    }

    #[test]
    fn rejects_out_of_range_indices() {
        let ply = "\
ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
0 1 0
3 0 1 9
";
        assert!(parse_ply(ply.as_bytes()).is_err());
    }

    #[test]
    fn rejects_non_ply_bytes() {
        assert!(parse_ply(b"not a ply file at all").is_err());
    }
}

use tracing::debug;

/// Pixel format of an embedded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8,
}

/// An embedded texture with raw pixel data, ready for a host renderer.
#[derive(Debug, Clone)]
pub struct TextureAsset {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub format: TextureFormat,
}

/// Convert a decoded glTF image into an RGBA8 texture.
///
/// Returns `None` for pixel layouts neither we nor the image crate can
/// expand; the sub-mesh then falls back to its base color factor.
pub(crate) fn from_gltf_image(image: &gltf::image::Data) -> Option<TextureAsset> {
    let (width, height) = (image.width, image.height);
    let data = match image.format {
        gltf::image::Format::R8G8B8A8 => image.pixels.clone(),
        gltf::image::Format::R8G8B8 => {
            let mut rgba = Vec::with_capacity(image.pixels.len() / 3 * 4);
            for chunk in image.pixels.chunks(3) {
                rgba.extend_from_slice(chunk);
                rgba.push(255);
            }
            rgba
        }
        _ => {
            let img = image::RgbaImage::from_raw(width, height, image.pixels.clone());
            match img {
                Some(img) => img.into_raw(),
                None => {
                    debug!("skipping texture with unsupported pixel format");
                    return None;
                }
            }
        }
    };

    Some(TextureAsset {
        width,
        height,
        data,
        format: TextureFormat::Rgba8,
    })
}

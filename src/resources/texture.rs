use std::path::Path;

use image::RgbaImage;

use crate::{
    data_structures::texture::Texture,
    engine::Engine,
    error::{DemoError, Result},
    teardown::Handle,
};

use super::load_binary;

/// Interpret `bytes` as tightly packed RGBA8 pixels of a known size.
pub fn decode_rgba(bytes: Vec<u8>, width: u32, height: u32, path: &Path) -> Result<RgbaImage> {
    let expected = width as usize * height as usize * 4;
    if bytes.len() != expected {
        return Err(DemoError::asset(
            path,
            format!(
                "expected {expected} bytes for {width}x{height} RGBA8, found {}",
                bytes.len()
            ),
        ));
    }
    RgbaImage::from_raw(width, height, bytes)
        .ok_or_else(|| DemoError::asset(path, "pixel buffer does not fit the image"))
}

/// Decode an encoded image (PNG, JPEG, BMP, TGA) to RGBA8.
pub fn decode_image(bytes: &[u8], path: &Path) -> Result<RgbaImage> {
    let image = match image::ImageFormat::from_path(path) {
        Ok(format) => image::load_from_memory_with_format(bytes, format),
        Err(_) => image::load_from_memory(bytes),
    };
    image
        .map(|image| image.to_rgba8())
        .map_err(|e| DemoError::asset(path, e))
}

/// Load a headerless RGBA8 file and upload it.
pub async fn load_rgba_texture(
    engine: &mut Engine,
    path: &Path,
    width: u32,
    height: u32,
) -> Result<Handle<Texture>> {
    let bytes = load_binary(path).await?;
    let image = decode_rgba(bytes, width, height, path)?;
    Ok(engine.create_texture(&label(path), &image))
}

/// Load an encoded image file and upload it.
pub async fn load_image_texture(engine: &mut Engine, path: &Path) -> Result<Handle<Texture>> {
    let bytes = load_binary(path).await?;
    let image = decode_image(&bytes, path)?;
    Ok(engine.create_texture(&label(path), &image))
}

fn label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

//! Rasterizing decoded sheets, PNG output and file path generation

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::color::Rgb;
use crate::models::SpriteSheet;

/// Color used for transparent pixels and missing palettes
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Paint a sheet's first layer through its palettes.
///
/// When `transparent` is set, pixels showing their tile's transparent index
/// get alpha 0; otherwise every pixel is drawn opaque. Tiles referencing a
/// palette the sheet does not have are left fully transparent.
///
/// # Examples
///
/// ```
/// use tilebin::models::SpriteSheet;
/// use tilebin::output::render_sheet;
///
/// let mut sheet = SpriteSheet::new(2, 1, 2, 2).unwrap();
/// sheet.set_pixel(0, 0, Some(15));
/// let image = render_sheet(&sheet, true);
/// assert_eq!(image.dimensions(), (4, 2));
/// assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
/// assert_eq!(image.get_pixel(1, 0).0[3], 0);
/// ```
pub fn render_sheet(sheet: &SpriteSheet, transparent: bool) -> RgbaImage {
    let width = sheet.pixel_width() as u32;
    let height = sheet.pixel_height() as u32;
    let mut image = RgbaImage::from_pixel(width, height, TRANSPARENT);

    for row in 0..sheet.pixel_height() {
        for column in 0..sheet.pixel_width() {
            if transparent && sheet.is_transparent(row, column) {
                continue;
            }
            if let Some(rgb) = sheet.pixel_rgb(row, column) {
                let Rgb { r, g, b } = Rgb::from_u32(rgb);
                image.put_pixel(column as u32, row as u32, Rgba([r, g, b, 255]));
            }
        }
    }

    image
}

/// Save an RGBA image to a PNG file.
///
/// # Arguments
///
/// * `image` - The image to save
/// * `path` - The output file path
///
/// # Returns
///
/// * `Ok(())` on success
/// * `Err(OutputError)` on failure
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    Ok(())
}

/// Write raw bytes, creating parent directories as needed.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    log::info!("Writing {} ({} bytes)", path.display(), bytes.len());
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This preserves crisp pixel edges for pixel art.
///
/// # Arguments
///
/// * `image` - The image to scale
/// * `factor` - Scale factor (1 means no scaling)
///
/// # Returns
///
/// The scaled image (or original if factor is 1)
pub fn scale_image(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor, h * factor, FilterType::Nearest)
}

/// Generate the output path for a converted file.
///
/// | Scenario | Output |
/// |----------|--------|
/// | No `-o` | input path with `extension` |
/// | `-o out.ext` | `out.ext` |
/// | `-o dir/` | `dir/{input_stem}.{extension}` |
pub fn generate_output_path(input: &Path, output_arg: Option<&Path>, extension: &str) -> PathBuf {
    let input_stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    match output_arg {
        Some(output) => {
            // Check if output is a directory (ends with / or is existing directory)
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
            if is_dir {
                output.join(format!("{}.{}", input_stem, extension))
            } else {
                output.to_path_buf()
            }
        }
        None => input.with_extension(extension),
    }
}

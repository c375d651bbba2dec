use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgb as ImageRgb, RgbImage};

use crate::canvas::{Canvas, Rgb};

/// Decodes any supported raster file into an RGB pixel grid. The canvas
/// adopts the decoded dimensions as-is.
pub fn load_image(path: &Path) -> Result<(usize, usize, Vec<Rgb>)> {
    let decoded = image::open(path)
        .with_context(|| format!("Failed to load image: {}", path.display()))?
        .to_rgb8();

    let (width, height) = decoded.dimensions();
    let pixels = decoded
        .pixels()
        .map(|p| (p.0[0], p.0[1], p.0[2]))
        .collect();
    Ok((width as usize, height as usize, pixels))
}

/// Writes the canvas verbatim as a full-color PNG. Export never quantizes
/// through the palette.
pub fn save_image(path: &Path, canvas: &Canvas) -> Result<()> {
    let mut out: RgbImage = ImageBuffer::new(canvas.width() as u32, canvas.height() as u32);
    for (i, &(r, g, b)) in canvas.pixels().iter().enumerate() {
        let x = (i % canvas.width()) as u32;
        let y = (i / canvas.width()) as u32;
        out.put_pixel(x, y, ImageRgb([r, g, b]));
    }
    out.save(path)
        .with_context(|| format!("Failed to save image: {}", path.display()))
}

/// Auto-save checkpoint path next to the output file.
pub fn checkpoint_path(output: &Path) -> PathBuf {
    with_suffix(output, "autosave")
}

/// Emergency-save path used on interrupt, tagged with the signal number.
pub fn emergency_path(output: &Path, signal: i32) -> PathBuf {
    with_suffix(output, &format!("sig{signal}"))
}

fn with_suffix(output: &Path, tag: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pix");
    output.with_file_name(format!("{stem}.{tag}.png"))
}

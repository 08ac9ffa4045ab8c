use std::path::Path;

use anyhow::{Context, Result};
use hdsnake_core::color::Rgb888;
use hdsnake_core::raster::{H_DISP, V_DISP};
use image::RgbImage;
use tracing::debug;

/// Writes a full 1280x720 frame as a PNG.
pub fn write_png(path: &Path, pixels: &[Rgb888]) -> Result<()> {
    let bytes: &[u8] = bytemuck::cast_slice(pixels);
    let image = RgbImage::from_raw(H_DISP as u32, V_DISP as u32, bytes.to_vec())
        .with_context(|| format!("frame has {} pixels, expected {}x{}", pixels.len(), H_DISP, V_DISP))?;

    image.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    debug!("wrote {}", path.display());
    Ok(())
}

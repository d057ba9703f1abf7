use image::{GrayImage, RgbaImage};
use shadowvg_core::buffer::{try_alloc_gray, try_alloc_rgba, AllocError};
use shadowvg_core::color::{mul_div255, RGBA8};
use shadowvg_core::math::SizeU32;

/// Extracts the opacity footprint of `raster`.
///
/// The returned coverage buffer has the same dimensions as `raster`, and each
/// of its pixels equals the alpha channel of the corresponding source pixel.
/// Color channels are discarded.
pub fn extract_alpha(raster: &RgbaImage) -> Result<GrayImage, AllocError> {
    let (width, height) = raster.dimensions();
    let mut silhouette = try_alloc_gray(SizeU32::new(width, height))?;

    for (coverage, pixel) in silhouette.iter_mut().zip(raster.pixels()) {
        *coverage = pixel.0[3];
    }

    Ok(silhouette)
}

/// Paints a coverage buffer in a single color.
///
/// The alpha of each output pixel is the coverage scaled by the alpha of
/// `color`, so a fully covered pixel ends up with exactly `color.a`.
pub fn tint(silhouette: &GrayImage, color: RGBA8) -> Result<RgbaImage, AllocError> {
    let (width, height) = silhouette.dimensions();
    let mut raster = try_alloc_rgba(SizeU32::new(width, height))?;

    if color.a == 0 {
        return Ok(raster);
    }

    for (pixel, &coverage) in raster.chunks_exact_mut(4).zip(silhouette.iter()) {
        let alpha = mul_div255(coverage, color.a);
        if alpha != 0 {
            pixel.copy_from_slice(&[color.r, color.g, color.b, alpha]);
        }
    }

    Ok(raster)
}

//! Fallible allocation of CPU pixel buffers.
//!
//! Shadow rasters are a visual enhancement, so running out of memory (or being
//! asked for an absurdly large buffer) must be reported as an error the caller
//! can recover from instead of aborting the process.

use image::{GrayImage, RgbaImage};

use crate::math::{is_zero_area, SizeU32};

/// The largest width or height a pixel buffer may have.
pub const MAX_BUFFER_DIMENSION: u32 = 16_384;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    #[error("cannot allocate a zero-sized pixel buffer ({width}x{height})")]
    ZeroSized { width: u32, height: u32 },

    #[error(
        "a {width}x{height} pixel buffer exceeds the limit of {max} pixels per side",
        max = MAX_BUFFER_DIMENSION
    )]
    TooLarge { width: u32, height: u32 },

    #[error("out of memory while allocating {bytes} bytes of pixel data")]
    OutOfMemory { bytes: usize },
}

/// Allocates a fully transparent RGBA buffer of the given size.
pub fn try_alloc_rgba(size: SizeU32) -> Result<RgbaImage, AllocError> {
    let data = try_alloc_zeroed(size, 4)?;

    RgbaImage::from_raw(size.width, size.height, data).ok_or(AllocError::TooLarge {
        width: size.width,
        height: size.height,
    })
}

/// Allocates a single-channel coverage buffer of the given size with zero coverage.
pub fn try_alloc_gray(size: SizeU32) -> Result<GrayImage, AllocError> {
    let data = try_alloc_zeroed(size, 1)?;

    GrayImage::from_raw(size.width, size.height, data).ok_or(AllocError::TooLarge {
        width: size.width,
        height: size.height,
    })
}

/// A 1x1 fully transparent buffer used in place of a real raster while the
/// content has no area.
pub fn placeholder_rgba() -> RgbaImage {
    RgbaImage::new(1, 1)
}

fn try_alloc_zeroed(size: SizeU32, channels: usize) -> Result<Vec<u8>, AllocError> {
    let (width, height) = (size.width, size.height);

    if is_zero_area(size) {
        return Err(AllocError::ZeroSized { width, height });
    }
    if width > MAX_BUFFER_DIMENSION || height > MAX_BUFFER_DIMENSION {
        return Err(AllocError::TooLarge { width, height });
    }

    let bytes = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(AllocError::TooLarge { width, height })?;

    let mut data = Vec::new();
    data.try_reserve_exact(bytes)
        .map_err(|_| AllocError::OutOfMemory { bytes })?;
    data.resize(bytes, 0);

    log::trace!("allocated {width}x{height} pixel buffer ({bytes} bytes)");

    Ok(data)
}

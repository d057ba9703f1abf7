use image::GrayImage;
use shadowvg_core::buffer::{try_alloc_gray, AllocError};
use shadowvg_core::math::SizeU32;

/// Converts a blur radius to the standard deviation of the Gaussian.
///
/// This is the same mapping mask-filter blur radii have always used, so a
/// shadow with a given radius softens like it does in other 2D engines.
const BLUR_SIGMA_SCALE: f32 = 0.57735;
const BLUR_SIGMA_BIAS: f32 = 0.5;

/// The kernel reaches this many standard deviations out from its center.
const KERNEL_EXTENT_SIGMAS: f32 = 3.0;

/// Upper bound on the kernel half width so a huge radius cannot turn into an
/// unbounded allocation.
pub const MAX_KERNEL_HALF_WIDTH: u32 = 1024;

const Q16_ONE: u32 = 1 << 16;

/// A normal (non-directional) Gaussian blur for coverage buffers.
///
/// The kernel is derived from the radius when the filter is created, so a
/// new filter must be created whenever the radius changes.
#[derive(Debug, Clone, PartialEq)]
pub struct BlurFilter {
    radius: f32,
    sigma: f32,
    /// Weights in 16.16 fixed point. They always sum to exactly `1 << 16`.
    kernel: Vec<u32>,
}

impl BlurFilter {
    pub fn new(radius: f32) -> Self {
        let sigma = radius_to_sigma(radius);
        let kernel = gaussian_kernel_q16(sigma);

        log::trace!(
            "derived blur kernel: radius={radius} sigma={sigma} taps={}",
            kernel.len()
        );

        Self {
            radius,
            sigma,
            kernel,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// How many pixels the blur reaches out from each edge of the input.
    pub fn half_width(&self) -> u32 {
        (self.kernel.len() / 2) as u32
    }

    pub fn kernel(&self) -> &[u32] {
        &self.kernel
    }

    /// Blurs `silhouette` into a new buffer that is larger by
    /// [`half_width`](Self::half_width) on every side, so the outward falloff
    /// is kept. The input sits at that inset in the output.
    ///
    /// Pixels outside of the input are treated as having no coverage.
    pub fn apply(&self, silhouette: &GrayImage) -> Result<GrayImage, AllocError> {
        let (width, height) = silhouette.dimensions();
        if width == 0 || height == 0 {
            return Err(AllocError::ZeroSized { width, height });
        }

        let margin = self.half_width();
        let size = SizeU32::new(
            width.saturating_add(2 * margin),
            height.saturating_add(2 * margin),
        );

        let mut output = try_alloc_gray(size)?;
        let stride = size.width as usize;
        {
            let out: &mut [u8] = &mut output;
            let (inset, w) = (margin as usize, width as usize);
            for (y, row) in silhouette.as_raw().chunks_exact(w).enumerate() {
                let start = (y + inset) * stride + inset;
                out[start..start + w].copy_from_slice(row);
            }
        }

        if self.kernel.len() == 1 {
            return Ok(output);
        }

        let mut scratch = try_alloc_gray(size)?;
        horizontal_pass(&output, &mut scratch, stride, &self.kernel);
        vertical_pass(&scratch, &mut output, stride, &self.kernel);

        Ok(output)
    }
}

fn radius_to_sigma(radius: f32) -> f32 {
    if radius.is_finite() && radius > 0.0 {
        BLUR_SIGMA_SCALE * radius + BLUR_SIGMA_BIAS
    } else {
        0.0
    }
}

fn gaussian_kernel_q16(sigma: f32) -> Vec<u32> {
    if sigma <= 0.0 {
        return vec![Q16_ONE];
    }

    let half_width = ((sigma * KERNEL_EXTENT_SIGMAS).ceil() as u32).min(MAX_KERNEL_HALF_WIDTH);
    let r = half_width as i32;

    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|w| ((w / sum) * f64::from(Q16_ONE)).round() as u32)
        .collect();

    // Push the rounding error into the center tap so the weights sum to one
    // and a fully covered area stays fully covered.
    let total: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let mid = weights.len() / 2;
    let center = i64::from(weights[mid]) + i64::from(Q16_ONE) - total;
    weights[mid] = center.clamp(0, i64::from(Q16_ONE)) as u32;

    weights
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], stride: usize, kernel: &[u32]) {
    let (w, radius) = (stride as i64, (kernel.len() / 2) as i64);

    for (src_row, dst_row) in src.chunks_exact(stride).zip(dst.chunks_exact_mut(stride)) {
        for (x, out) in dst_row.iter_mut().enumerate() {
            let mut acc = 0u64;
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = x as i64 + k as i64 - radius;
                if (0..w).contains(&sx) {
                    acc += u64::from(weight) * u64::from(src_row[sx as usize]);
                }
            }
            *out = q16_to_u8(acc);
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], stride: usize, kernel: &[u32]) {
    let (h, radius) = ((src.len() / stride) as i64, (kernel.len() / 2) as i64);

    for (y, dst_row) in dst.chunks_exact_mut(stride).enumerate() {
        for (x, out) in dst_row.iter_mut().enumerate() {
            let mut acc = 0u64;
            for (k, &weight) in kernel.iter().enumerate() {
                let sy = y as i64 + k as i64 - radius;
                if (0..h).contains(&sy) {
                    acc += u64::from(weight) * u64::from(src[sy as usize * stride + x]);
                }
            }
            *out = q16_to_u8(acc);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + (1 << 15)) >> 16).min(255) as u8
}

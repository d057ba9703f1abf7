use image::RgbaImage;

use crate::color::{
    blend_over, from_image_rgba, mul_div255, to_image_rgba, MAX_ALPHA, RGBA8, TRANSPARENT,
};
use crate::math::{PointI32, RectI32, SizeI32, SizeU32};

/// A CPU render target.
///
/// Drawing happens in local coordinates; `origin` is where the local point
/// `(0, 0)` lands in the underlying pixel buffer. Anything outside of the
/// buffer is clipped, so shapes may be positioned at negative coordinates.
/// All blending uses straight (non-premultiplied) alpha.
#[derive(Debug)]
pub struct Canvas<'a> {
    pixels: &'a mut RgbaImage,
    origin: PointI32,
}

impl<'a> Canvas<'a> {
    pub fn new(pixels: &'a mut RgbaImage) -> Self {
        Self::with_origin(pixels, PointI32::zero())
    }

    pub fn with_origin(pixels: &'a mut RgbaImage, origin: PointI32) -> Self {
        Self { pixels, origin }
    }

    pub fn origin(&self) -> PointI32 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: PointI32) {
        self.origin = origin;
    }

    /// The size of the underlying pixel buffer.
    pub fn size(&self) -> SizeU32 {
        let (width, height) = self.pixels.dimensions();
        SizeU32::new(width, height)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &*self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut *self.pixels
    }

    /// Replaces every pixel in the buffer, ignoring the origin.
    pub fn clear(&mut self, color: RGBA8) {
        let pixel = to_image_rgba(color);
        for p in self.pixels.pixels_mut() {
            *p = pixel;
        }
    }

    pub fn fill_rect(&mut self, rect: RectI32, color: RGBA8) {
        if color.a == 0 {
            return;
        }
        let Some(clipped) = self.clip(rect) else {
            return;
        };

        for y in clipped.min_y()..clipped.max_y() {
            for x in clipped.min_x()..clipped.max_x() {
                self.blend_pixel(x as u32, y as u32, color);
            }
        }
    }

    /// Draws `image` at its natural size with its top-left corner at `position`.
    pub fn draw_image(&mut self, image: &RgbaImage, position: PointI32) {
        let (width, height) = image.dimensions();
        let dst = RectI32::new(position, SizeI32::new(width as i32, height as i32));
        self.draw_image_rect(image, dst, MAX_ALPHA);
    }

    /// Draws all of `image` stretched to fill `dst`, with every source alpha
    /// multiplied by `opacity`.
    ///
    /// Scaled draws filter bilinearly from pixel centers. Drawing into a
    /// rectangle of the image's own size copies it exactly.
    pub fn draw_image_rect(&mut self, image: &RgbaImage, dst: RectI32, opacity: u8) {
        let (src_w, src_h) = image.dimensions();
        if opacity == 0 || src_w == 0 || src_h == 0 || dst.is_empty() {
            return;
        }
        let Some(clipped) = self.clip(dst) else {
            return;
        };

        let dst_x = i64::from(dst.origin.x) + i64::from(self.origin.x);
        let dst_y = i64::from(dst.origin.y) + i64::from(self.origin.y);
        let dst_w = i64::from(dst.size.width);
        let dst_h = i64::from(dst.size.height);

        for y in clipped.min_y()..clipped.max_y() {
            let ty = Tap::new(i64::from(y) - dst_y, dst_h, src_h);
            for x in clipped.min_x()..clipped.max_x() {
                let tx = Tap::new(i64::from(x) - dst_x, dst_w, src_w);

                let mut src = sample_bilinear(image, tx, ty);
                src.a = mul_div255(src.a, opacity);

                self.blend_pixel(x as u32, y as u32, src);
            }
        }
    }

    fn blend_pixel(&mut self, x: u32, y: u32, src: RGBA8) {
        let dst = self.pixels.get_pixel_mut(x, y);
        *dst = to_image_rgba(blend_over(from_image_rgba(*dst), src));
    }

    /// Converts `rect` from local coordinates to buffer coordinates and clips
    /// it to the buffer.
    fn clip(&self, rect: RectI32) -> Option<RectI32> {
        let (width, height) = self.pixels.dimensions();
        let buffer = RectI32::new(
            PointI32::zero(),
            SizeI32::new(width as i32, height as i32),
        );

        rect.translate(self.origin.to_vector())
            .intersection(&buffer)
            .filter(|r| !r.is_empty())
    }
}

/// One axis of a bilinear lookup: two neighboring source pixels and the
/// weight of the second.
#[derive(Debug, Clone, Copy)]
struct Tap {
    lo: u32,
    hi: u32,
    t: f32,
}

impl Tap {
    fn new(local: i64, dst_len: i64, src_len: u32) -> Self {
        let pos = (local as f64 + 0.5) * f64::from(src_len) / dst_len as f64 - 0.5;
        let pos = pos.clamp(0.0, f64::from(src_len - 1));
        let lo = pos.floor();

        Self {
            lo: lo as u32,
            hi: (lo as u32 + 1).min(src_len - 1),
            t: (pos - lo) as f32,
        }
    }
}

/// Interpolates in premultiplied space so transparent neighbors do not
/// darken the edges.
fn sample_bilinear(image: &RgbaImage, tx: Tap, ty: Tap) -> RGBA8 {
    if tx.t == 0.0 && ty.t == 0.0 {
        return from_image_rgba(*image.get_pixel(tx.lo, ty.lo));
    }

    let corners = [
        (tx.lo, ty.lo, (1.0 - tx.t) * (1.0 - ty.t)),
        (tx.hi, ty.lo, tx.t * (1.0 - ty.t)),
        (tx.lo, ty.hi, (1.0 - tx.t) * ty.t),
        (tx.hi, ty.hi, tx.t * ty.t),
    ];

    let mut acc = [0.0f32; 4];
    for (x, y, weight) in corners {
        let p = image.get_pixel(x, y).0;
        let a = f32::from(p[3]) * weight;
        acc[0] += f32::from(p[0]) * a;
        acc[1] += f32::from(p[1]) * a;
        acc[2] += f32::from(p[2]) * a;
        acc[3] += a;
    }

    let alpha = acc[3].round().clamp(0.0, 255.0) as u8;
    if alpha == 0 {
        return TRANSPARENT;
    }
    let channel = |c: f32| (c / acc[3]).round().clamp(0.0, 255.0) as u8;

    RGBA8::new(channel(acc[0]), channel(acc[1]), channel(acc[2]), alpha)
}

//! This module re-exports the types from the [`rgb`](https://crates.io/crates/rgb) crate.

pub use rgb::*;

/// The largest value an 8 bit alpha channel can hold.
pub const MAX_ALPHA: u8 = 255;

/// The color black with full opacity
pub const BLACK: RGBA8 = RGBA8 {
    r: 0,
    g: 0,
    b: 0,
    a: MAX_ALPHA,
};
/// The color white with full opacity
pub const WHITE: RGBA8 = RGBA8 {
    r: 255,
    g: 255,
    b: 255,
    a: MAX_ALPHA,
};
/// A dark gray with full opacity. This is the default shadow color.
pub const DARK_GRAY: RGBA8 = RGBA8 {
    r: 0x44,
    g: 0x44,
    b: 0x44,
    a: MAX_ALPHA,
};
/// A color with no opacity
pub const TRANSPARENT: RGBA8 = RGBA8 {
    r: 0,
    g: 0,
    b: 0,
    a: 0,
};

/// Returns `color` with its alpha channel replaced by `alpha`.
#[inline]
pub const fn with_alpha(color: RGBA8, alpha: u8) -> RGBA8 {
    RGBA8 {
        r: color.r,
        g: color.g,
        b: color.b,
        a: alpha,
    }
}

/// Computes `a * b / 255` rounded to the nearest integer.
#[inline]
pub const fn mul_div255(a: u8, b: u8) -> u8 {
    let t = a as u32 * b as u32 + 128;
    ((t + (t >> 8)) >> 8) as u8
}

/// Blends `src` over `dst` using straight (non-premultiplied) alpha.
pub fn blend_over(dst: RGBA8, src: RGBA8) -> RGBA8 {
    match src.a {
        0 => return dst,
        MAX_ALPHA => return src,
        _ => {}
    }

    let sa = u32::from(src.a);
    // Destination alpha left over after the source covers its share.
    let da = u32::from(mul_div255(dst.a, MAX_ALPHA - src.a));
    let out_a = sa + da;

    let channel = |s: u8, d: u8| -> u8 {
        ((u32::from(s) * sa + u32::from(d) * da + out_a / 2) / out_a) as u8
    };

    RGBA8 {
        r: channel(src.r, dst.r),
        g: channel(src.g, dst.g),
        b: channel(src.b, dst.b),
        a: out_a as u8,
    }
}

#[inline]
pub const fn to_image_rgba(color: RGBA8) -> image::Rgba<u8> {
    image::Rgba([color.r, color.g, color.b, color.a])
}

#[inline]
pub const fn from_image_rgba(pixel: image::Rgba<u8>) -> RGBA8 {
    let [r, g, b, a] = pixel.0;
    RGBA8 { r, g, b, a }
}

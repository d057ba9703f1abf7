use euclid::UnknownUnit;

pub use euclid;

/// A point in whole pixels.
///
/// Alias for ```euclid::default::Point2D<i32>```.
pub type PointI32 = euclid::default::Point2D<i32>;

/// A size in whole pixels.
///
/// Alias for ```euclid::default::Size2D<i32>```.
pub type SizeI32 = euclid::default::Size2D<i32>;

/// The size of a pixel buffer.
///
/// Alias for ```euclid::default::Size2D<u32>```.
pub type SizeU32 = euclid::default::Size2D<u32>;

/// A rectangle in whole pixels.
///
/// Alias for ```euclid::default::Rect<i32>```
pub type RectI32 = euclid::default::Rect<i32>;

/// Space reserved on each side of some content, in whole pixels.
///
/// Alias for ```euclid::SideOffsets2D<i32, UnknownUnit>```
pub type Padding = euclid::SideOffsets2D<i32, UnknownUnit>;

/// Shorthand for `RectI32::new(PointI32::new(x, y), SizeI32::new(width, height))`.
#[inline]
pub const fn rect_i32(x: i32, y: i32, width: i32, height: i32) -> RectI32 {
    RectI32::new(PointI32::new(x, y), SizeI32::new(width, height))
}

/// Returns `true` if the size covers no pixels.
#[inline]
pub fn is_zero_area(size: SizeU32) -> bool {
    size.width == 0 || size.height == 0
}

/// Rounds a length in logical points to the nearest whole pixel, saturating
/// at the bounds of `i32`.
#[inline]
pub fn round_to_pixel(value: f32) -> i32 {
    // `as` saturates and maps NaN to zero.
    value.round() as i32
}

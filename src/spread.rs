//! Derives the layout padding and painted spread of a shadow from its
//! parameters.
//!
//! Spread extents are `2 * spread` on each axis, except that a zero
//! horizontal offset collapses the *vertical* extent to `spread`, and a zero
//! vertical offset collapses the *horizontal* extent to `spread`. This
//! cross-axis coupling is long-standing behavior that existing layouts rely
//! on, so it is reproduced exactly.

use crate::math::Padding;
use crate::params::ShadowParameters;

/// How far the painted shadow grows outward on each side, in whole pixels.
///
/// Negative values shrink the shadow.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpreadExtents {
    pub width: i32,
    pub height: i32,
}

impl SpreadExtents {
    /// The extents with shrinking removed, used when reserving layout space.
    pub fn clamped(&self) -> Self {
        Self {
            width: self.width.max(0),
            height: self.height.max(0),
        }
    }
}

/// Everything about a shadow's footprint that follows from its parameters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShadowGeometry {
    /// Space the host must reserve around the content so the shadow is not
    /// clipped.
    pub padding: Padding,
    /// Outward growth of the painted shadow rectangle. Not clamped.
    pub spread: SpreadExtents,
}

/// Computes the [`ShadowGeometry`] for the given parameters.
///
/// The radius is expected to be clamped already (see
/// [`ShadowParameters::normalized`]).
pub fn compute(params: &ShadowParameters) -> ShadowGeometry {
    let spread = spread_extents(params);
    let expand = spread.clamped();

    let horizontal = reserve(params.offset_x, params.radius, expand.width);
    let vertical = reserve(params.offset_y, params.radius, expand.height);

    ShadowGeometry {
        padding: Padding::new(vertical, horizontal, vertical, horizontal),
        spread,
    }
}

fn spread_extents(params: &ShadowParameters) -> SpreadExtents {
    // Truncation toward zero matches how the extents have always been rounded.
    let doubled = (2.0 * params.spread) as i32;
    let single = params.spread as i32;

    SpreadExtents {
        width: if params.offset_y == 0.0 { single } else { doubled },
        height: if params.offset_x == 0.0 { single } else { doubled },
    }
}

fn reserve(offset: f32, radius: f32, expand: i32) -> i32 {
    // Rounded up so the padding never falls short of `|offset| + radius`.
    (offset.abs() + radius + expand as f32).ceil() as i32
}

//! Soft drop shadows for rectangular content.
//!
//! A [`ShadowCompositor`] wraps a [`ContentHost`]. The first time it is drawn
//! (and after every change to the shadow parameters or content bounds) it
//! renders the content off-screen, extracts the alpha channel, blurs it, and
//! caches the tinted result. Every draw then paints the cached shadow,
//! offset and spread, underneath a fresh render of the content.

mod canvas;
mod capture;
mod compositor;
mod dirty;
mod params;

pub mod error;
pub mod spread;

pub use canvas::Canvas;
pub use capture::{Captured, OffscreenCapture};
pub use compositor::{ContentHost, ShadowCompositor};
pub use dirty::{DirtyState, DirtyTracker, Invalidation};
pub use params::{
    clamp_radius, ShadowParameters, ShadowParametersBuilder, DEFAULT_COLOR, DEFAULT_OFFSET_X,
    DEFAULT_OFFSET_Y, DEFAULT_RADIUS, DEFAULT_SPREAD, MIN_RADIUS,
};
pub use spread::{ShadowGeometry, SpreadExtents};

pub use shadowvg_core::*;

pub use shadowvg_filter as filter;

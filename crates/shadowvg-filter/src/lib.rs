//! CPU raster filters used to turn rendered content into a shadow.

pub mod blur;
pub mod silhouette;

pub use blur::BlurFilter;
pub use silhouette::{extract_alpha, tint};

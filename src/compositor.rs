use image::RgbaImage;
use shadowvg_filter::{extract_alpha, tint, BlurFilter};

use crate::canvas::Canvas;
use crate::capture::{Captured, OffscreenCapture};
use crate::color::{MAX_ALPHA, RGBA8};
use crate::dirty::{DirtyState, DirtyTracker, Invalidation};
use crate::error::ShadowError;
use crate::math::{rect_i32, round_to_pixel, Padding, SizeU32};
use crate::params::{clamp_radius, ShadowParameters};
use crate::spread::{self, ShadowGeometry, SpreadExtents};

/// The capabilities a [`ShadowCompositor`] needs from whatever hosts the
/// content it decorates.
pub trait ContentHost {
    /// Renders the content with its top-left corner at the canvas's local
    /// origin.
    ///
    /// This is called once on every draw for the visible content, and once
    /// more whenever the shadow has to be rebuilt, in which case the canvas
    /// is a transparent off-screen buffer the size of the content bounds.
    fn render_content_into(&mut self, canvas: &mut Canvas<'_>);

    /// The padding required around the content changed, and the host should
    /// lay the content out again.
    fn request_relayout(&mut self, padding: Padding);
}

impl<H: ContentHost + ?Sized> ContentHost for &mut H {
    fn render_content_into(&mut self, canvas: &mut Canvas<'_>) {
        (**self).render_content_into(canvas);
    }

    fn request_relayout(&mut self, padding: Padding) {
        (**self).request_relayout(padding);
    }
}

#[derive(Debug)]
enum CachedShadow {
    Empty,
    /// The content has no area. The capture holds the 1x1 stand-in buffer.
    Placeholder,
    Ready {
        raster: RgbaImage,
        bounds: SizeU32,
        /// Blur margin around the content inside `raster`.
        margin: u32,
    },
}

/// Draws a cached, blurred drop shadow underneath a host's content.
#[derive(Debug)]
pub struct ShadowCompositor<H: ContentHost> {
    host: H,
    params: ShadowParameters,
    geometry: ShadowGeometry,
    bounds: SizeU32,

    dirty: DirtyTracker,
    capture: OffscreenCapture,
    blur: BlurFilter,
    cache: CachedShadow,

    pipeline_runs: u64,
}

impl<H: ContentHost> ShadowCompositor<H> {
    pub fn new(host: H) -> Self {
        Self::with_parameters(host, ShadowParameters::default())
    }

    pub fn with_parameters(mut host: H, params: ShadowParameters) -> Self {
        let params = params.normalized();
        let geometry = spread::compute(&params);

        host.request_relayout(geometry.padding);

        Self {
            host,
            params,
            geometry,
            bounds: SizeU32::zero(),
            dirty: DirtyTracker::new(),
            capture: OffscreenCapture::new(),
            blur: BlurFilter::new(params.radius),
            cache: CachedShadow::Empty,
            pipeline_runs: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Use [`ShadowCompositor::invalidate_content`] after changing anything
    /// that affects how the content looks.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn parameters(&self) -> &ShadowParameters {
        &self.params
    }

    /// Applies all parameters at once. The host is asked to relayout at most
    /// once.
    pub fn set_parameters(&mut self, params: ShadowParameters) {
        let params = params.normalized();

        self.apply_enabled(params.enabled);
        self.apply_radius(params.radius);
        self.apply_offset(params.offset_x, params.offset_y);
        self.apply_spread(params.spread);
        self.apply_color(params.color);

        self.update_geometry();
    }

    pub fn enabled(&self) -> bool {
        self.params.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.apply_enabled(enabled);
        self.update_geometry();
    }

    pub fn radius(&self) -> f32 {
        self.params.radius
    }

    /// Sets the blur radius. Values below [`MIN_RADIUS`](crate::MIN_RADIUS)
    /// are clamped.
    pub fn set_radius(&mut self, radius: f32) {
        self.apply_radius(clamp_radius(radius));
        self.update_geometry();
    }

    pub fn offset_x(&self) -> f32 {
        self.params.offset_x
    }

    pub fn set_offset_x(&mut self, offset_x: f32) {
        self.apply_offset(offset_x, self.params.offset_y);
        self.update_geometry();
    }

    pub fn offset_y(&self) -> f32 {
        self.params.offset_y
    }

    pub fn set_offset_y(&mut self, offset_y: f32) {
        self.apply_offset(self.params.offset_x, offset_y);
        self.update_geometry();
    }

    pub fn spread(&self) -> f32 {
        self.params.spread
    }

    pub fn set_spread(&mut self, spread: f32) {
        self.apply_spread(spread);
        self.update_geometry();
    }

    pub fn color(&self) -> RGBA8 {
        self.params.color
    }

    pub fn set_color(&mut self, color: impl Into<RGBA8>) {
        self.apply_color(color.into());
        self.update_geometry();
    }

    /// The space the host must reserve around the content.
    pub fn padding(&self) -> Padding {
        self.geometry.padding
    }

    pub fn spread_extents(&self) -> SpreadExtents {
        self.geometry.spread
    }

    pub fn geometry(&self) -> &ShadowGeometry {
        &self.geometry
    }

    pub fn bounds(&self) -> SizeU32 {
        self.bounds
    }

    /// Called by the host's layout pass with the size of the content.
    pub fn on_bounds_changed(&mut self, width: u32, height: u32) {
        let bounds = SizeU32::new(width, height);
        if bounds != self.bounds {
            self.bounds = bounds;
            self.dirty.invalidate(Invalidation::Bounds);
        }
    }

    /// Forces the shadow to be rebuilt on the next draw, for content whose
    /// appearance changed without its bounds changing.
    pub fn invalidate_content(&mut self) {
        self.dirty.invalidate(Invalidation::Content);
    }

    pub fn dirty_state(&self) -> DirtyState {
        self.dirty.state()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// How many times the capture/extract/blur pipeline ran to completion.
    pub fn pipeline_runs(&self) -> u64 {
        self.pipeline_runs
    }

    pub fn has_placeholder_shadow(&self) -> bool {
        matches!(self.cache, CachedShadow::Placeholder)
    }

    /// Frees the off-screen buffer and the cached shadow.
    ///
    /// The compositor remains usable; the next draw rebuilds everything.
    pub fn release(&mut self) {
        self.capture.release();
        self.cache = CachedShadow::Empty;
        self.dirty.invalidate(Invalidation::Released);
    }

    /// Draws the shadow (if enabled) and then the content on top of it.
    ///
    /// Shadow failures never prevent the content from being drawn.
    pub fn draw(&mut self, canvas: &mut Canvas<'_>) {
        if self.params.enabled {
            if self.dirty.is_dirty() {
                if let Err(e) = self.rebuild_shadow() {
                    log::warn!("drawing content without a shadow this frame: {e}");
                    self.cache = CachedShadow::Empty;
                }
            }

            self.paint_shadow(canvas);
        }

        self.host.render_content_into(canvas);
    }

    fn rebuild_shadow(&mut self) -> Result<(), ShadowError> {
        let bounds = self.bounds;

        let raster = match self.capture.capture(bounds, &mut self.host)? {
            Captured::Content(raster) => raster,
            Captured::Placeholder => {
                // Stay dirty so the shadow is built once the content has a size.
                self.cache = CachedShadow::Placeholder;
                return Ok(());
            }
        };

        let silhouette = extract_alpha(raster)?;
        let blurred = self.blur.apply(&silhouette)?;
        let shadow = tint(&blurred, self.params.color)?;

        self.cache = CachedShadow::Ready {
            raster: shadow,
            bounds,
            margin: self.blur.half_width(),
        };
        self.dirty.mark_clean();
        self.pipeline_runs += 1;

        log::trace!(
            "rebuilt {}x{} shadow raster (radius {})",
            bounds.width,
            bounds.height,
            self.params.radius
        );

        Ok(())
    }

    fn paint_shadow(&self, canvas: &mut Canvas<'_>) {
        // A placeholder is fully transparent, so there is nothing to paint.
        let CachedShadow::Ready {
            raster,
            bounds,
            margin,
        } = &self.cache
        else {
            return;
        };

        // The content part of the raster covers the bounds grown by the spread
        // extents. The blur margin around it is stretched by the same factor.
        let spread = self.geometry.spread;
        let (width, height) = (bounds.width as i32, bounds.height as i32);
        let (spread_w, spread_h) = (width + 2 * spread.width, height + 2 * spread.height);
        if spread_w <= 0 || spread_h <= 0 {
            return;
        }

        let margin_x = scaled_margin(*margin, spread_w, width);
        let margin_y = scaled_margin(*margin, spread_h, height);
        let dst = rect_i32(
            round_to_pixel(self.params.offset_x) - spread.width - margin_x,
            round_to_pixel(self.params.offset_y) - spread.height - margin_y,
            spread_w + 2 * margin_x,
            spread_h + 2 * margin_y,
        );

        // The shadow opacity is already baked into the raster.
        canvas.draw_image_rect(raster, dst, MAX_ALPHA);
    }

    fn apply_enabled(&mut self, enabled: bool) {
        if self.params.enabled != enabled {
            self.params.enabled = enabled;
            self.dirty.invalidate(Invalidation::Enabled);
        }
    }

    fn apply_radius(&mut self, radius: f32) {
        if !same_value(self.params.radius, radius) {
            self.params.radius = radius;
            // The kernel depends on the radius, not just the cached raster.
            self.blur = BlurFilter::new(radius);
            self.dirty.invalidate(Invalidation::Radius);
        }
    }

    fn apply_offset(&mut self, offset_x: f32, offset_y: f32) {
        if !same_value(self.params.offset_x, offset_x)
            || !same_value(self.params.offset_y, offset_y)
        {
            self.params.offset_x = offset_x;
            self.params.offset_y = offset_y;
            self.dirty.invalidate(Invalidation::Offset);
        }
    }

    fn apply_spread(&mut self, spread: f32) {
        if !same_value(self.params.spread, spread) {
            self.params.spread = spread;
            self.dirty.invalidate(Invalidation::Spread);
        }
    }

    fn apply_color(&mut self, color: RGBA8) {
        if self.params.color != color {
            self.params.color = color;
            self.dirty.invalidate(Invalidation::Color);
        }
    }

    fn update_geometry(&mut self) {
        let geometry = spread::compute(&self.params);
        let padding_changed = geometry.padding != self.geometry.padding;

        self.geometry = geometry;

        if padding_changed {
            log::debug!("shadow padding changed to {:?}", geometry.padding);
            self.host.request_relayout(geometry.padding);
        }
    }
}

/// Equal values, or both NaN.
fn same_value(a: f32, b: f32) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn scaled_margin(margin: u32, painted: i32, content: i32) -> i32 {
    round_to_pixel(margin as f32 * painted as f32 / content as f32)
}

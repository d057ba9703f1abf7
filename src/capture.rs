use image::RgbaImage;

use crate::buffer::{placeholder_rgba, try_alloc_rgba, AllocError};
use crate::canvas::Canvas;
use crate::compositor::ContentHost;
use crate::math::{is_zero_area, SizeU32};

/// The result of an off-screen capture.
#[derive(Debug)]
pub enum Captured<'a> {
    /// The content rendered into a buffer of exactly the requested size.
    Content(&'a RgbaImage),
    /// The bounds had no area, so the host was not asked to render.
    Placeholder,
}

/// Renders the host's content into a private off-screen buffer.
///
/// The buffer is kept between captures and only replaced when the requested
/// size changes.
#[derive(Debug, Default)]
pub struct OffscreenCapture {
    buffer: Option<RgbaImage>,
}

impl OffscreenCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture<H: ContentHost + ?Sized>(
        &mut self,
        bounds: SizeU32,
        host: &mut H,
    ) -> Result<Captured<'_>, AllocError> {
        if is_zero_area(bounds) {
            log::debug!(
                "content bounds are {}x{}, substituting a placeholder buffer",
                bounds.width,
                bounds.height
            );
            self.buffer = Some(placeholder_rgba());
            return Ok(Captured::Placeholder);
        }

        let buffer = match self.buffer.take() {
            Some(mut buffer) if buffer.dimensions() == (bounds.width, bounds.height) => {
                buffer.fill(0);
                buffer
            }
            _ => try_alloc_rgba(bounds)?,
        };
        let buffer = self.buffer.insert(buffer);

        host.render_content_into(&mut Canvas::new(buffer));

        Ok(Captured::Content(buffer))
    }

    /// The size of the buffer currently held, if any.
    pub fn buffer_size(&self) -> Option<SizeU32> {
        self.buffer.as_ref().map(|buffer| {
            let (width, height) = buffer.dimensions();
            SizeU32::new(width, height)
        })
    }

    /// Frees the off-screen buffer. The next capture allocates a new one.
    pub fn release(&mut self) {
        self.buffer = None;
    }
}

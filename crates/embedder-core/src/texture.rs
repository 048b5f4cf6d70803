//! Pixel buffer producers and the texture variants they back.

use std::fmt;

use crate::ffi::RGBA_BYTES_PER_PIXEL;

/// One frame of RGBA8 pixel data lent by a producer.
///
/// The borrow ends with the population cycle that requested it.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    pub buffer: &'a [u8],
    pub width: usize,
    pub height: usize,
}

impl<'a> PixelBuffer<'a> {
    pub fn new(buffer: &'a [u8], width: usize, height: usize) -> Self {
        Self {
            buffer,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of bytes an RGBA8 image of this size needs.
    pub fn required_len(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)?
            .checked_mul(RGBA_BYTES_PER_PIXEL)
    }
}

/// Pull-based producer of pixel data.
///
/// The engine calls [`copy_pixel_buffer`](PixelBufferSource::copy_pixel_buffer)
/// on the render thread whenever it populates the texture. `width` and
/// `height` are the size the compositor would like; the returned buffer may
/// use a different size.
pub trait PixelBufferSource: Send + 'static {
    fn copy_pixel_buffer(&mut self, width: usize, height: usize) -> Option<PixelBuffer<'_>>;
}

/// A texture whose content comes from a [`PixelBufferSource`].
pub struct PixelBufferTexture {
    source: Box<dyn PixelBufferSource>,
}

impl PixelBufferTexture {
    pub fn new(source: impl PixelBufferSource) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub fn into_source(self) -> Box<dyn PixelBufferSource> {
        self.source
    }
}

impl fmt::Debug for PixelBufferTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBufferTexture").finish_non_exhaustive()
    }
}

/// The kinds of producer a registered texture can be backed by.
#[derive(Debug)]
pub enum TextureVariant {
    PixelBuffer(PixelBufferTexture),
}

impl From<PixelBufferTexture> for TextureVariant {
    fn from(texture: PixelBufferTexture) -> Self {
        TextureVariant::PixelBuffer(texture)
    }
}

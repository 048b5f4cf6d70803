//! [`ExternalTextureGl`]: a GL texture fed by a pixel buffer producer.
//!
//! The GL object is created on the first population that has data, then
//! re-bound and re-uploaded on every later population. It is deleted when the
//! engine is dropped, which must happen on the render thread with the same
//! context current.

use std::fmt;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use embedder_core::{GlTextureDescriptor, PixelBufferSource};
use gl::types::{GLint, GLsizei, GLuint};

use crate::procs::GlProcs;

/// Lifecycle of the GL object behind an external texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureState {
    Uninitialized,
    Allocated(GLuint),
}

pub struct ExternalTextureGl {
    procs: Option<Arc<GlProcs>>,
    source: Box<dyn PixelBufferSource>,
    state: TextureState,
}

impl fmt::Debug for ExternalTextureGl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalTextureGl")
            .field("gl_available", &self.procs.is_some())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ExternalTextureGl {
    /// Create an engine. `procs` is `None` when GL is unavailable; every
    /// population then fails.
    pub fn new(source: Box<dyn PixelBufferSource>, procs: Option<Arc<GlProcs>>) -> Self {
        Self {
            procs,
            source,
            state: TextureState::Uninitialized,
        }
    }

    pub fn state(&self) -> TextureState {
        self.state
    }

    /// Pull one frame from the producer and upload it.
    ///
    /// `width` and `height` are passed to the producer as a hint. The upload
    /// and the returned descriptor use the size of the buffer it returns.
    /// On error no GL object is created and an existing one is left as is.
    pub fn populate_texture(&mut self, width: usize, height: usize) -> Result<GlTextureDescriptor> {
        let result = self.try_populate(width, height);
        if let Err(err) = &result {
            tracing::warn!(width, height, "failed to copy pixel buffer from plugin: {err:#}");
        }
        result
    }

    fn try_populate(&mut self, width: usize, height: usize) -> Result<GlTextureDescriptor> {
        let pixel_buffer = self.source.copy_pixel_buffer(width, height);

        let procs = self
            .procs
            .as_deref()
            .ok_or_else(|| anyhow!("GL entry points are unavailable"))?;
        let Some(pixel_buffer) = pixel_buffer else {
            bail!("producer returned no pixel buffer");
        };
        if pixel_buffer.is_empty() {
            bail!("producer returned an empty pixel buffer");
        }

        let required = pixel_buffer
            .required_len()
            .ok_or_else(|| anyhow!("pixel buffer size overflows"))?;
        if pixel_buffer.buffer.len() < required {
            bail!(
                "pixel buffer holds {} bytes, {}x{} RGBA needs {required}",
                pixel_buffer.buffer.len(),
                pixel_buffer.width,
                pixel_buffer.height,
            );
        }
        let gl_width = GLsizei::try_from(pixel_buffer.width)?;
        let gl_height = GLsizei::try_from(pixel_buffer.height)?;

        // SAFETY: population runs on the render thread with the compositor's
        // context current, and the buffer length was checked above.
        let name = unsafe {
            let name = match self.state {
                TextureState::Uninitialized => {
                    let name = procs.gen_texture();
                    procs.bind_texture(gl::TEXTURE_2D, name);
                    for (param, value) in [
                        (gl::TEXTURE_WRAP_S, gl::CLAMP_TO_BORDER),
                        (gl::TEXTURE_WRAP_T, gl::CLAMP_TO_BORDER),
                        (gl::TEXTURE_MIN_FILTER, gl::LINEAR),
                        (gl::TEXTURE_MAG_FILTER, gl::LINEAR),
                    ] {
                        procs.tex_parameteri(gl::TEXTURE_2D, param, value as GLint);
                    }
                    self.state = TextureState::Allocated(name);
                    tracing::debug!(name, "allocated external GL texture");
                    name
                }
                TextureState::Allocated(name) => {
                    procs.bind_texture(gl::TEXTURE_2D, name);
                    name
                }
            };
            procs.tex_image_2d_rgba(gl_width, gl_height, pixel_buffer.buffer);
            name
        };

        tracing::trace!(
            name,
            width = pixel_buffer.width,
            height = pixel_buffer.height,
            "uploaded pixel buffer"
        );

        Ok(GlTextureDescriptor::rgba8(
            name,
            pixel_buffer.width,
            pixel_buffer.height,
        ))
    }
}

impl Drop for ExternalTextureGl {
    fn drop(&mut self) {
        if let (Some(procs), TextureState::Allocated(name)) = (self.procs.as_deref(), self.state) {
            // SAFETY: engines are dropped on the render thread.
            unsafe { procs.delete_texture(name) };
            tracing::debug!(name, "deleted external GL texture");
        }
    }
}

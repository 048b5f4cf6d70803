//! OpenGL side of external textures.
//!
//! - [`GlProcs`] resolves the handful of GL entry points the engine needs.
//! - [`ExternalTextureGl`] owns one GL texture and fills it from a
//!   [`PixelBufferSource`](embedder_core::PixelBufferSource).
//! - [`TextureRegistry`] assigns texture ids, implements the native
//!   [`TextureTransport`](embedder_core::TextureTransport) and drives
//!   population for the render loop.
//!
//! ### Warning
//!
//! Population and engine drops issue raw GL calls. They assume the host has
//! made the compositor's context current on the calling thread.

pub mod external_texture;
pub mod procs;
pub mod registry;

pub use external_texture::{ExternalTextureGl, TextureState};
pub use procs::GlProcs;
pub use registry::TextureRegistry;

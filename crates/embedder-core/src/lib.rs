//! Shared types for the embedder bridge.
//!
//! - [`ffi`] holds opaque native handles and the C-repr texture descriptor.
//! - [`texture`] defines pixel buffer producers and [`TextureVariant`].
//! - [`api`] is the native boundary the wrapper layer talks to.
//! - [`logging`] installs the `tracing` subscriber.

pub mod api;
pub mod ffi;
pub mod logging;
pub mod texture;

pub use api::{
    BinaryReplyCallback, DestructionHandler, EmbedderApi, IncomingMessage, MessageCallback,
    MessageTransport, TextureTransport,
};
pub use ffi::{GlTextureDescriptor, RegistrarRef, ResponseHandle, NO_TEXTURE};
pub use texture::{PixelBuffer, PixelBufferSource, PixelBufferTexture, TextureVariant};

//! The native embedder boundary.
//!
//! These traits are what the wrapper layer consumes. A real embedder
//! implements them on top of its C API; tests implement them in memory.

use std::sync::Arc;

use crate::ffi::{RegistrarRef, ResponseHandle};
use crate::texture::TextureVariant;

/// Invoked by the native side when a registrar handle is freed. At most once.
pub type DestructionHandler = Box<dyn FnOnce(RegistrarRef) + Send>;

/// Receives the reply to a message sent with
/// [`MessageTransport::send_with_reply`].
pub type BinaryReplyCallback = Box<dyn FnOnce(&[u8]) + Send>;

/// A platform message delivered on a channel.
#[derive(Debug, Clone, Copy)]
pub struct IncomingMessage<'a> {
    pub channel: &'a str,
    pub message: &'a [u8],
    /// Present when the sender is waiting for a response.
    pub response_handle: Option<ResponseHandle>,
}

/// Native per-channel message callback.
pub type MessageCallback = Arc<dyn Fn(IncomingMessage<'_>) + Send + Sync>;

/// Entry points tied to a plugin registrar handle.
pub trait EmbedderApi: Send + Sync {
    /// Install, or clear with `None`, the handler called when `registrar` is
    /// freed. Installing replaces any previous handler.
    fn set_destruction_handler(&self, registrar: RegistrarRef, handler: Option<DestructionHandler>);

    /// Message transport owned by `registrar`.
    fn messenger(&self, registrar: RegistrarRef) -> Arc<dyn MessageTransport>;

    /// Texture transport owned by `registrar`.
    fn texture_registrar(&self, registrar: RegistrarRef) -> Arc<dyn TextureTransport>;
}

/// Channel-addressed binary message transport.
pub trait MessageTransport: Send + Sync {
    fn send(&self, channel: &str, message: &[u8]) -> bool;

    fn send_with_reply(&self, channel: &str, message: &[u8], reply: BinaryReplyCallback) -> bool;

    fn send_response(&self, handle: ResponseHandle, data: &[u8]);

    /// Install or, with `None`, remove the callback for `channel`.
    fn set_callback(&self, channel: &str, callback: Option<MessageCallback>);
}

/// Native external texture subsystem.
pub trait TextureTransport: Send + Sync {
    /// Returns the new texture id, or [`NO_TEXTURE`](crate::ffi::NO_TEXTURE)
    /// if registration failed.
    fn register_external_texture(&self, texture: TextureVariant) -> i64;

    fn unregister_external_texture(&self, texture_id: i64) -> bool;

    fn mark_external_texture_frame_available(&self, texture_id: i64) -> bool;
}

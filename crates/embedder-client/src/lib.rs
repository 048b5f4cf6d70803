//! Plugin-facing wrappers over the native embedder API.
//!
//! # Overview
//!
//! - [`PluginRegistrarManager`] maps native registrar handles to exactly one
//!   wrapper each and releases it when the handle is destroyed.
//! - [`PluginRegistrar`] gives plugins a [`BinaryMessenger`] and a
//!   [`TextureRegistrar`], and owns the [`Plugin`] objects added to it.
//! - [`HandleRegistry`] is the generic handle → wrapper table underneath.

pub mod manager;
pub mod messenger;
pub mod plugin_registrar;
pub mod registry;
pub mod textures;

pub use manager::PluginRegistrarManager;
pub use messenger::{BinaryMessageHandler, BinaryMessenger, BinaryReply};
pub use plugin_registrar::{ManagedRegistrar, Plugin, PluginRegistrar};
pub use registry::{HandleRegistry, HandleWrapper};
pub use textures::TextureRegistrar;

pub use embedder_core::{
    PixelBuffer, PixelBufferSource, PixelBufferTexture, RegistrarRef, TextureVariant, NO_TEXTURE,
};

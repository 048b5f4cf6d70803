//! [`TextureRegistrar`]: plugin-facing access to external textures.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use embedder_core::{TextureTransport, TextureVariant, NO_TEXTURE};

pub struct TextureRegistrar {
    // `None` once the owning registrar has been destroyed.
    transport: Mutex<Option<Arc<dyn TextureTransport>>>,
}

impl fmt::Debug for TextureRegistrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureRegistrar")
            .field("attached", &self.transport().is_some())
            .finish_non_exhaustive()
    }
}

impl TextureRegistrar {
    pub fn new(transport: Arc<dyn TextureTransport>) -> Self {
        Self {
            transport: Mutex::new(Some(transport)),
        }
    }

    fn transport(&self) -> Option<Arc<dyn TextureTransport>> {
        self.transport
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Release the native transport. Every later call fails.
    pub(crate) fn detach(&self) {
        self.transport.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    /// Register `texture` and return its id, or [`NO_TEXTURE`] on failure.
    pub fn register_texture(&self, texture: impl Into<TextureVariant>) -> i64 {
        let Some(transport) = self.transport() else {
            tracing::warn!("texture registration on a destroyed registrar");
            return NO_TEXTURE;
        };
        let texture_id = transport.register_external_texture(texture.into());
        if texture_id == NO_TEXTURE {
            tracing::warn!("native texture registration failed");
        }
        texture_id
    }

    /// Tell the compositor that `texture_id` has a new frame.
    pub fn mark_texture_frame_available(&self, texture_id: i64) -> bool {
        self.transport()
            .is_some_and(|transport| transport.mark_external_texture_frame_available(texture_id))
    }

    pub fn unregister_texture(&self, texture_id: i64) -> bool {
        let Some(transport) = self.transport() else {
            tracing::debug!(texture_id, "unregister on a destroyed registrar");
            return false;
        };
        let removed = transport.unregister_external_texture(texture_id);
        if !removed {
            tracing::debug!(texture_id, "unregister of unknown texture");
        }
        removed
    }
}

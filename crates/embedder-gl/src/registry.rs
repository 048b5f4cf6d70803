//! Host-side registry of external textures.
//!
//! Plugins reach this through [`TextureTransport`]; the render loop calls
//! [`TextureRegistry::populate_texture`] and
//! [`TextureRegistry::take_frame_available`] directly.
//!
//! Unregistering only detaches a texture. Its engine is parked until the
//! render thread next populates any texture or calls
//! [`TextureRegistry::release_retired`], so the GL object is deleted with the
//! right context current.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use embedder_core::{GlTextureDescriptor, TextureTransport, TextureVariant, NO_TEXTURE};

use crate::external_texture::ExternalTextureGl;
use crate::procs::GlProcs;

struct TextureEntry {
    engine: Mutex<ExternalTextureGl>,
    frame_available: AtomicBool,
}

impl TextureEntry {
    fn engine(&self) -> MutexGuard<'_, ExternalTextureGl> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct TextureRegistry {
    procs: Option<Arc<GlProcs>>,
    next_id: AtomicI64,
    textures: Mutex<HashMap<i64, Arc<TextureEntry>>>,
    retired: Mutex<Vec<Arc<TextureEntry>>>,
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureRegistry {
    /// Registry using the process-wide GL entry points.
    pub fn new() -> Self {
        Self::with_procs(GlProcs::shared())
    }

    /// Registry using explicitly provided GL entry points. `None` disables
    /// population.
    pub fn with_procs(procs: Option<Arc<GlProcs>>) -> Self {
        Self {
            procs,
            next_id: AtomicI64::new(0),
            textures: Mutex::new(HashMap::new()),
            retired: Mutex::new(Vec::new()),
        }
    }

    fn textures(&self) -> MutexGuard<'_, HashMap<i64, Arc<TextureEntry>>> {
        self.textures.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn retired(&self) -> MutexGuard<'_, Vec<Arc<TextureEntry>>> {
        self.retired.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn entry(&self, texture_id: i64) -> Option<Arc<TextureEntry>> {
        self.textures().get(&texture_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.textures().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, texture_id: i64) -> bool {
        self.textures().contains_key(&texture_id)
    }

    /// Populate the GL texture for `texture_id`. Render thread only.
    ///
    /// Engines of unregistered textures are released first. Returns `None` if
    /// the id is unknown or the engine could not produce a frame.
    pub fn populate_texture(
        &self,
        texture_id: i64,
        width: usize,
        height: usize,
    ) -> Option<GlTextureDescriptor> {
        self.release_retired();
        let Some(entry) = self.entry(texture_id) else {
            tracing::debug!(texture_id, "populate requested for unknown texture");
            return None;
        };
        let mut engine = entry.engine();
        engine.populate_texture(width, height).ok()
    }

    /// Whether a new frame was announced since the last call. Clears the
    /// flag.
    pub fn take_frame_available(&self, texture_id: i64) -> bool {
        self.entry(texture_id)
            .is_some_and(|entry| entry.frame_available.swap(false, Ordering::AcqRel))
    }

    /// Drop engines of unregistered textures, deleting their GL objects.
    /// Render thread only. Returns how many were released.
    pub fn release_retired(&self) -> usize {
        let retired = std::mem::take(&mut *self.retired());
        let count = retired.len();
        drop(retired);
        if count > 0 {
            tracing::debug!(count, "released retired external textures");
        }
        count
    }
}

impl TextureTransport for TextureRegistry {
    fn register_external_texture(&self, texture: TextureVariant) -> i64 {
        let engine = match texture {
            TextureVariant::PixelBuffer(texture) => {
                ExternalTextureGl::new(texture.into_source(), self.procs.clone())
            }
        };

        let texture_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if texture_id < 0 {
            tracing::error!("texture id space exhausted");
            return NO_TEXTURE;
        }

        let entry = Arc::new(TextureEntry {
            engine: Mutex::new(engine),
            frame_available: AtomicBool::new(false),
        });
        self.textures().insert(texture_id, entry);
        tracing::debug!(texture_id, "registered external texture");
        texture_id
    }

    fn unregister_external_texture(&self, texture_id: i64) -> bool {
        let Some(entry) = self.textures().remove(&texture_id) else {
            return false;
        };
        self.retired().push(entry);
        tracing::debug!(texture_id, "unregistered external texture");
        true
    }

    fn mark_external_texture_frame_available(&self, texture_id: i64) -> bool {
        match self.entry(texture_id) {
            Some(entry) => {
                entry.frame_available.store(true, Ordering::Release);
                true
            }
            None => false,
        }
    }
}

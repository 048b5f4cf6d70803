//! [`PluginRegistrarManager`]: one registrar wrapper per native handle.
//!
//! The manager is created by the embedding layer and passed to whoever needs
//! registrars. Wrappers it creates subscribe to the native destruction
//! notification, which evicts them synchronously.

use std::fmt;
use std::sync::{Arc, Weak};

use embedder_core::{DestructionHandler, EmbedderApi, RegistrarRef};

use crate::plugin_registrar::ManagedRegistrar;
use crate::registry::HandleRegistry;

pub struct PluginRegistrarManager {
    api: Arc<dyn EmbedderApi>,
    registrars: HandleRegistry<RegistrarRef>,
}

impl fmt::Debug for PluginRegistrarManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistrarManager")
            .field("registrars", &self.registrars.len())
            .finish_non_exhaustive()
    }
}

impl PluginRegistrarManager {
    pub fn new(api: Arc<dyn EmbedderApi>) -> Arc<Self> {
        Arc::new(Self {
            api,
            registrars: HandleRegistry::new(),
        })
    }

    /// The wrapper for `registrar`, created on first request.
    ///
    /// The manager owns the wrapper. The returned [`Weak`] stops upgrading
    /// once the native side destroys `registrar`.
    ///
    /// # Panics
    ///
    /// Panics if `registrar` was already wrapped with a different `T`.
    pub fn get_registrar<T: ManagedRegistrar>(
        self: &Arc<Self>,
        registrar: RegistrarRef,
    ) -> Weak<T> {
        let (wrapper, created) = self
            .registrars
            .get_or_create(registrar, |handle| T::from_native(handle, &self.api));

        if created {
            tracing::debug!(?registrar, "created registrar wrapper");
            self.api
                .set_destruction_handler(registrar, Some(self.destruction_handler()));
        }
        wrapper
    }

    fn destruction_handler(self: &Arc<Self>) -> DestructionHandler {
        let manager: Weak<Self> = Arc::downgrade(self);
        Box::new(move |registrar: RegistrarRef| match manager.upgrade() {
            Some(manager) => manager.on_registrar_destroyed(registrar),
            None => tracing::debug!(?registrar, "registrar destroyed after manager"),
        })
    }

    fn on_registrar_destroyed(&self, registrar: RegistrarRef) {
        if self.registrars.evict(registrar) {
            tracing::debug!(?registrar, "registrar destroyed, wrapper released");
        } else {
            tracing::debug!(?registrar, "destruction notice for unknown registrar");
        }
    }

    /// Drop every wrapper. Intended for tests and shutdown.
    pub fn reset(&self) {
        self.registrars.reset();
    }

    pub fn contains(&self, registrar: RegistrarRef) -> bool {
        self.registrars.contains(registrar)
    }

    pub fn len(&self) -> usize {
        self.registrars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrars.is_empty()
    }
}

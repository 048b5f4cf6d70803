//! [`PluginRegistrar`] and the [`Plugin`] / [`ManagedRegistrar`] traits.
//!
//! A registrar wraps one native registrar handle and hands plugins the
//! messenger and texture registrar that belong to it. Registrars obtained
//! through [`PluginRegistrarManager`](crate::PluginRegistrarManager) are torn
//! down when the native side destroys the handle. After that the messenger
//! and texture registrar are detached and every call through them fails.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use embedder_core::{EmbedderApi, RegistrarRef};

use crate::messenger::BinaryMessenger;
use crate::registry::HandleWrapper;
use crate::textures::TextureRegistrar;

/// A plugin owned by a [`PluginRegistrar`]. It is dropped when the registrar
/// is destroyed.
pub trait Plugin: Send + 'static {}

/// A registrar wrapper the manager can build for a native handle.
///
/// Types that embed a [`PluginRegistrar`] implement this to be returned from
/// [`PluginRegistrarManager::get_registrar`](crate::PluginRegistrarManager::get_registrar)
/// and override [`HandleWrapper::on_destroyed`] to observe teardown.
pub trait ManagedRegistrar: HandleWrapper + Sized {
    fn from_native(registrar: RegistrarRef, api: &Arc<dyn EmbedderApi>) -> Self;
}

pub struct PluginRegistrar {
    // Declared first so plugins drop before the messenger and textures they
    // may still reference.
    plugins: Mutex<Vec<Box<dyn Plugin>>>,
    registrar: RegistrarRef,
    messenger: BinaryMessenger,
    textures: TextureRegistrar,
}

impl fmt::Debug for PluginRegistrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistrar")
            .field("registrar", &self.registrar)
            .field("plugins", &self.plugins().len())
            .finish_non_exhaustive()
    }
}

impl PluginRegistrar {
    pub fn new(registrar: RegistrarRef, api: &Arc<dyn EmbedderApi>) -> Self {
        Self {
            plugins: Mutex::new(Vec::new()),
            registrar,
            messenger: BinaryMessenger::new(api.messenger(registrar)),
            textures: TextureRegistrar::new(api.texture_registrar(registrar)),
        }
    }

    fn plugins(&self) -> MutexGuard<'_, Vec<Box<dyn Plugin>>> {
        self.plugins.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn registrar(&self) -> RegistrarRef {
        self.registrar
    }

    pub fn messenger(&self) -> &BinaryMessenger {
        &self.messenger
    }

    pub fn textures(&self) -> &TextureRegistrar {
        &self.textures
    }

    /// Take ownership of `plugin` for the lifetime of this registrar.
    pub fn add_plugin(&self, plugin: Box<dyn Plugin>) {
        self.plugins().push(plugin);
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins().len()
    }

    /// Drop every plugin added so far.
    pub fn clear_plugins(&self) {
        let plugins = std::mem::take(&mut *self.plugins());
        if !plugins.is_empty() {
            tracing::debug!(registrar = ?self.registrar, count = plugins.len(), "dropping plugins");
        }
        drop(plugins);
    }
}

impl HandleWrapper for PluginRegistrar {
    fn on_destroyed(&self) {
        self.clear_plugins();
        self.messenger.detach();
        self.textures.detach();
    }
}

impl ManagedRegistrar for PluginRegistrar {
    fn from_native(registrar: RegistrarRef, api: &Arc<dyn EmbedderApi>) -> Self {
        Self::new(registrar, api)
    }
}

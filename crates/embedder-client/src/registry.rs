//! Handle-keyed store of wrapper objects.
//!
//! Each native handle maps to at most one wrapper. The registry holds the only
//! strong reference; callers get a [`Weak`]. On eviction the
//! [`on_destroyed`](HandleWrapper::on_destroyed) hook runs and the wrapper is
//! dropped before [`HandleRegistry::evict`] returns, unless a caller is still
//! holding an upgraded reference at that moment.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Base capability of every object stored in a [`HandleRegistry`].
pub trait HandleWrapper: Any + Send + Sync {
    /// Called once when the handle this wrapper is bound to goes away.
    fn on_destroyed(&self) {}
}

struct Entry {
    wrapper: Arc<dyn HandleWrapper>,
    any: Arc<dyn Any + Send + Sync>,
}

impl Entry {
    fn new<T: HandleWrapper>(wrapper: Arc<T>) -> Self {
        Self {
            any: wrapper.clone(),
            wrapper,
        }
    }

    fn destroy(self) {
        self.wrapper.on_destroyed();
    }
}

pub struct HandleRegistry<H> {
    table: Mutex<HashMap<H, Entry>>,
}

impl<H> Default for HandleRegistry<H> {
    fn default() -> Self {
        Self {
            table: Mutex::new(HashMap::new()),
        }
    }
}

impl<H> HandleRegistry<H>
where
    H: Copy + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<H, Entry>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the wrapper for `handle`, creating it with `make` if there is
    /// none. The flag is `true` when this call created it.
    ///
    /// The returned [`Weak`] stops upgrading once the handle is evicted.
    ///
    /// `make` runs with the table locked and must not call back into the
    /// registry.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is already bound to a wrapper of a different type.
    pub fn get_or_create<T: HandleWrapper>(
        &self,
        handle: H,
        make: impl FnOnce(H) -> T,
    ) -> (Weak<T>, bool) {
        let mut table = self.table();
        if let Some(entry) = table.get(&handle) {
            let any = Arc::clone(&entry.any);
            drop(table);
            return match any.downcast::<T>() {
                Ok(wrapper) => (Arc::downgrade(&wrapper), false),
                Err(_) => panic!(
                    "{handle:?} is already wrapped by a type other than {}",
                    std::any::type_name::<T>()
                ),
            };
        }

        let wrapper = Arc::new(make(handle));
        let weak = Arc::downgrade(&wrapper);
        table.insert(handle, Entry::new(wrapper));
        (weak, true)
    }

    /// Remove the wrapper for `handle`, run its teardown hook and drop it.
    /// Returns `false` if nothing was registered.
    pub fn evict(&self, handle: H) -> bool {
        let entry = self.table().remove(&handle);
        match entry {
            Some(entry) => {
                entry.destroy();
                true
            }
            None => false,
        }
    }

    /// Drop every wrapper, running each teardown hook.
    pub fn reset(&self) {
        let entries = std::mem::take(&mut *self.table());
        for (_, entry) in entries {
            entry.destroy();
        }
    }

    pub fn contains(&self, handle: H) -> bool {
        self.table().contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

use std::any::{self, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::component::{Component, ComponentStorage, ComponentStore};
use crate::entity::Entity;

/// Shared handle to the store of one component type.
///
/// Systems resolve the handles they need once and keep them. Do not hold a
/// guard from a handle across a call that cascades into every store
/// (e.g. [`Registry::purge`]); the locks are not reentrant.
pub type StoreHandle<T> = Arc<RwLock<ComponentStore<T>>>;

struct StoreEntry {
    typed: Arc<dyn Any + Send + Sync>,
    erased: Arc<dyn ComponentStorage>,
}

impl StoreEntry {
    fn new<T: Component>() -> Self {
        let store: StoreHandle<T> = Arc::new(RwLock::new(ComponentStore::new()));
        Self {
            typed: store.clone(),
            erased: store,
        }
    }

    fn handle<T: Component>(&self) -> Option<StoreHandle<T>> {
        self.typed
            .clone()
            .downcast::<RwLock<ComponentStore<T>>>()
            .ok()
    }
}

/// Directory from component type to its store.
///
/// Cloning a registry yields another handle to the same stores, which is how
/// it is passed to the entity directory, systems, and factories. Independent
/// simulations each construct their own.
#[derive(Clone, Default)]
pub struct Registry {
    stores: Arc<RwLock<HashMap<TypeId, StoreEntry>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the store for `T`, creating and registering an empty one on first use.
    pub fn resolve<T: Component>(&self) -> StoreHandle<T> {
        if let Some(handle) = self.lookup::<T>() {
            return handle;
        }
        let mut stores = self.stores.write();
        stores
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                debug!(component = any::type_name::<T>(), "Registered component store");
                StoreEntry::new::<T>()
            })
            .handle::<T>()
            .expect("component type mismatch")
    }

    /// Get the store for `T` only if one has been registered.
    pub fn lookup<T: Component>(&self) -> Option<StoreHandle<T>> {
        self.stores
            .read()
            .get(&TypeId::of::<T>())
            .and_then(StoreEntry::handle::<T>)
    }

    /// Whether a store for `T` has been registered.
    pub fn contains<T: Component>(&self) -> bool {
        self.stores.read().contains_key(&TypeId::of::<T>())
    }

    /// Remove every component held by `entity`. Returns how many stores held one.
    pub fn purge(&self, entity: Entity) -> usize {
        let stores: Vec<_> = self
            .stores
            .read()
            .values()
            .map(|entry| entry.erased.clone())
            .collect();
        stores
            .iter()
            .filter(|store| store.remove_entity(entity))
            .count()
    }

    /// Empty every store. Registrations, and handles held by systems, stay valid.
    pub fn clear(&self) {
        for entry in self.stores.read().values() {
            entry.erased.clear();
        }
    }

    /// Number of registered component types.
    pub fn store_count(&self) -> usize {
        self.stores.read().len()
    }

    /// Total number of components across all stores.
    pub fn component_count(&self) -> usize {
        self.stores
            .read()
            .values()
            .map(|entry| entry.erased.len())
            .sum()
    }

    /// Names of the registered component types, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .stores
            .read()
            .values()
            .map(|entry| entry.erased.component_name())
            .collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("stores", &self.type_names())
            .finish()
    }
}

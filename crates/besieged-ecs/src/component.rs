use std::any;
use std::collections::hash_map;
use std::collections::HashMap;

use parking_lot::RwLock;

use crate::entity::Entity;

/// Marker trait for types that can be stored as ECS components.
pub trait Component: 'static + Send + Sync {}

/// Blanket implementation: any `'static + Send + Sync` type is a valid component.
impl<T: 'static + Send + Sync> Component for T {}

/// Type-erased store interface, used for cascades that must touch every store.
pub(crate) trait ComponentStorage: Send + Sync {
    fn remove_entity(&self, entity: Entity) -> bool;
    fn clear(&self);
    fn len(&self) -> usize;
    fn component_name(&self) -> &'static str;
}

/// Storage for a single component type, keyed by entity.
///
/// Holds at most one component per entity. [`ComponentStore::insert`] is an
/// upsert: inserting for an entity that already has a value replaces it.
/// The store never checks entity liveness; that belongs to the caller.
#[derive(Debug)]
pub struct ComponentStore<T> {
    components: HashMap<Entity, T>,
}

impl<T: Component> ComponentStore<T> {
    pub fn new() -> Self {
        Self {
            components: HashMap::new(),
        }
    }

    /// Insert or replace the component for `entity`. Returns the replaced value.
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        self.components.insert(entity, component)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.components.get(&entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.components.get_mut(&entity)
    }

    /// Remove the component for `entity`. No-op when absent.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.components.remove(&entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.components.contains_key(&entity)
    }

    /// Iterate over all (entity, &component) pairs. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.components.iter().map(|(e, c)| (*e, c))
    }

    /// Iterate over all (entity, &mut component) pairs. Order is unspecified.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.components.iter_mut().map(|(e, c)| (*e, c))
    }

    /// Entities that currently hold a component of this type.
    pub fn entities(&self) -> hash_map::Keys<'_, Entity, T> {
        self.components.keys()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn clear(&mut self) {
        self.components.clear();
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage for RwLock<ComponentStore<T>> {
    fn remove_entity(&self, entity: Entity) -> bool {
        self.write().remove(entity).is_some()
    }

    fn clear(&self) {
        self.write().clear();
    }

    fn len(&self) -> usize {
        self.read().len()
    }

    fn component_name(&self) -> &'static str {
        any::type_name::<T>()
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::component::Component;
use crate::registry::Registry;

/// An opaque entity handle backed by a random 128-bit identifier.
///
/// Entities carry no data and no registry binding. Serializing one yields the
/// bare UUID; a deserialized entity is rebound with [`Entity::bind`] against
/// whatever registry the receiving process owns.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(Uuid);

impl Entity {
    /// Create a new entity with a random v4 identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Rebuild an entity from a known identifier (e.g. one read off the wire).
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// The identifier of this entity.
    pub fn id(&self) -> Uuid {
        self.0
    }

    /// Pair this entity with a registry for component access.
    pub fn bind(self, registry: &Registry) -> EntityRef<'_> {
        EntityRef {
            entity: self,
            registry,
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0.simple())
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entity bound to a registry. Attaching goes through [`Registry::resolve`],
/// so the store for a component type is created on first use.
#[derive(Clone, Copy)]
pub struct EntityRef<'r> {
    entity: Entity,
    registry: &'r Registry,
}

impl<'r> EntityRef<'r> {
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Attach a component, replacing any existing one of the same type.
    pub fn insert<T: Component>(&self, component: T) -> &Self {
        self.registry
            .resolve::<T>()
            .write()
            .insert(self.entity, component);
        self
    }

    /// Clone out the component of type `T`, if attached.
    pub fn get<T: Component + Clone>(&self) -> Option<T> {
        self.registry.resolve::<T>().read().get(self.entity).cloned()
    }

    pub fn has<T: Component>(&self) -> bool {
        self.registry.resolve::<T>().read().contains(self.entity)
    }

    /// Read the component in place.
    pub fn with<T: Component, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.registry.resolve::<T>().read().get(self.entity).map(f)
    }

    /// Mutate the component in place.
    pub fn with_mut<T: Component, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.registry
            .resolve::<T>()
            .write()
            .get_mut(self.entity)
            .map(f)
    }

    /// Detach the component of type `T`, returning it if it was attached.
    pub fn remove<T: Component>(&self) -> Option<T> {
        self.registry.resolve::<T>().write().remove(self.entity)
    }
}

impl fmt::Debug for EntityRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityRef").field(&self.entity).finish()
    }
}

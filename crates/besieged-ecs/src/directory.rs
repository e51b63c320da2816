use std::collections::HashSet;
use std::slice;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::entity::Entity;
use crate::registry::Registry;

/// Which side of the network boundary an entity lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Replication {
    /// Shared with remote peers.
    Replicated,
    /// Confined to the owning process.
    Local,
}

/// The authoritative set of live entities, split into replicated and local.
///
/// An entity is in exactly one of the two subsets while live. Removing an
/// entity cascades into every store of the registry it was built with.
#[derive(Debug)]
pub struct EntityDirectory {
    registry: Registry,
    replicated: HashSet<Entity>,
    local: HashSet<Entity>,
}

impl EntityDirectory {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            replicated: HashSet::new(),
            local: HashSet::new(),
        }
    }

    /// The registry that removals cascade into.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Admit an entity as replicated. Returns `false` if it was already live.
    pub fn add_replicated(&mut self, entity: Entity) -> bool {
        self.admit(entity, Replication::Replicated)
    }

    /// Admit an entity as local. Returns `false` if it was already live.
    pub fn add_local(&mut self, entity: Entity) -> bool {
        self.admit(entity, Replication::Local)
    }

    /// Admit an entity into the given subset.
    ///
    /// Admission is idempotent. An entity already live in the other subset
    /// keeps its partition and the call returns `false`.
    pub fn admit(&mut self, entity: Entity, replication: Replication) -> bool {
        if let Some(current) = self.replication_of(entity) {
            if current != replication {
                warn!(%entity, ?current, requested = ?replication, "Entity already live in other partition");
            }
            return false;
        }
        match replication {
            Replication::Replicated => self.replicated.insert(entity),
            Replication::Local => self.local.insert(entity),
        };
        debug!(%entity, ?replication, "Admitted entity");
        true
    }

    /// Remove an entity and all of its components.
    ///
    /// Returns whether the entity was live. Components are purged either way,
    /// so data attached to a never-admitted entity does not linger.
    pub fn remove(&mut self, entity: Entity) -> bool {
        let was_live = self.replicated.remove(&entity) || self.local.remove(&entity);
        let purged = self.registry.purge(entity);
        if was_live {
            debug!(%entity, purged, "Removed entity");
        }
        was_live
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.replicated.contains(&entity) || self.local.contains(&entity)
    }

    /// The partition holding `entity`, if it is live.
    pub fn replication_of(&self, entity: Entity) -> Option<Replication> {
        if self.replicated.contains(&entity) {
            Some(Replication::Replicated)
        } else if self.local.contains(&entity) {
            Some(Replication::Local)
        } else {
            None
        }
    }

    pub fn is_replicated(&self, entity: Entity) -> bool {
        self.replicated.contains(&entity)
    }

    pub fn is_local(&self, entity: Entity) -> bool {
        self.local.contains(&entity)
    }

    /// Replicated entities, in unspecified order.
    pub fn replicated(&self) -> impl Iterator<Item = Entity> + '_ {
        self.replicated.iter().copied()
    }

    /// Local entities, in unspecified order.
    pub fn local(&self) -> impl Iterator<Item = Entity> + '_ {
        self.local.iter().copied()
    }

    /// Number of live entities across both partitions.
    pub fn len(&self) -> usize {
        self.replicated.len() + self.local.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replicated.is_empty() && self.local.is_empty()
    }

    /// Copy of the live set, sorted by identifier.
    pub fn snapshot(&self) -> Snapshot {
        let mut entities: Vec<Entity> = self
            .replicated
            .iter()
            .chain(self.local.iter())
            .copied()
            .collect();
        entities.sort_unstable();
        Snapshot { entities }
    }

    /// Forget every entity. Component stores are left untouched; clear the
    /// registry separately for a full reset.
    pub fn clear(&mut self) {
        self.replicated.clear();
        self.local.clear();
    }
}

/// The live entity set frozen at a tick boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entities: Vec<Entity>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.binary_search(&entity).is_ok()
    }

    pub fn iter(&self) -> slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Entity;
    type IntoIter = slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

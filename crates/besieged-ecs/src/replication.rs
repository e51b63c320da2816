//! Moving component data across a process or storage boundary.
//!
//! Only the entity identifier and the component value travel. The receiving
//! side rebinds each record against its own registry; no registry reference
//! is ever serialized.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::component::Component;
use crate::directory::EntityDirectory;
use crate::entity::Entity;

/// One component of one entity, as sent to a peer or written to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord<T> {
    pub entity: Entity,
    pub component: T,
}

/// Collect the `T` components of every replicated entity, sorted by entity.
///
/// Local entities are never exported. Returns nothing if no store for `T`
/// has been registered.
pub fn export_replicated<T: Component + Clone>(
    directory: &EntityDirectory,
) -> Vec<ComponentRecord<T>> {
    let Some(store) = directory.registry().lookup::<T>() else {
        return Vec::new();
    };
    let store = store.read();
    let mut records: Vec<_> = directory
        .replicated()
        .filter_map(|entity| {
            store.get(entity).map(|component| ComponentRecord {
                entity,
                component: component.clone(),
            })
        })
        .collect();
    records.sort_unstable_by_key(|record| record.entity);
    records
}

/// Admit each record's entity as replicated and upsert its component into the
/// directory's registry. Records naming an entity that is local here are
/// skipped. Returns how many records were applied.
pub fn import_records<T: Component>(
    records: impl IntoIterator<Item = ComponentRecord<T>>,
    directory: &mut EntityDirectory,
) -> usize {
    let store = directory.registry().resolve::<T>();
    let mut applied = 0;
    for ComponentRecord { entity, component } in records {
        if directory.is_local(entity) {
            warn!(%entity, "Ignoring replicated record for a local entity");
            continue;
        }
        directory.add_replicated(entity);
        store.write().insert(entity, component);
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Money(i32);

    #[test]
    fn export_skips_local_entities() {
        let registry = Registry::new();
        let mut dir = EntityDirectory::new(registry.clone());
        let shared = Entity::new();
        let private = Entity::new();
        dir.add_replicated(shared);
        dir.add_local(private);
        let money = registry.resolve::<Money>();
        money.write().insert(shared, Money(10));
        money.write().insert(private, Money(99));

        let records = export_replicated::<Money>(&dir);
        assert_eq!(
            records,
            vec![ComponentRecord {
                entity: shared,
                component: Money(10)
            }]
        );
    }

    #[test]
    fn export_without_store_is_empty() {
        let dir = EntityDirectory::new(Registry::new());
        assert!(export_replicated::<Money>(&dir).is_empty());
        assert!(!dir.registry().contains::<Money>());
    }

    #[test]
    fn round_trip_rebinds_to_receiving_registry() {
        let sender = Registry::new();
        let mut sender_dir = EntityDirectory::new(sender.clone());
        let e = Entity::new();
        sender_dir.add_replicated(e);
        sender.resolve::<Money>().write().insert(e, Money(250));

        let wire = serde_json::to_string(&export_replicated::<Money>(&sender_dir)).unwrap();
        assert!(wire.contains(&e.id().to_string()));

        let receiver = Registry::new();
        let mut receiver_dir = EntityDirectory::new(receiver.clone());
        let records: Vec<ComponentRecord<Money>> = serde_json::from_str(&wire).unwrap();
        assert_eq!(import_records(records, &mut receiver_dir), 1);

        assert!(receiver_dir.is_replicated(e));
        assert_eq!(e.bind(&receiver).get::<Money>(), Some(Money(250)));
    }

    #[test]
    fn import_skips_local_entities() {
        let mut dir = EntityDirectory::new(Registry::new());
        let e = Entity::new();
        dir.add_local(e);
        let applied = import_records(
            vec![ComponentRecord {
                entity: e,
                component: Money(1),
            }],
            &mut dir,
        );
        assert_eq!(applied, 0);
        assert!(dir.is_local(e));
        assert_eq!(e.bind(dir.registry()).get::<Money>(), None);
    }
}

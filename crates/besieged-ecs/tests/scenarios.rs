use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use besieged_ecs::{Entity, Registry, StoreHandle, System, SystemResult, TickContext, World};

#[derive(Debug, Clone, PartialEq)]
struct Counter(i32);

#[derive(Debug, Clone, PartialEq)]
struct Display(String);

#[derive(Debug, Clone, PartialEq)]
struct Health(i32);

/// Decrements every counter by one each tick.
struct CountdownSystem {
    counters: StoreHandle<Counter>,
}

impl CountdownSystem {
    fn new(registry: &Registry) -> Self {
        Self {
            counters: registry.resolve(),
        }
    }
}

impl System for CountdownSystem {
    fn update(&mut self, ctx: &mut TickContext<'_>) -> SystemResult {
        let mut counters = self.counters.write();
        for entity in ctx.entities() {
            if let Some(counter) = counters.get_mut(*entity) {
                counter.0 -= 1;
            }
        }
        Ok(())
    }
}

/// Writes the counter value into a display string.
struct DisplaySystem {
    counters: StoreHandle<Counter>,
    displays: StoreHandle<Display>,
}

impl DisplaySystem {
    fn new(registry: &Registry) -> Self {
        Self {
            counters: registry.resolve(),
            displays: registry.resolve(),
        }
    }
}

impl System for DisplaySystem {
    fn update(&mut self, ctx: &mut TickContext<'_>) -> SystemResult {
        let counters = self.counters.read();
        let mut displays = self.displays.write();
        for entity in ctx.entities() {
            if let Some(counter) = counters.get(*entity) {
                displays.insert(*entity, Display(format!("Count: {}", counter.0)));
            }
        }
        Ok(())
    }
}

#[test]
fn created_entities_are_pairwise_distinct() {
    let ids: HashSet<_> = (0..1000).map(|_| Entity::new()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn admitting_twice_keeps_one_entity() {
    let mut world = World::new();
    let e = Entity::new();
    assert!(world.directory_mut().add_replicated(e));
    assert!(!world.directory_mut().add_replicated(e));
    assert_eq!(world.entity_count(), 1);
}

#[test]
fn partition_is_exclusive_and_exhaustive() {
    let mut world = World::new();
    let spawned: Vec<_> = (0..20)
        .map(|i| {
            if i % 3 == 0 {
                world.spawn_replicated()
            } else {
                world.spawn_local()
            }
        })
        .collect();
    // Try to move every entity into the other partition.
    for e in &spawned {
        world.directory_mut().add_replicated(*e);
        world.directory_mut().add_local(*e);
    }

    let dir = world.directory();
    for e in dir.snapshot().iter() {
        assert_ne!(dir.is_replicated(*e), dir.is_local(*e));
    }
    assert_eq!(dir.replicated().count() + dir.local().count(), dir.len());
    assert_eq!(dir.len(), spawned.len());
    assert_eq!(dir.replicated().count(), 7);
}

#[test]
fn store_insert_is_upsert() {
    let registry = Registry::new();
    let e = Entity::new();
    let store = registry.resolve::<Health>();
    store.write().insert(e, Health(1));
    store.write().insert(e, Health(2));
    assert_eq!(store.read().get(e), Some(&Health(2)));
    assert_eq!(store.read().len(), 1);
}

#[test]
fn entities_spawned_mid_tick_appear_next_tick() {
    let mut world = World::new();
    world.spawn_local();

    let seen: Arc<Mutex<Vec<(u64, usize, Option<Entity>)>>> = Arc::default();
    let spawned: Arc<Mutex<Option<Entity>>> = Arc::default();

    let spawn_slot = spawned.clone();
    world.add_fn_system("spawner", move |ctx: &mut TickContext<'_>| {
        if ctx.tick() == 0 {
            let e = ctx.commands().spawn_replicated();
            *spawn_slot.lock().unwrap() = Some(e);
        }
        Ok(())
    });

    let log = seen.clone();
    let spawn_probe = spawned.clone();
    world.add_fn_system("observer", move |ctx: &mut TickContext<'_>| {
        let probe = *spawn_probe.lock().unwrap();
        let found = probe.filter(|e| ctx.entities().contains(*e));
        log.lock().unwrap().push((ctx.tick(), ctx.entities().len(), found));
        Ok(())
    });

    let first = world.tick(1.0);
    assert_eq!(first.admitted, 1);
    world.tick(1.0);

    let e = spawned.lock().unwrap().expect("spawner ran");
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0], (0, 1, None));
    assert_eq!(seen[1], (1, 2, Some(e)));
    assert!(world.directory().is_replicated(e));
}

#[test]
fn despawn_mid_tick_is_deferred_and_cascades() {
    let mut world = World::new();
    let doomed = world.spawn_replicated();
    world.entity(doomed).insert(Health(5)).insert(Counter(3));

    let health_seen: Arc<Mutex<Vec<bool>>> = Arc::default();
    world.add_fn_system("reaper", move |ctx: &mut TickContext<'_>| {
        for e in ctx.entities() {
            ctx.commands().despawn(*e);
        }
        Ok(())
    });
    let log = health_seen.clone();
    world.add_fn_system("late-reader", move |ctx: &mut TickContext<'_>| {
        let health = ctx.registry().resolve::<Health>();
        log.lock().unwrap().push(health.read().contains(doomed));
        Ok(())
    });

    let report = world.tick(1.0);
    assert_eq!(report.removed, 1);
    assert_eq!(*health_seen.lock().unwrap(), vec![true]);

    assert!(!world.is_alive(doomed));
    assert!(world.registry().resolve::<Health>().read().get(doomed).is_none());
    assert!(world.registry().resolve::<Counter>().read().get(doomed).is_none());
}

#[test]
fn replicated_and_local_snapshot_then_remove() {
    let mut world = World::new();
    let e1 = Entity::new();
    let e2 = Entity::new();
    world.directory_mut().add_replicated(e1);
    world.directory_mut().add_local(e2);

    let snapshot = world.directory().snapshot();
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.contains(e1));
    assert!(snapshot.contains(e2));

    world.directory_mut().remove(e1);
    let snapshot = world.directory().snapshot();
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.contains(e2));
}

#[test]
fn later_system_sees_value_written_earlier_in_tick() {
    let mut world = World::new();
    let e = world.spawn_local();
    world.entity(e).insert(Counter(10));

    let countdown = CountdownSystem::new(world.registry());
    let display = DisplaySystem::new(world.registry());
    world.add_system(countdown);
    world.add_system(display);

    let report = world.tick(1.0);
    assert!(report.is_ok());
    assert_eq!(world.entity(e).get::<Counter>(), Some(Counter(9)));
    assert_eq!(
        world.entity(e).get::<Display>(),
        Some(Display("Count: 9".to_string()))
    );
}

#[test]
fn failing_system_does_not_halt_the_tick() {
    let mut world = World::new();
    let e = world.spawn_local();
    world.entity(e).insert(Counter(1));

    world.add_fn_system("broken", |ctx: &mut TickContext<'_>| {
        let e = ctx.entities().as_slice()[0];
        Err(besieged_ecs::SystemError::missing::<Health>(e))
    });
    let countdown = CountdownSystem::new(world.registry());
    world.add_system(countdown);

    let report = world.tick(1.0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].system, "broken");
    assert_eq!(world.entity(e).get::<Counter>(), Some(Counter(0)));

    // The loop keeps going on the next tick.
    let report = world.tick(1.0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(world.entity(e).get::<Counter>(), Some(Counter(-1)));
}

#[test]
fn deserialized_entity_rebinds_to_local_registry() {
    let registry = Registry::new();
    let e = Entity::new();
    e.bind(&registry).insert(Health(40));

    let json = serde_json::to_string(&e).unwrap();
    assert_eq!(json, format!("\"{}\"", e.id()));

    let restored: Entity = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, e);
    assert_eq!(restored.bind(&registry).get::<Health>(), Some(Health(40)));

    let elsewhere = Registry::new();
    assert_eq!(restored.bind(&elsewhere).get::<Health>(), None);
}


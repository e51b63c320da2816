use tracing::{trace, warn};

use crate::commands::Commands;
use crate::directory::{EntityDirectory, Replication};
use crate::entity::{Entity, EntityRef};
use crate::error::SystemFailure;
use crate::registry::Registry;
use crate::system::{System, SystemResult, SystemSchedule, TickContext};

/// Outcome of one tick.
#[derive(Debug)]
pub struct TickReport {
    /// Index of the tick that ran.
    pub tick: u64,
    /// Elapsed time the tick was run with.
    pub elapsed: f32,
    /// Size of the snapshot the systems iterated.
    pub entities: usize,
    /// Entities admitted at the end of the tick.
    pub admitted: usize,
    /// Entities removed at the end of the tick.
    pub removed: usize,
    /// Systems that failed; the others ran normally.
    pub failures: Vec<SystemFailure>,
}

impl TickReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The central ECS container. Owns the registry, the entity directory, and
/// the system schedule, and drives the tick loop.
pub struct World {
    registry: Registry,
    directory: EntityDirectory,
    schedule: SystemSchedule,
    tick: u64,
}

impl World {
    pub fn new() -> Self {
        Self::with_registry(Registry::new())
    }

    /// Build a world around an existing registry.
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            directory: EntityDirectory::new(registry.clone()),
            registry,
            schedule: SystemSchedule::new(),
            tick: 0,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn directory(&self) -> &EntityDirectory {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut EntityDirectory {
        &mut self.directory
    }

    // ---- Entity management ----

    /// Create a replicated entity. It is live immediately.
    pub fn spawn_replicated(&mut self) -> Entity {
        let entity = Entity::new();
        self.directory.add_replicated(entity);
        entity
    }

    /// Create a local entity. It is live immediately.
    pub fn spawn_local(&mut self) -> Entity {
        let entity = Entity::new();
        self.directory.add_local(entity);
        entity
    }

    /// Admit an existing entity, e.g. one deserialized from a peer.
    pub fn admit(&mut self, entity: Entity, replication: Replication) -> bool {
        self.directory.admit(entity, replication)
    }

    /// Remove an entity and all of its components.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        self.directory.remove(entity)
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.directory.contains(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.directory.len()
    }

    /// Component access for one entity.
    pub fn entity(&self, entity: Entity) -> EntityRef<'_> {
        entity.bind(&self.registry)
    }

    // ---- Systems ----

    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.schedule.add_system(system);
    }

    pub fn add_fn_system<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: FnMut(&mut TickContext<'_>) -> SystemResult + Send + Sync + 'static,
    {
        self.schedule.add_fn_system(name, func);
    }

    pub fn schedule(&self) -> &SystemSchedule {
        &self.schedule
    }

    /// Number of ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Run one tick.
    ///
    /// Every system sees the same snapshot, taken before the first one runs.
    /// Membership changes queued through [`TickContext::commands`] are applied
    /// after the last system, so they show up in the next tick's snapshot.
    pub fn tick(&mut self, elapsed: f32) -> TickReport {
        let snapshot = self.directory.snapshot();
        let mut commands = Commands::new();

        let failures = {
            let mut ctx =
                TickContext::new(self.tick, elapsed, &snapshot, &self.registry, &mut commands);
            self.schedule.run(&mut ctx)
        };
        for failure in &failures {
            warn!(tick = self.tick, "{failure}");
        }

        let (admitted, removed) = commands.apply(&mut self.directory);
        trace!(
            tick = self.tick,
            entities = snapshot.len(),
            admitted,
            removed,
            "Tick complete"
        );

        let report = TickReport {
            tick: self.tick,
            elapsed,
            entities: snapshot.len(),
            admitted,
            removed,
            failures,
        };
        self.tick += 1;
        report
    }

    /// Forget every entity and empty every store. Systems stay registered.
    pub fn reset(&mut self) {
        self.directory.clear();
        self.registry.clear();
        self.tick = 0;
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[test]
    fn spawn_and_despawn() {
        let mut world = World::new();
        let e = world.spawn_local();
        assert!(world.is_alive(e));
        assert_eq!(world.entity_count(), 1);
        assert!(world.despawn(e));
        assert!(!world.is_alive(e));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn despawn_removes_components() {
        let mut world = World::new();
        let e = world.spawn_replicated();
        world.entity(e).insert(Position { x: 1.0, y: 0.0 });
        world.despawn(e);
        assert_eq!(world.entity(e).get::<Position>(), None);
        assert!(world.registry().resolve::<Position>().read().is_empty());
    }

    #[test]
    fn tick_counts_up() {
        let mut world = World::new();
        world.spawn_local();
        let report = world.tick(0.5);
        assert_eq!(report.tick, 0);
        assert_eq!(report.entities, 1);
        assert!(report.is_ok());
        assert_eq!(world.tick(0.5).tick, 1);
        assert_eq!(world.tick_count(), 2);
    }

    #[test]
    fn reset_clears_entities_and_components() {
        let mut world = World::new();
        let e = world.spawn_local();
        world.entity(e).insert(Position { x: 0.0, y: 0.0 });
        world.add_fn_system("noop", |_ctx: &mut TickContext<'_>| Ok(()));
        world.tick(0.1);

        world.reset();
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.registry().component_count(), 0);
        assert_eq!(world.tick_count(), 0);
        assert_eq!(world.schedule().len(), 1);
    }
}

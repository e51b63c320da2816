use crate::directory::{EntityDirectory, Replication};
use crate::entity::Entity;

/// A membership change queued during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Admit(Entity, Replication),
    Remove(Entity),
}

/// Queue of membership changes made by systems.
///
/// Systems never touch the entity directory directly. Queued commands are
/// applied in order once every system of the tick has run, so they show up
/// in the next tick's snapshot.
#[derive(Debug, Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity that joins the replicated set at the next tick.
    pub fn spawn_replicated(&mut self) -> Entity {
        let entity = Entity::new();
        self.admit(entity, Replication::Replicated);
        entity
    }

    /// Create a new entity that joins the local set at the next tick.
    pub fn spawn_local(&mut self) -> Entity {
        let entity = Entity::new();
        self.admit(entity, Replication::Local);
        entity
    }

    /// Queue admission of an existing entity.
    pub fn admit(&mut self, entity: Entity, replication: Replication) {
        self.queue.push(Command::Admit(entity, replication));
    }

    /// Queue removal of an entity and its components.
    pub fn despawn(&mut self, entity: Entity) {
        self.queue.push(Command::Remove(entity));
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Apply and drain every queued command. Returns (admitted, removed).
    pub fn apply(&mut self, directory: &mut EntityDirectory) -> (usize, usize) {
        let mut admitted = 0;
        let mut removed = 0;
        for command in self.queue.drain(..) {
            match command {
                Command::Admit(entity, replication) => {
                    if directory.admit(entity, replication) {
                        admitted += 1;
                    }
                }
                Command::Remove(entity) => {
                    if directory.remove(entity) {
                        removed += 1;
                    }
                }
            }
        }
        (admitted, removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    #[test]
    fn commands_apply_in_order() {
        let mut dir = EntityDirectory::new(Registry::new());
        let mut commands = Commands::new();

        let e = commands.spawn_local();
        commands.despawn(e);
        let kept = commands.spawn_replicated();
        assert_eq!(commands.len(), 3);
        assert!(dir.is_empty());

        assert_eq!(commands.apply(&mut dir), (2, 1));
        assert!(commands.is_empty());
        assert!(!dir.contains(e));
        assert!(dir.is_replicated(kept));
    }

    #[test]
    fn duplicate_admission_counts_once() {
        let mut dir = EntityDirectory::new(Registry::new());
        let mut commands = Commands::new();
        let e = Entity::new();
        commands.admit(e, Replication::Local);
        commands.admit(e, Replication::Local);

        assert_eq!(commands.apply(&mut dir), (1, 0));
        assert_eq!(dir.len(), 1);
    }
}

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::trace;

use crate::commands::Commands;
use crate::directory::Snapshot;
use crate::error::{FailureCause, SystemError, SystemFailure};
use crate::registry::Registry;

pub type SystemResult = Result<(), SystemError>;

/// Everything a system sees during one tick.
pub struct TickContext<'a> {
    tick: u64,
    elapsed: f32,
    entities: &'a Snapshot,
    registry: &'a Registry,
    commands: &'a mut Commands,
}

impl<'a> TickContext<'a> {
    pub fn new(
        tick: u64,
        elapsed: f32,
        entities: &'a Snapshot,
        registry: &'a Registry,
        commands: &'a mut Commands,
    ) -> Self {
        Self {
            tick,
            elapsed,
            entities,
            registry,
            commands,
        }
    }

    /// Index of the running tick, starting at zero.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Elapsed time passed to this tick, in seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Entities live at the start of this tick.
    pub fn entities(&self) -> &'a Snapshot {
        self.entities
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Membership changes, applied after the last system of this tick.
    pub fn commands(&mut self) -> &mut Commands {
        self.commands
    }
}

/// A behavior unit invoked once per tick.
///
/// Systems hold store handles resolved from the registry, never the
/// components themselves.
pub trait System: Send + Sync {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> SystemResult;
}

/// A named closure used as a system.
pub struct FnSystem<F> {
    name: String,
    func: F,
}

impl<F> FnSystem<F>
where
    F: FnMut(&mut TickContext<'_>) -> SystemResult + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> System for FnSystem<F>
where
    F: FnMut(&mut TickContext<'_>) -> SystemResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> SystemResult {
        (self.func)(ctx)
    }
}

/// An ordered list of systems to run each tick.
pub struct SystemSchedule {
    systems: Vec<Box<dyn System>>,
}

impl SystemSchedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Add a system to the end of the schedule.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Add a closure to the end of the schedule.
    pub fn add_fn_system<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: FnMut(&mut TickContext<'_>) -> SystemResult + Send + Sync + 'static,
    {
        self.add_system(FnSystem::new(name, func));
    }

    /// Run every system once, in registration order.
    ///
    /// A system that returns an error or panics is recorded and skipped over;
    /// the rest of the schedule still runs.
    pub fn run(&mut self, ctx: &mut TickContext<'_>) -> Vec<SystemFailure> {
        let mut failures = Vec::new();
        for system in &mut self.systems {
            trace!(system = system.name(), tick = ctx.tick(), "Running system");
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| system.update(ctx)));
            let cause = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => FailureCause::Error(err),
                Err(payload) => FailureCause::Panicked(panic_message(payload.as_ref())),
            };
            failures.push(SystemFailure {
                system: system.name().to_string(),
                cause,
            });
        }
        failures
    }

    /// System names in run order.
    pub fn names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// Number of systems in the schedule.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl Default for SystemSchedule {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

//! Besieged ECS - Entity Component System
//!
//! The runtime every gameplay system is built on. Entities are random UUID
//! handles, components live in per-type stores resolved lazily through a
//! [`Registry`], and a [`World`] drives an ordered [`SystemSchedule`] once
//! per tick over a frozen [`Snapshot`] of the live entity set.

mod commands;
mod component;
mod directory;
mod entity;
mod error;
pub mod replication;
mod registry;
mod system;
mod world;

pub use commands::{Command, Commands};
pub use component::{Component, ComponentStore};
pub use directory::{EntityDirectory, Replication, Snapshot};
pub use entity::{Entity, EntityRef};
pub use error::{FailureCause, SystemError, SystemFailure, ValidationError};
pub use registry::{Registry, StoreHandle};
pub use system::{FnSystem, System, SystemResult, SystemSchedule, TickContext};
pub use world::{TickReport, World};

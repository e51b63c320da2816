//! Besieged Game - Tower-defense data and systems built on the ECS runtime
//!
//! This crate provides:
//! - Component records with validated setters (health, cost, money, ...)
//! - The card factory
//! - Village setup and the systems that keep it up to date each tick

pub mod card;
pub mod components;
pub mod systems;
pub mod village;

pub use card::{create_card, CardType};
pub use components::{
    Cost, Health, Money, PendingDamage, PlacedCard, Position, Sound, Sprite, Text, Village,
};
pub use systems::{register_default_systems, HudSystem, VillageDamageSystem};
pub use village::spawn_village;

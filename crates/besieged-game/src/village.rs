use besieged_ecs::{Entity, ValidationError, World};
use glam::Vec2;
use tracing::info;

use crate::components::{Health, Money, Position, Text, Village};

/// Where the HUD text for the village is drawn.
pub const HUD_POSITION: Vec2 = Vec2::new(0.8, 0.9);

/// The HUD line shown for a village.
pub fn hud_text(health: i32, money: i32) -> String {
    format!("Health: {health}\n Money: {money}")
}

/// Spawn the replicated village entity with its health, balance, and HUD text.
pub fn spawn_village(
    world: &mut World,
    health: i32,
    money: i32,
) -> Result<Entity, ValidationError> {
    let health = Health::new(health)?;
    let money = Money::new(money)?;

    let village = world.spawn_replicated();
    world
        .entity(village)
        .insert(Village)
        .insert(Text::new(
            hud_text(health.health(), money.amount()),
            Vec2::new(0.05, 0.05),
        ))
        .insert(Position {
            position: HUD_POSITION,
            z_index: 10,
        })
        .insert(health)
        .insert(money);
    info!(%village, health = health.health(), money = money.amount(), "Spawned village");
    Ok(village)
}

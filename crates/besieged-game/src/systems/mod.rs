//! Game systems. Register them in the order listed by [`register_default_systems`]:
//! the HUD reads the health the damage system wrote in the same tick.

mod damage;
mod hud;

pub use damage::VillageDamageSystem;
pub use hud::HudSystem;

use besieged_ecs::World;

/// Add the game systems to `world` in their required order.
pub fn register_default_systems(world: &mut World) {
    let damage = VillageDamageSystem::new(world.registry());
    let hud = HudSystem::new(world.registry());
    world.add_system(damage);
    world.add_system(hud);
}

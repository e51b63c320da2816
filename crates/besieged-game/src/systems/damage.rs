use besieged_ecs::{Registry, StoreHandle, System, SystemError, SystemResult, TickContext};
use tracing::{info, warn};

use crate::components::{Health, PendingDamage, Village};

/// Applies queued damage to the village. Health stops at zero.
pub struct VillageDamageSystem {
    villages: StoreHandle<Village>,
    health: StoreHandle<Health>,
    damage: StoreHandle<PendingDamage>,
}

impl VillageDamageSystem {
    pub fn new(registry: &Registry) -> Self {
        Self {
            villages: registry.resolve(),
            health: registry.resolve(),
            damage: registry.resolve(),
        }
    }
}

impl System for VillageDamageSystem {
    fn name(&self) -> &str {
        "village_damage"
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> SystemResult {
        let villages = self.villages.read();
        let mut health = self.health.write();
        let mut damage = self.damage.write();
        let mut first_error = None;

        for &entity in ctx.entities() {
            if !villages.contains(entity) {
                continue;
            }
            let Some(PendingDamage(amount)) = damage.remove(entity) else {
                continue;
            };
            let Some(hp) = health.get_mut(entity) else {
                first_error.get_or_insert(SystemError::missing::<Health>(entity));
                continue;
            };
            match hp.take_damage(amount) {
                Ok(0) => info!(%entity, "Village has fallen"),
                Ok(remaining) => info!(%entity, amount, remaining, "Village took damage"),
                Err(err) => {
                    warn!(%entity, %err, "Rejected village damage");
                    first_error.get_or_insert(err.into());
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

use besieged_ecs::{Registry, StoreHandle, System, SystemResult, TickContext};

use crate::components::{Health, Money, Text, Village};
use crate::village::hud_text;

/// Keeps the village HUD text in sync with its health and balance.
pub struct HudSystem {
    villages: StoreHandle<Village>,
    health: StoreHandle<Health>,
    money: StoreHandle<Money>,
    text: StoreHandle<Text>,
}

impl HudSystem {
    pub fn new(registry: &Registry) -> Self {
        Self {
            villages: registry.resolve(),
            health: registry.resolve(),
            money: registry.resolve(),
            text: registry.resolve(),
        }
    }
}

impl System for HudSystem {
    fn name(&self) -> &str {
        "hud"
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> SystemResult {
        let villages = self.villages.read();
        let health = self.health.read();
        let money = self.money.read();
        let mut text = self.text.write();

        for &entity in ctx.entities() {
            if !villages.contains(entity) {
                continue;
            }
            let (Some(hp), Some(balance), Some(label)) =
                (health.get(entity), money.get(entity), text.get_mut(entity))
            else {
                continue;
            };
            label.text = hud_text(hp.health(), balance.amount());
        }
        Ok(())
    }
}

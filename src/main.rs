//! Besieged - headless game server
//!
//! Builds the world, places the starting cards, and drives the fixed-step
//! tick loop until the tick limit is reached or the village falls.

mod settings;

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use besieged_core::{GameTime, Vec2};
use besieged_ecs::{replication, Entity, SystemResult, TickContext, World};
use besieged_game::{
    create_card, register_default_systems, spawn_village, Health, Money, PendingDamage,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use settings::ServerSettings;

/// Server state
struct Server {
    world: World,
    game_time: GameTime,
    settings: ServerSettings,
    village: Entity,
}

impl Server {
    fn new(settings: ServerSettings) -> Result<Self> {
        settings
            .time
            .validate()
            .context("Invalid time configuration")?;

        let mut world = World::new();
        let village = spawn_village(&mut world, settings.village.health, settings.village.money)
            .context("Failed to spawn village")?;

        for (slot, card_type) in settings.card_layout.iter().enumerate() {
            let card = create_card(world.registry(), *card_type, Vec2::new(slot as f32, 0.0));
            world.directory_mut().add_replicated(card);
        }

        // Raids queue damage before the game systems apply it in the same tick.
        let interval = settings.simulation.raid_interval;
        let damage = settings.simulation.raid_damage;
        let mut since_raid = 0.0_f32;
        world.add_fn_system("raid", move |ctx: &mut TickContext<'_>| -> SystemResult {
            since_raid += ctx.elapsed();
            if since_raid < interval {
                return Ok(());
            }
            since_raid -= interval;
            if ctx.entities().contains(village) {
                ctx.registry()
                    .resolve::<PendingDamage>()
                    .write()
                    .insert(village, PendingDamage(damage));
            }
            Ok(())
        });
        register_default_systems(&mut world);

        Ok(Self {
            world,
            game_time: GameTime::new(settings.time.clone()),
            settings,
            village,
        })
    }

    fn village_health(&self) -> Option<Health> {
        self.world.entity(self.village).get::<Health>()
    }

    fn finished(&self) -> bool {
        let max_ticks = self.settings.simulation.max_ticks;
        let limit_reached = max_ticks > 0 && self.world.tick_count() >= max_ticks;
        let fallen = self.village_health().map_or(true, |h| h.is_dead());
        limit_reached || fallen
    }

    /// Feed one frame into the clock and run the ticks it makes due.
    fn frame(&mut self, raw_delta: f32) {
        self.game_time.update(raw_delta);
        let step = self.game_time.config.fixed_timestep;
        for _ in 0..self.game_time.fixed_steps() {
            let report = self.world.tick(step);
            if !report.is_ok() {
                warn!(
                    tick = report.tick,
                    failures = report.failures.len(),
                    "Tick finished with failures"
                );
            }
            if self.finished() {
                break;
            }
        }
    }

    fn run(&mut self) -> Result<()> {
        let frame_delta = 1.0 / self.settings.simulation.tick_rate_hz;
        info!(
            frame_delta,
            fixed_timestep = self.game_time.config.fixed_timestep,
            entities = self.world.entity_count(),
            "Starting tick loop"
        );

        while !self.finished() {
            self.frame(frame_delta);
            if self.settings.simulation.realtime {
                thread::sleep(Duration::from_secs_f32(frame_delta));
            }
        }

        let health = self.village_health().map_or(0, |h| h.health());
        let money = self
            .world
            .entity(self.village)
            .get::<Money>()
            .map_or(0, |m| m.amount());
        info!(
            ticks = self.world.tick_count(),
            seconds = self.game_time.total_time,
            health,
            money,
            "Simulation finished"
        );

        let records = replication::export_replicated::<Health>(self.world.directory());
        let payload =
            serde_json::to_string(&records).context("Failed to encode replicated state")?;
        debug!(records = records.len(), %payload, "Replicated health");
        Ok(())
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Starting Besieged server...");

    let settings = ServerSettings::load();
    if ServerSettings::settings_path().is_some_and(|path| !path.exists()) {
        if let Err(e) = settings.save() {
            warn!("Could not write default settings: {:#}", e);
        }
    }
    let mut server = Server::new(settings)?;
    server.run()
}

//! Server settings with persistence
//!
//! Settings are saved to `~/.config/besieged/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use besieged_core::TimeConfig;
use besieged_game::CardType;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Cards placed on the board at startup, left to right
    pub card_layout: Vec<CardType>,
    pub simulation: SimulationSettings,
    pub village: VillageSettings,
    pub time: TimeConfig,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            card_layout: vec![CardType::Ice, CardType::Fire, CardType::Bow],
            simulation: SimulationSettings::default(),
            village: VillageSettings::default(),
            time: TimeConfig::default(),
        }
    }
}

impl ServerSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("besieged"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from the config directory, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match Self::parse(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {:#}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Parse and validate settings from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let settings: Self = toml::from_str(content).context("invalid settings TOML")?;
        settings.time.validate().context("invalid time settings")?;
        anyhow::ensure!(
            settings.simulation.tick_rate_hz > 0.0,
            "tick_rate_hz must be positive"
        );
        Ok(settings)
    }

    /// Save settings to the config directory
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&dir.join("settings.toml"))
    }

    /// Save settings to `path`, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Tick loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Frames fed into the clock per second
    pub tick_rate_hz: f32,
    /// Stop after this many ticks (0 = run until the village falls)
    pub max_ticks: u64,
    /// Sleep between frames instead of running as fast as possible
    pub realtime: bool,
    /// Seconds between raids on the village
    pub raid_interval: f32,
    /// Damage dealt by each raid
    pub raid_damage: i32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_rate_hz: 30.0,
            max_ticks: 600,
            realtime: false,
            raid_interval: 2.0,
            raid_damage: 5,
        }
    }
}

/// Starting state of the village
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VillageSettings {
    pub health: i32,
    pub money: i32,
}

impl Default for VillageSettings {
    fn default() -> Self {
        Self {
            health: 100,
            money: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = ServerSettings::parse(
            r#"
            card_layout = ["ice", "lightning"]

            [village]
            health = 40
            "#,
        )
        .unwrap();
        assert_eq!(settings.village.health, 40);
        assert_eq!(settings.village.money, 500);
        assert_eq!(settings.simulation.max_ticks, 600);
        assert_eq!(settings.card_layout, vec![CardType::Ice, CardType::Lightning]);
    }

    #[test]
    fn invalid_timestep_is_rejected() {
        let err = ServerSettings::parse("[time]\nfixed_timestep = 0.0\n").unwrap_err();
        assert!(format!("{err:#}").contains("fixed timestep"));
    }

    #[test]
    fn round_trip_through_file() {
        let dir = std::env::temp_dir().join(format!("besieged-settings-{}", std::process::id()));
        let path = dir.join("settings.toml");

        let mut settings = ServerSettings::default();
        settings.simulation.max_ticks = 42;
        settings.card_layout = vec![CardType::Bow];
        settings.save_to(&path).unwrap();

        let loaded = ServerSettings::load_from(&path);
        assert_eq!(loaded.simulation.max_ticks, 42);
        assert_eq!(loaded.card_layout, vec![CardType::Bow]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_gives_defaults() {
        let loaded = ServerSettings::load_from(Path::new("/nonexistent/besieged/settings.toml"));
        assert_eq!(loaded.village.health, 100);
    }
}

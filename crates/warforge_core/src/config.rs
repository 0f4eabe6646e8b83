//! Configuration for generation, narrative, enhancement and overrides.
//!
//! Every section has defaults, so an empty `config.toml` is valid.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [generation]
//! width = 96
//! height = 64
//! primary_biome = "desert"
//!
//! [narrative]
//! faction_count = 5
//! enhance = false
//!
//! [overrides]
//! spawn_cap = 25
//!
//! [overrides.cooldowns_ms]
//! spawn_entity = 2000
//! ```

use crate::entity::EntityOptions;
use crate::narrative::NarrativeOptions;
use crate::world::WorldOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use warforge_data::{Biome, OverrideKind};

/// Map dimensions and population knobs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    pub width: u32,
    pub height: u32,
    pub primary_biome: Option<Biome>,
    pub density: f64,
    pub hostile_ratio: f64,
    pub vehicle_ratio: f64,
    pub difficulty: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            primary_biome: None,
            density: 0.5,
            hostile_ratio: 0.3,
            vehicle_ratio: 0.1,
            difficulty: 0.5,
        }
    }
}

impl GenerationConfig {
    pub fn world_options(&self) -> WorldOptions {
        WorldOptions {
            width: self.width,
            height: self.height,
            primary_biome: self.primary_biome,
            density: self.density,
            difficulty: self.difficulty,
        }
    }

    pub fn entity_options(&self) -> EntityOptions {
        EntityOptions {
            density: self.density,
            hostile_ratio: self.hostile_ratio,
            vehicle_ratio: self.vehicle_ratio,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NarrativeConfig {
    pub faction_count: usize,
    pub mission_count: usize,
    pub timeline_events: usize,
    /// Ask the enhancer to rewrite mission briefings.
    pub enhance: bool,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            faction_count: 4,
            mission_count: 3,
            timeline_events: 10,
            enhance: false,
        }
    }
}

impl NarrativeConfig {
    pub fn options(&self, difficulty: f64) -> NarrativeOptions {
        NarrativeOptions {
            faction_count: self.faction_count,
            mission_count: self.mission_count,
            timeline_events: self.timeline_events,
            difficulty,
        }
    }
}

/// Chat-completions endpoint used for briefing enhancement.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EnhancerConfig {
    pub api_url: String,
    pub model: String,
    pub timeout_ms: u64,
    pub max_tokens: u32,
    /// Name of the environment variable holding the API key. The key itself
    /// never lives in the config file.
    pub api_key_env: String,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_ms: 8000,
            max_tokens: 500,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl EnhancerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Per-call caps and per-kind cooldowns for runtime overrides.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OverridesConfig {
    /// Keyed by override kind, e.g. `spawn_entity`. Kinds not listed have no cooldown.
    pub cooldowns_ms: BTreeMap<String, u64>,
    pub spawn_cap: u32,
    pub removal_cap: usize,
    pub max_amount: u32,
    pub max_coordinate: i64,
    pub aggression_bound: f64,
}

impl Default for OverridesConfig {
    fn default() -> Self {
        let cooldowns_ms = [
            (OverrideKind::SpawnEntity, 1000),
            (OverrideKind::RemoveEntity, 500),
            (OverrideKind::MoveEntity, 100),
            (OverrideKind::SetAggression, 500),
            (OverrideKind::Damage, 100),
            (OverrideKind::Heal, 100),
        ]
        .into_iter()
        .map(|(kind, ms)| (kind.to_string(), ms))
        .collect();

        Self {
            cooldowns_ms,
            spawn_cap: 50,
            removal_cap: 100,
            max_amount: 1000,
            max_coordinate: 1000,
            aggression_bound: 1.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds advanced per tick when the caller does not say otherwise.
    pub tick_dt: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { tick_dt: 1.0 }
    }
}

/// Top-level configuration, one field per `config.toml` section.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub generation: GenerationConfig,
    pub narrative: NarrativeConfig,
    pub enhancer: EnhancerConfig,
    pub overrides: OverridesConfig,
    pub simulation: SimulationConfig,
}

fn unit_range(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

impl AppConfig {
    /// Returns the first violated bound.
    pub fn validate(&self) -> anyhow::Result<()> {
        let generation = &self.generation;
        anyhow::ensure!(generation.width >= 8, "Map width too small (min 8)");
        anyhow::ensure!(generation.width <= 512, "Map width too large (max 512)");
        anyhow::ensure!(generation.height >= 8, "Map height too small (min 8)");
        anyhow::ensure!(generation.height <= 512, "Map height too large (max 512)");
        anyhow::ensure!(unit_range(generation.density), "Density must be in [0.0, 1.0]");
        anyhow::ensure!(
            unit_range(generation.hostile_ratio),
            "Hostile ratio must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            unit_range(generation.vehicle_ratio),
            "Vehicle ratio must be in [0.0, 1.0]"
        );
        anyhow::ensure!(unit_range(generation.difficulty), "Difficulty must be in [0.0, 1.0]");

        let narrative = &self.narrative;
        anyhow::ensure!(
            (1..=6).contains(&narrative.faction_count),
            "Faction count must be between 1 and 6"
        );
        anyhow::ensure!(narrative.mission_count <= 20, "Too many missions (max 20)");
        anyhow::ensure!(
            narrative.timeline_events <= 100,
            "Too many timeline events (max 100)"
        );

        anyhow::ensure!(
            self.enhancer.timeout_ms > 0,
            "Enhancer timeout must be positive"
        );
        anyhow::ensure!(
            self.enhancer.timeout_ms <= 60_000,
            "Enhancer timeout too long (max 60000 ms)"
        );
        anyhow::ensure!(
            !self.enhancer.api_key_env.is_empty(),
            "Enhancer api_key_env must name an environment variable"
        );

        let overrides = &self.overrides;
        for kind in overrides.cooldowns_ms.keys() {
            anyhow::ensure!(
                kind.parse::<OverrideKind>().is_ok(),
                "Unknown override kind in cooldowns: {kind}"
            );
        }
        anyhow::ensure!(overrides.spawn_cap > 0, "Spawn cap must be positive");
        anyhow::ensure!(overrides.removal_cap > 0, "Removal cap must be positive");
        anyhow::ensure!(
            overrides.max_coordinate > 0,
            "Coordinate bound must be positive"
        );
        anyhow::ensure!(
            overrides.aggression_bound > 0.0 && overrides.aggression_bound <= 1.0,
            "Aggression bound must be in (0.0, 1.0]"
        );

        anyhow::ensure!(
            self.simulation.tick_dt > 0.0,
            "Tick delta must be positive"
        );

        Ok(())
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Digest of the sections that affect generated or simulated state.
    ///
    /// Enhancer settings are excluded; they only change flavor text.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.generation).as_bytes());
        hasher.update(format!("{:?}", self.narrative).as_bytes());
        hasher.update(format!("{:?}", self.overrides).as_bytes());
        hasher.update(format!("{:?}", self.simulation).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            "[generation]\nwidth = 96\nprimary_biome = \"desert\"\n\n[overrides.cooldowns_ms]\nspawn_entity = 2000\n",
        )
        .unwrap();
        assert_eq!(config.generation.width, 96);
        assert_eq!(config.generation.height, 64);
        assert_eq!(config.generation.primary_biome, Some(Biome::Desert));
        assert_eq!(config.overrides.cooldowns_ms.get("spawn_entity"), Some(&2000));
        assert_eq!(config.overrides.spawn_cap, 50);
    }

    #[test]
    fn test_invalid_width() {
        let config = AppConfig {
            generation: GenerationConfig {
                width: 4,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_density() {
        let config = AppConfig {
            generation: GenerationConfig {
                density: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_cooldown_kind() {
        let result = AppConfig::from_toml("[overrides.cooldowns_ms]\nteleport = 10\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_faction_count_bounds() {
        let config = AppConfig {
            narrative: NarrativeConfig {
                faction_count: 7,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fingerprint_ignores_enhancer() {
        let base = AppConfig::default();
        let mut other = AppConfig::default();
        other.enhancer.model = "another-model".to_string();
        assert_eq!(base.fingerprint(), other.fingerprint());

        other.generation.density = 0.9;
        assert_ne!(base.fingerprint(), other.fingerprint());
    }
}

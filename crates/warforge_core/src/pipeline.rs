//! One-shot generation: world, then entities, then narrative.
//!
//! Each stage after the world draws from its own fork of the request seed,
//! so changing how many numbers the world consumes never shifts the roster
//! or the story.

use crate::checksum::result_checksum;
use crate::config::AppConfig;
use crate::entity::{generate_entities, summarize_entities, EntityOptions, EntitySummary};
use crate::error::{EngineError, Result};
use crate::narrative::{
    enhance_with_fallback, generate_narrative, summarize_narrative, NarrativeEnhancer,
    NarrativeOptions, NarrativeSummary,
};
use crate::rng::SeededRng;
use crate::world::{generate_world, summarize_world, WorldOptions, WorldSummary};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use warforge_data::{Biome, Entity, Narrative, World};

const MIN_DIMENSION: u32 = 8;
const MAX_DIMENSION: u32 = 512;
const MAX_FACTIONS: usize = 6;
const MAX_MISSIONS: usize = 20;
const MAX_TIMELINE_EVENTS: usize = 100;
const RANDOM_SEED_MAX: u64 = 2_147_483_647;

/// A seed as supplied by a caller: a number or arbitrary text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Number(u64),
    Text(String),
}

impl Seed {
    /// Fresh seed for requests that did not supply one.
    pub fn random() -> Self {
        Seed::Number(rand::thread_rng().gen_range(1..RANDOM_SEED_MAX))
    }

    /// Numeric text seeds behave exactly like the number.
    pub fn rng(&self) -> SeededRng {
        match self {
            Seed::Number(n) => SeededRng::new(*n),
            Seed::Text(text) => match text.trim().parse::<u64>() {
                Ok(n) => SeededRng::new(n),
                Err(_) => SeededRng::from_text(text),
            },
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Number(n) => write!(f, "{n}"),
            Seed::Text(text) => f.write_str(text),
        }
    }
}

impl From<u64> for Seed {
    fn from(n: u64) -> Self {
        Seed::Number(n)
    }
}

impl From<&str> for Seed {
    fn from(text: &str) -> Self {
        Seed::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    /// Drawn at random when absent.
    pub seed: Option<Seed>,
    pub width: u32,
    pub height: u32,
    pub primary_biome: Option<Biome>,
    pub density: f64,
    pub hostile_ratio: f64,
    pub vehicle_ratio: f64,
    pub difficulty: f64,
    pub faction_count: usize,
    pub mission_count: usize,
    pub timeline_events: usize,
    /// Ask the narrative enhancer for mission briefings.
    pub enhance: bool,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl GenerationRequest {
    pub fn from_config(config: &AppConfig) -> Self {
        let generation = &config.generation;
        let narrative = &config.narrative;
        Self {
            seed: None,
            width: generation.width,
            height: generation.height,
            primary_biome: generation.primary_biome,
            density: generation.density,
            hostile_ratio: generation.hostile_ratio,
            vehicle_ratio: generation.vehicle_ratio,
            difficulty: generation.difficulty,
            faction_count: narrative.faction_count,
            mission_count: narrative.mission_count,
            timeline_events: narrative.timeline_events,
            enhance: narrative.enhance,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
                return Err(EngineError::invalid_request(format!(
                    "{name} must be between {MIN_DIMENSION} and {MAX_DIMENSION} (got {value})"
                )));
            }
        }
        for (name, value) in [
            ("density", self.density),
            ("hostile_ratio", self.hostile_ratio),
            ("vehicle_ratio", self.vehicle_ratio),
            ("difficulty", self.difficulty),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::invalid_request(format!(
                    "{name} must be between 0 and 1 (got {value})"
                )));
            }
        }
        if !(1..=MAX_FACTIONS).contains(&self.faction_count) {
            return Err(EngineError::invalid_request(format!(
                "faction_count must be between 1 and {MAX_FACTIONS} (got {})",
                self.faction_count
            )));
        }
        for (name, value, max) in [
            ("mission_count", self.mission_count, MAX_MISSIONS),
            ("timeline_events", self.timeline_events, MAX_TIMELINE_EVENTS),
        ] {
            if value > max {
                return Err(EngineError::invalid_request(format!(
                    "{name} must be at most {max} (got {value})"
                )));
            }
        }
        Ok(())
    }

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

    pub fn narrative_options(&self) -> NarrativeOptions {
        NarrativeOptions {
            faction_count: self.faction_count,
            mission_count: self.mission_count,
            timeline_events: self.timeline_events,
            difficulty: self.difficulty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub seed: String,
    pub seed_hex: String,
    /// RFC 3339 wall-clock time; not part of the checksum.
    pub generated_at: String,
    pub generation_time_ms: u64,
    pub tile_count: usize,
    pub entity_count: usize,
    pub poi_count: usize,
    pub checksum: String,
    pub enhanced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub world: World,
    pub entities: Vec<Entity>,
    pub narrative: Narrative,
    pub metadata: GenerationMetadata,
}

/// Run every stage to completion or fail as a whole.
pub fn generate(request: &GenerationRequest) -> Result<GenerationResult> {
    request.validate()?;
    let start = Instant::now();
    let seed = request.seed.clone().unwrap_or_else(Seed::random);
    let mut rng = seed.rng();

    let world = generate_world(&mut rng, &request.world_options())?;
    let entities = generate_entities(&mut rng.fork("entities"), &world, &request.entity_options());
    let narrative = generate_narrative(
        &mut rng.fork("narrative"),
        &world,
        &request.narrative_options(),
    );

    let checksum = result_checksum(&world, &entities, &narrative)?;
    let elapsed = start.elapsed();
    let metadata = GenerationMetadata {
        seed: seed.to_string(),
        seed_hex: rng.seed_hex(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        generation_time_ms: elapsed.as_millis() as u64,
        tile_count: world.tile_count(),
        entity_count: entities.len(),
        poi_count: world.pois.len(),
        checksum,
        enhanced: false,
    };

    tracing::info!(
        seed = %metadata.seed,
        tiles = metadata.tile_count,
        entities = metadata.entity_count,
        pois = metadata.poi_count,
        duration_ms = metadata.generation_time_ms,
        "Generation finished"
    );

    Ok(GenerationResult {
        world,
        entities,
        narrative,
        metadata,
    })
}

/// [`generate`], then let `enhancer` rewrite briefings when the request asks.
///
/// The enhancer never fails the generation: on error or timeout the
/// procedural briefings stand and `metadata.enhanced` stays false.
pub async fn generate_with_enhancer(
    request: &GenerationRequest,
    enhancer: &dyn NarrativeEnhancer,
    timeout: Duration,
) -> Result<GenerationResult> {
    let mut result = generate(request)?;
    if request.enhance {
        result.metadata.enhanced =
            enhance_with_fallback(enhancer, &mut result.narrative, &result.world, timeout).await;
    }
    Ok(result)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub world: WorldSummary,
    pub entities: EntitySummary,
    pub narrative: NarrativeSummary,
    pub metadata: GenerationMetadata,
}

pub fn summarize(result: &GenerationResult) -> GenerationSummary {
    GenerationSummary {
        world: summarize_world(&result.world),
        entities: summarize_entities(&result.entities),
        narrative: summarize_narrative(&result.narrative),
        metadata: result.metadata.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::{BriefingRequest, DisabledEnhancer};
    use async_trait::async_trait;

    fn small(seed: impl Into<Seed>) -> GenerationRequest {
        GenerationRequest {
            width: 32,
            height: 32,
            ..GenerationRequest::default()
        }
        .with_seed(seed)
    }

    #[test]
    fn test_same_seed_same_checksum() {
        let a = generate(&small(77)).unwrap();
        let b = generate(&small(77)).unwrap();
        assert_eq!(a.metadata.checksum, b.metadata.checksum);
        assert_eq!(a.world.checksum, b.world.checksum);
        assert_eq!(a.entities, b.entities);
        assert_eq!(a.narrative, b.narrative);

        let c = generate(&small(78)).unwrap();
        assert_ne!(a.metadata.checksum, c.metadata.checksum);
    }

    #[test]
    fn test_text_seeds() {
        assert_eq!(Seed::from("42").rng(), SeededRng::new(42));
        let a = generate(&small("alpha")).unwrap();
        let b = generate(&small("alpha")).unwrap();
        let c = generate(&small("beta")).unwrap();
        assert_eq!(a.metadata.checksum, b.metadata.checksum);
        assert_ne!(a.metadata.checksum, c.metadata.checksum);
        assert_eq!(a.metadata.seed, "alpha");
    }

    #[test]
    fn test_seed_deserializes_untagged() {
        let n: Seed = serde_json::from_str("12").unwrap();
        let t: Seed = serde_json::from_str("\"dune\"").unwrap();
        assert_eq!(n, Seed::Number(12));
        assert_eq!(t, Seed::Text("dune".into()));
    }

    #[test]
    fn test_missing_seed_is_drawn() {
        let result = generate(&GenerationRequest {
            width: 16,
            height: 16,
            ..GenerationRequest::default()
        })
        .unwrap();
        assert!(!result.metadata.seed.is_empty());
    }

    #[test]
    fn test_metadata_counts() {
        let result = generate(&small(9)).unwrap();
        let meta = &result.metadata;
        assert_eq!(meta.tile_count, 32 * 32);
        assert_eq!(meta.entity_count, result.entities.len());
        assert_eq!(meta.poi_count, result.world.pois.len());
        assert_eq!(meta.checksum.len(), 96);
        assert!(chrono::DateTime::parse_from_rfc3339(&meta.generated_at).is_ok());
        assert!(!meta.enhanced);
    }

    #[test]
    fn test_invalid_requests_rejected() {
        let narrow = GenerationRequest {
            width: 2,
            ..small(1)
        };
        assert!(matches!(generate(&narrow), Err(EngineError::InvalidRequest(_))));

        let dense = GenerationRequest {
            density: 1.5,
            ..small(1)
        };
        let err = generate(&dense).unwrap_err();
        assert!(err.to_string().contains("density"));

        let crowded = GenerationRequest {
            faction_count: 7,
            ..small(1)
        };
        assert!(generate(&crowded).is_err());

        let endless = GenerationRequest {
            mission_count: usize::MAX,
            ..small(1)
        };
        let err = generate(&endless).unwrap_err();
        assert!(err.to_string().contains("mission_count"));

        let history = GenerationRequest {
            timeline_events: 101,
            ..small(1)
        };
        assert!(matches!(generate(&history), Err(EngineError::InvalidRequest(_))));

        let at_limit = GenerationRequest {
            mission_count: 20,
            timeline_events: 100,
            ..small(1)
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_summary_matches_result() {
        let result = generate(&small(5)).unwrap();
        let summary = summarize(&result);
        assert_eq!(summary.world.tile_count, 1024);
        assert_eq!(summary.entities.total, result.entities.len());
        assert_eq!(summary.narrative.faction_count, result.narrative.factions.len());
    }

    struct Canned;

    #[async_trait]
    impl NarrativeEnhancer for Canned {
        async fn briefings(&self, request: &BriefingRequest) -> Result<Vec<String>> {
            Ok(request.missions.iter().map(|(name, _)| format!("Brief: {name}")).collect())
        }
    }

    #[tokio::test]
    async fn test_enhancer_is_additive() {
        let request = GenerationRequest {
            enhance: true,
            ..small(31)
        };
        let plain = generate(&request).unwrap();
        let enhanced = generate_with_enhancer(&request, &Canned, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(plain.metadata.checksum, enhanced.metadata.checksum);
        if !enhanced.narrative.missions.is_empty() {
            assert!(enhanced.metadata.enhanced);
            assert!(enhanced.narrative.missions[0].description.starts_with("Brief: "));
        }

        let fallback = generate_with_enhancer(&request, &DisabledEnhancer, Duration::from_secs(1))
            .await
            .unwrap();
        assert!(!fallback.metadata.enhanced);
        assert_eq!(fallback.narrative, plain.narrative);
    }
}

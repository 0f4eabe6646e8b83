use crate::model::behavior::{tick_all, CombatEvent};
use crate::model::checksum::state_checksum;
use crate::model::config::AppConfig;
use crate::model::metrics::Metrics;
use crate::model::narrative::{active_conflicts, global_tension, recent_events, NarrativeEnhancer};
use crate::model::overrides::{self, OverrideContext, OverrideLimits, OverrideResult, StateView};
use crate::model::pipeline::{self, GenerationMetadata, GenerationRequest, GenerationResult, Seed};
use crate::model::rng::SeededRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use uuid::Uuid;
use warforge_data::{Changeset, Entity, Narrative, NarrativePatch, World, WorldPatch};

/// What one call to [`Simulation::tick`] did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSummary {
    pub tick: u64,
    pub clock_ms: u64,
    /// Entities whose patch changed at least one field.
    pub changed: usize,
    pub combat_events: Vec<CombatEvent>,
}

/// A live scenario: generated state plus everything needed to mutate it.
///
/// The session is the only writer of its state. Tick patches and override
/// changesets are computed read-only by the core and merged here in one pass.
pub struct Simulation {
    /// Session identity, distinct for every simulation even on the same seed.
    pub id: Uuid,
    pub world: World,
    pub entities: Vec<Entity>,
    pub narrative: Narrative,
    /// Metadata of the generation this session started from.
    pub metadata: GenerationMetadata,
    pub metrics: Metrics,
    pub config: AppConfig,
    rng: SeededRng,
    ctx: OverrideContext,
    clock_ms: u64,
    tick: u64,
}

impl Simulation {
    /// Generate a fresh scenario for `request`.
    pub fn generate(config: AppConfig, request: &GenerationRequest) -> anyhow::Result<Self> {
        let start = Instant::now();
        let result = pipeline::generate(request)?;
        let sim = Self::from_result(config, result);
        sim.metrics
            .record_generation(start.elapsed(), sim.entities.len(), sim.world.pois.len());
        Ok(sim)
    }

    /// Generate, letting `enhancer` rewrite briefings when the request asks.
    pub async fn generate_enhanced(
        config: AppConfig,
        request: &GenerationRequest,
        enhancer: &dyn NarrativeEnhancer,
    ) -> anyhow::Result<Self> {
        let start = Instant::now();
        let timeout = config.enhancer.timeout();
        let result = pipeline::generate_with_enhancer(request, enhancer, timeout).await?;
        let fell_back = request.enhance && !result.metadata.enhanced;
        let sim = Self::from_result(config, result);
        if fell_back {
            sim.metrics.record_enhancer_fallback();
        }
        sim.metrics
            .record_generation(start.elapsed(), sim.entities.len(), sim.world.pois.len());
        Ok(sim)
    }

    /// Take ownership of an existing generation result.
    pub fn from_result(config: AppConfig, result: GenerationResult) -> Self {
        let GenerationResult {
            world,
            entities,
            narrative,
            metadata,
        } = result;
        let rng = Seed::Text(metadata.seed.clone()).rng().fork("overrides");
        let ctx = OverrideContext::for_roster(OverrideLimits::from(&config.overrides), &entities);

        let id = Uuid::new_v4();
        tracing::info!(session = %id, seed = %metadata.seed, "Simulation started");

        Self {
            id,
            world,
            entities,
            narrative,
            metadata,
            metrics: Metrics::new(),
            config,
            rng,
            ctx,
            clock_ms: 0,
            tick: 0,
        }
    }

    /// Current state packaged as a generation result.
    pub fn snapshot(&self) -> GenerationResult {
        GenerationResult {
            world: self.world.clone(),
            entities: self.entities.clone(),
            narrative: self.narrative.clone(),
            metadata: self.metadata.clone(),
        }
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn living(&self) -> usize {
        self.entities.iter().filter(|e| e.alive).count()
    }

    /// Advance every living entity by `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> anyhow::Result<TickSummary> {
        anyhow::ensure!(dt.is_finite() && dt > 0.0, "tick delta must be positive (got {dt})");
        let start = Instant::now();

        let report = tick_all(&self.entities, dt);
        let index = self.index();
        let mut changed = 0;
        for update in report.updates {
            let Some(&i) = index.get(&update.id) else {
                continue;
            };
            if !update.patch.is_empty() {
                changed += 1;
            }
            let entity = &mut self.entities[i];
            update.patch.apply_to(entity);
            entity.behavior.rng = update.rng;
        }

        self.tick += 1;
        self.clock_ms = self.clock_ms.saturating_add((dt * 1000.0).round() as u64);
        self.narrative.current_time = (self.clock_ms / 60_000) as u32;
        self.metrics
            .record_tick(start.elapsed(), self.living(), report.combat_events.len());

        Ok(TickSummary {
            tick: self.tick,
            clock_ms: self.clock_ms,
            changed,
            combat_events: report.combat_events,
        })
    }

    /// Parse, validate and apply a free-text command at the current clock.
    ///
    /// `None` when the text is not a command. Accepted changesets are merged
    /// before returning.
    pub fn submit_command(&mut self, text: &str, issuer: &str) -> Option<OverrideResult> {
        let state = StateView {
            world: &self.world,
            entities: &self.entities,
            narrative: &self.narrative,
        };
        let result = overrides::submit(
            text,
            issuer,
            self.clock_ms,
            &state,
            &mut self.rng,
            &mut self.ctx,
        )?;

        let kind = result.record.kind();
        if result.success {
            self.metrics.record_override_applied(kind);
            self.merge_changeset(&result.changeset);
        } else {
            let reason = result.error.as_deref().unwrap_or("rejected");
            self.metrics.record_override_rejected(kind, reason);
        }
        Some(result)
    }

    /// Merge `changeset` into the live state.
    pub fn merge_changeset(&mut self, changeset: &Changeset) {
        if !changeset.entities_removed.is_empty() {
            let removed: HashSet<&str> =
                changeset.entities_removed.iter().map(String::as_str).collect();
            self.entities.retain(|e| !removed.contains(e.id.as_str()));
        }

        self.entities.extend(changeset.entities_added.iter().cloned());

        if !changeset.entities_modified.is_empty() {
            let index = self.index();
            for update in &changeset.entities_modified {
                if let Some(&i) = index.get(&update.id) {
                    update.patch.apply_to(&mut self.entities[i]);
                }
            }
        }

        if let Some(patch) = &changeset.world {
            self.merge_world(patch);
        }
        if let Some(patch) = &changeset.narrative {
            self.merge_narrative(patch);
        }
    }

    fn merge_world(&mut self, patch: &WorldPatch) {
        if let Some(weather) = &patch.weather {
            self.world.weather = weather.clone();
        }
        if let Some(time) = patch.time_of_day {
            self.world.time_of_day = time;
        }
        if let Some(biome) = patch.primary_biome {
            self.world.primary_biome = biome;
        }
        self.world.pois.extend(patch.pois_added.iter().cloned());
    }

    fn merge_narrative(&mut self, patch: &NarrativePatch) {
        let narrative = &mut self.narrative;

        for added in &patch.objectives_added {
            if let Some(mission) = narrative.missions.iter_mut().find(|m| m.id == added.mission_id) {
                mission.objectives.push(added.objective.clone());
            }
        }

        for id in &patch.objectives_completed {
            narrative
                .missions
                .iter_mut()
                .flat_map(|m| m.objectives.iter_mut())
                .filter(|o| &o.id == id)
                .for_each(|o| o.mark_completed());
        }

        if !patch.events_added.is_empty() {
            narrative.timeline.extend(patch.events_added.iter().cloned());
            // Stable, so same-time events keep their arrival order.
            narrative.timeline.sort_by_key(|e| e.time);
            narrative.global_tension = global_tension(&narrative.factions, &narrative.timeline);
            narrative.active_conflicts = active_conflicts(&narrative.factions);
            narrative.recent_events = recent_events(&narrative.timeline);
        }
    }

    /// Short digest of the live state at the current clock.
    pub fn checksum(&self) -> anyhow::Result<String> {
        Ok(state_checksum(
            &self.world,
            &self.entities,
            &self.narrative,
            self.clock_ms,
        )?)
    }

    fn index(&self) -> HashMap<String, usize> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect()
    }
}

//! Entity roster generation.
//!
//! Every spawn point yields one entity, then every POI is populated in
//! proportion to its population and the requested density. Each entity gets
//! a private behavior stream forked from the roster stream, so its later
//! ticks are independent of every other entity.

pub mod archetype;

use crate::rng::SeededRng;
use archetype::archetype;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use warforge_data::{
    BehaviorKind, BehaviorState, Entity, EntityKind, EntityStats, Poi, PoiType, Vec2, Vec3, World,
};

const PATROL_POINTS: usize = 5;
const PATROL_STEP: i64 = 3;
const BASE_STAMINA: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityOptions {
    /// Fraction of each POI's population that is instantiated.
    pub density: f64,
    /// Chance that an unclaimed POI is held by `hostile`.
    pub hostile_ratio: f64,
    /// Chance that a POI occupant is a ground vehicle.
    pub vehicle_ratio: f64,
}

impl Default for EntityOptions {
    fn default() -> Self {
        Self {
            density: 0.5,
            hostile_ratio: 0.3,
            vehicle_ratio: 0.1,
        }
    }
}

/// Id of the `seq`-th entity created in a simulation run.
pub fn entity_id(seq: u64) -> String {
    format!("entity_{seq:05}")
}

/// Parse the sequence number back out of an [`entity_id`].
pub fn entity_seq(id: &str) -> Option<u64> {
    id.strip_prefix("entity_")?.parse().ok()
}

/// Where and what to instantiate.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSpec<'a> {
    pub faction: &'a str,
    pub kind: EntityKind,
    pub x: i64,
    pub y: i64,
}

fn jitter(rng: &mut SeededRng, base: f64, spread: f64) -> f64 {
    base + rng.next_float(-spread, spread)
}

fn patrol_route(rng: &mut SeededRng, x: i64, y: i64) -> Vec<Vec2> {
    let mut route = Vec::with_capacity(PATROL_POINTS);
    let (mut px, mut py) = (x, y);
    route.push(Vec2::new(px as f64, py as f64));
    for _ in 1..PATROL_POINTS {
        px += rng.next_int(-PATROL_STEP, PATROL_STEP);
        py += rng.next_int(-PATROL_STEP, PATROL_STEP);
        route.push(Vec2::new(px as f64, py as f64));
    }
    route
}

/// Instantiate one entity from its archetype.
///
/// Accuracy, stealth, perception, morale and armor are clamped to `[0, 1]`;
/// health and stamina are left as administrative values.
pub fn generate_entity(rng: &mut SeededRng, spec: &SpawnSpec<'_>, id: String, spawned_at: u64) -> Entity {
    let arch = archetype(spec.kind);

    let stats = EntityStats {
        health: arch.max_health,
        max_health: arch.max_health,
        stamina: BASE_STAMINA,
        morale: rng.next_float(0.5, 1.0).clamp(0.0, 1.0),
        accuracy: jitter(rng, arch.accuracy, 0.1).clamp(0.0, 1.0),
        stealth: jitter(rng, arch.stealth, 0.1).clamp(0.0, 1.0),
        perception: jitter(rng, arch.perception, 0.1).clamp(0.0, 1.0),
        speed: jitter(rng, arch.speed, 0.5).max(0.0),
        armor: arch.armor.clamp(0.0, 1.0),
    };

    let loadout = rng
        .pick(arch.loadouts)
        .map(|t| t.build())
        .unwrap_or_default();

    let behavior_rng = rng.fork(&format!("behavior_{}_{}_{id}", spec.x, spec.y));
    let current = rng.pick(arch.behaviors).copied().unwrap_or(BehaviorKind::Idle);
    let mut behavior = BehaviorState {
        current,
        target: None,
        destination: None,
        patrol_route: Vec::new(),
        patrol_index: 0,
        alert_level: rng.next_float(0.0, 0.3),
        rng: behavior_rng.cursor(),
    };
    match current {
        BehaviorKind::Patrol => behavior.patrol_route = patrol_route(rng, spec.x, spec.y),
        BehaviorKind::Guard => behavior.destination = Some(Vec2::new(spec.x as f64, spec.y as f64)),
        _ => {}
    }

    let callsign = rng
        .pick(archetype::callsigns(spec.faction))
        .copied()
        .unwrap_or("Unit");
    let name = format!("{callsign}-{}", rng.next_int(1, 99));

    Entity {
        id,
        kind: spec.kind,
        name,
        faction: spec.faction.to_string(),
        position: Vec3::new(spec.x as f64, spec.y as f64, 0.0),
        rotation: rng.next_float(0.0, 360.0),
        stats,
        loadout,
        behavior,
        alive: true,
        spawned_at,
    }
}

fn kind_for_poi(rng: &mut SeededRng, poi: &Poi, faction: &str) -> EntityKind {
    use EntityKind::*;
    let pool: &[EntityKind] = match faction {
        "neutral" => &[Civilian, Civilian, Civilian, Vip],
        "hostile" => &[Hostile, Hostile, Scout, Sniper],
        _ => match poi.kind {
            PoiType::Base => &[Infantry, Infantry, Officer, Medic, Engineer, Heavy],
            PoiType::Outpost => &[Scout, Infantry, Sniper],
            PoiType::Checkpoint => &[Infantry, Infantry, Officer],
            PoiType::Depot => &[Infantry, Engineer, Civilian],
            PoiType::Hospital => &[Medic, Medic, Civilian],
            PoiType::Factory => &[Engineer, Civilian, Infantry],
            _ => &[Infantry, Scout],
        },
    };
    rng.pick(pool).copied().unwrap_or(Infantry)
}

/// Populate `world`. Ids run `entity_00000`, `entity_00001`, ... in creation order.
pub fn generate_entities(rng: &mut SeededRng, world: &World, options: &EntityOptions) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut seq: u64 = 0;
    let mut alloc = || {
        let id = entity_id(seq);
        seq += 1;
        id
    };

    for spawn in &world.spawn_points {
        let spec = SpawnSpec {
            faction: &spawn.faction,
            kind: spawn.kind,
            x: spawn.x as i64,
            y: spawn.y as i64,
        };
        entities.push(generate_entity(rng, &spec, alloc(), 0));
    }

    for poi in &world.pois {
        let population = (poi.population as f64 * options.density).floor().max(0.0) as usize;
        let faction = match &poi.faction {
            Some(f) => f.clone(),
            None if rng.next_bool(options.hostile_ratio) => "hostile".to_string(),
            None => rng
                .pick(&["alpha", "bravo", "neutral"])
                .copied()
                .unwrap_or("neutral")
                .to_string(),
        };

        for _ in 0..population {
            let kind = if rng.next_bool(options.vehicle_ratio) {
                rng.pick(&[EntityKind::VehicleLight, EntityKind::VehicleHeavy])
                    .copied()
                    .unwrap_or(EntityKind::VehicleLight)
            } else {
                kind_for_poi(rng, poi, &faction)
            };
            let radius = poi.radius as i64;
            let x = poi.x as i64 + rng.next_int(-radius, radius);
            let y = poi.y as i64 + rng.next_int(-radius, radius);

            let spec = SpawnSpec {
                faction: &faction,
                kind,
                x,
                y,
            };
            entities.push(generate_entity(rng, &spec, alloc(), 0));
        }
    }

    tracing::debug!(entities = entities.len(), "Entities generated");
    entities
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub total: usize,
    pub by_faction: BTreeMap<String, usize>,
    pub by_type: BTreeMap<EntityKind, usize>,
    pub alive: usize,
    /// Alive, above half health and with stamina to spare.
    pub combat_ready: usize,
}

pub fn summarize_entities(entities: &[Entity]) -> EntitySummary {
    let mut summary = EntitySummary {
        total: entities.len(),
        by_faction: BTreeMap::new(),
        by_type: BTreeMap::new(),
        alive: 0,
        combat_ready: 0,
    };

    for entity in entities {
        *summary.by_faction.entry(entity.faction.clone()).or_default() += 1;
        *summary.by_type.entry(entity.kind).or_default() += 1;
        if entity.alive {
            summary.alive += 1;
            if entity.stats.health > entity.stats.max_health * 0.5 && entity.stats.stamina > 30.0 {
                summary.combat_ready += 1;
            }
        }
    }

    summary
}

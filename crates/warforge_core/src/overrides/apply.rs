//! Turn a validated command into a [`Changeset`].
//!
//! Nothing here mutates world, entities or narrative. A command whose target
//! cannot be resolved yields an empty changeset.

use super::limits::OverrideContext;
use super::StateView;
use crate::entity::archetype::archetype;
use crate::entity::{entity_id, generate_entity, SpawnSpec};
use crate::narrative::{describe_event, event_impact};
use crate::rng::SeededRng;
use crate::world::biome::poi_names;
use std::collections::BTreeMap;
use warforge_data::{
    AddedObjective, BehaviorKind, Biome, Changeset, Entity, EntityKind, EntityPatch, EntityUpdate,
    EventType, Faction, GridPos, NarrativePatch, Objective, ObjectiveTier, OverrideCommand, Poi, PoiType,
    RemoveTarget, TimelineEvent, Vec3, Weather, WeatherCondition, WorldPatch,
};

const HOSTILE_FACTION: &str = "hostile";
const TIGHT_SPREAD: i64 = 2;
const WIDE_SPREAD: i64 = 10;
const FULL_STAMINA: f64 = 100.0;
const CUSTOM_POI_RADIUS: i32 = 3;
const UNKNOWN_FORCES: &str = "Unknown forces";

fn find<'a>(entities: &'a [Entity], id: &str) -> Option<&'a Entity> {
    entities.iter().find(|e| e.id == id)
}

fn modified(id: &str, patch: EntityPatch) -> Changeset {
    Changeset {
        entities_modified: vec![EntityUpdate {
            id: id.to_string(),
            patch,
        }],
        ..Default::default()
    }
}

struct SpawnOrder<'a> {
    count: u32,
    kind: EntityKind,
    at: Option<(i64, i64)>,
    faction: &'a str,
    spread: bool,
}

fn spawn(
    state: &StateView<'_>,
    rng: &mut SeededRng,
    ctx: &mut OverrideContext,
    timestamp_ms: u64,
    order: SpawnOrder<'_>,
) -> Changeset {
    let world = state.world;
    let SpawnOrder {
        count,
        kind,
        at,
        faction,
        spread,
    } = order;
    let (cx, cy) = at.unwrap_or_else(|| match rng.pick(&world.pois) {
        Some(poi) => (i64::from(poi.x), i64::from(poi.y)),
        None => (
            i64::from(world.dimensions.width / 2),
            i64::from(world.dimensions.height / 2),
        ),
    });
    let offset = if spread { WIDE_SPREAD } else { TIGHT_SPREAD };

    let entities_added = (0..count)
        .map(|_| {
            let x = cx + rng.next_int(-offset, offset);
            let y = cy + rng.next_int(-offset, offset);
            let id = entity_id(ctx.next_entity_seq());
            generate_entity(rng, &SpawnSpec { faction, kind, x, y }, id, timestamp_ms)
        })
        .collect();

    Changeset {
        entities_added,
        ..Default::default()
    }
}

fn remove(entities: &[Entity], target: &RemoveTarget) -> Changeset {
    let entities_removed = match target {
        RemoveTarget::Entity(id) => find(entities, id).map(|e| e.id.clone()).into_iter().collect(),
        RemoveTarget::Faction(faction) => entities
            .iter()
            .filter(|e| &e.faction == faction)
            .map(|e| e.id.clone())
            .collect(),
    };
    Changeset {
        entities_removed,
        ..Default::default()
    }
}

fn set_behavior(entity: &Entity, behavior: BehaviorKind) -> EntityPatch {
    let mut state = entity.behavior.clone();
    state.current = behavior;
    state.target = None;
    state.destination = None;
    EntityPatch {
        behavior: Some(state),
        ..Default::default()
    }
}

/// Shift alert level of every living hostile.
fn aggression(entities: &[Entity], delta: f64) -> Changeset {
    let entities_modified = entities
        .iter()
        .filter(|e| e.alive && e.faction == HOSTILE_FACTION)
        .map(|e| {
            let mut behavior = e.behavior.clone();
            behavior.alert_level = (behavior.alert_level + delta).clamp(0.0, 1.0);
            EntityUpdate {
                id: e.id.clone(),
                patch: EntityPatch {
                    behavior: Some(behavior),
                    ..Default::default()
                },
            }
        })
        .collect();
    Changeset {
        entities_modified,
        ..Default::default()
    }
}

fn weather(current: &Weather, condition: WeatherCondition, intensity: f64, biome_shift: Option<Biome>) -> Changeset {
    let visibility = match condition {
        WeatherCondition::Fog => 0.3,
        WeatherCondition::Storm => 0.5,
        _ => 0.9,
    };
    let wind_speed = match condition {
        WeatherCondition::Storm => 40.0,
        WeatherCondition::Sandstorm => 35.0,
        _ => 10.0,
    };
    Changeset {
        world: Some(WorldPatch {
            weather: Some(Weather {
                condition,
                intensity,
                visibility,
                wind_speed,
                ..current.clone()
            }),
            primary_biome: biome_shift,
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn faction_name(faction: Option<&Faction>) -> &str {
    faction.map_or(UNKNOWN_FORCES, |f| f.name.as_str())
}

fn trigger_event(
    state: &StateView<'_>,
    rng: &mut SeededRng,
    ctx: &mut OverrideContext,
    timestamp_ms: u64,
    kind: EventType,
    location: &str,
) -> Changeset {
    let narrative = state.narrative;
    let place = state
        .world
        .pois
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(location) || p.name.eq_ignore_ascii_case(location))
        .map_or(location, |p| p.name.as_str());

    let first = rng.pick(&narrative.factions);
    let second = match first {
        Some(first) => {
            let others: Vec<_> = narrative.factions.iter().filter(|f| f.id != first.id).collect();
            rng.pick(&others).copied()
        }
        None => None,
    };

    let description = describe_event(rng, kind, faction_name(first), faction_name(second), place);

    let (involved, impact) = match (first, second) {
        (Some(a), Some(b)) => {
            let impact = event_impact(rng, kind, &a.id, &b.id);
            let involved = match kind {
                EventType::Battle => vec![a.id.clone(), b.id.clone()],
                EventType::Reinforcement => vec![a.id.clone()],
                _ => Vec::new(),
            };
            (involved, impact)
        }
        _ => (Vec::new(), BTreeMap::new()),
    };

    // Never earlier than recorded history, so the timeline stays sorted.
    let minutes = u32::try_from(timestamp_ms / 60_000).unwrap_or(u32::MAX);
    let last = narrative.timeline.last().map_or(0, |e| e.time);
    let time = minutes.max(last).max(narrative.current_time);

    Changeset {
        narrative: Some(NarrativePatch {
            events_added: vec![TimelineEvent {
                id: format!("event_custom_{}", ctx.next_custom_seq()),
                time,
                kind,
                description,
                factions_involved: involved,
                impact,
            }],
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn add_objective(
    state: &StateView<'_>,
    ctx: &mut OverrideContext,
    description: &str,
    at: Option<(i64, i64)>,
) -> Changeset {
    let Some(mission) = state.narrative.active_mission() else {
        return Changeset::default();
    };
    let location = at.map(|(x, y)| {
        GridPos::new(
            i32::try_from(x).unwrap_or(i32::MAX),
            i32::try_from(y).unwrap_or(i32::MAX),
        )
    });

    Changeset {
        narrative: Some(NarrativePatch {
            objectives_added: vec![AddedObjective {
                mission_id: mission.id.clone(),
                objective: Objective {
                    id: format!("obj_custom_{}", ctx.next_custom_seq()),
                    tier: ObjectiveTier::Secondary,
                    description: description.to_string(),
                    location,
                    quantity: None,
                    progress: 0,
                    completed: false,
                },
            }],
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn complete_objective(state: &StateView<'_>, objective_id: &str) -> Changeset {
    let known = state
        .narrative
        .missions
        .iter()
        .flat_map(|m| &m.objectives)
        .any(|o| o.id == objective_id && !o.completed);
    if !known {
        return Changeset::default();
    }
    Changeset {
        narrative: Some(NarrativePatch {
            objectives_completed: vec![objective_id.to_string()],
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn add_poi(rng: &mut SeededRng, ctx: &mut OverrideContext, kind: PoiType, x: i64, y: i64) -> Changeset {
    let name = rng.pick(poi_names(kind)).copied().unwrap_or("Site");
    let poi = Poi {
        id: format!("poi_custom_{}", ctx.next_custom_seq()),
        name: name.to_string(),
        kind,
        x: i32::try_from(x).unwrap_or(i32::MAX),
        y: i32::try_from(y).unwrap_or(i32::MAX),
        radius: CUSTOM_POI_RADIUS,
        faction: None,
        importance: 0.5,
        resources: Vec::new(),
        defenses: 0,
        population: 0,
    };
    Changeset {
        world: Some(WorldPatch {
            pois_added: vec![poi],
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Health is clamped to `[0, max_health]`; `alive` follows health.
fn adjust_health(entity: &Entity, amount: u32, heal: bool) -> EntityPatch {
    let mut stats = entity.stats;
    let amount = f64::from(amount);
    stats.health = if heal {
        (stats.health + amount).min(stats.max_health)
    } else {
        (stats.health - amount).max(0.0)
    };
    EntityPatch {
        stats: Some(stats),
        alive: Some(stats.health > 0.0),
        ..Default::default()
    }
}

fn resupply(entity: &Entity) -> EntityPatch {
    let mut stats = entity.stats;
    stats.stamina = FULL_STAMINA;

    let mut loadout = entity.loadout.clone();
    if let Some(template) = archetype(entity.kind).template_for(&entity.loadout) {
        loadout.ammo = template.build().ammo;
    }
    EntityPatch {
        stats: Some(stats),
        loadout: Some(loadout),
        ..Default::default()
    }
}

/// Compute the changeset for an already-validated command.
pub fn compute_changeset(
    command: &OverrideCommand,
    state: &StateView<'_>,
    rng: &mut SeededRng,
    ctx: &mut OverrideContext,
    timestamp_ms: u64,
) -> Changeset {
    let entities = state.entities;
    match command {
        OverrideCommand::SpawnEntity {
            count,
            entity_type,
            at,
            faction,
            spread,
        } => {
            let order = SpawnOrder {
                count: *count,
                kind: *entity_type,
                at: *at,
                faction,
                spread: *spread,
            };
            spawn(state, rng, ctx, timestamp_ms, order)
        }
        OverrideCommand::RemoveEntity { target } => remove(entities, target),
        OverrideCommand::MoveEntity { target, x, y } => find(entities, target)
            .map(|e| {
                let position = Vec3::new(*x as f64, *y as f64, e.position.z);
                modified(&e.id, EntityPatch {
                    position: Some(position),
                    ..Default::default()
                })
            })
            .unwrap_or_default(),
        OverrideCommand::SetBehavior { target, behavior } => find(entities, target)
            .map(|e| modified(&e.id, set_behavior(e, *behavior)))
            .unwrap_or_default(),
        OverrideCommand::SetAggression { delta } => aggression(entities, *delta),
        OverrideCommand::SetFaction { target, faction } => find(entities, target)
            .map(|e| {
                modified(&e.id, EntityPatch {
                    faction: Some(faction.clone()),
                    ..Default::default()
                })
            })
            .unwrap_or_default(),
        OverrideCommand::SetWeather {
            condition,
            intensity,
            biome_shift,
        } => weather(&state.world.weather, *condition, *intensity, *biome_shift),
        OverrideCommand::SetTime { hours } => Changeset {
            world: Some(WorldPatch {
                time_of_day: Some(hours.rem_euclid(24.0)),
                ..Default::default()
            }),
            ..Default::default()
        },
        OverrideCommand::TriggerEvent {
            event_type,
            location,
        } => trigger_event(state, rng, ctx, timestamp_ms, *event_type, location),
        OverrideCommand::AddObjective { description, at } => {
            add_objective(state, ctx, description, *at)
        }
        OverrideCommand::CompleteObjective { objective_id } => {
            complete_objective(state, objective_id)
        }
        OverrideCommand::AddPoi { poi_type, x, y } => add_poi(rng, ctx, *poi_type, *x, *y),
        OverrideCommand::Damage { target, amount } => find(entities, target)
            .map(|e| modified(&e.id, adjust_health(e, *amount, false)))
            .unwrap_or_default(),
        OverrideCommand::Heal { target, amount } => find(entities, target)
            .map(|e| modified(&e.id, adjust_health(e, *amount, true)))
            .unwrap_or_default(),
        OverrideCommand::Resupply { target } => find(entities, target)
            .map(|e| modified(&e.id, resupply(e)))
            .unwrap_or_default(),
    }
}

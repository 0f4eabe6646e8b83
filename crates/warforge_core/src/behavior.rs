//! Per-entity behavior state machine.
//!
//! A tick reads one entity, the roster as it stood before the tick and a
//! time delta, and returns only the fields that changed together with the
//! entity's advanced RNG cursor. Nothing is mutated in place, so any number
//! of entities can be ticked concurrently against the same roster.

use crate::rng::SeededRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use warforge_data::{BehaviorKind, BehaviorState, Entity, EntityPatch, RngCursor, Vec2, Vec3};

const ARRIVAL_RADIUS: f64 = 0.5;
const GUARD_RANGE_PER_PERCEPTION: f64 = 15.0;
const GUARD_ALERT_GAIN: f64 = 0.3;
const SEARCH_REROLL_CHANCE: f64 = 0.1;
const SEARCH_RADIUS: i64 = 5;
const SEARCH_SPEED_FACTOR: f64 = 0.7;
const ENGAGE_MAX_RANGE: f64 = 20.0;
const RETREAT_HEALTH_FRACTION: f64 = 0.2;
const RETREAT_CHANCE: f64 = 0.3;
const IDLE_TURN_CHANCE: f64 = 0.01;
const IDLE_TURN_DEGREES: f64 = 30.0;

/// Result of ticking a single entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub patch: EntityPatch,
    /// Where the entity's private stream stands after this tick.
    pub rng: RngCursor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTick {
    pub id: String,
    pub patch: EntityPatch,
    pub rng: RngCursor,
}

/// An engaging entity with a living, opposing target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub attacker: String,
    pub target: String,
    pub distance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub updates: Vec<EntityTick>,
    pub combat_events: Vec<CombatEvent>,
}

/// Working state for one tick.
struct Tick<'a> {
    entity: &'a Entity,
    roster: &'a [Entity],
    dt: f64,
    rng: SeededRng,
    behavior: BehaviorState,
    position: Vec3,
    rotation: f64,
}

impl<'a> Tick<'a> {
    fn find(&self, id: &str) -> Option<&'a Entity> {
        self.roster.iter().find(|e| e.id == id)
    }

    fn move_toward(&mut self, target: Vec2, speed: f64) {
        self.position = move_toward(self.position, target, speed * self.dt);
    }
}

/// Step `from` toward `to` by at most `step`, snapping when within reach.
pub fn move_toward(from: Vec3, to: Vec2, step: f64) -> Vec3 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let dist = (dx * dx + dy * dy).sqrt();

    if dist <= step || dist == 0.0 {
        return Vec3::new(to.x, to.y, from.z);
    }

    Vec3::new(from.x + dx / dist * step, from.y + dy / dist * step, from.z)
}

fn tick_idle(t: &mut Tick<'_>) {
    if t.rng.next_bool(IDLE_TURN_CHANCE) {
        t.rotation += t.rng.next_float(-IDLE_TURN_DEGREES, IDLE_TURN_DEGREES);
    }
}

fn tick_patrol(t: &mut Tick<'_>) {
    let route_len = t.behavior.patrol_route.len();
    if route_len == 0 {
        return;
    }
    let idx = t.behavior.patrol_index % route_len;
    let waypoint = t.behavior.patrol_route[idx];

    if t.position.distance_to_point(waypoint) < ARRIVAL_RADIUS {
        t.behavior.patrol_index = (idx + 1) % route_len;
        return;
    }
    t.move_toward(waypoint, t.entity.stats.speed);
}

fn tick_guard(t: &mut Tick<'_>) {
    let range = GUARD_RANGE_PER_PERCEPTION * t.entity.stats.perception;
    let me = t.entity;

    let mut nearest: Option<(&Entity, f64)> = None;
    for other in t.roster {
        if !other.alive || other.id == me.id || !me.is_hostile_to(other) {
            continue;
        }
        let dist = me.position.distance_2d(&other.position);
        if dist >= range {
            continue;
        }
        // Strictly closer only, so ties keep roster order.
        if nearest.map_or(true, |(_, best)| dist < best) {
            nearest = Some((other, dist));
        }
    }

    if let Some((target, _)) = nearest {
        t.behavior.current = BehaviorKind::Engage;
        t.behavior.target = Some(target.id.clone());
        t.behavior.alert_level = (t.behavior.alert_level + GUARD_ALERT_GAIN).min(1.0);
    }
}

fn tick_search(t: &mut Tick<'_>) {
    let reroll = t.behavior.destination.is_none() || t.rng.next_bool(SEARCH_REROLL_CHANCE);
    if reroll {
        let dx = t.rng.next_int(-SEARCH_RADIUS, SEARCH_RADIUS) as f64;
        let dy = t.rng.next_int(-SEARCH_RADIUS, SEARCH_RADIUS) as f64;
        t.behavior.destination = Some(Vec2::new(t.position.x + dx, t.position.y + dy));
    }
    if let Some(destination) = t.behavior.destination {
        t.move_toward(destination, t.entity.stats.speed * SEARCH_SPEED_FACTOR);
    }
}

fn tick_pursue(t: &mut Tick<'_>) {
    let Some(target) = t.behavior.target.as_deref().and_then(|id| t.find(id)) else {
        return;
    };
    let goal = Vec2::new(target.position.x, target.position.y);
    t.move_toward(goal, t.entity.stats.speed);
}

fn tick_engage(t: &mut Tick<'_>) {
    let Some(target_id) = t.behavior.target.as_deref() else {
        t.behavior.current = BehaviorKind::Search;
        return;
    };
    let target = match t.find(target_id) {
        Some(target) if target.alive => target,
        _ => {
            t.behavior.current = BehaviorKind::Search;
            t.behavior.target = None;
            return;
        }
    };

    if t.position.distance_2d(&target.position) > ENGAGE_MAX_RANGE {
        t.behavior.current = BehaviorKind::Pursue;
        return;
    }

    let stats = &t.entity.stats;
    if stats.health < stats.max_health * RETREAT_HEALTH_FRACTION && t.rng.next_bool(RETREAT_CHANCE) {
        t.behavior.current = BehaviorKind::Retreat;
        t.behavior.target = None;
    }
}

fn tick_retreat(t: &mut Tick<'_>) {
    let heading = t.rng.next_float(0.0, TAU);
    let step = t.entity.stats.speed * t.dt;
    t.position = Vec3::new(
        t.position.x + heading.cos() * step,
        t.position.y + heading.sin() * step,
        t.position.z,
    );
}

/// Advance one entity by `dt` seconds against `roster`.
///
/// Dead entities are returned untouched with their cursor unchanged.
pub fn tick_entity(entity: &Entity, roster: &[Entity], dt: f64) -> TickOutcome {
    if !entity.alive {
        return TickOutcome {
            patch: EntityPatch::default(),
            rng: entity.behavior.rng,
        };
    }

    let mut t = Tick {
        entity,
        roster,
        dt,
        rng: SeededRng::from_cursor(entity.behavior.rng),
        behavior: entity.behavior.clone(),
        position: entity.position,
        rotation: entity.rotation,
    };

    match entity.behavior.current {
        BehaviorKind::Patrol => tick_patrol(&mut t),
        BehaviorKind::Guard => tick_guard(&mut t),
        BehaviorKind::Search => tick_search(&mut t),
        BehaviorKind::Pursue => tick_pursue(&mut t),
        BehaviorKind::Engage => tick_engage(&mut t),
        BehaviorKind::Retreat => tick_retreat(&mut t),
        BehaviorKind::Idle
        | BehaviorKind::Cover
        | BehaviorKind::Flank
        | BehaviorKind::Support
        | BehaviorKind::Heal
        | BehaviorKind::Repair
        | BehaviorKind::Follow
        | BehaviorKind::Escort
        | BehaviorKind::Investigate => tick_idle(&mut t),
    }

    let cursor = t.rng.cursor();
    t.behavior.rng = entity.behavior.rng;

    let mut patch = EntityPatch::default();
    if t.position != entity.position {
        patch.position = Some(t.position);
    }
    if t.rotation != entity.rotation {
        patch.rotation = Some(t.rotation);
    }
    if t.behavior != entity.behavior {
        t.behavior.rng = cursor;
        patch.behavior = Some(t.behavior);
    }

    TickOutcome { patch, rng: cursor }
}

/// Combat event for `entity` if it is engaging a living opponent.
pub fn combat_event(entity: &Entity, roster: &[Entity]) -> Option<CombatEvent> {
    if !entity.alive || entity.behavior.current != BehaviorKind::Engage {
        return None;
    }
    let target_id = entity.behavior.target.as_deref()?;
    let target = roster.iter().find(|e| e.id == target_id)?;
    if !target.alive || !entity.is_hostile_to(target) {
        return None;
    }
    Some(CombatEvent {
        attacker: entity.id.clone(),
        target: target.id.clone(),
        distance: entity.position.distance_2d(&target.position),
    })
}

/// Tick every living entity against the same pre-tick roster.
///
/// Combat events are derived from each entity's post-tick behavior and
/// position, against the pre-tick roster.
pub fn tick_all(roster: &[Entity], dt: f64) -> TickReport {
    let results: Vec<(EntityTick, Option<CombatEvent>)> = roster
        .par_iter()
        .filter(|e| e.alive)
        .map(|entity| {
            let outcome = tick_entity(entity, roster, dt);

            let mut after = entity.clone();
            outcome.patch.apply_to(&mut after);
            let event = combat_event(&after, roster);

            let tick = EntityTick {
                id: entity.id.clone(),
                patch: outcome.patch,
                rng: outcome.rng,
            };
            (tick, event)
        })
        .collect();

    let mut report = TickReport::default();
    for (tick, event) in results {
        report.updates.push(tick);
        report.combat_events.extend(event);
    }
    report
}

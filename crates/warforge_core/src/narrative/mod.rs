//! Factions, missions and a timeline layered over a generated world.

pub mod enhancer;
pub mod templates;

use crate::rng::SeededRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use templates::{FactionTemplate, DISASTERS, DISCOVERIES, EVENTS, FACTIONS};
use warforge_data::{
    Alignment, EventType, Faction, GridPos, Mission, MissionStatus, MissionType, Narrative,
    Objective, ObjectiveTier, Poi, TimelineEvent, World,
};

pub use enhancer::{
    enhance_with_fallback, BriefingRequest, DisabledEnhancer, HttpEnhancer, NarrativeEnhancer,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeOptions {
    pub faction_count: usize,
    pub mission_count: usize,
    pub timeline_events: usize,
    pub difficulty: f64,
}

impl Default for NarrativeOptions {
    fn default() -> Self {
        Self {
            faction_count: 4,
            mission_count: 3,
            timeline_events: 10,
            difficulty: 0.5,
        }
    }
}

const BASE_TENSION: f64 = 0.3;
const HOSTILE_RELATION: f64 = -0.5;
const RECENT_EVENTS: usize = 5;
const FALLBACK_LOCATION: &str = "the frontier";

fn relation(rng: &mut SeededRng, a: Alignment, b: Alignment) -> f64 {
    if a == b {
        rng.next_float(0.3, 0.8)
    } else if a == Alignment::Neutral || b == Alignment::Neutral {
        rng.next_float(-0.2, 0.3)
    } else {
        rng.next_float(-1.0, -0.3)
    }
}

/// Pick `count` faction templates and roll their relations and resources.
pub fn generate_factions(rng: &mut SeededRng, count: usize, world: &World) -> Vec<Faction> {
    let mut pool: Vec<&FactionTemplate> = FACTIONS.iter().collect();
    rng.shuffle(&mut pool);
    pool.truncate(count);

    pool.iter()
        .map(|template| {
            let controlled_pois = world
                .pois
                .iter()
                .filter(|p| p.faction.as_deref() == Some(template.id))
                .map(|p| p.id.clone())
                .collect();

            let relations = pool
                .iter()
                .filter(|other| other.id != template.id)
                .map(|other| {
                    (other.id.to_string(), relation(rng, template.alignment, other.alignment))
                })
                .collect();

            let mut resources = BTreeMap::new();
            resources.insert("supplies".to_string(), rng.next_int(100, 1000) as u32);
            resources.insert("fuel".to_string(), rng.next_int(50, 500) as u32);
            resources.insert("ammo".to_string(), rng.next_int(500, 5000) as u32);
            resources.insert("personnel".to_string(), rng.next_int(50, 500) as u32);

            Faction {
                id: template.id.to_string(),
                name: template.name.to_string(),
                color: template.color.to_string(),
                alignment: template.alignment,
                relations,
                resources,
                controlled_pois,
                population: rng.next_int(100, 2000) as u32,
                military_strength: rng.next_float(0.3, 1.0),
                tech_level: rng.next_float(0.5, 1.0),
            }
        })
        .collect()
}

/// Friendly factions first; otherwise anything that is not hostile; otherwise anyone.
fn mission_owners(factions: &[Faction]) -> Vec<&Faction> {
    for wanted in [Some(Alignment::Friendly), None] {
        let owners: Vec<&Faction> = factions
            .iter()
            .filter(|f| match wanted {
                Some(alignment) => f.alignment == alignment,
                None => f.alignment != Alignment::Hostile,
            })
            .collect();
        if !owners.is_empty() {
            return owners;
        }
    }
    factions.iter().collect()
}

fn build_objectives(
    rng: &mut SeededRng,
    mission_idx: usize,
    kind: MissionType,
    target: &Poi,
    secondary: Option<&Poi>,
) -> Vec<Objective> {
    let template = templates::mission(kind);
    template
        .objectives
        .iter()
        .enumerate()
        .map(|(idx, (tier, text))| {
            let zone = format!("Sector {}", (b'A' + rng.next_int(0, 4) as u8) as char);
            let duration = rng.next_int(5, 15).to_string();
            let description = templates::fill(
                text,
                &[
                    ("poi_start", target.name.as_str()),
                    ("poi_end", secondary.map_or("Base", |p| p.name.as_str())),
                    ("poi", target.name.as_str()),
                    ("zone", zone.as_str()),
                    ("duration", duration.as_str()),
                ],
            );
            let quantity = match tier {
                ObjectiveTier::Primary => None,
                _ => Some(rng.next_int(1, 5) as u32),
            };

            Objective {
                id: format!("obj_{mission_idx}_{idx}"),
                tier: *tier,
                description,
                location: Some(GridPos::new(target.x, target.y)),
                quantity,
                progress: 0,
                completed: false,
            }
        })
        .collect()
}

/// Missions against the world's POIs. The first one starts active.
///
/// A world without POIs has nothing to target and yields no missions.
pub fn generate_missions(
    rng: &mut SeededRng,
    factions: &[Faction],
    world: &World,
    count: usize,
    difficulty: f64,
) -> Vec<Mission> {
    if world.pois.is_empty() || factions.is_empty() {
        return Vec::new();
    }
    let owners = mission_owners(factions);
    let opposing: Vec<String> = factions
        .iter()
        .filter(|f| f.alignment == Alignment::Hostile)
        .map(|f| f.id.clone())
        .collect();

    let mut missions = Vec::with_capacity(count);
    for i in 0..count {
        let kind = rng.pick(MissionType::ALL).copied().unwrap_or(MissionType::Patrol);
        let Some(owner) = rng.pick(&owners).copied() else {
            break;
        };
        let Some(target) = rng.pick(&world.pois) else {
            break;
        };
        let others: Vec<&Poi> = world.pois.iter().filter(|p| p.id != target.id).collect();
        let secondary = rng.pick(&others).copied();

        let objectives = build_objectives(rng, i, kind, target, secondary);
        let template = templates::mission(kind);
        let name = rng
            .pick(&template.names)
            .copied()
            .unwrap_or("Operation Unnamed")
            .to_string();

        let mission_difficulty = (difficulty + rng.next_float(-0.2, 0.2)).clamp(0.0, 1.0);
        let time_limit = (kind == MissionType::Defend).then(|| rng.next_int(10, 30) as u32);

        let mut rewards = BTreeMap::new();
        rewards.insert("experience".to_string(), rng.next_int(100, 500) as u32);
        rewards.insert("supplies".to_string(), rng.next_int(50, 200) as u32);
        rewards.insert("reputation".to_string(), rng.next_int(10, 50) as u32);

        missions.push(Mission {
            id: format!("mission_{i}"),
            kind,
            name,
            description: format!("{} operation targeting {}", owner.name, target.name),
            objectives,
            primary_faction: owner.id.clone(),
            opposing_factions: opposing.clone(),
            location: target.id.clone(),
            difficulty: mission_difficulty,
            time_limit,
            rewards,
            status: if i == 0 {
                MissionStatus::Active
            } else {
                MissionStatus::Pending
            },
        });
    }
    missions
}

/// Event impact per involved faction.
pub fn event_impact(
    rng: &mut SeededRng,
    kind: EventType,
    faction1: &str,
    faction2: &str,
) -> BTreeMap<String, f64> {
    let mut impact = BTreeMap::new();
    match kind {
        EventType::Battle => {
            impact.insert(faction1.to_string(), rng.next_float(-0.3, 0.1));
            impact.insert(faction2.to_string(), rng.next_float(-0.3, 0.1));
        }
        EventType::Reinforcement => {
            impact.insert(faction1.to_string(), rng.next_float(0.1, 0.3));
        }
        _ => {}
    }
    impact
}

/// Substitute the shared event tokens into `kind`'s template.
pub fn describe_event(
    rng: &mut SeededRng,
    kind: EventType,
    faction1: &str,
    faction2: &str,
    location: &str,
) -> String {
    let disaster = rng.pick(DISASTERS).copied().unwrap_or("Storm");
    let discovery = rng.pick(DISCOVERIES).copied().unwrap_or("supply route");
    templates::fill(
        templates::event_template(kind),
        &[
            ("faction1", faction1),
            ("faction2", faction2),
            ("location", location),
            ("disaster_type", disaster),
            ("discovery", discovery),
        ],
    )
}

/// `count` historical events, sorted by time. Needs two factions to pair up.
pub fn generate_timeline(
    rng: &mut SeededRng,
    factions: &[Faction],
    world: &World,
    count: usize,
) -> Vec<TimelineEvent> {
    if factions.len() < 2 {
        return Vec::new();
    }

    let mut events = Vec::with_capacity(count);
    for i in 0..count {
        let Some((kind, _)) = rng.pick(EVENTS).copied() else {
            break;
        };
        let Some(first) = rng.pick(factions) else {
            break;
        };
        let others: Vec<&Faction> = factions.iter().filter(|f| f.id != first.id).collect();
        let Some(second) = rng.pick(&others).copied() else {
            break;
        };
        let location = rng
            .pick(&world.pois)
            .map_or(FALLBACK_LOCATION, |p| p.name.as_str());

        let description = describe_event(rng, kind, &first.name, &second.name, location);
        let impact = event_impact(rng, kind, &first.id, &second.id);

        events.push(TimelineEvent {
            id: format!("event_{i}"),
            time: i as u32 * rng.next_int(30, 120) as u32,
            kind,
            description,
            factions_involved: vec![first.id.clone(), second.id.clone()],
            impact,
        });
    }

    events.sort_by_key(|e| e.time);
    events
}

/// 0.3, plus 0.1 per relation below -0.5, plus 0.05 per battle; capped at 1.
pub fn global_tension(factions: &[Faction], timeline: &[TimelineEvent]) -> f64 {
    let hostile_relations = factions
        .iter()
        .flat_map(|f| f.relations.values())
        .filter(|r| **r < HOSTILE_RELATION)
        .count();
    let battles = timeline.iter().filter(|e| e.kind == EventType::Battle).count();

    (BASE_TENSION + hostile_relations as f64 * 0.1 + battles as f64 * 0.05).min(1.0)
}

/// `"a vs b"` for each pair of non-neutral factions on opposite sides.
pub fn active_conflicts(factions: &[Faction]) -> Vec<String> {
    let active: Vec<&Faction> = factions
        .iter()
        .filter(|f| f.alignment != Alignment::Neutral)
        .collect();

    let mut pairs = Vec::new();
    for (i, a) in active.iter().enumerate() {
        for b in &active[i + 1..] {
            if a.alignment != b.alignment {
                pairs.push(format!("{} vs {}", a.id, b.id));
            }
        }
    }
    pairs
}

pub fn recent_events(timeline: &[TimelineEvent]) -> Vec<String> {
    let start = timeline.len().saturating_sub(RECENT_EVENTS);
    timeline[start..].iter().map(|e| e.description.clone()).collect()
}

/// Generate the full narrative layer. Mission descriptions are procedural;
/// see [`enhance_with_fallback`] for the optional rewrite.
pub fn generate_narrative(rng: &mut SeededRng, world: &World, options: &NarrativeOptions) -> Narrative {
    let factions = generate_factions(rng, options.faction_count, world);
    let missions = generate_missions(rng, &factions, world, options.mission_count, options.difficulty);
    let timeline = generate_timeline(rng, &factions, world, options.timeline_events);

    let seed_hex = rng.seed_hex();
    let narrative = Narrative {
        id: format!("narrative_{}", &seed_hex[..seed_hex.len().min(8)]),
        seed: seed_hex.clone(),
        global_tension: global_tension(&factions, &timeline),
        active_conflicts: active_conflicts(&factions),
        recent_events: recent_events(&timeline),
        factions,
        missions,
        timeline,
        current_time: 0,
    };

    tracing::debug!(
        narrative = %narrative.id,
        factions = narrative.factions.len(),
        missions = narrative.missions.len(),
        events = narrative.timeline.len(),
        tension = narrative.global_tension,
        "Narrative generated"
    );

    narrative
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSummary {
    pub faction_count: usize,
    pub mission_count: usize,
    pub active_missions: usize,
    pub timeline_events: usize,
    /// e.g. `"65%"`.
    pub global_tension: String,
    pub conflicts: Vec<String>,
}

pub fn summarize_narrative(narrative: &Narrative) -> NarrativeSummary {
    NarrativeSummary {
        faction_count: narrative.factions.len(),
        mission_count: narrative.missions.len(),
        active_missions: narrative
            .missions
            .iter()
            .filter(|m| m.status == MissionStatus::Active)
            .count(),
        timeline_events: narrative.timeline.len(),
        global_tension: format!("{}%", (narrative.global_tension * 100.0).round() as i64),
        conflicts: narrative.active_conflicts.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{generate_world, WorldOptions};

    fn world() -> World {
        generate_world(&mut SeededRng::new(77), &WorldOptions::default()).unwrap()
    }

    fn narrative(seed: u64, world: &World) -> Narrative {
        generate_narrative(&mut SeededRng::new(seed), world, &NarrativeOptions::default())
    }

    #[test]
    fn test_narrative_is_reproducible() {
        let world = world();
        assert_eq!(narrative(5, &world), narrative(5, &world));
    }

    #[test]
    fn test_faction_count_and_relations() {
        let world = world();
        let n = narrative(9, &world);
        assert_eq!(n.factions.len(), 4);
        for f in &n.factions {
            assert_eq!(f.relations.len(), 3);
            assert!(!f.relations.contains_key(&f.id));
            for (other, score) in &f.relations {
                let other = n.faction(other).unwrap();
                if other.alignment == f.alignment {
                    assert!((0.3..0.8).contains(score));
                } else if other.alignment == Alignment::Neutral || f.alignment == Alignment::Neutral {
                    assert!((-0.2..0.3).contains(score));
                } else {
                    assert!((-1.0..-0.3).contains(score));
                }
            }
        }
    }

    #[test]
    fn test_faction_count_is_capped_by_pool() {
        let world = world();
        let factions = generate_factions(&mut SeededRng::new(1), 10, &world);
        assert_eq!(factions.len(), FACTIONS.len());
    }

    #[test]
    fn test_only_first_mission_is_active() {
        let world = world();
        let n = narrative(11, &world);
        assert!(!world.pois.is_empty());
        assert_eq!(n.missions.len(), 3);
        assert_eq!(n.missions[0].status, MissionStatus::Active);
        assert!(n.missions[1..].iter().all(|m| m.status == MissionStatus::Pending));
        assert_eq!(n.active_mission().map(|m| m.id.as_str()), Some("mission_0"));
    }

    #[test]
    fn test_objectives_are_filled_in() {
        let world = world();
        let n = narrative(13, &world);
        for mission in &n.missions {
            assert_eq!(mission.objectives.len(), 4);
            for obj in &mission.objectives {
                assert!(!obj.description.contains('{'), "{}", obj.description);
                assert_eq!(obj.quantity.is_some(), obj.tier != ObjectiveTier::Primary);
            }
            assert_eq!(mission.time_limit.is_some(), mission.kind == MissionType::Defend);
            assert!((0.0..=1.0).contains(&mission.difficulty));
        }
    }

    #[test]
    fn test_timeline_sorted_with_impacts() {
        let world = world();
        let n = narrative(17, &world);
        assert_eq!(n.timeline.len(), 10);
        assert!(n.timeline.windows(2).all(|w| w[0].time <= w[1].time));
        for event in &n.timeline {
            match event.kind {
                EventType::Battle => assert_eq!(event.impact.len(), 2),
                EventType::Reinforcement => assert_eq!(event.impact.len(), 1),
                _ => assert!(event.impact.is_empty()),
            }
            assert_ne!(event.factions_involved[0], event.factions_involved[1]);
        }
        assert_eq!(n.recent_events.len(), 5);
        assert_eq!(n.recent_events[4], n.timeline[9].description);
    }

    #[test]
    fn test_timeline_needs_two_factions() {
        let world = world();
        let factions = generate_factions(&mut SeededRng::new(3), 1, &world);
        assert!(generate_timeline(&mut SeededRng::new(3), &factions, &world, 10).is_empty());
    }

    #[test]
    fn test_no_pois_no_missions() {
        let mut world = world();
        world.pois.clear();
        let factions = generate_factions(&mut SeededRng::new(3), 4, &world);
        assert!(generate_missions(&mut SeededRng::new(3), &factions, &world, 3, 0.5).is_empty());
    }

    #[test]
    fn test_tension_and_conflicts() {
        let world = world();
        let mut factions = generate_factions(&mut SeededRng::new(21), 6, &world);
        assert!(global_tension(&factions, &[]) <= 1.0);
        for f in &mut factions {
            f.relations.values_mut().for_each(|r| *r = 0.0);
        }
        assert!((global_tension(&factions, &[]) - 0.3).abs() < 1e-9);

        // alpha, bravo friendly; hostile, insurgent hostile: 4 opposed pairs
        let conflicts = active_conflicts(&factions);
        assert_eq!(conflicts.len(), 4);
        assert!(conflicts.iter().all(|c| !c.contains("neutral") && !c.contains("pmc")));
    }

    #[test]
    fn test_summary_tension_label() {
        let world = world();
        let mut n = narrative(23, &world);
        n.global_tension = 0.654;
        let summary = summarize_narrative(&n);
        assert_eq!(summary.global_tension, "65%");
        assert_eq!(summary.active_missions, 1);
    }
}

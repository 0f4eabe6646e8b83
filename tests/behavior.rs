mod common;

use common::{EntityBuilder, ScenarioBuilder};
use warforge_data::BehaviorKind;
use warforge_lib::model::entity::entity_id;

#[test]
fn test_guard_engages_nearest_opponent() {
    let mut sim = ScenarioBuilder::new()
        .empty_roster()
        .with_entity(
            EntityBuilder::new(0)
                .behavior(BehaviorKind::Guard)
                .perception(1.0)
                .at(10.0, 10.0)
                .build(),
        )
        .with_entity(EntityBuilder::new(1).faction("bravo").at(18.0, 10.0).build())
        .with_entity(EntityBuilder::new(2).faction("bravo").at(13.0, 10.0).build())
        .with_entity(EntityBuilder::new(3).faction("neutral").at(11.0, 10.0).build())
        .build();

    sim.tick(1.0).unwrap();

    assert_behavior!(sim, &entity_id(0), BehaviorKind::Engage);
    let guard = sim.entity(&entity_id(0)).unwrap();
    assert_eq!(guard.behavior.target.as_deref(), Some(entity_id(2).as_str()));
    assert!(guard.behavior.alert_level <= 1.0);
}

#[test]
fn test_guard_tie_keeps_roster_order() {
    let mut sim = ScenarioBuilder::new()
        .empty_roster()
        .with_entity(
            EntityBuilder::new(0)
                .behavior(BehaviorKind::Guard)
                .perception(1.0)
                .at(10.0, 10.0)
                .build(),
        )
        .with_entity(EntityBuilder::new(1).faction("bravo").at(14.0, 10.0).build())
        .with_entity(EntityBuilder::new(2).faction("bravo").at(6.0, 10.0).build())
        .build();

    sim.tick(1.0).unwrap();
    let guard = sim.entity(&entity_id(0)).unwrap();
    assert_eq!(guard.behavior.target.as_deref(), Some(entity_id(1).as_str()));
}

#[test]
fn test_guard_ignores_out_of_range_and_dead() {
    let mut sim = ScenarioBuilder::new()
        .empty_roster()
        .with_entity(
            EntityBuilder::new(0)
                .behavior(BehaviorKind::Guard)
                .perception(0.5)
                .at(10.0, 10.0)
                .build(),
        )
        .with_entity(EntityBuilder::new(1).faction("bravo").at(20.0, 10.0).build())
        .with_entity(EntityBuilder::new(2).faction("bravo").at(12.0, 10.0).health(0.0).build())
        .build();
    sim.entities[2].alive = false;

    sim.tick(1.0).unwrap();
    assert_behavior!(sim, &entity_id(0), BehaviorKind::Guard);
}

#[test]
fn test_engage_falls_back_to_search_when_target_removed() {
    let mut sim = ScenarioBuilder::new()
        .empty_roster()
        .with_entity(
            EntityBuilder::new(0)
                .behavior(BehaviorKind::Engage)
                .target(1)
                .at(10.0, 10.0)
                .build(),
        )
        .with_entity(EntityBuilder::new(1).faction("bravo").at(12.0, 10.0).build())
        .build();

    let first = sim.tick(1.0).unwrap();
    assert_eq!(first.combat_events.len(), 1);
    assert_eq!(first.combat_events[0].attacker, entity_id(0));

    let removed = sim.submit_command(&format!("remove {}", entity_id(1)), "gm").unwrap();
    assert!(removed.success);
    assert_roster_size!(sim, 1);

    let second = sim.tick(1.0).unwrap();
    assert!(second.combat_events.is_empty());
    assert_behavior!(sim, &entity_id(0), BehaviorKind::Search);
    assert_eq!(sim.entity(&entity_id(0)).unwrap().behavior.target, None);
}

#[test]
fn test_engage_dead_target_clears_and_stays_in_roster() {
    let mut sim = ScenarioBuilder::new()
        .empty_roster()
        .with_entity(
            EntityBuilder::new(0)
                .behavior(BehaviorKind::Engage)
                .target(1)
                .at(10.0, 10.0)
                .build(),
        )
        .with_entity(EntityBuilder::new(1).faction("bravo").at(12.0, 10.0).build())
        .build();

    let killed = sim.submit_command(&format!("damage {} 1000", entity_id(1)), "gm").unwrap();
    assert!(killed.success);
    assert_entity_dead!(sim, &entity_id(1));

    sim.tick(1.0).unwrap();
    assert_behavior!(sim, &entity_id(0), BehaviorKind::Search);
    assert_roster_size!(sim, 2);
}

#[test]
fn test_engage_distant_target_switches_to_pursue() {
    let mut sim = ScenarioBuilder::new()
        .empty_roster()
        .with_entity(
            EntityBuilder::new(0)
                .behavior(BehaviorKind::Engage)
                .target(1)
                .at(0.0, 0.0)
                .build(),
        )
        .with_entity(EntityBuilder::new(1).faction("bravo").at(25.0, 0.0).build())
        .build();

    sim.tick(1.0).unwrap();
    assert_behavior!(sim, &entity_id(0), BehaviorKind::Pursue);

    let before = sim.entity(&entity_id(0)).unwrap().position.x;
    sim.tick(1.0).unwrap();
    let after = sim.entity(&entity_id(0)).unwrap().position.x;
    assert!(after > before, "pursuer should close in ({before} -> {after})");
}

#[test]
fn test_patrol_cycles_waypoints() {
    let mut sim = ScenarioBuilder::new()
        .empty_roster()
        .with_entity(
            EntityBuilder::new(0)
                .behavior(BehaviorKind::Patrol)
                .at(10.0, 10.0)
                .patrol(&[(10.0, 10.0), (10.2, 10.0)])
                .build(),
        )
        .build();

    // Already at the first waypoint: index advances without moving.
    sim.tick(1.0).unwrap();
    let e = sim.entity(&entity_id(0)).unwrap();
    assert_eq!(e.behavior.patrol_index, 1);
    assert_eq!((e.position.x, e.position.y), (10.0, 10.0));
}

#[test]
fn test_dead_entities_are_not_ticked() {
    let mut sim = ScenarioBuilder::new()
        .empty_roster()
        .with_entity(EntityBuilder::new(0).behavior(BehaviorKind::Retreat).at(10.0, 10.0).build())
        .build();
    sim.entities[0].alive = false;
    let cursor = sim.entities[0].behavior.rng;

    let summary = sim.tick(1.0).unwrap();
    assert_eq!(summary.changed, 0);
    assert_eq!(sim.entities[0].behavior.rng, cursor);
    assert_eq!((sim.entities[0].position.x, sim.entities[0].position.y), (10.0, 10.0));
}

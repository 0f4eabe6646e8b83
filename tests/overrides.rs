mod common;

use common::{EntityBuilder, ScenarioBuilder};
use warforge_data::{OverrideKind, WeatherCondition};
use warforge_lib::model::entity::entity_id;

#[test]
fn test_spawn_cap_then_spawn_ten() {
    let mut sim = ScenarioBuilder::new().build();
    let before = sim.entities.len();

    let rejected = sim.submit_command("spawn 80 infantry", "gm").unwrap();
    assert!(!rejected.success);
    assert!(!rejected.record.validated);
    assert!(rejected.changeset.is_empty());
    assert_roster_size!(sim, before);

    let accepted = sim.submit_command("spawn 10 infantry", "gm").unwrap();
    assert!(accepted.success);
    assert_eq!(accepted.changeset.entities_added.len(), 10);
    assert_roster_size!(sim, before + 10);

    let mut ids: Vec<&str> = sim.entities.iter().map(|e| e.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), sim.entities.len(), "entity ids must stay unique");
}

#[test]
fn test_cooldown_window_uses_simulation_clock() {
    let mut sim = ScenarioBuilder::new().build();
    assert!(sim.submit_command("spawn 1 drone", "gm").unwrap().success);

    let blocked = sim.submit_command("spawn 1 drone", "gm").unwrap();
    assert!(!blocked.success);
    assert!(blocked.error.unwrap().contains("Cooldown"));
    assert_eq!(sim.metrics.rejections_for(OverrideKind::SpawnEntity), 1);

    sim.tick(1.0).unwrap();
    assert!(sim.submit_command("spawn 1 drone", "gm").unwrap().success);
}

#[test]
fn test_cooldowns_are_per_simulation() {
    let mut a = ScenarioBuilder::new().build();
    let mut b = ScenarioBuilder::new().build();
    assert!(a.submit_command("spawn 1 scout", "one").unwrap().success);
    assert!(b.submit_command("spawn 1 scout", "two").unwrap().success);
}

#[test]
fn test_configured_limits_apply() {
    let mut sim = ScenarioBuilder::new()
        .with_config(|c| {
            c.overrides.spawn_cap = 5;
            c.overrides.cooldowns_ms.insert("spawn_entity".to_string(), 0);
        })
        .build();
    assert!(!sim.submit_command("spawn 6 infantry", "gm").unwrap().success);
    assert!(sim.submit_command("spawn 5 infantry", "gm").unwrap().success);
    assert!(sim.submit_command("spawn 5 infantry", "gm").unwrap().success);
}

#[test]
fn test_heal_and_damage_clamp() {
    let mut sim = ScenarioBuilder::new()
        .empty_roster()
        .with_entity(EntityBuilder::new(0).build())
        .build();
    let id = entity_id(0);
    let max = sim.entities[0].stats.max_health;
    sim.entities[0].stats.health = max - 5.0;

    assert!(sim.submit_command(&format!("heal {id} 1000"), "gm").unwrap().success);
    assert_eq!(sim.entities[0].stats.health, max);

    assert!(sim.submit_command(&format!("damage {id} 1000"), "gm").unwrap().success);
    assert_eq!(sim.entities[0].stats.health, 0.0);
    assert_entity_dead!(sim, &id);

    let too_much = sim.submit_command(&format!("damage {id} 1001"), "gm");
    assert!(!too_much.unwrap().success);
}

#[test]
fn test_unknown_target_is_empty_success() {
    let mut sim = ScenarioBuilder::new().build();
    let checksum = sim.checksum().unwrap();
    let result = sim.submit_command("set faction entity_99999 bravo", "gm").unwrap();
    assert!(result.success);
    assert!(result.changeset.is_empty());
    assert_eq!(checksum, sim.checksum().unwrap());
}

#[test]
fn test_weather_and_objectives() {
    let mut sim = ScenarioBuilder::new().build();
    let result = sim.submit_command("set weather fog intensity 40", "gm").unwrap();
    assert!(result.success);
    assert_eq!(sim.world.weather.condition, WeatherCondition::Fog);
    assert_eq!(sim.world.weather.intensity, 0.4);
    assert_eq!(sim.world.weather.visibility, 0.3);

    let Some(mission_id) = sim.narrative.active_mission().map(|m| m.id.clone()) else {
        return;
    };
    let added = sim.submit_command("add objective \"Hold the ford\"", "gm").unwrap();
    assert!(added.success);
    let mission = sim.narrative.missions.iter().find(|m| m.id == mission_id).unwrap();
    let objective = mission.objectives.last().unwrap();
    assert_eq!(objective.description, "Hold the ford");

    let objective_id = objective.id.clone();
    sim.submit_command(&format!("complete objective {objective_id}"), "gm");
    let mission = sim.narrative.missions.iter().find(|m| m.id == mission_id).unwrap();
    let objective = mission.objectives.iter().find(|o| o.id == objective_id).unwrap();
    assert!(objective.completed);
    assert_eq!(objective.progress, 100);
}

#[test]
fn test_riot_spawns_twenty_hostiles() {
    let mut sim = ScenarioBuilder::new().empty_roster().build();
    let result = sim.submit_command("riot", "gm").unwrap();
    assert!(result.success);
    assert_roster_size!(sim, 20);
    assert!(sim.entities.iter().all(|e| e.faction == "hostile"));
}

#[test]
fn test_metrics_track_outcomes() {
    let mut sim = ScenarioBuilder::new().build();
    sim.submit_command("aggression 0.5", "gm");
    sim.submit_command("aggression 2", "gm");
    sim.submit_command("not a command", "gm");
    assert_eq!(sim.metrics.overrides_applied(), 1);
    assert_eq!(sim.metrics.overrides_rejected(), 1);
}

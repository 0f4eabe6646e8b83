//! Content digests for worlds, generation results and live simulation state.

use crate::error::Result;
use serde::Serialize;
use sha2::{Digest, Sha256, Sha384};
use warforge_data::{Entity, Narrative, Poi, Road, SpawnPoint, Tile, World, Zone};

#[derive(Serialize)]
struct WorldContent<'a> {
    tiles: &'a [Vec<Tile>],
    heightmap: &'a [Vec<f64>],
    pois: &'a [Poi],
    roads: &'a [Road],
    zones: &'a [Zone],
    spawn_points: &'a [SpawnPoint],
}

fn sha384_hex<T: Serialize>(value: &T) -> Result<String> {
    let bytes = serde_json::to_vec(value)?;
    Ok(hex::encode(Sha384::digest(&bytes)))
}

/// SHA-384 over the generated content of a world (everything except weather,
/// time of day and identifiers).
pub fn world_checksum(
    tiles: &[Vec<Tile>],
    heightmap: &[Vec<f64>],
    pois: &[Poi],
    roads: &[Road],
    zones: &[Zone],
    spawn_points: &[SpawnPoint],
) -> Result<String> {
    sha384_hex(&WorldContent {
        tiles,
        heightmap,
        pois,
        roads,
        zones,
        spawn_points,
    })
}

/// Recompute the content checksum of an existing world.
pub fn verify_world(world: &World) -> Result<bool> {
    let expected = world_checksum(
        &world.tiles,
        &world.heightmap,
        &world.pois,
        &world.roads,
        &world.zones,
        &world.spawn_points,
    )?;
    Ok(expected == world.checksum)
}

#[derive(Serialize)]
struct ResultDigest<'a> {
    world_checksum: &'a str,
    entity_count: usize,
    narrative_id: &'a str,
}

/// SHA-384 identifying a whole generation result.
pub fn result_checksum(world: &World, entities: &[Entity], narrative: &Narrative) -> Result<String> {
    sha384_hex(&ResultDigest {
        world_checksum: &world.checksum,
        entity_count: entities.len(),
        narrative_id: &narrative.id,
    })
}

#[derive(Serialize)]
struct StateDigest<'a> {
    world_checksum: &'a str,
    entity_count: usize,
    entity_health_sum: f64,
    narrative_tension: f64,
    timestamp: u64,
}

/// Short SHA-256 over the live state of a simulation.
///
/// Two snapshots with the same world, living roster size, total health,
/// tension and timestamp hash identically.
pub fn state_checksum(
    world: &World,
    entities: &[Entity],
    narrative: &Narrative,
    timestamp_ms: u64,
) -> Result<String> {
    let digest = StateDigest {
        world_checksum: &world.checksum,
        entity_count: entities.iter().filter(|e| e.alive).count(),
        entity_health_sum: entities.iter().map(|e| e.stats.health).sum(),
        narrative_tension: narrative.global_tension,
        timestamp: timestamp_ms,
    };
    let bytes = serde_json::to_vec(&digest)?;
    let mut hex = hex::encode(Sha256::digest(&bytes));
    hex.truncate(16);
    Ok(hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{generate_entities, EntityOptions};
    use crate::narrative::{generate_narrative, NarrativeOptions};
    use crate::rng::SeededRng;
    use crate::world::{generate_world, WorldOptions};

    fn state(seed: u64) -> (World, Vec<Entity>, Narrative) {
        let mut rng = SeededRng::new(seed);
        let options = WorldOptions {
            width: 24,
            height: 24,
            ..WorldOptions::default()
        };
        let world = generate_world(&mut rng, &options).unwrap();
        let entities = generate_entities(&mut rng.fork("entities"), &world, &EntityOptions::default());
        let narrative =
            generate_narrative(&mut rng.fork("narrative"), &world, &NarrativeOptions::default());
        (world, entities, narrative)
    }

    #[test]
    fn test_world_checksum_verifies_and_detects_edits() {
        let (mut world, _, _) = state(3);
        assert_eq!(world.checksum.len(), 96);
        assert!(verify_world(&world).unwrap());

        // Weather is not content.
        world.weather.intensity = 0.99;
        assert!(verify_world(&world).unwrap());

        world.heightmap[0][0] += 0.01;
        assert!(!verify_world(&world).unwrap());
    }

    #[test]
    fn test_result_checksum_is_stable() {
        let (world, entities, narrative) = state(11);
        let a = result_checksum(&world, &entities, &narrative).unwrap();
        let b = result_checksum(&world, &entities, &narrative).unwrap();
        assert_eq!(a, b);
        let fewer = result_checksum(&world, &entities[..entities.len() / 2], &narrative).unwrap();
        if !entities.is_empty() {
            assert_ne!(a, fewer);
        }
    }

    #[test]
    fn test_state_checksum_tracks_live_state() {
        let (world, mut entities, narrative) = state(21);
        let base = state_checksum(&world, &entities, &narrative, 0).unwrap();
        assert_eq!(base.len(), 16);
        assert_eq!(base, state_checksum(&world, &entities, &narrative, 0).unwrap());
        assert_ne!(base, state_checksum(&world, &entities, &narrative, 1).unwrap());

        if let Some(first) = entities.first_mut() {
            first.stats.health -= 1.0;
            assert_ne!(base, state_checksum(&world, &entities, &narrative, 0).unwrap());
        }
    }

    #[test]
    fn test_dead_entities_leave_the_live_count() {
        let (world, mut entities, narrative) = state(22);
        if entities.is_empty() {
            return;
        }
        let before = state_checksum(&world, &entities, &narrative, 5).unwrap();
        // Same health sum, one fewer alive.
        entities[0].alive = false;
        let after = state_checksum(&world, &entities, &narrative, 5).unwrap();
        assert_ne!(before, after);
    }
}

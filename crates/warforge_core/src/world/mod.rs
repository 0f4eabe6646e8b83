//! Procedural world generation.
//!
//! Order matters for reproducibility: heightmap, biome map, tiles, zones,
//! POIs, roads, spawn points, weather, then road carving and zone
//! assignment, the content checksum and finally the time of day.

pub mod biome;
mod features;

use crate::checksum::world_checksum;
use crate::error::Result;
use crate::noise::{noise2d, octave_noise};
use crate::rng::SeededRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use warforge_data::{Biome, Dimensions, Tile, World};

pub use features::trace_road;

/// Knobs for [`generate_world`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldOptions {
    pub width: u32,
    pub height: u32,
    /// Chosen by the RNG when absent.
    pub primary_biome: Option<Biome>,
    /// Scales POI count per zone.
    pub density: f64,
    /// Scales POI defences.
    pub difficulty: f64,
}

impl Default for WorldOptions {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            primary_biome: None,
            density: 0.5,
            difficulty: 0.5,
        }
    }
}

const HEIGHT_EXTREME_HIGH: f64 = 0.8;
const HEIGHT_EXTREME_LOW: f64 = 0.15;
const SECONDARY_BIOME_BELOW: f64 = 0.3;
const RESOURCE_CHANCE: f64 = 0.1;

fn generate_heightmap(seed: u64, width: u32, height: u32) -> Vec<Vec<f64>> {
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let (fx, fy) = (x as f64, y as f64);
                    let base = octave_noise(seed, fx * 0.1, fy * 0.1, 4, 0.5);
                    let detail = noise2d(seed.wrapping_add(1), fx * 0.3, fy * 0.3, 1.0) * 0.2;
                    (base + detail).clamp(0.0, 1.0)
                })
                .collect()
        })
        .collect()
}

fn generate_biome_map(
    rng: &mut SeededRng,
    primary: Biome,
    heightmap: &[Vec<f64>],
) -> Vec<Vec<Biome>> {
    let secondary = biome::compatible(primary);
    let variation_seed = rng.seed().wrapping_add(2);

    heightmap
        .iter()
        .enumerate()
        .map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(|(x, &h)| {
                    if h > HEIGHT_EXTREME_HIGH {
                        return Biome::Mountains;
                    }
                    if h < HEIGHT_EXTREME_LOW {
                        return Biome::Wetlands;
                    }
                    let variation = noise2d(variation_seed, x as f64 * 0.05, y as f64 * 0.05, 1.0);
                    if variation < SECONDARY_BIOME_BELOW {
                        rng.pick(secondary).copied().unwrap_or(primary)
                    } else {
                        primary
                    }
                })
                .collect()
        })
        .collect()
}

fn generate_tiles(
    rng: &mut SeededRng,
    heightmap: &[Vec<f64>],
    biome_map: &[Vec<Biome>],
) -> Vec<Vec<Tile>> {
    heightmap
        .iter()
        .zip(biome_map)
        .enumerate()
        .map(|(y, (heights, biomes))| {
            heights
                .iter()
                .zip(biomes)
                .enumerate()
                .map(|(x, (&h, &biome))| {
                    let profile = biome::profile(biome);
                    let terrain = rng
                        .pick(profile.terrains)
                        .copied()
                        .unwrap_or(warforge_data::Terrain::Path);
                    let passable = h < profile.passable_below && !terrain.is_blocking();

                    let mut resources = Vec::new();
                    if rng.next_bool(RESOURCE_CHANCE) {
                        if let Some(r) = rng.pick(profile.resources) {
                            resources.push(r.to_string());
                        }
                    }

                    Tile {
                        x: x as i32,
                        y: y as i32,
                        height: h,
                        biome,
                        terrain,
                        passable,
                        cover: biome::cover_for(terrain),
                        resources,
                    }
                })
                .collect()
        })
        .collect()
}

/// Build a complete world from `rng`.
///
/// Identical seeds and options give identical worlds, down to the checksum.
pub fn generate_world(rng: &mut SeededRng, options: &WorldOptions) -> Result<World> {
    let (width, height) = (options.width, options.height);
    let primary = match options.primary_biome {
        Some(biome) => biome,
        None => rng
            .pick(biome::DEFAULT_PRIMARIES)
            .copied()
            .unwrap_or(Biome::Urban),
    };

    let heightmap = generate_heightmap(rng.seed(), width, height);
    let biome_map = generate_biome_map(rng, primary, &heightmap);
    let mut tiles = generate_tiles(rng, &heightmap, &biome_map);
    let mut zones = features::generate_zones(rng, width, height, &biome_map);
    let mut pois = features::generate_pois(rng, &zones, &tiles, options.density, options.difficulty);
    let roads = features::generate_roads(rng, &pois);
    let spawn_points = features::generate_spawn_points(rng, &mut pois);
    let weather = features::generate_weather(rng, primary);

    features::carve_roads(&mut tiles, &roads);
    features::assign_pois_to_zones(&mut zones, &pois);

    let checksum = world_checksum(&tiles, &heightmap, &pois, &roads, &zones, &spawn_points)?;
    let time_of_day = rng.next_float(0.0, 24.0);

    let seed_hex = rng.seed_hex();
    let world = World {
        id: format!("world_{}", &seed_hex[..seed_hex.len().min(8)]),
        seed: rng.seed().to_string(),
        dimensions: Dimensions { width, height },
        primary_biome: primary,
        tiles,
        heightmap,
        zones,
        pois,
        roads,
        spawn_points,
        weather,
        time_of_day,
        checksum,
    };

    tracing::debug!(
        world = %world.id,
        biome = %primary,
        pois = world.pois.len(),
        roads = world.roads.len(),
        spawns = world.spawn_points.len(),
        "World generated"
    );

    Ok(world)
}

/// Short description of a world for logs and CLI output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSummary {
    /// `"{width}x{height}"`.
    pub dimensions: String,
    pub tile_count: usize,
    pub poi_count: usize,
    pub road_count: usize,
    pub spawn_count: usize,
    /// Distinct biomes present on the map, sorted.
    pub biomes: Vec<Biome>,
    /// e.g. `"rain (40%)"`.
    pub weather: String,
}

pub fn summarize_world(world: &World) -> WorldSummary {
    let biomes: BTreeSet<Biome> = world.tiles.iter().flatten().map(|t| t.biome).collect();

    WorldSummary {
        dimensions: format!("{}x{}", world.dimensions.width, world.dimensions.height),
        tile_count: world.tile_count(),
        poi_count: world.pois.len(),
        road_count: world.roads.len(),
        spawn_count: world.spawn_points.len(),
        biomes: biomes.into_iter().collect(),
        weather: format!(
            "{} ({}%)",
            world.weather.condition,
            (world.weather.intensity * 100.0).round() as i64
        ),
    }
}

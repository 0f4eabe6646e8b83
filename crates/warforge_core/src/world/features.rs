//! Zones, points of interest, roads, spawn points and weather.

use super::biome::{self, ROAD_COVER};
use crate::rng::SeededRng;
use std::cmp::Ordering;
use warforge_data::{
    Biome, Bounds, EntityKind, GridPos, Poi, PoiType, Road, RoadTier, SpawnPoint, Terrain, Tile,
    Weather, WeatherCondition, Zone,
};

const ROAD_HUBS: usize = 5;
const ROAD_JOG_CHANCE: f64 = 0.2;
const SPAWN_FACTIONS: &[&str] = &["alpha", "bravo", "hostile", "neutral"];
const SPAWN_KINDS: &[EntityKind] = &[EntityKind::Infantry, EntityKind::Scout, EntityKind::Heavy];

pub(super) fn zone_size(width: u32, height: u32) -> u32 {
    (width.min(height) / 4).max(8)
}

pub(super) fn generate_zones(
    rng: &mut SeededRng,
    width: u32,
    height: u32,
    biome_map: &[Vec<Biome>],
) -> Vec<Zone> {
    let size = zone_size(width, height);
    let mut zones = Vec::new();

    for zy in 0..height.div_ceil(size) {
        for zx in 0..width.div_ceil(size) {
            let bounds = Bounds {
                min_x: (zx * size) as i32,
                min_y: (zy * size) as i32,
                max_x: ((zx + 1) * size - 1).min(width - 1) as i32,
                max_y: ((zy + 1) * size - 1).min(height - 1) as i32,
            };
            let cx = ((bounds.min_x + bounds.max_x) / 2) as usize;
            let cy = ((bounds.min_y + bounds.max_y) / 2) as usize;
            let row = (b'A' + (zy % 26) as u8) as char;

            zones.push(Zone {
                id: format!("zone_{zx}_{zy}"),
                name: format!("Sector {row}{}", zx + 1),
                bounds,
                biome: biome_map[cy][cx],
                threat_level: rng.next_float(0.1, 0.9),
                controlled_by: None,
                pois: Vec::new(),
            });
        }
    }

    zones
}

/// Scatter up to three POIs per zone on passable interior tiles.
pub(super) fn generate_pois(
    rng: &mut SeededRng,
    zones: &[Zone],
    tiles: &[Vec<Tile>],
    density: f64,
    difficulty: f64,
) -> Vec<Poi> {
    let mut pois = Vec::new();

    for zone in zones {
        let profile = biome::profile(zone.biome);
        let count = (rng.next_float(1.0, 4.0) * density).floor().max(0.0) as usize;

        for _ in 0..count {
            let x = rng.next_int(zone.bounds.min_x as i64 + 2, zone.bounds.max_x as i64 - 2) as i32;
            let y = rng.next_int(zone.bounds.min_y as i64 + 2, zone.bounds.max_y as i64 - 2) as i32;

            let passable = tile_at(tiles, x, y).is_some_and(|t| t.passable);
            if !passable {
                continue;
            }

            let kind = rng.pick(profile.poi_types).copied().unwrap_or(PoiType::Landmark);
            let name = rng.pick(biome::poi_names(kind)).copied().unwrap_or("Landmark");
            let radius = rng.next_int(2, 5) as i32;
            let importance = rng.next_float(0.3, 1.0);

            let mut resources: Vec<String> = profile.resources.iter().map(|r| r.to_string()).collect();
            rng.shuffle(&mut resources);
            resources.truncate(rng.next_int(1, 3) as usize);

            let defenses = (rng.next() * difficulty * 10.0).floor().max(0.0) as u32;
            let population = rng.next_int(5, 50) as u32;

            pois.push(Poi {
                id: format!("poi_{}", pois.len()),
                name: name.to_string(),
                kind,
                x,
                y,
                radius,
                faction: None,
                importance,
                resources,
                defenses,
                population,
            });
        }
    }

    pois
}

fn tile_at(tiles: &[Vec<Tile>], x: i32, y: i32) -> Option<&Tile> {
    if x < 0 || y < 0 {
        return None;
    }
    tiles.get(y as usize)?.get(x as usize)
}

/// One 4-connected step toward `to`. `prefer_x` picks the axis when both
/// still need to move; `None` takes the longer axis.
fn step_toward(pos: GridPos, to: GridPos, prefer_x: Option<bool>) -> GridPos {
    let dx = to.x - pos.x;
    let dy = to.y - pos.y;
    let move_x = match prefer_x {
        Some(true) => dx != 0,
        Some(false) => dy == 0,
        None => dx.abs() > dy.abs(),
    };
    if move_x {
        GridPos::new(pos.x + dx.signum(), pos.y)
    } else {
        GridPos::new(pos.x, pos.y + dy.signum())
    }
}

/// Greedy Manhattan walk with random extra jogs. Every step shortens the
/// remaining distance, so the walk always terminates at `to`.
pub fn trace_road(rng: &mut SeededRng, from: GridPos, to: GridPos) -> Vec<GridPos> {
    let mut points = Vec::new();
    let mut pos = from;

    while pos != to {
        points.push(pos);
        pos = step_toward(pos, to, None);

        if pos != to && rng.next_bool(ROAD_JOG_CHANCE) {
            let prefer_x = rng.next_bool(0.5);
            points.push(pos);
            pos = step_toward(pos, to, Some(prefer_x));
        }
    }
    points.push(to);
    points
}

/// Chain the most important POIs together, highest importance first.
pub(super) fn generate_roads(rng: &mut SeededRng, pois: &[Poi]) -> Vec<Road> {
    let mut ranked: Vec<&Poi> = pois.iter().collect();
    ranked.sort_by(|a, b| b.importance.partial_cmp(&a.importance).unwrap_or(Ordering::Equal));
    ranked.truncate(ROAD_HUBS);

    let mut roads = Vec::new();
    for (i, pair) in ranked.windows(2).enumerate() {
        let (start, end) = (pair[0], pair[1]);
        let points = trace_road(rng, GridPos::new(start.x, start.y), GridPos::new(end.x, end.y));

        roads.push(Road {
            id: format!("road_{}", roads.len()),
            points,
            tier: if i == 0 { RoadTier::Highway } else { RoadTier::Main },
            condition: rng.next_float(0.5, 1.0),
            connects: [start.id.clone(), end.id.clone()],
        });
    }

    roads
}

pub(super) fn carve_roads(tiles: &mut [Vec<Tile>], roads: &[Road]) {
    for point in roads.iter().flat_map(|r| r.points.iter()) {
        if point.x < 0 || point.y < 0 {
            continue;
        }
        if let Some(tile) = tiles
            .get_mut(point.y as usize)
            .and_then(|row| row.get_mut(point.x as usize))
        {
            tile.terrain = Terrain::Road;
            tile.passable = true;
            tile.cover = ROAD_COVER;
        }
    }
}

/// Garrison every base and outpost, claiming it for a random faction.
pub(super) fn generate_spawn_points(rng: &mut SeededRng, pois: &mut [Poi]) -> Vec<SpawnPoint> {
    let mut spawns = Vec::new();

    for poi in pois
        .iter_mut()
        .filter(|p| matches!(p.kind, PoiType::Base | PoiType::Outpost))
    {
        let faction = rng.pick(SPAWN_FACTIONS).copied().unwrap_or("neutral").to_string();
        poi.faction = Some(faction.clone());

        let count = rng.next_int(2, 5);
        for _ in 0..count {
            let x = poi.x + rng.next_int(-2, 2) as i32;
            let y = poi.y + rng.next_int(-2, 2) as i32;
            let kind = rng.pick(SPAWN_KINDS).copied().unwrap_or(EntityKind::Infantry);
            spawns.push(SpawnPoint {
                x,
                y,
                faction: faction.clone(),
                kind,
            });
        }
    }

    spawns
}

pub(super) fn generate_weather(rng: &mut SeededRng, primary: Biome) -> Weather {
    let condition = rng
        .pick(biome::weather_palette(primary))
        .copied()
        .unwrap_or(WeatherCondition::Clear);

    let intensity = rng.next_float(0.2, 0.8);
    let wind_speed = rng.next_float(0.0, 30.0);
    let wind_direction = rng.next_float(0.0, 360.0);
    let visibility = match condition {
        WeatherCondition::Fog => rng.next_float(0.1, 0.4),
        WeatherCondition::Storm => rng.next_float(0.3, 0.6),
        _ => rng.next_float(0.7, 1.0),
    };
    let temperature = match primary {
        Biome::Arctic => rng.next_float(-30.0, 0.0),
        Biome::Desert => rng.next_float(25.0, 45.0),
        _ => rng.next_float(10.0, 25.0),
    };

    Weather {
        condition,
        intensity,
        wind_speed,
        wind_direction,
        visibility,
        temperature,
    }
}

/// First containing zone wins. A garrisoned POI hands its faction to the zone.
pub(super) fn assign_pois_to_zones(zones: &mut [Zone], pois: &[Poi]) {
    for poi in pois {
        if let Some(zone) = zones.iter_mut().find(|z| z.bounds.contains(poi.x, poi.y)) {
            zone.pois.push(poi.id.clone());
            if let Some(faction) = &poi.faction {
                zone.controlled_by = Some(faction.clone());
            }
        }
    }
}

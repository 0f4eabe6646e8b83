use super::entity::EntityKind;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
/// Terrain and climate category driving tile, resource and POI selection.
pub enum Biome {
    Urban,
    Suburban,
    Industrial,
    Commercial,
    Forest,
    Jungle,
    Desert,
    Arctic,
    Tundra,
    Mountains,
    Plains,
    Wetlands,
    Coastal,
    Underground,
    Facility,
    Ruins,
}

string_enum!(Biome {
    Urban => "urban",
    Suburban => "suburban",
    Industrial => "industrial",
    Commercial => "commercial",
    Forest => "forest",
    Jungle => "jungle",
    Desert => "desert",
    Arctic => "arctic",
    Tundra => "tundra",
    Mountains => "mountains",
    Plains => "plains",
    Wetlands => "wetlands",
    Coastal => "coastal",
    Underground => "underground",
    Facility => "facility",
    Ruins => "ruins",
});

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// Surface material of a single tile.
pub enum Terrain {
    Road,
    Path,
    Building,
    Vegetation,
    Water,
    Rock,
    Sand,
    Snow,
    Mud,
    Concrete,
    Metal,
    Rubble,
}

string_enum!(Terrain {
    Road => "road",
    Path => "path",
    Building => "building",
    Vegetation => "vegetation",
    Water => "water",
    Rock => "rock",
    Sand => "sand",
    Snow => "snow",
    Mud => "mud",
    Concrete => "concrete",
    Metal => "metal",
    Rubble => "rubble",
});

impl Terrain {
    /// Water and rock block movement regardless of height.
    pub fn is_blocking(self) -> bool {
        matches!(self, Terrain::Water | Terrain::Rock)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PoiType {
    Base,
    Outpost,
    Checkpoint,
    Depot,
    Settlement,
    Bunker,
    Factory,
    Hospital,
    Communications,
    PowerPlant,
    WaterSource,
    Extraction,
    Research,
    Ruins,
    Landmark,
}

string_enum!(PoiType {
    Base => "base",
    Outpost => "outpost",
    Checkpoint => "checkpoint",
    Depot => "depot",
    Settlement => "settlement",
    Bunker => "bunker",
    Factory => "factory",
    Hospital => "hospital",
    Communications => "communications",
    PowerPlant => "power_plant",
    WaterSource => "water_source",
    Extraction => "extraction",
    Research => "research",
    Ruins => "ruins",
    Landmark => "landmark",
});

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RoadTier {
    Highway,
    Main,
}

string_enum!(RoadTier {
    Highway => "highway",
    Main => "main",
});

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Cloudy,
    Rain,
    Storm,
    Snow,
    Fog,
    Sandstorm,
}

string_enum!(WeatherCondition {
    Clear => "clear",
    Cloudy => "cloudy",
    Rain => "rain",
    Storm => "storm",
    Snow => "snow",
    Fog => "fog",
    Sandstorm => "sandstorm",
});

/// Integer grid coordinate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// One cell of the world grid.
pub struct Tile {
    pub x: i32,
    pub y: i32,
    /// Normalised elevation in `[0, 1]`.
    pub height: f64,
    pub biome: Biome,
    pub terrain: Terrain,
    pub passable: bool,
    /// Fraction of incoming fire blocked by this tile, `[0, 1]`.
    pub cover: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    /// Inclusive on all four edges.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// Rectangular partition of the grid.
pub struct Zone {
    pub id: String,
    /// Human label, e.g. `Sector B3`.
    pub name: String,
    pub bounds: Bounds,
    /// Biome found at the zone centroid.
    pub biome: Biome,
    pub threat_level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controlled_by: Option<String>,
    /// Ids of the POIs assigned to this zone (first match wins).
    pub pois: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// Named location of strategic or narrative weight.
pub struct Poi {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PoiType,
    pub x: i32,
    pub y: i32,
    pub radius: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    pub importance: f64,
    pub resources: Vec<String>,
    pub defenses: u32,
    pub population: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Road {
    pub id: String,
    /// Ordered, 4-connected path from the first POI to the second.
    pub points: Vec<GridPos>,
    #[serde(rename = "type")]
    pub tier: RoadTier,
    pub condition: f64,
    /// `[from, to]` POI ids.
    pub connects: [String; 2],
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// Location where a faction's units appear at generation time.
pub struct SpawnPoint {
    pub x: i32,
    pub y: i32,
    pub faction: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Weather {
    pub condition: WeatherCondition,
    pub intensity: f64,
    pub wind_speed: f64,
    /// Degrees, `[0, 360)`.
    pub wind_direction: f64,
    pub visibility: f64,
    /// Celsius.
    pub temperature: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// A fully generated tactical map.
///
/// For a fixed seed and generation options every field is reproducible,
/// which `checksum` attests.
pub struct World {
    pub id: String,
    /// Decimal string of the numeric seed.
    pub seed: String,
    pub dimensions: Dimensions,
    pub primary_biome: Biome,
    /// Row-major: `tiles[y][x]`.
    pub tiles: Vec<Vec<Tile>>,
    /// Row-major: `heightmap[y][x]`.
    pub heightmap: Vec<Vec<f64>>,
    pub zones: Vec<Zone>,
    pub pois: Vec<Poi>,
    pub roads: Vec<Road>,
    pub spawn_points: Vec<SpawnPoint>,
    pub weather: Weather,
    /// Hours, `[0, 24)`.
    pub time_of_day: f64,
    pub checksum: String,
}

impl World {
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        if x < 0 || y < 0 {
            return None;
        }
        self.tiles.get(y as usize)?.get(x as usize)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.iter().map(Vec::len).sum()
    }

    pub fn poi(&self, id: &str) -> Option<&Poi> {
        self.pois.iter().find(|p| p.id == id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
/// Partial update to a world produced by an override.
pub struct WorldPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_biome: Option<Biome>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pois_added: Vec<Poi>,
}

impl WorldPatch {
    pub fn is_empty(&self) -> bool {
        self.weather.is_none()
            && self.time_of_day.is_none()
            && self.primary_biome.is_none()
            && self.pois_added.is_empty()
    }
}

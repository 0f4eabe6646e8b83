//! Static per-biome tables: terrain palettes, resources, POI palettes,
//! neighbouring biomes and weather.

use warforge_data::{Biome, PoiType, Terrain, WeatherCondition};

pub struct BiomeProfile {
    pub terrains: &'static [Terrain],
    pub resources: &'static [&'static str],
    pub poi_types: &'static [PoiType],
    /// Tiles at or above this height are impassable.
    pub passable_below: f64,
}

use PoiType as P;
use Terrain as T;

pub fn profile(biome: Biome) -> BiomeProfile {
    match biome {
        Biome::Urban => BiomeProfile {
            terrains: &[T::Road, T::Building, T::Concrete],
            resources: &["supplies", "fuel", "electronics"],
            poi_types: &[P::Base, P::Checkpoint, P::Hospital],
            passable_below: 0.7,
        },
        Biome::Suburban => BiomeProfile {
            terrains: &[T::Road, T::Building, T::Vegetation],
            resources: &["supplies", "fuel"],
            poi_types: &[P::Settlement, P::Depot],
            passable_below: 0.8,
        },
        Biome::Industrial => BiomeProfile {
            terrains: &[T::Concrete, T::Metal, T::Road],
            resources: &["fuel", "materials", "electronics"],
            poi_types: &[P::Factory, P::Depot, P::PowerPlant],
            passable_below: 0.6,
        },
        Biome::Commercial => BiomeProfile {
            terrains: &[T::Road, T::Building, T::Concrete],
            resources: &["supplies", "electronics"],
            poi_types: &[P::Settlement, P::Depot],
            passable_below: 0.75,
        },
        Biome::Forest => BiomeProfile {
            terrains: &[T::Vegetation, T::Path, T::Rock],
            resources: &["wood", "food", "water"],
            poi_types: &[P::Outpost, P::Ruins, P::Landmark],
            passable_below: 0.5,
        },
        Biome::Jungle => BiomeProfile {
            terrains: &[T::Vegetation, T::Water, T::Mud],
            resources: &["food", "water", "medicinal"],
            poi_types: &[P::Ruins, P::Research, P::Extraction],
            passable_below: 0.4,
        },
        Biome::Desert => BiomeProfile {
            terrains: &[T::Sand, T::Rock, T::Path],
            resources: &["fuel", "minerals"],
            poi_types: &[P::Outpost, P::Extraction, P::Ruins],
            passable_below: 0.85,
        },
        Biome::Arctic => BiomeProfile {
            terrains: &[T::Snow, T::Rock, T::Path],
            resources: &["fuel", "water"],
            poi_types: &[P::Base, P::Research, P::Bunker],
            passable_below: 0.7,
        },
        Biome::Tundra => BiomeProfile {
            terrains: &[T::Snow, T::Mud, T::Vegetation],
            resources: &["fuel", "food"],
            poi_types: &[P::Outpost, P::Settlement],
            passable_below: 0.6,
        },
        Biome::Mountains => BiomeProfile {
            terrains: &[T::Rock, T::Snow, T::Path],
            resources: &["minerals", "water"],
            poi_types: &[P::Bunker, P::Communications, P::Landmark],
            passable_below: 0.3,
        },
        Biome::Plains => BiomeProfile {
            terrains: &[T::Vegetation, T::Path, T::Road],
            resources: &["food", "water"],
            poi_types: &[P::Settlement, P::Outpost, P::Depot],
            passable_below: 0.9,
        },
        Biome::Wetlands => BiomeProfile {
            terrains: &[T::Water, T::Mud, T::Vegetation],
            resources: &["food", "water", "medicinal"],
            poi_types: &[P::Outpost, P::Extraction],
            passable_below: 0.4,
        },
        Biome::Coastal => BiomeProfile {
            terrains: &[T::Sand, T::Water, T::Rock],
            resources: &["food", "water", "fuel"],
            poi_types: &[P::Base, P::Depot, P::Settlement],
            passable_below: 0.6,
        },
        Biome::Underground => BiomeProfile {
            terrains: &[T::Rock, T::Concrete, T::Metal],
            resources: &["minerals", "electronics"],
            poi_types: &[P::Bunker, P::Research, P::Depot],
            passable_below: 0.5,
        },
        Biome::Facility => BiomeProfile {
            terrains: &[T::Concrete, T::Metal, T::Road],
            resources: &["electronics", "supplies", "fuel"],
            poi_types: &[P::Base, P::Research, P::Factory],
            passable_below: 0.8,
        },
        Biome::Ruins => BiomeProfile {
            terrains: &[T::Rubble, T::Concrete, T::Vegetation],
            resources: &["materials", "supplies"],
            poi_types: &[P::Ruins, P::Landmark, P::Extraction],
            passable_below: 0.5,
        },
    }
}

/// Biomes allowed to appear in patches inside a world whose primary biome is `primary`.
pub fn compatible(primary: Biome) -> &'static [Biome] {
    use Biome::*;
    match primary {
        Urban => &[Suburban, Industrial, Commercial],
        Suburban => &[Urban, Plains, Forest],
        Industrial => &[Urban, Commercial],
        Commercial => &[Urban, Suburban],
        Forest => &[Plains, Mountains, Wetlands],
        Jungle => &[Wetlands, Mountains, Ruins],
        Desert => &[Ruins, Mountains],
        Arctic => &[Tundra, Mountains],
        Tundra => &[Arctic, Plains],
        Mountains => &[Forest, Arctic, Tundra],
        Plains => &[Forest, Suburban, Wetlands],
        Wetlands => &[Plains, Jungle, Coastal],
        Coastal => &[Wetlands, Urban, Plains],
        Underground => &[Facility, Ruins],
        Facility => &[Underground, Industrial],
        Ruins => &[Forest, Desert, Jungle],
    }
}

/// Candidates when the caller does not name a primary biome.
pub const DEFAULT_PRIMARIES: &[Biome] = &[
    Biome::Urban,
    Biome::Forest,
    Biome::Desert,
    Biome::Arctic,
    Biome::Facility,
];

pub fn weather_palette(biome: Biome) -> &'static [WeatherCondition] {
    use WeatherCondition::*;
    match biome {
        Biome::Urban | Biome::Suburban | Biome::Plains => &[Clear, Cloudy, Rain],
        Biome::Industrial => &[Cloudy, Fog, Rain],
        Biome::Commercial => &[Clear, Cloudy],
        Biome::Forest => &[Clear, Rain, Fog],
        Biome::Jungle => &[Rain, Storm, Fog],
        Biome::Desert => &[Clear, Sandstorm],
        Biome::Arctic => &[Snow, Clear, Storm],
        Biome::Tundra => &[Snow, Cloudy, Fog],
        Biome::Mountains => &[Clear, Snow, Storm],
        Biome::Wetlands => &[Fog, Rain, Cloudy],
        Biome::Coastal => &[Clear, Rain, Storm],
        Biome::Underground | Biome::Facility => &[Clear],
        Biome::Ruins => &[Fog, Cloudy, Rain],
    }
}

/// Cover of a freshly generated tile. Carved roads use [`ROAD_COVER`].
pub fn cover_for(terrain: Terrain) -> f64 {
    match terrain {
        Terrain::Building => 0.9,
        Terrain::Rock => 0.7,
        Terrain::Vegetation => 0.6,
        _ => 0.2,
    }
}

pub const ROAD_COVER: f64 = 0.1;

pub fn poi_names(kind: PoiType) -> &'static [&'static str] {
    match kind {
        P::Base => &["Alpha Base", "Forward Command", "Camp Delta", "HQ Bravo", "Firebase Echo"],
        P::Outpost => &["Observation Post", "Watchtower", "Scout Camp", "Lookout Point", "Ranger Station"],
        P::Checkpoint => &["Gate Alpha", "Security Station", "Border Control", "Access Point", "Guard Post"],
        P::Depot => &["Supply Depot", "Logistics Hub", "Storage Facility", "Warehouse District", "Distribution Center"],
        P::Settlement => &["Haven", "Refuge", "Sanctuary", "Community Center", "Township"],
        P::Bunker => &["Bunker Complex", "Underground Shelter", "Hardened Facility", "Safe House", "Vault"],
        P::Factory => &["Manufacturing Plant", "Assembly Facility", "Production Center", "Workshop", "Foundry"],
        P::Hospital => &["Medical Center", "Field Hospital", "Clinic", "Treatment Facility", "Trauma Center"],
        P::Communications => &["Comms Tower", "Signal Station", "Broadcast Center", "Relay Point", "Network Hub"],
        P::PowerPlant => &["Power Station", "Generator Complex", "Energy Facility", "Substation", "Reactor"],
        P::WaterSource => &["Water Treatment", "Reservoir", "Spring", "Pumping Station", "Well Site"],
        P::Extraction => &["Mining Site", "Extraction Point", "Drill Site", "Resource Depot", "Processing Plant"],
        P::Research => &["Research Lab", "Science Facility", "Testing Ground", "Development Center", "Institute"],
        P::Ruins => &["Ancient Ruins", "Collapsed Structure", "Old Town", "Abandoned Site", "Remnants"],
        P::Landmark => &["Monument", "Historic Site", "Scenic Point", "Memorial", "Natural Wonder"],
    }
}

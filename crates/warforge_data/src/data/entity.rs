use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
/// The fourteen unit archetypes.
pub enum EntityKind {
    Infantry,
    Scout,
    Sniper,
    Heavy,
    Medic,
    Engineer,
    Officer,
    Civilian,
    Vip,
    Hostile,
    VehicleLight,
    VehicleHeavy,
    Aircraft,
    Drone,
}

string_enum!(EntityKind {
    Infantry => "infantry",
    Scout => "scout",
    Sniper => "sniper",
    Heavy => "heavy",
    Medic => "medic",
    Engineer => "engineer",
    Officer => "officer",
    Civilian => "civilian",
    Vip => "vip",
    Hostile => "hostile",
    VehicleLight => "vehicle_light",
    VehicleHeavy => "vehicle_heavy",
    Aircraft => "aircraft",
    Drone => "drone",
});

impl EntityKind {
    pub fn is_vehicle(self) -> bool {
        matches!(
            self,
            EntityKind::VehicleLight | EntityKind::VehicleHeavy | EntityKind::Aircraft | EntityKind::Drone
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// Behavior state tag. Every variant has tick logic, even if it is only idling.
pub enum BehaviorKind {
    Idle,
    Patrol,
    Guard,
    Search,
    Pursue,
    Engage,
    Cover,
    Retreat,
    Flank,
    Support,
    Heal,
    Repair,
    Follow,
    Escort,
    Investigate,
}

string_enum!(BehaviorKind {
    Idle => "idle",
    Patrol => "patrol",
    Guard => "guard",
    Search => "search",
    Pursue => "pursue",
    Engage => "engage",
    Cover => "cover",
    Retreat => "retreat",
    Flank => "flank",
    Support => "support",
    Heal => "heal",
    Repair => "repair",
    Follow => "follow",
    Escort => "escort",
    Investigate => "investigate",
});

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar distance; `z` is ignored.
    pub fn distance_2d(&self, other: &Vec3) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn distance_to_point(&self, point: Vec2) -> f64 {
        self.distance_2d(&Vec3::new(point.x, point.y, self.z))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EntityStats {
    pub health: f64,
    pub max_health: f64,
    pub stamina: f64,
    /// `[0, 1]`.
    pub morale: f64,
    /// `[0, 1]`.
    pub accuracy: f64,
    /// `[0, 1]`.
    pub stealth: f64,
    /// `[0, 1]`.
    pub perception: f64,
    /// Grid units per second.
    pub speed: f64,
    /// `[0, 1]`.
    pub armor: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Loadout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_weapon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_weapon: Option<String>,
    pub equipment: Vec<String>,
    /// Rounds per ammunition type.
    pub ammo: BTreeMap<String, u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Serialized position of a seeded random stream.
///
/// Restoring a generator from a cursor continues the exact sequence it was
/// taken from.
pub struct RngCursor {
    /// Seed the stream was created with; forks are keyed off it.
    #[serde(with = "crate::serde_u64_string")]
    pub seed: u64,
    /// Live generator state.
    #[serde(with = "crate::serde_u64_string")]
    pub state: u64,
    /// Number of draws taken so far.
    pub draws: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BehaviorState {
    pub current: BehaviorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patrol_route: Vec<Vec2>,
    #[serde(default)]
    pub patrol_index: usize,
    /// `[0, 1]`.
    pub alert_level: f64,
    /// The entity's private random stream.
    pub rng: RngCursor,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// An autonomous unit in the simulation.
///
/// Dead entities stay in the roster with `alive == false`.
pub struct Entity {
    /// Unique within one simulation run.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub name: String,
    pub faction: String,
    pub position: Vec3,
    /// Heading in degrees.
    pub rotation: f64,
    pub stats: EntityStats,
    pub loadout: Loadout,
    pub behavior: BehaviorState,
    pub alive: bool,
    /// Simulation time in milliseconds at which the entity appeared.
    pub spawned_at: u64,
}

impl Entity {
    /// Opposing means a different faction that is not `neutral`.
    pub fn is_hostile_to(&self, other: &Entity) -> bool {
        other.faction != self.faction && other.faction != "neutral"
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
/// Fields of an entity that changed. `None` means untouched.
pub struct EntityPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<BehaviorState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<EntityStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loadout: Option<Loadout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alive: Option<bool>,
}

impl EntityPatch {
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.rotation.is_none()
            && self.behavior.is_none()
            && self.stats.is_none()
            && self.loadout.is_none()
            && self.faction.is_none()
            && self.alive.is_none()
    }

    /// Write every set field onto `entity`.
    pub fn apply_to(&self, entity: &mut Entity) {
        if let Some(position) = self.position {
            entity.position = position;
        }
        if let Some(rotation) = self.rotation {
            entity.rotation = rotation;
        }
        if let Some(behavior) = &self.behavior {
            entity.behavior = behavior.clone();
        }
        if let Some(stats) = self.stats {
            entity.stats = stats;
        }
        if let Some(loadout) = &self.loadout {
            entity.loadout = loadout.clone();
        }
        if let Some(faction) = &self.faction {
            entity.faction = faction.clone();
        }
        if let Some(alive) = self.alive {
            entity.alive = alive;
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EntityUpdate {
    pub id: String,
    pub patch: EntityPatch,
}

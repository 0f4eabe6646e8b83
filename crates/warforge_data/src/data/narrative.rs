use super::world::GridPos;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Friendly,
    Neutral,
    Hostile,
}

string_enum!(Alignment {
    Friendly => "friendly",
    Neutral => "neutral",
    Hostile => "hostile",
});

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Faction {
    pub id: String,
    pub name: String,
    /// CSS hex colour, e.g. `#3B82F6`.
    pub color: String,
    pub alignment: Alignment,
    /// Relation score in `[-1, 1]` towards every other selected faction.
    pub relations: BTreeMap<String, f64>,
    /// `supplies`, `fuel`, `ammo`, `personnel`.
    pub resources: BTreeMap<String, u32>,
    pub controlled_pois: Vec<String>,
    pub population: u32,
    pub military_strength: f64,
    pub tech_level: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MissionType {
    Assault,
    Defend,
    Patrol,
    Recon,
    Extraction,
    Escort,
    Sabotage,
    Rescue,
    Capture,
    Eliminate,
    Supply,
    Training,
}

string_enum!(MissionType {
    Assault => "assault",
    Defend => "defend",
    Patrol => "patrol",
    Recon => "recon",
    Extraction => "extraction",
    Escort => "escort",
    Sabotage => "sabotage",
    Rescue => "rescue",
    Capture => "capture",
    Eliminate => "eliminate",
    Supply => "supply",
    Training => "training",
});

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Pending,
    Active,
    Completed,
    Failed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveTier {
    Primary,
    Secondary,
    Bonus,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Objective {
    pub id: String,
    #[serde(rename = "type")]
    pub tier: ObjectiveTier,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GridPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// Percent, `0..=100`.
    pub progress: u8,
    pub completed: bool,
}

impl Objective {
    pub fn mark_completed(&mut self) {
        self.completed = true;
        self.progress = 100;
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Mission {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MissionType,
    pub name: String,
    pub description: String,
    pub objectives: Vec<Objective>,
    pub primary_faction: String,
    pub opposing_factions: Vec<String>,
    /// POI id.
    pub location: String,
    pub difficulty: f64,
    /// Minutes; only defence missions carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    /// `experience`, `supplies`, `reputation`.
    pub rewards: BTreeMap<String, u32>,
    pub status: MissionStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Battle,
    Treaty,
    Disaster,
    Discovery,
    Betrayal,
    Reinforcement,
}

string_enum!(EventType {
    Battle => "battle",
    Treaty => "treaty",
    Disaster => "disaster",
    Discovery => "discovery",
    Betrayal => "betrayal",
    Reinforcement => "reinforcement",
});

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub id: String,
    /// Minutes since the start of the scenario.
    pub time: u32,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub description: String,
    pub factions_involved: Vec<String>,
    /// Change in standing per faction id.
    pub impact: BTreeMap<String, f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// Factions, missions and history layered over a world.
pub struct Narrative {
    pub id: String,
    pub seed: String,
    pub factions: Vec<Faction>,
    pub missions: Vec<Mission>,
    /// Sorted ascending by `time`.
    pub timeline: Vec<TimelineEvent>,
    pub current_time: u32,
    /// `[0, 1]`.
    pub global_tension: f64,
    /// `"a vs b"` for each opposed pair of non-neutral factions.
    pub active_conflicts: Vec<String>,
    /// Descriptions of the last five timeline events.
    pub recent_events: Vec<String>,
}

impl Narrative {
    pub fn faction(&self, id: &str) -> Option<&Faction> {
        self.factions.iter().find(|f| f.id == id)
    }

    pub fn active_mission(&self) -> Option<&Mission> {
        self.missions.iter().find(|m| m.status == MissionStatus::Active)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AddedObjective {
    pub mission_id: String,
    pub objective: Objective,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
/// Partial update to a narrative produced by an override.
pub struct NarrativePatch {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objectives_added: Vec<AddedObjective>,
    /// Objective ids to mark complete.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objectives_completed: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events_added: Vec<TimelineEvent>,
}

impl NarrativePatch {
    pub fn is_empty(&self) -> bool {
        self.objectives_added.is_empty()
            && self.objectives_completed.is_empty()
            && self.events_added.is_empty()
    }
}

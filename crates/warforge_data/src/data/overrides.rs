use super::entity::{BehaviorKind, Entity, EntityKind, EntityUpdate};
use super::narrative::{EventType, NarrativePatch};
use super::world::{Biome, PoiType, WeatherCondition, WorldPatch};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum OverrideKind {
    SpawnEntity,
    RemoveEntity,
    MoveEntity,
    SetBehavior,
    SetAggression,
    SetFaction,
    SetWeather,
    SetTime,
    TriggerEvent,
    AddObjective,
    CompleteObjective,
    AddPoi,
    Damage,
    Heal,
    Resupply,
}

string_enum!(OverrideKind {
    SpawnEntity => "spawn_entity",
    RemoveEntity => "remove_entity",
    MoveEntity => "move_entity",
    SetBehavior => "set_behavior",
    SetAggression => "set_aggression",
    SetFaction => "set_faction",
    SetWeather => "set_weather",
    SetTime => "set_time",
    TriggerEvent => "trigger_event",
    AddObjective => "add_objective",
    CompleteObjective => "complete_objective",
    AddPoi => "add_poi",
    Damage => "damage",
    Heal => "heal",
    Resupply => "resupply",
});

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RemoveTarget {
    Entity(String),
    /// Every entity, dead or alive, of the named faction.
    Faction(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
/// A typed runtime command. One variant per [`OverrideKind`].
pub enum OverrideCommand {
    SpawnEntity {
        count: u32,
        entity_type: EntityKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<(i64, i64)>,
        faction: String,
        /// Wide `±10` scatter instead of the default `±2`.
        #[serde(default)]
        spread: bool,
    },
    RemoveEntity {
        target: RemoveTarget,
    },
    MoveEntity {
        target: String,
        x: i64,
        y: i64,
    },
    SetBehavior {
        target: String,
        behavior: BehaviorKind,
    },
    SetAggression {
        delta: f64,
    },
    SetFaction {
        target: String,
        faction: String,
    },
    SetWeather {
        condition: WeatherCondition,
        intensity: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        biome_shift: Option<Biome>,
    },
    SetTime {
        hours: f64,
    },
    TriggerEvent {
        event_type: EventType,
        location: String,
    },
    AddObjective {
        description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<(i64, i64)>,
    },
    CompleteObjective {
        objective_id: String,
    },
    AddPoi {
        poi_type: PoiType,
        x: i64,
        y: i64,
    },
    Damage {
        target: String,
        amount: u32,
    },
    Heal {
        target: String,
        amount: u32,
    },
    Resupply {
        target: String,
    },
}

impl OverrideCommand {
    pub fn kind(&self) -> OverrideKind {
        match self {
            OverrideCommand::SpawnEntity { .. } => OverrideKind::SpawnEntity,
            OverrideCommand::RemoveEntity { .. } => OverrideKind::RemoveEntity,
            OverrideCommand::MoveEntity { .. } => OverrideKind::MoveEntity,
            OverrideCommand::SetBehavior { .. } => OverrideKind::SetBehavior,
            OverrideCommand::SetAggression { .. } => OverrideKind::SetAggression,
            OverrideCommand::SetFaction { .. } => OverrideKind::SetFaction,
            OverrideCommand::SetWeather { .. } => OverrideKind::SetWeather,
            OverrideCommand::SetTime { .. } => OverrideKind::SetTime,
            OverrideCommand::TriggerEvent { .. } => OverrideKind::TriggerEvent,
            OverrideCommand::AddObjective { .. } => OverrideKind::AddObjective,
            OverrideCommand::CompleteObjective { .. } => OverrideKind::CompleteObjective,
            OverrideCommand::AddPoi { .. } => OverrideKind::AddPoi,
            OverrideCommand::Damage { .. } => OverrideKind::Damage,
            OverrideCommand::Heal { .. } => OverrideKind::Heal,
            OverrideCommand::Resupply { .. } => OverrideKind::Resupply,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// A parsed command together with its audit trail.
///
/// Only `applied` and `validated` change after creation.
pub struct Override {
    pub id: String,
    pub command: OverrideCommand,
    /// Identity of the issuing user.
    pub issuer: String,
    /// Milliseconds on the simulation clock.
    pub timestamp_ms: u64,
    pub applied: bool,
    pub validated: bool,
}

impl Override {
    pub fn kind(&self) -> OverrideKind {
        self.command.kind()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
/// Pure description of what an override changes. The caller merges it.
pub struct Changeset {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities_added: Vec<Entity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities_removed: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities_modified: Vec<EntityUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world: Option<WorldPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<NarrativePatch>,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.entities_added.is_empty()
            && self.entities_removed.is_empty()
            && self.entities_modified.is_empty()
            && self.world.as_ref().map_or(true, WorldPatch::is_empty)
            && self.narrative.as_ref().map_or(true, NarrativePatch::is_empty)
    }
}

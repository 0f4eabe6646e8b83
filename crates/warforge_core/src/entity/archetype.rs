//! Archetype templates: base stats, loadout variants and starting behaviors.

use warforge_data::{BehaviorKind, EntityKind, Loadout};

pub struct LoadoutTemplate {
    pub primary_weapon: Option<&'static str>,
    pub secondary_weapon: Option<&'static str>,
    pub equipment: &'static [&'static str],
    pub ammo: &'static [(&'static str, u32)],
}

impl LoadoutTemplate {
    pub fn build(&self) -> Loadout {
        Loadout {
            primary_weapon: self.primary_weapon.map(str::to_string),
            secondary_weapon: self.secondary_weapon.map(str::to_string),
            equipment: self.equipment.iter().map(|e| e.to_string()).collect(),
            ammo: self.ammo.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn matches(&self, loadout: &Loadout) -> bool {
        loadout.primary_weapon.as_deref() == self.primary_weapon
            && loadout.secondary_weapon.as_deref() == self.secondary_weapon
    }
}

pub struct Archetype {
    pub max_health: f64,
    pub speed: f64,
    pub accuracy: f64,
    pub stealth: f64,
    pub perception: f64,
    pub armor: f64,
    pub loadouts: &'static [LoadoutTemplate],
    pub behaviors: &'static [BehaviorKind],
}

impl Archetype {
    /// The loadout variant `loadout` was built from, falling back to the first.
    pub fn template_for(&self, loadout: &Loadout) -> Option<&LoadoutTemplate> {
        self.loadouts
            .iter()
            .find(|t| t.matches(loadout))
            .or_else(|| self.loadouts.first())
    }
}

use BehaviorKind as B;

const fn kit(
    primary_weapon: Option<&'static str>,
    secondary_weapon: Option<&'static str>,
    equipment: &'static [&'static str],
    ammo: &'static [(&'static str, u32)],
) -> LoadoutTemplate {
    LoadoutTemplate {
        primary_weapon,
        secondary_weapon,
        equipment,
        ammo,
    }
}

const INFANTRY: Archetype = Archetype {
    max_health: 100.0,
    speed: 5.0,
    accuracy: 0.7,
    stealth: 0.3,
    perception: 0.6,
    armor: 0.2,
    loadouts: &[
        kit(Some("assault_rifle"), Some("pistol"), &["grenade", "medkit"], &[("rifle", 180), ("pistol", 45)]),
        kit(Some("smg"), Some("pistol"), &["flashbang", "smoke"], &[("smg", 200), ("pistol", 45)]),
    ],
    behaviors: &[B::Patrol, B::Guard, B::Engage, B::Cover],
};

const SCOUT: Archetype = Archetype {
    max_health: 75.0,
    speed: 7.0,
    accuracy: 0.6,
    stealth: 0.7,
    perception: 0.9,
    armor: 0.1,
    loadouts: &[kit(Some("marksman_rifle"), Some("pistol"), &["binoculars", "radio"], &[("rifle", 60), ("pistol", 30)])],
    behaviors: &[B::Patrol, B::Search, B::Investigate, B::Retreat],
};

const SNIPER: Archetype = Archetype {
    max_health: 70.0,
    speed: 4.0,
    accuracy: 0.95,
    stealth: 0.8,
    perception: 0.95,
    armor: 0.1,
    loadouts: &[kit(Some("sniper_rifle"), Some("pistol"), &["ghillie", "rangefinder"], &[("sniper", 30), ("pistol", 30)])],
    behaviors: &[B::Guard, B::Engage, B::Cover],
};

const HEAVY: Archetype = Archetype {
    max_health: 150.0,
    speed: 3.0,
    accuracy: 0.5,
    stealth: 0.1,
    perception: 0.5,
    armor: 0.6,
    loadouts: &[kit(Some("lmg"), Some("pistol"), &["ammo_box", "armor_plates"], &[("lmg", 400), ("pistol", 30)])],
    behaviors: &[B::Guard, B::Engage, B::Support],
};

const MEDIC: Archetype = Archetype {
    max_health: 90.0,
    speed: 5.0,
    accuracy: 0.5,
    stealth: 0.3,
    perception: 0.6,
    armor: 0.2,
    loadouts: &[kit(Some("smg"), Some("pistol"), &["medkit", "medkit", "defibrillator"], &[("smg", 120), ("pistol", 30)])],
    behaviors: &[B::Follow, B::Heal, B::Support, B::Retreat],
};

const ENGINEER: Archetype = Archetype {
    max_health: 95.0,
    speed: 4.0,
    accuracy: 0.55,
    stealth: 0.3,
    perception: 0.6,
    armor: 0.3,
    loadouts: &[kit(Some("shotgun"), Some("pistol"), &["toolkit", "mines", "turret"], &[("shotgun", 32), ("pistol", 30)])],
    behaviors: &[B::Guard, B::Repair, B::Support],
};

const OFFICER: Archetype = Archetype {
    max_health: 100.0,
    speed: 5.0,
    accuracy: 0.75,
    stealth: 0.4,
    perception: 0.8,
    armor: 0.3,
    loadouts: &[kit(
        Some("assault_rifle"),
        Some("pistol"),
        &["radio", "binoculars", "smoke"],
        &[("rifle", 150), ("pistol", 45)],
    )],
    behaviors: &[B::Patrol, B::Guard, B::Engage, B::Flank],
};

const CIVILIAN: Archetype = Archetype {
    max_health: 50.0,
    speed: 4.0,
    accuracy: 0.2,
    stealth: 0.5,
    perception: 0.4,
    armor: 0.0,
    loadouts: &[kit(None, None, &[], &[])],
    behaviors: &[B::Idle, B::Retreat],
};

const VIP: Archetype = Archetype {
    max_health: 80.0,
    speed: 4.0,
    accuracy: 0.3,
    stealth: 0.2,
    perception: 0.5,
    armor: 0.1,
    loadouts: &[kit(None, Some("pistol"), &["radio"], &[("pistol", 15)])],
    behaviors: &[B::Follow, B::Retreat],
};

const HOSTILE: Archetype = Archetype {
    max_health: 80.0,
    speed: 5.0,
    accuracy: 0.5,
    stealth: 0.4,
    perception: 0.5,
    armor: 0.2,
    loadouts: &[
        kit(Some("assault_rifle"), None, &["grenade"], &[("rifle", 90)]),
        kit(Some("smg"), None, &[], &[("smg", 120)]),
    ],
    behaviors: &[B::Patrol, B::Search, B::Engage, B::Pursue],
};

const VEHICLE_LIGHT: Archetype = Archetype {
    max_health: 300.0,
    speed: 15.0,
    accuracy: 0.6,
    stealth: 0.0,
    perception: 0.7,
    armor: 0.4,
    loadouts: &[kit(Some("mounted_mg"), None, &["radio"], &[("mg", 500)])],
    behaviors: &[B::Patrol, B::Pursue, B::Engage],
};

const VEHICLE_HEAVY: Archetype = Archetype {
    max_health: 800.0,
    speed: 8.0,
    accuracy: 0.7,
    stealth: 0.0,
    perception: 0.6,
    armor: 0.9,
    loadouts: &[kit(Some("cannon"), Some("coax_mg"), &["smoke_launcher"], &[("cannon", 40), ("mg", 1000)])],
    behaviors: &[B::Patrol, B::Engage, B::Support],
};

const AIRCRAFT: Archetype = Archetype {
    max_health: 200.0,
    speed: 50.0,
    accuracy: 0.5,
    stealth: 0.1,
    perception: 0.9,
    armor: 0.3,
    loadouts: &[kit(Some("rockets"), Some("gun_pod"), &["flares"], &[("rockets", 16), ("gun", 500)])],
    behaviors: &[B::Patrol, B::Engage, B::Support],
};

const DRONE: Archetype = Archetype {
    max_health: 50.0,
    speed: 20.0,
    accuracy: 0.4,
    stealth: 0.6,
    perception: 0.95,
    armor: 0.0,
    loadouts: &[kit(None, None, &["camera", "radio"], &[])],
    behaviors: &[B::Patrol, B::Search, B::Investigate],
};

pub fn archetype(kind: EntityKind) -> &'static Archetype {
    match kind {
        EntityKind::Infantry => &INFANTRY,
        EntityKind::Scout => &SCOUT,
        EntityKind::Sniper => &SNIPER,
        EntityKind::Heavy => &HEAVY,
        EntityKind::Medic => &MEDIC,
        EntityKind::Engineer => &ENGINEER,
        EntityKind::Officer => &OFFICER,
        EntityKind::Civilian => &CIVILIAN,
        EntityKind::Vip => &VIP,
        EntityKind::Hostile => &HOSTILE,
        EntityKind::VehicleLight => &VEHICLE_LIGHT,
        EntityKind::VehicleHeavy => &VEHICLE_HEAVY,
        EntityKind::Aircraft => &AIRCRAFT,
        EntityKind::Drone => &DRONE,
    }
}

/// Callsign pool for a faction; unknown factions use the neutral pool.
pub fn callsigns(faction: &str) -> &'static [&'static str] {
    match faction {
        "alpha" => &["Alpha-1", "Alpha-2", "Alpha-3", "Bravo-1", "Bravo-2", "Charlie-1"],
        "bravo" => &["Echo-1", "Echo-2", "Foxtrot-1", "Foxtrot-2", "Golf-1", "Hotel-1"],
        "hostile" => &["Tango-1", "Tango-2", "X-Ray-1", "X-Ray-2", "Zulu-1", "Victor-1"],
        _ => &["Civilian", "Worker", "Trader", "Medic", "Engineer", "Observer"],
    }
}

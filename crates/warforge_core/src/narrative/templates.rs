//! Fixed pools the narrative generator draws from.

use warforge_data::{Alignment, EventType, MissionType, ObjectiveTier};

pub struct FactionTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub alignment: Alignment,
}

pub const FACTIONS: &[FactionTemplate] = &[
    FactionTemplate { id: "alpha", name: "Task Force Alpha", color: "#3B82F6", alignment: Alignment::Friendly },
    FactionTemplate { id: "bravo", name: "Delta Company", color: "#22C55E", alignment: Alignment::Friendly },
    FactionTemplate { id: "hostile", name: "Red Legion", color: "#EF4444", alignment: Alignment::Hostile },
    FactionTemplate { id: "insurgent", name: "Shadow Network", color: "#8B5CF6", alignment: Alignment::Hostile },
    FactionTemplate { id: "neutral", name: "Local Population", color: "#6B7280", alignment: Alignment::Neutral },
    FactionTemplate { id: "pmc", name: "Blacksite Security", color: "#F59E0B", alignment: Alignment::Neutral },
];

pub struct MissionTemplate {
    pub names: [&'static str; 4],
    pub objectives: [(ObjectiveTier, &'static str); 4],
}

use ObjectiveTier::{Primary as P, Secondary as S};

pub fn mission(kind: MissionType) -> MissionTemplate {
    match kind {
        MissionType::Assault => MissionTemplate {
            names: ["Operation Steel Rain", "Hammer Strike", "Thunder Run", "Iron Fist"],
            objectives: [
                (P, "Capture {poi}"),
                (P, "Neutralize enemy forces at {poi}"),
                (S, "Minimize civilian casualties"),
                (S, "Destroy enemy communications equipment"),
            ],
        },
        MissionType::Defend => MissionTemplate {
            names: ["Operation Fortress", "Hold the Line", "Iron Wall", "Last Stand"],
            objectives: [
                (P, "Defend {poi} for {duration} minutes"),
                (P, "Repel enemy assault on {poi}"),
                (S, "Maintain defensive perimeter"),
                (S, "Protect civilian evacuees"),
            ],
        },
        MissionType::Patrol => MissionTemplate {
            names: ["Operation Overwatch", "Silent Watch", "Recon Sweep", "Night Patrol"],
            objectives: [
                (P, "Complete patrol route through {zone}"),
                (P, "Report enemy activity in {zone}"),
                (S, "Avoid detection by hostiles"),
                (S, "Document infrastructure damage"),
            ],
        },
        MissionType::Recon => MissionTemplate {
            names: ["Operation Ghost Eye", "Shadow Recon", "Eagle Vision", "Intel Sweep"],
            objectives: [
                (P, "Gather intelligence on {poi}"),
                (P, "Photograph enemy positions at {poi}"),
                (S, "Remain undetected"),
                (S, "Identify enemy command structure"),
            ],
        },
        MissionType::Extraction => MissionTemplate {
            names: ["Operation Lifeline", "Dustoff", "Phoenix Rising", "Safe Harbor"],
            objectives: [
                (P, "Extract VIP from {poi}"),
                (P, "Secure extraction zone at {poi}"),
                (S, "Recover sensitive materials"),
                (S, "Establish communications with command"),
            ],
        },
        MissionType::Escort => MissionTemplate {
            names: ["Operation Guardian", "Convoy Shield", "Iron Escort", "Safe Passage"],
            objectives: [
                (P, "Escort convoy from {poi_start} to {poi_end}"),
                (P, "Protect VIP during transit"),
                (S, "Clear route of IEDs"),
                (S, "Maintain radio contact throughout"),
            ],
        },
        MissionType::Sabotage => MissionTemplate {
            names: ["Operation Dark Storm", "Silent Strike", "Shadow Blade", "Night Fury"],
            objectives: [
                (P, "Destroy enemy supplies at {poi}"),
                (P, "Disable enemy communications at {poi}"),
                (S, "Plant evidence of rival faction"),
                (S, "Extract without raising alarm"),
            ],
        },
        MissionType::Rescue => MissionTemplate {
            names: ["Operation Rescue Dawn", "Liberty Call", "Broken Arrow", "Homecoming"],
            objectives: [
                (P, "Locate and rescue hostages at {poi}"),
                (P, "Neutralize hostage takers"),
                (S, "Secure medical evacuation"),
                (S, "Gather intelligence on captor organization"),
            ],
        },
        MissionType::Capture => MissionTemplate {
            names: ["Operation Snatch", "High Value", "Crown Jewel", "King Maker"],
            objectives: [
                (P, "Capture HVT alive at {poi}"),
                (P, "Secure target for extraction"),
                (S, "Recover target documents"),
                (S, "Minimize collateral damage"),
            ],
        },
        MissionType::Eliminate => MissionTemplate {
            names: ["Operation Black Dagger", "Silent Thunder", "Final Strike", "End Game"],
            objectives: [
                (P, "Eliminate HVT at {poi}"),
                (P, "Confirm target neutralization"),
                (S, "Recover target intel"),
                (S, "Destroy target communications"),
            ],
        },
        MissionType::Supply => MissionTemplate {
            names: ["Operation Supply Line", "Iron Horse", "Lifeline", "Resupply Run"],
            objectives: [
                (P, "Deliver supplies to {poi}"),
                (P, "Establish supply route to {poi}"),
                (S, "Assess local infrastructure"),
                (S, "Report enemy patrol patterns"),
            ],
        },
        MissionType::Training => MissionTemplate {
            names: ["Operation Ready Force", "Combat Prep", "War Games", "Steel Forged"],
            objectives: [
                (P, "Complete combat exercises at {poi}"),
                (P, "Evaluate unit readiness"),
                (S, "Identify skill gaps"),
                (S, "Certify personnel qualifications"),
            ],
        },
    }
}

pub const EVENTS: &[(EventType, &str)] = &[
    (EventType::Battle, "{faction1} and {faction2} engaged in combat near {location}"),
    (EventType::Treaty, "{faction1} and {faction2} declared a temporary ceasefire"),
    (EventType::Disaster, "{disaster_type} struck {location}, causing widespread damage"),
    (EventType::Discovery, "Intelligence uncovered {discovery} at {location}"),
    (EventType::Betrayal, "Elements within {faction1} defected to {faction2}"),
    (EventType::Reinforcement, "{faction1} received reinforcements at {location}"),
];

pub const DISASTERS: &[&str] = &[
    "Sandstorm",
    "Earthquake",
    "Flood",
    "Power outage",
    "Communications blackout",
];

pub const DISCOVERIES: &[&str] = &[
    "enemy cache",
    "hidden bunker",
    "intelligence documents",
    "supply route",
];

/// Replace every `{token}` in `template`.
pub fn fill(template: &str, tokens: &[(&str, &str)]) -> String {
    tokens.iter().fold(template.to_string(), |text, (token, value)| {
        text.replace(&format!("{{{token}}}"), value)
    })
}

/// Event description template for `kind`.
pub fn event_template(kind: EventType) -> &'static str {
    EVENTS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, t)| *t)
        .unwrap_or("{faction1} reported activity near {location}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_all_tokens() {
        let text = fill("{a} and {a} near {b}", &[("a", "X"), ("b", "Y")]);
        assert_eq!(text, "X and X near Y");
    }

    #[test]
    fn test_every_mission_has_primary_objectives() {
        for kind in MissionType::ALL {
            let t = mission(*kind);
            assert!(t.objectives.iter().any(|(tier, _)| *tier == ObjectiveTier::Primary));
        }
    }

    #[test]
    fn test_event_templates_cover_all_types() {
        for kind in EventType::ALL {
            assert!(EVENTS.iter().any(|(k, _)| k == kind));
        }
    }
}

//! Free-text command grammar.
//!
//! Each rule is a nom parser producing one [`OverrideCommand`]. Rules are
//! tried in table order and the first one that consumes the whole command
//! wins. Keywords are case-insensitive; ids and factions are lowercased.

use nom::branch::alt;
use nom::bytes::complete::{is_not, tag_no_case, take_while1};
use nom::character::complete::{self as ch, space1};
use nom::combinator::{map, map_res, opt, recognize, value, verify};
use nom::number::complete::double;
use nom::sequence::{delimited, preceded, terminated};
use nom::{IResult, Parser};
use warforge_data::{
    BehaviorKind, Biome, EntityKind, EventType, OverrideCommand, PoiType, RemoveTarget,
    WeatherCondition,
};

type Rule = fn(&str) -> IResult<&str, OverrideCommand>;

const DEFAULT_SPAWN_FACTION: &str = "hostile";
const DEFAULT_WEATHER_INTENSITY: f64 = 0.5;
const RIOT_SIZE: u32 = 20;

fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_').parse(input)
}

fn lower_word(input: &str) -> IResult<&str, String> {
    map(word, str::to_ascii_lowercase).parse(input)
}

fn entity_ref(input: &str) -> IResult<&str, String> {
    map(recognize(preceded(tag_no_case("entity_"), word)), str::to_ascii_lowercase).parse(input)
}

/// `X,Y`, `X, Y` or `X Y`.
fn coords(input: &str) -> IResult<&str, (i64, i64)> {
    let (rest, (x, _, y)) = (
        ch::i64,
        take_while1(|c: char| c == ',' || c.is_whitespace()),
        ch::i64,
    )
        .parse(input)?;
    Ok((rest, (x, y)))
}

fn at_coords(input: &str) -> IResult<&str, (i64, i64)> {
    preceded((space1, tag_no_case("at"), space1), coords).parse(input)
}

fn keyword_then<'a>(first: &'static str, second: &'static str, input: &'a str) -> IResult<&'a str, ()> {
    value((), (tag_no_case(first), space1, tag_no_case(second), space1)).parse(input)
}

fn spawn(input: &str) -> IResult<&str, OverrideCommand> {
    let (rest, (_, _, count, entity_type, at, faction)) = (
        tag_no_case("spawn"),
        space1,
        opt(terminated(ch::u32, space1)),
        map_res(word, str::parse::<EntityKind>),
        opt(at_coords),
        opt(preceded((space1, tag_no_case("faction"), space1), lower_word)),
    )
        .parse(input)?;

    Ok((
        rest,
        OverrideCommand::SpawnEntity {
            count: count.unwrap_or(1),
            entity_type,
            at,
            faction: faction.unwrap_or_else(|| DEFAULT_SPAWN_FACTION.to_string()),
            spread: false,
        },
    ))
}

fn remove(input: &str) -> IResult<&str, OverrideCommand> {
    let (rest, target) = preceded(
        (tag_no_case("remove"), space1),
        alt((
            map(preceded((tag_no_case("all"), space1), lower_word), RemoveTarget::Faction),
            map(entity_ref, RemoveTarget::Entity),
        )),
    )
    .parse(input)?;
    Ok((rest, OverrideCommand::RemoveEntity { target }))
}

fn move_entity(input: &str) -> IResult<&str, OverrideCommand> {
    let (rest, (_, _, target, _, _, _, (x, y))) = (
        tag_no_case("move"),
        space1,
        entity_ref,
        space1,
        tag_no_case("to"),
        space1,
        coords,
    )
        .parse(input)?;
    Ok((rest, OverrideCommand::MoveEntity { target, x, y }))
}

fn set_behavior(input: &str) -> IResult<&str, OverrideCommand> {
    let (input, _) = keyword_then("set", "behavior", input)?;
    let (rest, (target, _, behavior)) = (
        entity_ref,
        space1,
        map_res(word, str::parse::<BehaviorKind>),
    )
        .parse(input)?;
    Ok((rest, OverrideCommand::SetBehavior { target, behavior }))
}

fn aggression(input: &str) -> IResult<&str, OverrideCommand> {
    let (rest, delta) = preceded(
        (
            opt((tag_no_case("set"), space1)),
            tag_no_case("aggression"),
            space1,
        ),
        double,
    )
    .parse(input)?;
    Ok((rest, OverrideCommand::SetAggression { delta }))
}

fn set_faction(input: &str) -> IResult<&str, OverrideCommand> {
    let (input, _) = keyword_then("set", "faction", input)?;
    let (rest, (target, _, faction)) = (entity_ref, space1, lower_word).parse(input)?;
    Ok((rest, OverrideCommand::SetFaction { target, faction }))
}

fn weather(input: &str) -> IResult<&str, OverrideCommand> {
    let (rest, (_, _, _, condition, intensity)) = (
        opt((tag_no_case("set"), space1)),
        tag_no_case("weather"),
        space1,
        map_res(word, str::parse::<WeatherCondition>),
        opt(preceded((space1, tag_no_case("intensity"), space1), ch::u32)),
    )
        .parse(input)?;

    Ok((
        rest,
        OverrideCommand::SetWeather {
            condition,
            intensity: intensity.map_or(DEFAULT_WEATHER_INTENSITY, |n| f64::from(n) / 100.0),
            biome_shift: None,
        },
    ))
}

fn set_time(input: &str) -> IResult<&str, OverrideCommand> {
    let (input, _) = keyword_then("set", "time", input)?;
    let (rest, hours) = double.parse(input)?;
    Ok((rest, OverrideCommand::SetTime { hours }))
}

fn trigger(input: &str) -> IResult<&str, OverrideCommand> {
    let (rest, (_, _, event_type, _, _, _, location)) = (
        tag_no_case("trigger"),
        space1,
        verify(map_res(word, str::parse::<EventType>), |kind: &EventType| {
            matches!(
                kind,
                EventType::Battle | EventType::Disaster | EventType::Reinforcement
            )
        }),
        space1,
        tag_no_case("at"),
        space1,
        word,
    )
        .parse(input)?;

    Ok((
        rest,
        OverrideCommand::TriggerEvent {
            event_type,
            location: location.to_string(),
        },
    ))
}

fn add_objective(input: &str) -> IResult<&str, OverrideCommand> {
    let (input, _) = keyword_then("add", "objective", input)?;
    let (rest, (description, at)) = (
        delimited(ch::char('"'), is_not("\""), ch::char('"')),
        opt(at_coords),
    )
        .parse(input)?;

    Ok((
        rest,
        OverrideCommand::AddObjective {
            description: description.to_string(),
            at,
        },
    ))
}

fn complete_objective(input: &str) -> IResult<&str, OverrideCommand> {
    let (input, _) = keyword_then("complete", "objective", input)?;
    let (rest, objective_id) =
        map(recognize(preceded(tag_no_case("obj_"), word)), str::to_ascii_lowercase).parse(input)?;
    Ok((rest, OverrideCommand::CompleteObjective { objective_id }))
}

fn add_poi(input: &str) -> IResult<&str, OverrideCommand> {
    let (input, _) = keyword_then("add", "poi", input)?;
    let (rest, (poi_type, (x, y))) =
        (map_res(word, str::parse::<PoiType>), at_coords).parse(input)?;
    Ok((rest, OverrideCommand::AddPoi { poi_type, x, y }))
}

fn damage_or_heal(input: &str) -> IResult<&str, OverrideCommand> {
    let (rest, (is_heal, _, target, _, amount)) = (
        alt((
            value(false, tag_no_case("damage")),
            value(true, tag_no_case("heal")),
        )),
        space1,
        entity_ref,
        space1,
        ch::u32,
    )
        .parse(input)?;

    let command = if is_heal {
        OverrideCommand::Heal { target, amount }
    } else {
        OverrideCommand::Damage { target, amount }
    };
    Ok((rest, command))
}

fn resupply(input: &str) -> IResult<&str, OverrideCommand> {
    let (rest, target) = preceded((tag_no_case("resupply"), space1), entity_ref).parse(input)?;
    Ok((rest, OverrideCommand::Resupply { target }))
}

fn arctic(input: &str) -> IResult<&str, OverrideCommand> {
    let (rest, _) = tag_no_case("arctic").parse(input)?;
    Ok((
        rest,
        OverrideCommand::SetWeather {
            condition: WeatherCondition::Snow,
            intensity: 0.7,
            biome_shift: Some(Biome::Arctic),
        },
    ))
}

fn desert(input: &str) -> IResult<&str, OverrideCommand> {
    let (rest, _) = tag_no_case("desert").parse(input)?;
    Ok((
        rest,
        OverrideCommand::SetWeather {
            condition: WeatherCondition::Sandstorm,
            intensity: 0.5,
            biome_shift: Some(Biome::Desert),
        },
    ))
}

fn riot(input: &str) -> IResult<&str, OverrideCommand> {
    let (rest, _) = tag_no_case("riot").parse(input)?;
    Ok((
        rest,
        OverrideCommand::SpawnEntity {
            count: RIOT_SIZE,
            entity_type: EntityKind::Hostile,
            at: None,
            faction: DEFAULT_SPAWN_FACTION.to_string(),
            spread: true,
        },
    ))
}

/// Tried in order; adding a command means adding a row.
const RULES: &[(&str, Rule)] = &[
    ("spawn", spawn),
    ("remove", remove),
    ("move", move_entity),
    ("set behavior", set_behavior),
    ("aggression", aggression),
    ("set faction", set_faction),
    ("weather", weather),
    ("set time", set_time),
    ("trigger", trigger),
    ("add objective", add_objective),
    ("complete objective", complete_objective),
    ("add poi", add_poi),
    ("damage/heal", damage_or_heal),
    ("resupply", resupply),
    ("arctic", arctic),
    ("desert", desert),
    ("riot", riot),
];

/// Parse one command. `None` means no rule matched the whole text.
pub fn parse_command(text: &str) -> Option<OverrideCommand> {
    let text = text.trim();
    RULES.iter().find_map(|(name, rule)| match rule(text) {
        Ok((rest, command)) if rest.trim().is_empty() => {
            tracing::trace!(rule = *name, "Command matched");
            Some(command)
        }
        _ => None,
    })
}

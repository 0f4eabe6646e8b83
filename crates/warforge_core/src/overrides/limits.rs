//! Per-call caps, bounds and per-kind cooldowns.

use crate::config::OverridesConfig;
use crate::entity::entity_seq;
use crate::error::OverrideRejection;
use std::collections::BTreeMap;
use warforge_data::{Entity, OverrideCommand, OverrideKind, RemoveTarget};

#[derive(Debug, Clone, PartialEq)]
pub struct OverrideLimits {
    /// Milliseconds; kinds without an entry have no cooldown.
    pub cooldowns: BTreeMap<OverrideKind, u64>,
    pub spawn_cap: u32,
    pub removal_cap: usize,
    pub max_amount: u32,
    pub max_coordinate: i64,
    pub aggression_bound: f64,
}

impl Default for OverrideLimits {
    fn default() -> Self {
        Self::from(&OverridesConfig::default())
    }
}

impl From<&OverridesConfig> for OverrideLimits {
    fn from(config: &OverridesConfig) -> Self {
        let cooldowns = config
            .cooldowns_ms
            .iter()
            .filter_map(|(kind, ms)| Some((kind.parse::<OverrideKind>().ok()?, *ms)))
            .collect();

        Self {
            cooldowns,
            spawn_cap: config.spawn_cap,
            removal_cap: config.removal_cap,
            max_amount: config.max_amount,
            max_coordinate: config.max_coordinate,
            aggression_bound: config.aggression_bound,
        }
    }
}

impl OverrideLimits {
    pub fn cooldown(&self, kind: OverrideKind) -> u64 {
        self.cooldowns.get(&kind).copied().unwrap_or(0)
    }

    fn check_position(&self, x: i64, y: i64) -> Result<(), OverrideRejection> {
        let max = self.max_coordinate;
        if (0..=max).contains(&x) && (0..=max).contains(&y) {
            Ok(())
        } else {
            Err(OverrideRejection::PositionOutOfBounds { x, y, max })
        }
    }

    /// Payload bounds only; cooldowns live on [`OverrideContext`].
    pub fn check(&self, command: &OverrideCommand, entities: &[Entity]) -> Result<(), OverrideRejection> {
        match command {
            OverrideCommand::SpawnEntity { count, at, .. } => {
                if *count > self.spawn_cap {
                    return Err(OverrideRejection::SpawnCap {
                        requested: *count,
                        max: self.spawn_cap,
                    });
                }
                if let Some((x, y)) = at {
                    self.check_position(*x, *y)?;
                }
            }
            OverrideCommand::RemoveEntity {
                target: RemoveTarget::Faction(faction),
            } => {
                let matched = entities.iter().filter(|e| &e.faction == faction).count();
                if matched > self.removal_cap {
                    return Err(OverrideRejection::RemovalCap {
                        matched,
                        max: self.removal_cap,
                    });
                }
            }
            OverrideCommand::MoveEntity { x, y, .. } | OverrideCommand::AddPoi { x, y, .. } => {
                self.check_position(*x, *y)?;
            }
            OverrideCommand::SetAggression { delta } => {
                if delta.is_nan() || delta.abs() > self.aggression_bound {
                    return Err(OverrideRejection::AggressionOutOfBounds {
                        delta: *delta,
                        bound: self.aggression_bound,
                    });
                }
            }
            OverrideCommand::Damage { amount, .. } | OverrideCommand::Heal { amount, .. } => {
                if *amount > self.max_amount {
                    return Err(OverrideRejection::AmountOutOfBounds {
                        amount: *amount,
                        max: self.max_amount,
                    });
                }
            }
            OverrideCommand::SetTime { hours } => {
                if !hours.is_finite() || *hours < 0.0 {
                    return Err(OverrideRejection::TimeOutOfBounds { hours: *hours });
                }
            }
            OverrideCommand::SetWeather { intensity, .. } => {
                if !(0.0..=1.0).contains(intensity) {
                    return Err(OverrideRejection::IntensityOutOfBounds {
                        percent: intensity * 100.0,
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Override bookkeeping for one simulation: cooldown clock and id counters.
///
/// Two simulations never share a context, so they cannot throttle each other.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideContext {
    pub limits: OverrideLimits,
    last_applied: BTreeMap<OverrideKind, u64>,
    next_override: u64,
    next_entity: u64,
    next_custom: u64,
}

impl OverrideContext {
    pub fn new(limits: OverrideLimits) -> Self {
        Self {
            limits,
            last_applied: BTreeMap::new(),
            next_override: 0,
            next_entity: 0,
            next_custom: 0,
        }
    }

    /// Entity ids continue after the highest id already in `entities`.
    pub fn for_roster(limits: OverrideLimits, entities: &[Entity]) -> Self {
        let next_entity = entities
            .iter()
            .filter_map(|e| entity_seq(&e.id))
            .max()
            .map_or(0, |seq| seq + 1);
        Self {
            next_entity,
            ..Self::new(limits)
        }
    }

    /// Bounds first, then the cooldown window.
    pub fn validate(
        &self,
        command: &OverrideCommand,
        entities: &[Entity],
        now_ms: u64,
    ) -> Result<(), OverrideRejection> {
        self.limits.check(command, entities)?;

        let kind = command.kind();
        let cooldown = self.limits.cooldown(kind);
        if let Some(last) = self.last_applied.get(&kind) {
            let elapsed = now_ms.saturating_sub(*last);
            if elapsed < cooldown {
                return Err(OverrideRejection::Cooldown {
                    kind,
                    remaining_ms: cooldown - elapsed,
                });
            }
        }
        Ok(())
    }

    /// Start `kind`'s cooldown window at `now_ms`.
    pub fn record(&mut self, kind: OverrideKind, now_ms: u64) {
        self.last_applied.insert(kind, now_ms);
    }

    pub fn last_applied(&self, kind: OverrideKind) -> Option<u64> {
        self.last_applied.get(&kind).copied()
    }

    pub(crate) fn next_override_seq(&mut self) -> u64 {
        let seq = self.next_override;
        self.next_override += 1;
        seq
    }

    pub(crate) fn next_entity_seq(&mut self) -> u64 {
        let seq = self.next_entity;
        self.next_entity += 1;
        seq
    }

    /// Counter for override-created objectives, POIs and events.
    pub(crate) fn next_custom_seq(&mut self) -> u64 {
        let seq = self.next_custom;
        self.next_custom += 1;
        seq
    }
}

impl Default for OverrideContext {
    fn default() -> Self {
        Self::new(OverrideLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warforge_data::EntityKind;

    fn spawn(count: u32) -> OverrideCommand {
        OverrideCommand::SpawnEntity {
            count,
            entity_type: EntityKind::Infantry,
            at: None,
            faction: "hostile".to_string(),
            spread: false,
        }
    }

    #[test]
    fn test_default_limits_match_config_defaults() {
        let limits = OverrideLimits::default();
        assert_eq!(limits.cooldown(OverrideKind::SpawnEntity), 1000);
        assert_eq!(limits.cooldown(OverrideKind::RemoveEntity), 500);
        assert_eq!(limits.cooldown(OverrideKind::MoveEntity), 100);
        assert_eq!(limits.cooldown(OverrideKind::SetAggression), 500);
        assert_eq!(limits.cooldown(OverrideKind::Damage), 100);
        assert_eq!(limits.cooldown(OverrideKind::Heal), 100);
        assert_eq!(limits.cooldown(OverrideKind::SetWeather), 0);
        assert_eq!(limits.spawn_cap, 50);
    }

    #[test]
    fn test_spawn_cap() {
        let ctx = OverrideContext::default();
        assert_eq!(
            ctx.validate(&spawn(80), &[], 0),
            Err(OverrideRejection::SpawnCap { requested: 80, max: 50 })
        );
        assert!(ctx.validate(&spawn(50), &[], 0).is_ok());
    }

    #[test]
    fn test_cooldown_window() {
        let mut ctx = OverrideContext::default();
        assert!(ctx.validate(&spawn(1), &[], 5_000).is_ok());
        ctx.record(OverrideKind::SpawnEntity, 5_000);

        let err = ctx.validate(&spawn(1), &[], 5_600).unwrap_err();
        assert_eq!(
            err,
            OverrideRejection::Cooldown {
                kind: OverrideKind::SpawnEntity,
                remaining_ms: 400
            }
        );
        assert!(ctx.validate(&spawn(1), &[], 6_000).is_ok());
        // Other kinds are unaffected.
        let heal = OverrideCommand::Heal { target: "entity_00000".into(), amount: 5 };
        assert!(ctx.validate(&heal, &[], 5_600).is_ok());
    }

    #[test]
    fn test_bounds() {
        let ctx = OverrideContext::default();
        let far = OverrideCommand::MoveEntity { target: "entity_00000".into(), x: 1001, y: 5 };
        assert!(matches!(
            ctx.validate(&far, &[], 0),
            Err(OverrideRejection::PositionOutOfBounds { .. })
        ));
        let negative = OverrideCommand::AddPoi { poi_type: warforge_data::PoiType::Depot, x: -1, y: 5 };
        assert!(ctx.validate(&negative, &[], 0).is_err());

        let wild = OverrideCommand::SetAggression { delta: 1.5 };
        assert!(ctx.validate(&wild, &[], 0).is_err());
        let nan = OverrideCommand::SetAggression { delta: f64::NAN };
        assert!(ctx.validate(&nan, &[], 0).is_err());
        let edge = OverrideCommand::SetAggression { delta: -1.0 };
        assert!(ctx.validate(&edge, &[], 0).is_ok());

        let big = OverrideCommand::Damage { target: "entity_00000".into(), amount: 1001 };
        assert!(matches!(
            ctx.validate(&big, &[], 0),
            Err(OverrideRejection::AmountOutOfBounds { amount: 1001, max: 1000 })
        ));
    }

    #[test]
    fn test_time_and_intensity_bounds() {
        let ctx = OverrideContext::default();
        for hours in [f64::INFINITY, f64::NAN, -5.0] {
            let err = ctx.validate(&OverrideCommand::SetTime { hours }, &[], 0).unwrap_err();
            assert!(matches!(err, OverrideRejection::TimeOutOfBounds { .. }));
        }
        assert!(ctx.validate(&OverrideCommand::SetTime { hours: 30.0 }, &[], 0).is_ok());

        let weather = |intensity| OverrideCommand::SetWeather {
            condition: warforge_data::WeatherCondition::Fog,
            intensity,
            biome_shift: None,
        };
        assert_eq!(
            ctx.validate(&weather(5.0), &[], 0),
            Err(OverrideRejection::IntensityOutOfBounds { percent: 500.0 })
        );
        assert!(ctx.validate(&weather(1.0), &[], 0).is_ok());
        assert!(ctx.validate(&weather(0.0), &[], 0).is_ok());
    }

    #[test]
    fn test_contexts_are_independent() {
        let mut a = OverrideContext::default();
        let b = OverrideContext::default();
        a.record(OverrideKind::SpawnEntity, 100);
        assert!(a.validate(&spawn(1), &[], 200).is_err());
        assert!(b.validate(&spawn(1), &[], 200).is_ok());
    }
}

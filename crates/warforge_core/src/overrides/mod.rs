//! Runtime overrides: parse, validate, compute a changeset.
//!
//! The engine never merges changesets itself. Callers own the live state
//! and apply [`OverrideResult::changeset`] in one pass.

mod apply;
pub mod grammar;
pub mod limits;

use crate::rng::SeededRng;
use serde::{Deserialize, Serialize};
use warforge_data::{Changeset, Entity, Narrative, Override, OverrideCommand, World};

pub use apply::compute_changeset;
pub use grammar::parse_command;
pub use limits::{OverrideContext, OverrideLimits};

/// Read-only view of the state an override is applied against.
#[derive(Debug, Clone, Copy)]
pub struct StateView<'a> {
    pub world: &'a World,
    pub entities: &'a [Entity],
    pub narrative: &'a Narrative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideResult {
    pub success: bool,
    #[serde(rename = "override")]
    pub record: Override,
    pub changeset: Changeset,
    /// Rejection reason when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Wrap a parsed command in an audit record.
pub fn new_override(
    ctx: &mut OverrideContext,
    command: OverrideCommand,
    issuer: &str,
    timestamp_ms: u64,
) -> Override {
    Override {
        id: format!("override_{timestamp_ms}_{}", ctx.next_override_seq()),
        command,
        issuer: issuer.to_string(),
        timestamp_ms,
        applied: false,
        validated: false,
    }
}

/// Validate `record` and, if accepted, start its cooldown and compute its changeset.
pub fn apply_override(
    mut record: Override,
    state: &StateView<'_>,
    rng: &mut SeededRng,
    ctx: &mut OverrideContext,
) -> OverrideResult {
    let now = record.timestamp_ms;
    if let Err(rejection) = ctx.validate(&record.command, state.entities, now) {
        record.validated = false;
        return OverrideResult {
            success: false,
            record,
            changeset: Changeset::default(),
            error: Some(rejection.to_string()),
        };
    }

    record.validated = true;
    ctx.record(record.kind(), now);
    let changeset = compute_changeset(&record.command, state, rng, ctx, now);
    record.applied = true;

    OverrideResult {
        success: true,
        record,
        changeset,
        error: None,
    }
}

/// Parse and apply free text. `None` when the text is not a command.
pub fn submit(
    text: &str,
    issuer: &str,
    timestamp_ms: u64,
    state: &StateView<'_>,
    rng: &mut SeededRng,
    ctx: &mut OverrideContext,
) -> Option<OverrideResult> {
    let command = parse_command(text)?;
    let record = new_override(ctx, command, issuer, timestamp_ms);
    Some(apply_override(record, state, rng, ctx))
}

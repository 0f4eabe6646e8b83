//! Error types for the warforge engine.
//!
//! Generation either completes or fails with an [`EngineError`]; override
//! validation failures are reported as an [`OverrideRejection`] whose
//! `Display` form is the human-readable reason handed back to the issuer.

use thiserror::Error;
use warforge_data::OverrideKind;

/// Main error type for engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Generation request outside accepted bounds
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration that failed validation
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Narrative enhancer failure (never fatal to generation)
    #[error("Enhancer error: {0}")]
    Enhancer(String),

    /// JSON errors while hashing or exporting state
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    #[must_use]
    pub fn invalid_request<S: Into<String>>(msg: S) -> Self {
        Self::InvalidRequest(msg.into())
    }

    #[must_use]
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    #[must_use]
    pub fn enhancer<S: Into<String>>(msg: S) -> Self {
        Self::Enhancer(msg.into())
    }
}

/// Why an override was refused. Nothing is applied when one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverrideRejection {
    #[error("Cooldown active for {kind} ({remaining_ms} ms remaining)")]
    Cooldown { kind: OverrideKind, remaining_ms: u64 },

    #[error("Cannot spawn more than {max} entities at once (requested {requested})")]
    SpawnCap { requested: u32, max: u32 },

    #[error("Cannot remove more than {max} entities at once (matched {matched})")]
    RemovalCap { matched: usize, max: usize },

    #[error("Aggression delta must be between -{bound} and {bound} (got {delta})")]
    AggressionOutOfBounds { delta: f64, bound: f64 },

    #[error("Damage/heal amount must be between 0 and {max} (got {amount})")]
    AmountOutOfBounds { amount: u32, max: u32 },

    #[error("Position ({x}, {y}) out of bounds (0..={max})")]
    PositionOutOfBounds { x: i64, y: i64, max: i64 },

    #[error("Time must be a finite, non-negative number of hours (got {hours})")]
    TimeOutOfBounds { hours: f64 },

    #[error("Weather intensity must be between 0 and 100 (got {percent})")]
    IntensityOutOfBounds { percent: f64 },
}

impl OverrideRejection {
    pub fn is_cooldown(&self) -> bool {
        matches!(self, OverrideRejection::Cooldown { .. })
    }
}

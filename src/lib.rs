//! Caller side of the warforge engine: a live [`Simulation`] session that
//! owns generated state and merges tick patches and override changesets.

pub mod model;

pub use model::simulation::{Simulation, TickSummary};

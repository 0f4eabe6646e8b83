//! Plain data model shared by the warforge engine and its callers.
//!
//! Every type here is serde-serializable and carries no generation logic.
//! Maps that end up inside checksummed output are `BTreeMap`s so their
//! serialized order is stable.

#[macro_use]
mod macros;

pub mod data;
pub mod serde_u64_string;

pub use data::entity::*;
pub use data::narrative::*;
pub use data::overrides::*;
pub use data::world::*;

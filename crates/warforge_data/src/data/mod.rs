//! Core data structures for generated worlds, entities, narratives and overrides.

pub mod entity;
pub mod narrative;
pub mod overrides;
pub mod world;

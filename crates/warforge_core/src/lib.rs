//! # Warforge Core
//!
//! Deterministic procedural generation and live simulation for tactical
//! scenarios.
//!
//! This crate contains:
//! - A splitmix-style seeded RNG with keyed forking
//! - Seeded value noise for heightmaps
//! - World, entity and narrative generators
//! - The per-entity behavior state machine
//! - The override grammar, validation and changeset computation
//! - Checksums, configuration, metrics and structured logging
//!
//! ## Example
//!
//! ```
//! use warforge_core::pipeline::{generate, GenerationRequest};
//!
//! let request = GenerationRequest {
//!     width: 16,
//!     height: 16,
//!     ..GenerationRequest::default()
//! }
//! .with_seed(42);
//! let a = generate(&request).unwrap();
//! let b = generate(&request).unwrap();
//! assert_eq!(a.metadata.checksum, b.metadata.checksum);
//! ```

/// Per-entity behavior state machine and batch ticking
pub mod behavior;
/// Content digests for worlds, results and live state
pub mod checksum;
/// Configuration management for generation and overrides
pub mod config;
/// Entity archetypes and roster generation
pub mod entity;
pub mod error;
/// Performance metrics collection and logging
pub mod metrics;
/// Factions, missions, timeline and the optional enhancer
pub mod narrative;
/// Seeded 2D value noise
pub mod noise;
/// Runtime override grammar, limits and changesets
pub mod overrides;
/// End-to-end generation requests
pub mod pipeline;
pub mod rng;
/// Terrain, zones, POIs, roads, spawn points and weather
pub mod world;

pub use error::{EngineError, OverrideRejection, Result};
pub use pipeline::{generate, GenerationRequest, GenerationResult, Seed};
pub use rng::SeededRng;

//! # chanstate-core
//!
//! Persistent channel-state store for audio engine instances. Lets the
//! processing units of a running engine share a key/value document, and
//! snapshots the engine's live control/string channels to and from disk.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chanstate_core::{Engine, MemoryChannels, Phase};
//!
//! let mut channels = MemoryChannels::new();
//! channels.declare_control("gain", 0.5);
//! let mut engine = Engine::new(channels);
//!
//! // Accessors take the invocation phase; init failures abort the unit
//! engine.state(Phase::Init).set_number("volume", 0.8)?;
//! let volume = engine.state(Phase::Perf).get_number("volume")?.resolve(0.0);
//!
//! // Channel snapshots
//! engine.snapshot(Phase::Perf).save(Path::new("preset.json"))?;
//! engine.snapshot(Phase::Perf).recall(Path::new("preset.json"), &["gain"])?;
//! ```
//!
//! ## Module Overview
//!
//! - [`document`] — `StateDocument`: ordered key/value map with merge and JSON round-trip
//! - [`registry`] — one document per engine instance, torn down with the instance
//! - [`channels`] — `ChannelHost` boundary to the engine's named channels
//! - [`ops`] — operations invoked by the engine: state accessors, bulk transfer,
//!   channel snapshots, text utilities
//! - [`engine`] — `Engine`: binds a registry handle, a channel host and config
//! - [`config`] — TOML configuration (embedded defaults + user override)

pub mod channels;
pub mod config;
pub mod document;
pub mod engine;
pub mod ops;
pub mod registry;

pub use chanstate_types::*;

pub use channels::{ChannelHost, MemoryChannels};
pub use config::Config;
pub use document::StateDocument;
pub use engine::Engine;
pub use ops::{OpFailure, OpResult, Probe};
pub use registry::{DocumentSlot, EngineHandle, EngineStateRegistry, SharedRegistry};

//! # chanstate-types
//!
//! Shared type definitions for the chanstate workspace.
//! This crate contains the plain data passed between the engine boundary,
//! the state store, and the command-line tool.

mod channel;
mod error;
mod phase;
mod value;

pub use channel::{ChannelInfo, ChannelKind, ChannelValue};
pub use error::{ErrorKind, StateError};
pub use phase::{Disposition, Phase};
pub use value::{Value, ValueKind};

/// Opaque identity of one running engine instance.
///
/// Stable for the life of the instance and used as the key of the state
/// registry. Two simultaneously hosted engines never share an id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct EngineId(u32);

impl EngineId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EngineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "engine#{}", self.0)
    }
}

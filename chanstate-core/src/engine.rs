use chanstate_types::{EngineId, Phase};

use crate::channels::ChannelHost;
use crate::config::Config;
use crate::ops::{BulkTransfer, ChannelSnapshot, StateAccessors};
use crate::registry::{EngineHandle, SharedRegistry};

/// One running engine instance as seen by the state store.
///
/// Owns the instance's registry membership, its channel host and its
/// configuration. Dropping the engine drops its state document.
pub struct Engine<H: ChannelHost> {
    handle: EngineHandle,
    host: H,
    config: Config,
}

impl<H: ChannelHost> Engine<H> {
    /// Attach to the process-wide registry using the user's configuration.
    pub fn new(host: H) -> Self {
        Self::with_registry(SharedRegistry::global(), host, Config::load())
    }

    pub fn with_registry(registry: &SharedRegistry, host: H, config: Config) -> Self {
        Self {
            handle: registry.attach(),
            host,
            config,
        }
    }

    pub fn id(&self) -> EngineId {
        self.handle.id()
    }

    pub fn handle(&self) -> &EngineHandle {
        &self.handle
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self, phase: Phase) -> StateAccessors<'_> {
        StateAccessors::new(&self.handle, &self.config, phase)
    }

    pub fn bulk(&self, phase: Phase) -> BulkTransfer<'_> {
        BulkTransfer::new(&self.handle, phase)
    }

    pub fn snapshot(&mut self, phase: Phase) -> ChannelSnapshot<'_, H> {
        ChannelSnapshot::new(&mut self.host, &self.config, phase)
    }
}

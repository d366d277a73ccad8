//! Boundary to the host engine's named channels.

use chanstate_types::{ChannelInfo, ChannelKind, ChannelValue};

/// Channel API exposed by the host engine.
///
/// The engine owns the channels; this crate only enumerates, reads and
/// overwrites them.
pub trait ChannelHost {
    /// Every channel currently declared, in declaration order.
    fn list_channels(&self) -> Vec<ChannelInfo>;

    /// Current value of channel `name`, if it exists with `kind`.
    fn read_channel(&self, name: &str, kind: ChannelKind) -> Option<ChannelValue>;

    /// Overwrite channel `name`. Returns false (and changes nothing) if no
    /// channel of that name has the value's kind.
    fn write_channel(&mut self, name: &str, value: ChannelValue) -> bool;
}

/// In-process channel table, used when no external engine is attached.
#[derive(Debug, Clone, Default)]
pub struct MemoryChannels {
    channels: Vec<(String, ChannelValue)>,
}

impl MemoryChannels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_control(&mut self, name: &str, initial: f64) {
        self.declare(name, ChannelValue::Control(initial));
    }

    pub fn declare_string(&mut self, name: &str, initial: &str) {
        self.declare(name, ChannelValue::Text(initial.to_string()));
    }

    /// Declare `name`, replacing any earlier declaration (and its kind).
    pub fn declare(&mut self, name: &str, value: ChannelValue) {
        match self.channels.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.channels.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ChannelValue> {
        self.channels
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn control(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(ChannelValue::Control(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ChannelValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl ChannelHost for MemoryChannels {
    fn list_channels(&self) -> Vec<ChannelInfo> {
        self.channels
            .iter()
            .map(|(name, value)| ChannelInfo::new(name.clone(), value.kind()))
            .collect()
    }

    fn read_channel(&self, name: &str, kind: ChannelKind) -> Option<ChannelValue> {
        self.get(name).filter(|v| v.kind() == kind).cloned()
    }

    fn write_channel(&mut self, name: &str, value: ChannelValue) -> bool {
        match self
            .channels
            .iter_mut()
            .find(|(n, v)| n == name && v.kind() == value.kind())
        {
            Some(slot) => {
                slot.1 = value;
                true
            }
            None => false,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Kind of an engine-level named channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    Control,
    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChannelValue {
    Control(f64),
    Text(String),
}

impl ChannelValue {
    pub fn kind(&self) -> ChannelKind {
        match self {
            ChannelValue::Control(_) => ChannelKind::Control,
            ChannelValue::Text(_) => ChannelKind::String,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub name: String,
    pub kind: ChannelKind,
}

impl ChannelInfo {
    pub fn new(name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

//! Whole-document import and export as a single string.

use chanstate_types::{Phase, StateError};

use super::{fail, OpResult};
use crate::document::StateDocument;
use crate::registry::EngineHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Discard the existing store and install the parsed document.
    Replace,
    /// Merge every key of the parsed document into the existing store.
    Merge,
}

impl ImportMode {
    /// Numeric write-mode flag used by engine scripts: 1 merges, anything else replaces.
    pub fn from_flag(flag: i32) -> Self {
        if flag == 1 {
            ImportMode::Merge
        } else {
            ImportMode::Replace
        }
    }
}

pub struct BulkTransfer<'a> {
    handle: &'a EngineHandle,
    phase: Phase,
}

impl<'a> BulkTransfer<'a> {
    pub fn new(handle: &'a EngineHandle, phase: Phase) -> Self {
        Self { handle, phase }
    }

    /// Serialized form of the whole store; `{}` if nothing was written yet.
    pub fn export_all(&self) -> String {
        let text = self.handle.with_document(|doc| doc.map(|d| (d.is_empty(), d.serialize())));
        match text {
            Some((empty, text)) => {
                if empty {
                    log::info!(target: "bulk", "no data, temporary or persistent, has been written to internal state");
                }
                text
            }
            None => {
                log::info!(target: "bulk", "no data, temporary or persistent, has been written to internal state");
                StateDocument::new().serialize()
            }
        }
    }

    /// Install or merge a serialized document. Parse failures leave the store unchanged.
    pub fn import_all(&self, text: &str, mode: ImportMode) -> OpResult<()> {
        if text.is_empty() {
            return Err(fail("bulk", "importAll", self.phase, StateError::empty_payload("JSON string")));
        }
        let incoming = StateDocument::parse(text).map_err(|e| fail("bulk", "importAll", self.phase, e))?;
        match mode {
            ImportMode::Replace => self.handle.replace_document(incoming),
            ImportMode::Merge => self.handle.with_document_mut(|doc| doc.merge_document(incoming)),
        }
        Ok(())
    }
}

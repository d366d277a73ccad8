//! Operations invoked by the engine from inside its processing graph.
//!
//! Every fallible operation reports through [`OpFailure`]: the failure is
//! logged and carries the [`Disposition`] the engine should apply to the
//! calling processing unit. Init-phase failures abort instantiation;
//! perf-phase failures are logged and the unit keeps running. File-level
//! failures are soft in either phase.

pub mod bulk;
pub mod snapshot;
pub mod state;
pub mod text;

use chanstate_types::{Disposition, ErrorKind, Phase, StateError};

pub use bulk::{BulkTransfer, ImportMode};
pub use snapshot::{ChannelSnapshot, RecallReport};
pub use state::{Probe, StateAccessors};

#[derive(Debug, Clone, PartialEq)]
pub struct OpFailure {
    pub error: StateError,
    pub phase: Phase,
    pub disposition: Disposition,
}

pub type OpResult<T> = Result<T, OpFailure>;

impl OpFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind
    }

    /// True when the calling unit must not be scheduled for perf calls.
    pub fn aborts_init(&self) -> bool {
        self.disposition == Disposition::AbortInit
    }
}

impl std::fmt::Display for OpFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} phase)", self.error, self.phase)
    }
}

impl std::error::Error for OpFailure {}

/// Phase-appropriate failure: init errors abort the unit, perf errors are only reported.
pub(crate) fn fail(target: &str, op: &str, phase: Phase, error: StateError) -> OpFailure {
    match phase {
        Phase::Init => log::error!(target: target, "{}: {}", op, error),
        Phase::Perf => log::warn!(target: target, "{}: {}", op, error),
    }
    OpFailure {
        error,
        phase,
        disposition: phase.disposition(),
    }
}

/// Failure that never stops the unit, whatever the phase.
pub(crate) fn soft(target: &str, op: &str, phase: Phase, error: StateError) -> OpFailure {
    log::warn!(target: target, "{}: {}", op, error);
    OpFailure {
        error,
        phase,
        disposition: Disposition::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_failures_abort_perf_failures_continue() {
        let init = fail("state", "setNumber", Phase::Init, StateError::empty_key());
        assert!(init.aborts_init());
        assert_eq!(init.kind(), ErrorKind::EmptyKey);

        let perf = fail("state", "setNumber", Phase::Perf, StateError::empty_key());
        assert!(!perf.aborts_init());
        assert_eq!(perf.disposition, Disposition::Continue);
    }

    #[test]
    fn soft_failures_never_abort() {
        let err = StateError::new(ErrorKind::FileUnavailable, "nope");
        assert!(!soft("snapshot", "save", Phase::Init, err).aborts_init());
    }
}

/// Point in a processing unit's lifecycle at which an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// One-time setup when the unit is instantiated.
    Init,
    /// Once per control block while the unit is active.
    Perf,
}

/// What the engine should do with a processing unit after a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Instantiation failed; the unit must not be scheduled for perf calls.
    AbortInit,
    /// Failure was reported; the unit keeps running in later blocks.
    Continue,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Perf => "perf",
        }
    }

    pub fn disposition(&self) -> Disposition {
        match self {
            Phase::Init => Disposition::AbortInit,
            Phase::Perf => Disposition::Continue,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

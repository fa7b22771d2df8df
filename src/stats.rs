//! Execution statistics.
//!
//! A small counter bundle a host can read after a run (or periodically during
//! one) for coarse observability, independent of the `tracing` event stream.

/// Running counters updated as the core executes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Instructions retired (including those in a delay slot).
    pub instructions_retired: u64,
    /// Operand cache hits.
    pub oc_hits: u64,
    /// Operand cache misses.
    pub oc_misses: u64,
    /// Operand cache line write-backs (dirty victim evictions plus explicit OCBWB/purge).
    pub oc_write_backs: u64,
    /// Instruction cache hits.
    pub ic_hits: u64,
    /// Instruction cache misses.
    pub ic_misses: u64,
    /// Delayed branches taken.
    pub branches_taken: u64,
    /// Architectural exceptions dispatched.
    pub exceptions: u64,
}

impl Stats {
    /// Creates a zeroed counter bundle.
    pub fn new() -> Self {
        Self::default()
    }
}

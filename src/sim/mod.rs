//! External collaborator interfaces.
//!
//! The CPU is constructed against these traits, not against any concrete
//! system implementation; `crates/hardware`-style SoC/bus wiring is out of
//! scope for this core (SPEC_FULL.md §1).

/// `Memory`, `BiosFile`, and `InterruptController` trait definitions.
pub mod collaborators;

pub use collaborators::{BiosFile, InterruptController, Memory};

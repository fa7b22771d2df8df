//! Core configuration.
//!
//! `Config` is the small, `serde`-serializable knob set consumed by
//! [`crate::core::cpu::Cpu::new`]. There is no CLI or file-format layer here:
//! the embedding host is expected to construct a `Config` directly (or via its
//! own configuration system) and hand it to the core.

use serde::{Deserialize, Serialize};

use crate::core::units::cache::CacheControl;

/// Construction-time knobs for a [`crate::core::cpu::Cpu`].
///
/// A host that stores its configuration as JSON alongside the rest of its
/// settings can deserialize a `Config` directly:
///
/// ```
/// use sh4_core::Config;
///
/// let json = r#"{
///     "trace_retirement": true,
///     "initial_ccr": {
///         "oce": true,
///         "wt": false,
///         "cb": true,
///         "oix": false,
///         "ora": false,
///         "ice": true,
///         "iix": false
///     }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert!(config.trace_retirement);
/// assert!(config.initial_ccr.oce);
/// assert!(config.initial_ccr.cb);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Whether `tracing::trace!` spans are emitted per retired instruction.
    ///
    /// Expensive; normally left off and toggled on only when debugging a run.
    pub trace_retirement: bool,

    /// The cache-control bits to apply before the first instruction runs.
    ///
    /// Defaults to the hard-reset state (both caches disabled).
    pub initial_ccr: CacheControl,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_retirement: false,
            initial_ccr: CacheControl::default(),
        }
    }
}

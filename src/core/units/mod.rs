//! Execution units: the split operand and instruction caches.

/// Operand cache, instruction cache, and the cache-control register.
pub mod cache;

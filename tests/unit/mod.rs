//! End-to-end scenarios, universal properties, and BIOS-file coverage.

/// Targeted MAC-accumulator and FPU-register-alignment regression coverage.
mod arithmetic;
/// BIOS image load/clear/size coverage.
mod bios;
/// Universal properties: round-trip and identity laws that must hold
/// regardless of cache configuration.
mod properties;
/// The numbered end-to-end scenarios.
mod scenarios;

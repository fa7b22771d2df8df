//! Shared test infrastructure for the integration suite.

/// A `Vec<u8>`-backed `BiosFile`.
pub mod bios;
/// A single-slot `InterruptController`.
pub mod interrupt;
/// A sparse-backed `Memory` implementation spanning the full 29-bit physical space.
pub mod memory;
/// A `mockall`-backed `Memory` for asserting cache access patterns.
pub mod mocks;

/// Installs a `tracing` subscriber that prints to the test harness's
/// captured output, so a failing test's `tracing::trace!`/`debug!`/`warn!`
/// retirement and trap logging shows up alongside the assertion failure.
/// Safe to call from every test; only the first call in a process wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

//! Core processor implementation.
//!
//! This module contains the SH-4 architectural state (registers and their
//! bit-level encodings), the execution units (the operand and instruction
//! caches), and the `Cpu` orchestrator that ties them together with the
//! Memory Access Layer and the instruction interpreter.

/// Architectural register state: GPR/FPU banks, SR, FPSCR, system registers.
pub mod arch;

/// The `Cpu` type: construction, reset, the Memory Access Layer, trap
/// dispatch, and the fetch-decode-execute loop.
pub mod cpu;

/// Execution units: the operand and instruction caches.
pub mod units;

pub use self::cpu::Cpu;

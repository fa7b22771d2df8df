//! A cycle-level Hitachi SH-4 CPU core.
//!
//! This crate implements the interpreter core of an SH-4 emulator:
//! 1. **Common:** address types, transfer widths, architectural constants, and
//!    the `CoreError`/`Trap` error and exception types.
//! 2. **Core:** register file, FPU, cache control, the operand and
//!    instruction caches, and the `Cpu` fetch-decode-execute loop.
//! 3. **ISA:** a flat `Op` enum plus its decoder, encoder, and disassembler.
//! 4. **Assembler:** a text-to-binary pattern matcher built on the same `Op`.
//! 5. **Sim:** the external collaborator traits (`Memory`, `BiosFile`,
//!    `InterruptController`) the CPU is constructed against.
//!
//! The surrounding system bus, peripheral devices, and host presentation
//! layer are out of scope; an embedder supplies RAM, a BIOS image, and an
//! optional interrupt source by implementing the traits in [`sim`].

/// Address types, transfer widths, architectural constants, errors and traps.
pub mod common;
/// Construction-time configuration (`Config`, `Default` matching hard reset).
pub mod config;
/// Architectural state, caches, and the `Cpu` interpreter.
pub mod core;
/// Instruction set: field extraction, `Op`, decode, encode, disassembly.
pub mod isa;
/// The text assembler/disassembler built on `isa::Op`.
pub mod assembler;
/// External collaborator traits (`Memory`, `BiosFile`, `InterruptController`).
pub mod sim;
/// Execution statistics.
pub mod stats;

/// Root configuration type; construct with `Config::default()` or deserialize it.
pub use crate::config::Config;
/// The CPU: registers, caches, and the fetch-decode-execute loop.
pub use crate::core::Cpu;
/// The single error type returned by fallible core APIs.
pub use crate::common::error::CoreError;
/// The architectural exception/interrupt representation.
pub use crate::common::error::Trap;

//! SH-4 instruction set: field extraction, the `Op` decode target, and the
//! decoder/encoder/disassembler built from it.
//!
//! The four submodules share a single source of truth: [`op::Op`]. `decode`
//! and `encode` are exact inverses of each other on every opcode this core
//! supports (round-trip verified in their test modules), and both the
//! debugger's `disasm` output and the `assembler` crate-level module build
//! text on top of the same `Op` values.

/// Bit-field extraction helpers shared by the decoder and encoder.
pub mod fields;

/// The `Op` enum: one variant per canonical SH-4 instruction form.
pub mod op;

/// Decodes a 16-bit opcode into an `Op`.
pub mod decode;

/// Encodes an `Op` back into its 16-bit opcode.
pub mod encode;

/// Renders an `Op` as a human-readable mnemonic line.
pub mod disasm;

pub use decode::decode;
pub use encode::encode;
pub use op::Op;

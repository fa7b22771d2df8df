//! Core error and architectural trap definitions.
//!
//! This module defines the error handling mechanisms for the core. It provides:
//! 1. **`CoreError`:** the single error type returned by fallible APIs (cache
//!    operations, the Memory Access Layer, the assembler).
//! 2. **`Trap`:** the architectural exception representation the interpreter
//!    converts memory and decode failures into before dispatching through VBR.

use thiserror::Error;

/// The single error type returned by fallible core APIs.
///
/// Covers assertion failures, host-allocation and caller-bounds failures,
/// address/TLB faults, out-of-range API parameters, and assembler/collaborator
/// failures. `CoreError` implements [`std::error::Error`] via `thiserror` so it
/// composes with any error-reporting the embedding host already does.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// An invariant the core relies on internally was violated.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// A host memory allocation failed.
    #[error("allocation failed: {0}")]
    FailedAlloc(String),

    /// A bounds check controlled by the caller failed.
    #[error("overflow: {0}")]
    Overflow(String),

    /// An access was unaligned for its width, or targeted a forbidden area
    /// for the current processor mode.
    #[error("address error at {addr:#010x}: {reason}")]
    AddressError {
        /// The offending virtual address.
        addr: u32,
        /// Human-readable reason (misalignment or privilege).
        reason: String,
    },

    /// The MMU found no matching UTLB entry for the access.
    #[error("TLB miss at {0:#010x}")]
    TlbMiss(u32),

    /// The MMU found a matching entry but it forbids the access.
    #[error("TLB protection violation at {0:#010x}")]
    TlbProtection(u32),

    /// An API was called with an operand outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// The assembler found no pattern matching the given token stream.
    #[error("unrecognized instruction pattern: {0}")]
    UnrecognizedPattern(String),

    /// The assembler found a syntactically valid register index that is
    /// architecturally out of range (e.g. an odd `DR`/`XD` index).
    #[error("register index out of range: {0}")]
    RegisterIndexError(String),

    /// An external collaborator (`Memory`, `BiosFile`, ...) reported failure.
    #[error("external I/O failure: {0}")]
    ExternalIoFailure(String),
}

/// An architectural SH-4 exception or interrupt.
///
/// Unlike [`CoreError`], a `Trap` is not a Rust failure: hardware always
/// "succeeds" at taking a trap by definition, so the interpreter's step loop
/// converts a `Trap` into a state transition (EXPEVT/SPC/SSR updated, PC
/// redirected through VBR) rather than propagating it as an `Err`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trap {
    /// Instruction fetch at a misaligned or forbidden address.
    InstructionAddressError {
        /// The faulting program counter.
        pc: u32,
    },
    /// Data read at a misaligned or forbidden address.
    DataAddressErrorRead {
        /// The faulting address.
        addr: u32,
    },
    /// Data write at a misaligned or forbidden address.
    DataAddressErrorWrite {
        /// The faulting address.
        addr: u32,
    },
    /// No UTLB entry matched a data read.
    TlbMissRead {
        /// The faulting address.
        addr: u32,
    },
    /// No UTLB entry matched a data write.
    TlbMissWrite {
        /// The faulting address.
        addr: u32,
    },
    /// A matching UTLB entry forbids the read.
    TlbProtectionRead {
        /// The faulting address.
        addr: u32,
    },
    /// A matching UTLB entry forbids the write.
    TlbProtectionWrite {
        /// The faulting address.
        addr: u32,
    },
    /// The fetched 16-bit word does not decode to any known instruction.
    IllegalInstruction {
        /// The undecodable opcode.
        opcode: u16,
    },
    /// As [`Trap::IllegalInstruction`], but the opcode occupied a delay slot.
    SlotIllegalInstruction {
        /// The undecodable opcode.
        opcode: u16,
    },
    /// An FPU instruction executed while `SR.FD` is set.
    FpuDisable,
    /// As [`Trap::FpuDisable`], but the instruction occupied a delay slot.
    SlotFpuDisable,
    /// A `TRAPA` instruction executed.
    Trapa {
        /// The 8-bit immediate packed into TRA.
        imm: u8,
    },
    /// An externally posted interrupt was accepted at an instruction boundary.
    Interrupt {
        /// The controller-reported priority level.
        level: u8,
    },
}

impl Trap {
    /// The EXPEVT code hardware would report for this trap.
    pub fn expevt(self) -> u32 {
        use crate::common::constants::*;
        match self {
            Trap::InstructionAddressError { .. } => EXPEVT_INSTRUCTION_ADDRESS_ERROR,
            Trap::DataAddressErrorRead { .. } => EXPEVT_DATA_ADDRESS_ERROR_READ,
            Trap::DataAddressErrorWrite { .. } => EXPEVT_DATA_ADDRESS_ERROR_WRITE,
            Trap::TlbMissRead { .. } => EXPEVT_TLB_MISS_READ,
            Trap::TlbMissWrite { .. } => EXPEVT_TLB_MISS_WRITE,
            Trap::TlbProtectionRead { .. } => EXPEVT_TLB_PROTECTION_READ,
            Trap::TlbProtectionWrite { .. } => EXPEVT_TLB_PROTECTION_WRITE,
            Trap::IllegalInstruction { .. } => EXPEVT_ILLEGAL_INSTRUCTION,
            Trap::SlotIllegalInstruction { .. } => EXPEVT_SLOT_ILLEGAL_INSTRUCTION,
            Trap::FpuDisable => EXPEVT_FPU_DISABLE,
            Trap::SlotFpuDisable => EXPEVT_SLOT_FPU_DISABLE,
            Trap::Trapa { .. } => EXPEVT_TRAPA,
            Trap::Interrupt { level } => {
                EXPEVT_INTERRUPT_BASE + (u32::from(level) << EXPEVT_INTERRUPT_LEVEL_SHIFT)
            }
        }
    }
}

impl std::fmt::Display for Trap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trap::InstructionAddressError { pc } => {
                write!(f, "instruction address error at {pc:#010x}")
            }
            Trap::DataAddressErrorRead { addr } => {
                write!(f, "data address error (read) at {addr:#010x}")
            }
            Trap::DataAddressErrorWrite { addr } => {
                write!(f, "data address error (write) at {addr:#010x}")
            }
            Trap::TlbMissRead { addr } => write!(f, "TLB miss (read) at {addr:#010x}"),
            Trap::TlbMissWrite { addr } => write!(f, "TLB miss (write) at {addr:#010x}"),
            Trap::TlbProtectionRead { addr } => {
                write!(f, "TLB protection violation (read) at {addr:#010x}")
            }
            Trap::TlbProtectionWrite { addr } => {
                write!(f, "TLB protection violation (write) at {addr:#010x}")
            }
            Trap::IllegalInstruction { opcode } => write!(f, "illegal instruction {opcode:#06x}"),
            Trap::SlotIllegalInstruction { opcode } => {
                write!(f, "illegal instruction {opcode:#06x} in delay slot")
            }
            Trap::FpuDisable => write!(f, "FPU disabled"),
            Trap::SlotFpuDisable => write!(f, "FPU disabled (delay slot)"),
            Trap::Trapa { imm } => write!(f, "TRAPA #{imm}"),
            Trap::Interrupt { level } => write!(f, "interrupt accepted at level {level}"),
        }
    }
}

impl std::error::Error for Trap {}

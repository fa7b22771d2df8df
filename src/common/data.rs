//! Memory access classification and transfer-width types.

use crate::common::error::CoreError;

/// Type of memory access operation.
///
/// Used to distinguish between instruction fetches and data loads/stores when
/// consulting the Address Decoder and the caches, since each obeys slightly
/// different routing and privilege rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch, routed through the instruction cache.
    Fetch,
    /// Data read, routed through the operand cache.
    Read,
    /// Data write, routed through the operand cache.
    Write,
}

/// A memory transfer width, in bytes.
///
/// The SH-4 core never reads or writes a width other than these four; modeling
/// width as a closed sum type (per the Design Notes' "polymorphism over widths")
/// lets the cache and memory-access layer dispatch on it with an exhaustive
/// match instead of a runtime range check in the hot path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Width {
    /// One byte.
    B1,
    /// Two bytes (a word).
    B2,
    /// Four bytes (a longword).
    B4,
    /// Eight bytes (a double, used only by FPU double-precision moves).
    B8,
}

impl Width {
    /// The width in bytes.
    #[inline(always)]
    pub fn bytes(self) -> u32 {
        match self {
            Width::B1 => 1,
            Width::B2 => 2,
            Width::B4 => 4,
            Width::B8 => 8,
        }
    }

    /// Builds a `Width` from a byte count, rejecting anything not in `{1,2,4,8}`.
    pub fn from_bytes(n: u32) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Width::B1),
            2 => Ok(Width::B2),
            4 => Ok(Width::B4),
            8 => Ok(Width::B8),
            _ => Err(CoreError::InvalidParam(format!(
                "width must be one of 1, 2, 4, 8 bytes, got {n}"
            ))),
        }
    }
}

//! Global architectural constants.
//!
//! This module defines system-wide constants used across the core. It includes:
//! 1. **Address-space constants:** area boundaries, the ORA window, the P4 register strip.
//! 2. **Cache geometry:** line size and count for the operand and instruction caches.
//! 3. **Status/control register bit layouts:** SR, FPSCR, CCR field shifts and masks.
//! 4. **Exception codes:** EXPEVT values used by the trap-dispatch path.

/// Instruction width in bytes; PC always advances by this much absent a branch.
pub const INSTRUCTION_SIZE: u32 = 2;

/// Mask selecting the three area-identifying top bits of a virtual address.
pub const P4_AREA_MASK: u32 = 0xE000_0000;
/// Value of the top three bits that identifies the P4 area.
pub const P4_AREA_VALUE: u32 = 0xE000_0000;

/// Mask identifying the cache-as-RAM (ORA) physical address window: the top
/// three bits of the 29-bit physical space, i.e. physical area 7.
///
/// The reference core checks this against an address that still carries the
/// two area-select bits P0's passthrough strips before a `PhysAddr` exists
/// (`0xFC00_0000`/`0x7C00_0000` there). Once those bits are gone the
/// equivalent window inside the 29-bit `p` this core works with is area 7:
/// `0x1C00_0000`..=`0x1FFF_FFFF`.
pub const ORA_WINDOW_MASK: u32 = 0x1C00_0000;
/// Value the ORA window's top bits must equal.
pub const ORA_WINDOW_VALUE: u32 = 0x1C00_0000;

/// Cache line size in bytes, shared by the operand and instruction caches.
pub const CACHE_LINE_SIZE: usize = 32;
/// log2 of [`CACHE_LINE_SIZE`], i.e. the number of offset bits within a line.
pub const CACHE_LINE_SHIFT: u32 = 5;

/// Number of lines in the 16 KB operand cache.
pub const OC_LINE_COUNT: usize = 512;
/// Number of lines in the 8 KB instruction cache.
pub const IC_LINE_COUNT: usize = 256;

/// Number of lines exposed as directly addressable RAM when ORA is set
/// (the upper half of the operand cache: 256 lines, 8 KB).
pub const OC_RAM_LINE_COUNT: usize = 256;

// ---------------------------------------------------------------------------
// Status Register (SR) field layout.
// ---------------------------------------------------------------------------

/// T (test/carry) flag bit position.
pub const SR_T_SHIFT: u32 = 0;
/// S (saturation) flag bit position, used by MAC.W/MAC.L.
pub const SR_S_SHIFT: u32 = 1;
/// Interrupt mask field shift (4 bits).
pub const SR_IMASK_SHIFT: u32 = 4;
/// Interrupt mask field mask (post-shift).
pub const SR_IMASK_MASK: u32 = 0xF;
/// Q bit position, used by DIV0U/DIV0S/DIV1.
pub const SR_Q_SHIFT: u32 = 8;
/// M bit position, used by DIV0S/DIV1.
pub const SR_M_SHIFT: u32 = 9;
/// FD (FPU disable) bit position.
pub const SR_FD_SHIFT: u32 = 15;
/// BL (interrupt block) bit position.
pub const SR_BL_SHIFT: u32 = 28;
/// RB (register bank select) bit position.
pub const SR_RB_SHIFT: u32 = 29;
/// MD (processor mode: 1 = privileged) bit position.
pub const SR_MD_SHIFT: u32 = 30;

// ---------------------------------------------------------------------------
// FPSCR field layout.
// ---------------------------------------------------------------------------

/// Rounding-mode field shift (2 bits: 0 = round-to-nearest, 1 = round-to-zero).
pub const FPSCR_RM_SHIFT: u32 = 0;
/// Rounding-mode field mask (post-shift).
pub const FPSCR_RM_MASK: u32 = 0x3;
/// Exception-flag field shift (5 bits: inexact/underflow/overflow/div-by-zero/invalid).
pub const FPSCR_FLAG_SHIFT: u32 = 2;
/// Exception-enable field shift (5 bits, same bit order as FLAG).
pub const FPSCR_ENABLE_SHIFT: u32 = 7;
/// Exception-cause field shift (6 bits: the above five plus FPU error).
pub const FPSCR_CAUSE_SHIFT: u32 = 12;
/// DN (treat denormals as zero) bit position.
pub const FPSCR_DN_SHIFT: u32 = 18;
/// PR (precision: 0 = single, 1 = double) bit position.
pub const FPSCR_PR_SHIFT: u32 = 19;
/// SZ (transfer size for FMOV pair/double forms) bit position.
pub const FPSCR_SZ_SHIFT: u32 = 20;
/// FR (FPU register bank select) bit position.
pub const FPSCR_FR_SHIFT: u32 = 21;

// ---------------------------------------------------------------------------
// Cache Control Register (CCR) field layout.
// ---------------------------------------------------------------------------

/// OCE (operand cache enable) bit position.
pub const CCR_OCE_SHIFT: u32 = 0;
/// WT (write-through, when CB is not set) bit position.
pub const CCR_WT_SHIFT: u32 = 1;
/// CB (copy-back default for P1) bit position.
pub const CCR_CB_SHIFT: u32 = 2;
/// OIX (operand cache index-enable) bit position.
pub const CCR_OIX_SHIFT: u32 = 7;
/// ORA (cache-as-RAM enable) bit position.
pub const CCR_ORA_SHIFT: u32 = 5;
/// ICE (instruction cache enable) bit position.
pub const CCR_ICE_SHIFT: u32 = 8;
/// IIX (instruction cache index-enable) bit position.
pub const CCR_IIX_SHIFT: u32 = 15;

// ---------------------------------------------------------------------------
// EXPEVT exception codes.
// ---------------------------------------------------------------------------

/// Instruction address error (PC misaligned or in a forbidden area).
pub const EXPEVT_INSTRUCTION_ADDRESS_ERROR: u32 = 0x0E0;
/// Data address error on read.
pub const EXPEVT_DATA_ADDRESS_ERROR_READ: u32 = 0x0E0;
/// Data address error on write.
pub const EXPEVT_DATA_ADDRESS_ERROR_WRITE: u32 = 0x100;
/// TLB miss on data read.
pub const EXPEVT_TLB_MISS_READ: u32 = 0x040;
/// TLB miss on data write.
pub const EXPEVT_TLB_MISS_WRITE: u32 = 0x060;
/// TLB protection violation on data read.
pub const EXPEVT_TLB_PROTECTION_READ: u32 = 0x0A0;
/// TLB protection violation on data write.
pub const EXPEVT_TLB_PROTECTION_WRITE: u32 = 0x0C0;
/// General illegal instruction.
pub const EXPEVT_ILLEGAL_INSTRUCTION: u32 = 0x180;
/// Illegal instruction decoded in a delay slot.
pub const EXPEVT_SLOT_ILLEGAL_INSTRUCTION: u32 = 0x1A0;
/// General FPU-disable exception.
pub const EXPEVT_FPU_DISABLE: u32 = 0x800;
/// FPU-disable exception raised on an instruction in a delay slot.
pub const EXPEVT_SLOT_FPU_DISABLE: u32 = 0x820;
/// TRAPA (software exception) event code.
pub const EXPEVT_TRAPA: u32 = 0x160;
/// Base EXPEVT code for an externally posted interrupt; the controller's
/// priority level is folded in above this (see [`crate::common::error::Trap::expevt`]).
pub const EXPEVT_INTERRUPT_BASE: u32 = 0x200;
/// Bits of EXPEVT an interrupt priority level occupies, above [`EXPEVT_INTERRUPT_BASE`].
pub const EXPEVT_INTERRUPT_LEVEL_SHIFT: u32 = 5;

/// Mask extracting the EXPEVT code proper (low 12 bits of the register).
pub const EXPEVT_CODE_MASK: u32 = 0xFFF;

/// Shift of the immediate field packed into TRA for TRAPA.
pub const TRA_IMM_SHIFT: u32 = 2;
/// Mask of the immediate field within TRA, pre-shift.
pub const TRA_IMM_MASK: u32 = 0xFF;

/// Architectural reset vector: PC on `on_hard_reset()`.
pub const RESET_VECTOR_PC: u32 = 0xA000_0000;
/// Architectural reset vector for VBR.
pub const RESET_VECTOR_VBR: u32 = 0x0000_0000;

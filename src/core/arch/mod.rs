//! SH-4 architectural state: registers and their bit-level encodings.
//!
//! 1. **`gpr`:** the banked general-register file.
//! 2. **`fpr`:** the dual-bank, dual-precision FPU register file.
//! 3. **`sr`:** the status register.
//! 4. **`fpscr`:** the FPU status/control register.
//! 5. **`sysregs`:** the remaining non-banked system registers.

/// Floating-point register file (dual bank, single/double aliasing).
pub mod fpr;
/// FPU status/control register.
pub mod fpscr;
/// Banked general-purpose register file.
pub mod gpr;
/// Status register.
pub mod sr;
/// Non-banked system registers (GBR, VBR, SSR, SPC, SGR, DBR, MACH, MACL, PR, EXPEVT, TRA).
pub mod sysregs;

pub use fpr::Fpr;
pub use fpscr::{Fpscr, RoundingMode};
pub use gpr::Gpr;
pub use sr::Sr;
pub use sysregs::SysRegs;

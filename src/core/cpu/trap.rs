//! Architectural exception/interrupt dispatch.

use super::Cpu;
use crate::common::constants::TRA_IMM_SHIFT;
use crate::common::error::Trap;

impl Cpu {
    /// Dispatches `trap`: saves `SSR`/`SPC`/`SGR`, sets `EXPEVT` (and `TRA`
    /// for `TRAPA`), enters privileged/blocked/bank-1 state, discards any
    /// pending delayed branch, and redirects `PC` to `VBR + 0x100`.
    ///
    /// Real hardware varies the vector offset by exception class (general
    /// vs. TLB-miss vs. reset); this core always uses the general vector,
    /// since no TLB is modeled and reset is handled by `on_hard_reset`
    /// directly (see DESIGN.md).
    pub(crate) fn raise(&mut self, trap: Trap) {
        self.sysregs.ssr = self.sr.0;
        self.sysregs.spc = self.pc;
        self.sysregs.sgr = self.gen_reg(15);
        self.sysregs.expevt = trap.expevt();
        if let Trap::Trapa { imm } = trap {
            self.sysregs.tra = u32::from(imm) << TRA_IMM_SHIFT;
        }

        self.sr.set_md(true);
        self.sr.set_bl(true);
        self.sr.set_rb(1);

        self.pc = self.sysregs.vbr.wrapping_add(0x100);
        self.clear_delayed_branch();
        self.stats.exceptions += 1;

        tracing::debug!(
            trap = %trap,
            expevt = format_args!("{:#x}", self.sysregs.expevt),
            pc = format_args!("{:#010x}", self.pc),
            "dispatched trap"
        );
    }

    /// Discards a pending delayed branch; a trap raised in a delay slot (or
    /// while one is queued) takes priority over the branch it interrupted.
    pub(crate) fn clear_delayed_branch(&mut self) {
        self.delayed_pending = false;
        self.delayed_target = 0;
    }
}

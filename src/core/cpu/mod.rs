//! The `Cpu` type: construction, reset, the Memory Access Layer, trap
//! dispatch, and the fetch-decode-execute loop.

use crate::common::error::{CoreError, Trap};
use crate::config::Config;
use crate::core::arch::{Fpr, Fpscr, Gpr, Sr, SysRegs};
use crate::core::units::cache::{InstructionCache, OperandCache};
use crate::isa::{self, Op};
use crate::sim::{InterruptController, Memory};
use crate::stats::Stats;

/// The Address Decoder and the Memory Access Layer funnel (`read_inst`,
/// `read_data`, `write_data`).
pub mod memory;
/// Architectural exception/interrupt dispatch (`raise`, `RTE`).
pub mod trap;
/// Instruction execution: one method per operation category.
pub mod execution;

pub use execution::PcUpdate;

/// Outcome of a single [`Cpu::step`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// One instruction (plus, if this step retired a pending delayed branch,
    /// the branch itself) completed normally.
    Normal,
    /// `SLEEP` is in effect; the caller should not call `step()` again until
    /// an interrupt is posted.
    Halted,
}

/// The SH-4 CPU core: architectural state, both caches, and the interpreter
/// loop. Constructed against the `Memory` trait rather than any concrete
/// system; the embedder supplies RAM, a BIOS image, and interrupts.
pub struct Cpu {
    /// The 24-slot banked general-register file.
    pub gpr: Gpr,
    /// The dual-bank, dual-precision FPU register file, plus FPUL.
    pub fpr: Fpr,
    /// Status register.
    pub sr: Sr,
    /// FPU status/control register.
    pub fpscr: Fpscr,
    /// The remaining non-banked system registers.
    pub sysregs: SysRegs,
    /// Program counter, always 2-byte aligned.
    pub pc: u32,
    /// Cache control register fields.
    pub ccr: crate::core::units::cache::CacheControl,
    /// The operand cache.
    pub oc: OperandCache,
    /// The instruction cache.
    pub ic: InstructionCache,

    delayed_pending: bool,
    delayed_target: u32,
    halted: bool,

    /// Running execution counters.
    pub stats: Stats,
    /// Construction-time configuration.
    pub config: Config,

    /// The most recent host-visible fault (an `ExternalIoFailure` or a
    /// programmer error), recorded without advancing `pc`. Distinct from an
    /// architectural [`Trap`], which the interpreter dispatches itself.
    pub last_fault: Option<CoreError>,
}

impl Cpu {
    /// Creates a CPU at the architectural reset state, applying `config`.
    pub fn new(config: Config) -> Self {
        let mut cpu = Self {
            gpr: Gpr::new(),
            fpr: Fpr::new(),
            sr: Sr::reset_value(),
            fpscr: Fpscr::reset_value(),
            sysregs: SysRegs::default(),
            pc: crate::common::constants::RESET_VECTOR_PC,
            ccr: config.initial_ccr,
            oc: OperandCache::new(),
            ic: InstructionCache::new(),
            delayed_pending: false,
            delayed_target: 0,
            halted: false,
            stats: Stats::new(),
            config,
            last_fault: None,
        };
        cpu.sysregs.vbr = crate::common::constants::RESET_VECTOR_VBR;
        cpu
    }

    /// Zeros both caches, resets every register to its architectural
    /// reset value, and clears delayed-branch/halt state.
    pub fn on_hard_reset(&mut self) {
        self.gpr.reset();
        self.fpr.reset();
        self.sr = Sr::reset_value();
        self.fpscr = Fpscr::reset_value();
        self.sysregs = SysRegs::default();
        self.sysregs.vbr = crate::common::constants::RESET_VECTOR_VBR;
        self.pc = crate::common::constants::RESET_VECTOR_PC;
        self.ccr = crate::core::units::cache::CacheControl::default();
        self.oc.reset();
        self.ic.reset();
        self.delayed_pending = false;
        self.delayed_target = 0;
        self.halted = false;
        self.stats = Stats::new();
        self.last_fault = None;
        tracing::debug!("hard reset complete");
    }

    /// Call before a batch of `step()` invocations; synchronizes any
    /// host-side FPU rounding mode with `FPSCR.RM`. This core has no host
    /// FPU control register to program, so this is presently a documented
    /// no-op hook kept for parity with the external-interface surface.
    pub fn enter(&self) {
        tracing::trace!(rm = ?self.fpscr.rm(), "enter: fpu rounding mode");
    }

    /// True while `SLEEP` has halted the CPU.
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Executes one instruction (or resumes from a pending delayed branch),
    /// consulting `irq` for a pending interrupt at the instruction boundary.
    ///
    /// A memory fault outside the architectural exception model (an
    /// `ExternalIoFailure`, or a programmer error) is recorded in
    /// [`Cpu::last_fault`] and returned as `Err`; `pc` is left unchanged so
    /// the caller can retry or abort. Architectural exceptions (misaligned or
    /// forbidden accesses, illegal instructions, `TRAPA`, interrupts) are
    /// dispatched internally and never surface as `Err`.
    pub fn step(
        &mut self,
        mem: &mut dyn Memory,
        irq: Option<&mut dyn InterruptController>,
    ) -> Result<StepOutcome, CoreError> {
        if self.halted {
            if let Some(ctrl) = irq {
                if ctrl.pending().is_some() {
                    self.halted = false;
                } else {
                    return Ok(StepOutcome::Halted);
                }
            } else {
                return Ok(StepOutcome::Halted);
            }
        }

        if !self.sr.bl() {
            if let Some(ctrl) = irq {
                if let Some(level) = ctrl.pending() {
                    if u32::from(level) > self.sr.imask() {
                        self.raise(Trap::Interrupt { level });
                        return Ok(StepOutcome::Normal);
                    }
                }
            }
        }

        let instr_pc = self.pc;
        let in_delay_slot = self.delayed_pending;
        let delay_target = self.delayed_target;
        if in_delay_slot {
            self.delayed_pending = false;
        }

        let opcode = match self.read_inst(mem, instr_pc) {
            Ok(word) => word,
            Err(CoreError::AddressError { addr, .. }) => {
                self.raise(Trap::InstructionAddressError { pc: addr });
                return Ok(StepOutcome::Normal);
            }
            Err(e) => {
                self.last_fault = Some(e.clone());
                return Err(e);
            }
        };

        let decoded = isa::decode(opcode);
        let Some(op) = decoded else {
            let trap = if in_delay_slot {
                Trap::SlotIllegalInstruction { opcode }
            } else {
                Trap::IllegalInstruction { opcode }
            };
            self.raise(trap);
            return Ok(StepOutcome::Normal);
        };

        if in_delay_slot && op.is_delayed_branch() {
            tracing::warn!(
                pc = format_args!("{instr_pc:#010x}"),
                opcode,
                "delayed branch decoded in a delay slot; executing it anyway, its own \
                 target overwrites the pending one"
            );
        }

        if self.config.trace_retirement {
            tracing::trace!(pc = format_args!("{instr_pc:#010x}"), ?op, "retiring");
        }

        let update = match self.execute(op, mem, instr_pc, in_delay_slot) {
            Ok(update) => update,
            Err(CoreError::AddressError { addr, reason }) => {
                let trap = if reason.contains("write") {
                    Trap::DataAddressErrorWrite { addr }
                } else {
                    Trap::DataAddressErrorRead { addr }
                };
                self.raise(trap);
                return Ok(StepOutcome::Normal);
            }
            Err(e) => {
                self.last_fault = Some(e.clone());
                return Err(e);
            }
        };

        match update {
            PcUpdate::Trapped => {}
            PcUpdate::Next => {
                self.pc = if in_delay_slot {
                    delay_target
                } else {
                    instr_pc.wrapping_add(crate::common::constants::INSTRUCTION_SIZE)
                };
            }
            PcUpdate::Immediate(target) => {
                self.pc = if in_delay_slot { delay_target } else { target };
            }
            PcUpdate::Delayed(target) => {
                self.delayed_pending = true;
                self.delayed_target = target;
                self.stats.branches_taken += 1;
                self.pc = if in_delay_slot {
                    delay_target
                } else {
                    instr_pc.wrapping_add(crate::common::constants::INSTRUCTION_SIZE)
                };
            }
            PcUpdate::Halt => {
                self.halted = true;
                self.pc = if in_delay_slot {
                    delay_target
                } else {
                    instr_pc.wrapping_add(crate::common::constants::INSTRUCTION_SIZE)
                };
            }
        }

        self.stats.instructions_retired += 1;
        Ok(StepOutcome::Normal)
    }

    /// Runs `step()` until `pc` equals `target`, stopping immediately on a
    /// halt or host-visible fault. Intended for test harnesses; an
    /// emulator's real scheduling loop should drive `step()` itself.
    pub fn run_until(&mut self, mem: &mut dyn Memory, target: u32) -> Result<(), CoreError> {
        while self.pc != target {
            match self.step(mem, None)? {
                StepOutcome::Normal => {}
                StepOutcome::Halted => break,
            }
        }
        Ok(())
    }

    /// Snapshot of the general-register file, current bank only (R0..R15 as
    /// the running program currently sees them).
    pub fn get_regs(&self) -> [u32; 16] {
        let rb = self.sr.rb();
        std::array::from_fn(|i| self.gpr.read(i as u32, rb))
    }

    /// Restores the general-register file's current bank from a snapshot.
    pub fn set_regs(&mut self, regs: [u32; 16]) {
        let rb = self.sr.rb();
        for (i, v) in regs.into_iter().enumerate() {
            self.gpr.write(i as u32, rb, v);
        }
    }

    /// Snapshot of the sixteen single-precision registers in the active FPU bank.
    pub fn get_fpu(&self) -> [f32; 16] {
        let bank = self.fpscr.fr();
        std::array::from_fn(|i| self.fpr.fr(i as u32, bank))
    }

    /// Restores the active FPU bank's sixteen single-precision registers.
    pub fn set_fpu(&mut self, regs: [f32; 16]) {
        let bank = self.fpscr.fr();
        for (i, v) in regs.into_iter().enumerate() {
            self.fpr.set_fr(i as u32, bank, v);
        }
    }

    /// Reads general register `n` (0..16), honoring `SR.RB`.
    pub fn gen_reg(&self, n: u32) -> u32 {
        self.gpr.read(n, self.sr.rb())
    }

    /// Reads banked register `n` (0..8) from the bank opposite `SR.RB`.
    pub fn bank_reg(&self, n: u32) -> u32 {
        self.gpr.read_bank(n, self.sr.rb())
    }

    /// Reads single-precision register `FRn` in the active FPU bank.
    pub fn fpu_fr(&self, n: u32) -> f32 {
        self.fpr.fr(n, self.fpscr.fr())
    }

    /// Reads double-precision register `DRn` in the active FPU bank.
    pub fn fpu_dr(&self, n: u32) -> f64 {
        self.fpr.dr(n, self.fpscr.fr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collaborators::test_support::VecMemory;

    fn ram() -> VecMemory {
        VecMemory::new(0x1_0000_0000u64 as usize >> 16 << 16 | 0x1_0000)
    }

    #[test]
    fn hard_reset_establishes_architectural_state() {
        let mut cpu = Cpu::new(Config::default());
        cpu.pc = 0x1234;
        cpu.on_hard_reset();
        assert_eq!(cpu.pc, crate::common::constants::RESET_VECTOR_PC);
        assert!(cpu.sr.md());
        assert!(cpu.sr.bl());
        assert_eq!(cpu.sr.imask(), 0xF);
        assert_eq!(cpu.sr.rb(), 1);
        assert!(!cpu.ccr.oce);
        assert!(!cpu.ccr.ice);
    }

    #[test]
    fn nop_advances_pc_by_two() {
        let mut cpu = Cpu::new(Config::default());
        let mut mem = ram();
        cpu.pc = 0;
        mem.write(&0x0009u16.to_le_bytes(), 0).unwrap();
        cpu.step(&mut mem, None).unwrap();
        assert_eq!(cpu.pc, 2);
        assert_eq!(cpu.stats.instructions_retired, 1);
    }

    #[test]
    fn illegal_opcode_dispatches_through_vbr() {
        let mut cpu = Cpu::new(Config::default());
        let mut mem = ram();
        cpu.pc = 0;
        cpu.sysregs.vbr = 0x9000_0000;
        mem.write(&0x7FFFu16.to_le_bytes(), 0).unwrap();
        cpu.step(&mut mem, None).unwrap();
        assert_eq!(cpu.pc, 0x9000_0100);
        assert_eq!(
            cpu.sysregs.expevt,
            crate::common::constants::EXPEVT_ILLEGAL_INSTRUCTION
        );
    }
}

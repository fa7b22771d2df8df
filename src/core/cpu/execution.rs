//! Instruction execution: one match arm per [`Op`] variant.
//!
//! `execute` never advances `pc` itself; it reports what the caller should do
//! through [`PcUpdate`], so [`super::Cpu::step`] alone owns the delayed-branch
//! bookkeeping (SPEC_FULL.md §4.5, §9).

use super::Cpu;
use crate::common::data::{AccessType, Width};
use crate::common::error::{CoreError, Trap};
use crate::isa::op::{CmpKind, ExtReg, FixedShift, FpAddr, LoadSrc, StoreDst, SysReg};
use crate::isa::Op;
use crate::sim::Memory;

/// What `execute` wants done to `pc` once it returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PcUpdate {
    /// A trap was raised; `pc` already points at the handler.
    Trapped,
    /// Advance to the next sequential instruction (or, inside a delay slot,
    /// to the already-pending branch target).
    Next,
    /// Branch immediately to this absolute target (`BT`/`BF`, not delayed).
    Immediate(u32),
    /// Queue this absolute target as a delayed branch; the next instruction
    /// (the delay slot) still executes first.
    Delayed(u32),
    /// `SLEEP`: halt until an interrupt is posted.
    Halt,
}

fn is_fpu_op(op: Op) -> bool {
    matches!(
        op,
        Op::FMoveReg { .. }
            | Op::FMoveLoad { .. }
            | Op::FMoveStore { .. }
            | Op::FMoveDrToXd { .. }
            | Op::FMoveXdToDr { .. }
            | Op::FMoveXdToXd { .. }
            | Op::FAdd { .. }
            | Op::FSub { .. }
            | Op::FMul { .. }
            | Op::FDiv { .. }
            | Op::FCmpEq { .. }
            | Op::FCmpGt { .. }
            | Op::FMac { .. }
            | Op::FAbs { .. }
            | Op::FNeg { .. }
            | Op::FSqrt { .. }
            | Op::FSrra { .. }
            | Op::FldI0 { .. }
            | Op::FldI1 { .. }
            | Op::Flds { .. }
            | Op::Fsts { .. }
            | Op::Float { .. }
            | Op::Ftrc { .. }
            | Op::FcnvDs { .. }
            | Op::FcnvSd { .. }
            | Op::Fipr { .. }
            | Op::Ftrv { .. }
            | Op::FrChg
            | Op::FsChg
    )
}

impl Cpu {
    pub(crate) fn execute(
        &mut self,
        op: Op,
        mem: &mut dyn Memory,
        instr_pc: u32,
        in_delay_slot: bool,
    ) -> Result<PcUpdate, CoreError> {
        if self.sr.fd() && is_fpu_op(op) {
            self.raise(if in_delay_slot {
                Trap::SlotFpuDisable
            } else {
                Trap::FpuDisable
            });
            return Ok(PcUpdate::Trapped);
        }

        let rb = self.sr.rb();
        // Every branch-target and return-address calculation below uses
        // PC+4, not PC+2: the SH-4 manual defines "PC" in those formulas as
        // the address of the instruction *after* the delay slot, a pipeline
        // artifact that shows up in BRA/BSR/BT/BF/BRAF/BSRF/JSR alike (see
        // SPEC_FULL.md §8 scenario 2). Plain sequential advance (`PcUpdate::Next`)
        // is unaffected: that's computed from `instr_pc` directly in `step`.
        let pc4 = instr_pc.wrapping_add(4);

        match op {
            // ---- Moves ----
            Op::MovReg { n, m } => {
                self.gpr.write(n, rb, self.gen_reg(m));
                Ok(PcUpdate::Next)
            }
            Op::MovImm { n, imm } => {
                self.gpr.write(n, rb, imm as u32);
                Ok(PcUpdate::Next)
            }
            Op::Mova { disp } => {
                let base = (instr_pc & !0x3).wrapping_add(4);
                self.gpr.write(0, rb, base.wrapping_add(disp));
                Ok(PcUpdate::Next)
            }
            Op::Load { n, width, src } => {
                let addr = self.load_addr(src, width, instr_pc);
                let raw = self.read_data(mem, addr, width)?;
                let val = sign_extend_load(raw, width);
                self.gpr.write(n, rb, val);
                Ok(PcUpdate::Next)
            }
            Op::Store { m, width, dst } => {
                let addr = self.store_addr(dst, width);
                let val = truncate_store(self.gen_reg(m), width);
                self.write_data(mem, addr, width, val)?;
                Ok(PcUpdate::Next)
            }
            Op::ExtuB { n, m } => {
                self.gpr.write(n, rb, self.gen_reg(m) & 0xFF);
                Ok(PcUpdate::Next)
            }
            Op::ExtuW { n, m } => {
                self.gpr.write(n, rb, self.gen_reg(m) & 0xFFFF);
                Ok(PcUpdate::Next)
            }
            Op::ExtsB { n, m } => {
                self.gpr.write(n, rb, (self.gen_reg(m) as i8 as i32) as u32);
                Ok(PcUpdate::Next)
            }
            Op::ExtsW { n, m } => {
                self.gpr
                    .write(n, rb, (self.gen_reg(m) as i16 as i32) as u32);
                Ok(PcUpdate::Next)
            }
            Op::Swap { n, m, width } => {
                let v = self.gen_reg(m);
                let result = match width {
                    Width::B1 => (v & 0xFFFF_0000) | ((v & 0xFF) << 8) | ((v >> 8) & 0xFF),
                    Width::B2 => (v << 16) | (v >> 16),
                    _ => unreachable!("SWAP only decodes B1/B2"),
                };
                self.gpr.write(n, rb, result);
                Ok(PcUpdate::Next)
            }
            Op::Xtrct { n, m } => {
                let result = (self.gen_reg(n) >> 16) | (self.gen_reg(m) << 16);
                self.gpr.write(n, rb, result);
                Ok(PcUpdate::Next)
            }

            // ---- Arithmetic ----
            Op::Add { n, m } => {
                let r = self.gen_reg(n).wrapping_add(self.gen_reg(m));
                self.gpr.write(n, rb, r);
                Ok(PcUpdate::Next)
            }
            Op::AddImm { n, imm } => {
                self.gpr.write(n, rb, self.gen_reg(n).wrapping_add(imm as u32));
                Ok(PcUpdate::Next)
            }
            Op::Addc { n, m } => {
                let (r1, c1) = self.gen_reg(n).overflowing_add(self.gen_reg(m));
                let (r2, c2) = r1.overflowing_add(self.sr.t() as u32);
                self.gpr.write(n, rb, r2);
                self.sr.set_t(c1 || c2);
                Ok(PcUpdate::Next)
            }
            Op::Addv { n, m } => {
                let (r, overflow) = (self.gen_reg(n) as i32).overflowing_add(self.gen_reg(m) as i32);
                self.gpr.write(n, rb, r as u32);
                self.sr.set_t(overflow);
                Ok(PcUpdate::Next)
            }
            Op::Sub { n, m } => {
                let r = self.gen_reg(n).wrapping_sub(self.gen_reg(m));
                self.gpr.write(n, rb, r);
                Ok(PcUpdate::Next)
            }
            Op::Subc { n, m } => {
                let (r1, b1) = self.gen_reg(n).overflowing_sub(self.gen_reg(m));
                let (r2, b2) = r1.overflowing_sub(self.sr.t() as u32);
                self.gpr.write(n, rb, r2);
                self.sr.set_t(b1 || b2);
                Ok(PcUpdate::Next)
            }
            Op::Subv { n, m } => {
                let (r, overflow) = (self.gen_reg(n) as i32).overflowing_sub(self.gen_reg(m) as i32);
                self.gpr.write(n, rb, r as u32);
                self.sr.set_t(overflow);
                Ok(PcUpdate::Next)
            }
            Op::Neg { n, m } => {
                self.gpr.write(n, rb, 0u32.wrapping_sub(self.gen_reg(m)));
                Ok(PcUpdate::Next)
            }
            Op::Negc { n, m } => {
                let (r1, b1) = 0u32.overflowing_sub(self.gen_reg(m));
                let (r2, b2) = r1.overflowing_sub(self.sr.t() as u32);
                self.gpr.write(n, rb, r2);
                self.sr.set_t(b1 || b2);
                Ok(PcUpdate::Next)
            }
            Op::CmpReg { kind, n, m } => {
                let rn = self.gen_reg(n);
                let rm = self.gen_reg(m);
                let t = match kind {
                    CmpKind::Eq => rn == rm,
                    CmpKind::Hs => rn >= rm,
                    CmpKind::Ge => (rn as i32) >= (rm as i32),
                    CmpKind::Hi => rn > rm,
                    CmpKind::Gt => (rn as i32) > (rm as i32),
                    CmpKind::Pl => (rn as i32) > 0,
                    CmpKind::Pz => (rn as i32) >= 0,
                    CmpKind::Str => {
                        let x = rn ^ rm;
                        x & 0xFF == 0 || x & 0xFF00 == 0 || x & 0xFF_0000 == 0 || x & 0xFF00_0000 == 0
                    }
                };
                self.sr.set_t(t);
                Ok(PcUpdate::Next)
            }
            Op::CmpImm { imm } => {
                self.sr.set_t((self.gen_reg(0) as i32) == imm);
                Ok(PcUpdate::Next)
            }
            Op::MulL { n, m } => {
                self.sysregs.macl = self.gen_reg(n).wrapping_mul(self.gen_reg(m));
                Ok(PcUpdate::Next)
            }
            Op::MulsW { n, m } => {
                let r = (self.gen_reg(n) as i16 as i32).wrapping_mul(self.gen_reg(m) as i16 as i32);
                self.sysregs.macl = r as u32;
                Ok(PcUpdate::Next)
            }
            Op::MuluW { n, m } => {
                let r = (self.gen_reg(n) as u16 as u32).wrapping_mul(self.gen_reg(m) as u16 as u32);
                self.sysregs.macl = r;
                Ok(PcUpdate::Next)
            }
            Op::DmulsL { n, m } => {
                let prod = (self.gen_reg(n) as i32 as i64).wrapping_mul(self.gen_reg(m) as i32 as i64);
                self.sysregs.mach = (prod as u64 >> 32) as u32;
                self.sysregs.macl = prod as u64 as u32;
                Ok(PcUpdate::Next)
            }
            Op::DmuluL { n, m } => {
                let prod = (self.gen_reg(n) as u64).wrapping_mul(self.gen_reg(m) as u64);
                self.sysregs.mach = (prod >> 32) as u32;
                self.sysregs.macl = prod as u32;
                Ok(PcUpdate::Next)
            }
            Op::MacL { n, m } => {
                self.exec_mac_l(mem, n, m)?;
                Ok(PcUpdate::Next)
            }
            Op::MacW { n, m } => {
                self.exec_mac_w(mem, n, m)?;
                Ok(PcUpdate::Next)
            }
            Op::Dt { n } => {
                let r = self.gen_reg(n).wrapping_sub(1);
                self.gpr.write(n, rb, r);
                self.sr.set_t(r == 0);
                Ok(PcUpdate::Next)
            }
            Op::Div0U => {
                self.sr.set_q(false);
                self.sr.set_m(false);
                self.sr.set_t(false);
                Ok(PcUpdate::Next)
            }
            Op::Div0S { n, m } => {
                let q = (self.gen_reg(n) >> 31) & 1 != 0;
                let msign = (self.gen_reg(m) >> 31) & 1 != 0;
                self.sr.set_q(q);
                self.sr.set_m(msign);
                self.sr.set_t(q != msign);
                Ok(PcUpdate::Next)
            }
            Op::Div1 { n, m } => {
                self.exec_div1(n, m);
                Ok(PcUpdate::Next)
            }

            // ---- Logical and shifts ----
            Op::And { n, m } => {
                self.gpr.write(n, rb, self.gen_reg(n) & self.gen_reg(m));
                Ok(PcUpdate::Next)
            }
            Op::AndImm { imm } => {
                self.gpr.write(0, rb, self.gen_reg(0) & imm);
                Ok(PcUpdate::Next)
            }
            Op::AndByteGbr { imm } => {
                self.rmw_gbr_byte(mem, |b| b & imm as u8)?;
                Ok(PcUpdate::Next)
            }
            Op::Or { n, m } => {
                self.gpr.write(n, rb, self.gen_reg(n) | self.gen_reg(m));
                Ok(PcUpdate::Next)
            }
            Op::OrImm { imm } => {
                self.gpr.write(0, rb, self.gen_reg(0) | imm);
                Ok(PcUpdate::Next)
            }
            Op::OrByteGbr { imm } => {
                self.rmw_gbr_byte(mem, |b| b | imm as u8)?;
                Ok(PcUpdate::Next)
            }
            Op::Xor { n, m } => {
                self.gpr.write(n, rb, self.gen_reg(n) ^ self.gen_reg(m));
                Ok(PcUpdate::Next)
            }
            Op::XorImm { imm } => {
                self.gpr.write(0, rb, self.gen_reg(0) ^ imm);
                Ok(PcUpdate::Next)
            }
            Op::XorByteGbr { imm } => {
                self.rmw_gbr_byte(mem, |b| b ^ imm as u8)?;
                Ok(PcUpdate::Next)
            }
            Op::Not { n, m } => {
                self.gpr.write(n, rb, !self.gen_reg(m));
                Ok(PcUpdate::Next)
            }
            Op::Shad { n, m } => {
                let r = shift_arith_dynamic(self.gen_reg(n), self.gen_reg(m) as i32);
                self.gpr.write(n, rb, r);
                Ok(PcUpdate::Next)
            }
            Op::Shld { n, m } => {
                let r = shift_logical_dynamic(self.gen_reg(n), self.gen_reg(m) as i32);
                self.gpr.write(n, rb, r);
                Ok(PcUpdate::Next)
            }
            Op::Shal { n } => {
                let v = self.gen_reg(n);
                self.sr.set_t((v >> 31) & 1 != 0);
                self.gpr.write(n, rb, v << 1);
                Ok(PcUpdate::Next)
            }
            Op::Shar { n } => {
                let v = self.gen_reg(n);
                self.sr.set_t(v & 1 != 0);
                self.gpr.write(n, rb, ((v as i32) >> 1) as u32);
                Ok(PcUpdate::Next)
            }
            Op::Shll { n } => {
                let v = self.gen_reg(n);
                self.sr.set_t((v >> 31) & 1 != 0);
                self.gpr.write(n, rb, v << 1);
                Ok(PcUpdate::Next)
            }
            Op::Shlr { n } => {
                let v = self.gen_reg(n);
                self.sr.set_t(v & 1 != 0);
                self.gpr.write(n, rb, v >> 1);
                Ok(PcUpdate::Next)
            }
            Op::FixedShift { op: shift, n } => {
                let v = self.gen_reg(n);
                let r = match shift {
                    FixedShift::Shll2 => v << 2,
                    FixedShift::Shlr2 => v >> 2,
                    FixedShift::Shll8 => v << 8,
                    FixedShift::Shlr8 => v >> 8,
                    FixedShift::Shll16 => v << 16,
                    FixedShift::Shlr16 => v >> 16,
                };
                self.gpr.write(n, rb, r);
                Ok(PcUpdate::Next)
            }
            Op::Rotl { n } => {
                let v = self.gen_reg(n);
                self.sr.set_t((v >> 31) & 1 != 0);
                self.gpr.write(n, rb, v.rotate_left(1));
                Ok(PcUpdate::Next)
            }
            Op::Rotr { n } => {
                let v = self.gen_reg(n);
                self.sr.set_t(v & 1 != 0);
                self.gpr.write(n, rb, v.rotate_right(1));
                Ok(PcUpdate::Next)
            }
            Op::Rotcl { n } => {
                let v = self.gen_reg(n);
                let old_t = self.sr.t() as u32;
                self.sr.set_t((v >> 31) & 1 != 0);
                self.gpr.write(n, rb, (v << 1) | old_t);
                Ok(PcUpdate::Next)
            }
            Op::Rotcr { n } => {
                let v = self.gen_reg(n);
                let old_t = self.sr.t() as u32;
                self.sr.set_t(v & 1 != 0);
                self.gpr.write(n, rb, (v >> 1) | (old_t << 31));
                Ok(PcUpdate::Next)
            }

            // ---- Bit tests ----
            Op::Tst { n, m } => {
                self.sr.set_t(self.gen_reg(n) & self.gen_reg(m) == 0);
                Ok(PcUpdate::Next)
            }
            Op::TstImm { imm } => {
                self.sr.set_t(self.gen_reg(0) & imm == 0);
                Ok(PcUpdate::Next)
            }
            Op::TstByteGbr { imm } => {
                let addr = self.sysregs.gbr.wrapping_add(self.gen_reg(0));
                let byte = self.read_data(mem, addr, Width::B1)? as u8;
                self.sr.set_t(byte as u32 & imm == 0);
                Ok(PcUpdate::Next)
            }
            Op::TasB { n } => {
                let addr = self.gen_reg(n);
                let byte = self.read_data(mem, addr, Width::B1)? as u8;
                self.sr.set_t(byte == 0);
                self.write_data(mem, addr, Width::B1, (byte | 0x80) as u64)?;
                Ok(PcUpdate::Next)
            }

            // ---- Branches ----
            Op::Bt { disp } => Ok(branch_if(self.sr.t(), pc4, disp)),
            Op::Bf { disp } => Ok(branch_if(!self.sr.t(), pc4, disp)),
            Op::BtS { disp } => Ok(if self.sr.t() {
                PcUpdate::Delayed(pc4.wrapping_add(disp as u32))
            } else {
                PcUpdate::Next
            }),
            Op::BfS { disp } => Ok(if !self.sr.t() {
                PcUpdate::Delayed(pc4.wrapping_add(disp as u32))
            } else {
                PcUpdate::Next
            }),
            Op::Bra { disp } => Ok(PcUpdate::Delayed(pc4.wrapping_add(disp as u32))),
            Op::Bsr { disp } => {
                self.sysregs.pr = pc4;
                Ok(PcUpdate::Delayed(pc4.wrapping_add(disp as u32)))
            }
            Op::Braf { n } => Ok(PcUpdate::Delayed(pc4.wrapping_add(self.gen_reg(n)))),
            Op::Bsrf { n } => {
                self.sysregs.pr = pc4;
                Ok(PcUpdate::Delayed(pc4.wrapping_add(self.gen_reg(n))))
            }
            Op::Jmp { n } => Ok(PcUpdate::Delayed(self.gen_reg(n))),
            Op::Jsr { n } => {
                self.sysregs.pr = pc4;
                Ok(PcUpdate::Delayed(self.gen_reg(n)))
            }
            Op::Rts => Ok(PcUpdate::Delayed(self.sysregs.pr)),
            Op::Rte => {
                let target = self.sysregs.spc;
                self.sr = crate::core::arch::Sr(self.sysregs.ssr);
                Ok(PcUpdate::Delayed(target))
            }

            // ---- System/FPU control ----
            Op::LdcReg { reg, m } => {
                self.store_sysreg(reg, self.gen_reg(m));
                Ok(PcUpdate::Next)
            }
            Op::LdcMem { reg, m } => {
                let addr = self.gen_reg(m);
                let val = self.read_data(mem, addr, Width::B4)? as u32;
                self.gpr.write(m, rb, addr.wrapping_add(4));
                self.store_sysreg(reg, val);
                Ok(PcUpdate::Next)
            }
            Op::StcReg { reg, n } => {
                let val = self.load_sysreg(reg);
                self.gpr.write(n, rb, val);
                Ok(PcUpdate::Next)
            }
            Op::StcMem { reg, n } => {
                let addr = self.gen_reg(n).wrapping_sub(4);
                self.gpr.write(n, rb, addr);
                let val = self.load_sysreg(reg);
                self.write_data(mem, addr, Width::B4, val as u64)?;
                Ok(PcUpdate::Next)
            }
            Op::LdsReg { reg, m } => {
                self.store_extreg(reg, self.gen_reg(m));
                Ok(PcUpdate::Next)
            }
            Op::LdsMem { reg, m } => {
                let addr = self.gen_reg(m);
                let val = self.read_data(mem, addr, Width::B4)? as u32;
                self.gpr.write(m, rb, addr.wrapping_add(4));
                self.store_extreg(reg, val);
                Ok(PcUpdate::Next)
            }
            Op::StsReg { reg, n } => {
                let val = self.load_extreg(reg);
                self.gpr.write(n, rb, val);
                Ok(PcUpdate::Next)
            }
            Op::StsMem { reg, n } => {
                let addr = self.gen_reg(n).wrapping_sub(4);
                self.gpr.write(n, rb, addr);
                let val = self.load_extreg(reg);
                self.write_data(mem, addr, Width::B4, val as u64)?;
                Ok(PcUpdate::Next)
            }
            Op::ClrMac => {
                self.sysregs.mach = 0;
                self.sysregs.macl = 0;
                Ok(PcUpdate::Next)
            }
            Op::ClrS => {
                self.sr.set_s(false);
                Ok(PcUpdate::Next)
            }
            Op::ClrT => {
                self.sr.set_t(false);
                Ok(PcUpdate::Next)
            }
            Op::SetS => {
                self.sr.set_s(true);
                Ok(PcUpdate::Next)
            }
            Op::SetT => {
                self.sr.set_t(true);
                Ok(PcUpdate::Next)
            }
            Op::FrChg => {
                self.fpscr.toggle_fr();
                Ok(PcUpdate::Next)
            }
            Op::FsChg => {
                self.fpscr.toggle_sz();
                Ok(PcUpdate::Next)
            }

            // ---- FPU ----
            Op::FMoveReg { n, m } => {
                let bank = self.fpscr.fr();
                if self.fpscr.sz() {
                    let v = self.fpr.dr(m, bank);
                    self.fpr.set_dr(n, bank, v);
                } else {
                    let v = self.fpr.fr_bits(m, bank);
                    self.fpr.set_fr_bits(n, bank, v);
                }
                Ok(PcUpdate::Next)
            }
            Op::FMoveLoad { n, addr } => {
                let bank = self.fpscr.fr();
                let width_bytes = if self.fpscr.sz() { 8 } else { 4 };
                let eff = self.fp_mem_addr(addr, width_bytes);
                let width = if self.fpscr.sz() { Width::B8 } else { Width::B4 };
                let raw = self.read_data(mem, eff, width)?;
                if self.fpscr.sz() {
                    self.fpr.set_dr(n, bank, f64::from_bits(raw));
                } else {
                    self.fpr.set_fr_bits(n, bank, raw as u32);
                }
                Ok(PcUpdate::Next)
            }
            Op::FMoveStore { m, addr } => {
                let bank = self.fpscr.fr();
                let width_bytes = if self.fpscr.sz() { 8 } else { 4 };
                let eff = self.fp_mem_addr(addr, width_bytes);
                let width = if self.fpscr.sz() { Width::B8 } else { Width::B4 };
                let raw = if self.fpscr.sz() {
                    self.fpr.dr(m, bank).to_bits()
                } else {
                    self.fpr.fr_bits(m, bank) as u64
                };
                self.write_data(mem, eff, width, raw)?;
                Ok(PcUpdate::Next)
            }
            Op::FMoveDrToXd { n, m } => {
                let bank = self.fpscr.fr();
                let v = self.fpr.dr(m, bank);
                self.fpr.set_xd(n, bank, v);
                Ok(PcUpdate::Next)
            }
            Op::FMoveXdToDr { n, m } => {
                let bank = self.fpscr.fr();
                let v = self.fpr.xd(m, bank);
                self.fpr.set_dr(n, bank, v);
                Ok(PcUpdate::Next)
            }
            Op::FMoveXdToXd { n, m } => {
                let bank = self.fpscr.fr();
                let v = self.fpr.xd(m, bank);
                self.fpr.set_xd(n, bank, v);
                Ok(PcUpdate::Next)
            }
            Op::FAdd { n, m } => {
                self.fpu_binop(n, m, |a, b| a + b, |a, b| a + b);
                Ok(PcUpdate::Next)
            }
            Op::FSub { n, m } => {
                self.fpu_binop(n, m, |a, b| a - b, |a, b| a - b);
                Ok(PcUpdate::Next)
            }
            Op::FMul { n, m } => {
                self.fpu_binop(n, m, |a, b| a * b, |a, b| a * b);
                Ok(PcUpdate::Next)
            }
            Op::FDiv { n, m } => {
                self.fpu_binop(n, m, |a, b| a / b, |a, b| a / b);
                Ok(PcUpdate::Next)
            }
            Op::FCmpEq { n, m } => {
                let bank = self.fpscr.fr();
                let t = if self.fpscr.pr() {
                    self.fpr.dr(n, bank) == self.fpr.dr(m, bank)
                } else {
                    self.fpr.fr(n, bank) == self.fpr.fr(m, bank)
                };
                self.sr.set_t(t);
                Ok(PcUpdate::Next)
            }
            Op::FCmpGt { n, m } => {
                let bank = self.fpscr.fr();
                let t = if self.fpscr.pr() {
                    self.fpr.dr(n, bank) > self.fpr.dr(m, bank)
                } else {
                    self.fpr.fr(n, bank) > self.fpr.fr(m, bank)
                };
                self.sr.set_t(t);
                Ok(PcUpdate::Next)
            }
            Op::FMac { n, m } => {
                let bank = self.fpscr.fr();
                let r = self.fpr.fr(0, bank) * self.fpr.fr(m, bank) + self.fpr.fr(n, bank);
                self.fpr.set_fr(n, bank, r);
                Ok(PcUpdate::Next)
            }
            Op::FAbs { n } => {
                let bank = self.fpscr.fr();
                if self.fpscr.pr() {
                    let v = self.fpr.dr(n, bank).abs();
                    self.fpr.set_dr(n, bank, v);
                } else {
                    let v = self.fpr.fr(n, bank).abs();
                    self.fpr.set_fr(n, bank, v);
                }
                Ok(PcUpdate::Next)
            }
            Op::FNeg { n } => {
                let bank = self.fpscr.fr();
                if self.fpscr.pr() {
                    let v = -self.fpr.dr(n, bank);
                    self.fpr.set_dr(n, bank, v);
                } else {
                    let v = -self.fpr.fr(n, bank);
                    self.fpr.set_fr(n, bank, v);
                }
                Ok(PcUpdate::Next)
            }
            Op::FSqrt { n } => {
                let bank = self.fpscr.fr();
                if self.fpscr.pr() {
                    let v = self.fpr.dr(n, bank).sqrt();
                    self.fpr.set_dr(n, bank, v);
                } else {
                    let v = self.fpr.fr(n, bank).sqrt();
                    self.fpr.set_fr(n, bank, v);
                }
                Ok(PcUpdate::Next)
            }
            Op::FSrra { n } => {
                let bank = self.fpscr.fr();
                let v = 1.0f32 / self.fpr.fr(n, bank).sqrt();
                self.fpr.set_fr(n, bank, v);
                Ok(PcUpdate::Next)
            }
            Op::FldI0 { n } => {
                let bank = self.fpscr.fr();
                self.fpr.set_fr(n, bank, 0.0);
                Ok(PcUpdate::Next)
            }
            Op::FldI1 { n } => {
                let bank = self.fpscr.fr();
                self.fpr.set_fr(n, bank, 1.0);
                Ok(PcUpdate::Next)
            }
            Op::Flds { m } => {
                let bank = self.fpscr.fr();
                self.fpr.fpul = self.fpr.fr_bits(m, bank);
                Ok(PcUpdate::Next)
            }
            Op::Fsts { n } => {
                let bank = self.fpscr.fr();
                let v = self.fpr.fpul;
                self.fpr.set_fr_bits(n, bank, v);
                Ok(PcUpdate::Next)
            }
            Op::Float { n } => {
                let bank = self.fpscr.fr();
                let src = self.fpr.fpul as i32;
                if self.fpscr.pr() {
                    self.fpr.set_dr(n, bank, src as f64);
                } else {
                    self.fpr.set_fr(n, bank, src as f32);
                }
                Ok(PcUpdate::Next)
            }
            Op::Ftrc { n } => {
                let bank = self.fpscr.fr();
                let truncated = if self.fpscr.pr() {
                    truncate_to_i32(self.fpr.dr(n, bank))
                } else {
                    truncate_to_i32(self.fpr.fr(n, bank) as f64)
                };
                self.fpr.fpul = truncated as u32;
                Ok(PcUpdate::Next)
            }
            Op::FcnvDs { n } => {
                let bank = self.fpscr.fr();
                self.fpr.fpul = (self.fpr.dr(n, bank) as f32).to_bits();
                Ok(PcUpdate::Next)
            }
            Op::FcnvSd { n } => {
                let bank = self.fpscr.fr();
                let v = f32::from_bits(self.fpr.fpul) as f64;
                self.fpr.set_dr(n, bank, v);
                Ok(PcUpdate::Next)
            }
            Op::Fipr { n, m } => {
                let bank = self.fpscr.fr();
                let a = self.fpr.fv(n, bank);
                let b = self.fpr.fv(m, bank);
                let dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3];
                self.fpr.set_fr((n & !0x3) + 3, bank, dot);
                Ok(PcUpdate::Next)
            }
            Op::Ftrv { n } => {
                self.exec_ftrv(n);
                Ok(PcUpdate::Next)
            }

            // ---- Caches ----
            Op::OcbI { n } => {
                let addr = self.gen_reg(n);
                let paddr = self.decode_address(addr, Width::B1, AccessType::Read)?;
                self.oc.invalidate(paddr.val(), self.ccr.oix, self.ccr.ora);
                Ok(PcUpdate::Next)
            }
            Op::OcbP { n } => {
                let addr = self.gen_reg(n);
                let paddr = self.decode_address(addr, Width::B1, AccessType::Read)?;
                self.oc.purge(mem, paddr.val(), self.ccr.oix, self.ccr.ora)?;
                Ok(PcUpdate::Next)
            }
            Op::OcbWb { n } => {
                let addr = self.gen_reg(n);
                let paddr = self.decode_address(addr, Width::B1, AccessType::Read)?;
                self.oc
                    .writeback(mem, paddr.val(), self.ccr.oix, self.ccr.ora)?;
                Ok(PcUpdate::Next)
            }
            Op::Pref { n } => {
                let addr = self.gen_reg(n);
                let paddr = self.decode_address(addr, Width::B1, AccessType::Read)?;
                self.oc.prefetch(mem, paddr.val(), self.ccr.oix, self.ccr.ora)?;
                Ok(PcUpdate::Next)
            }
            Op::MovCaL { n } => {
                let addr = self.gen_reg(n);
                if self.ccr.oce {
                    let paddr = self.decode_address(addr, Width::B4, AccessType::Write)?;
                    self.oc.alloc(mem, paddr.val(), self.ccr.oix, self.ccr.ora)?;
                }
                let r0 = self.gen_reg(0);
                self.write_data(mem, addr, Width::B4, r0 as u64)?;
                Ok(PcUpdate::Next)
            }

            // ---- Misc ----
            Op::Nop => Ok(PcUpdate::Next),
            Op::Sleep => Ok(PcUpdate::Halt),
            Op::Ldtlb => {
                tracing::trace!("LDTLB executed; no TLB is modeled, treated as a no-op");
                Ok(PcUpdate::Next)
            }
            Op::Trapa { imm } => {
                self.raise(Trap::Trapa { imm });
                Ok(PcUpdate::Trapped)
            }
        }
    }

    fn load_addr(&mut self, src: LoadSrc, width: Width, instr_pc: u32) -> u32 {
        let rb = self.sr.rb();
        match src {
            LoadSrc::Reg(m) => self.gen_reg(m),
            LoadSrc::PostInc(m) => {
                let a = self.gen_reg(m);
                self.gpr.write(m, rb, a.wrapping_add(width.bytes()));
                a
            }
            LoadSrc::R0Indexed(m) => self.gen_reg(m).wrapping_add(self.gen_reg(0)),
            LoadSrc::Disp(disp, m) => self.gen_reg(m).wrapping_add(disp),
            LoadSrc::GbrDisp(disp) => self.sysregs.gbr.wrapping_add(disp),
            LoadSrc::PcDisp(disp) => (instr_pc & !0x3).wrapping_add(4).wrapping_add(disp),
        }
    }

    fn store_addr(&mut self, dst: StoreDst, width: Width) -> u32 {
        let rb = self.sr.rb();
        match dst {
            StoreDst::Reg(n) => self.gen_reg(n),
            StoreDst::PreDec(n) => {
                let a = self.gen_reg(n).wrapping_sub(width.bytes());
                self.gpr.write(n, rb, a);
                a
            }
            StoreDst::R0Indexed(n) => self.gen_reg(n).wrapping_add(self.gen_reg(0)),
            StoreDst::Disp(disp, n) => self.gen_reg(n).wrapping_add(disp),
            StoreDst::GbrDisp(disp) => self.sysregs.gbr.wrapping_add(disp),
        }
    }

    fn fp_mem_addr(&mut self, addr: FpAddr, width: u32) -> u32 {
        let rb = self.sr.rb();
        match addr {
            FpAddr::Reg(r) => self.gen_reg(r),
            FpAddr::Indirect(r) => self.gen_reg(r),
            FpAddr::PostInc(r) => {
                let a = self.gen_reg(r);
                self.gpr.write(r, rb, a.wrapping_add(width));
                a
            }
            FpAddr::PreDec(r) => {
                let a = self.gen_reg(r).wrapping_sub(width);
                self.gpr.write(r, rb, a);
                a
            }
            FpAddr::R0Indexed(r) => self.gen_reg(r).wrapping_add(self.gen_reg(0)),
        }
    }

    fn rmw_gbr_byte(
        &mut self,
        mem: &mut dyn Memory,
        f: impl FnOnce(u8) -> u8,
    ) -> Result<(), CoreError> {
        let addr = self.sysregs.gbr.wrapping_add(self.gen_reg(0));
        let byte = self.read_data(mem, addr, Width::B1)? as u8;
        self.write_data(mem, addr, Width::B1, f(byte) as u64)
    }

    fn exec_mac_l(&mut self, mem: &mut dyn Memory, n: u32, m: u32) -> Result<(), CoreError> {
        let rb = self.sr.rb();
        let ra = self.gen_reg(m);
        let a = self.read_data(mem, ra, Width::B4)? as i32;
        self.gpr.write(m, rb, ra.wrapping_add(4));
        let rb_addr = self.gen_reg(n);
        let b = self.read_data(mem, rb_addr, Width::B4)? as i32;
        self.gpr.write(n, rb, rb_addr.wrapping_add(4));

        let product = i64::from(a) * i64::from(b);
        if self.sr.s() {
            const MAX48: i64 = 0x0000_7FFF_FFFF_FFFF;
            const MIN48: i64 = -0x0000_8000_0000_0000;
            let acc = (self.sysregs.mac48() + product).clamp(MIN48, MAX48);
            self.sysregs.set_mac48(acc);
        } else {
            let acc = self.sysregs.mac64().wrapping_add(product);
            self.sysregs.set_mac64(acc);
        }
        Ok(())
    }

    fn exec_mac_w(&mut self, mem: &mut dyn Memory, n: u32, m: u32) -> Result<(), CoreError> {
        let rb = self.sr.rb();
        let ra = self.gen_reg(m);
        let a = self.read_data(mem, ra, Width::B2)? as i16;
        self.gpr.write(m, rb, ra.wrapping_add(2));
        let rb_addr = self.gen_reg(n);
        let b = self.read_data(mem, rb_addr, Width::B2)? as i16;
        self.gpr.write(n, rb, rb_addr.wrapping_add(2));

        let product = i64::from(a) * i64::from(b);
        if self.sr.s() {
            const MAX32: i64 = i32::MAX as i64;
            const MIN32: i64 = i32::MIN as i64;
            let sum = i64::from(self.sysregs.macl as i32) + product;
            if sum > MAX32 || sum < MIN32 {
                self.sysregs.macl = sum.clamp(MIN32, MAX32) as i32 as u32;
                self.sysregs.mach = 1;
            } else {
                self.sysregs.macl = sum as u32;
            }
        } else {
            let acc = self.sysregs.mac64().wrapping_add(product);
            self.sysregs.set_mac64(acc);
        }
        Ok(())
    }

    fn exec_div1(&mut self, n: u32, m: u32) {
        let rb = self.sr.rb();
        let old_q = self.sr.q();
        let m_flag = self.sr.m();
        let rn = self.gen_reg(n);
        let rm = self.gen_reg(m);
        let tentative_q = (rn >> 31) & 1 != 0;
        let shifted = (rn << 1) | (self.sr.t() as u32);

        let (result, new_q) = match (old_q, m_flag) {
            (false, false) => {
                let sub = shifted.wrapping_sub(rm);
                let borrow = sub > shifted;
                (sub, if !tentative_q { borrow } else { !borrow })
            }
            (false, true) => {
                let add = shifted.wrapping_add(rm);
                let carry = add < shifted;
                (add, if !tentative_q { !carry } else { carry })
            }
            (true, false) => {
                let add = shifted.wrapping_add(rm);
                let carry = add < shifted;
                (add, if !tentative_q { carry } else { !carry })
            }
            (true, true) => {
                let sub = shifted.wrapping_sub(rm);
                let borrow = sub > shifted;
                (sub, if !tentative_q { !borrow } else { borrow })
            }
        };

        self.gpr.write(n, rb, result);
        self.sr.set_q(new_q);
        self.sr.set_t(new_q == m_flag);
    }

    fn fpu_binop(&mut self, n: u32, m: u32, single: impl Fn(f32, f32) -> f32, double: impl Fn(f64, f64) -> f64) {
        let bank = self.fpscr.fr();
        if self.fpscr.pr() {
            let r = double(self.fpr.dr(n, bank), self.fpr.dr(m, bank));
            self.fpr.set_dr(n, bank, r);
        } else {
            let r = single(self.fpr.fr(n, bank), self.fpr.fr(m, bank));
            self.fpr.set_fr(n, bank, r);
        }
    }

    fn exec_ftrv(&mut self, n: u32) {
        let bank = self.fpscr.fr();
        let other = 1 - bank;
        let v = self.fpr.fv(n, bank);
        let mut result = [0f32; 4];
        for (i, slot) in result.iter_mut().enumerate() {
            let mut acc = 0f32;
            for (j, vj) in v.iter().enumerate() {
                acc += self.fpr.fr((4 * j + i) as u32, other) * vj;
            }
            *slot = acc;
        }
        self.fpr.set_fv(n, bank, result);
    }

    fn load_sysreg(&self, reg: SysReg) -> u32 {
        let rb = self.sr.rb();
        match reg {
            SysReg::Sr => self.sr.0,
            SysReg::Gbr => self.sysregs.gbr,
            SysReg::Vbr => self.sysregs.vbr,
            SysReg::Ssr => self.sysregs.ssr,
            SysReg::Spc => self.sysregs.spc,
            SysReg::Sgr => self.sysregs.sgr,
            SysReg::Dbr => self.sysregs.dbr,
            SysReg::BankReg(i) => self.gpr.read_bank(i, rb),
        }
    }

    fn store_sysreg(&mut self, reg: SysReg, val: u32) {
        let rb = self.sr.rb();
        match reg {
            SysReg::Sr => self.sr = crate::core::arch::Sr(val),
            SysReg::Gbr => self.sysregs.gbr = val,
            SysReg::Vbr => self.sysregs.vbr = val,
            SysReg::Ssr => self.sysregs.ssr = val,
            SysReg::Spc => self.sysregs.spc = val,
            SysReg::Sgr => self.sysregs.sgr = val,
            SysReg::Dbr => self.sysregs.dbr = val,
            SysReg::BankReg(i) => self.gpr.write_bank(i, rb, val),
        }
    }

    fn load_extreg(&self, reg: ExtReg) -> u32 {
        match reg {
            ExtReg::Mach => self.sysregs.mach,
            ExtReg::Macl => self.sysregs.macl,
            ExtReg::Pr => self.sysregs.pr,
            ExtReg::Fpscr => self.fpscr.0,
            ExtReg::Fpul => self.fpr.fpul,
        }
    }

    fn store_extreg(&mut self, reg: ExtReg, val: u32) {
        match reg {
            ExtReg::Mach => self.sysregs.mach = val,
            ExtReg::Macl => self.sysregs.macl = val,
            ExtReg::Pr => self.sysregs.pr = val,
            ExtReg::Fpscr => self.fpscr = crate::core::arch::Fpscr(val),
            ExtReg::Fpul => self.fpr.fpul = val,
        }
    }
}

fn branch_if(cond: bool, next_pc: u32, disp: i32) -> PcUpdate {
    if cond {
        PcUpdate::Immediate(next_pc.wrapping_add(disp as u32))
    } else {
        PcUpdate::Next
    }
}

fn sign_extend_load(raw: u64, width: Width) -> u32 {
    match width {
        Width::B1 => (raw as u8 as i8 as i32) as u32,
        Width::B2 => (raw as u16 as i16 as i32) as u32,
        Width::B4 => raw as u32,
        Width::B8 => raw as u32,
    }
}

fn truncate_store(val: u32, width: Width) -> u64 {
    match width {
        Width::B1 => (val & 0xFF) as u64,
        Width::B2 => (val & 0xFFFF) as u64,
        _ => val as u64,
    }
}

fn shift_arith_dynamic(rn: u32, rm: i32) -> u32 {
    if rm >= 0 {
        let amt = rm & 0x1F;
        if amt == 0 {
            rn
        } else {
            rn << amt
        }
    } else {
        let amt = (-rm) & 0x1F;
        if amt == 0 {
            if (rn as i32) < 0 {
                0xFFFF_FFFF
            } else {
                0
            }
        } else {
            ((rn as i32) >> amt) as u32
        }
    }
}

fn shift_logical_dynamic(rn: u32, rm: i32) -> u32 {
    if rm >= 0 {
        let amt = rm & 0x1F;
        if amt == 0 {
            rn
        } else {
            rn << amt
        }
    } else {
        let amt = (-rm) & 0x1F;
        if amt == 0 {
            0
        } else {
            rn >> amt
        }
    }
}

/// `FTRC` always truncates toward zero, regardless of `FPSCR.RM`
/// (see [`crate::core::arch::fpscr::Fpscr::rm`]).
fn truncate_to_i32(v: f64) -> i32 {
    let t = v.trunc();
    if t >= i32::MAX as f64 {
        i32::MAX
    } else if t <= i32::MIN as f64 {
        i32::MIN
    } else {
        t as i32
    }
}

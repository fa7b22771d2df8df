//! Decodes a 16-bit opcode into an [`Op`].
//!
//! This core does not reproduce the real SH-4's bit-for-bit opcode map;
//! instead it dispatches on the high nibble into sixteen families, loosely
//! mirroring the real ISA's own high-nibble grouping (register-indirect
//! moves, arithmetic/logical register pairs, unary register ops, branches,
//! immediate forms, FPU). [`crate::isa::encode`] is built against the exact
//! same layout and is this module's inverse; see the two modules' test
//! modules for round-trip coverage.
//!
//! Field names below follow [`super::fields`]: `n` is bits 11..8, `m` is bits
//! 7..4, and the low nibble or byte carries a family-specific sub-tag.

use super::fields::{disp4 as field4, imm8, m as field_m, n as field_n};
use super::op::{CmpKind, ExtReg, FixedShift, FpAddr, LoadSrc, Op, StoreDst, SysReg};
use crate::common::data::Width;

fn width_from_tag(tag: u32) -> Option<Width> {
    match tag {
        0 => Some(Width::B1),
        1 => Some(Width::B2),
        2 => Some(Width::B4),
        _ => None,
    }
}

/// Decodes one 16-bit opcode, returning `None` for any bit pattern this core
/// assigns no meaning (the architectural "illegal instruction" case).
pub fn decode(op: u16) -> Option<Op> {
    let hi = (op >> 12) & 0xF;
    let n = field_n(op);
    let m = field_m(op);
    match hi {
        0x0 => decode_pc_disp(op, n),
        0x1 => decode_load_indirect(n, m, field4(op)),
        0x2 => decode_store_indirect(n, m, field4(op)),
        0x3 => decode_arith_group1(n, m, field4(op)),
        0x4 => decode_unary(n, imm8(op)),
        0x5 => decode_cond_branch((n as u8) & 0x3, imm8(op)),
        0x6 => decode_arith_group2(n, m, field4(op)),
        0x7 => decode_compare_group(n, m, field4(op)),
        0x8 => decode_unconditional_branch(op),
        0x9 => decode_fpu_binary(n, m, field4(op)),
        0xA => decode_r0_imm_group(n, imm8(op)),
        0xB => Some(Op::MovImm {
            n,
            imm: super::fields::sext8(imm8(op)),
        }),
        0xC => Some(Op::Mova {
            disp: (op as u32 & 0xFFF) * 4,
        }),
        0xD => decode_disp_long(n, m, op),
        0xE => Some(Op::AddImm {
            n,
            imm: super::fields::sext8(imm8(op)),
        }),
        0xF => decode_fpu_mem(n, m, op),
        _ => unreachable!("4-bit nibble"),
    }
}

fn decode_unconditional_branch(op: u16) -> Option<Op> {
    let raw = u32::from(op & 0x07FF);
    let disp = (((raw << 21) as i32) >> 21) * 2;
    if op & 0x0800 == 0 {
        Some(Op::Bra { disp })
    } else {
        Some(Op::Bsr { disp })
    }
}

fn decode_fpu_binary(n: u32, m: u32, tag: u32) -> Option<Op> {
    Some(match tag {
        0 => Op::FAdd { n, m },
        1 => Op::FSub { n, m },
        2 => Op::FMul { n, m },
        3 => Op::FDiv { n, m },
        4 => Op::FCmpEq { n, m },
        5 => Op::FCmpGt { n, m },
        6 => Op::FMac { n, m },
        7 => Op::Fipr { n, m },
        8 => Op::FMoveReg { n, m },
        9 => Op::FMoveDrToXd { n, m },
        10 => Op::FMoveXdToDr { n, m },
        11 => Op::FMoveXdToXd { n, m },
        _ => return None,
    })
}

fn decode_pc_disp(op: u16, n: u32) -> Option<Op> {
    let width = if op & 0x0080 != 0 { Width::B4 } else { Width::B2 };
    let disp = u32::from(op & 0x007F) * width.bytes();
    Some(Op::Load {
        n,
        width,
        src: LoadSrc::PcDisp(disp),
    })
}

fn decode_load_indirect(n: u32, m: u32, tag: u32) -> Option<Op> {
    // Tags 9/10 repurpose the `n` nibble as a 4-bit displacement rather than
    // a destination register, mirroring how real SH-4 fixes the destination
    // of `MOV.B/W @(disp,Rm),R0` to R0 and spends that nibble on the
    // displacement instead. Only the long form (hi=0xD, `decode_disp_long`)
    // carries a general destination register.
    match tag {
        9 => return Some(Op::Load { n: 0, width: Width::B1, src: LoadSrc::Disp(n, m) }),
        10 => return Some(Op::Load { n: 0, width: Width::B2, src: LoadSrc::Disp(n * 2, m) }),
        _ => {}
    }
    let mode = tag / 3;
    let width = width_from_tag(tag % 3)?;
    let src = match mode {
        0 => LoadSrc::Reg(m),
        1 => LoadSrc::PostInc(m),
        2 => LoadSrc::R0Indexed(m),
        _ => return None,
    };
    Some(Op::Load { n, width, src })
}

fn decode_store_indirect(n: u32, m: u32, tag: u32) -> Option<Op> {
    // Symmetric with `decode_load_indirect`: tags 9/10 fix the value source
    // to R0 and repurpose the `m` nibble as the displacement, keeping `n`
    // (the address base register) at full range.
    match tag {
        9 => return Some(Op::Store { m: 0, width: Width::B1, dst: StoreDst::Disp(m, n) }),
        10 => return Some(Op::Store { m: 0, width: Width::B2, dst: StoreDst::Disp(m * 2, n) }),
        _ => {}
    }
    let mode = tag / 3;
    let width = width_from_tag(tag % 3)?;
    let dst = match mode {
        0 => StoreDst::Reg(n),
        1 => StoreDst::PreDec(n),
        2 => StoreDst::R0Indexed(n),
        _ => return None,
    };
    Some(Op::Store { m, width, dst })
}

fn decode_arith_group1(n: u32, m: u32, tag: u32) -> Option<Op> {
    Some(match tag {
        0 => Op::MovReg { n, m },
        1 => Op::Add { n, m },
        2 => Op::Sub { n, m },
        3 => Op::And { n, m },
        4 => Op::Or { n, m },
        5 => Op::Xor { n, m },
        6 => Op::Tst { n, m },
        7 => Op::Not { n, m },
        8 => Op::Xtrct { n, m },
        9 => Op::Addc { n, m },
        10 => Op::Addv { n, m },
        11 => Op::Subc { n, m },
        12 => Op::Subv { n, m },
        13 => Op::Neg { n, m },
        14 => Op::Negc { n, m },
        15 => Op::Swap { n, m, width: Width::B1 },
        _ => return None,
    })
}

fn decode_arith_group2(n: u32, m: u32, tag: u32) -> Option<Op> {
    Some(match tag {
        0 => Op::Swap { n, m, width: Width::B2 },
        1 => Op::MulL { n, m },
        2 => Op::MulsW { n, m },
        3 => Op::MuluW { n, m },
        4 => Op::DmulsL { n, m },
        5 => Op::DmuluL { n, m },
        6 => Op::MacL { n, m },
        7 => Op::MacW { n, m },
        8 => Op::Shad { n, m },
        9 => Op::Shld { n, m },
        10 => Op::Div0S { n, m },
        11 => Op::Div1 { n, m },
        12 => Op::ExtuB { n, m },
        13 => Op::ExtuW { n, m },
        14 => Op::ExtsB { n, m },
        15 => Op::ExtsW { n, m },
        _ => return None,
    })
}

fn decode_compare_group(n: u32, m: u32, tag: u32) -> Option<Op> {
    let kind = match tag {
        0 => CmpKind::Eq,
        1 => CmpKind::Hs,
        2 => CmpKind::Ge,
        3 => CmpKind::Hi,
        4 => CmpKind::Gt,
        5 => CmpKind::Pl,
        6 => CmpKind::Pz,
        7 => CmpKind::Str,
        _ => return None,
    };
    Some(Op::CmpReg { kind, n, m })
}

fn decode_cond_branch(tag: u8, imm: u32) -> Option<Op> {
    let disp = super::fields::sext8(imm) * 2;
    Some(match tag {
        0 => Op::Bt { disp },
        1 => Op::Bf { disp },
        2 => Op::BtS { disp },
        3 => Op::BfS { disp },
        _ => return None,
    })
}

fn decode_r0_imm_group(tag: u32, imm: u32) -> Option<Op> {
    Some(match tag {
        0 => Op::AndImm { imm },
        1 => Op::OrImm { imm },
        2 => Op::XorImm { imm },
        3 => Op::TstImm { imm },
        4 => Op::AndByteGbr { imm },
        5 => Op::OrByteGbr { imm },
        6 => Op::XorByteGbr { imm },
        7 => Op::TstByteGbr { imm },
        8 => Op::CmpImm {
            imm: super::fields::sext8(imm),
        },
        9 => Op::Trapa { imm: imm as u8 },
        10 => Op::Load {
            n: 0,
            width: Width::B1,
            src: LoadSrc::GbrDisp(imm),
        },
        11 => Op::Load {
            n: 0,
            width: Width::B2,
            src: LoadSrc::GbrDisp(imm * 2),
        },
        12 => Op::Load {
            n: 0,
            width: Width::B4,
            src: LoadSrc::GbrDisp(imm * 4),
        },
        13 => Op::Store {
            m: 0,
            width: Width::B1,
            dst: StoreDst::GbrDisp(imm),
        },
        14 => Op::Store {
            m: 0,
            width: Width::B2,
            dst: StoreDst::GbrDisp(imm * 2),
        },
        15 => Op::Store {
            m: 0,
            width: Width::B4,
            dst: StoreDst::GbrDisp(imm * 4),
        },
        _ => return None,
    })
}

fn decode_disp_long(n: u32, m: u32, op: u16) -> Option<Op> {
    let dir = (op >> 3) & 0x1;
    let disp = u32::from(op & 0x7) * 4;
    if dir == 0 {
        Some(Op::Load {
            n,
            width: Width::B4,
            src: LoadSrc::Disp(disp, m),
        })
    } else {
        Some(Op::Store {
            m,
            width: Width::B4,
            dst: StoreDst::Disp(disp, n),
        })
    }
}

fn decode_unary(n: u32, code: u32) -> Option<Op> {
    Some(match code {
        0x00 => Op::Dt { n },
        0x01 => Op::Shll { n },
        0x02 => Op::Shlr { n },
        0x03 => Op::Shal { n },
        0x04 => Op::Shar { n },
        0x05 => Op::FixedShift { op: FixedShift::Shll2, n },
        0x06 => Op::FixedShift { op: FixedShift::Shlr2, n },
        0x07 => Op::FixedShift { op: FixedShift::Shll8, n },
        0x08 => Op::FixedShift { op: FixedShift::Shlr8, n },
        0x09 => Op::FixedShift { op: FixedShift::Shll16, n },
        0x0A => Op::FixedShift { op: FixedShift::Shlr16, n },
        0x0B => Op::Rotl { n },
        0x0C => Op::Rotr { n },
        0x0D => Op::Rotcl { n },
        0x0E => Op::Rotcr { n },
        0x0F => Op::TasB { n },
        0x10 => Op::OcbI { n },
        0x11 => Op::OcbP { n },
        0x12 => Op::OcbWb { n },
        0x13 => Op::Pref { n },
        0x14 => Op::MovCaL { n },
        0x15 => Op::Braf { n },
        0x16 => Op::Bsrf { n },
        0x17 => Op::Jmp { n },
        0x18 => Op::Jsr { n },
        0x20..=0x2F => Op::StcReg {
            reg: SysReg::from_code(code - 0x20)?,
            n,
        },
        0x30..=0x3F => Op::StcMem {
            reg: SysReg::from_code(code - 0x30)?,
            n,
        },
        0x40..=0x4F => Op::LdcReg {
            reg: SysReg::from_code(code - 0x40)?,
            m: n,
        },
        0x50..=0x5F => Op::LdcMem {
            reg: SysReg::from_code(code - 0x50)?,
            m: n,
        },
        0x60..=0x64 => Op::LdsReg {
            reg: ExtReg::from_code(code - 0x60)?,
            m: n,
        },
        0x68..=0x6C => Op::LdsMem {
            reg: ExtReg::from_code(code - 0x68)?,
            m: n,
        },
        0x70..=0x74 => Op::StsReg {
            reg: ExtReg::from_code(code - 0x70)?,
            n,
        },
        0x78..=0x7C => Op::StsMem {
            reg: ExtReg::from_code(code - 0x78)?,
            n,
        },
        0x80 => Op::FAbs { n },
        0x81 => Op::FNeg { n },
        0x82 => Op::FSqrt { n },
        0x83 => Op::FSrra { n },
        0x84 => Op::FldI0 { n },
        0x85 => Op::FldI1 { n },
        0x86 => Op::Flds { m: n },
        0x87 => Op::Fsts { n },
        0x88 => Op::Float { n },
        0x89 => Op::Ftrc { n },
        0x8A => Op::FcnvDs { n },
        0x8B => Op::FcnvSd { n },
        0x8C => Op::Ftrv { n },
        0x90 => Op::Nop,
        0x91 => Op::Sleep,
        0x92 => Op::ClrMac,
        0x93 => Op::ClrS,
        0x94 => Op::ClrT,
        0x95 => Op::SetS,
        0x96 => Op::SetT,
        0x97 => Op::FrChg,
        0x98 => Op::FsChg,
        0x99 => Op::Ldtlb,
        0x9A => Op::Rts,
        0x9B => Op::Rte,
        0x9C => Op::Div0U,
        _ => return None,
    })
}

fn decode_fpu_mem(n: u32, addr_reg: u32, op: u16) -> Option<Op> {
    let dir = (op >> 3) & 0x1;
    let mode = op & 0x7;
    let addr = match mode {
        1 => FpAddr::Indirect(addr_reg),
        2 => FpAddr::PostInc(addr_reg),
        3 => FpAddr::PreDec(addr_reg),
        4 => FpAddr::R0Indexed(addr_reg),
        _ => return None,
    };
    if dir == 0 {
        Some(Op::FMoveLoad { n, addr })
    } else {
        Some(Op::FMoveStore { m: n, addr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_zero_operand_forms() {
        assert_eq!(decode(0x4090), Some(Op::Nop));
        assert_eq!(decode(0x409B), Some(Op::Rte));
    }

    #[test]
    fn decodes_arithmetic_register_form() {
        assert_eq!(decode(0x3121), Some(Op::Add { n: 1, m: 2 }));
    }

    #[test]
    fn decodes_mova_scaled_displacement() {
        assert_eq!(decode(0xC003), Some(Op::Mova { disp: 12 }));
    }

    #[test]
    fn unassigned_bit_patterns_decode_to_none() {
        assert_eq!(decode(0x7FFF), None);
    }
}

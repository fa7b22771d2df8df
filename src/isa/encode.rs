//! Encodes an [`Op`] back into its 16-bit opcode.
//!
//! The exact inverse of [`super::decode::decode`]; every opcode built here
//! round-trips through `decode` to the same [`Op`] value (see this module's
//! test suite). The two modules must be kept in lockstep by hand: there is
//! no single shared table, only the shared convention documented in
//! [`super::decode`].

use super::fields::{pack_n_imm8, pack_nm};
use super::op::{CmpKind, FixedShift, FpAddr, LoadSrc, Op, StoreDst};
use crate::common::data::Width;

fn width_tag(width: Width) -> u32 {
    match width {
        Width::B1 => 0,
        Width::B2 => 1,
        Width::B4 => 2,
        Width::B8 => panic!("8-byte transfers have no general-register opcode form"),
    }
}

/// Encodes an `Op` into its 16-bit opcode.
pub fn encode(op: Op) -> u16 {
    match op {
        Op::Load { n, width, src: LoadSrc::PcDisp(disp) } => {
            let wbit = if matches!(width, Width::B4) { 0x0080 } else { 0 };
            0x0000 | ((n as u16) << 8) | wbit | ((disp / width.bytes()) as u16 & 0x7F)
        }
        Op::Load { n, width, src } => encode_load_indirect(n, width, src),
        Op::Store { m, width, dst } => encode_store_indirect(m, width, dst),

        Op::MovReg { n, m } => pack_nm(0x3, n, m, 0),
        Op::Add { n, m } => pack_nm(0x3, n, m, 1),
        Op::Sub { n, m } => pack_nm(0x3, n, m, 2),
        Op::And { n, m } => pack_nm(0x3, n, m, 3),
        Op::Or { n, m } => pack_nm(0x3, n, m, 4),
        Op::Xor { n, m } => pack_nm(0x3, n, m, 5),
        Op::Tst { n, m } => pack_nm(0x3, n, m, 6),
        Op::Not { n, m } => pack_nm(0x3, n, m, 7),
        Op::Xtrct { n, m } => pack_nm(0x3, n, m, 8),
        Op::Addc { n, m } => pack_nm(0x3, n, m, 9),
        Op::Addv { n, m } => pack_nm(0x3, n, m, 10),
        Op::Subc { n, m } => pack_nm(0x3, n, m, 11),
        Op::Subv { n, m } => pack_nm(0x3, n, m, 12),
        Op::Neg { n, m } => pack_nm(0x3, n, m, 13),
        Op::Negc { n, m } => pack_nm(0x3, n, m, 14),
        Op::Swap { n, m, width: Width::B1 } => pack_nm(0x3, n, m, 15),
        Op::Swap { n, m, width: Width::B2 } => pack_nm(0x6, n, m, 0),
        Op::Swap { .. } => panic!("SWAP only supports byte and word transfers"),

        Op::MulL { n, m } => pack_nm(0x6, n, m, 1),
        Op::MulsW { n, m } => pack_nm(0x6, n, m, 2),
        Op::MuluW { n, m } => pack_nm(0x6, n, m, 3),
        Op::DmulsL { n, m } => pack_nm(0x6, n, m, 4),
        Op::DmuluL { n, m } => pack_nm(0x6, n, m, 5),
        Op::MacL { n, m } => pack_nm(0x6, n, m, 6),
        Op::MacW { n, m } => pack_nm(0x6, n, m, 7),
        Op::Shad { n, m } => pack_nm(0x6, n, m, 8),
        Op::Shld { n, m } => pack_nm(0x6, n, m, 9),
        Op::Div0S { n, m } => pack_nm(0x6, n, m, 10),
        Op::Div1 { n, m } => pack_nm(0x6, n, m, 11),
        Op::ExtuB { n, m } => pack_nm(0x6, n, m, 12),
        Op::ExtuW { n, m } => pack_nm(0x6, n, m, 13),
        Op::ExtsB { n, m } => pack_nm(0x6, n, m, 14),
        Op::ExtsW { n, m } => pack_nm(0x6, n, m, 15),

        Op::CmpReg { kind, n, m } => {
            let tag = match kind {
                CmpKind::Eq => 0,
                CmpKind::Hs => 1,
                CmpKind::Ge => 2,
                CmpKind::Hi => 3,
                CmpKind::Gt => 4,
                CmpKind::Pl => 5,
                CmpKind::Pz => 6,
                CmpKind::Str => 7,
            };
            pack_nm(0x7, n, m, tag)
        }

        Op::FAdd { n, m } => pack_nm(0x9, n, m, 0),
        Op::FSub { n, m } => pack_nm(0x9, n, m, 1),
        Op::FMul { n, m } => pack_nm(0x9, n, m, 2),
        Op::FDiv { n, m } => pack_nm(0x9, n, m, 3),
        Op::FCmpEq { n, m } => pack_nm(0x9, n, m, 4),
        Op::FCmpGt { n, m } => pack_nm(0x9, n, m, 5),
        Op::FMac { n, m } => pack_nm(0x9, n, m, 6),
        Op::Fipr { n, m } => pack_nm(0x9, n, m, 7),
        Op::FMoveReg { n, m } => pack_nm(0x9, n, m, 8),
        Op::FMoveDrToXd { n, m } => pack_nm(0x9, n, m, 9),
        Op::FMoveXdToDr { n, m } => pack_nm(0x9, n, m, 10),
        Op::FMoveXdToXd { n, m } => pack_nm(0x9, n, m, 11),

        Op::Bra { disp } => 0x8000 | (((disp / 2) as i16) as u16 & 0x07FF),
        Op::Bsr { disp } => 0x8800 | (((disp / 2) as i16) as u16 & 0x07FF),

        Op::AndImm { imm } => pack_n_imm8(0xA, 0, imm),
        Op::OrImm { imm } => pack_n_imm8(0xA, 1, imm),
        Op::XorImm { imm } => pack_n_imm8(0xA, 2, imm),
        Op::TstImm { imm } => pack_n_imm8(0xA, 3, imm),
        Op::AndByteGbr { imm } => pack_n_imm8(0xA, 4, imm),
        Op::OrByteGbr { imm } => pack_n_imm8(0xA, 5, imm),
        Op::XorByteGbr { imm } => pack_n_imm8(0xA, 6, imm),
        Op::TstByteGbr { imm } => pack_n_imm8(0xA, 7, imm),
        Op::CmpImm { imm } => pack_n_imm8(0xA, 8, imm as u32 & 0xFF),
        Op::Trapa { imm } => pack_n_imm8(0xA, 9, u32::from(imm)),

        Op::MovImm { n, imm } => pack_n_imm8(0xB, n, imm as u32 & 0xFF),
        Op::Mova { disp } => 0xC000 | ((disp / 4) as u16 & 0xFFF),
        Op::AddImm { n, imm } => pack_n_imm8(0xE, n, imm as u32 & 0xFF),

        Op::Dt { n } => pack_n_imm8(0x4, n, 0x00),
        Op::Shll { n } => pack_n_imm8(0x4, n, 0x01),
        Op::Shlr { n } => pack_n_imm8(0x4, n, 0x02),
        Op::Shal { n } => pack_n_imm8(0x4, n, 0x03),
        Op::Shar { n } => pack_n_imm8(0x4, n, 0x04),
        Op::FixedShift { op, n } => {
            let code = match op {
                FixedShift::Shll2 => 0x05,
                FixedShift::Shlr2 => 0x06,
                FixedShift::Shll8 => 0x07,
                FixedShift::Shlr8 => 0x08,
                FixedShift::Shll16 => 0x09,
                FixedShift::Shlr16 => 0x0A,
            };
            pack_n_imm8(0x4, n, code)
        }
        Op::Rotl { n } => pack_n_imm8(0x4, n, 0x0B),
        Op::Rotr { n } => pack_n_imm8(0x4, n, 0x0C),
        Op::Rotcl { n } => pack_n_imm8(0x4, n, 0x0D),
        Op::Rotcr { n } => pack_n_imm8(0x4, n, 0x0E),
        Op::TasB { n } => pack_n_imm8(0x4, n, 0x0F),
        Op::OcbI { n } => pack_n_imm8(0x4, n, 0x10),
        Op::OcbP { n } => pack_n_imm8(0x4, n, 0x11),
        Op::OcbWb { n } => pack_n_imm8(0x4, n, 0x12),
        Op::Pref { n } => pack_n_imm8(0x4, n, 0x13),
        Op::MovCaL { n } => pack_n_imm8(0x4, n, 0x14),
        Op::Braf { n } => pack_n_imm8(0x4, n, 0x15),
        Op::Bsrf { n } => pack_n_imm8(0x4, n, 0x16),
        Op::Jmp { n } => pack_n_imm8(0x4, n, 0x17),
        Op::Jsr { n } => pack_n_imm8(0x4, n, 0x18),

        Op::StcReg { reg, n } => pack_n_imm8(0x4, n, 0x20 + reg.to_code()),
        Op::StcMem { reg, n } => pack_n_imm8(0x4, n, 0x30 + reg.to_code()),
        Op::LdcReg { reg, m } => pack_n_imm8(0x4, m, 0x40 + reg.to_code()),
        Op::LdcMem { reg, m } => pack_n_imm8(0x4, m, 0x50 + reg.to_code()),
        Op::LdsReg { reg, m } => pack_n_imm8(0x4, m, 0x60 + reg.to_code()),
        Op::LdsMem { reg, m } => pack_n_imm8(0x4, m, 0x68 + reg.to_code()),
        Op::StsReg { reg, n } => pack_n_imm8(0x4, n, 0x70 + reg.to_code()),
        Op::StsMem { reg, n } => pack_n_imm8(0x4, n, 0x78 + reg.to_code()),

        Op::FAbs { n } => pack_n_imm8(0x4, n, 0x80),
        Op::FNeg { n } => pack_n_imm8(0x4, n, 0x81),
        Op::FSqrt { n } => pack_n_imm8(0x4, n, 0x82),
        Op::FSrra { n } => pack_n_imm8(0x4, n, 0x83),
        Op::FldI0 { n } => pack_n_imm8(0x4, n, 0x84),
        Op::FldI1 { n } => pack_n_imm8(0x4, n, 0x85),
        Op::Flds { m } => pack_n_imm8(0x4, m, 0x86),
        Op::Fsts { n } => pack_n_imm8(0x4, n, 0x87),
        Op::Float { n } => pack_n_imm8(0x4, n, 0x88),
        Op::Ftrc { n } => pack_n_imm8(0x4, n, 0x89),
        Op::FcnvDs { n } => pack_n_imm8(0x4, n, 0x8A),
        Op::FcnvSd { n } => pack_n_imm8(0x4, n, 0x8B),
        Op::Ftrv { n } => pack_n_imm8(0x4, n, 0x8C),

        Op::Nop => pack_n_imm8(0x4, 0, 0x90),
        Op::Sleep => pack_n_imm8(0x4, 0, 0x91),
        Op::ClrMac => pack_n_imm8(0x4, 0, 0x92),
        Op::ClrS => pack_n_imm8(0x4, 0, 0x93),
        Op::ClrT => pack_n_imm8(0x4, 0, 0x94),
        Op::SetS => pack_n_imm8(0x4, 0, 0x95),
        Op::SetT => pack_n_imm8(0x4, 0, 0x96),
        Op::FrChg => pack_n_imm8(0x4, 0, 0x97),
        Op::FsChg => pack_n_imm8(0x4, 0, 0x98),
        Op::Ldtlb => pack_n_imm8(0x4, 0, 0x99),
        Op::Rts => pack_n_imm8(0x4, 0, 0x9A),
        Op::Rte => pack_n_imm8(0x4, 0, 0x9B),
        Op::Div0U => pack_n_imm8(0x4, 0, 0x9C),

        Op::Bt { disp } => pack_n_imm8(0x5, 0, (disp / 2) as u32 & 0xFF),
        Op::Bf { disp } => pack_n_imm8(0x5, 1, (disp / 2) as u32 & 0xFF),
        Op::BtS { disp } => pack_n_imm8(0x5, 2, (disp / 2) as u32 & 0xFF),
        Op::BfS { disp } => pack_n_imm8(0x5, 3, (disp / 2) as u32 & 0xFF),

        Op::FMoveLoad { n, addr } => encode_fpu_mem(n, addr, 0),
        Op::FMoveStore { m, addr } => encode_fpu_mem(m, addr, 1),
    }
}

fn encode_load_indirect(n: u32, width: Width, src: LoadSrc) -> u16 {
    let w = width_tag(width);
    match src {
        LoadSrc::Reg(m) => pack_nm(0x1, n, m, (0 * 3 + w) as u16),
        LoadSrc::PostInc(m) => pack_nm(0x1, n, m, (1 * 3 + w) as u16),
        LoadSrc::R0Indexed(m) => pack_nm(0x1, n, m, (2 * 3 + w) as u16),
        LoadSrc::Disp(disp, m) => match width {
            Width::B4 => 0xD000 | ((n as u16) << 8) | ((m as u16) << 4) | ((disp / 4) as u16 & 0x7),
            Width::B1 => {
                debug_assert_eq!(n, 0, "byte disp-addressed load targets R0 only");
                0x1000 | ((disp as u16 & 0xF) << 8) | ((m as u16) << 4) | 9
            }
            Width::B2 => {
                debug_assert_eq!(n, 0, "word disp-addressed load targets R0 only");
                0x1000 | (((disp / 2) as u16 & 0xF) << 8) | ((m as u16) << 4) | 10
            }
            Width::B8 => panic!("disp-addressed load never carries a double width"),
        },
        LoadSrc::GbrDisp(disp) => match width {
            Width::B1 => pack_n_imm8(0xA, 10, disp),
            Width::B2 => pack_n_imm8(0xA, 11, disp / 2),
            Width::B4 => pack_n_imm8(0xA, 12, disp / 4),
            Width::B8 => panic!("GBR-relative transfers never carry a double width"),
        },
        LoadSrc::PcDisp(_) => unreachable!("handled by the caller"),
    }
}

fn encode_store_indirect(m: u32, width: Width, dst: StoreDst) -> u16 {
    let w = width_tag(width);
    match dst {
        StoreDst::Reg(n) => pack_nm(0x2, n, m, (0 * 3 + w) as u16),
        StoreDst::PreDec(n) => pack_nm(0x2, n, m, (1 * 3 + w) as u16),
        StoreDst::R0Indexed(n) => pack_nm(0x2, n, m, (2 * 3 + w) as u16),
        StoreDst::Disp(disp, n) => match width {
            Width::B4 => 0xD000 | ((n as u16) << 8) | ((m as u16) << 4) | 0x8 | ((disp / 4) as u16 & 0x7),
            Width::B1 => {
                debug_assert_eq!(m, 0, "byte disp-addressed store sources R0 only");
                0x2000 | ((n as u16) << 8) | ((disp as u16 & 0xF) << 4) | 9
            }
            Width::B2 => {
                debug_assert_eq!(m, 0, "word disp-addressed store sources R0 only");
                0x2000 | ((n as u16) << 8) | (((disp / 2) as u16 & 0xF) << 4) | 10
            }
            Width::B8 => panic!("disp-addressed store never carries a double width"),
        },
        StoreDst::GbrDisp(disp) => match width {
            Width::B1 => pack_n_imm8(0xA, 13, disp),
            Width::B2 => pack_n_imm8(0xA, 14, disp / 2),
            Width::B4 => pack_n_imm8(0xA, 15, disp / 4),
            Width::B8 => panic!("GBR-relative transfers never carry a double width"),
        },
    }
}

fn encode_fpu_mem(n: u32, addr: FpAddr, dir: u16) -> u16 {
    let (addr_reg, mode) = match addr {
        FpAddr::Reg(_) => unreachable!("FMOV register-register form is Op::FMoveReg, not Load/Store"),
        FpAddr::Indirect(r) => (r, 1),
        FpAddr::PostInc(r) => (r, 2),
        FpAddr::PreDec(r) => (r, 3),
        FpAddr::R0Indexed(r) => (r, 4),
    };
    0xF000 | ((n as u16) << 8) | ((addr_reg as u16) << 4) | (dir << 3) | mode
}

#[cfg(test)]
mod tests {
    use super::super::decode::decode;
    use super::*;

    fn roundtrip(op: Op) {
        let bits = encode(op);
        assert_eq!(decode(bits), Some(op), "opcode {bits:#06x}");
    }

    #[test]
    fn arithmetic_and_zero_operand_forms_round_trip() {
        roundtrip(Op::Add { n: 3, m: 5 });
        roundtrip(Op::Nop);
        roundtrip(Op::Rte);
        roundtrip(Op::Div0U);
    }

    #[test]
    fn branch_displacements_round_trip() {
        roundtrip(Op::Bra { disp: -100 });
        roundtrip(Op::Bsr { disp: 200 });
        roundtrip(Op::Bt { disp: -20 });
    }

    #[test]
    fn unconditional_branch_displacement_extremes_round_trip() {
        // 11-bit signed word displacement: +-2046 bytes either side of PC.
        roundtrip(Op::Bra { disp: 2046 });
        roundtrip(Op::Bra { disp: -2048 });
        roundtrip(Op::Bsr { disp: 2046 });
        roundtrip(Op::Bsr { disp: -2048 });
    }

    #[test]
    fn fpu_binary_forms_round_trip() {
        roundtrip(Op::FAdd { n: 1, m: 2 });
        roundtrip(Op::FSub { n: 3, m: 4 });
        roundtrip(Op::FMul { n: 5, m: 6 });
        roundtrip(Op::FDiv { n: 7, m: 8 });
        roundtrip(Op::FCmpEq { n: 0, m: 1 });
        roundtrip(Op::FCmpGt { n: 2, m: 3 });
        roundtrip(Op::FMac { n: 4, m: 5 });
        roundtrip(Op::Fipr { n: 8, m: 12 });
        roundtrip(Op::FMoveReg { n: 1, m: 2 });
        roundtrip(Op::FMoveDrToXd { n: 2, m: 3 });
        roundtrip(Op::FMoveXdToDr { n: 4, m: 5 });
        roundtrip(Op::FMoveXdToXd { n: 6, m: 7 });
    }

    #[test]
    fn load_store_addressing_modes_round_trip() {
        roundtrip(Op::Load {
            n: 2,
            width: Width::B2,
            src: LoadSrc::PostInc(4),
        });
        roundtrip(Op::Store {
            m: 1,
            width: Width::B4,
            dst: StoreDst::R0Indexed(6),
        });
        roundtrip(Op::Load {
            n: 0,
            width: Width::B1,
            src: LoadSrc::GbrDisp(10),
        });
    }

    #[test]
    fn byte_and_word_disp_addressing_round_trips() {
        roundtrip(Op::Load { n: 0, width: Width::B1, src: LoadSrc::Disp(9, 3) });
        roundtrip(Op::Load { n: 0, width: Width::B2, src: LoadSrc::Disp(30, 5) });
        roundtrip(Op::Store { m: 0, width: Width::B1, dst: StoreDst::Disp(9, 3) });
        roundtrip(Op::Store { m: 0, width: Width::B2, dst: StoreDst::Disp(30, 5) });
        // Long-word form is unaffected and still carries a general Rn/Rm.
        roundtrip(Op::Load { n: 7, width: Width::B4, src: LoadSrc::Disp(4, 3) });
        roundtrip(Op::Store { m: 2, width: Width::B4, dst: StoreDst::Disp(12, 6) });
    }

    #[test]
    fn system_register_transfers_round_trip() {
        roundtrip(Op::StcReg {
            reg: super::super::op::SysReg::BankReg(3),
            n: 7,
        });
        roundtrip(Op::LdsMem {
            reg: super::super::op::ExtReg::Fpul,
            m: 9,
        });
    }

    #[test]
    fn fpu_memory_forms_round_trip() {
        roundtrip(Op::FMoveLoad {
            n: 2,
            addr: FpAddr::PostInc(3),
        });
        roundtrip(Op::FMoveStore {
            m: 5,
            addr: FpAddr::PreDec(1),
        });
    }
}

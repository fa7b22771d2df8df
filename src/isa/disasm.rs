//! Renders a decoded [`Op`] as a human-readable mnemonic line.
//!
//! Output is consumed by the [`crate::assembler`] module's tests and by
//! embedding hosts that want to log a disassembly trace; it is not itself
//! re-parsed by the assembler (the assembler's own grammar is defined in
//! that module and happens to agree with this module's spelling of each
//! mnemonic).

use super::op::{CmpKind, ExtReg, FixedShift, FpAddr, LoadSrc, Op, StoreDst, SysReg};

fn reg(i: u32) -> String {
    format!("R{i}")
}

fn sysreg(reg: SysReg) -> String {
    match reg {
        SysReg::Sr => "SR".into(),
        SysReg::Gbr => "GBR".into(),
        SysReg::Vbr => "VBR".into(),
        SysReg::Ssr => "SSR".into(),
        SysReg::Spc => "SPC".into(),
        SysReg::Sgr => "SGR".into(),
        SysReg::Dbr => "DBR".into(),
        SysReg::BankReg(i) => format!("R{i}_BANK"),
    }
}

fn extreg(reg: ExtReg) -> &'static str {
    match reg {
        ExtReg::Mach => "MACH",
        ExtReg::Macl => "MACL",
        ExtReg::Pr => "PR",
        ExtReg::Fpscr => "FPSCR",
        ExtReg::Fpul => "FPUL",
    }
}

fn width_suffix(w: crate::common::data::Width) -> &'static str {
    match w {
        crate::common::data::Width::B1 => "B",
        crate::common::data::Width::B2 => "W",
        crate::common::data::Width::B4 => "L",
        crate::common::data::Width::B8 => "D",
    }
}

fn load_src(src: LoadSrc) -> String {
    match src {
        LoadSrc::Reg(m) => format!("@{}", reg(m)),
        LoadSrc::PostInc(m) => format!("@{}+", reg(m)),
        LoadSrc::R0Indexed(m) => format!("@(R0,{})", reg(m)),
        LoadSrc::Disp(disp, m) => format!("@({disp},{})", reg(m)),
        LoadSrc::GbrDisp(disp) => format!("@({disp},GBR)"),
        LoadSrc::PcDisp(disp) => format!("@({disp},PC)"),
    }
}

fn store_dst(dst: StoreDst) -> String {
    match dst {
        StoreDst::Reg(n) => format!("@{}", reg(n)),
        StoreDst::PreDec(n) => format!("@-{}", reg(n)),
        StoreDst::R0Indexed(n) => format!("@(R0,{})", reg(n)),
        StoreDst::Disp(disp, n) => format!("@({disp},{})", reg(n)),
        StoreDst::GbrDisp(disp) => format!("@({disp},GBR)"),
    }
}

fn fp_addr(prefix: &str, a: FpAddr) -> String {
    match a {
        FpAddr::Reg(r) => format!("{prefix}{r}"),
        FpAddr::Indirect(r) => format!("@{}", reg(r)),
        FpAddr::PostInc(r) => format!("@{}+", reg(r)),
        FpAddr::PreDec(r) => format!("@-{}", reg(r)),
        FpAddr::R0Indexed(r) => format!("@(R0,{})", reg(r)),
    }
}

/// Renders one decoded instruction as upper-case SH-4 assembly syntax.
pub fn disasm(op: Op) -> String {
    match op {
        Op::MovReg { n, m } => format!("MOV {},{}", reg(m), reg(n)),
        Op::MovImm { n, imm } => format!("MOV #{imm},{}", reg(n)),
        Op::Mova { disp } => format!("MOVA @({disp},PC),R0"),
        Op::Load { n, width, src } => {
            format!("MOV.{} {},{}", width_suffix(width), load_src(src), reg(n))
        }
        Op::Store { m, width, dst } => {
            format!("MOV.{} {},{}", width_suffix(width), reg(m), store_dst(dst))
        }
        Op::ExtuB { n, m } => format!("EXTU.B {},{}", reg(m), reg(n)),
        Op::ExtuW { n, m } => format!("EXTU.W {},{}", reg(m), reg(n)),
        Op::ExtsB { n, m } => format!("EXTS.B {},{}", reg(m), reg(n)),
        Op::ExtsW { n, m } => format!("EXTS.W {},{}", reg(m), reg(n)),
        Op::Swap { n, m, width } => format!("SWAP.{} {},{}", width_suffix(width), reg(m), reg(n)),
        Op::Xtrct { n, m } => format!("XTRCT {},{}", reg(m), reg(n)),

        Op::Add { n, m } => format!("ADD {},{}", reg(m), reg(n)),
        Op::AddImm { n, imm } => format!("ADD #{imm},{}", reg(n)),
        Op::Addc { n, m } => format!("ADDC {},{}", reg(m), reg(n)),
        Op::Addv { n, m } => format!("ADDV {},{}", reg(m), reg(n)),
        Op::Sub { n, m } => format!("SUB {},{}", reg(m), reg(n)),
        Op::Subc { n, m } => format!("SUBC {},{}", reg(m), reg(n)),
        Op::Subv { n, m } => format!("SUBV {},{}", reg(m), reg(n)),
        Op::Neg { n, m } => format!("NEG {},{}", reg(m), reg(n)),
        Op::Negc { n, m } => format!("NEGC {},{}", reg(m), reg(n)),
        Op::CmpReg { kind, n, m } => {
            let mnem = match kind {
                CmpKind::Eq => "CMP/EQ",
                CmpKind::Hs => "CMP/HS",
                CmpKind::Ge => "CMP/GE",
                CmpKind::Hi => "CMP/HI",
                CmpKind::Gt => "CMP/GT",
                CmpKind::Pl => "CMP/PL",
                CmpKind::Pz => "CMP/PZ",
                CmpKind::Str => "CMP/STR",
            };
            match kind {
                CmpKind::Pl | CmpKind::Pz => format!("{mnem} {}", reg(n)),
                _ => format!("{mnem} {},{}", reg(m), reg(n)),
            }
        }
        Op::CmpImm { imm } => format!("CMP/EQ #{imm},R0"),
        Op::MulL { n, m } => format!("MUL.L {},{}", reg(m), reg(n)),
        Op::MulsW { n, m } => format!("MULS.W {},{}", reg(m), reg(n)),
        Op::MuluW { n, m } => format!("MULU.W {},{}", reg(m), reg(n)),
        Op::DmulsL { n, m } => format!("DMULS.L {},{}", reg(m), reg(n)),
        Op::DmuluL { n, m } => format!("DMULU.L {},{}", reg(m), reg(n)),
        Op::MacL { n, m } => format!("MAC.L @{}+,@{}+", reg(m), reg(n)),
        Op::MacW { n, m } => format!("MAC.W @{}+,@{}+", reg(m), reg(n)),
        Op::Dt { n } => format!("DT {}", reg(n)),
        Op::Div0U => "DIV0U".into(),
        Op::Div0S { n, m } => format!("DIV0S {},{}", reg(m), reg(n)),
        Op::Div1 { n, m } => format!("DIV1 {},{}", reg(m), reg(n)),

        Op::And { n, m } => format!("AND {},{}", reg(m), reg(n)),
        Op::AndImm { imm } => format!("AND #{imm},R0"),
        Op::AndByteGbr { imm } => format!("AND.B #{imm},@(R0,GBR)"),
        Op::Or { n, m } => format!("OR {},{}", reg(m), reg(n)),
        Op::OrImm { imm } => format!("OR #{imm},R0"),
        Op::OrByteGbr { imm } => format!("OR.B #{imm},@(R0,GBR)"),
        Op::Xor { n, m } => format!("XOR {},{}", reg(m), reg(n)),
        Op::XorImm { imm } => format!("XOR #{imm},R0"),
        Op::XorByteGbr { imm } => format!("XOR.B #{imm},@(R0,GBR)"),
        Op::Not { n, m } => format!("NOT {},{}", reg(m), reg(n)),
        Op::Shad { n, m } => format!("SHAD {},{}", reg(m), reg(n)),
        Op::Shld { n, m } => format!("SHLD {},{}", reg(m), reg(n)),
        Op::Shal { n } => format!("SHAL {}", reg(n)),
        Op::Shar { n } => format!("SHAR {}", reg(n)),
        Op::Shll { n } => format!("SHLL {}", reg(n)),
        Op::Shlr { n } => format!("SHLR {}", reg(n)),
        Op::FixedShift { op, n } => {
            let mnem = match op {
                FixedShift::Shll2 => "SHLL2",
                FixedShift::Shlr2 => "SHLR2",
                FixedShift::Shll8 => "SHLL8",
                FixedShift::Shlr8 => "SHLR8",
                FixedShift::Shll16 => "SHLL16",
                FixedShift::Shlr16 => "SHLR16",
            };
            format!("{mnem} {}", reg(n))
        }
        Op::Rotl { n } => format!("ROTL {}", reg(n)),
        Op::Rotr { n } => format!("ROTR {}", reg(n)),
        Op::Rotcl { n } => format!("ROTCL {}", reg(n)),
        Op::Rotcr { n } => format!("ROTCR {}", reg(n)),

        Op::Tst { n, m } => format!("TST {},{}", reg(m), reg(n)),
        Op::TstImm { imm } => format!("TST #{imm},R0"),
        Op::TstByteGbr { imm } => format!("TST.B #{imm},@(R0,GBR)"),
        Op::TasB { n } => format!("TAS.B @{}", reg(n)),

        Op::Bt { disp } => format!("BT {disp}"),
        Op::Bf { disp } => format!("BF {disp}"),
        Op::BtS { disp } => format!("BT/S {disp}"),
        Op::BfS { disp } => format!("BF/S {disp}"),
        Op::Bra { disp } => format!("BRA {disp}"),
        Op::Bsr { disp } => format!("BSR {disp}"),
        Op::Braf { n } => format!("BRAF {}", reg(n)),
        Op::Bsrf { n } => format!("BSRF {}", reg(n)),
        Op::Jmp { n } => format!("JMP @{}", reg(n)),
        Op::Jsr { n } => format!("JSR @{}", reg(n)),
        Op::Rts => "RTS".into(),
        Op::Rte => "RTE".into(),

        Op::LdcReg { reg: r, m } => format!("LDC {},{}", reg(m), sysreg(r)),
        Op::LdcMem { reg: r, m } => format!("LDC.L @{}+,{}", reg(m), sysreg(r)),
        Op::StcReg { reg: r, n } => format!("STC {},{}", sysreg(r), reg(n)),
        Op::StcMem { reg: r, n } => format!("STC.L {},@-{}", sysreg(r), reg(n)),
        Op::LdsReg { reg: r, m } => format!("LDS {},{}", reg(m), extreg(r)),
        Op::LdsMem { reg: r, m } => format!("LDS.L @{}+,{}", reg(m), extreg(r)),
        Op::StsReg { reg: r, n } => format!("STS {},{}", extreg(r), reg(n)),
        Op::StsMem { reg: r, n } => format!("STS.L {},@-{}", extreg(r), reg(n)),
        Op::ClrMac => "CLRMAC".into(),
        Op::ClrS => "CLRS".into(),
        Op::ClrT => "CLRT".into(),
        Op::SetS => "SETS".into(),
        Op::SetT => "SETT".into(),
        Op::FrChg => "FRCHG".into(),
        Op::FsChg => "FSCHG".into(),

        Op::FMoveReg { n, m } => format!("FMOV {},{}", fp_addr("FR", FpAddr::Reg(m)), fp_addr("FR", FpAddr::Reg(n))),
        Op::FMoveLoad { n, addr } => format!("FMOV {},{}", fp_addr("FR", addr), fp_addr("FR", FpAddr::Reg(n))),
        Op::FMoveStore { m, addr } => format!("FMOV {},{}", fp_addr("FR", FpAddr::Reg(m)), fp_addr("FR", addr)),
        Op::FMoveDrToXd { n, m } => format!("FMOV DR{m},XD{n}"),
        Op::FMoveXdToDr { n, m } => format!("FMOV XD{m},DR{n}"),
        Op::FMoveXdToXd { n, m } => format!("FMOV XD{m},XD{n}"),
        Op::FAdd { n, m } => format!("FADD FR{m},FR{n}"),
        Op::FSub { n, m } => format!("FSUB FR{m},FR{n}"),
        Op::FMul { n, m } => format!("FMUL FR{m},FR{n}"),
        Op::FDiv { n, m } => format!("FDIV FR{m},FR{n}"),
        Op::FCmpEq { n, m } => format!("FCMP/EQ FR{m},FR{n}"),
        Op::FCmpGt { n, m } => format!("FCMP/GT FR{m},FR{n}"),
        Op::FMac { n, m } => format!("FMAC FR0,FR{m},FR{n}"),
        Op::FAbs { n } => format!("FABS FR{n}"),
        Op::FNeg { n } => format!("FNEG FR{n}"),
        Op::FSqrt { n } => format!("FSQRT FR{n}"),
        Op::FSrra { n } => format!("FSRRA FR{n}"),
        Op::FldI0 { n } => format!("FLDI0 FR{n}"),
        Op::FldI1 { n } => format!("FLDI1 FR{n}"),
        Op::Flds { m } => format!("FLDS FR{m},FPUL"),
        Op::Fsts { n } => format!("FSTS FPUL,FR{n}"),
        Op::Float { n } => format!("FLOAT FPUL,FR{n}"),
        Op::Ftrc { n } => format!("FTRC FR{n},FPUL"),
        Op::FcnvDs { n } => format!("FCNVDS DR{n},FPUL"),
        Op::FcnvSd { n } => format!("FCNVSD FPUL,DR{n}"),
        Op::Fipr { n, m } => format!("FIPR FV{m},FV{n}"),
        Op::Ftrv { n } => format!("FTRV XMTRX,FV{n}"),

        Op::OcbI { n } => format!("OCBI @{}", reg(n)),
        Op::OcbP { n } => format!("OCBP @{}", reg(n)),
        Op::OcbWb { n } => format!("OCBWB @{}", reg(n)),
        Op::Pref { n } => format!("PREF @{}", reg(n)),
        Op::MovCaL { n } => format!("MOVCA.L R0,@{}", reg(n)),

        Op::Nop => "NOP".into(),
        Op::Sleep => "SLEEP".into(),
        Op::Ldtlb => "LDTLB".into(),
        Op::Trapa { imm } => format!("TRAPA #{imm}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_register_forms() {
        assert_eq!(disasm(Op::Add { n: 1, m: 2 }), "ADD R2,R1");
        assert_eq!(disasm(Op::Nop), "NOP");
    }

    #[test]
    fn renders_displacement_forms() {
        assert_eq!(
            disasm(Op::Load {
                n: 2,
                width: crate::common::data::Width::B4,
                src: LoadSrc::Disp(4, 3)
            }),
            "MOV.L @(4,R3),R2"
        );
    }
}

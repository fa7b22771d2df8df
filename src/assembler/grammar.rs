//! Parses a tokenized operand list into an [`Operand`], and matches a
//! mnemonic plus its operands against the instruction forms in
//! [`crate::isa::op`].
//!
//! This is the assembler's half of the pattern table described in
//! SPEC_FULL.md §4.6: where the reference assembler dispatches on fixed
//! token positions inside a 32-entry array, this module dispatches on a
//! small typed [`Operand`] enum, matched structurally against each
//! mnemonic's known shapes. The range checks in [`as_dreg`], [`as_xdreg`],
//! and [`as_fvreg`] are this core's `RegisterIndexError` (SPEC_FULL.md §4.6).

use super::token::{parse_number, split_operands, Tok};
use crate::common::data::Width;
use crate::common::error::CoreError;
use crate::isa::op::{CmpKind, ExtReg, FixedShift, FpAddr, LoadSrc, Op, StoreDst, SysReg};

/// A register reference, tagged by the register file it names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegRef {
    /// `Rn`.
    Gpr(u32),
    /// `FRn`.
    Fr(u32),
    /// `DRn`.
    Dr(u32),
    /// `XDn`.
    Xd(u32),
}

/// One parsed operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// A bare register, of any class.
    Direct(RegRef),
    /// `RnBANK` a.k.a. `Rn_BANK`.
    BankReg(u32),
    /// A named control/system register (`SR`, `GBR`, ...).
    Sys(SysReg),
    /// A named extension register (`MACH`, `FPUL`, ...).
    Ext(ExtReg),
    /// `FVn`.
    Fv(u32),
    /// `XMTRX`.
    Xmtrx,
    /// `#imm`.
    Imm(i32),
    /// A bare signed number with no `#` (branch/TRAPA displacement text).
    Bare(i32),
    /// `@Rn` (or `@FRn`/`@DRn`/`@XDn`).
    Indirect(RegRef),
    /// `@Rn+`.
    PostInc(RegRef),
    /// `@-Rn`.
    PreDec(RegRef),
    /// `@(R0,Rn)`.
    R0Indexed(RegRef),
    /// `@(disp,Rn)`.
    Disp(i32, RegRef),
    /// `@(disp,GBR)`.
    DispGbr(i32),
    /// `@(disp,PC)`.
    DispPc(i32),
}

fn parse_regref(word: &str) -> Result<RegRef, CoreError> {
    let bad = || CoreError::UnrecognizedPattern(format!("not a register: {word:?}"));
    if let Some(rest) = word.strip_prefix('R').or_else(|| word.strip_prefix('r')) {
        let n: u32 = rest.parse().map_err(|_| bad())?;
        if n >= 16 {
            return Err(CoreError::RegisterIndexError(format!(
                "general register index {n} out of range"
            )));
        }
        return Ok(RegRef::Gpr(n));
    }
    if let Some(rest) = word.strip_prefix("FR").or_else(|| word.strip_prefix("fr")) {
        let n: u32 = rest.parse().map_err(|_| bad())?;
        if n >= 16 {
            return Err(CoreError::RegisterIndexError(format!(
                "single-precision register index {n} out of range"
            )));
        }
        return Ok(RegRef::Fr(n));
    }
    if let Some(rest) = word.strip_prefix("DR").or_else(|| word.strip_prefix("dr")) {
        let n: u32 = rest.parse().map_err(|_| bad())?;
        if n >= 16 || n % 2 != 0 {
            return Err(CoreError::RegisterIndexError(format!(
                "double-precision register index {n} must be even and < 16"
            )));
        }
        return Ok(RegRef::Dr(n));
    }
    if let Some(rest) = word.strip_prefix("XD").or_else(|| word.strip_prefix("xd")) {
        let n: u32 = rest.parse().map_err(|_| bad())?;
        if n >= 16 || n % 2 != 0 {
            return Err(CoreError::RegisterIndexError(format!(
                "banked double-precision register index {n} must be even and < 16"
            )));
        }
        return Ok(RegRef::Xd(n));
    }
    Err(bad())
}

fn word_operand(word: &str) -> Result<Operand, CoreError> {
    match word.to_ascii_uppercase().as_str() {
        "SR" => return Ok(Operand::Sys(SysReg::Sr)),
        "GBR" => return Ok(Operand::Sys(SysReg::Gbr)),
        "VBR" => return Ok(Operand::Sys(SysReg::Vbr)),
        "SSR" => return Ok(Operand::Sys(SysReg::Ssr)),
        "SPC" => return Ok(Operand::Sys(SysReg::Spc)),
        "SGR" => return Ok(Operand::Sys(SysReg::Sgr)),
        "DBR" => return Ok(Operand::Sys(SysReg::Dbr)),
        "MACH" => return Ok(Operand::Ext(ExtReg::Mach)),
        "MACL" => return Ok(Operand::Ext(ExtReg::Macl)),
        "PR" => return Ok(Operand::Ext(ExtReg::Pr)),
        "FPSCR" => return Ok(Operand::Ext(ExtReg::Fpscr)),
        "FPUL" => return Ok(Operand::Ext(ExtReg::Fpul)),
        "XMTRX" => return Ok(Operand::Xmtrx),
        _ => {}
    }
    if let Some(base) = word.to_ascii_uppercase().strip_suffix("_BANK") {
        let n: u32 = base
            .strip_prefix('R')
            .ok_or_else(|| CoreError::UnrecognizedPattern(format!("not a banked register: {word:?}")))?
            .parse()
            .map_err(|_| CoreError::UnrecognizedPattern(format!("not a banked register: {word:?}")))?;
        if n >= 8 {
            return Err(CoreError::RegisterIndexError(format!(
                "banked register index {n} out of range"
            )));
        }
        return Ok(Operand::BankReg(n));
    }
    if let Some(base) = word.to_ascii_uppercase().strip_prefix("FV") {
        if let Ok(n) = base.parse::<u32>() {
            if n >= 16 || n % 4 != 0 {
                return Err(CoreError::RegisterIndexError(format!(
                    "vector register index {n} must be a multiple of 4 and < 16"
                )));
            }
            return Ok(Operand::Fv(n));
        }
    }
    if word.chars().all(|c| c.is_ascii_digit()) {
        return Ok(Operand::Bare(parse_number(word, false)?));
    }
    Ok(Operand::Direct(parse_regref(&word.to_ascii_uppercase())?))
}

/// Parses one comma-delimited operand's token group.
fn parse_operand(toks: &[Tok]) -> Result<Operand, CoreError> {
    let err = || CoreError::UnrecognizedPattern(format!("malformed operand: {toks:?}"));
    match toks {
        [Tok::Hash, Tok::Minus, Tok::Word(w)] => Ok(Operand::Imm(parse_number(w, true)?)),
        [Tok::Hash, Tok::Word(w)] => Ok(Operand::Imm(parse_number(w, false)?)),
        [Tok::Minus, Tok::Word(w)] => Ok(Operand::Bare(parse_number(w, true)?)),
        [Tok::Word(w)] => word_operand(w),
        [Tok::At, Tok::Minus, Tok::Word(w)] => Ok(Operand::PreDec(parse_regref(&w.to_ascii_uppercase())?)),
        [Tok::At, Tok::Word(w), Tok::Plus] => Ok(Operand::PostInc(parse_regref(&w.to_ascii_uppercase())?)),
        [Tok::At, Tok::Word(w)] => Ok(Operand::Indirect(parse_regref(&w.to_ascii_uppercase())?)),
        [Tok::At, Tok::LParen, rest @ .., Tok::RParen] => {
            let groups = split_operands(rest);
            if groups.len() != 2 {
                return Err(err());
            }
            let first = word_or_signed(&groups[0])?;
            let second_word = match groups[1].as_slice() {
                [Tok::Word(w)] => w.to_ascii_uppercase(),
                _ => return Err(err()),
            };
            match first {
                DispOrR0::R0 => {
                    if second_word == "GBR" {
                        return Err(err());
                    }
                    Ok(Operand::R0Indexed(parse_regref(&second_word)?))
                }
                DispOrR0::Disp(d) => match second_word.as_str() {
                    "GBR" => Ok(Operand::DispGbr(d)),
                    "PC" => Ok(Operand::DispPc(d)),
                    _ => Ok(Operand::Disp(d, parse_regref(&second_word)?)),
                },
            }
        }
        _ => Err(err()),
    }
}

enum DispOrR0 {
    R0,
    Disp(i32),
}

fn word_or_signed(toks: &[Tok]) -> Result<DispOrR0, CoreError> {
    match toks {
        [Tok::Word(w)] if w.eq_ignore_ascii_case("R0") => Ok(DispOrR0::R0),
        [Tok::Word(w)] => Ok(DispOrR0::Disp(parse_number(w, false)?)),
        [Tok::Minus, Tok::Word(w)] => Ok(DispOrR0::Disp(parse_number(w, true)?)),
        _ => Err(CoreError::UnrecognizedPattern(format!(
            "expected R0 or a displacement, got {toks:?}"
        ))),
    }
}

/// Parses every comma-separated operand group in `rest`.
pub fn parse_operands(rest: &str) -> Result<Vec<Operand>, CoreError> {
    let toks = super::token::tokenize(rest)?;
    if toks.is_empty() {
        return Ok(Vec::new());
    }
    split_operands(&toks).iter().map(|g| parse_operand(g)).collect()
}

fn as_gpr(op: &Operand) -> Result<u32, CoreError> {
    match op {
        Operand::Direct(RegRef::Gpr(n)) => Ok(*n),
        _ => Err(CoreError::UnrecognizedPattern(format!("expected a general register, got {op:?}"))),
    }
}

fn as_freg(op: &Operand) -> Result<u32, CoreError> {
    match op {
        Operand::Direct(RegRef::Fr(n)) => Ok(*n),
        _ => Err(CoreError::UnrecognizedPattern(format!("expected an FR register, got {op:?}"))),
    }
}

fn as_dreg(op: &Operand) -> Result<u32, CoreError> {
    match op {
        Operand::Direct(RegRef::Dr(n)) => Ok(*n),
        _ => Err(CoreError::UnrecognizedPattern(format!("expected a DR register, got {op:?}"))),
    }
}

fn as_xdreg(op: &Operand) -> Result<u32, CoreError> {
    match op {
        Operand::Direct(RegRef::Xd(n)) => Ok(*n),
        _ => Err(CoreError::UnrecognizedPattern(format!("expected an XD register, got {op:?}"))),
    }
}

fn as_fvreg(op: &Operand) -> Result<u32, CoreError> {
    match op {
        Operand::Fv(n) => Ok(*n),
        _ => Err(CoreError::UnrecognizedPattern(format!("expected an FV register, got {op:?}"))),
    }
}

fn as_imm(op: &Operand) -> Result<i32, CoreError> {
    match op {
        Operand::Imm(v) => Ok(*v),
        _ => Err(CoreError::UnrecognizedPattern(format!("expected an immediate, got {op:?}"))),
    }
}

fn as_bare(op: &Operand) -> Result<i32, CoreError> {
    match op {
        Operand::Bare(v) => Ok(*v),
        _ => Err(CoreError::UnrecognizedPattern(format!("expected a bare displacement, got {op:?}"))),
    }
}

fn as_sysreg(op: &Operand) -> Result<SysReg, CoreError> {
    match op {
        Operand::Sys(r) => Ok(*r),
        Operand::BankReg(n) => Ok(SysReg::BankReg(*n)),
        _ => Err(CoreError::UnrecognizedPattern(format!("expected a system register, got {op:?}"))),
    }
}

fn as_extreg(op: &Operand) -> Result<ExtReg, CoreError> {
    match op {
        Operand::Ext(r) => Ok(*r),
        _ => Err(CoreError::UnrecognizedPattern(format!("expected an LDS/STS register, got {op:?}"))),
    }
}

/// A memory operand that only ever names a general register in this ISA's
/// `Load`/`Store` forms (never `FR`/`DR`/`XD`).
fn load_src(op: &Operand) -> Result<LoadSrc, CoreError> {
    Ok(match op {
        Operand::Indirect(RegRef::Gpr(m)) => LoadSrc::Reg(*m),
        Operand::PostInc(RegRef::Gpr(m)) => LoadSrc::PostInc(*m),
        Operand::R0Indexed(RegRef::Gpr(m)) => LoadSrc::R0Indexed(*m),
        Operand::Disp(d, RegRef::Gpr(m)) => LoadSrc::Disp(*d as u32, *m),
        Operand::DispGbr(d) => LoadSrc::GbrDisp(*d as u32),
        Operand::DispPc(d) => LoadSrc::PcDisp(*d as u32),
        _ => return Err(CoreError::UnrecognizedPattern(format!("expected a load address, got {op:?}"))),
    })
}

fn store_dst(op: &Operand) -> Result<StoreDst, CoreError> {
    Ok(match op {
        Operand::Indirect(RegRef::Gpr(n)) => StoreDst::Reg(*n),
        Operand::PreDec(RegRef::Gpr(n)) => StoreDst::PreDec(*n),
        Operand::R0Indexed(RegRef::Gpr(n)) => StoreDst::R0Indexed(*n),
        Operand::Disp(d, RegRef::Gpr(n)) => StoreDst::Disp(*d as u32, *n),
        Operand::DispGbr(d) => StoreDst::GbrDisp(*d as u32),
        _ => return Err(CoreError::UnrecognizedPattern(format!("expected a store address, got {op:?}"))),
    })
}

fn fp_addr(op: &Operand) -> Result<FpAddr, CoreError> {
    Ok(match op {
        Operand::Indirect(RegRef::Gpr(r)) => FpAddr::Indirect(*r),
        Operand::PostInc(RegRef::Gpr(r)) => FpAddr::PostInc(*r),
        Operand::PreDec(RegRef::Gpr(r)) => FpAddr::PreDec(*r),
        Operand::R0Indexed(RegRef::Gpr(r)) => FpAddr::R0Indexed(*r),
        _ => return Err(CoreError::UnrecognizedPattern(format!("expected an FMOV address, got {op:?}"))),
    })
}

/// Matches a mnemonic plus its already-parsed operands against every known
/// instruction form, returning the `Op` that form constructs.
pub fn build_op(mnemonic: &str, ops: &[Operand]) -> Result<Op, CoreError> {
    let unrecognized = || {
        CoreError::UnrecognizedPattern(format!(
            "no instruction form matches {mnemonic} with operands {ops:?}"
        ))
    };

    macro_rules! rm_rn {
        () => {{
            if ops.len() != 2 {
                return Err(unrecognized());
            }
            (as_gpr(&ops[0])?, as_gpr(&ops[1])?)
        }};
    }
    macro_rules! rn_only {
        () => {{
            if ops.len() != 1 {
                return Err(unrecognized());
            }
            as_gpr(&ops[0])?
        }};
    }
    macro_rules! frm_frn {
        () => {{
            if ops.len() != 2 {
                return Err(unrecognized());
            }
            (as_freg(&ops[0])?, as_freg(&ops[1])?)
        }};
    }

    Ok(match mnemonic {
        "MOV" if ops.len() == 2 => match (&ops[0], &ops[1]) {
            (Operand::Direct(RegRef::Gpr(m)), Operand::Direct(RegRef::Gpr(n))) => Op::MovReg { n: *n, m: *m },
            (Operand::Imm(imm), Operand::Direct(RegRef::Gpr(n))) => Op::MovImm { n: *n, imm: *imm },
            _ => return Err(unrecognized()),
        },
        "MOVA" if ops.len() == 2 => {
            let Operand::DispPc(disp) = &ops[0] else { return Err(unrecognized()) };
            Op::Mova { disp: *disp as u32 }
        }
        "MOV.B" | "MOV.W" | "MOV.L" if ops.len() == 2 => {
            let width = match mnemonic {
                "MOV.B" => Width::B1,
                "MOV.W" => Width::B2,
                _ => Width::B4,
            };
            if let Operand::Direct(RegRef::Gpr(n)) = &ops[1] {
                let src = load_src(&ops[0])?;
                if width != Width::B4 && matches!(src, LoadSrc::Disp(..)) && *n != 0 {
                    return Err(CoreError::RegisterIndexError(format!(
                        "{mnemonic} @(disp,Rm),Rn only targets R0, got R{n}"
                    )));
                }
                Op::Load { n: *n, width, src }
            } else if let Operand::Direct(RegRef::Gpr(m)) = &ops[0] {
                let dst = store_dst(&ops[1])?;
                if width != Width::B4 && matches!(dst, StoreDst::Disp(..)) && *m != 0 {
                    return Err(CoreError::RegisterIndexError(format!(
                        "{mnemonic} Rm,@(disp,Rn) only sources R0, got R{m}"
                    )));
                }
                Op::Store { m: *m, width, dst }
            } else {
                return Err(unrecognized());
            }
        }
        "EXTU.B" => { let (m, n) = rm_rn!(); Op::ExtuB { n, m } }
        "EXTU.W" => { let (m, n) = rm_rn!(); Op::ExtuW { n, m } }
        "EXTS.B" => { let (m, n) = rm_rn!(); Op::ExtsB { n, m } }
        "EXTS.W" => { let (m, n) = rm_rn!(); Op::ExtsW { n, m } }
        "SWAP.B" => { let (m, n) = rm_rn!(); Op::Swap { n, m, width: Width::B1 } }
        "SWAP.W" => { let (m, n) = rm_rn!(); Op::Swap { n, m, width: Width::B2 } }
        "XTRCT" => { let (m, n) = rm_rn!(); Op::Xtrct { n, m } }

        "ADD" if ops.len() == 2 => match &ops[0] {
            Operand::Imm(imm) => Op::AddImm { n: as_gpr(&ops[1])?, imm: *imm },
            _ => { let (m, n) = rm_rn!(); Op::Add { n, m } }
        },
        "ADDC" => { let (m, n) = rm_rn!(); Op::Addc { n, m } }
        "ADDV" => { let (m, n) = rm_rn!(); Op::Addv { n, m } }
        "SUB" => { let (m, n) = rm_rn!(); Op::Sub { n, m } }
        "SUBC" => { let (m, n) = rm_rn!(); Op::Subc { n, m } }
        "SUBV" => { let (m, n) = rm_rn!(); Op::Subv { n, m } }
        "NEG" => { let (m, n) = rm_rn!(); Op::Neg { n, m } }
        "NEGC" => { let (m, n) = rm_rn!(); Op::Negc { n, m } }

        "CMP/EQ" if ops.len() == 2 && matches!(ops[0], Operand::Imm(_)) => {
            Op::CmpImm { imm: as_imm(&ops[0])? }
        }
        "CMP/EQ" => { let (m, n) = rm_rn!(); Op::CmpReg { kind: CmpKind::Eq, n, m } }
        "CMP/HS" => { let (m, n) = rm_rn!(); Op::CmpReg { kind: CmpKind::Hs, n, m } }
        "CMP/GE" => { let (m, n) = rm_rn!(); Op::CmpReg { kind: CmpKind::Ge, n, m } }
        "CMP/HI" => { let (m, n) = rm_rn!(); Op::CmpReg { kind: CmpKind::Hi, n, m } }
        "CMP/GT" => { let (m, n) = rm_rn!(); Op::CmpReg { kind: CmpKind::Gt, n, m } }
        "CMP/PL" => Op::CmpReg { kind: CmpKind::Pl, n: rn_only!(), m: 0 },
        "CMP/PZ" => Op::CmpReg { kind: CmpKind::Pz, n: rn_only!(), m: 0 },
        "CMP/STR" => { let (m, n) = rm_rn!(); Op::CmpReg { kind: CmpKind::Str, n, m } }

        "MUL.L" => { let (m, n) = rm_rn!(); Op::MulL { n, m } }
        "MULS.W" => { let (m, n) = rm_rn!(); Op::MulsW { n, m } }
        "MULU.W" => { let (m, n) = rm_rn!(); Op::MuluW { n, m } }
        "DMULS.L" => { let (m, n) = rm_rn!(); Op::DmulsL { n, m } }
        "DMULU.L" => { let (m, n) = rm_rn!(); Op::DmuluL { n, m } }
        "MAC.L" if ops.len() == 2 => {
            let Operand::PostInc(RegRef::Gpr(m)) = &ops[0] else { return Err(unrecognized()) };
            let Operand::PostInc(RegRef::Gpr(n)) = &ops[1] else { return Err(unrecognized()) };
            Op::MacL { n: *n, m: *m }
        }
        "MAC.W" if ops.len() == 2 => {
            let Operand::PostInc(RegRef::Gpr(m)) = &ops[0] else { return Err(unrecognized()) };
            let Operand::PostInc(RegRef::Gpr(n)) = &ops[1] else { return Err(unrecognized()) };
            Op::MacW { n: *n, m: *m }
        }
        "DT" => Op::Dt { n: rn_only!() },
        "DIV0U" => Op::Div0U,
        "DIV0S" => { let (m, n) = rm_rn!(); Op::Div0S { n, m } }
        "DIV1" => { let (m, n) = rm_rn!(); Op::Div1 { n, m } }

        "AND" if ops.len() == 2 && matches!(ops[0], Operand::Imm(_)) => {
            Op::AndImm { imm: as_imm(&ops[0])? as u32 }
        }
        "AND" => { let (m, n) = rm_rn!(); Op::And { n, m } }
        "AND.B" if ops.len() == 2 => Op::AndByteGbr { imm: as_imm(&ops[0])? as u32 },
        "OR" if ops.len() == 2 && matches!(ops[0], Operand::Imm(_)) => {
            Op::OrImm { imm: as_imm(&ops[0])? as u32 }
        }
        "OR" => { let (m, n) = rm_rn!(); Op::Or { n, m } }
        "OR.B" if ops.len() == 2 => Op::OrByteGbr { imm: as_imm(&ops[0])? as u32 },
        "XOR" if ops.len() == 2 && matches!(ops[0], Operand::Imm(_)) => {
            Op::XorImm { imm: as_imm(&ops[0])? as u32 }
        }
        "XOR" => { let (m, n) = rm_rn!(); Op::Xor { n, m } }
        "XOR.B" if ops.len() == 2 => Op::XorByteGbr { imm: as_imm(&ops[0])? as u32 },
        "NOT" => { let (m, n) = rm_rn!(); Op::Not { n, m } }
        "SHAD" => { let (m, n) = rm_rn!(); Op::Shad { n, m } }
        "SHLD" => { let (m, n) = rm_rn!(); Op::Shld { n, m } }
        "SHAL" => Op::Shal { n: rn_only!() },
        "SHAR" => Op::Shar { n: rn_only!() },
        "SHLL" => Op::Shll { n: rn_only!() },
        "SHLR" => Op::Shlr { n: rn_only!() },
        "SHLL2" => Op::FixedShift { op: FixedShift::Shll2, n: rn_only!() },
        "SHLR2" => Op::FixedShift { op: FixedShift::Shlr2, n: rn_only!() },
        "SHLL8" => Op::FixedShift { op: FixedShift::Shll8, n: rn_only!() },
        "SHLR8" => Op::FixedShift { op: FixedShift::Shlr8, n: rn_only!() },
        "SHLL16" => Op::FixedShift { op: FixedShift::Shll16, n: rn_only!() },
        "SHLR16" => Op::FixedShift { op: FixedShift::Shlr16, n: rn_only!() },
        "ROTL" => Op::Rotl { n: rn_only!() },
        "ROTR" => Op::Rotr { n: rn_only!() },
        "ROTCL" => Op::Rotcl { n: rn_only!() },
        "ROTCR" => Op::Rotcr { n: rn_only!() },

        "TST" if ops.len() == 2 && matches!(ops[0], Operand::Imm(_)) => {
            Op::TstImm { imm: as_imm(&ops[0])? as u32 }
        }
        "TST" => { let (m, n) = rm_rn!(); Op::Tst { n, m } }
        "TST.B" if ops.len() == 2 => Op::TstByteGbr { imm: as_imm(&ops[0])? as u32 },
        "TAS.B" if ops.len() == 1 => {
            let Operand::Indirect(RegRef::Gpr(n)) = &ops[0] else { return Err(unrecognized()) };
            Op::TasB { n: *n }
        }

        "BT" if ops.len() == 1 => Op::Bt { disp: as_bare(&ops[0])? },
        "BF" if ops.len() == 1 => Op::Bf { disp: as_bare(&ops[0])? },
        "BT/S" if ops.len() == 1 => Op::BtS { disp: as_bare(&ops[0])? },
        "BF/S" if ops.len() == 1 => Op::BfS { disp: as_bare(&ops[0])? },
        "BRA" if ops.len() == 1 => Op::Bra { disp: as_bare(&ops[0])? },
        "BSR" if ops.len() == 1 => Op::Bsr { disp: as_bare(&ops[0])? },
        "BRAF" => Op::Braf { n: rn_only!() },
        "BSRF" => Op::Bsrf { n: rn_only!() },
        "JMP" if ops.len() == 1 => {
            let Operand::Indirect(RegRef::Gpr(n)) = &ops[0] else { return Err(unrecognized()) };
            Op::Jmp { n: *n }
        }
        "JSR" if ops.len() == 1 => {
            let Operand::Indirect(RegRef::Gpr(n)) = &ops[0] else { return Err(unrecognized()) };
            Op::Jsr { n: *n }
        }
        "RTS" => Op::Rts,
        "RTE" => Op::Rte,

        "LDC" if ops.len() == 2 => Op::LdcReg { reg: as_sysreg(&ops[1])?, m: as_gpr(&ops[0])? },
        "LDC.L" if ops.len() == 2 => {
            let Operand::PostInc(RegRef::Gpr(m)) = &ops[0] else { return Err(unrecognized()) };
            Op::LdcMem { reg: as_sysreg(&ops[1])?, m: *m }
        }
        "STC" if ops.len() == 2 => Op::StcReg { reg: as_sysreg(&ops[0])?, n: as_gpr(&ops[1])? },
        "STC.L" if ops.len() == 2 => {
            let Operand::PreDec(RegRef::Gpr(n)) = &ops[1] else { return Err(unrecognized()) };
            Op::StcMem { reg: as_sysreg(&ops[0])?, n: *n }
        }
        "LDS" if ops.len() == 2 => Op::LdsReg { reg: as_extreg(&ops[1])?, m: as_gpr(&ops[0])? },
        "LDS.L" if ops.len() == 2 => {
            let Operand::PostInc(RegRef::Gpr(m)) = &ops[0] else { return Err(unrecognized()) };
            Op::LdsMem { reg: as_extreg(&ops[1])?, m: *m }
        }
        "STS" if ops.len() == 2 => Op::StsReg { reg: as_extreg(&ops[0])?, n: as_gpr(&ops[1])? },
        "STS.L" if ops.len() == 2 => {
            let Operand::PreDec(RegRef::Gpr(n)) = &ops[1] else { return Err(unrecognized()) };
            Op::StsMem { reg: as_extreg(&ops[0])?, n: *n }
        }
        "CLRMAC" => Op::ClrMac,
        "CLRS" => Op::ClrS,
        "CLRT" => Op::ClrT,
        "SETS" => Op::SetS,
        "SETT" => Op::SetT,
        "FRCHG" => Op::FrChg,
        "FSCHG" => Op::FsChg,

        "FMOV" | "FMOV.S" if ops.len() == 2 => build_fmov(&ops[0], &ops[1]).ok_or_else(unrecognized)?,
        "FADD" => { let (m, n) = frm_frn!(); Op::FAdd { n, m } }
        "FSUB" => { let (m, n) = frm_frn!(); Op::FSub { n, m } }
        "FMUL" => { let (m, n) = frm_frn!(); Op::FMul { n, m } }
        "FDIV" => { let (m, n) = frm_frn!(); Op::FDiv { n, m } }
        "FCMP/EQ" => { let (m, n) = frm_frn!(); Op::FCmpEq { n, m } }
        "FCMP/GT" => { let (m, n) = frm_frn!(); Op::FCmpGt { n, m } }
        "FMAC" if ops.len() == 3 => {
            if as_freg(&ops[0])? != 0 {
                return Err(unrecognized());
            }
            Op::FMac { n: as_freg(&ops[2])?, m: as_freg(&ops[1])? }
        }
        "FABS" if ops.len() == 1 => Op::FAbs { n: as_freg(&ops[0])? },
        "FNEG" if ops.len() == 1 => Op::FNeg { n: as_freg(&ops[0])? },
        "FSQRT" if ops.len() == 1 => Op::FSqrt { n: as_freg(&ops[0])? },
        "FSRRA" if ops.len() == 1 => Op::FSrra { n: as_freg(&ops[0])? },
        "FLDI0" if ops.len() == 1 => Op::FldI0 { n: as_freg(&ops[0])? },
        "FLDI1" if ops.len() == 1 => Op::FldI1 { n: as_freg(&ops[0])? },
        "FLDS" if ops.len() == 2 => Op::Flds { m: as_freg(&ops[0])? },
        "FSTS" if ops.len() == 2 => Op::Fsts { n: as_freg(&ops[1])? },
        "FLOAT" if ops.len() == 2 => Op::Float { n: as_freg(&ops[1])? },
        "FTRC" if ops.len() == 2 => Op::Ftrc { n: as_freg(&ops[0])? },
        "FCNVDS" if ops.len() == 2 => Op::FcnvDs { n: as_dreg(&ops[0])? },
        "FCNVSD" if ops.len() == 2 => Op::FcnvSd { n: as_dreg(&ops[1])? },
        "FIPR" if ops.len() == 2 => { let (m, n) = (as_fvreg(&ops[0])?, as_fvreg(&ops[1])?); Op::Fipr { n, m } }
        "FTRV" if ops.len() == 2 => {
            if !matches!(ops[0], Operand::Xmtrx) {
                return Err(unrecognized());
            }
            Op::Ftrv { n: as_fvreg(&ops[1])? }
        }

        "OCBI" if ops.len() == 1 => {
            let Operand::Indirect(RegRef::Gpr(n)) = &ops[0] else { return Err(unrecognized()) };
            Op::OcbI { n: *n }
        }
        "OCBP" if ops.len() == 1 => {
            let Operand::Indirect(RegRef::Gpr(n)) = &ops[0] else { return Err(unrecognized()) };
            Op::OcbP { n: *n }
        }
        "OCBWB" if ops.len() == 1 => {
            let Operand::Indirect(RegRef::Gpr(n)) = &ops[0] else { return Err(unrecognized()) };
            Op::OcbWb { n: *n }
        }
        "PREF" if ops.len() == 1 => {
            let Operand::Indirect(RegRef::Gpr(n)) = &ops[0] else { return Err(unrecognized()) };
            Op::Pref { n: *n }
        }
        "MOVCA.L" if ops.len() == 2 => {
            if as_gpr(&ops[0])? != 0 {
                return Err(unrecognized());
            }
            let Operand::Indirect(RegRef::Gpr(n)) = &ops[1] else { return Err(unrecognized()) };
            Op::MovCaL { n: *n }
        }

        "NOP" => Op::Nop,
        "SLEEP" => Op::Sleep,
        "LDTLB" => Op::Ldtlb,
        "TRAPA" if ops.len() == 1 => {
            let imm = as_imm(&ops[0])?;
            let imm: u8 = u8::try_from(imm)
                .map_err(|_| CoreError::InvalidParam(format!("TRAPA immediate {imm} out of range")))?;
            Op::Trapa { imm }
        }

        _ => return Err(unrecognized()),
    })
}

/// `FMOV`'s eight addressing/register-class combinations: reg-reg (FR or
/// DR/XD pairs), and the four memory forms, each usable with either an `FR`
/// or a `DR`/`XD` operand depending on `FPSCR.SZ` (left to the caller; the
/// assembler accepts either spelling and lets `encode` pick the bit pattern
/// the `Load`/`Store`-shaped `Op` variants already carry).
fn build_fmov(a: &Operand, b: &Operand) -> Option<Op> {
    match (a, b) {
        (Operand::Direct(RegRef::Fr(m)), Operand::Direct(RegRef::Fr(n))) => Some(Op::FMoveReg { n: *n, m: *m }),
        (Operand::Direct(RegRef::Dr(m)), Operand::Direct(RegRef::Dr(n))) => Some(Op::FMoveReg { n: *n, m: *m }),
        (Operand::Direct(RegRef::Dr(m)), Operand::Direct(RegRef::Xd(n))) => Some(Op::FMoveDrToXd { n: *n, m: *m }),
        (Operand::Direct(RegRef::Xd(m)), Operand::Direct(RegRef::Dr(n))) => Some(Op::FMoveXdToDr { n: *n, m: *m }),
        (Operand::Direct(RegRef::Xd(m)), Operand::Direct(RegRef::Xd(n))) => Some(Op::FMoveXdToXd { n: *n, m: *m }),
        (_, Operand::Direct(RegRef::Fr(n))) | (_, Operand::Direct(RegRef::Dr(n))) => {
            Some(Op::FMoveLoad { n: *n, addr: fp_addr(a).ok()? })
        }
        (Operand::Direct(RegRef::Fr(m)), _) | (Operand::Direct(RegRef::Dr(m)), _) => {
            Some(Op::FMoveStore { m: *m, addr: fp_addr(b).ok()? })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_register_to_register_move() {
        let ops = parse_operands("R2,R3").unwrap();
        assert_eq!(build_op("MOV", &ops).unwrap(), Op::MovReg { n: 3, m: 2 });
    }

    #[test]
    fn parses_r0_indexed_load() {
        let ops = parse_operands("@(R0,R4),R2").unwrap();
        assert_eq!(
            build_op("MOV.L", &ops).unwrap(),
            Op::Load { n: 2, width: Width::B4, src: LoadSrc::R0Indexed(4) }
        );
    }

    #[test]
    fn rejects_odd_double_precision_register() {
        let err = parse_operands("DR3,DR0").unwrap_err();
        assert!(matches!(err, CoreError::RegisterIndexError(_)));
    }

    #[test]
    fn rejects_unknown_mnemonic_shape() {
        let ops = parse_operands("R1,R2,R3").unwrap();
        let err = build_op("ADD", &ops).unwrap_err();
        assert!(matches!(err, CoreError::UnrecognizedPattern(_)));
    }
}

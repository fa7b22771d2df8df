//! The `Op` enum: one variant per canonical SH-4 instruction form.
//!
//! Per the Design Notes (SPEC_FULL.md §9), addressing-mode and transfer-width
//! variation within a mnemonic family is carried as data ([`LoadSrc`],
//! [`StoreDst`], [`FpAddr`], [`Width`]) rather than exploded into one `Op`
//! variant per combination; genuinely distinct instruction forms (e.g. `ADD`
//! vs `ADDC`, `FMOV` reg-reg vs `FMOV` through an `XD` register) each get
//! their own variant.

use crate::common::data::Width;

/// Addressing mode for a general-register load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSrc {
    /// `@Rm`.
    Reg(u32),
    /// `@Rm+`.
    PostInc(u32),
    /// `@(R0,Rm)`.
    R0Indexed(u32),
    /// `@(disp,Rm)`, `disp` already scaled by the transfer width.
    Disp(u32, u32),
    /// `@(disp,GBR)`, `disp` already scaled by the transfer width.
    GbrDisp(u32),
    /// `@(disp,PC)`, `disp` already scaled by the transfer width.
    PcDisp(u32),
}

/// Addressing mode for a general-register store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreDst {
    /// `@Rn`.
    Reg(u32),
    /// `@-Rn`.
    PreDec(u32),
    /// `@(R0,Rn)`.
    R0Indexed(u32),
    /// `@(disp,Rn)`, `disp` already scaled by the transfer width.
    Disp(u32, u32),
    /// `@(disp,GBR)`, `disp` already scaled by the transfer width.
    GbrDisp(u32),
}

/// Addressing mode for an `FMOV` operand (register or the four SH-4
/// addressing forms `@Rn`, `@-Rn`, `@Rn+`, `@(R0,Rn)`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FpAddr {
    /// Pure register-to-register transfer, no memory access.
    Reg(u32),
    /// `@Rn`.
    Indirect(u32),
    /// `@Rn+` (load only).
    PostInc(u32),
    /// `@-Rn` (store only).
    PreDec(u32),
    /// `@(R0,Rn)`.
    R0Indexed(u32),
}

/// A banked/non-banked control register named by `LDC`/`STC`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SysReg {
    /// Status register.
    Sr,
    /// Global Base Register.
    Gbr,
    /// Vector Base Register.
    Vbr,
    /// Saved Status Register.
    Ssr,
    /// Saved Program Counter.
    Spc,
    /// Saved General Register.
    Sgr,
    /// Debug Base Register.
    Dbr,
    /// `Rn_BANK` (0..8), always naming the bank opposite `SR.RB`.
    BankReg(u32),
}

/// A register named by `LDS`/`STS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtReg {
    /// High 16 bits of the MAC accumulator.
    Mach,
    /// Low 32 bits of the MAC accumulator.
    Macl,
    /// Procedure Register.
    Pr,
    /// FPU status/control register.
    Fpscr,
    /// FPU communication register.
    Fpul,
}

/// The comparison performed by a `CMP/xx` form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpKind {
    /// `CMP/EQ`: equal.
    Eq,
    /// `CMP/HS`: unsigned greater-or-equal.
    Hs,
    /// `CMP/GE`: signed greater-or-equal.
    Ge,
    /// `CMP/HI`: unsigned greater-than.
    Hi,
    /// `CMP/GT`: signed greater-than.
    Gt,
    /// `CMP/PL`: signed greater-than zero.
    Pl,
    /// `CMP/PZ`: signed greater-or-equal to zero.
    Pz,
    /// `CMP/STR`: any byte pair of `Rn`/`Rm` matches.
    Str,
}

/// A fixed-count shift/rotate amount (`SHLLn`/`SHLRn`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixedShift {
    /// Shift left logical by 2.
    Shll2,
    /// Shift right logical by 2.
    Shlr2,
    /// Shift left logical by 8.
    Shll8,
    /// Shift right logical by 8.
    Shlr8,
    /// Shift left logical by 16.
    Shll16,
    /// Shift right logical by 16.
    Shlr16,
}

/// A decoded SH-4 instruction.
///
/// One variant per canonical instruction form; see SPEC_FULL.md §4.5 for the
/// semantics of each category. [`crate::core::cpu::execution`] dispatches on
/// this enum; [`crate::isa::encode`] is its exact inverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    // ---- Moves ----
    /// `MOV Rm,Rn`.
    MovReg { n: u32, m: u32 },
    /// `MOV #imm,Rn`, `imm` sign-extended from 8 bits.
    MovImm { n: u32, imm: i32 },
    /// `MOVA @(disp,PC),R0`, `disp` already scaled by 4.
    Mova { disp: u32 },
    /// A general-register load of `width` bytes from `src` into `Rn`.
    Load { n: u32, width: Width, src: LoadSrc },
    /// A general-register store of `width` bytes from `Rm` (or `R0` for the
    /// GBR/disp forms) to `dst`.
    Store { m: u32, width: Width, dst: StoreDst },
    /// `EXTU.B Rm,Rn`: zero-extend the low byte.
    ExtuB { n: u32, m: u32 },
    /// `EXTU.W Rm,Rn`: zero-extend the low word.
    ExtuW { n: u32, m: u32 },
    /// `EXTS.B Rm,Rn`: sign-extend the low byte.
    ExtsB { n: u32, m: u32 },
    /// `EXTS.W Rm,Rn`: sign-extend the low word.
    ExtsW { n: u32, m: u32 },
    /// `SWAP.B`/`SWAP.W Rm,Rn`.
    Swap { n: u32, m: u32, width: Width },
    /// `XTRCT Rm,Rn`: middle 32 bits of `Rm:Rn`.
    Xtrct { n: u32, m: u32 },

    // ---- Arithmetic ----
    /// `ADD Rm,Rn`.
    Add { n: u32, m: u32 },
    /// `ADD #imm,Rn`, `imm` sign-extended from 8 bits.
    AddImm { n: u32, imm: i32 },
    /// `ADDC Rm,Rn`: add with carry-in/out through `SR.T`.
    Addc { n: u32, m: u32 },
    /// `ADDV Rm,Rn`: add with signed-overflow detection into `SR.T`.
    Addv { n: u32, m: u32 },
    /// `SUB Rm,Rn`.
    Sub { n: u32, m: u32 },
    /// `SUBC Rm,Rn`: subtract with borrow through `SR.T`.
    Subc { n: u32, m: u32 },
    /// `SUBV Rm,Rn`: subtract with signed-overflow detection into `SR.T`.
    Subv { n: u32, m: u32 },
    /// `NEG Rm,Rn`.
    Neg { n: u32, m: u32 },
    /// `NEGC Rm,Rn`: negate with borrow through `SR.T`.
    Negc { n: u32, m: u32 },
    /// A register-register `CMP/xx` form.
    CmpReg { kind: CmpKind, n: u32, m: u32 },
    /// `CMP/EQ #imm,R0`, `imm` sign-extended from 8 bits.
    CmpImm { imm: i32 },
    /// `MUL.L Rm,Rn`: low 32 bits of the product into `MACL`.
    MulL { n: u32, m: u32 },
    /// `MULS.W Rm,Rn`: signed 16x16 product into `MACL`.
    MulsW { n: u32, m: u32 },
    /// `MULU.W Rm,Rn`: unsigned 16x16 product into `MACL`.
    MuluW { n: u32, m: u32 },
    /// `DMULS.L Rm,Rn`: signed 64-bit product into `MACH:MACL`.
    DmulsL { n: u32, m: u32 },
    /// `DMULU.L Rm,Rn`: unsigned 64-bit product into `MACH:MACL`.
    DmuluL { n: u32, m: u32 },
    /// `MAC.L @Rm+,@Rn+`: 48-bit-saturating multiply-accumulate.
    MacL { n: u32, m: u32 },
    /// `MAC.W @Rm+,@Rn+`: 32-bit-saturating multiply-accumulate.
    MacW { n: u32, m: u32 },
    /// `DT Rn`: decrement and test for zero.
    Dt { n: u32 },
    /// `DIV0U`: clear `Q`/`M`/`T` ahead of an unsigned division sequence.
    Div0U,
    /// `DIV0S Rm,Rn`: seed `Q`/`M`/`T` ahead of a signed division sequence.
    Div0S { n: u32, m: u32 },
    /// `DIV1 Rm,Rn`: one restoring-division step.
    Div1 { n: u32, m: u32 },

    // ---- Logical and shifts ----
    /// `AND Rm,Rn`.
    And { n: u32, m: u32 },
    /// `AND #imm,R0`.
    AndImm { imm: u32 },
    /// `AND.B #imm,@(R0,GBR)`.
    AndByteGbr { imm: u32 },
    /// `OR Rm,Rn`.
    Or { n: u32, m: u32 },
    /// `OR #imm,R0`.
    OrImm { imm: u32 },
    /// `OR.B #imm,@(R0,GBR)`.
    OrByteGbr { imm: u32 },
    /// `XOR Rm,Rn`.
    Xor { n: u32, m: u32 },
    /// `XOR #imm,R0`.
    XorImm { imm: u32 },
    /// `XOR.B #imm,@(R0,GBR)`.
    XorByteGbr { imm: u32 },
    /// `NOT Rm,Rn`.
    Not { n: u32, m: u32 },
    /// `SHAD Rm,Rn`: variable arithmetic shift, signed 5-bit count in `Rm`.
    Shad { n: u32, m: u32 },
    /// `SHLD Rm,Rn`: variable logical shift, signed 5-bit count in `Rm`.
    Shld { n: u32, m: u32 },
    /// `SHAL Rn`: arithmetic shift left by one (alias of `SHLL`, sets `T`).
    Shal { n: u32 },
    /// `SHAR Rn`: arithmetic shift right by one.
    Shar { n: u32 },
    /// `SHLL Rn`: logical shift left by one.
    Shll { n: u32 },
    /// `SHLR Rn`: logical shift right by one.
    Shlr { n: u32 },
    /// A fixed-count `SHLLn`/`SHLRn` form.
    FixedShift { op: FixedShift, n: u32 },
    /// `ROTL Rn`.
    Rotl { n: u32 },
    /// `ROTR Rn`.
    Rotr { n: u32 },
    /// `ROTCL Rn`: rotate left through `T`.
    Rotcl { n: u32 },
    /// `ROTCR Rn`: rotate right through `T`.
    Rotcr { n: u32 },

    // ---- Bit tests ----
    /// `TST Rm,Rn`.
    Tst { n: u32, m: u32 },
    /// `TST #imm,R0`.
    TstImm { imm: u32 },
    /// `TST.B #imm,@(R0,GBR)`.
    TstByteGbr { imm: u32 },
    /// `TAS.B @Rn`: atomic test-and-set.
    TasB { n: u32 },

    // ---- Branches ----
    /// `BT label`, not delayed.
    Bt { disp: i32 },
    /// `BF label`, not delayed.
    Bf { disp: i32 },
    /// `BT/S label`, delayed.
    BtS { disp: i32 },
    /// `BF/S label`, delayed.
    BfS { disp: i32 },
    /// `BRA label`, delayed.
    Bra { disp: i32 },
    /// `BSR label`, delayed, sets `PR`.
    Bsr { disp: i32 },
    /// `BRAF Rn`, delayed.
    Braf { n: u32 },
    /// `BSRF Rn`, delayed, sets `PR`.
    Bsrf { n: u32 },
    /// `JMP @Rn`, delayed.
    Jmp { n: u32 },
    /// `JSR @Rn`, delayed, sets `PR`.
    Jsr { n: u32 },
    /// `RTS`, delayed, `PC <- PR`.
    Rts,
    /// `RTE`, delayed, `PC <- SPC`, `SR <- SSR`.
    Rte,

    // ---- System/FPU control ----
    /// `LDC Rm,<reg>`.
    LdcReg { reg: SysReg, m: u32 },
    /// `LDC.L @Rm+,<reg>`.
    LdcMem { reg: SysReg, m: u32 },
    /// `STC <reg>,Rn`.
    StcReg { reg: SysReg, n: u32 },
    /// `STC.L <reg>,@-Rn`.
    StcMem { reg: SysReg, n: u32 },
    /// `LDS Rm,<reg>`.
    LdsReg { reg: ExtReg, m: u32 },
    /// `LDS.L @Rm+,<reg>`.
    LdsMem { reg: ExtReg, m: u32 },
    /// `STS <reg>,Rn`.
    StsReg { reg: ExtReg, n: u32 },
    /// `STS.L <reg>,@-Rn`.
    StsMem { reg: ExtReg, n: u32 },
    /// `CLRMAC`.
    ClrMac,
    /// `CLRS`.
    ClrS,
    /// `CLRT`.
    ClrT,
    /// `SETS`.
    SetS,
    /// `SETT`.
    SetT,
    /// `FRCHG`: toggle `FPSCR.FR`.
    FrChg,
    /// `FSCHG`: toggle `FPSCR.SZ`.
    FsChg,

    // ---- FPU ----
    /// `FMOV` between two FPU registers (`FRm,FRn` or `DRm,DRn`, per `SZ`).
    FMoveReg { n: u32, m: u32 },
    /// `FMOV` through memory, loading into `FRn`/`DRn`.
    FMoveLoad { n: u32, addr: FpAddr },
    /// `FMOV` through memory, storing `FRm`/`DRm`.
    FMoveStore { m: u32, addr: FpAddr },
    /// `FMOV DRm,XDn`.
    FMoveDrToXd { n: u32, m: u32 },
    /// `FMOV XDm,DRn`.
    FMoveXdToDr { n: u32, m: u32 },
    /// `FMOV XDm,XDn`.
    FMoveXdToXd { n: u32, m: u32 },
    /// `FADD FRm,FRn` / `DRm,DRn`, per `FPSCR.PR`.
    FAdd { n: u32, m: u32 },
    /// `FSUB`.
    FSub { n: u32, m: u32 },
    /// `FMUL`.
    FMul { n: u32, m: u32 },
    /// `FDIV`.
    FDiv { n: u32, m: u32 },
    /// `FCMP/EQ`.
    FCmpEq { n: u32, m: u32 },
    /// `FCMP/GT`.
    FCmpGt { n: u32, m: u32 },
    /// `FMAC FR0,FRm,FRn`.
    FMac { n: u32, m: u32 },
    /// `FABS`.
    FAbs { n: u32 },
    /// `FNEG`.
    FNeg { n: u32 },
    /// `FSQRT`.
    FSqrt { n: u32 },
    /// `FSRRA`: fast reciprocal square root approximation.
    FSrra { n: u32 },
    /// `FLDI0 FRn`.
    FldI0 { n: u32 },
    /// `FLDI1 FRn`.
    FldI1 { n: u32 },
    /// `FLDS FRm,FPUL`: bit reinterpret.
    Flds { m: u32 },
    /// `FSTS FPUL,FRn`: bit reinterpret.
    Fsts { n: u32 },
    /// `FLOAT FPUL,FRn`/`DRn`: integer to float, per `FPSCR.PR`.
    Float { n: u32 },
    /// `FTRC FRn/DRn,FPUL`: truncating float to integer, per `FPSCR.PR`.
    Ftrc { n: u32 },
    /// `FCNVDS DRm,FPUL`: double to single.
    FcnvDs { n: u32 },
    /// `FCNVSD FPUL,DRn`: single to double.
    FcnvSd { n: u32 },
    /// `FIPR FVm,FVn`: four-vector dot product into `FVn[3]`.
    Fipr { n: u32, m: u32 },
    /// `FTRV XMTRX,FVn`: matrix-vector product.
    Ftrv { n: u32 },

    // ---- Caches ----
    /// `OCBI @Rn`.
    OcbI { n: u32 },
    /// `OCBP @Rn`.
    OcbP { n: u32 },
    /// `OCBWB @Rn`.
    OcbWb { n: u32 },
    /// `PREF @Rn`.
    Pref { n: u32 },
    /// `MOVCA.L R0,@Rn`.
    MovCaL { n: u32 },

    // ---- Misc ----
    /// `NOP`.
    Nop,
    /// `SLEEP`.
    Sleep,
    /// `LDTLB`.
    Ldtlb,
    /// `TRAPA #imm`.
    Trapa { imm: u8 },
}

impl SysReg {
    /// The 4-bit selector this core's encoding packs into the low nibble of
    /// an `LDC`/`STC` opcode's sub-code byte; see [`crate::isa::decode`].
    pub fn to_code(self) -> u32 {
        match self {
            SysReg::Sr => 0,
            SysReg::Gbr => 1,
            SysReg::Vbr => 2,
            SysReg::Ssr => 3,
            SysReg::Spc => 4,
            SysReg::Sgr => 5,
            SysReg::Dbr => 6,
            SysReg::BankReg(i) => 8 + i,
        }
    }

    /// The inverse of [`SysReg::to_code`].
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(SysReg::Sr),
            1 => Some(SysReg::Gbr),
            2 => Some(SysReg::Vbr),
            3 => Some(SysReg::Ssr),
            4 => Some(SysReg::Spc),
            5 => Some(SysReg::Sgr),
            6 => Some(SysReg::Dbr),
            8..=15 => Some(SysReg::BankReg(code - 8)),
            _ => None,
        }
    }
}

impl ExtReg {
    /// The 3-bit selector this core's encoding packs into the low nibble of
    /// an `LDS`/`STS` opcode's sub-code byte.
    pub fn to_code(self) -> u32 {
        match self {
            ExtReg::Mach => 0,
            ExtReg::Macl => 1,
            ExtReg::Pr => 2,
            ExtReg::Fpscr => 3,
            ExtReg::Fpul => 4,
        }
    }

    /// The inverse of [`ExtReg::to_code`].
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(ExtReg::Mach),
            1 => Some(ExtReg::Macl),
            2 => Some(ExtReg::Pr),
            3 => Some(ExtReg::Fpscr),
            4 => Some(ExtReg::Fpul),
            _ => None,
        }
    }
}

impl Op {
    /// True for every delayed-branch-issuing form (§4.5's delayed-branch
    /// machinery), as distinct from `BT`/`BF` which branch immediately.
    pub fn is_delayed_branch(self) -> bool {
        matches!(
            self,
            Op::BtS { .. }
                | Op::BfS { .. }
                | Op::Bra { .. }
                | Op::Bsr { .. }
                | Op::Braf { .. }
                | Op::Bsrf { .. }
                | Op::Jmp { .. }
                | Op::Jsr { .. }
                | Op::Rts
                | Op::Rte
        )
    }
}

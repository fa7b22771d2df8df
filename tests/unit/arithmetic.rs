//! Targeted regression coverage for two correctness fixes:
//! non-saturating `MAC.L`/`MAC.W` accumulation, and FPU vector/double
//! register accessors under a misaligned register field.

use crate::common::memory::SparseMemory;
use pretty_assertions::assert_eq;
use sh4_core::sim::Memory;
use sh4_core::{assembler, Config, Cpu};

fn write_program(mem: &mut SparseMemory, base: u32, text: &str) {
    crate::common::init_tracing();
    let mut bytes = Vec::new();
    assembler::assemble_stream(text, &mut bytes).expect("every line assembles");
    for (i, chunk) in bytes.chunks(2).enumerate() {
        let addr = base.wrapping_add((i as u32) * 2) & 0x1FFF_FFFF;
        mem.write(chunk, addr).unwrap();
    }
}

/// With `SR.S` clear, `MAC.L` accumulates into the full 64-bit `MACH:MACL`
/// pair rather than the 48-bit-significant saturating representation; a
/// MACH value outside the 48-bit range must survive unclamped.
#[test]
fn mac_l_accumulates_full_64_bits_when_not_saturating() {
    let mut cpu = Cpu::new(Config::default());
    let mut mem = SparseMemory::new();

    write_program(&mut mem, 0, "MAC.L @R1+,@R2+\n");
    cpu.pc = 0;
    cpu.sr.set_s(false);
    cpu.sysregs.mach = 0xFFFF_0002;
    cpu.sysregs.macl = 0x0000_0005;

    let a_addr = 0x1000_u32;
    let b_addr = 0x2000_u32;
    cpu.gpr.write(1, cpu.sr.rb(), a_addr);
    cpu.gpr.write(2, cpu.sr.rb(), b_addr);
    mem.write(&1i32.to_le_bytes(), a_addr).unwrap();
    mem.write(&3i32.to_le_bytes(), b_addr).unwrap();

    cpu.step(&mut mem, None).unwrap();

    // product = 1*3 = 3, added to the low word only; the high word (which a
    // 48-bit clamp would have overwritten down to its sign-extension) is
    // untouched.
    assert_eq!(cpu.sysregs.mach, 0xFFFF_0002);
    assert_eq!(cpu.sysregs.macl, 0x0000_0008);
}

/// Same property for `MAC.W`'s non-saturating path.
#[test]
fn mac_w_accumulates_full_64_bits_when_not_saturating() {
    let mut cpu = Cpu::new(Config::default());
    let mut mem = SparseMemory::new();

    write_program(&mut mem, 0, "MAC.W @R1+,@R2+\n");
    cpu.pc = 0;
    cpu.sr.set_s(false);
    cpu.sysregs.mach = 0xABCD_0000;
    cpu.sysregs.macl = 0xFFFF_FFF0;

    let a_addr = 0x1000_u32;
    let b_addr = 0x2000_u32;
    cpu.gpr.write(1, cpu.sr.rb(), a_addr);
    cpu.gpr.write(2, cpu.sr.rb(), b_addr);
    mem.write(&1i16.to_le_bytes(), a_addr).unwrap();
    mem.write(&3i16.to_le_bytes(), b_addr).unwrap();

    cpu.step(&mut mem, None).unwrap();

    assert_eq!(cpu.sysregs.mach, 0xABCD_0000);
    assert_eq!(cpu.sysregs.macl, 0xFFFF_FFF3);
}

/// `FIPR`'s vector operands are only architecturally valid on 4-aligned
/// `FVn` boundaries, but a decoded opcode can still carry an unaligned
/// field; executing it must not panic or read out of the register bank.
#[test]
fn fipr_with_misaligned_vector_register_does_not_panic() {
    let mut cpu = Cpu::new(Config::default());
    let mut mem = SparseMemory::new();

    // FIPR FV2,FV1 encoded by hand: hi=0x9, n=1, m=2, tag=7 (Op::Fipr).
    let opcode: u16 = 0x9000 | (1 << 8) | (2 << 4) | 7;
    mem.write(&opcode.to_le_bytes(), 0).unwrap();
    cpu.pc = 0;

    let bank = cpu.fpscr.fr();
    cpu.fpr.set_fr(0, bank, 1.0);
    cpu.fpr.set_fr(1, bank, 2.0);
    cpu.fpr.set_fr(2, bank, 3.0);
    cpu.fpr.set_fr(3, bank, 4.0);

    cpu.step(&mut mem, None).unwrap();

    // n=1 masks down to the FV0 quad, so the dot product lands in FR3.
    let expected = 1.0 * 1.0 + 2.0 * 2.0 + 3.0 * 3.0 + 4.0 * 4.0;
    assert_eq!(cpu.fpu_fr(3), expected);
}

//! End-to-end scenarios, one per SPEC_FULL.md §8 numbered case.
//!
//! Each test assembles or hand-places the exact instruction sequence the
//! scenario describes, drives the `Cpu` through it with `step`/`run_until`,
//! and asserts the architectural post-state the scenario specifies.

use crate::common::memory::SparseMemory;
use sh4_core::core::arch::Sr;
use sh4_core::core::units::cache::CacheControl;
use sh4_core::sim::Memory;
use sh4_core::{assembler, Config};

fn write_program(mem: &mut SparseMemory, base: u32, text: &str) {
    crate::common::init_tracing();
    let mut bytes = Vec::new();
    assembler::assemble_stream(text, &mut bytes).expect("every scenario line assembles");
    for (i, chunk) in bytes.chunks(2).enumerate() {
        let addr = base.wrapping_add((i as u32) * 2) & 0x1FFF_FFFF;
        mem.write(chunk, addr).unwrap();
    }
}

/// Scenario 1: 32-bit/16-bit unsigned division, the exact instruction
/// sequence and register setup from SPEC_FULL.md §8.1.
#[test]
fn unsigned_division_32_by_16() {
    let mut cpu = sh4_core::Cpu::new(Config::default());
    let mut mem = SparseMemory::new();

    let program = "SHLL16 R1\n\
                   MOV #16,R0\n\
                   DIV0U\n\
                   DIV1 R1,R2\nDIV1 R1,R2\nDIV1 R1,R2\nDIV1 R1,R2\n\
                   DIV1 R1,R2\nDIV1 R1,R2\nDIV1 R1,R2\nDIV1 R1,R2\n\
                   DIV1 R1,R2\nDIV1 R1,R2\nDIV1 R1,R2\nDIV1 R1,R2\n\
                   DIV1 R1,R2\nDIV1 R1,R2\nDIV1 R1,R2\nDIV1 R1,R2\n\
                   ROTCL R2\n\
                   EXTU.W R2,R2\n";
    write_program(&mut mem, 0, program);

    let divisor: u32 = 0x0000_00AB;
    let dividend: u32 = 0x0001_2345;
    cpu.gpr.write(1, cpu.sr.rb(), divisor);
    cpu.gpr.write(2, cpu.sr.rb(), dividend);
    cpu.pc = 0;

    cpu.run_until(&mut mem, 0x2A).unwrap();

    assert_eq!(cpu.pc, 0x2A);
    let expected_quotient = (dividend / divisor) & 0xFFFF;
    assert_eq!(cpu.gen_reg(2), expected_quotient);
}

/// Scenario 2: a delayed `BSR` with a register move in its delay slot.
#[test]
fn delayed_bsr_with_move_in_delay_slot() {
    let mut cpu = sh4_core::Cpu::new(Config::default());
    let mut mem = SparseMemory::new();

    let base = 0x8C00_0000u32;
    write_program(&mut mem, base, "BSR 4\nMOV R3,R4\n");

    cpu.pc = base;
    cpu.gpr.write(3, cpu.sr.rb(), 0xDEAD_BEEF);
    cpu.gpr.write(4, cpu.sr.rb(), 0);

    cpu.run_until(&mut mem, base.wrapping_add(8)).unwrap();

    assert_eq!(cpu.pc, base.wrapping_add(8));
    assert_eq!(cpu.gen_reg(3), 0xDEAD_BEEF);
    assert_eq!(cpu.gen_reg(4), 0xDEAD_BEEF);
    assert_eq!(cpu.sysregs.pr, base.wrapping_add(4));
}

/// Scenario 3: `MAC.L` with `SR.S` set saturates at the 48-bit positive cap
/// instead of overflowing into the sign bit.
#[test]
fn mac_l_saturates_at_positive_cap() {
    let mut cpu = sh4_core::Cpu::new(Config::default());
    let mut mem = SparseMemory::new();

    write_program(&mut mem, 0, "MAC.L @R1+,@R2+\n");
    cpu.pc = 0;
    cpu.sr.set_s(true);
    cpu.sysregs.mach = 0x0000_7FFF;
    cpu.sysregs.macl = 0xFFFF_FFFF;

    let a_addr = 0x1000_u32;
    let b_addr = 0x2000_u32;
    cpu.gpr.write(1, cpu.sr.rb(), a_addr);
    cpu.gpr.write(2, cpu.sr.rb(), b_addr);
    mem.write(&0x0000_1000u32.to_le_bytes(), a_addr).unwrap();
    mem.write(&0x0000_1000u32.to_le_bytes(), b_addr).unwrap();

    cpu.step(&mut mem, None).unwrap();

    assert_eq!(cpu.sysregs.mach & 0xFFFF, 0x0000_7FFF);
    assert_eq!(cpu.sysregs.macl, 0xFFFF_FFFF);
    assert_eq!(cpu.gen_reg(1), a_addr + 4);
    assert_eq!(cpu.gen_reg(2), b_addr + 4);
}

/// Scenario 4: a copy-back operand-cache write, then an eviction forced by a
/// same-set different-tag access, writes the original value back to
/// external memory.
#[test]
fn cache_write_back_on_eviction() {
    let config = Config {
        trace_retirement: false,
        initial_ccr: CacheControl {
            oce: true,
            wt: false,
            cb: true,
            oix: true,
            ora: false,
            ice: true,
            iix: true,
        },
    };
    let mut cpu = sh4_core::Cpu::new(config);
    let mut mem = SparseMemory::new();

    let addr = 0x8C00_0000u32;
    let evicting_addr = addr ^ (1 << 25);

    write_program(&mut mem, 0, "MOV.L R1,@R2\nMOV.L R3,@R4\n");
    cpu.pc = 0;
    cpu.gpr.write(1, cpu.sr.rb(), 0xAABB_CCDD);
    cpu.gpr.write(2, cpu.sr.rb(), addr);
    cpu.gpr.write(3, cpu.sr.rb(), 0x1111_1111);
    cpu.gpr.write(4, cpu.sr.rb(), evicting_addr);

    cpu.step(&mut mem, None).unwrap();
    cpu.step(&mut mem, None).unwrap();

    let mut buf = [0u8; 4];
    mem.read(&mut buf, addr & 0x1FFF_FFFF).unwrap();
    assert_eq!(u32::from_le_bytes(buf), 0xAABB_CCDD);
}

/// Scenario 5: cache-as-RAM (ORA) writes bypass the tag/valid machinery
/// entirely; invalidating the cache at the same address has no effect.
#[test]
fn ora_cache_as_ram_survives_invalidate() {
    let config = Config {
        trace_retirement: false,
        initial_ccr: CacheControl {
            oce: true,
            wt: false,
            cb: true,
            oix: false,
            ora: true,
            ice: false,
            iix: false,
        },
    };
    let mut cpu = sh4_core::Cpu::new(config);
    let mut mem = SparseMemory::new();

    let addr = 0x1C00_1000u32;
    write_program(&mut mem, 0, "MOV.L R1,@R2\nOCBI @R2\nMOV.L @R2,R3\n");
    cpu.pc = 0;
    cpu.gpr.write(1, cpu.sr.rb(), 0x1234_5678);
    cpu.gpr.write(2, cpu.sr.rb(), addr);

    cpu.step(&mut mem, None).unwrap();
    cpu.step(&mut mem, None).unwrap();
    cpu.step(&mut mem, None).unwrap();

    assert_eq!(cpu.gen_reg(3), 0x1234_5678);
}

/// Scenario 6: `RTE`'s `SR` update (and thus register-bank switch) is
/// visible to the delay slot that follows it.
#[test]
fn rte_bank_switch_visible_in_delay_slot() {
    let mut cpu = sh4_core::Cpu::new(Config::default());
    let mut mem = SparseMemory::new();

    let base = 0x8C00_0000u32;
    let target = 0x8C00_1000u32;
    write_program(&mut mem, base, "RTE\nMOV R3,R4\n");

    let mut sr0 = Sr::reset_value();
    sr0.set_rb(0);
    cpu.sr = sr0;
    cpu.pc = base;
    cpu.sysregs.spc = target;
    cpu.sysregs.ssr = Sr::reset_value().0; // RB = 1, MD = 1

    // The value MOV R3,R4 should observe once SR.RB has already flipped to 1.
    cpu.gpr.write(3, 1, 0xCAFE_F00D);

    cpu.step(&mut mem, None).unwrap(); // RTE
    assert_eq!(cpu.sr.rb(), 1, "RTE's SR write takes effect before the delay slot runs");
    cpu.step(&mut mem, None).unwrap(); // MOV R3,R4 (delay slot)

    assert_eq!(cpu.pc, target);
    assert_eq!(cpu.gen_reg(4), 0xCAFE_F00D);
}

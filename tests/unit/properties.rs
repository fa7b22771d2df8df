//! Universal properties that must hold regardless of cache configuration:
//! round-trip laws for data and instruction memory, and the identity a
//! delayed branch's delay slot must preserve.

use crate::common::memory::SparseMemory;
use crate::common::mocks::MockMemory;
use proptest::prelude::*;
use sh4_core::common::data::Width;
use sh4_core::core::units::cache::{CacheControl, OperandCache, WriteMode};
use sh4_core::sim::Memory;
use sh4_core::{assembler, Config};

/// Every `(oce, wt, cb, oix, ora)` combination a real `CCR` write can produce
/// for the operand cache, ICE/IIX held fixed since they gate a different
/// cache entirely.
fn oc_configs() -> Vec<CacheControl> {
    let mut configs = Vec::new();
    for &oce in &[false, true] {
        for &cb in &[false, true] {
            for &oix in &[false, true] {
                for &ora in &[false, true] {
                    configs.push(CacheControl {
                        oce,
                        wt: !cb,
                        cb,
                        oix,
                        ora,
                        ice: false,
                        iix: false,
                    });
                }
            }
        }
    }
    configs
}

fn assemble_one(text: &str) -> u16 {
    assembler::assemble_line(text).expect("every property fixture line assembles")
}

proptest! {
    /// A `MOV.L Rm,@Rn` followed by `MOV.L @Rn,Ro` returns exactly what was
    /// written, for every operand-cache configuration and any P0 address
    /// (ORA-window addresses excepted, since cache-as-RAM geometry differs
    /// only in its backing store, not in this round-trip property).
    #[test]
    fn data_round_trip_holds_across_every_cache_config(
        value in any::<u32>(),
        addr_word in 0u32..(1 << 24),
    ) {
        // Well clear of the program bytes below, so a generated address can
        // never alias the two instructions under test.
        let addr = (addr_word * 4) & 0x03FF_FFFF;
        prop_assume!(addr & 0x1C00_0000 != 0x1C00_0000);
        let program_base = 0x1000_0000u32;

        for config in oc_configs() {
            let mut cpu = sh4_core::Cpu::new(Config {
                trace_retirement: false,
                initial_ccr: config,
            });
            let mut mem = SparseMemory::new();

            let store = assemble_one("MOV.L R1,@R2");
            let load = assemble_one("MOV.L @R2,R3");
            mem.write(&store.to_le_bytes(), program_base).unwrap();
            mem.write(&load.to_le_bytes(), program_base + 2).unwrap();

            cpu.pc = program_base;
            cpu.gpr.write(1, cpu.sr.rb(), value);
            cpu.gpr.write(2, cpu.sr.rb(), addr);

            cpu.step(&mut mem, None).unwrap();
            cpu.step(&mut mem, None).unwrap();

            prop_assert_eq!(cpu.gen_reg(3), value, "config {:?} lost data round-tripped through {:#x}", config, addr);
        }
    }

    /// A `NOP` placed at an arbitrary aligned address is fetched and retired
    /// identically whether the instruction cache is enabled or not.
    #[test]
    fn instruction_fetch_round_trips_with_ic_on_or_off(addr_word in 0u32..(1 << 20), ice in any::<bool>()) {
        let addr = (addr_word * 2) & 0x01FF_FFFE;
        let config = Config {
            trace_retirement: false,
            initial_ccr: CacheControl { ice, iix: false, ..CacheControl::default() },
        };
        let mut cpu = sh4_core::Cpu::new(config);
        let mut mem = SparseMemory::new();
        let nop = assemble_one("NOP");
        mem.write(&nop.to_le_bytes(), addr).unwrap();

        cpu.pc = addr;
        cpu.step(&mut mem, None).unwrap();

        prop_assert_eq!(cpu.pc, addr.wrapping_add(2));
        prop_assert_eq!(cpu.stats.instructions_retired, 1);
    }

    /// For any delayed branch `B` to a displacement `disp` with a
    /// non-branching delay slot `MOV Rm,Rn`, after both steps retire `pc`
    /// equals the branch target and `Rn` holds `Rm`'s pre-branch value,
    /// regardless of what `disp` is (within the encodable range).
    #[test]
    fn delayed_branch_delay_slot_effect_survives_to_target(
        disp in (-100i32..100i32).prop_map(|d| d * 2),
        value in any::<u32>(),
    ) {
        let base = 0x0C00_0000u32;
        let mut cpu = sh4_core::Cpu::new(Config::default());
        let mut mem = SparseMemory::new();

        let bra = assemble_one(&format!("BRA {disp}"));
        let mov = assemble_one("MOV R1,R2");
        mem.write(&bra.to_le_bytes(), base).unwrap();
        mem.write(&mov.to_le_bytes(), base + 2).unwrap();

        cpu.pc = base;
        cpu.gpr.write(1, cpu.sr.rb(), value);
        cpu.gpr.write(2, cpu.sr.rb(), 0);

        cpu.step(&mut mem, None).unwrap();
        cpu.step(&mut mem, None).unwrap();

        let target = base.wrapping_add(4).wrapping_add(disp as u32);
        prop_assert_eq!(cpu.pc, target);
        prop_assert_eq!(cpu.gen_reg(2), value);
    }
}

/// A resident, clean operand-cache line satisfies every further read without
/// consulting the external `Memory` collaborator again.
#[test]
fn cache_hit_does_not_touch_external_memory() {
    let mut oc = OperandCache::new();
    let mut mock = MockMemory::new();

    mock.expect_read().times(1).returning(|dst, _| {
        dst.fill(0xAB);
        Ok(())
    });

    // The first read misses and fills a line from `mock`; the second must
    // hit the now-resident line and never call `mock` again (the `times(1)`
    // expectation above panics on a second call, so a pass here is the
    // property holding).
    let v1 = oc.read(&mut mock, 0x2000, Width::B4, false, false).unwrap();
    let v2 = oc.read(&mut mock, 0x2000, Width::B4, false, false).unwrap();
    assert_eq!(v1, v2);
}

/// A copy-back write to a line already resident and clean dirties it without
/// touching external memory; only the eventual eviction writes back.
#[test]
fn copyback_write_to_resident_line_defers_to_eviction() {
    let mut oc = OperandCache::new();
    let mut mock = MockMemory::new();

    // One fill for the initial resident line, one more when the evicting
    // write below loads its own line after writing the dirty one back.
    mock.expect_read().times(2).returning(|dst, _| {
        dst.fill(0);
        Ok(())
    });
    mock.expect_write().times(1).returning(|_, _| Ok(()));

    oc.read(&mut mock, 0x3000, Width::B4, false, false).unwrap();
    oc.write(
        &mut mock,
        0x3000,
        Width::B4,
        0xDEAD_BEEF,
        WriteMode::CopyBack,
        false,
        false,
    )
    .unwrap();

    let evicting = 0x3000 ^ (1 << 25);
    oc.write(&mut mock, evicting, Width::B4, 0, WriteMode::CopyBack, false, false)
        .unwrap();
}

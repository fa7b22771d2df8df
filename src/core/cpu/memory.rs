//! The Address Decoder and the Memory Access Layer.
//!
//! The decoder classifies a virtual address into its P0-P4 area and checks
//! alignment and privilege; this core never models the MMU (no TLB is
//! implemented), so every area simply passes through to the low 29 bits, the
//! same as P1/P2 on real hardware (see DESIGN.md). The Memory Access Layer
//! funnels every fetch/load/store through the matching cache when it is
//! enabled, or straight to the `Memory` collaborator when it is not.

use super::Cpu;
use crate::common::addr::VirtAddr;
use crate::common::data::{AccessType, Width};
use crate::common::error::CoreError;
use crate::sim::Memory;

impl Cpu {
    /// Classifies and validates `vaddr` for a `width`-byte access of kind
    /// `access`, returning the physical address the caches and `Memory`
    /// collaborator should use.
    pub(crate) fn decode_address(
        &self,
        vaddr: u32,
        width: Width,
        access: AccessType,
    ) -> Result<crate::common::addr::PhysAddr, CoreError> {
        let n = width.bytes();
        if vaddr % n != 0 {
            let kind = match access {
                AccessType::Fetch => "instruction fetch",
                AccessType::Read => "data read",
                AccessType::Write => "data write",
            };
            return Err(CoreError::AddressError {
                addr: vaddr,
                reason: format!("{kind} misaligned for a {n}-byte access"),
            });
        }

        let virt = VirtAddr::new(vaddr);
        let area = virt.area();
        if area.is_privileged() && !self.sr.md() {
            let kind = match access {
                AccessType::Fetch => "instruction fetch",
                AccessType::Read => "data read",
                AccessType::Write => "data write",
            };
            return Err(CoreError::AddressError {
                addr: vaddr,
                reason: format!("{kind} from a privileged area in user mode"),
            });
        }

        Ok(crate::common::addr::PhysAddr::new(virt.low29()))
    }

    /// Fetches the 16-bit instruction word at `vaddr`, through the
    /// instruction cache when `CCR.ICE` is set.
    pub(crate) fn read_inst(&mut self, mem: &mut dyn Memory, vaddr: u32) -> Result<u16, CoreError> {
        let paddr = self.decode_address(vaddr, Width::B2, AccessType::Fetch)?;
        if self.ccr.ice {
            if self.ic.would_hit(paddr.val(), self.ccr.iix) {
                self.stats.ic_hits += 1;
            } else {
                self.stats.ic_misses += 1;
            }
            self.ic.read_inst(mem, paddr.val(), self.ccr.iix)
        } else {
            let mut buf = [0u8; 2];
            mem.read(&mut buf, paddr.val())?;
            Ok(u16::from_le_bytes(buf))
        }
    }

    /// Reads `width` bytes of data from `vaddr`, through the operand cache
    /// when `CCR.OCE` is set.
    pub(crate) fn read_data(
        &mut self,
        mem: &mut dyn Memory,
        vaddr: u32,
        width: Width,
    ) -> Result<u64, CoreError> {
        let paddr = self.decode_address(vaddr, width, AccessType::Read)?;
        if self.ccr.oce {
            if self.oc.would_hit(paddr.val(), self.ccr.oix, self.ccr.ora) {
                self.stats.oc_hits += 1;
            } else {
                self.stats.oc_misses += 1;
            }
            self.oc
                .read(mem, paddr.val(), width, self.ccr.oix, self.ccr.ora)
        } else {
            let n = width.bytes() as usize;
            let mut buf = [0u8; 8];
            mem.read(&mut buf[..n], paddr.val())?;
            Ok(read_le(&buf, n))
        }
    }

    /// Writes `width` bytes of `data` to `vaddr`, through the operand cache
    /// when `CCR.OCE` is set.
    pub(crate) fn write_data(
        &mut self,
        mem: &mut dyn Memory,
        vaddr: u32,
        width: Width,
        data: u64,
    ) -> Result<(), CoreError> {
        let paddr = self.decode_address(vaddr, width, AccessType::Write)?;
        if self.ccr.oce {
            let before = self.oc.write_back_count();
            self.oc.write(
                mem,
                paddr.val(),
                width,
                data,
                self.ccr.write_mode(),
                self.ccr.oix,
                self.ccr.ora,
            )?;
            self.stats.oc_write_backs += self.oc.write_back_count() - before;
            Ok(())
        } else {
            let n = width.bytes() as usize;
            let mut buf = [0u8; 8];
            buf[..n].copy_from_slice(&data.to_le_bytes()[..n]);
            mem.write(&buf[..n], paddr.val())
        }
    }
}

fn read_le(buf: &[u8], n: usize) -> u64 {
    let mut acc = 0u64;
    for (i, byte) in buf.iter().take(n).enumerate() {
        acc |= (*byte as u64) << (8 * i);
    }
    acc
}

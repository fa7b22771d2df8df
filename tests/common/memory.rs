use sh4_core::CoreError;
use sh4_core::sim::Memory;
use std::collections::HashMap;

/// A byte-sparse RAM spanning the entire 29-bit physical address space.
///
/// Scenario tests touch addresses scattered from `0x0000_0000` up through the
/// ORA window in physical area 7 (`0x1c00_0000`..); a flat `Vec` sized to
/// cover that range would allocate hundreds of megabytes per test. Unwritten
/// bytes read back as zero, matching freshly powered-on RAM.
#[derive(Debug, Default)]
pub struct SparseMemory {
    bytes: HashMap<u32, u8>,
}

impl SparseMemory {
    /// Creates an empty (all-zero) RAM.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Memory for SparseMemory {
    fn read(&mut self, dst: &mut [u8], phys_addr: u32) -> Result<(), CoreError> {
        for (i, byte) in dst.iter_mut().enumerate() {
            let addr = phys_addr.wrapping_add(i as u32);
            *byte = self.bytes.get(&addr).copied().unwrap_or(0);
        }
        Ok(())
    }

    fn write(&mut self, src: &[u8], phys_addr: u32) -> Result<(), CoreError> {
        for (i, byte) in src.iter().enumerate() {
            let addr = phys_addr.wrapping_add(i as u32);
            self.bytes.insert(addr, *byte);
        }
        Ok(())
    }
}

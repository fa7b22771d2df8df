//! External collaborator interfaces the CPU consumes.
//!
//! These traits are the CPU's entire view of the outside world. The crate
//! ships no concrete production implementation of any of them; the embedding
//! emulator supplies RAM, a BIOS image, and an interrupt source. A `Vec<u8>`-backed
//! `Memory` is provided under `#[cfg(test)]` for the unit-test harness.

use crate::common::error::CoreError;

/// The external physical-memory collaborator the Memory Access Layer falls
/// back to on a cache miss (or when a cache is disabled).
///
/// `phys_addr` is always a 29-bit physical address, already decoded by
/// [`crate::core::cpu::memory`]; this trait never sees a virtual address.
pub trait Memory {
    /// Reads `dst.len()` bytes starting at `phys_addr` into `dst`.
    fn read(&mut self, dst: &mut [u8], phys_addr: u32) -> Result<(), CoreError>;

    /// Writes `src` starting at `phys_addr`.
    fn write(&mut self, src: &[u8], phys_addr: u32) -> Result<(), CoreError>;
}

/// The BIOS image collaborator, used by the boot path and the test harness.
pub trait BiosFile {
    /// Zeros the entire image.
    fn clear(&mut self);

    /// Copies `bytes` into the image starting at `offset`.
    fn load(&mut self, offset: usize, bytes: &[u8]) -> Result<(), CoreError>;

    /// The image size in bytes.
    fn size(&self) -> usize;
}

/// An optional interrupt source the CPU polls at instruction boundaries.
pub trait InterruptController {
    /// Posts an interrupt at the given priority level (0 = lowest).
    fn post(&mut self, level: u8);

    /// Returns the highest-priority pending interrupt level, if any is
    /// above the CPU's current `SR.IMASK`.
    fn pending(&self) -> Option<u8>;
}

#[cfg(test)]
pub mod test_support {
    //! A trivial in-memory `Memory` implementation used only by the unit-test suite.

    use super::Memory;
    use crate::common::error::CoreError;

    /// A flat `Vec<u8>`-backed RAM, large enough for the test harness's programs.
    #[derive(Debug)]
    pub struct VecMemory {
        bytes: Vec<u8>,
    }

    impl VecMemory {
        /// Creates a zeroed RAM of the given size.
        pub fn new(size: usize) -> Self {
            Self {
                bytes: vec![0; size],
            }
        }
    }

    impl Memory for VecMemory {
        fn read(&mut self, dst: &mut [u8], phys_addr: u32) -> Result<(), CoreError> {
            let start = phys_addr as usize;
            let end = start + dst.len();
            if end > self.bytes.len() {
                return Err(CoreError::ExternalIoFailure(format!(
                    "read out of bounds: {start:#x}..{end:#x}"
                )));
            }
            dst.copy_from_slice(&self.bytes[start..end]);
            Ok(())
        }

        fn write(&mut self, src: &[u8], phys_addr: u32) -> Result<(), CoreError> {
            let start = phys_addr as usize;
            let end = start + src.len();
            if end > self.bytes.len() {
                return Err(CoreError::ExternalIoFailure(format!(
                    "write out of bounds: {start:#x}..{end:#x}"
                )));
            }
            self.bytes[start..end].copy_from_slice(src);
            Ok(())
        }
    }
}

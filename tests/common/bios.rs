use sh4_core::sim::BiosFile;
use sh4_core::CoreError;

/// A flat `Vec<u8>`-backed BIOS image, exercising [`BiosFile`] the same way
/// a real emulator's boot path would: clear, load a blob at an offset, and
/// report its size.
#[derive(Debug)]
pub struct VecBios {
    bytes: Vec<u8>,
}

impl VecBios {
    /// Creates a zeroed image of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// Borrows the image's backing bytes, for assertions.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl BiosFile for VecBios {
    fn clear(&mut self) {
        self.bytes.iter_mut().for_each(|b| *b = 0);
    }

    fn load(&mut self, offset: usize, bytes: &[u8]) -> Result<(), CoreError> {
        let end = offset + bytes.len();
        if end > self.bytes.len() {
            return Err(CoreError::Overflow(format!(
                "BIOS load out of bounds: {offset:#x}..{end:#x} (image is {} bytes)",
                self.bytes.len()
            )));
        }
        self.bytes[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    fn size(&self) -> usize {
        self.bytes.len()
    }
}

use sh4_core::sim::InterruptController;

/// A single-slot interrupt source: `post` latches a level, `pending` reports
/// it until the CPU accepts it and the test harness clears it by posting
/// again or constructing a fresh controller.
#[derive(Debug, Default)]
pub struct LatchInterrupt {
    level: Option<u8>,
}

impl LatchInterrupt {
    /// Creates a controller with nothing pending.
    pub fn new() -> Self {
        Self { level: None }
    }

    /// Clears any latched interrupt, as a real controller would once its
    /// interrupt-acknowledge cycle completes.
    pub fn clear(&mut self) {
        self.level = None;
    }
}

impl InterruptController for LatchInterrupt {
    fn post(&mut self, level: u8) {
        self.level = Some(level);
    }

    fn pending(&self) -> Option<u8> {
        self.level
    }
}

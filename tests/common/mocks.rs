use mockall::mock;
use sh4_core::CoreError;
use sh4_core::sim::Memory;

mock! {
    pub Memory {}
    impl Memory for Memory {
        fn read(&mut self, dst: &mut [u8], phys_addr: u32) -> Result<(), CoreError>;
        fn write(&mut self, src: &[u8], phys_addr: u32) -> Result<(), CoreError>;
    }
}

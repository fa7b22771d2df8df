//! Common utilities and types used throughout the SH-4 core.
//!
//! This module provides fundamental building blocks that are shared across all
//! components of the core. It includes:
//! 1. **Address Types:** Strong types for virtual and physical addresses.
//! 2. **Constants:** System-wide constants for memory areas, cache geometry, and instructions.
//! 3. **Memory Access:** Definitions for categorizing memory operations (Fetch/Read/Write) and transfer widths.
//! 4. **Error Handling:** The `CoreError` type and the architectural `Trap` representation.

/// Address type definitions (physical and virtual addresses) and the area decoder.
pub mod addr;

/// Common constants used throughout the core.
pub mod constants;

/// Memory access classification and transfer-width types.
pub mod data;

/// Error types and the architectural trap/exception representation.
pub mod error;

pub use addr::{Area, PhysAddr, VirtAddr};
pub use data::{AccessType, Width};
pub use error::{CoreError, Trap};

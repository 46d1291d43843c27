//! Element flag constants.
//!
//! The 4-byte prefix of a full key is a big-endian u32 flags value. The
//! codec itself only distinguishes the logical bit; the remaining values
//! classify element kinds for calling code and reuse overlapping bit
//! patterns on purpose.

/// Flags value for elements with physical geometry.
pub const FLAG_PHYSICAL: u32 = 0x0000_0000;

/// Flags value for logical elements (systems, generic assets, ...).
pub const FLAG_LOGICAL: u32 = 0x0100_0000;

/// Bit distinguishing logical from physical elements.
pub const LOGICAL_MASK: u32 = 0x0100_0000;

/// Returns true if the flags value marks a logical element.
#[must_use]
pub const fn is_logical(flags: u32) -> bool {
    flags & LOGICAL_MASK != 0
}

/// Element-kind flag values used by higher-level callers.
///
/// These are published for convenience only; the codec never interprets
/// them beyond the logical bit.
pub mod element_flags {
    /// Plain physical element.
    pub const SIMPLE_ELEMENT: u32 = 0x0000_0000;
    /// Child element nested inside another element.
    pub const NESTED_CHILD: u32 = 0x0000_0001;
    /// Child member of a composite element.
    pub const COMPOSITE_CHILD: u32 = 0x0000_0002;
    /// Parent of a composite element.
    pub const COMPOSITE_PARENT: u32 = 0x0000_0003;
    /// Room bounding element.
    pub const ROOM: u32 = 0x0000_0005;
    /// Family type (logical).
    pub const FAMILY_TYPE: u32 = 0x0100_0000;
    /// Level (logical).
    pub const LEVEL: u32 = 0x0100_0001;
    /// Telemetry stream (logical).
    pub const STREAM: u32 = 0x0100_0003;
    /// System grouping (logical).
    pub const SYSTEM: u32 = 0x0100_0004;
    /// Generic asset (logical).
    pub const GENERIC_ASSET: u32 = 0x0100_0005;
    /// Ticket (logical).
    pub const TICKET: u32 = 0x0100_0006;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_bit() {
        assert!(!is_logical(FLAG_PHYSICAL));
        assert!(is_logical(FLAG_LOGICAL));
        assert!(is_logical(element_flags::STREAM));
        assert!(is_logical(element_flags::GENERIC_ASSET));
        assert!(!is_logical(element_flags::ROOM));
        assert!(!is_logical(element_flags::SIMPLE_ELEMENT));
    }
}

//! Device number type.
//!
//! A [`DevId`] names a device by its major and minor numbers. The packed
//! 32-bit form uses the classic kernel layout: 12 bits of major above 20
//! bits of minor.

use core::fmt;

/// Number of bits used for the minor number in the packed form.
pub const MINOR_BITS: u32 = 20;

/// Largest minor number representable in the packed form.
pub const MINOR_MASK: u32 = (1 << MINOR_BITS) - 1;

/// Largest major number representable in the packed form.
pub const MAJOR_MAX: u32 = (1 << (32 - MINOR_BITS)) - 1;

/// Device identifier: a `major:minor` pair.
///
/// Equality is full composite equality; ordering is by major, then minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DevId {
    major: u32,
    minor: u32,
}

impl DevId {
    /// Creates a new `DevId`.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Returns the major number.
    pub const fn major(self) -> u32 {
        self.major
    }

    /// Returns the minor number.
    pub const fn minor(self) -> u32 {
        self.minor
    }

    /// Decodes a packed device number.
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            major: raw >> MINOR_BITS,
            minor: raw & MINOR_MASK,
        }
    }

    /// Encodes into the packed form.
    ///
    /// Returns `None` if either component does not fit its field.
    pub const fn to_raw(self) -> Option<u32> {
        if self.major > MAJOR_MAX || self.minor > MINOR_MASK {
            return None;
        }
        Some((self.major << MINOR_BITS) | self.minor)
    }
}

impl fmt::Display for DevId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let dev = DevId::new(8, 1);
        assert_eq!(dev.major(), 8);
        assert_eq!(dev.minor(), 1);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", DevId::new(8, 1)), "8:1");
        assert_eq!(format!("{}", DevId::new(0, 0)), "0:0");
    }

    #[test]
    fn equality_is_composite() {
        assert_eq!(DevId::new(8, 1), DevId::new(8, 1));
        assert_ne!(DevId::new(8, 1), DevId::new(8, 2));
        assert_ne!(DevId::new(8, 1), DevId::new(1, 8));
    }

    #[test]
    fn ordering() {
        assert!(DevId::new(1, 200) < DevId::new(2, 0));
        assert!(DevId::new(8, 0) < DevId::new(8, 1));
    }

    #[test]
    fn packed_layout() {
        let dev = DevId::new(8, 1);
        assert_eq!(dev.to_raw(), Some(0x0080_0001));
        assert_eq!(DevId::from_raw(0x0080_0001), dev);
    }

    #[test]
    fn packed_limits() {
        assert_eq!(DevId::new(MAJOR_MAX, MINOR_MASK).to_raw(), Some(u32::MAX));
        assert_eq!(DevId::new(MAJOR_MAX + 1, 0).to_raw(), None);
        assert_eq!(DevId::new(0, MINOR_MASK + 1).to_raw(), None);
    }
}

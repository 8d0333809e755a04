use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{VirtcoreError, VirtcoreResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A positive virtual-disk capacity.
///
/// ## Format
/// A whole number with an optional unit suffix, the forms the image utility
/// accepts:
/// - `20G` - gibibytes
/// - `512M` - mebibytes
/// - `4096` - plain bytes (no suffix)
///
/// Suffixes are case-insensitive. Zero, negative, fractional, or otherwise
/// malformed sizes are rejected at parse time, so a `DiskSize` always denotes
/// a positive byte quantity.
///
/// ## Examples
///
/// ```
/// use virtcore::config::DiskSize;
///
/// let size = "10G".parse::<DiskSize>().unwrap();
/// assert_eq!(size.get_bytes(), 10 * 1024 * 1024 * 1024);
/// assert_eq!(size.to_string(), "10G");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskSize {
    value: u64,
    unit: SizeUnit,
}

/// A size unit suffix accepted by the image utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    /// No suffix - plain bytes.
    Bytes,

    /// `K` suffix - kibibytes.
    Kibibytes,

    /// `M` suffix - mebibytes.
    Mebibytes,

    /// `G` suffix - gibibytes.
    Gibibytes,

    /// `T` suffix - tebibytes.
    Tebibytes,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl DiskSize {
    /// Creates a new `DiskSize`, rejecting zero and sizes that overflow a
    /// byte count.
    pub fn new(value: u64, unit: SizeUnit) -> VirtcoreResult<Self> {
        if value == 0 {
            return Err(VirtcoreError::InvalidSize(format!(
                "{}{}",
                value,
                unit.suffix()
            )));
        }

        value
            .checked_mul(unit.multiplier())
            .ok_or_else(|| VirtcoreError::InvalidSize(format!("{}{}", value, unit.suffix())))?;

        Ok(Self { value, unit })
    }

    /// Returns the capacity in bytes.
    pub fn get_bytes(&self) -> u64 {
        // Overflow was rejected at construction.
        self.value.saturating_mul(self.unit.multiplier())
    }
}

impl SizeUnit {
    /// Returns the byte multiplier for this unit.
    pub fn multiplier(&self) -> u64 {
        match self {
            Self::Bytes => 1,
            Self::Kibibytes => 1 << 10,
            Self::Mebibytes => 1 << 20,
            Self::Gibibytes => 1 << 30,
            Self::Tebibytes => 1 << 40,
        }
    }

    /// Returns the canonical suffix for this unit.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Bytes => "",
            Self::Kibibytes => "K",
            Self::Mebibytes => "M",
            Self::Gibibytes => "G",
            Self::Tebibytes => "T",
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for DiskSize {
    /// Returns the default disk size for a new VM, 20 GiB.
    fn default() -> Self {
        Self {
            value: 20,
            unit: SizeUnit::Gibibytes,
        }
    }
}

impl FromStr for DiskSize {
    type Err = VirtcoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(VirtcoreError::InvalidSize(s.to_string()));
        }

        let (digits, suffix) = match trimmed.find(|c: char| !c.is_ascii_digit()) {
            Some(idx) => trimmed.split_at(idx),
            None => (trimmed, ""),
        };

        let unit = match suffix {
            "" => SizeUnit::Bytes,
            "k" | "K" => SizeUnit::Kibibytes,
            "m" | "M" => SizeUnit::Mebibytes,
            "g" | "G" => SizeUnit::Gibibytes,
            "t" | "T" => SizeUnit::Tebibytes,
            _ => return Err(VirtcoreError::InvalidSize(s.to_string())),
        };

        let value: u64 = digits
            .parse()
            .map_err(|_| VirtcoreError::InvalidSize(s.to_string()))?;

        Self::new(value, unit).map_err(|_| VirtcoreError::InvalidSize(s.to_string()))
    }
}

impl fmt::Display for DiskSize {
    /// Formats the size in the `<value><suffix>` form passed to the image
    /// utility.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl Serialize for DiskSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DiskSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_size_from_str() {
        // Suffixed forms
        assert_eq!(
            "20G".parse::<DiskSize>().unwrap(),
            DiskSize::new(20, SizeUnit::Gibibytes).unwrap()
        );
        assert_eq!(
            "512M".parse::<DiskSize>().unwrap(),
            DiskSize::new(512, SizeUnit::Mebibytes).unwrap()
        );
        assert_eq!(
            "1T".parse::<DiskSize>().unwrap(),
            DiskSize::new(1, SizeUnit::Tebibytes).unwrap()
        );

        // Lowercase suffix
        assert_eq!(
            "10g".parse::<DiskSize>().unwrap(),
            DiskSize::new(10, SizeUnit::Gibibytes).unwrap()
        );

        // Plain bytes
        assert_eq!(
            "4096".parse::<DiskSize>().unwrap(),
            DiskSize::new(4096, SizeUnit::Bytes).unwrap()
        );

        // Invalid forms
        assert!("".parse::<DiskSize>().is_err());
        assert!("0G".parse::<DiskSize>().is_err());
        assert!("-5G".parse::<DiskSize>().is_err());
        assert!("G".parse::<DiskSize>().is_err());
        assert!("10X".parse::<DiskSize>().is_err());
        assert!("1.5G".parse::<DiskSize>().is_err());
        assert!("10 G".parse::<DiskSize>().is_err());
    }

    #[test]
    fn test_disk_size_bytes() {
        assert_eq!("1K".parse::<DiskSize>().unwrap().get_bytes(), 1024);
        assert_eq!("2M".parse::<DiskSize>().unwrap().get_bytes(), 2 << 20);
        assert_eq!(
            "10G".parse::<DiskSize>().unwrap().get_bytes(),
            10 * (1 << 30)
        );
        assert_eq!("123".parse::<DiskSize>().unwrap().get_bytes(), 123);
    }

    #[test]
    fn test_disk_size_rejects_overflow() {
        assert!(DiskSize::new(u64::MAX, SizeUnit::Gibibytes).is_err());
        assert!(format!("{}T", u64::MAX).parse::<DiskSize>().is_err());
    }

    #[test]
    fn test_disk_size_display() {
        assert_eq!("20G".parse::<DiskSize>().unwrap().to_string(), "20G");
        assert_eq!("10g".parse::<DiskSize>().unwrap().to_string(), "10G");
        assert_eq!("4096".parse::<DiskSize>().unwrap().to_string(), "4096");
    }

    #[test]
    fn test_disk_size_default() {
        assert_eq!(DiskSize::default().to_string(), "20G");
        assert_eq!(DiskSize::default().get_bytes(), 20 * (1 << 30));
    }
}

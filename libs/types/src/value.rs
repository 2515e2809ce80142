//! Unit-suffixed integer values
//!
//! Aleo literals carry their type in a suffix (`500u128`, `1000000u64`).
//! `IntegerValue` keeps the number and its unit together so arithmetic never
//! happens on strings and a value is re-serialized with the suffix it came with.

use crate::error::{Result, ValueError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Unsigned integer units understood by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegerUnit {
    U8,
    U16,
    U32,
    U64,
    U128,
}

impl IntegerUnit {
    /// Literal suffix for this unit
    pub const fn suffix(self) -> &'static str {
        match self {
            IntegerUnit::U8 => "u8",
            IntegerUnit::U16 => "u16",
            IntegerUnit::U32 => "u32",
            IntegerUnit::U64 => "u64",
            IntegerUnit::U128 => "u128",
        }
    }

    /// Largest value representable in this unit
    pub const fn max_value(self) -> u128 {
        match self {
            IntegerUnit::U8 => u8::MAX as u128,
            IntegerUnit::U16 => u16::MAX as u128,
            IntegerUnit::U32 => u32::MAX as u128,
            IntegerUnit::U64 => u64::MAX as u128,
            IntegerUnit::U128 => u128::MAX,
        }
    }

    /// Look up a unit by its literal suffix
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "u8" => Some(IntegerUnit::U8),
            "u16" => Some(IntegerUnit::U16),
            "u32" => Some(IntegerUnit::U32),
            "u64" => Some(IntegerUnit::U64),
            "u128" => Some(IntegerUnit::U128),
            _ => None,
        }
    }
}

impl fmt::Display for IntegerUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A non-negative integer together with its Aleo unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerValue {
    value: u128,
    unit: IntegerUnit,
}

impl IntegerValue {
    /// Create a value, rejecting numbers outside the unit's range
    pub fn new(value: u128, unit: IntegerUnit) -> Result<Self> {
        if value > unit.max_value() {
            return Err(ValueError::OutOfRange { value, unit });
        }
        Ok(Self { value, unit })
    }

    /// Token amounts, reserves and supplies are `u128` on chain
    pub const fn u128(value: u128) -> Self {
        Self {
            value,
            unit: IntegerUnit::U128,
        }
    }

    /// Credits amounts are `u64` on chain
    pub const fn u64(value: u64) -> Self {
        Self {
            value: value as u128,
            unit: IntegerUnit::U64,
        }
    }

    pub const fn value(&self) -> u128 {
        self.value
    }

    pub const fn unit(&self) -> IntegerUnit {
        self.unit
    }
}

impl fmt::Display for IntegerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl FromStr for IntegerValue {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self> {
        let literal = s.trim();
        let split = literal
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| ValueError::InvalidLiteral {
                input: s.to_string(),
            })?;
        let (digits, suffix) = literal.split_at(split);
        if digits.is_empty() {
            return Err(ValueError::InvalidLiteral {
                input: s.to_string(),
            });
        }

        let unit = IntegerUnit::from_suffix(suffix).ok_or_else(|| ValueError::UnknownUnit {
            unit: suffix.to_string(),
        })?;
        // More digits than u128 holds is malformed rather than out of range
        let value = digits.parse::<u128>().map_err(|_| ValueError::InvalidLiteral {
            input: s.to_string(),
        })?;

        Self::new(value, unit)
    }
}

impl Serialize for IntegerValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IntegerValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format_keep_suffix() {
        let value: IntegerValue = "1000u128".parse().unwrap();
        assert_eq!(value.value(), 1000);
        assert_eq!(value.unit(), IntegerUnit::U128);
        assert_eq!(value.to_string(), "1000u128");

        let credits: IntegerValue = "1000000u64".parse().unwrap();
        assert_eq!(credits.unit(), IntegerUnit::U64);
        assert_eq!(credits.to_string(), "1000000u64");
    }

    #[test]
    fn test_rejects_malformed_literals() {
        assert!(matches!(
            "u128".parse::<IntegerValue>(),
            Err(ValueError::InvalidLiteral { .. })
        ));
        assert!(matches!(
            "1000".parse::<IntegerValue>(),
            Err(ValueError::InvalidLiteral { .. })
        ));
        assert!(matches!(
            "1000i64".parse::<IntegerValue>(),
            Err(ValueError::UnknownUnit { .. })
        ));
        assert!(matches!(
            "999999999999999999999999999999999999999999u128".parse::<IntegerValue>(),
            Err(ValueError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_unit_range_is_enforced() {
        assert!(matches!(
            "256u8".parse::<IntegerValue>(),
            Err(ValueError::OutOfRange { value: 256, .. })
        ));
        assert!(IntegerValue::new(255, IntegerUnit::U8).is_ok());
    }

    #[test]
    fn test_serde_uses_literal_form() {
        let json = serde_json::to_string(&IntegerValue::u128(42)).unwrap();
        assert_eq!(json, "\"42u128\"");

        let back: IntegerValue = serde_json::from_str("\"7u64\"").unwrap();
        assert_eq!(back, IntegerValue::u64(7));
    }
}

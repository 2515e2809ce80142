//! # Mapping Value Parser
//!
//! Mapping reads return Aleo plaintext rendered as text, for example
//!
//! ```text
//! {
//!   reserve_a: 1000u128,
//!   reserve_b: 2000u128
//! }
//! ```
//!
//! or a bare literal such as `500u128` for scalar mappings. The parser pulls
//! single named fields out of such blobs without ever failing: anything that
//! does not match the `name: <digits><unit>` shape is reported as absent.
//!
//! [`MappingValueParser::parse`] keeps the zero-on-absent behaviour the web
//! front-end relied on. Prefer [`MappingValueParser::lookup`], which keeps an
//! absent field distinguishable from an on-chain zero.

use crate::value::IntegerValue;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Compiled field patterns keyed by their source; field names come from a small fixed set
static PATTERNS: Lazy<RwLock<HashMap<String, Regex>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Outcome of looking up a numeric field in a mapping value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    /// Field present and well formed
    Present(IntegerValue),
    /// Field missing, malformed, or out of range
    Absent,
}

impl FieldValue {
    pub fn is_present(&self) -> bool {
        matches!(self, FieldValue::Present(_))
    }

    /// Numeric value if present
    pub fn value(&self) -> Option<u128> {
        match self {
            FieldValue::Present(v) => Some(v.value()),
            FieldValue::Absent => None,
        }
    }

    /// Collapse absence into zero
    pub fn or_zero(&self) -> u128 {
        self.value().unwrap_or(0)
    }
}

/// Extracts numeric and text fields from string-encoded mapping values
pub struct MappingValueParser;

impl MappingValueParser {
    /// Numeric field value, or 0 when the field is absent
    ///
    /// Zero here is indistinguishable from a genuine zero on chain; use
    /// [`lookup`](Self::lookup) where the difference matters.
    pub fn parse(raw: &str, field: &str) -> u128 {
        let value = Self::lookup(raw, field);
        if !value.is_present() {
            debug!("Field '{}' absent from mapping value, treating as 0", field);
        }
        value.or_zero()
    }

    /// Look up a numeric field such as `reserve_a: 1000u128`
    pub fn lookup(raw: &str, field: &str) -> FieldValue {
        let Some(pattern) = Self::field_pattern(field, r"(\d+(?:u8|u16|u32|u64|u128))\b") else {
            return FieldValue::Absent;
        };

        let Some(literal) = pattern.captures(raw).and_then(|c| c.get(1)) else {
            return FieldValue::Absent;
        };

        match literal.as_str().parse::<IntegerValue>() {
            Ok(value) => FieldValue::Present(value),
            Err(e) => {
                warn!("Malformed '{}' in mapping value: {}", field, e);
                FieldValue::Absent
            }
        }
    }

    /// Look up a non-numeric field such as `token_id: 123field`
    pub fn lookup_text(raw: &str, field: &str) -> Option<String> {
        let pattern = Self::field_pattern(field, r"([^\s,}]+)")?;
        pattern
            .captures(raw)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Parse a scalar mapping value such as `500u128` (optionally JSON-quoted)
    pub fn parse_scalar(raw: &str) -> FieldValue {
        let literal = raw.trim().trim_matches('"');
        match literal.parse::<IntegerValue>() {
            Ok(value) => FieldValue::Present(value),
            Err(e) => {
                debug!("Scalar mapping value '{}' not parsed: {}", raw, e);
                FieldValue::Absent
            }
        }
    }

    fn field_pattern(field: &str, value_pattern: &str) -> Option<Regex> {
        let source = format!(r"\b{}:\s*{}", regex::escape(field), value_pattern);
        if let Some(pattern) = PATTERNS.read().get(&source) {
            return Some(pattern.clone());
        }
        match Regex::new(&source) {
            Ok(pattern) => {
                PATTERNS.write().insert(source, pattern.clone());
                Some(pattern)
            }
            Err(e) => {
                warn!("Could not build pattern for field '{}': {}", field, e);
                None
            }
        }
    }
}

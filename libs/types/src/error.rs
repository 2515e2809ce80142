//! Error types for value parsing and identifier validation

use crate::value::IntegerUnit;
use thiserror::Error;

/// Result type alias for value operations
pub type Result<T> = std::result::Result<T, ValueError>;

/// Errors raised while parsing typed values, identifiers and mapping records
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Literal does not have the `<digits><unit>` shape
    #[error("Invalid integer literal '{input}' - expected <digits><unit> such as 1000u128")]
    InvalidLiteral { input: String },

    /// Suffix is not one of the supported unsigned units
    #[error("Unknown integer unit '{unit}'")]
    UnknownUnit { unit: String },

    /// Value exceeds the range of its unit
    #[error("Value {value} does not fit in {unit}")]
    OutOfRange { value: u128, unit: IntegerUnit },

    /// Malformed Aleo account address
    #[error("Invalid address '{input}': {reason}")]
    InvalidAddress { input: String, reason: &'static str },

    /// Malformed field element literal
    #[error("Invalid field element '{input}' - expected <digits>field")]
    InvalidField { input: String },

    /// Malformed program identifier
    #[error("Invalid program id '{input}' - expected <name>.aleo")]
    InvalidProgramId { input: String },

    /// Unknown wallet chain name
    #[error("Unknown wallet chain '{input}'")]
    UnknownChain { input: String },

    /// Mapping record is missing a required field
    #[error("{record} record is missing field '{field}'")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },
}

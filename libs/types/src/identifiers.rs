//! # Aleo Identifiers
//!
//! String-backed identifiers validated once at construction so the rest of
//! the client can pass them around without re-checking:
//!
//! - [`Address`]: account address, `aleo1` followed by 58 bech32 characters
//! - [`Field`]: field element literal such as `1234field` (token ids, hashed keys)
//! - [`ProgramId`]: deployed program name such as `token_registry.aleo`
//! - [`WalletChain`]: network name the wallet adapter signs for

use crate::error::{Result, ValueError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ADDRESS_PREFIX: &str = "aleo1";
const ADDRESS_LENGTH: usize = 63;
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const FIELD_SUFFIX: &str = "field";
const PROGRAM_SUFFIX: &str = ".aleo";

/// Maximum number of decimal digits in a field element literal
const FIELD_MAX_DIGITS: usize = 77;

macro_rules! string_identifier {
    ($name:ident) => {
        impl $name {
            /// Wrap a compile-time constant without validation
            ///
            /// Only for literals covered by this crate's tests; runtime input
            /// goes through `FromStr`.
            pub fn from_static(value: &'static str) -> Self {
                Self(value.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueError;

            fn try_from(value: String) -> Result<Self> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

/// Aleo account address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

string_identifier!(Address);

impl FromStr for Address {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason| ValueError::InvalidAddress {
            input: s.to_string(),
            reason,
        };

        let body = s
            .strip_prefix(ADDRESS_PREFIX)
            .ok_or_else(|| invalid("missing aleo1 prefix"))?;
        if s.len() != ADDRESS_LENGTH {
            return Err(invalid("expected 63 characters"));
        }
        if !body.chars().all(|c| BECH32_CHARSET.contains(c)) {
            return Err(invalid("contains non-bech32 characters"));
        }

        Ok(Self(s.to_string()))
    }
}

/// Field element literal (`<digits>field`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Field(String);

string_identifier!(Field);

impl FromStr for Field {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_suffix(FIELD_SUFFIX).unwrap_or_default();
        if digits.is_empty()
            || digits.len() > FIELD_MAX_DIGITS
            || !digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ValueError::InvalidField {
                input: s.to_string(),
            });
        }
        Ok(Self(s.to_string()))
    }
}

/// Deployed program identifier (`<name>.aleo`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProgramId(String);

string_identifier!(ProgramId);

impl ProgramId {
    /// Program name without the `.aleo` network suffix
    pub fn name(&self) -> &str {
        self.0.trim_end_matches(PROGRAM_SUFFIX)
    }
}

impl FromStr for ProgramId {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.strip_suffix(PROGRAM_SUFFIX).unwrap_or_default();
        let valid = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase())
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid {
            return Err(ValueError::InvalidProgramId {
                input: s.to_string(),
            });
        }
        Ok(Self(s.to_string()))
    }
}

/// Network the wallet adapter builds transactions for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletChain {
    Testnet,
    #[default]
    TestnetBeta,
    MainnetBeta,
}

impl WalletChain {
    pub const fn as_str(self) -> &'static str {
        match self {
            WalletChain::Testnet => "testnet",
            WalletChain::TestnetBeta => "testnetbeta",
            WalletChain::MainnetBeta => "mainnetbeta",
        }
    }
}

impl fmt::Display for WalletChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletChain {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "testnet" => Ok(WalletChain::Testnet),
            "testnetbeta" => Ok(WalletChain::TestnetBeta),
            "mainnetbeta" => Ok(WalletChain::MainnetBeta),
            _ => Err(ValueError::UnknownChain {
                input: s.to_string(),
            }),
        }
    }
}

//! Typed views of the DEX and token registry mapping records

use crate::error::{Result, ValueError};
use crate::identifiers::Field;
use crate::parser::MappingValueParser;
use serde::{Deserialize, Serialize};

/// Value of the DEX `pairs` mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRecord {
    pub reserve_a: u128,
    pub reserve_b: u128,
}

impl PairRecord {
    /// Both reserves must be present; a pair record without them is malformed
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self {
            reserve_a: require(raw, "pair", "reserve_a")?,
            reserve_b: require(raw, "pair", "reserve_b")?,
        })
    }
}

/// Value of the token registry `registered_tokens` mapping
///
/// Only the supply is consumed by the client; for an LP token it is the
/// pool's total liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub supply: u128,
}

impl TokenRecord {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self {
            supply: require(raw, "token", "supply")?,
        })
    }
}

/// Value of the token registry `authorized_balances` mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub token_id: Field,
    pub balance: u128,
}

impl BalanceRecord {
    pub fn parse(raw: &str) -> Result<Self> {
        let token_id = MappingValueParser::lookup_text(raw, "token_id").ok_or(
            ValueError::MissingField {
                record: "balance",
                field: "token_id",
            },
        )?;
        Ok(Self {
            token_id: token_id.parse()?,
            balance: require(raw, "balance", "balance")?,
        })
    }
}

/// Immutable snapshot of a pool's reserves and LP supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolReserves {
    pub reserve_a: u128,
    pub reserve_b: u128,
    pub total_supply: u128,
}

impl PoolReserves {
    pub fn new(reserve_a: u128, reserve_b: u128, total_supply: u128) -> Self {
        Self {
            reserve_a,
            reserve_b,
            total_supply,
        }
    }

    pub fn from_records(pair: PairRecord, token: TokenRecord) -> Self {
        Self::new(pair.reserve_a, pair.reserve_b, token.supply)
    }
}

fn require(raw: &str, record: &'static str, field: &'static str) -> Result<u128> {
    MappingValueParser::lookup(raw, field)
        .value()
        .ok_or(ValueError::MissingField { record, field })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_record_parse() {
        let pair = PairRecord::parse("{\n  reserve_a: 1000u128,\n  reserve_b: 2000u128\n}").unwrap();
        assert_eq!(pair, PairRecord { reserve_a: 1000, reserve_b: 2000 });
    }

    #[test]
    fn test_pair_record_requires_both_reserves() {
        assert_eq!(
            PairRecord::parse("{ reserve_a: 1000u128 }"),
            Err(ValueError::MissingField {
                record: "pair",
                field: "reserve_b"
            })
        );
    }

    #[test]
    fn test_token_record_reads_supply() {
        let raw = "{ token_id: 9field, name: 1u128, decimals: 6u8, supply: 500u128, max_supply: 1000u128 }";
        assert_eq!(TokenRecord::parse(raw).unwrap().supply, 500);
    }

    #[test]
    fn test_balance_record_parse() {
        let raw = "{\n  token_id: 4455field,\n  account: aleo1abc,\n  balance: 120u128,\n  authorized_until: 4294967295u32\n}";
        let record = BalanceRecord::parse(raw).unwrap();
        assert_eq!(record.token_id.as_str(), "4455field");
        assert_eq!(record.balance, 120);
    }

    #[test]
    fn test_balance_record_rejects_bad_token_id() {
        assert!(BalanceRecord::parse("{ token_id: nope, balance: 1u128 }").is_err());
    }
}

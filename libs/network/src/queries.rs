//! Typed mapping queries
//!
//! Reads the DEX and registry mappings through a [`MappingReader`] and parses
//! them into `dex-types` records. An unset allowance is a zero allowance; an
//! unset pair or balance is reported as `None` so the caller can tell a
//! missing pool from an empty one.

use crate::error::{NetworkError, Result};
use crate::mapping::MappingReader;
use dex_config::{defaults::mappings, ProgramSettings};
use dex_types::{
    BalanceRecord, Field, FieldValue, MappingValueParser, PairRecord, TokenRecord, ValueError,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Mapping queries bound to the configured programs
#[derive(Clone)]
pub struct MappingQueries {
    reader: Arc<dyn MappingReader>,
    programs: ProgramSettings,
}

impl MappingQueries {
    pub fn new(reader: Arc<dyn MappingReader>, programs: ProgramSettings) -> Self {
        Self { reader, programs }
    }

    pub fn programs(&self) -> &ProgramSettings {
        &self.programs
    }

    /// Approved amount under an `allowances` key, 0 when never approved
    pub async fn allowance(&self, key: &Field) -> Result<u128> {
        let raw = self
            .reader
            .get_mapping_value(&self.programs.token_registry, mappings::ALLOWANCES, key.as_str())
            .await?;

        let Some(raw) = raw else {
            debug!("No allowance under {}, treating as 0", key);
            return Ok(0);
        };

        // Bare `<n>u128`, or a struct carrying an `amount` field
        let amount = match MappingValueParser::parse_scalar(&raw) {
            FieldValue::Present(value) => Some(value.value()),
            FieldValue::Absent => MappingValueParser::lookup(&raw, "amount").value(),
        };

        amount.ok_or_else(|| {
            warn!("Unparseable allowance under {}: {}", key, raw);
            NetworkError::MalformedValue {
                mapping: mappings::ALLOWANCES.to_string(),
                key: key.to_string(),
                source: ValueError::InvalidLiteral { input: raw },
            }
        })
    }

    /// Pair reserves, `None` when the pair was never created
    pub async fn pair(&self, pair_id: &Field) -> Result<Option<PairRecord>> {
        let raw = self
            .reader
            .get_mapping_value(&self.programs.dex, mappings::PAIRS, pair_id.as_str())
            .await?;
        raw.map(|raw| parse_record(mappings::PAIRS, pair_id, &raw, PairRecord::parse))
            .transpose()
    }

    /// Registered token metadata, `None` when not registered
    pub async fn token(&self, token_id: &Field) -> Result<Option<TokenRecord>> {
        let raw = self
            .reader
            .get_mapping_value(
                &self.programs.token_registry,
                mappings::REGISTERED_TOKENS,
                token_id.as_str(),
            )
            .await?;
        raw.map(|raw| parse_record(mappings::REGISTERED_TOKENS, token_id, &raw, TokenRecord::parse))
            .transpose()
    }

    /// Balance under an `authorized_balances` key, `None` when never credited
    pub async fn balance(&self, balance_key: &Field) -> Result<Option<BalanceRecord>> {
        let raw = self
            .reader
            .get_mapping_value(
                &self.programs.token_registry,
                mappings::AUTHORIZED_BALANCES,
                balance_key.as_str(),
            )
            .await?;
        raw.map(|raw| {
            parse_record(mappings::AUTHORIZED_BALANCES, balance_key, &raw, BalanceRecord::parse)
        })
        .transpose()
    }
}

fn parse_record<T>(
    mapping: &str,
    key: &Field,
    raw: &str,
    parse: impl FnOnce(&str) -> dex_types::Result<T>,
) -> Result<T> {
    parse(raw).map_err(|source| {
        warn!("Malformed {} value under {}: {}", mapping, key, source);
        NetworkError::MalformedValue {
            mapping: mapping.to_string(),
            key: key.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryMappingReader;

    fn field(s: &str) -> Field {
        s.parse().unwrap()
    }

    fn setup() -> (Arc<InMemoryMappingReader>, MappingQueries) {
        let reader = Arc::new(InMemoryMappingReader::new());
        let queries = MappingQueries::new(reader.clone(), ProgramSettings::default());
        (reader, queries)
    }

    #[tokio::test]
    async fn test_allowance_absent_is_zero() {
        let (_reader, queries) = setup();
        assert_eq!(queries.allowance(&field("1field")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_allowance_scalar_and_struct() {
        let (reader, queries) = setup();
        let registry = ProgramSettings::default().token_registry;
        reader.insert(&registry, mappings::ALLOWANCES, "1field", "\"750u128\"");
        reader.insert(
            &registry,
            mappings::ALLOWANCES,
            "2field",
            "{ account: aleo1x, spender: aleo1y, amount: 90u128 }",
        );
        reader.insert(&registry, mappings::ALLOWANCES, "3field", "garbage");

        assert_eq!(queries.allowance(&field("1field")).await.unwrap(), 750);
        assert_eq!(queries.allowance(&field("2field")).await.unwrap(), 90);
        assert!(matches!(
            queries.allowance(&field("3field")).await,
            Err(NetworkError::MalformedValue { .. })
        ));
    }

    #[tokio::test]
    async fn test_pair_missing_and_malformed() {
        let (reader, queries) = setup();
        let dex = ProgramSettings::default().dex;

        assert_eq!(queries.pair(&field("9field")).await.unwrap(), None);

        reader.insert(&dex, mappings::PAIRS, "9field", "{ reserve_a: 1000u128 }");
        assert!(matches!(
            queries.pair(&field("9field")).await,
            Err(NetworkError::MalformedValue { .. })
        ));

        reader.insert(
            &dex,
            mappings::PAIRS,
            "9field",
            "{\n  reserve_a: 1000u128,\n  reserve_b: 2000u128\n}",
        );
        let pair = queries.pair(&field("9field")).await.unwrap().unwrap();
        assert_eq!((pair.reserve_a, pair.reserve_b), (1000, 2000));
    }

    #[tokio::test]
    async fn test_token_and_balance() {
        let (reader, queries) = setup();
        let registry = ProgramSettings::default().token_registry;
        reader.insert(
            &registry,
            mappings::REGISTERED_TOKENS,
            "9field",
            "{ token_id: 9field, name: 1u128, supply: 500u128, decimals: 6u8 }",
        );
        reader.insert(
            &registry,
            mappings::AUTHORIZED_BALANCES,
            "77field",
            "{ account: aleo1x, token_id: 9field, balance: 120u128, authorized_until: 4294967295u32 }",
        );

        assert_eq!(queries.token(&field("9field")).await.unwrap().unwrap().supply, 500);
        let balance = queries.balance(&field("77field")).await.unwrap().unwrap();
        assert_eq!(balance.balance, 120);
        assert_eq!(balance.token_id, field("9field"));
        assert_eq!(queries.balance(&field("78field")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let (reader, queries) = setup();
        reader.fail_mapping(mappings::PAIRS);
        assert!(matches!(
            queries.pair(&field("9field")).await,
            Err(NetworkError::MappingFetchFailed { .. })
        ));
    }
}

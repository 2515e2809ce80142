//! Explorer API mapping reader
//!
//! `GET {endpoint}/{network}/program/{program}/mapping/{mapping}/{key}` returns
//! the value as a JSON string, or JSON `null` for an unset key.

use crate::error::{NetworkError, Result};
use crate::mapping::MappingReader;
use async_trait::async_trait;
use dex_config::NetworkSettings;
use dex_types::ProgramId;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Idle connections are kept for the length of a typical form session
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// HTTP implementation of [`MappingReader`]
#[derive(Debug, Clone)]
pub struct HttpMappingReader {
    client: reqwest::Client,
    base: String,
}

impl HttpMappingReader {
    /// Create a reader for the configured endpoint and network
    pub fn new(settings: &NetworkSettings) -> Result<Self> {
        let endpoint = settings.endpoint.trim_end_matches('/');
        Url::parse(endpoint).map_err(|e| {
            NetworkError::configuration(format!("invalid endpoint '{}': {}", endpoint, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .build()
            .map_err(|e| NetworkError::configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base: format!("{}/{}", endpoint, settings.network),
        })
    }

    /// Full request URL for one mapping lookup
    pub fn mapping_url(&self, program: &ProgramId, mapping: &str, key: &str) -> Result<Url> {
        let raw = format!("{}/program/{}/mapping/{}/{}", self.base, program, mapping, key);
        Url::parse(&raw).map_err(|e| {
            NetworkError::mapping_fetch_with_source(program.as_str(), mapping, key, "invalid URL", e)
        })
    }
}

#[async_trait]
impl MappingReader for HttpMappingReader {
    async fn get_mapping_value(
        &self,
        program: &ProgramId,
        mapping: &str,
        key: &str,
    ) -> Result<Option<String>> {
        let url = self.mapping_url(program, mapping, key)?;
        debug!("GET {}", url);

        let fail = |message: &str, e: reqwest::Error| {
            warn!("Mapping read {}/{}/{} failed: {}", program, mapping, key, e);
            NetworkError::mapping_fetch_with_source(program.as_str(), mapping, key, message, e)
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fail("request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Mapping read {}/{}/{} returned {}", program, mapping, key, status);
            return Err(NetworkError::mapping_fetch(
                program.as_str(),
                mapping,
                key,
                format!("HTTP status {}", status),
            ));
        }

        let value: Option<String> = response
            .json()
            .await
            .map_err(|e| fail("response is not a JSON string or null", e))?;

        debug!(
            "{}/{}/{} -> {}",
            program,
            mapping,
            key,
            value.as_deref().unwrap_or("null")
        );
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(endpoint: &str) -> NetworkSettings {
        NetworkSettings {
            endpoint: endpoint.to_string(),
            ..NetworkSettings::default()
        }
    }

    #[test]
    fn test_mapping_url_layout() {
        let reader = HttpMappingReader::new(&settings("https://api.example.org/v1/")).unwrap();
        let program: ProgramId = "test_swap_15.aleo".parse().unwrap();

        let url = reader.mapping_url(&program, "pairs", "42field").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.org/v1/testnet/program/test_swap_15.aleo/mapping/pairs/42field"
        );
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        let err = HttpMappingReader::new(&settings("not a url")).unwrap_err();
        assert!(matches!(err, NetworkError::Configuration { .. }));
    }
}

//! Mapping read abstraction
//!
//! Every on-chain read the client makes is a single `(program, mapping, key)`
//! lookup returning the raw value string, or `None` when the key has never
//! been written.

use crate::error::Result;
use async_trait::async_trait;
use dex_types::ProgramId;
use std::sync::Arc;

/// Source of program mapping values
#[async_trait]
pub trait MappingReader: Send + Sync {
    /// Fetch the raw value stored under `key`, `None` when absent
    async fn get_mapping_value(
        &self,
        program: &ProgramId,
        mapping: &str,
        key: &str,
    ) -> Result<Option<String>>;
}

#[async_trait]
impl<T: MappingReader + ?Sized> MappingReader for Arc<T> {
    async fn get_mapping_value(
        &self,
        program: &ProgramId,
        mapping: &str,
        key: &str,
    ) -> Result<Option<String>> {
        (**self).get_mapping_value(program, mapping, key).await
    }
}

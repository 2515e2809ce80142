//! In-memory mapping reader
//!
//! Serves values from a table instead of the network. Used by tests and by
//! offline runs; reads can be made to fail per mapping and are counted so
//! tests can assert on fetch behaviour.

use crate::error::{NetworkError, Result};
use crate::mapping::MappingReader;
use async_trait::async_trait;
use dex_types::ProgramId;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

type MappingKey = (String, String, String);

/// Table-backed [`MappingReader`]
#[derive(Debug, Default)]
pub struct InMemoryMappingReader {
    values: RwLock<HashMap<MappingKey, String>>,
    failing: RwLock<HashSet<String>>,
    reads: AtomicUsize,
}

impl InMemoryMappingReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous one
    pub fn insert(&self, program: &ProgramId, mapping: &str, key: &str, value: impl Into<String>) {
        self.values.write().insert(
            (program.to_string(), mapping.to_string(), key.to_string()),
            value.into(),
        );
    }

    pub fn remove(&self, program: &ProgramId, mapping: &str, key: &str) {
        self.values
            .write()
            .remove(&(program.to_string(), mapping.to_string(), key.to_string()));
    }

    /// Make every read of `mapping` fail until [`Self::clear_failures`]
    pub fn fail_mapping(&self, mapping: &str) {
        self.failing.write().insert(mapping.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing.write().clear();
    }

    /// Number of reads served so far, failed ones included
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MappingReader for InMemoryMappingReader {
    async fn get_mapping_value(
        &self,
        program: &ProgramId,
        mapping: &str,
        key: &str,
    ) -> Result<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        if self.failing.read().contains(mapping) {
            return Err(NetworkError::mapping_fetch(
                program.as_str(),
                mapping,
                key,
                "injected failure",
            ));
        }

        let value = self
            .values
            .read()
            .get(&(program.to_string(), mapping.to_string(), key.to_string()))
            .cloned();
        debug!("memory {}/{}/{} -> {:?}", program, mapping, key, value);
        Ok(value)
    }
}

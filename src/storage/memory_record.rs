use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use super::{RecordStore, UrlRecord};
use crate::core::error::{RecordError, RecordResult};

/// 内存记录存储，按 id 有序保存，便于取最大 id
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<BTreeMap<i64, UrlRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.records.read().keys().copied().collect()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn max_id(&self) -> RecordResult<Option<i64>> {
        Ok(self.records.read().keys().next_back().copied())
    }

    async fn insert(&self, record: &UrlRecord) -> RecordResult<()> {
        match self.records.write().entry(record.id) {
            Entry::Occupied(_) => Err(RecordError::UniquenessViolation(record.id)),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: i64) -> RecordResult<Option<UrlRecord>> {
        Ok(self.records.read().get(&id).cloned())
    }
}

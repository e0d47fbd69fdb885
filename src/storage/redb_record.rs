use async_trait::async_trait;
use redb::{Database, ReadableTable};
use std::path::Path;
use std::sync::Arc;

use super::redb_types::{open_database, URL_RECORDS_TABLE};
use super::{RecordStore, UrlRecord};
use crate::core::error::{RecordError, RecordResult};

/// 基于 redb 的记录存储，值为 JSON 编码的 `UrlRecord`
pub struct RedbRecordStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for RedbRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbRecordStore").finish()
    }
}

impl RedbRecordStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> RecordResult<Self> {
        let db = open_database(path).map_err(|e| RecordError::Backend(e.to_string()))?;
        Ok(Self::new(db))
    }

    fn max_id_blocking(db: &Database) -> RecordResult<Option<i64>> {
        let read_txn = db
            .begin_read()
            .map_err(|e| RecordError::Backend(e.to_string()))?;
        let table = read_txn
            .open_table(URL_RECORDS_TABLE)
            .map_err(|e| RecordError::Backend(e.to_string()))?;

        let last = table
            .last()
            .map_err(|e| RecordError::Backend(e.to_string()))?
            .map(|(key, _)| key.value());
        Ok(last)
    }

    fn insert_blocking(db: &Database, id: i64, bytes: &[u8]) -> RecordResult<()> {
        let write_txn = db
            .begin_write()
            .map_err(|e| RecordError::Backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(URL_RECORDS_TABLE)
                .map_err(|e| RecordError::Backend(e.to_string()))?;

            // 唯一性检查与写入在同一个写事务内完成
            let exists = table
                .get(id)
                .map_err(|e| RecordError::Backend(e.to_string()))?
                .is_some();
            if exists {
                return Err(RecordError::UniquenessViolation(id));
            }

            table
                .insert(id, bytes)
                .map_err(|e| RecordError::Backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| RecordError::Backend(e.to_string()))?;
        Ok(())
    }

    fn get_blocking(db: &Database, id: i64) -> RecordResult<Option<UrlRecord>> {
        let read_txn = db
            .begin_read()
            .map_err(|e| RecordError::Backend(e.to_string()))?;
        let table = read_txn
            .open_table(URL_RECORDS_TABLE)
            .map_err(|e| RecordError::Backend(e.to_string()))?;

        match table
            .get(id)
            .map_err(|e| RecordError::Backend(e.to_string()))?
        {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RecordStore for RedbRecordStore {
    async fn max_id(&self) -> RecordResult<Option<i64>> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || Self::max_id_blocking(&db)).await?
    }

    async fn insert(&self, record: &UrlRecord) -> RecordResult<()> {
        let bytes = serde_json::to_vec(record)?;
        let id = record.id;
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || Self::insert_blocking(&db, id, &bytes)).await?
    }

    async fn get(&self, id: i64) -> RecordResult<Option<UrlRecord>> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || Self::get_blocking(&db, id)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_redb_record_insert_get_and_max() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = RedbRecordStore::open(dir.path().join("records.redb")).expect("open");

        assert_eq!(store.max_id().await.expect("max"), None);

        let record = UrlRecord::new(4532, "https://example.com/page").expect("valid id");
        store.insert(&record).await.expect("insert");
        store
            .insert(&UrlRecord::new(12, "https://example.com/other").expect("valid id"))
            .await
            .expect("insert");

        assert_eq!(store.max_id().await.expect("max"), Some(4532));
        assert_eq!(store.get(4532).await.expect("get"), Some(record));
        assert_eq!(store.get(1).await.expect("get"), None);
    }

    #[tokio::test]
    async fn test_redb_record_rejects_duplicate_key() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = RedbRecordStore::open(dir.path().join("records.redb")).expect("open");

        store
            .insert(&UrlRecord::new(1, "https://example.com/a").expect("valid id"))
            .await
            .expect("insert");
        let err = store
            .insert(&UrlRecord::new(1, "https://example.com/b").expect("valid id"))
            .await
            .expect_err("duplicate");
        assert!(err.is_uniqueness_violation());

        let kept = store.get(1).await.expect("get").expect("present");
        assert_eq!(kept.long_url, "https://example.com/a");
    }
}

use async_trait::async_trait;
use redb::{Database, ReadableTable};
use std::path::Path;
use std::sync::Arc;

use super::redb_types::{open_database, COUNTERS_TABLE};
use super::CounterStore;
use crate::core::error::{CounterError, CounterResult};

/// 基于 redb 的计数器存储
///
/// 每次递增是一个独立的写事务；redb 同一时刻只允许一个写事务，
/// 因此读-加-写在事务内是原子的。
pub struct RedbCounterStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for RedbCounterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbCounterStore").finish()
    }
}

impl RedbCounterStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> CounterResult<Self> {
        let db = open_database(path).map_err(|e| CounterError::Backend(e.to_string()))?;
        Ok(Self::new(db))
    }

    /// 读取计数器当前值，不存在时返回 None
    pub fn get(&self, name: &str) -> CounterResult<Option<i64>> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| CounterError::Backend(e.to_string()))?;
        let table = read_txn
            .open_table(COUNTERS_TABLE)
            .map_err(|e| CounterError::Backend(e.to_string()))?;

        let value = table
            .get(name)
            .map_err(|e| CounterError::Backend(e.to_string()))?
            .map(|v| v.value());
        Ok(value)
    }

    fn increment_blocking(db: &Database, name: &str, amount: i64) -> CounterResult<i64> {
        let write_txn = db
            .begin_write()
            .map_err(|e| CounterError::Backend(e.to_string()))?;

        let new_total = {
            let mut table = write_txn
                .open_table(COUNTERS_TABLE)
                .map_err(|e| CounterError::Backend(e.to_string()))?;

            let current = table
                .get(name)
                .map_err(|e| CounterError::Backend(e.to_string()))?
                .map(|v| v.value())
                .unwrap_or(0);

            // 溢出时直接返回，未提交的写事务在 drop 时回滚
            let new_total = current
                .checked_add(amount)
                .ok_or_else(|| CounterError::Overflow {
                    name: name.to_string(),
                    amount,
                })?;

            table
                .insert(name, new_total)
                .map_err(|e| CounterError::Backend(e.to_string()))?;

            new_total
        };

        write_txn
            .commit()
            .map_err(|e| CounterError::Backend(e.to_string()))?;

        Ok(new_total)
    }
}

#[async_trait]
impl CounterStore for RedbCounterStore {
    async fn increment(&self, name: &str, amount: i64) -> CounterResult<i64> {
        if amount < 0 {
            return Err(CounterError::InvalidAmount(amount));
        }

        let db = Arc::clone(&self.db);
        let name = name.to_string();
        tokio::task::spawn_blocking(move || Self::increment_blocking(&db, &name, amount)).await?
    }
}

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use super::CounterStore;
use crate::core::error::{CounterError, CounterResult};

/// 进程内计数器存储
///
/// 每个命名计数器是一个 `AtomicI64`，对持有该存储的所有任务递增都是可线性化的。
/// 通过 `Arc` 共享即可模拟多个分配器进程使用同一个计数器服务。
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    counters: DashMap<String, AtomicI64>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `name` 的当前总数，从未使用过时返回 None
    pub fn get(&self, name: &str) -> Option<i64> {
        self.counters.get(name).map(|c| c.load(Ordering::SeqCst))
    }

    /// 覆盖计数器的值，例如模拟从旧快照恢复的计数器服务
    pub fn set(&self, name: &str, value: i64) {
        self.counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicI64::new(0))
            .store(value, Ordering::SeqCst);
    }

    fn add(counter: &AtomicI64, name: &str, amount: i64) -> CounterResult<i64> {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_add(amount))
            .map(|previous| previous + amount)
            .map_err(|_| CounterError::Overflow {
                name: name.to_string(),
                amount,
            })
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self, name: &str, amount: i64) -> CounterResult<i64> {
        if amount < 0 {
            return Err(CounterError::InvalidAmount(amount));
        }

        if let Some(counter) = self.counters.get(name) {
            return Self::add(&counter, name, amount);
        }

        let counter = self
            .counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicI64::new(0));
        Self::add(&counter, name, amount)
    }
}

//! 集成测试共享工具模块
//!
//! 提供可控的计数器/记录存储替身和临时 redb 数据库，供所有集成测试使用

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use seqalloc::core::error::{CounterError, CounterResult, RecordError, RecordResult};
use seqalloc::sequence::BatchSize;
use seqalloc::storage::{MemoryCounterStore, MemoryRecordStore};
use seqalloc::{CounterStore, RecordStore, SequenceAllocator, UrlRecord, UrlShortener};

pub const COUNTER: &str = "short-url-counter";

/// 可控计数器：统计调用次数，可切换为失败或永久挂起，可注入延迟
#[derive(Debug, Default)]
pub struct ControlledCounter {
    pub inner: MemoryCounterStore,
    calls: AtomicUsize,
    fail: AtomicBool,
    hang: AtomicBool,
    delay: Option<Duration>,
}

impl ControlledCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每次调用前等待 `delay`，用于让并发调用方在闸门前排队
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_hanging(&self, hang: bool) {
        self.hang.store(hang, Ordering::SeqCst);
    }

    pub fn total(&self) -> i64 {
        self.inner.get(COUNTER).unwrap_or(0)
    }
}

#[async_trait]
impl CounterStore for ControlledCounter {
    async fn increment(&self, name: &str, amount: i64) -> CounterResult<i64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(CounterError::Connection("connection refused".to_string()));
        }
        self.inner.increment(name, amount).await
    }
}

/// 每次插入都报告唯一键冲突的记录存储
#[derive(Debug)]
pub struct AlwaysConflictingStore {
    pub max_id: i64,
    cache_clears: AtomicUsize,
}

impl AlwaysConflictingStore {
    pub fn new(max_id: i64) -> Self {
        Self {
            max_id,
            cache_clears: AtomicUsize::new(0),
        }
    }

    pub fn cache_clears(&self) -> usize {
        self.cache_clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for AlwaysConflictingStore {
    async fn max_id(&self) -> RecordResult<Option<i64>> {
        Ok(Some(self.max_id))
    }

    async fn insert(&self, record: &UrlRecord) -> RecordResult<()> {
        Err(RecordError::UniquenessViolation(record.id))
    }

    async fn get(&self, _id: i64) -> RecordResult<Option<UrlRecord>> {
        Ok(None)
    }

    fn clear_cache(&self) {
        self.cache_clears.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn batch(size: i64) -> BatchSize {
    BatchSize::new(size).expect("batch size must be positive")
}

pub fn allocator<C: CounterStore>(counter: C, size: i64) -> SequenceAllocator<C> {
    SequenceAllocator::new(counter, COUNTER, batch(size))
}

pub fn memory_shortener(
    counter: Arc<ControlledCounter>,
    records: Arc<MemoryRecordStore>,
    size: i64,
) -> UrlShortener<Arc<ControlledCounter>, MemoryRecordStore> {
    UrlShortener::new(Arc::new(allocator(counter, size)), records)
}

/// 断言 id 全部互不相同，返回去重后的集合
pub fn assert_all_distinct(ids: &[i64]) -> BTreeSet<i64> {
    let unique: BTreeSet<i64> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len(), "发现重复 id");
    unique
}

/// 测试数据库路径包装器
///
/// 每个测试使用独立的临时目录，结束后自动清理
pub struct TestDatabase {
    dir: tempfile::TempDir,
}

impl TestDatabase {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("seqalloc.redb")
    }
}

use chrono::Utc;
use log::{error, info, warn};
use std::sync::Arc;

use crate::core::error::{RecordError, ShortenError, ShortenResult};
use crate::sequence::SequenceAllocator;
use crate::storage::{CounterStore, RecordStore, UrlRecord};
use crate::utils::base62;

/// 短链接创建与持久化流程
///
/// id 来自共享的 [`SequenceAllocator`]。插入时发生唯一键冲突说明记录存储领先于计数器，
/// 此时按存储中真实的最大 id 重新同步分配器，并且只再尝试一次；
/// 第二次冲突直接报告，不再重试。
pub struct UrlShortener<C, R> {
    allocator: Arc<SequenceAllocator<C>>,
    records: Arc<R>,
}

impl<C, R> Clone for UrlShortener<C, R> {
    fn clone(&self) -> Self {
        Self {
            allocator: Arc::clone(&self.allocator),
            records: Arc::clone(&self.records),
        }
    }
}

impl<C: CounterStore, R: RecordStore> UrlShortener<C, R> {
    pub fn new(allocator: Arc<SequenceAllocator<C>>, records: Arc<R>) -> Self {
        Self { allocator, records }
    }

    pub fn allocator(&self) -> &SequenceAllocator<C> {
        &self.allocator
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    pub async fn create_short_url(&self, long_url: &str) -> ShortenResult<UrlRecord> {
        let long_url = validate_long_url(long_url)?;

        let first = match self.allocate_and_insert(long_url).await? {
            Ok(record) => return Ok(record),
            Err(conflicting_id) => conflicting_id,
        };

        warn!(
            "id {} 已被持久化，重新同步计数器 '{}'",
            first,
            self.allocator.counter_name()
        );
        self.resynchronize().await?;

        match self.allocate_and_insert(long_url).await? {
            Ok(record) => Ok(record),
            Err(second) => {
                error!(
                    "重新同步后 id {} 再次冲突（首次 {}），计数器 '{}' 需要人工介入",
                    second,
                    first,
                    self.allocator.counter_name()
                );
                Err(ShortenError::RepeatedUniquenessViolation { first, second })
            }
        }
    }

    /// 按记录存储的最大 id 重新对齐分配器
    ///
    /// 返回新预留区间的第一个 id
    pub async fn resynchronize(&self) -> ShortenResult<i64> {
        self.records.clear_cache();
        let persisted_max_id = self.records.max_id().await?.unwrap_or(0);
        let start = self.allocator.resynchronize(persisted_max_id).await?;
        info!(
            "计数器 '{}' 从 {} 继续（持久化最大 id {}）",
            self.allocator.counter_name(),
            start,
            persisted_max_id
        );
        Ok(start)
    }

    /// 按短码查找未过期的记录
    pub async fn resolve(&self, short_code: &str) -> ShortenResult<Option<UrlRecord>> {
        let id = base62::decode(short_code)
            .ok_or_else(|| ShortenError::InvalidCode(short_code.to_string()))?;

        let record = self.records.get(id).await?;
        Ok(record.filter(|r| r.short_code == short_code && !r.is_expired_at(Utc::now())))
    }

    /// `id` 因已被持久化而被拒绝时返回 `Ok(Err(id))`
    async fn allocate_and_insert(&self, long_url: &str) -> ShortenResult<Result<UrlRecord, i64>> {
        let id = self.allocator.next_id().await?;
        let record = UrlRecord::new(id, long_url)?;

        match self.records.insert(&record).await {
            Ok(()) => Ok(Ok(record)),
            Err(RecordError::UniquenessViolation(id)) => Ok(Err(id)),
            Err(e) => Err(e.into()),
        }
    }
}

fn validate_long_url(long_url: &str) -> ShortenResult<&str> {
    let trimmed = long_url.trim();
    if trimmed.is_empty() {
        return Err(ShortenError::InvalidUrl("长链接不能为空".to_string()));
    }
    if trimmed.chars().count() > UrlRecord::MAX_LONG_URL_LEN {
        return Err(ShortenError::InvalidUrl(format!(
            "长链接不能超过 {} 个字符",
            UrlRecord::MAX_LONG_URL_LEN
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::BatchSize;
    use crate::storage::{MemoryCounterStore, MemoryRecordStore};

    fn shortener(batch: i64) -> UrlShortener<MemoryCounterStore, MemoryRecordStore> {
        let allocator = SequenceAllocator::new(
            MemoryCounterStore::new(),
            "short-url-counter",
            BatchSize::new(batch).expect("positive batch"),
        );
        UrlShortener::new(Arc::new(allocator), Arc::new(MemoryRecordStore::new()))
    }

    #[test]
    fn test_validate_long_url() {
        assert_eq!(validate_long_url("  https://a.b  "), Ok("https://a.b"));
        assert!(matches!(validate_long_url("   "), Err(ShortenError::InvalidUrl(_))));

        let too_long = format!("https://example.com/{}", "a".repeat(2048));
        assert!(matches!(validate_long_url(&too_long), Err(ShortenError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_create_and_resolve() {
        let service = shortener(10);
        let record = service
            .create_short_url("https://example.com/docs")
            .await
            .expect("create");

        assert_eq!(record.id, 1);
        assert_eq!(record.short_code, "1");

        let resolved = service.resolve("1").await.expect("resolve").expect("found");
        assert_eq!(resolved.long_url, "https://example.com/docs");
        assert_eq!(service.resolve("2").await.expect("resolve"), None);
        // "01" 解码后同样是 1，但不是签发过的短码
        assert_eq!(service.resolve("01").await.expect("resolve"), None);
        assert!(matches!(
            service.resolve("bad!").await,
            Err(ShortenError::InvalidCode(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_url_does_not_consume_an_id() {
        let service = shortener(10);
        assert!(service.create_short_url("").await.is_err());
        assert_eq!(service.allocator().snapshot().end, -1);
    }
}

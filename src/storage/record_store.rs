use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::error::{RecordError, RecordResult};
use crate::utils::base62;

/// 短链接记录，主键为分配器返回的 id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub id: i64,
    pub short_code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl UrlRecord {
    /// 长链接的最大长度
    pub const MAX_LONG_URL_LEN: usize = 2048;
    /// 记录有效期（天）
    pub const TTL_DAYS: i64 = 7;

    /// 用分配好的 id 构造记录，短码为 id 的 base62 编码
    ///
    /// 负数 id 没有短码，返回 `RecordError::InvalidId`
    pub fn new(id: i64, long_url: impl Into<String>) -> RecordResult<Self> {
        let short_code = base62::encode(id).ok_or(RecordError::InvalidId(id))?;
        let created_at = Utc::now();
        Ok(Self {
            id,
            short_code,
            long_url: long_url.into(),
            created_at,
            expires_at: created_at + Duration::days(Self::TTL_DAYS),
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// 持久化记录存储（系统记录源）
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 当前已持久化的最大 id，存储为空时返回 None
    async fn max_id(&self) -> RecordResult<Option<i64>>;

    /// 以 `record.id` 为唯一键持久化记录
    ///
    /// 键已存在时返回 `RecordError::UniquenessViolation`，且不修改已有记录
    async fn insert(&self, record: &UrlRecord) -> RecordResult<()>;

    async fn get(&self, id: i64) -> RecordResult<Option<UrlRecord>>;

    /// 丢弃调用方持有的缓存视图，使下一次 `max_id` 读取真实状态
    fn clear_cache(&self) {}
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn max_id(&self) -> RecordResult<Option<i64>> {
        (**self).max_id().await
    }

    async fn insert(&self, record: &UrlRecord) -> RecordResult<()> {
        (**self).insert(record).await
    }

    async fn get(&self, id: i64) -> RecordResult<Option<UrlRecord>> {
        (**self).get(id).await
    }

    fn clear_cache(&self) {
        (**self).clear_cache()
    }
}

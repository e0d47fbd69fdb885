use async_trait::async_trait;
use std::sync::Arc;

use crate::core::error::CounterResult;

/// 共享原子计数器
///
/// `increment` 对共享同一 `name` 的所有调用方（包括其他进程）必须是原子且可线性化的：
/// 两次并发调用不会得到相同的新总数。超时与连接重试由实现自行处理，
/// 见 [`GuardedCounterStore`](super::GuardedCounterStore)。
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// 原子地给 `name` 加上 `amount` 并返回新总数
    ///
    /// 不存在的计数器从 0 开始；`amount` 必须非负，为 0 时相当于读取当前值
    async fn increment(&self, name: &str, amount: i64) -> CounterResult<i64>;
}

#[async_trait]
impl<T: CounterStore + ?Sized> CounterStore for Arc<T> {
    async fn increment(&self, name: &str, amount: i64) -> CounterResult<i64> {
        (**self).increment(name, amount).await
    }
}

use async_trait::async_trait;
use std::time::Duration;

use super::CounterStore;
use crate::config::CounterConfig;
use crate::core::error::{CounterError, CounterResult};
use crate::utils::retry::{retry_with_backoff, RetryConfig};

/// 计数器存储的传输策略：每次尝试的超时，加上对瞬时故障的连接重试
///
/// 若被重试的递增其实已经到达存储，只会浪费一段 id（之前的区间不会被分配）；
/// 每次生效的递增都预留互不相交的区间，所以不会产生重复。
#[derive(Debug)]
pub struct GuardedCounterStore<C> {
    inner: C,
    timeout: Duration,
    retry: RetryConfig,
}

impl<C: CounterStore> GuardedCounterStore<C> {
    pub fn new(inner: C, timeout: Duration, retry: RetryConfig) -> Self {
        Self {
            inner,
            timeout,
            retry,
        }
    }

    pub fn from_config(inner: C, config: &CounterConfig) -> Self {
        Self::new(inner, config.timeout(), config.retry_config())
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    async fn attempt(&self, name: &str, amount: i64) -> CounterResult<i64> {
        match tokio::time::timeout(self.timeout, self.inner.increment(name, amount)).await {
            Ok(result) => result,
            Err(_) => Err(CounterError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl<C: CounterStore> CounterStore for GuardedCounterStore<C> {
    async fn increment(&self, name: &str, amount: i64) -> CounterResult<i64> {
        retry_with_backoff(&self.retry, CounterError::is_retryable, move || {
            self.attempt(name, amount)
        })
        .await
    }
}

//! 重试机制
//!
//! 提供可配置的重试策略和指数退避算法，供传输层（计数器存储适配器）使用。
//! 序列分配器本身从不重试。

use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStrategy {
    Fixed,
    Linear,
    Exponential,
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub strategy: RetryStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 50,
            max_delay_ms: 1000,
            backoff_multiplier: 2.0,
            strategy: RetryStrategy::Exponential,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 不做任何重试，只执行一次
    pub fn no_retry() -> Self {
        Self::default().with_max_attempts(1)
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    fn next_delay(&self, delay: u64) -> u64 {
        match self.strategy {
            RetryStrategy::Fixed => self.initial_delay_ms,
            RetryStrategy::Linear => delay.saturating_add(self.initial_delay_ms),
            RetryStrategy::Exponential => (delay as f64 * self.backoff_multiplier) as u64,
        }
    }
}

/// 按配置重试异步操作
///
/// 只有 `is_retryable` 返回 true 的错误才会触发重试，其余错误立即返回。
/// 两次尝试之间使用 `tokio::time::sleep` 退避，不阻塞运行时线程。
pub async fn retry_with_backoff<F, Fut, T, E, P>(
    config: &RetryConfig,
    is_retryable: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let attempts = config.max_attempts.max(1);
    let mut delay = config.initial_delay_ms;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt >= attempts || !is_retryable(&e) {
                    return Err(e);
                }

                let sleep_time = delay.min(config.max_delay_ms);
                log::debug!("第 {} 次尝试失败，{}ms 后重试", attempt, sleep_time);
                tokio::time::sleep(Duration::from_millis(sleep_time)).await;

                delay = config.next_delay(delay);
                attempt += 1;
            }
        }
    }
}

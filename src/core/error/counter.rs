//! 计数器存储错误类型
//!
//! 涵盖对共享原子计数器的调用失败（超时、连接中断、后端异常）

use std::time::Duration;
use thiserror::Error;

use crate::core::error::codes::{ErrorCode, ToPublicError};

/// 计数器存储结果类型
pub type CounterResult<T> = Result<T, CounterError>;

/// 计数器存储错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CounterError {
    #[error("计数器调用超时: {0:?}")]
    Timeout(Duration),
    #[error("计数器连接错误: {0}")]
    Connection(String),
    #[error("计数器调用已取消")]
    Cancelled,
    #[error("计数器后端错误: {0}")]
    Backend(String),
    #[error("无效的增量: {0}，计数器只能单调递增")]
    InvalidAmount(i64),
    #[error("计数器溢出: {name} += {amount}")]
    Overflow { name: String, amount: i64 },
}

impl CounterError {
    /// 超时和连接错误属于瞬时故障，可以由调用方重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, CounterError::Timeout(_) | CounterError::Connection(_))
    }
}

impl ToPublicError for CounterError {
    fn to_error_code(&self) -> ErrorCode {
        match self {
            CounterError::Timeout(_) => ErrorCode::Timeout,
            CounterError::Connection(_) => ErrorCode::ResourceUnavailable,
            CounterError::Cancelled => ErrorCode::Cancelled,
            CounterError::InvalidAmount(_) => ErrorCode::InvalidInput,
            CounterError::Overflow { .. } => ErrorCode::ResourceExhausted,
            CounterError::Backend(_) => ErrorCode::InternalError,
        }
    }

    fn to_public_message(&self) -> String {
        match self {
            CounterError::Backend(_) => "计数器操作失败".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for CounterError {
    fn from(e: tokio::task::JoinError) -> Self {
        if e.is_cancelled() {
            CounterError::Cancelled
        } else {
            CounterError::Backend(e.to_string())
        }
    }
}

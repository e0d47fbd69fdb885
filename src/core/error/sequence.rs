//! 序列分配器错误类型

use thiserror::Error;

use crate::core::error::codes::{ErrorCode, ToPublicError};
use crate::core::error::counter::CounterError;

/// 序列分配结果类型
pub type SeqResult<T> = Result<T, SeqError>;

/// 序列分配器错误类型
///
/// 计数器调用失败原样透传，分配器自身不做重试
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeqError {
    #[error(transparent)]
    Counter(#[from] CounterError),
    #[error("无效的批大小: {0}，必须为正整数")]
    InvalidBatchSize(i64),
    #[error("无效的持久化最大ID: {0}")]
    NegativeMaxId(i64),
    #[error("序列空间溢出: {0}")]
    Overflow(i64),
    /// 连续两次递增后计数器仍低于目标，说明计数器发生了回退
    #[error("计数器返回 {reported}，低于对账目标 {target}")]
    CounterRegressed { reported: i64, target: i64 },
}

impl SeqError {
    pub fn is_retryable(&self) -> bool {
        match self {
            SeqError::Counter(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl ToPublicError for SeqError {
    fn to_error_code(&self) -> ErrorCode {
        match self {
            SeqError::Counter(e) => e.to_error_code(),
            SeqError::InvalidBatchSize(_) => ErrorCode::InvalidConfiguration,
            SeqError::NegativeMaxId(_) => ErrorCode::InvalidInput,
            SeqError::Overflow(_) => ErrorCode::ResourceExhausted,
            SeqError::CounterRegressed { .. } => ErrorCode::DataDrift,
        }
    }

    fn to_public_message(&self) -> String {
        match self {
            SeqError::Counter(e) => e.to_public_message(),
            _ => self.to_string(),
        }
    }
}

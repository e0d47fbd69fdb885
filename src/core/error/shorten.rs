//! 短链接创建流程错误类型

use thiserror::Error;

use crate::core::error::codes::{ErrorCode, ToPublicError};
use crate::core::error::record::RecordError;
use crate::core::error::sequence::SeqError;

/// 短链接流程结果类型
pub type ShortenResult<T> = Result<T, ShortenError>;

/// 短链接流程错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortenError {
    #[error("无效的长链接: {0}")]
    InvalidUrl(String),
    #[error("无效的短码: {0}")]
    InvalidCode(String),
    #[error("序列分配失败: {0}")]
    Sequence(#[from] SeqError),
    #[error("记录存储失败: {0}")]
    Record(#[from] RecordError),
    /// 重新同步后再次冲突，说明计数器命名空间存在系统性偏差
    #[error("重新同步后再次发生唯一键冲突: 首次 id {first}, 重试 id {second}")]
    RepeatedUniquenessViolation { first: i64, second: i64 },
}

impl ShortenError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ShortenError::Sequence(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl ToPublicError for ShortenError {
    fn to_error_code(&self) -> ErrorCode {
        match self {
            ShortenError::InvalidUrl(_) | ShortenError::InvalidCode(_) => ErrorCode::InvalidInput,
            ShortenError::Sequence(e) => e.to_error_code(),
            ShortenError::Record(e) => e.to_error_code(),
            ShortenError::RepeatedUniquenessViolation { .. } => ErrorCode::DataDrift,
        }
    }

    fn to_public_message(&self) -> String {
        match self {
            ShortenError::Sequence(e) => e.to_public_message(),
            ShortenError::Record(e) => e.to_public_message(),
            _ => self.to_string(),
        }
    }
}

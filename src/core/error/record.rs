//! 持久化记录存储错误类型

use thiserror::Error;

use crate::core::error::codes::{ErrorCode, ToPublicError};

/// 记录存储结果类型
pub type RecordResult<T> = Result<T, RecordError>;

/// 记录存储错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("唯一键冲突: id {0} 已存在")]
    UniquenessViolation(i64),
    /// 记录 id 必须非负，否则无法生成短码
    #[error("无效的记录 id: {0}")]
    InvalidId(i64),
    #[error("记录存储后端错误: {0}")]
    Backend(String),
    #[error("序列化错误: {0}")]
    Serialization(String),
}

impl RecordError {
    pub fn is_uniqueness_violation(&self) -> bool {
        matches!(self, RecordError::UniquenessViolation(_))
    }
}

impl ToPublicError for RecordError {
    fn to_error_code(&self) -> ErrorCode {
        match self {
            RecordError::UniquenessViolation(_) => ErrorCode::Conflict,
            RecordError::InvalidId(_) => ErrorCode::InvalidInput,
            RecordError::Backend(_) | RecordError::Serialization(_) => ErrorCode::InternalError,
        }
    }

    fn to_public_message(&self) -> String {
        match self {
            RecordError::UniquenessViolation(_) | RecordError::InvalidId(_) => self.to_string(),
            _ => "记录存储操作失败".to_string(),
        }
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(e: serde_json::Error) -> Self {
        RecordError::Serialization(e.to_string())
    }
}

impl From<tokio::task::JoinError> for RecordError {
    fn from(e: tokio::task::JoinError) -> Self {
        RecordError::Backend(e.to_string())
    }
}

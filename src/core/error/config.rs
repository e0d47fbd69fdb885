//! 配置错误类型

use thiserror::Error;

use crate::core::error::codes::{ErrorCode, ToPublicError};

/// 配置结果类型
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("读取配置文件失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("解析配置文件失败: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("序列化配置失败: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("无效配置 {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ToPublicError for ConfigError {
    fn to_error_code(&self) -> ErrorCode {
        match self {
            ConfigError::Parse(_) | ConfigError::Invalid { .. } => ErrorCode::InvalidConfiguration,
            ConfigError::Io(_) | ConfigError::Serialize(_) => ErrorCode::InternalError,
        }
    }

    fn to_public_message(&self) -> String {
        self.to_string()
    }
}

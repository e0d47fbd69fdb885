//! 对外错误码定义
//!
//! 错误码格式: XXYY
//! - XX: 错误类别 (00=成功, 02=执行, 03=验证, 05=资源, 09=系统)
//! - YY: 具体错误

use serde::{Deserialize, Serialize};

/// 对外错误码 - 用于 CLI 输出和调用方的错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // ==================== 成功 (00xx) ====================
    Success = 0,

    // ==================== 执行错误 (02xx) ====================
    /// 计数器调用超时
    Timeout = 201,
    /// 序列空间耗尽
    ResourceExhausted = 202,
    /// 唯一键冲突
    Conflict = 203,
    /// 操作被取消
    Cancelled = 205,

    // ==================== 验证错误 (03xx) ====================
    /// 无效输入
    InvalidInput = 302,
    /// 无效配置
    InvalidConfiguration = 304,

    // ==================== 资源错误 (05xx) ====================
    /// 资源不可用
    ResourceUnavailable = 502,

    // ==================== 系统错误 (09xx) ====================
    /// 内部服务器错误
    InternalError = 900,
    /// 计数器与持久化存储出现系统性偏差，需要人工介入
    DataDrift = 902,
}

impl ErrorCode {
    /// 获取错误码的 i32 值
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// 根据 i32 值获取错误码
    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(ErrorCode::Success),
            201 => Some(ErrorCode::Timeout),
            202 => Some(ErrorCode::ResourceExhausted),
            203 => Some(ErrorCode::Conflict),
            205 => Some(ErrorCode::Cancelled),
            302 => Some(ErrorCode::InvalidInput),
            304 => Some(ErrorCode::InvalidConfiguration),
            502 => Some(ErrorCode::ResourceUnavailable),
            900 => Some(ErrorCode::InternalError),
            902 => Some(ErrorCode::DataDrift),
            _ => None,
        }
    }

    /// 获取默认的错误消息
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "成功",
            ErrorCode::Timeout => "执行超时",
            ErrorCode::ResourceExhausted => "序列空间耗尽",
            ErrorCode::Conflict => "唯一键冲突",
            ErrorCode::Cancelled => "操作已取消",
            ErrorCode::InvalidInput => "无效输入",
            ErrorCode::InvalidConfiguration => "无效配置",
            ErrorCode::ResourceUnavailable => "资源不可用",
            ErrorCode::InternalError => "内部服务器错误",
            ErrorCode::DataDrift => "计数器与存储数据不一致",
        }
    }

    /// 判断错误是否可由调用方重试
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::Timeout | ErrorCode::ResourceUnavailable | ErrorCode::Conflict
        )
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_i32(), self.default_message())
    }
}

/// 对外错误信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicError {
    pub code: ErrorCode,
    pub message: String,
}

impl PublicError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// 使用默认消息创建错误
    pub fn with_default_message(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
        }
    }
}

/// 内部错误到对外错误的转换 trait
///
/// 实现此 trait 可以将内部错误转换为对外错误，过滤后端细节
pub trait ToPublicError {
    /// 转换为对外错误
    fn to_public_error(&self) -> PublicError {
        PublicError::new(self.to_error_code(), self.to_public_message())
    }

    /// 获取对外错误码
    fn to_error_code(&self) -> ErrorCode;

    /// 获取对外错误消息
    fn to_public_message(&self) -> String;
}

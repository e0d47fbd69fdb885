//! 统一错误处理系统
//!
//! 按调用边界划分错误类型：
//! - `CounterError`：共享原子计数器的调用失败
//! - `RecordError`：持久化记录存储的失败，包括唯一键冲突
//! - `SeqError`：序列分配器自身的错误，计数器错误原样透传
//! - `ShortenError`：创建短链接流程的错误，包括重试后仍冲突的致命错误
//! - `ConfigError`：配置加载与校验错误

pub mod codes;
pub mod config;
pub mod counter;
pub mod record;
pub mod sequence;
pub mod shorten;

pub use codes::{ErrorCode, PublicError, ToPublicError};
pub use config::{ConfigError, ConfigResult};
pub use counter::{CounterError, CounterResult};
pub use record::{RecordError, RecordResult};
pub use sequence::{SeqError, SeqResult};
pub use shorten::{ShortenError, ShortenResult};

pub mod error;

// 错误和结果类型
pub use error::{
    ConfigError, ConfigResult, CounterError, CounterResult, ErrorCode, PublicError, RecordError,
    RecordResult, SeqError, SeqResult, ShortenError, ShortenResult, ToPublicError,
};

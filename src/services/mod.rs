//! 服务层模块
//!
//! 调用序列分配器和记录存储的业务流程

pub mod shortener;

pub use shortener::UrlShortener;

//! seqalloc - batched monotonic sequence allocation over a shared atomic counter
//!
//! Ids are served from locally reserved batches; a batch is reserved with one
//! atomic add on the shared counter. When the durable record store turns out
//! to be ahead of the counter, the allocator resynchronizes from the store's
//! maximum id.

pub mod config;
pub mod core;
pub mod sequence;
pub mod services;
pub mod storage;
pub mod utils;

pub use crate::core::error::{CounterError, RecordError, SeqError, ShortenError};
pub use crate::sequence::{BatchSize, SequenceAllocator};
pub use crate::services::UrlShortener;
pub use crate::storage::{CounterStore, RecordStore, UrlRecord};

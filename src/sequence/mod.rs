//! 序列分配器
//!
//! - `state`：无锁的 `(current, end)` 区间
//! - `batch`：批大小与区间计算
//! - `allocator`：`next_id` 快慢路径与 `resynchronize` 对账

pub mod allocator;
pub mod batch;
pub mod state;

pub use allocator::SequenceAllocator;
pub use batch::{next_batch_start, BatchSize};
pub use state::{AllocatorSnapshot, AllocatorState};

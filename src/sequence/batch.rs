//! 补充批次与对账共用的批次计算

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{SeqError, SeqResult};

/// 每次计数器往返预留的 id 数量，始终为正
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct BatchSize(i64);

impl BatchSize {
    pub const DEFAULT: BatchSize = BatchSize(1000);

    pub fn new(size: i64) -> SeqResult<Self> {
        if size <= 0 {
            return Err(SeqError::InvalidBatchSize(size));
        }
        Ok(Self(size))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for BatchSize {
    type Error = SeqError;

    fn try_from(size: i64) -> SeqResult<Self> {
        Self::new(size)
    }
}

impl From<BatchSize> for i64 {
    fn from(size: BatchSize) -> i64 {
        size.0
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 以计数器总数 `new_max` 结尾的批次的第一个 id
pub fn batch_start(new_max: i64, size: BatchSize) -> SeqResult<i64> {
    let start = new_max
        .checked_sub(size.get() - 1)
        .ok_or(SeqError::Overflow(new_max))?;
    if start < 0 {
        // 计数器返回的总数小于刚加上的量
        return Err(SeqError::Overflow(new_max));
    }
    Ok(start)
}

/// 严格大于 `persisted_max_id` 的最小 `size` 倍数
///
/// 即 `ceil(max / size) * size`；`persisted_max_id` 本身是倍数时（包括空存储报告的 0）
/// 再上移一个批次。
pub fn next_batch_start(persisted_max_id: i64, size: BatchSize) -> SeqResult<i64> {
    if persisted_max_id < 0 {
        return Err(SeqError::NegativeMaxId(persisted_max_id));
    }

    let b = size.get();
    let batches = persisted_max_id / b + i64::from(persisted_max_id % b != 0);
    let start = batches
        .checked_mul(b)
        .ok_or(SeqError::Overflow(persisted_max_id))?;

    if start > persisted_max_id {
        Ok(start)
    } else {
        start.checked_add(b).ok_or(SeqError::Overflow(persisted_max_id))
    }
}

/// 使上次看到为 `observed_total` 的计数器至少到达 `target_end` 所需的增量，不小于一个批次
pub fn catch_up_amount(observed_total: i64, target_end: i64, size: BatchSize) -> SeqResult<i64> {
    let gap = target_end
        .checked_sub(observed_total)
        .ok_or(SeqError::Overflow(target_end))?;
    Ok(gap.max(size.get()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: i64) -> BatchSize {
        BatchSize::new(n).expect("positive batch size")
    }

    #[test]
    fn test_batch_size_must_be_positive() {
        assert_eq!(BatchSize::new(0), Err(SeqError::InvalidBatchSize(0)));
        assert_eq!(BatchSize::new(-10), Err(SeqError::InvalidBatchSize(-10)));
        assert_eq!(BatchSize::default().get(), 1000);
    }

    #[test]
    fn test_batch_size_deserialization_validates() {
        let ok: BatchSize = serde_json::from_str("25").expect("valid");
        assert_eq!(ok.get(), 25);
        assert!(serde_json::from_str::<BatchSize>("0").is_err());
    }

    #[test]
    fn test_batch_start() {
        assert_eq!(batch_start(1000, size(1000)), Ok(1));
        assert_eq!(batch_start(20, size(10)), Ok(11));
        assert_eq!(batch_start(5, size(10)), Err(SeqError::Overflow(5)));
    }

    #[test]
    fn test_next_batch_start_rounds_up() {
        assert_eq!(next_batch_start(4532, size(1000)), Ok(5000));
        assert_eq!(next_batch_start(1, size(1000)), Ok(1000));
        assert_eq!(next_batch_start(999, size(1000)), Ok(1000));
        assert_eq!(next_batch_start(1001, size(1000)), Ok(2000));
    }

    #[test]
    fn test_next_batch_start_is_strictly_above_exact_multiple() {
        assert_eq!(next_batch_start(5000, size(1000)), Ok(6000));
        assert_eq!(next_batch_start(0, size(1000)), Ok(1000));
        assert_eq!(next_batch_start(7, size(1)), Ok(8));
    }

    #[test]
    fn test_next_batch_start_rejects_bad_input() {
        assert_eq!(next_batch_start(-1, size(10)), Err(SeqError::NegativeMaxId(-1)));
        assert!(matches!(
            next_batch_start(i64::MAX - 1, size(1000)),
            Err(SeqError::Overflow(_))
        ));
    }

    #[test]
    fn test_catch_up_amount() {
        // 新计数器为 0，目标批次 [5000, 5999]
        assert_eq!(catch_up_amount(0, 5999, size(1000)), Ok(5999));
        // 计数器已越过目标：只加一个批次
        assert_eq!(catch_up_amount(9000, 5999, size(1000)), Ok(1000));
        assert_eq!(catch_up_amount(5500, 5999, size(1000)), Ok(1000));
    }
}

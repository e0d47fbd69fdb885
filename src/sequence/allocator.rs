use log::{debug, warn};
use tokio::sync::Mutex;

use super::batch::{self, BatchSize};
use super::state::{AllocatorSnapshot, AllocatorState};
use crate::config::AllocatorConfig;
use crate::core::error::{SeqError, SeqResult};
use crate::storage::CounterStore;

/// 对账时对计数器的最大递增次数
///
/// 第一次递增按本实例上次看到的总数估算增量；若计数器被回退过，
/// 第二次按它返回的真实总数补齐，可线性化的计数器此时必然到达目标。
const MAX_RESYNC_ADDS: u32 = 2;

/// 序列分配器：从共享计数器上预留的批次中分配唯一且递增的 id
///
/// 批次内的 id 无锁、无网络调用直接分配；批次用完时，同一时刻只有一个调用方
/// 通过闸门，用一次 `increment` 预留下一批 `batch_size` 个 id。计数器的加并返回
/// 是原子的，所以共享同一 `counter_name` 的实例拿到的批次互不相交。
///
/// 只有在计数器调用成功返回后才写入状态，调用失败或被取消（drop future、
/// `tokio::time::timeout`）时预留区间保持不变。分配器自身从不重试。
pub struct SequenceAllocator<C> {
    counter: C,
    counter_name: String,
    batch_size: BatchSize,
    state: AllocatorState,
    gate: Mutex<()>,
}

impl<C> std::fmt::Debug for SequenceAllocator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceAllocator")
            .field("counter_name", &self.counter_name)
            .field("batch_size", &self.batch_size)
            .field("state", &self.state.snapshot())
            .finish()
    }
}

impl<C: CounterStore> SequenceAllocator<C> {
    pub fn new(counter: C, counter_name: impl Into<String>, batch_size: BatchSize) -> Self {
        Self {
            counter,
            counter_name: counter_name.into(),
            batch_size,
            state: AllocatorState::new(),
            gate: Mutex::new(()),
        }
    }

    pub fn from_config(counter: C, config: &AllocatorConfig) -> SeqResult<Self> {
        let batch_size = BatchSize::new(config.batch_size)?;
        Ok(Self::new(counter, config.counter_key.clone(), batch_size))
    }

    pub fn counter_name(&self) -> &str {
        &self.counter_name
    }

    pub fn batch_size(&self) -> BatchSize {
        self.batch_size
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }

    pub fn snapshot(&self) -> AllocatorSnapshot {
        self.state.snapshot()
    }

    /// 获取下一个唯一 id
    ///
    /// 只在计数器调用失败时出错，错误原样透传，由调用方决定是否重试
    pub async fn next_id(&self) -> SeqResult<i64> {
        if let Some(id) = self.state.try_claim() {
            return Ok(id);
        }

        let _gate = self.gate.lock().await;

        // 排在前面的调用方可能已经补充了批次
        if let Some(id) = self.state.try_claim() {
            return Ok(id);
        }

        let size = self.batch_size;
        let new_max = self.counter.increment(&self.counter_name, size.get()).await?;
        let start = batch::batch_start(new_max, size)?;
        let next = start.checked_add(1).ok_or(SeqError::Overflow(start))?;

        // `start` 交给当前调用方，批次其余部分留给后续调用
        self.state.install(next, new_max);
        debug!(
            "计数器 '{}' 预留批次 [{}, {}]",
            self.counter_name, start, new_max
        );
        Ok(start)
    }

    /// 跳过记录存储中已持久化的所有 id
    ///
    /// 持久化因唯一键冲突失败后，以存储中真实的最大 id 调用。从严格大于
    /// `persisted_max_id` 的最小批次边界开始预留新区间（若其他实例已把计数器推得更远，
    /// 则从更高处开始），返回区间的第一个 id，由下一次 [`next_id`](Self::next_id) 分配。
    ///
    /// 计数器连续两次递增后仍低于目标时返回
    /// `SeqError::CounterRegressed`，状态保持不变。
    pub async fn resynchronize(&self, persisted_max_id: i64) -> SeqResult<i64> {
        let size = self.batch_size;
        let new_batch_start = batch::next_batch_start(persisted_max_id, size)?;
        let target_end = new_batch_start
            .checked_add(size.get() - 1)
            .ok_or(SeqError::Overflow(new_batch_start))?;

        let _gate = self.gate.lock().await;

        let mut observed = self.state.end().max(0);
        for _ in 0..MAX_RESYNC_ADDS {
            let amount = batch::catch_up_amount(observed, target_end, size)?;
            let new_max = self.counter.increment(&self.counter_name, amount).await?;

            if new_max >= target_end {
                // 这次递增独占了 (new_max - amount, new_max]
                let start = (new_max - amount + 1).max(new_batch_start);
                self.state.install(start, new_max);
                warn!(
                    "计数器 '{}' 已越过持久化 id {} 重新同步: 预留 [{}, {}]",
                    self.counter_name, persisted_max_id, start, new_max
                );
                return Ok(start);
            }

            // 计数器低于本实例上次看到的值（例如从旧快照恢复），按真实总数再补一次
            warn!(
                "计数器 '{}' 返回 {}，低于目标 {}，继续推进",
                self.counter_name, new_max, target_end
            );
            observed = new_max;
        }

        Err(SeqError::CounterRegressed {
            reported: observed,
            target: target_end,
        })
    }
}

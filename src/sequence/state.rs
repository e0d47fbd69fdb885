use std::sync::atomic::{AtomicI64, Ordering};

/// 分配器预留区间的瞬时快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorSnapshot {
    /// 下一个待分配的 id
    pub current: i64,
    /// 预留批次的上界（含），未预留时为 -1
    pub end: i64,
}

impl AllocatorSnapshot {
    /// 预留批次中剩余可分配的 id 数量
    pub fn remaining(&self) -> i64 {
        (self.end - self.current + 1).max(0)
    }
}

/// 分配器背后的 `(current, end)` 区间
///
/// 分配不加锁：先读 `end` 再读 `current`，`current` 只通过 CAS 前进，
/// 因此始终满足 `current <= end + 1`。[`install`](Self::install) 先写 `current`
/// 再写 `end`，与之竞争的分配方要么 CAS 失败，要么看到新的 `current` 高于旧的 `end`
/// 而回到慢路径。`install` 必须由调用方串行化。
#[derive(Debug)]
pub struct AllocatorState {
    current: AtomicI64,
    end: AtomicI64,
}

impl AllocatorState {
    pub fn new() -> Self {
        Self {
            current: AtomicI64::new(0),
            end: AtomicI64::new(-1),
        }
    }

    /// 从预留批次中取下一个 id，批次耗尽时返回 None
    pub fn try_claim(&self) -> Option<i64> {
        loop {
            let end = self.end.load(Ordering::SeqCst);
            let current = self.current.load(Ordering::SeqCst);
            if current > end {
                return None;
            }
            if self
                .current
                .compare_exchange_weak(current, current + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return Some(current);
            }
        }
    }

    /// 将预留区间替换为 `[next, end]`
    pub fn install(&self, next: i64, end: i64) {
        debug_assert!(next <= end.saturating_add(1));
        self.current.store(next, Ordering::SeqCst);
        self.end.store(end, Ordering::SeqCst);
    }

    /// 本实例最近一次预留到的计数器总数
    pub fn end(&self) -> i64 {
        self.end.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> AllocatorSnapshot {
        AllocatorSnapshot {
            end: self.end.load(Ordering::SeqCst),
            current: self.current.load(Ordering::SeqCst),
        }
    }
}

impl Default for AllocatorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_fresh_state_has_no_batch() {
        let state = AllocatorState::new();
        assert_eq!(state.snapshot(), AllocatorSnapshot { current: 0, end: -1 });
        assert_eq!(state.snapshot().remaining(), 0);
        assert_eq!(state.try_claim(), None);
    }

    #[test]
    fn test_claims_stop_at_end() {
        let state = AllocatorState::new();
        state.install(5, 7);
        assert_eq!(state.try_claim(), Some(5));
        assert_eq!(state.try_claim(), Some(6));
        assert_eq!(state.try_claim(), Some(7));
        assert_eq!(state.try_claim(), None);
        assert_eq!(state.snapshot(), AllocatorSnapshot { current: 8, end: 7 });
    }

    #[test]
    fn test_concurrent_claims_never_overrun() {
        let state = Arc::new(AllocatorState::new());
        state.install(1, 1000);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = Arc::clone(&state);
                thread::spawn(move || {
                    let mut ids = Vec::new();
                    while let Some(id) = state.try_claim() {
                        ids.push(id);
                    }
                    ids
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("claimer thread") {
                assert!(seen.insert(id), "id {} claimed twice", id);
            }
        }
        assert_eq!(seen.len(), 1000);
        assert_eq!(state.snapshot().current, 1001);
    }
}

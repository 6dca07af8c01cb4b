use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// 同一个 token 的扫码在进程内串行执行，不同 token 互不阻塞
#[derive(Default)]
pub(crate) struct ScanGate {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

pub(crate) struct GatePass<'a> {
    gate: &'a ScanGate,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl ScanGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn enter(&self, token: &str) -> GatePass<'_> {
        // entry 的分片锁必须在 await 之前释放
        let lock = Arc::clone(&self.locks.entry(token.to_string()).or_default());
        let guard = lock.lock_owned().await;
        GatePass {
            gate: self,
            key: token.to_string(),
            guard: Some(guard),
        }
    }

    /// 当前仍有人持有或等待的 token 数
    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.locks.len()
    }
}

impl Drop for GatePass<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.gate
            .locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_idle_entries_are_dropped() {
        let gate = ScanGate::new();
        {
            let _pass = gate.enter("LUNCH-a").await;
            assert_eq!(gate.tracked(), 1);
        }
        assert_eq!(gate.tracked(), 0);
    }

    #[tokio::test]
    async fn test_same_token_is_serialized() {
        let gate = Arc::new(ScanGate::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let gate = Arc::clone(&gate);
            let inside = Arc::clone(&inside);
            let max_inside = Arc::clone(&max_inside);
            handles.push(tokio::spawn(async move {
                let _pass = gate.enter("ENTRY-shared").await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_inside.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert_eq!(gate.tracked(), 0);
    }

    #[tokio::test]
    async fn test_distinct_tokens_do_not_block() {
        let gate = ScanGate::new();
        let _first = gate.enter("LUNCH-a").await;
        let second = tokio::time::timeout(Duration::from_millis(100), gate.enter("LUNCH-b")).await;
        assert!(second.is_ok());
    }
}

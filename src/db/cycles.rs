use crate::error::RepositoryError;
use crate::models::{Cycle, NewCycle};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// 周期记录存储
#[async_trait]
pub trait CycleRepository: Send + Sync {
    async fn create(&self, input: NewCycle) -> Result<Cycle, RepositoryError>;

    /// 按 id 倒序 (最新在前)
    async fn list(&self) -> Result<Vec<Cycle>, RepositoryError>;

    /// 记录不存在时返回 false
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;
}

/// 记录 id 生成器
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> i64;
}

/// 从 1 开始递增
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicI64,
}

impl SequentialIds {
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// 内存存储
pub struct InMemoryCycleRepository {
    entries: DashMap<i64, Cycle>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryCycleRepository {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            entries: DashMap::new(),
            ids,
        }
    }
}

impl Default for InMemoryCycleRepository {
    fn default() -> Self {
        Self::new(Arc::new(SequentialIds::default()))
    }
}

#[async_trait]
impl CycleRepository for InMemoryCycleRepository {
    async fn create(&self, input: NewCycle) -> Result<Cycle, RepositoryError> {
        let cycle = Cycle::from_new(self.ids.next_id(), input);
        self.entries.insert(cycle.id, cycle.clone());
        Ok(cycle)
    }

    async fn list(&self) -> Result<Vec<Cycle>, RepositoryError> {
        let mut cycles: Vec<Cycle> = self.entries.iter().map(|e| e.value().clone()).collect();
        cycles.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(cycles)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.entries.remove(&id).is_some())
    }
}

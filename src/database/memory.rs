use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::repository::Repository;
use crate::entities::Resource;

/// In-process repository used by tests and database-less development runs.
/// Ids are handed out sequentially from 1 and never reused.
pub struct MemoryRepository<T> {
    inner: RwLock<Rows<T>>,
}

struct Rows<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T: Resource> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Rows {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    /// Visit stored rows without cloning the whole table
    pub(crate) async fn filter<F>(&self, mut keep: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool + Send,
    {
        let inner = self.inner.read().await;
        inner.rows.values().filter(|row| keep(*row)).cloned().collect()
    }
}

impl<T: Resource> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Resource> Repository<T> for MemoryRepository<T> {
    async fn find_all(&self) -> Result<Vec<T>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn save(&self, mut entity: T) -> Result<T, DatabaseError> {
        let mut inner = self.inner.write().await;
        if entity.id() == 0 {
            inner.last_id += 1;
            entity.set_id(inner.last_id);
        } else if !inner.rows.contains_key(&entity.id()) {
            return Err(DatabaseError::NotFound {
                entity: T::NAME,
                id: entity.id(),
            });
        }
        inner.rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().await;
        inner.rows.remove(&id);
        Ok(())
    }
}

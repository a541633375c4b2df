//! In-memory task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    adapters::record::TaskRecord,
    domain::{Task, TaskId},
    ports::{TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Tasks are held as [`TaskRecord`]s, so every read goes through the same
/// decoding path a real record store would use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    records: Arc<RwLock<HashMap<TaskId, TaskRecord>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a raw record, bypassing encoding.
    ///
    /// Lets callers seed records in any of the shapes a record store may
    /// return.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn put_record(&self, record: TaskRecord) -> TaskRepositoryResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        records.insert(record.id, record);
        Ok(())
    }
}

fn poisoned<E: std::fmt::Display>(err: E) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let record = TaskRecord::from_task(task)?;
        let mut records = self.records.write().map_err(poisoned)?;
        if records.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        records.insert(task.id(), record);
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let record = TaskRecord::from_task(task)?;
        let mut records = self.records.write().map_err(poisoned)?;
        let slot = records
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *slot = record;
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let record = {
            let records = self.records.read().map_err(poisoned)?;
            records.get(&id).cloned()
        };
        record.map(TaskRecord::into_task).transpose()
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let snapshot: Vec<TaskRecord> = {
            let records = self.records.read().map_err(poisoned)?;
            records.values().cloned().collect()
        };
        let mut tasks = snapshot
            .into_iter()
            .map(TaskRecord::into_task)
            .collect::<TaskRepositoryResult<Vec<Task>>>()?;
        tasks.retain(|task| query.matches(task));
        tasks.sort_by(|left, right| {
            (left.column(), left.position(), left.id()).cmp(&(
                right.column(),
                right.position(),
                right.id(),
            ))
        });
        Ok(tasks)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        records
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }
}

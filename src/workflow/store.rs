//! Entity storage
//!
//! In-memory, id-keyed collections. The map lock is only held long enough to
//! find or insert a slot; each record sits behind its own mutex, so a
//! transition on one entity never waits on another entity's transition.
//!
//! Lock order: an entity mutex may be held while taking a collection's map
//! lock, never the other way round.

use crate::error::{not_found_error, AppError};
use crate::workflow::{Enhancement, Entity, Proposal, Rule};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// A single record behind its own lock
pub type Slot<T> = Arc<Mutex<T>>;

struct Inner<T> {
    by_id: HashMap<Uuid, Slot<T>>,
    /// Insertion order, for stable listings
    order: Vec<Uuid>,
}

/// Thread-safe collection of one entity kind
pub struct Collection<T: Entity> {
    inner: RwLock<Inner<T>>,
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                by_id: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }

    /// Insert a new record. Ids are never reused, so an occupied id is refused.
    pub async fn insert(&self, record: T) -> Result<T, AppError> {
        let mut inner = self.inner.write().await;
        let id = record.id();
        if inner.by_id.contains_key(&id) {
            return Err(AppError::InvalidState(format!(
                "{} {} already exists",
                T::KIND,
                id
            )));
        }
        inner.by_id.insert(id, Arc::new(Mutex::new(record.clone())));
        inner.order.push(id);
        Ok(record)
    }

    /// Get the lock slot for a record
    pub async fn slot(&self, id: Uuid) -> Result<Slot<T>, AppError> {
        let inner = self.inner.read().await;
        inner
            .by_id
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error(format!("{} {} not found", T::KIND, id)))
    }

    /// Get a copy of a record by ID
    pub async fn get(&self, id: Uuid) -> Result<T, AppError> {
        let slot = self.slot(id).await?;
        let record = slot.lock().await;
        Ok(record.clone())
    }

    /// Copies of all records, newest first
    pub async fn list(&self) -> Vec<T> {
        // Collect slots first so no entity lock is awaited under the map lock.
        let slots: Vec<Slot<T>> = {
            let inner = self.inner.read().await;
            inner
                .order
                .iter()
                .rev()
                .filter_map(|id| inner.by_id.get(id).cloned())
                .collect()
        };

        let mut records = Vec::with_capacity(slots.len());
        for slot in slots {
            records.push(slot.lock().await.clone());
        }
        records
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.by_id.len()
    }
}

impl<T: Entity> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The three workflow collections
#[derive(Default)]
pub struct WorkflowStore {
    pub enhancements: Collection<Enhancement>,
    pub proposals: Collection<Proposal>,
    pub rules: Collection<Rule>,
}

impl WorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::models::Blueprint;

/// The authoritative in-memory collection of blueprints.
///
/// Records live in a `Vec` so `list_by_author` reflects insertion order.
/// A single lock serializes all writers: two concurrent `create` calls for
/// the same key cannot both observe it absent, which keeps the one-record-
/// per-key invariant without any further coordination.
pub struct BlueprintStore {
    records: RwLock<Vec<Blueprint>>,
}

impl BlueprintStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Blueprint>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Blueprint>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// All blueprints by the given author, in insertion order. An author
    /// with no blueprints yields an empty vec, never an error.
    pub fn list_by_author(&self, author: &str) -> Vec<Blueprint> {
        self.read()
            .iter()
            .filter(|bp| bp.author == author)
            .cloned()
            .collect()
    }

    /// The unique blueprint for `(author, name)`, if any.
    pub fn get(&self, author: &str, name: &str) -> Option<Blueprint> {
        self.read().iter().find(|bp| bp.matches(author, name)).cloned()
    }

    /// Insert a new blueprint. Fails without touching the existing record
    /// when the `(author, name)` key is already taken.
    pub fn create(
        &self,
        author: &str,
        name: &str,
        points: Vec<Value>,
    ) -> Result<(), StoreError> {
        let mut records = self.write();
        if records.iter().any(|bp| bp.matches(author, name)) {
            return Err(StoreError::AlreadyExists {
                author: author.to_string(),
                name: name.to_string(),
            });
        }
        records.push(Blueprint::new(author, name, points));
        info!("Created blueprint {}/{}", author, name);
        Ok(())
    }

    /// Remove any blueprint matching `(author, name)`. Deletion is
    /// idempotent: a missing key is still a success.
    pub fn delete(&self, author: &str, name: &str) {
        let mut records = self.write();
        let before = records.len();
        records.retain(|bp| !bp.matches(author, name));
        if records.len() < before {
            info!("Deleted blueprint {}/{}", author, name);
        } else {
            debug!("Delete for missing blueprint {}/{}", author, name);
        }
    }

    /// Append a point to an existing blueprint, preserving prior points.
    /// Reports `NotFound` when no record matches so the relay can apply
    /// its configured drop policy.
    pub fn append_point(
        &self,
        author: &str,
        name: &str,
        point: Value,
    ) -> Result<(), StoreError> {
        let mut records = self.write();
        match records.iter_mut().find(|bp| bp.matches(author, name)) {
            Some(bp) => {
                bp.points.push(point);
                Ok(())
            }
            None => Err(StoreError::NotFound {
                author: author.to_string(),
                name: name.to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl Default for BlueprintStore {
    fn default() -> Self {
        Self::new()
    }
}

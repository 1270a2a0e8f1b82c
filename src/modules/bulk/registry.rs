// Copyright © 2025 reachbook.org
// Licensed under ReachBook License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use dashmap::DashMap;

use crate::modules::bulk::operation::BulkOperation;
use crate::modules::bulk::BulkStatus;

const DEFAULT_RETAINED_OPERATIONS: usize = 1024;

/// In-memory index of bulk operations, keyed by operation id.
///
/// Finished operations stay queryable until the retention cap is hit; once
/// it is, the oldest finished operations make room for new inserts. Running
/// operations are never evicted.
pub struct OperationRegistry {
    operations: DashMap<u64, Arc<BulkOperation>>,
    capacity: usize,
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RETAINED_OPERATIONS)
    }
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            operations: DashMap::new(),
            capacity,
        }
    }

    pub fn insert(&self, operation: Arc<BulkOperation>) {
        self.evict_finished();
        self.operations.insert(operation.id(), operation);
    }

    pub fn get(&self, id: u64) -> Option<Arc<BulkOperation>> {
        self.operations.get(&id).map(|entry| entry.value().clone())
    }

    pub fn list(&self) -> Vec<BulkStatus> {
        self.operations
            .iter()
            .map(|entry| entry.value().status())
            .collect()
    }

    fn evict_finished(&self) {
        while self.operations.len() >= self.capacity {
            let oldest = self
                .operations
                .iter()
                .filter(|entry| entry.value().phase().is_terminal())
                .min_by_key(|entry| (entry.value().created_at(), *entry.key()))
                .map(|entry| *entry.key());
            match oldest {
                Some(id) => {
                    self.operations.remove(&id);
                }
                None => break,
            }
        }
    }
}

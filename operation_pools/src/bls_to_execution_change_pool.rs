use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use itertools::Itertools as _;
use tokio::sync::Mutex;
use types::{capella::containers::SignedBlsToExecutionChange, phase0::primitives::ValidatorIndex};

use crate::misc::{PoolError, DEFAULT_CAPACITY};

/// Staging for BLS-to-execution changes.
///
/// Staged changes stay in the pool until included in a block, even when a later
/// re-validation finds them stale; pruning is the pool owner's concern.
#[async_trait]
pub trait BlsToExecutionChangePool: Send + Sync {
    async fn insert_bls_to_execution_change(
        &self,
        change: SignedBlsToExecutionChange,
    ) -> Result<(), PoolError>;

    async fn pending_bls_to_execution_changes(&self) -> Result<Vec<SignedBlsToExecutionChange>>;
}

/// In-memory staging keyed by validator index. Withdrawal credentials can only
/// rotate away from BLS once, so one change per validator is kept.
#[derive(Debug)]
pub struct MemoryBlsToExecutionChangePool {
    changes: Mutex<HashMap<ValidatorIndex, SignedBlsToExecutionChange>>,
    capacity: usize,
}

impl MemoryBlsToExecutionChangePool {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            changes: Mutex::new(HashMap::new()),
            capacity,
        }
    }
}

impl Default for MemoryBlsToExecutionChangePool {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl BlsToExecutionChangePool for MemoryBlsToExecutionChangePool {
    async fn insert_bls_to_execution_change(
        &self,
        change: SignedBlsToExecutionChange,
    ) -> Result<(), PoolError> {
        let mut changes = self.changes.lock().await;
        let index = change.message.validator_index;

        if changes.contains_key(&index) {
            return Ok(());
        }

        if changes.len() >= self.capacity {
            return Err(PoolError::Full);
        }

        changes.insert(index, change);
        Ok(())
    }

    async fn pending_bls_to_execution_changes(&self) -> Result<Vec<SignedBlsToExecutionChange>> {
        Ok(self.changes.lock().await.values().copied().collect_vec())
    }
}

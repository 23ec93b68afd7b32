use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use itertools::Itertools as _;
use tokio::sync::Mutex;
use types::phase0::{containers::SignedVoluntaryExit, primitives::ValidatorIndex};

use crate::misc::{PoolError, DEFAULT_CAPACITY};

#[async_trait]
pub trait VoluntaryExitPool: Send + Sync {
    async fn insert_voluntary_exit(&self, exit: SignedVoluntaryExit) -> Result<(), PoolError>;

    async fn pending_exits(&self) -> Result<Vec<SignedVoluntaryExit>>;
}

/// In-memory staging keyed by validator index. A validator can only exit once,
/// so later submissions for the same index are ignored.
#[derive(Debug)]
pub struct MemoryVoluntaryExitPool {
    exits: Mutex<HashMap<ValidatorIndex, SignedVoluntaryExit>>,
    capacity: usize,
}

impl MemoryVoluntaryExitPool {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            exits: Mutex::new(HashMap::new()),
            capacity,
        }
    }
}

impl Default for MemoryVoluntaryExitPool {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl VoluntaryExitPool for MemoryVoluntaryExitPool {
    async fn insert_voluntary_exit(&self, exit: SignedVoluntaryExit) -> Result<(), PoolError> {
        let mut exits = self.exits.lock().await;
        let index = exit.message.validator_index;

        if exits.contains_key(&index) {
            return Ok(());
        }

        if exits.len() >= self.capacity {
            return Err(PoolError::Full);
        }

        exits.insert(index, exit);
        Ok(())
    }

    async fn pending_exits(&self) -> Result<Vec<SignedVoluntaryExit>> {
        Ok(self.exits.lock().await.values().copied().collect_vec())
    }
}

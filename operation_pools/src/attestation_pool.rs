use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use types::{combined::Attestation, preset::Preset};

use crate::misc::{PoolError, DEFAULT_CAPACITY};

/// Staging for attestations awaiting block inclusion.
///
/// Implementations are expected to fully verify attestation signatures on ingestion;
/// the gateway only checks that the signature bytes decode.
#[async_trait]
pub trait AttestationPool<P: Preset>: Send + Sync {
    async fn save_aggregated_attestation(
        &self,
        attestation: Arc<Attestation<P>>,
    ) -> Result<(), PoolError>;

    async fn save_unaggregated_attestation(
        &self,
        attestation: Arc<Attestation<P>>,
    ) -> Result<(), PoolError>;

    /// A point-in-time snapshot. It need not be consistent with concurrent
    /// mutations, but individual entries never tear.
    async fn aggregated_attestations(&self) -> Vec<Arc<Attestation<P>>>;

    async fn unaggregated_attestations(&self) -> Result<Vec<Arc<Attestation<P>>>>;
}

/// In-memory staging with a capacity bound and no aggregation.
#[derive(Debug)]
pub struct MemoryAttestationPool<P: Preset> {
    aggregated: Mutex<Vec<Arc<Attestation<P>>>>,
    unaggregated: Mutex<Vec<Arc<Attestation<P>>>>,
    capacity: usize,
}

impl<P: Preset> MemoryAttestationPool<P> {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            aggregated: Mutex::new(vec![]),
            unaggregated: Mutex::new(vec![]),
            capacity,
        }
    }
}

impl<P: Preset> Default for MemoryAttestationPool<P> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl<P: Preset> AttestationPool<P> for MemoryAttestationPool<P> {
    async fn save_aggregated_attestation(
        &self,
        attestation: Arc<Attestation<P>>,
    ) -> Result<(), PoolError> {
        let mut aggregated = self.aggregated.lock().await;

        if aggregated.len() >= self.capacity {
            return Err(PoolError::Full);
        }

        aggregated.push(attestation);
        Ok(())
    }

    async fn save_unaggregated_attestation(
        &self,
        attestation: Arc<Attestation<P>>,
    ) -> Result<(), PoolError> {
        let mut unaggregated = self.unaggregated.lock().await;

        if unaggregated.len() >= self.capacity {
            return Err(PoolError::Full);
        }

        unaggregated.push(attestation);
        Ok(())
    }

    async fn aggregated_attestations(&self) -> Vec<Arc<Attestation<P>>> {
        self.aggregated.lock().await.clone()
    }

    async fn unaggregated_attestations(&self) -> Result<Vec<Arc<Attestation<P>>>> {
        Ok(self.unaggregated.lock().await.clone())
    }
}

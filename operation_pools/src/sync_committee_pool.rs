use anyhow::Error as AnyhowError;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use types::altair::containers::SyncCommitteeMessage;

/// Why the core service refused a sync committee message. The gateway only ferries
/// these: `Rejected` surfaces as a client error, `Internal` as a server error.
#[derive(Debug, Error)]
pub enum SyncCommitteeError {
    #[error("sync committee message rejected")]
    Rejected(#[source] AnyhowError),
    #[error("sync committee service failed")]
    Internal(#[source] AnyhowError),
}

/// The core submission interface for sync committee messages.
///
/// Validation, aggregation, and subnet relay all happen behind this seam;
/// the gateway never re-broadcasts these messages itself.
#[async_trait]
pub trait SyncCommitteePool: Send + Sync {
    async fn submit_sync_committee_message(
        &self,
        message: SyncCommitteeMessage,
    ) -> Result<(), SyncCommitteeError>;
}

/// Accepts and stages everything. Stands in for the core service in tests.
#[derive(Default, Debug)]
pub struct MemorySyncCommitteePool {
    messages: Mutex<Vec<SyncCommitteeMessage>>,
}

impl MemorySyncCommitteePool {
    pub async fn messages(&self) -> Vec<SyncCommitteeMessage> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl SyncCommitteePool for MemorySyncCommitteePool {
    async fn submit_sync_committee_message(
        &self,
        message: SyncCommitteeMessage,
    ) -> Result<(), SyncCommitteeError> {
        self.messages.lock().await.push(message);
        Ok(())
    }
}

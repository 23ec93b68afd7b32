//! Operation pool facades.
//!
//! The gateway stages operations through these narrow per-kind interfaces. Aggregation,
//! packing, and pruning are pool concerns and stay behind them. Enumerations return the
//! combined unions directly so that callers never recover variants dynamically.

pub use crate::{
    attestation_pool::{AttestationPool, MemoryAttestationPool},
    bls_to_execution_change_pool::{BlsToExecutionChangePool, MemoryBlsToExecutionChangePool},
    misc::PoolError,
    slashing_pool::{MemorySlashingPool, SlashingPool},
    sync_committee_pool::{MemorySyncCommitteePool, SyncCommitteeError, SyncCommitteePool},
    voluntary_exit_pool::{MemoryVoluntaryExitPool, VoluntaryExitPool},
};

mod attestation_pool;
mod bls_to_execution_change_pool;
mod misc;
mod slashing_pool;
mod sync_committee_pool;
mod voluntary_exit_pool;

//! The gossip egress seam.
//!
//! Transport and peer selection live elsewhere; the gateway only needs "publish this
//! on its topic" and "publish this attestation on subnet N", and it needs to know
//! when publishing failed so the failure can be reported per index.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use types::{
    capella::containers::SignedBlsToExecutionChange,
    combined::{Attestation, AttesterSlashing},
    phase0::{
        containers::{ProposerSlashing, SignedVoluntaryExit},
        primitives::SubnetId,
    },
    preset::Preset,
};

/// An operation published on the global topic its variant implies.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GossipMessage {
    AttesterSlashing(Box<AttesterSlashing>),
    ProposerSlashing(Box<ProposerSlashing>),
    SignedBlsToExecutionChange(Box<SignedBlsToExecutionChange>),
    VoluntaryExit(Box<SignedVoluntaryExit>),
}

#[async_trait]
pub trait Broadcaster<P: Preset>: Send + Sync {
    async fn broadcast(&self, message: GossipMessage) -> Result<()>;

    async fn broadcast_attestation(
        &self,
        subnet_id: SubnetId,
        attestation: Arc<Attestation<P>>,
    ) -> Result<()>;
}

//! Test collaborators wired into a [`GatewayState`].

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use anyhow::{bail, Result};
use async_trait::async_trait;
use bls::{PublicKeyBytes, SignatureBytes};
use chain::Controller;
use helper_functions::verifier::{NullVerifier, Verifier};
use operation_pools::{
    MemoryAttestationPool, MemoryBlsToExecutionChangePool, MemorySlashingPool,
    MemorySyncCommitteePool, MemoryVoluntaryExitPool, SyncCommitteeError, SyncCommitteePool,
};
use p2p::{Broadcaster, GossipMessage};
use serde_json::Value;
use ssz_types::BitList;
use tokio::{sync::watch, time::Instant};
use types::{
    altair::containers::SyncCommitteeMessage,
    capella::containers::{BlsToExecutionChange, SignedBlsToExecutionChange},
    combined::Attestation,
    config::Config as ChainConfig,
    phase0::{
        consts::FAR_FUTURE_EPOCH,
        containers::{
            Attestation as Phase0Attestation, AttestationData, Checkpoint, Validator,
        },
        primitives::{Slot, SubnetId, ValidatorIndex, H256},
    },
    preset::Mainnet,
    state::BeaconState,
};

use crate::{events::OperationNotifier, routing::GatewayState};

pub struct TestController {
    chain_config: ChainConfig,
    states: Vec<Arc<BeaconState>>,
    cursor: AtomicUsize,
}

impl TestController {
    pub fn new(chain_config: ChainConfig, states: Vec<BeaconState>) -> Arc<Self> {
        assert!(!states.is_empty(), "the controller needs a head state");

        Arc::new(Self {
            chain_config,
            states: states.into_iter().map(Arc::new).collect(),
            cursor: AtomicUsize::new(0),
        })
    }
}

impl Controller for TestController {
    fn chain_config(&self) -> &ChainConfig {
        &self.chain_config
    }

    // Successive calls walk through the supplied states and stay on the last one,
    // letting tests change the head between re-validation rounds.
    fn head_state(&self) -> Result<Arc<BeaconState>> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        Ok(self.states[index.min(self.states.len() - 1)].clone())
    }

    fn process_slots_if_possible(
        &self,
        state: Arc<BeaconState>,
        slot: Slot,
    ) -> Result<Arc<BeaconState>> {
        if state.slot() >= slot {
            return Ok(state);
        }

        let mut advanced = (*state).clone();
        advanced.slot = slot;
        Ok(Arc::new(advanced))
    }
}

#[derive(Default)]
pub struct RecordingBroadcaster {
    pub fail: bool,
    pub messages: Mutex<Vec<(GossipMessage, Instant)>>,
    pub attestations: Mutex<Vec<(SubnetId, Arc<Attestation<Mainnet>>)>>,
}

impl RecordingBroadcaster {
    pub fn working() -> Arc<Self> {
        Arc::default()
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn broadcast_bls_change_indices(&self) -> Vec<(ValidatorIndex, Instant)> {
        self.messages
            .lock()
            .expect("no test panics while holding the lock")
            .iter()
            .filter_map(|(message, instant)| match message {
                GossipMessage::SignedBlsToExecutionChange(change) => {
                    Some((change.message.validator_index, *instant))
                }
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Broadcaster<Mainnet> for RecordingBroadcaster {
    async fn broadcast(&self, message: GossipMessage) -> Result<()> {
        if self.fail {
            bail!("no connected peers");
        }

        self.messages
            .lock()
            .expect("no test panics while holding the lock")
            .push((message, Instant::now()));

        Ok(())
    }

    async fn broadcast_attestation(
        &self,
        subnet_id: SubnetId,
        attestation: Arc<Attestation<Mainnet>>,
    ) -> Result<()> {
        if self.fail {
            bail!("no connected peers");
        }

        self.attestations
            .lock()
            .expect("no test panics while holding the lock")
            .push((subnet_id, attestation));

        Ok(())
    }
}

/// Accepts everything except one signature, which fails the encoding check.
pub struct RejectingEncodingVerifier {
    pub invalid: SignatureBytes,
}

impl Verifier for RejectingEncodingVerifier {
    fn validate_signature_encoding(&self, signature_bytes: SignatureBytes) -> Result<()> {
        if signature_bytes == self.invalid {
            bail!("signature bytes do not decode to a curve point");
        }

        Ok(())
    }

    fn verify_voluntary_exit(
        &self,
        config: &ChainConfig,
        state: &BeaconState,
        signed_voluntary_exit: &types::phase0::containers::SignedVoluntaryExit,
        public_key: PublicKeyBytes,
    ) -> Result<()> {
        NullVerifier.verify_voluntary_exit(config, state, signed_voluntary_exit, public_key)
    }

    fn verify_block_header(
        &self,
        config: &ChainConfig,
        state: &BeaconState,
        signed_header: &types::phase0::containers::SignedBeaconBlockHeader,
        public_key: PublicKeyBytes,
    ) -> Result<()> {
        NullVerifier.verify_block_header(config, state, signed_header, public_key)
    }

    fn verify_indexed_attestation(
        &self,
        config: &ChainConfig,
        state: &BeaconState,
        data: AttestationData,
        signature: bls::AggregateSignatureBytes,
        public_keys: &[PublicKeyBytes],
    ) -> Result<()> {
        NullVerifier.verify_indexed_attestation(config, state, data, signature, public_keys)
    }

    fn verify_bls_to_execution_change(
        &self,
        config: &ChainConfig,
        state: &BeaconState,
        signed_bls_to_execution_change: &SignedBlsToExecutionChange,
    ) -> Result<()> {
        NullVerifier.verify_bls_to_execution_change(config, state, signed_bls_to_execution_change)
    }
}

/// Refuses every sync committee message the way the core service would.
pub struct RejectingSyncCommitteePool;

#[async_trait]
impl SyncCommitteePool for RejectingSyncCommitteePool {
    async fn submit_sync_committee_message(
        &self,
        _message: SyncCommitteeMessage,
    ) -> Result<(), SyncCommitteeError> {
        Err(SyncCommitteeError::Rejected(anyhow::anyhow!(
            "message is not for the current sync committee period"
        )))
    }
}

pub struct TestGateway {
    pub state: GatewayState<Mainnet>,
    pub broadcaster: Arc<RecordingBroadcaster>,
    pub attestation_pool: Arc<MemoryAttestationPool<Mainnet>>,
    pub slashing_pool: Arc<MemorySlashingPool<Mainnet>>,
    pub voluntary_exit_pool: Arc<MemoryVoluntaryExitPool>,
    pub bls_to_execution_change_pool: Arc<MemoryBlsToExecutionChangePool>,
    pub sync_committee_pool: Arc<MemorySyncCommitteePool>,
    // Dropping the sender would stop deferred broadcast loops early.
    pub shutdown_tx: watch::Sender<bool>,
}

impl TestGateway {
    pub fn new(chain_config: ChainConfig, states: Vec<BeaconState>) -> Self {
        Self::with_collaborators(
            chain_config,
            states,
            Arc::new(NullVerifier),
            RecordingBroadcaster::working(),
        )
    }

    pub fn with_collaborators(
        chain_config: ChainConfig,
        states: Vec<BeaconState>,
        verifier: Arc<dyn Verifier>,
        broadcaster: Arc<RecordingBroadcaster>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let attestation_pool = Arc::new(MemoryAttestationPool::default());
        let slashing_pool = Arc::new(MemorySlashingPool::default());
        let voluntary_exit_pool = Arc::new(MemoryVoluntaryExitPool::default());
        let bls_to_execution_change_pool = Arc::new(MemoryBlsToExecutionChangePool::default());
        let sync_committee_pool = Arc::new(MemorySyncCommitteePool::default());

        let state = GatewayState {
            chain_config: Arc::new(chain_config.clone()),
            controller: TestController::new(chain_config, states),
            verifier,
            broadcaster: broadcaster.clone(),
            attestation_pool: attestation_pool.clone(),
            slashing_pool: slashing_pool.clone(),
            voluntary_exit_pool: voluntary_exit_pool.clone(),
            bls_to_execution_change_pool: bls_to_execution_change_pool.clone(),
            sync_committee_pool: sync_committee_pool.clone(),
            operation_notifier: Arc::new(OperationNotifier::default()),
            shutdown_rx,
        };

        Self {
            state,
            broadcaster,
            attestation_pool,
            slashing_pool,
            voluntary_exit_pool,
            bls_to_execution_change_pool,
            sync_committee_pool,
            shutdown_tx,
        }
    }
}

pub fn active_validator() -> Validator {
    Validator {
        exit_epoch: FAR_FUTURE_EPOCH,
        withdrawable_epoch: FAR_FUTURE_EPOCH,
        ..Validator::default()
    }
}

pub fn state_with_validators(slot: Slot, validators: Vec<Validator>) -> BeaconState {
    BeaconState {
        slot,
        validators,
        ..BeaconState::default()
    }
}

pub fn phase0_attestation(
    slot: Slot,
    committee_index: u64,
    aggregation_bit_count: usize,
) -> Phase0Attestation<Mainnet> {
    let mut aggregation_bits = BitList::with_capacity(8).expect("length is under the limit");

    for bit in 0..aggregation_bit_count {
        aggregation_bits.set(bit, true).expect("index is in bounds");
    }

    Phase0Attestation {
        aggregation_bits,
        data: AttestationData {
            slot,
            index: committee_index,
            beacon_block_root: H256::zero(),
            source: Checkpoint::default(),
            target: Checkpoint::default(),
        },
        signature: Default::default(),
    }
}

pub fn bls_change_pubkey(validator_index: ValidatorIndex) -> PublicKeyBytes {
    let mut bytes = [0; PublicKeyBytes::SIZE];
    bytes[..8].copy_from_slice(&validator_index.to_be_bytes());
    PublicKeyBytes::new(bytes)
}

pub fn validator_with_bls_credentials(validator_index: ValidatorIndex) -> Validator {
    Validator {
        withdrawal_credentials: helper_functions::misc::bls_withdrawal_credentials(
            bls_change_pubkey(validator_index),
        ),
        ..active_validator()
    }
}

pub fn signed_bls_change(validator_index: ValidatorIndex) -> SignedBlsToExecutionChange {
    SignedBlsToExecutionChange {
        message: BlsToExecutionChange {
            validator_index,
            from_bls_pubkey: bls_change_pubkey(validator_index),
            to_execution_address: Default::default(),
        },
        signature: Default::default(),
    }
}

pub fn json(value: impl serde::Serialize) -> Value {
    serde_json::to_value(value).expect("test values always serialize")
}

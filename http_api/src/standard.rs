//! Implementation of the pool endpoints of the [Eth Beacon Node API].
//!
//! [Eth Beacon Node API]: https://ethereum.github.io/beacon-APIs/

use core::time::Duration;
use std::sync::Arc;

use anyhow::{Context as _, Error as AnyhowError, Result};
use axum::{extract::State, http::HeaderMap};
use chain::Controller;
use features::Feature;
use helper_functions::{accessors, misc, predicates, verifier::Verifier};
use itertools::Itertools as _;
use log::{error, warn};
use operation_pools::{
    AttestationPool, BlsToExecutionChangePool, SlashingPool, SyncCommitteePool,
    VoluntaryExitPool,
};
use p2p::{Broadcaster, GossipMessage};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::watch;
use transition_functions::{capella, unphased};
use types::{
    altair::containers::SyncCommitteeMessage,
    capella::containers::SignedBlsToExecutionChange,
    combined::{Attestation, AttesterSlashing},
    config::Config as ChainConfig,
    electra::containers::{
        Attestation as ElectraAttestation, AttesterSlashing as ElectraAttesterSlashing,
    },
    nonstandard::Phase,
    phase0::{
        containers::{
            Attestation as Phase0Attestation, AttestationData,
            AttesterSlashing as Phase0AttesterSlashing, ProposerSlashing, SignedVoluntaryExit,
        },
        primitives::{CommitteeIndex, Slot, SubnetId},
    },
    preset::Preset,
    state::BeaconState,
};

use crate::{
    error::{Error, IndexedError},
    events::{OperationEvent, OperationNotifier},
    extractors::{EthJson, EthQuery},
    misc::ETH_CONSENSUS_VERSION,
    response::EthResponse,
};

const BROADCAST_BLS_CHANGES_RATE_LIMIT: usize = 128;
const BROADCAST_BLS_CHANGES_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolAttestationQuery {
    slot: Option<Slot>,
    committee_index: Option<CommitteeIndex>,
}

/// `GET /eth/v1/beacon/pool/attestations`
pub async fn pool_attestations<P: Preset>(
    State(attestation_pool): State<Arc<dyn AttestationPool<P>>>,
    EthQuery(query): EthQuery<PoolAttestationQuery>,
) -> Result<EthResponse<Vec<Phase0Attestation<P>>>, Error> {
    let PoolAttestationQuery {
        slot,
        committee_index,
    } = query;

    let aggregates = attestation_pool.aggregated_attestations().await;

    let singular_attestations = attestation_pool
        .unaggregated_attestations()
        .await
        .map_err(Error::Internal)?;

    let mut attestations = vec![];

    for attestation in aggregates.into_iter().chain(singular_attestations) {
        let Attestation::Phase0(attestation) = attestation.as_ref() else {
            return Err(Error::OperationVariantMismatch);
        };

        if should_include_attestation(attestation.data, slot, committee_index) {
            attestations.push(attestation.clone());
        }
    }

    Ok(EthResponse::json(attestations))
}

/// `GET /eth/v2/beacon/pool/attestations`
pub async fn pool_attestations_v2<P: Preset>(
    State(chain_config): State<Arc<ChainConfig>>,
    State(controller): State<Arc<dyn Controller>>,
    State(attestation_pool): State<Arc<dyn AttestationPool<P>>>,
    EthQuery(query): EthQuery<PoolAttestationQuery>,
) -> Result<EthResponse<Vec<Arc<Attestation<P>>>>, Error> {
    let PoolAttestationQuery {
        slot,
        committee_index,
    } = query;

    let head_state = controller.head_state().map_err(Error::Internal)?;
    let phase = chain_config.phase_at_slot::<P>(head_state.slot());

    let aggregates = attestation_pool.aggregated_attestations().await;

    let singular_attestations = attestation_pool
        .unaggregated_attestations()
        .await
        .map_err(Error::Internal)?;

    let mut attestations = vec![];

    for attestation in aggregates.into_iter().chain(singular_attestations) {
        let expect_electra = phase >= Phase::Electra;
        let is_electra = matches!(attestation.as_ref(), Attestation::Electra(_));

        if expect_electra != is_electra {
            return Err(Error::OperationVariantMismatch);
        }

        if should_include_attestation(attestation.data(), slot, committee_index) {
            attestations.push(attestation);
        }
    }

    Ok(EthResponse::json(attestations).version(phase))
}

fn should_include_attestation(
    data: AttestationData,
    slot: Option<Slot>,
    committee_index: Option<CommitteeIndex>,
) -> bool {
    let slot_match = slot.map_or(true, |slot| data.slot == slot);
    let committee_index_match = committee_index.map_or(true, |index| data.index == index);
    slot_match && committee_index_match
}

/// `POST /eth/v1/beacon/pool/attestations`
pub async fn submit_pool_attestations<P: Preset>(
    State(controller): State<Arc<dyn Controller>>,
    State(verifier): State<Arc<dyn Verifier>>,
    State(broadcaster): State<Arc<dyn Broadcaster<P>>>,
    State(attestation_pool): State<Arc<dyn AttestationPool<P>>>,
    State(operation_notifier): State<Arc<OperationNotifier<P>>>,
    EthJson(attestations): EthJson<Vec<Value>>,
) -> Result<(), Error> {
    handle_attestations(
        controller.as_ref(),
        verifier.as_ref(),
        broadcaster.as_ref(),
        attestation_pool.as_ref(),
        &operation_notifier,
        attestations,
        Phase::Phase0,
    )
    .await
}

/// `POST /eth/v2/beacon/pool/attestations`
pub async fn submit_pool_attestations_v2<P: Preset>(
    State(controller): State<Arc<dyn Controller>>,
    State(verifier): State<Arc<dyn Verifier>>,
    State(broadcaster): State<Arc<dyn Broadcaster<P>>>,
    State(attestation_pool): State<Arc<dyn AttestationPool<P>>>,
    State(operation_notifier): State<Arc<OperationNotifier<P>>>,
    headers: HeaderMap,
    EthJson(attestations): EthJson<Vec<Value>>,
) -> Result<(), Error> {
    let phase = consensus_version_header(&headers)?;

    handle_attestations(
        controller.as_ref(),
        verifier.as_ref(),
        broadcaster.as_ref(),
        attestation_pool.as_ref(),
        &operation_notifier,
        attestations,
        phase,
    )
    .await
}

// Ingestion runs in two phases. Phase A decodes and sanity-checks every item without
// side effects, collecting failures by index, so a client can fix its whole batch at
// once. Phase B runs the side effects (notify, broadcast, insert) for the items that
// survived. The response reports broadcast failures (500) over validation failures
// (400) over success.
async fn handle_attestations<P: Preset>(
    controller: &dyn Controller,
    verifier: &dyn Verifier,
    broadcaster: &dyn Broadcaster<P>,
    attestation_pool: &dyn AttestationPool<P>,
    operation_notifier: &OperationNotifier<P>,
    json_attestations: Vec<Value>,
    phase: Phase,
) -> Result<(), Error> {
    if json_attestations.is_empty() {
        return Err(Error::EmptyBody);
    }

    let head_state = controller.head_state().map_err(Error::Internal)?;

    let (valid_attestations, failures): (Vec<_>, Vec<_>) = json_attestations
        .into_iter()
        .enumerate()
        .map(|(index, json)| {
            decode_attestation::<P>(json, phase)
                .and_then(|attestation| {
                    verifier
                        .validate_signature_encoding(attestation.signature())
                        .context("Incorrect attestation signature")?;

                    Ok((index, Arc::new(attestation)))
                })
                .map_err(|error| IndexedError { index, error })
        })
        .partition_result();

    let mut failed_broadcasts = vec![];

    for (index, attestation) in valid_attestations {
        // Only singular attestations are announced on the feed. Aggregates cannot be
        // relayed further without a selection proof.
        if !predicates::is_aggregated(&attestation) {
            operation_notifier.send(OperationEvent::UnaggregatedAttestationReceived(
                attestation.clone(),
            ));
        }

        // A post-Electra attestation with no committee bit cannot be routed at all;
        // this aborts the whole batch rather than one index.
        let committee_index = attestation
            .committee_index()
            .ok_or(Error::AttestationHasNoCommitteeBitsSet)?;

        match attestation_subnet(&head_state, &attestation, committee_index) {
            Ok(subnet_id) => {
                if let Err(error) = broadcaster
                    .broadcast_attestation(subnet_id, attestation.clone())
                    .await
                {
                    warn!("could not broadcast attestation at index {index}: {error}");
                    failed_broadcasts.push(index);
                }
            }
            Err(error) => {
                warn!("could not compute subnet for attestation at index {index}: {error}");
                failed_broadcasts.push(index);
            }
        }

        // A failed broadcast does not keep the attestation out of the pool.
        let insertion = if predicates::is_aggregated(&attestation) {
            attestation_pool.save_aggregated_attestation(attestation).await
        } else {
            attestation_pool
                .save_unaggregated_attestation(attestation)
                .await
        };

        if let Err(error) = insertion {
            error!("could not save attestation: {error}");
        }
    }

    if !failed_broadcasts.is_empty() {
        return Err(Error::AttestationsNotBroadcast(failed_broadcasts));
    }

    if !failures.is_empty() {
        return Err(Error::InvalidAttestations(failures));
    }

    Ok(())
}

fn decode_attestation<P: Preset>(json: Value, phase: Phase) -> Result<Attestation<P>> {
    let attestation = if phase >= Phase::Electra {
        serde_json::from_value::<ElectraAttestation<P>>(json).map(Into::into)
    } else {
        serde_json::from_value::<Phase0Attestation<P>>(json).map(Into::into)
    };

    attestation.context("could not convert request attestation to consensus attestation")
}

fn attestation_subnet<P: Preset>(
    state: &BeaconState,
    attestation: &Attestation<P>,
    committee_index: CommitteeIndex,
) -> Result<SubnetId> {
    let slot = attestation.data().slot;
    let epoch = misc::compute_epoch_at_slot::<P>(slot);
    let committees_per_slot = accessors::get_committee_count_per_slot::<P>(state, epoch);

    misc::compute_subnet_for_attestation::<P>(committees_per_slot, slot, committee_index)
}

/// `GET /eth/v1/beacon/pool/voluntary_exits`
pub async fn pool_voluntary_exits(
    State(voluntary_exit_pool): State<Arc<dyn VoluntaryExitPool>>,
) -> Result<EthResponse<Vec<SignedVoluntaryExit>>, Error> {
    let data = voluntary_exit_pool
        .pending_exits()
        .await
        .map_err(Error::Internal)?;

    Ok(EthResponse::json(data))
}

/// `POST /eth/v1/beacon/pool/voluntary_exits`
pub async fn submit_pool_voluntary_exit<P: Preset>(
    State(chain_config): State<Arc<ChainConfig>>,
    State(controller): State<Arc<dyn Controller>>,
    State(verifier): State<Arc<dyn Verifier>>,
    State(broadcaster): State<Arc<dyn Broadcaster<P>>>,
    State(voluntary_exit_pool): State<Arc<dyn VoluntaryExitPool>>,
    State(operation_notifier): State<Arc<OperationNotifier<P>>>,
    EthJson(signed_voluntary_exit): EthJson<Box<SignedVoluntaryExit>>,
) -> Result<(), Error> {
    let head_state = controller.head_state().map_err(Error::Internal)?;

    // Exits may name a future epoch; validity is defined against the state at that epoch.
    let epoch_start =
        misc::compute_start_slot_at_epoch::<P>(signed_voluntary_exit.message.epoch);

    let head_state = controller
        .process_slots_if_possible(head_state, epoch_start)
        .map_err(Error::UnableToProcessSlots)?;

    let validator = accessors::validator_at(&head_state, signed_voluntary_exit.message.validator_index)
        .map_err(AnyhowError::new)
        .map_err(Error::ValidatorIndexOutOfBounds)?;

    unphased::validate_voluntary_exit::<P>(
        &chain_config,
        &head_state,
        validator,
        &signed_voluntary_exit,
        verifier.as_ref(),
    )
    .map_err(Error::InvalidSignedVoluntaryExit)?;

    voluntary_exit_pool
        .insert_voluntary_exit(*signed_voluntary_exit)
        .await
        .map_err(AnyhowError::new)
        .map_err(Error::UnableToInsertIntoPool)?;

    operation_notifier.send(OperationEvent::VoluntaryExitReceived(
        signed_voluntary_exit.clone(),
    ));

    broadcaster
        .broadcast(GossipMessage::VoluntaryExit(signed_voluntary_exit))
        .await
        .map_err(Error::UnableToBroadcastVoluntaryExit)?;

    Ok(())
}

/// `POST /eth/v1/beacon/pool/sync_committees`
pub async fn submit_pool_sync_committees(
    State(sync_committee_pool): State<Arc<dyn SyncCommitteePool>>,
    EthJson(messages): EthJson<Vec<Value>>,
) -> Result<(), Error> {
    if messages.is_empty() {
        return Err(Error::EmptyBody);
    }

    let (valid_messages, failures): (Vec<_>, Vec<_>) = messages
        .into_iter()
        .enumerate()
        .map(|(index, json)| {
            serde_json::from_value::<SyncCommitteeMessage>(json)
                .context("could not convert request message to consensus message")
                .map_err(|error| IndexedError { index, error })
        })
        .partition_result();

    // The core service owns validation and relay of sync committee messages;
    // its first refusal aborts the request.
    for message in valid_messages {
        sync_committee_pool
            .submit_sync_committee_message(message)
            .await
            .map_err(Error::UnableToSubmitSyncCommitteeMessage)?;
    }

    if !failures.is_empty() {
        return Err(Error::InvalidSyncCommitteeMessages(failures));
    }

    Ok(())
}

/// `GET /eth/v1/beacon/pool/bls_to_execution_changes`
pub async fn pool_bls_to_execution_changes(
    State(bls_to_execution_change_pool): State<Arc<dyn BlsToExecutionChangePool>>,
) -> Result<EthResponse<Vec<SignedBlsToExecutionChange>>, Error> {
    let data = bls_to_execution_change_pool
        .pending_bls_to_execution_changes()
        .await
        .map_err(Error::Internal)?;

    Ok(EthResponse::json(data))
}

/// `POST /eth/v1/beacon/pool/bls_to_execution_changes`
pub async fn submit_pool_bls_to_execution_change<P: Preset>(
    State(chain_config): State<Arc<ChainConfig>>,
    State(controller): State<Arc<dyn Controller>>,
    State(verifier): State<Arc<dyn Verifier>>,
    State(broadcaster): State<Arc<dyn Broadcaster<P>>>,
    State(bls_to_execution_change_pool): State<Arc<dyn BlsToExecutionChangePool>>,
    State(operation_notifier): State<Arc<OperationNotifier<P>>>,
    State(shutdown_rx): State<watch::Receiver<bool>>,
    EthJson(changes): EthJson<Vec<Value>>,
) -> Result<(), Error> {
    if changes.is_empty() {
        return Err(Error::EmptyBody);
    }

    let head_state = controller.head_state().map_err(Error::Internal)?;
    let phase = chain_config.phase_at_slot::<P>(head_state.slot());

    let mut failures = vec![];
    let mut to_broadcast = vec![];

    for (index, json) in changes.into_iter().enumerate() {
        let result = serde_json::from_value::<SignedBlsToExecutionChange>(json)
            .context("unable to decode signed BLS to execution change")
            .and_then(|signed_change| {
                capella::validate_bls_to_execution_change(&head_state, &signed_change)
                    .context("could not validate BLS to execution change")?;

                capella::verify_bls_to_execution_change_signature(
                    &chain_config,
                    &head_state,
                    &signed_change,
                    verifier.as_ref(),
                )
                .context("could not validate signature")?;

                Ok(signed_change)
            });

        match result {
            Ok(signed_change) => {
                operation_notifier.send(OperationEvent::BlsToExecutionChangeReceived(Box::new(
                    signed_change,
                )));

                if let Err(error) = bls_to_execution_change_pool
                    .insert_bls_to_execution_change(signed_change)
                    .await
                {
                    error!("could not insert BLS to execution change into pool: {error}");
                }

                // Gossip for address changes only exists from Capella on.
                if phase >= Phase::Capella {
                    to_broadcast.push(signed_change);
                }
            }
            Err(error) => failures.push(IndexedError { index, error }),
        }
    }

    // The batch is released in the background after the response returns.
    // Request cancellation must not reach it, only server shutdown does.
    tokio::spawn(broadcast_bls_changes(
        controller,
        broadcaster,
        shutdown_rx,
        to_broadcast,
    ));

    if !failures.is_empty() {
        return Err(Error::InvalidSignedBlsToExecutionChanges(failures));
    }

    Ok(())
}

/// Publishes a staged batch of address changes in rate-limited chunks, re-validating
/// every change against the then-current head state just before sending. A change that
/// has become invalid is dropped from the batch without being re-broadcast but stays
/// in the pool. This is a one-shot release of the submitted batch; it never re-reads
/// the pool.
async fn broadcast_bls_changes<P: Preset>(
    controller: Arc<dyn Controller>,
    broadcaster: Arc<dyn Broadcaster<P>>,
    mut shutdown_rx: watch::Receiver<bool>,
    mut changes: Vec<SignedBlsToExecutionChange>,
) {
    broadcast_bls_batch(controller.as_ref(), broadcaster.as_ref(), &mut changes).await;

    while !changes.is_empty() {
        tokio::select! {
            _ = shutdown_rx.changed() => return,
            () = tokio::time::sleep(BROADCAST_BLS_CHANGES_INTERVAL) => {
                broadcast_bls_batch(controller.as_ref(), broadcaster.as_ref(), &mut changes).await;
            }
        }
    }
}

async fn broadcast_bls_batch<P: Preset>(
    controller: &dyn Controller,
    broadcaster: &dyn Broadcaster<P>,
    changes: &mut Vec<SignedBlsToExecutionChange>,
) {
    let limit = changes.len().min(BROADCAST_BLS_CHANGES_RATE_LIMIT);

    let head_state = match controller.head_state() {
        Ok(state) => state,
        Err(error) => {
            error!("could not get head state: {error}");
            return;
        }
    };

    for signed_change in changes.drain(..limit) {
        // A change may have been included in a block since it was staged.
        if let Err(error) = capella::validate_bls_to_execution_change(&head_state, &signed_change)
        {
            warn!("could not validate BLS to execution change: {error}");
            continue;
        }

        if let Err(error) = broadcaster
            .broadcast(GossipMessage::SignedBlsToExecutionChange(Box::new(
                signed_change,
            )))
            .await
        {
            warn!("could not broadcast BLS to execution change: {error}");
        }
    }
}

/// `GET /eth/v1/beacon/pool/attester_slashings`
pub async fn pool_attester_slashings<P: Preset>(
    State(controller): State<Arc<dyn Controller>>,
    State(slashing_pool): State<Arc<dyn SlashingPool<P>>>,
) -> Result<EthResponse<Vec<Phase0AttesterSlashing>>, Error> {
    let head_state = controller.head_state().map_err(Error::Internal)?;

    let slashings = slashing_pool
        .pending_attester_slashings(&head_state, true)
        .await;

    slashings
        .into_iter()
        .map(|slashing| match slashing {
            AttesterSlashing::Phase0(slashing) => Ok(slashing),
            AttesterSlashing::Electra(_) => Err(Error::OperationVariantMismatch),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(EthResponse::json)
}

/// `GET /eth/v2/beacon/pool/attester_slashings`
pub async fn pool_attester_slashings_v2<P: Preset>(
    State(chain_config): State<Arc<ChainConfig>>,
    State(controller): State<Arc<dyn Controller>>,
    State(slashing_pool): State<Arc<dyn SlashingPool<P>>>,
) -> Result<EthResponse<Vec<AttesterSlashing>>, Error> {
    let head_state = controller.head_state().map_err(Error::Internal)?;
    let phase = chain_config.phase_at_slot::<P>(head_state.slot());

    let slashings = slashing_pool
        .pending_attester_slashings(&head_state, true)
        .await;

    for slashing in &slashings {
        let expect_electra = phase >= Phase::Electra;
        let is_electra = matches!(slashing, AttesterSlashing::Electra(_));

        if expect_electra != is_electra {
            return Err(Error::OperationVariantMismatch);
        }
    }

    Ok(EthResponse::json(slashings).version(phase))
}

/// `POST /eth/v1/beacon/pool/attester_slashings`
pub async fn submit_pool_attester_slashing<P: Preset>(
    State(chain_config): State<Arc<ChainConfig>>,
    State(controller): State<Arc<dyn Controller>>,
    State(verifier): State<Arc<dyn Verifier>>,
    State(broadcaster): State<Arc<dyn Broadcaster<P>>>,
    State(slashing_pool): State<Arc<dyn SlashingPool<P>>>,
    State(operation_notifier): State<Arc<OperationNotifier<P>>>,
    EthJson(attester_slashing): EthJson<Box<Phase0AttesterSlashing>>,
) -> Result<(), Error> {
    submit_attester_slashing(
        &chain_config,
        controller.as_ref(),
        verifier.as_ref(),
        broadcaster.as_ref(),
        slashing_pool.as_ref(),
        &operation_notifier,
        AttesterSlashing::Phase0(*attester_slashing),
    )
    .await
}

/// `POST /eth/v2/beacon/pool/attester_slashings`
pub async fn submit_pool_attester_slashing_v2<P: Preset>(
    State(chain_config): State<Arc<ChainConfig>>,
    State(controller): State<Arc<dyn Controller>>,
    State(verifier): State<Arc<dyn Verifier>>,
    State(broadcaster): State<Arc<dyn Broadcaster<P>>>,
    State(slashing_pool): State<Arc<dyn SlashingPool<P>>>,
    State(operation_notifier): State<Arc<OperationNotifier<P>>>,
    headers: HeaderMap,
    EthJson(json): EthJson<Value>,
) -> Result<(), Error> {
    let phase = consensus_version_header(&headers)?;

    let attester_slashing = if phase >= Phase::Electra {
        serde_json::from_value::<ElectraAttesterSlashing>(json).map(AttesterSlashing::Electra)
    } else {
        serde_json::from_value::<Phase0AttesterSlashing>(json).map(AttesterSlashing::Phase0)
    }
    .map_err(AnyhowError::new)
    .map_err(Error::InvalidAttesterSlashing)?;

    submit_attester_slashing(
        &chain_config,
        controller.as_ref(),
        verifier.as_ref(),
        broadcaster.as_ref(),
        slashing_pool.as_ref(),
        &operation_notifier,
        attester_slashing,
    )
    .await
}

async fn submit_attester_slashing<P: Preset>(
    chain_config: &ChainConfig,
    controller: &dyn Controller,
    verifier: &dyn Verifier,
    broadcaster: &dyn Broadcaster<P>,
    slashing_pool: &dyn SlashingPool<P>,
    operation_notifier: &OperationNotifier<P>,
    attester_slashing: AttesterSlashing,
) -> Result<(), Error> {
    let head_state = controller.head_state().map_err(Error::Internal)?;

    let head_state = controller
        .process_slots_if_possible(head_state, attester_slashing.slot())
        .map_err(Error::UnableToProcessSlots)?;

    unphased::validate_attester_slashing::<P>(
        chain_config,
        &head_state,
        &attester_slashing,
        verifier,
    )
    .map_err(Error::InvalidAttesterSlashing)?;

    slashing_pool
        .insert_attester_slashing(&head_state, attester_slashing.clone())
        .await
        .map_err(AnyhowError::new)
        .map_err(Error::UnableToInsertIntoPool)?;

    operation_notifier.send(OperationEvent::AttesterSlashingReceived(Box::new(
        attester_slashing.clone(),
    )));

    if !Feature::DisableBroadcastSlashings.is_enabled() {
        broadcaster
            .broadcast(GossipMessage::AttesterSlashing(Box::new(attester_slashing)))
            .await
            .map_err(Error::UnableToBroadcastSlashing)?;
    }

    Ok(())
}

/// `GET /eth/v1/beacon/pool/proposer_slashings`
pub async fn pool_proposer_slashings<P: Preset>(
    State(controller): State<Arc<dyn Controller>>,
    State(slashing_pool): State<Arc<dyn SlashingPool<P>>>,
) -> Result<EthResponse<Vec<ProposerSlashing>>, Error> {
    let head_state = controller.head_state().map_err(Error::Internal)?;

    let data = slashing_pool
        .pending_proposer_slashings(&head_state, true)
        .await;

    Ok(EthResponse::json(data))
}

/// `POST /eth/v1/beacon/pool/proposer_slashings`
pub async fn submit_pool_proposer_slashing<P: Preset>(
    State(chain_config): State<Arc<ChainConfig>>,
    State(controller): State<Arc<dyn Controller>>,
    State(verifier): State<Arc<dyn Verifier>>,
    State(broadcaster): State<Arc<dyn Broadcaster<P>>>,
    State(slashing_pool): State<Arc<dyn SlashingPool<P>>>,
    State(operation_notifier): State<Arc<OperationNotifier<P>>>,
    EthJson(proposer_slashing): EthJson<Box<ProposerSlashing>>,
) -> Result<(), Error> {
    let head_state = controller.head_state().map_err(Error::Internal)?;

    let head_state = controller
        .process_slots_if_possible(head_state, proposer_slashing.signed_header_1.message.slot)
        .map_err(Error::UnableToProcessSlots)?;

    unphased::validate_proposer_slashing::<P>(
        &chain_config,
        &head_state,
        &proposer_slashing,
        verifier.as_ref(),
    )
    .map_err(Error::InvalidProposerSlashing)?;

    slashing_pool
        .insert_proposer_slashing(&head_state, *proposer_slashing)
        .await
        .map_err(AnyhowError::new)
        .map_err(Error::UnableToInsertIntoPool)?;

    operation_notifier.send(OperationEvent::ProposerSlashingReceived(
        proposer_slashing.clone(),
    ));

    if !Feature::DisableBroadcastSlashings.is_enabled() {
        broadcaster
            .broadcast(GossipMessage::ProposerSlashing(proposer_slashing))
            .await
            .map_err(Error::UnableToBroadcastSlashing)?;
    }

    Ok(())
}

fn consensus_version_header(headers: &HeaderMap) -> Result<Phase, Error> {
    let header_value = headers
        .get(ETH_CONSENSUS_VERSION)
        .ok_or(Error::MissingConsensusVersionHeader)?;

    let version = header_value
        .to_str()
        .map_err(|_| Error::UnknownConsensusVersion {
            version: format!("{header_value:?}"),
        })?;

    version.parse().map_err(|_| Error::UnknownConsensusVersion {
        version: version.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use bls::SignatureBytes;
    use itertools::Itertools as _;
    use serial_test::serial;
    use ssz_types::{BitList, BitVector};
    use tokio::time::Instant;
    use types::{
        phase0::containers::{
            BeaconBlockHeader, Checkpoint, IndexedAttestation, SignedBeaconBlockHeader,
            VoluntaryExit,
        },
        phase0::primitives::H256,
        preset::Mainnet,
    };
    use tower::ServiceExt as _;

    use crate::{context::*, routing};

    use super::*;

    fn mainnet_config(up_to: Phase) -> ChainConfig {
        ChainConfig::all_forks_at_genesis(up_to)
    }

    fn phase0_gateway(validator_count: usize) -> TestGateway {
        let state = state_with_validators(0, vec![active_validator(); validator_count]);
        TestGateway::new(mainnet_config(Phase::Phase0), vec![state])
    }

    async fn submit_attestations(
        gateway: &TestGateway,
        items: Vec<Value>,
    ) -> Result<(), Error> {
        submit_pool_attestations::<Mainnet>(
            State(gateway.state.controller.clone()),
            State(gateway.state.verifier.clone()),
            State(gateway.state.broadcaster.clone()),
            State(gateway.state.attestation_pool.clone()),
            State(gateway.state.operation_notifier.clone()),
            EthJson(items),
        )
        .await
    }

    async fn submit_attestations_v2(
        gateway: &TestGateway,
        headers: HeaderMap,
        items: Vec<Value>,
    ) -> Result<(), Error> {
        submit_pool_attestations_v2::<Mainnet>(
            State(gateway.state.controller.clone()),
            State(gateway.state.verifier.clone()),
            State(gateway.state.broadcaster.clone()),
            State(gateway.state.attestation_pool.clone()),
            State(gateway.state.operation_notifier.clone()),
            headers,
            EthJson(items),
        )
        .await
    }

    async fn submit_voluntary_exit(
        gateway: &TestGateway,
        exit: SignedVoluntaryExit,
    ) -> Result<(), Error> {
        submit_pool_voluntary_exit::<Mainnet>(
            State(gateway.state.chain_config.clone()),
            State(gateway.state.controller.clone()),
            State(gateway.state.verifier.clone()),
            State(gateway.state.broadcaster.clone()),
            State(gateway.state.voluntary_exit_pool.clone()),
            State(gateway.state.operation_notifier.clone()),
            EthJson(Box::new(exit)),
        )
        .await
    }

    async fn submit_bls_changes(gateway: &TestGateway, items: Vec<Value>) -> Result<(), Error> {
        submit_pool_bls_to_execution_change::<Mainnet>(
            State(gateway.state.chain_config.clone()),
            State(gateway.state.controller.clone()),
            State(gateway.state.verifier.clone()),
            State(gateway.state.broadcaster.clone()),
            State(gateway.state.bls_to_execution_change_pool.clone()),
            State(gateway.state.operation_notifier.clone()),
            State(gateway.state.shutdown_rx.clone()),
            EthJson(items),
        )
        .await
    }

    async fn submit_attester_slashing_v1(
        gateway: &TestGateway,
        slashing: Phase0AttesterSlashing,
    ) -> Result<(), Error> {
        submit_pool_attester_slashing::<Mainnet>(
            State(gateway.state.chain_config.clone()),
            State(gateway.state.controller.clone()),
            State(gateway.state.verifier.clone()),
            State(gateway.state.broadcaster.clone()),
            State(gateway.state.slashing_pool.clone()),
            State(gateway.state.operation_notifier.clone()),
            EthJson(Box::new(slashing)),
        )
        .await
    }

    fn voluntary_exit(validator_index: u64, epoch: u64) -> SignedVoluntaryExit {
        SignedVoluntaryExit {
            message: VoluntaryExit {
                epoch,
                validator_index,
            },
            signature: Default::default(),
        }
    }

    fn indexed_attestation(indices: Vec<u64>, target_root_byte: u8) -> IndexedAttestation {
        IndexedAttestation {
            attesting_indices: indices,
            data: AttestationData {
                target: Checkpoint {
                    epoch: 0,
                    root: H256::repeat_byte(target_root_byte),
                },
                ..AttestationData::default()
            },
            signature: Default::default(),
        }
    }

    fn phase0_attester_slashing(indices: Vec<u64>) -> Phase0AttesterSlashing {
        Phase0AttesterSlashing {
            attestation_1: indexed_attestation(indices.clone(), 1),
            attestation_2: indexed_attestation(indices, 2),
        }
    }

    fn electra_attestation(slot: Slot, committee_bit: usize) -> ElectraAttestation<Mainnet> {
        let mut aggregation_bits = BitList::with_capacity(8).expect("length is under the limit");
        aggregation_bits.set(0, true).expect("index is in bounds");

        let mut committee_bits = BitVector::new();
        committee_bits
            .set(committee_bit, true)
            .expect("index is in bounds");

        ElectraAttestation {
            aggregation_bits,
            data: AttestationData {
                slot,
                ..AttestationData::default()
            },
            signature: Default::default(),
            committee_bits,
        }
    }

    fn version_headers(version: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ETH_CONSENSUS_VERSION,
            version.try_into().expect("version strings are valid header values"),
        );
        headers
    }

    #[tokio::test]
    async fn empty_attestation_batch_is_rejected_without_side_effects() {
        let gateway = phase0_gateway(64);
        let mut events = gateway.state.operation_notifier.subscribe();

        let result = submit_attestations(&gateway, vec![]).await;

        assert!(matches!(result, Err(Error::EmptyBody)));
        assert!(gateway.attestation_pool.aggregated_attestations().await.is_empty());

        assert!(gateway
            .attestation_pool
            .unaggregated_attestations()
            .await
            .expect("snapshots of the in-memory pool are infallible")
            .is_empty());

        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn valid_attestations_survive_an_invalid_neighbor() {
        let bad_signature = SignatureBytes::new([0xff; SignatureBytes::SIZE]);

        let gateway = TestGateway::with_collaborators(
            mainnet_config(Phase::Phase0),
            vec![state_with_validators(0, vec![active_validator(); 64])],
            Arc::new(RejectingEncodingVerifier {
                invalid: bad_signature,
            }),
            RecordingBroadcaster::working(),
        );

        let mut events = gateway.state.operation_notifier.subscribe();

        let valid = phase0_attestation(0, 0, 1);
        let mut invalid = phase0_attestation(0, 0, 1);
        invalid.signature = bad_signature;

        let result =
            submit_attestations(&gateway, vec![json(valid.clone()), json(invalid)]).await;

        let Err(Error::InvalidAttestations(failures)) = result else {
            panic!("the batch contains an invalid attestation");
        };

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, 1);

        assert!(format!("{:#}", failures[0].error)
            .starts_with("Incorrect attestation signature"));

        let staged = gateway
            .attestation_pool
            .unaggregated_attestations()
            .await
            .expect("snapshots of the in-memory pool are infallible");

        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].as_ref(), &Attestation::Phase0(valid.clone()));

        let broadcasts = gateway
            .broadcaster
            .attestations
            .lock()
            .expect("no test panics while holding the lock")
            .clone();

        assert_eq!(broadcasts.len(), 1);
        assert_eq!(broadcasts[0].0, 0);
        assert_eq!(broadcasts[0].1.as_ref(), &Attestation::Phase0(valid));

        assert!(matches!(
            events.try_recv(),
            Ok(OperationEvent::UnaggregatedAttestationReceived(_)),
        ));
    }

    #[tokio::test]
    async fn broadcast_failure_dominates_and_the_attestation_is_still_staged() {
        let gateway = TestGateway::with_collaborators(
            mainnet_config(Phase::Phase0),
            vec![state_with_validators(0, vec![active_validator(); 64])],
            Arc::new(helper_functions::verifier::NullVerifier),
            RecordingBroadcaster::failing(),
        );

        let result =
            submit_attestations(&gateway, vec![json(phase0_attestation(0, 0, 1))]).await;

        assert!(matches!(
            result,
            Err(Error::AttestationsNotBroadcast(indices)) if indices == [0],
        ));

        let staged = gateway
            .attestation_pool
            .unaggregated_attestations()
            .await
            .expect("snapshots of the in-memory pool are infallible");

        assert_eq!(staged.len(), 1);
    }

    #[tokio::test]
    async fn aggregated_attestations_are_staged_separately_and_not_announced() {
        let gateway = phase0_gateway(64);
        let mut events = gateway.state.operation_notifier.subscribe();

        submit_attestations(&gateway, vec![json(phase0_attestation(0, 0, 3))])
            .await
            .expect("the attestation is valid");

        assert_eq!(gateway.attestation_pool.aggregated_attestations().await.len(), 1);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn v2_submission_requires_the_version_header() {
        let gateway = phase0_gateway(64);

        let result = submit_attestations_v2(
            &gateway,
            HeaderMap::new(),
            vec![json(phase0_attestation(0, 0, 1))],
        )
        .await;

        assert!(matches!(result, Err(Error::MissingConsensusVersionHeader)));
    }

    #[tokio::test]
    async fn v2_submission_rejects_an_unknown_version() {
        let gateway = phase0_gateway(64);

        let result = submit_attestations_v2(
            &gateway,
            version_headers("shanghai"),
            vec![json(phase0_attestation(0, 0, 1))],
        )
        .await;

        assert!(matches!(
            result,
            Err(Error::UnknownConsensusVersion { version }) if version == "shanghai",
        ));
    }

    #[tokio::test]
    async fn v2_submission_routes_electra_attestations_by_committee_bits() {
        let state = state_with_validators(0, vec![active_validator(); 64]);
        let gateway = TestGateway::new(mainnet_config(Phase::Electra), vec![state]);

        submit_attestations_v2(
            &gateway,
            version_headers("electra"),
            vec![json(electra_attestation(0, 0))],
        )
        .await
        .expect("the attestation is valid");

        let broadcasts = gateway
            .broadcaster
            .attestations
            .lock()
            .expect("no test panics while holding the lock")
            .clone();

        assert_eq!(broadcasts.len(), 1);
        assert_eq!(broadcasts[0].0, 0);
    }

    #[tokio::test]
    async fn v2_submission_aborts_on_an_electra_attestation_with_no_committee_bits() {
        let state = state_with_validators(0, vec![active_validator(); 64]);
        let gateway = TestGateway::new(mainnet_config(Phase::Electra), vec![state]);

        let mut attestation = electra_attestation(0, 0);
        attestation.committee_bits = BitVector::new();

        let result = submit_attestations_v2(
            &gateway,
            version_headers("electra"),
            vec![json(attestation)],
        )
        .await;

        assert!(matches!(result, Err(Error::AttestationHasNoCommitteeBitsSet)));
    }

    #[tokio::test]
    async fn attestation_listing_filters_by_slot_and_committee_index() {
        let gateway = phase0_gateway(64);

        for (slot, index) in [(0, 0), (0, 1), (5, 0)] {
            gateway
                .attestation_pool
                .save_unaggregated_attestation(Arc::new(Attestation::Phase0(
                    phase0_attestation(slot, index, 1),
                )))
                .await
                .expect("the pool has capacity");
        }

        let response = pool_attestations::<Mainnet>(
            State(gateway.state.attestation_pool.clone()),
            EthQuery(PoolAttestationQuery {
                slot: Some(0),
                committee_index: Some(0),
            }),
        )
        .await
        .expect("every staged attestation is a base attestation");

        assert_eq!(json(response)["data"].as_array().map(Vec::len), Some(1));

        let response = pool_attestations::<Mainnet>(
            State(gateway.state.attestation_pool.clone()),
            EthQuery(PoolAttestationQuery {
                slot: None,
                committee_index: None,
            }),
        )
        .await
        .expect("every staged attestation is a base attestation");

        assert_eq!(json(response)["data"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn v1_attestation_listing_rejects_post_electra_entries() {
        let gateway = phase0_gateway(64);

        gateway
            .attestation_pool
            .save_unaggregated_attestation(Arc::new(Attestation::Electra(
                electra_attestation(0, 0),
            )))
            .await
            .expect("the pool has capacity");

        let result = pool_attestations::<Mainnet>(
            State(gateway.state.attestation_pool.clone()),
            EthQuery(PoolAttestationQuery {
                slot: None,
                committee_index: None,
            }),
        )
        .await;

        assert!(matches!(result, Err(Error::OperationVariantMismatch)));
    }

    #[tokio::test]
    async fn voluntary_exit_is_validated_against_the_advanced_state_and_published() {
        let config = mainnet_config(Phase::Phase0);
        let exit_epoch = config.shard_committee_period + 10;

        // The head lags behind the exit epoch; validation must advance the state.
        let state = state_with_validators(0, vec![active_validator()]);
        let gateway = TestGateway::new(config, vec![state]);
        let mut events = gateway.state.operation_notifier.subscribe();

        submit_voluntary_exit(&gateway, voluntary_exit(0, exit_epoch))
            .await
            .expect("the exit is valid at its epoch");

        assert_eq!(
            gateway
                .voluntary_exit_pool
                .pending_exits()
                .await
                .expect("snapshots of the in-memory pool are infallible")
                .len(),
            1,
        );

        assert!(matches!(
            events.try_recv(),
            Ok(OperationEvent::VoluntaryExitReceived(_)),
        ));

        let messages = gateway
            .broadcaster
            .messages
            .lock()
            .expect("no test panics while holding the lock")
            .clone();

        assert!(matches!(
            messages.as_slice(),
            [(GossipMessage::VoluntaryExit(_), _)],
        ));
    }

    #[tokio::test]
    async fn voluntary_exit_for_an_unknown_validator_is_a_client_error() {
        let gateway = phase0_gateway(1);

        let result = submit_voluntary_exit(&gateway, voluntary_exit(99, 0)).await;

        assert!(matches!(result, Err(Error::ValidatorIndexOutOfBounds(_))));
    }

    #[tokio::test]
    async fn invalid_voluntary_exit_is_rejected_without_side_effects() {
        // The validator has not been active for shard_committee_period epochs.
        let gateway = phase0_gateway(1);

        let result = submit_voluntary_exit(&gateway, voluntary_exit(0, 0)).await;

        assert!(matches!(result, Err(Error::InvalidSignedVoluntaryExit(_))));

        assert!(gateway
            .voluntary_exit_pool
            .pending_exits()
            .await
            .expect("snapshots of the in-memory pool are infallible")
            .is_empty());

        assert!(gateway
            .broadcaster
            .messages
            .lock()
            .expect("no test panics while holding the lock")
            .is_empty());
    }

    #[tokio::test]
    async fn sync_committee_messages_report_conversion_failures_by_index() {
        let gateway = phase0_gateway(1);

        let message = SyncCommitteeMessage {
            slot: 0,
            beacon_block_root: H256::zero(),
            validator_index: 0,
            signature: Default::default(),
        };

        let result = submit_pool_sync_committees(
            State(gateway.state.sync_committee_pool.clone()),
            EthJson(vec![json(message), json("not a message")]),
        )
        .await;

        let Err(Error::InvalidSyncCommitteeMessages(failures)) = result else {
            panic!("the batch contains a malformed message");
        };

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, 1);
        assert_eq!(gateway.sync_committee_pool.messages().await.len(), 1);
    }

    #[tokio::test]
    async fn sync_committee_refusal_aborts_the_request() {
        let message = SyncCommitteeMessage {
            slot: 0,
            beacon_block_root: H256::zero(),
            validator_index: 0,
            signature: Default::default(),
        };

        let result = submit_pool_sync_committees(
            State(Arc::new(RejectingSyncCommitteePool) as Arc<dyn SyncCommitteePool>),
            EthJson(vec![json(message)]),
        )
        .await;

        assert!(matches!(
            result,
            Err(Error::UnableToSubmitSyncCommitteeMessage(
                operation_pools::SyncCommitteeError::Rejected(_),
            )),
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_bls_broadcast_is_rate_limited_and_revalidated() {
        let validators = (0..300).map(validator_with_bls_credentials).collect_vec();

        let head = state_with_validators(0, validators.clone());

        // Validator 280's change lands in the last batch and is invalidated
        // before that batch is released.
        let mut rotated = validators;
        rotated[280].withdrawal_credentials = H256::repeat_byte(0x01);
        let later_head = state_with_validators(0, rotated);

        let gateway = TestGateway::new(
            mainnet_config(Phase::Capella),
            vec![head.clone(), head.clone(), head, later_head],
        );

        let changes = (0..300).map(|index| json(signed_bls_change(index))).collect();

        submit_bls_changes(&gateway, changes)
            .await
            .expect("every change is valid at submission");

        assert_eq!(
            gateway
                .bls_to_execution_change_pool
                .pending_bls_to_execution_changes()
                .await
                .expect("snapshots of the in-memory pool are infallible")
                .len(),
            300,
        );

        let start = Instant::now();
        tokio::time::sleep(Duration::from_secs(2)).await;

        let broadcasts = gateway.broadcaster.broadcast_bls_change_indices();

        let batch_sizes = broadcasts
            .iter()
            .counts_by(|(_, instant)| instant.duration_since(start).as_millis());

        assert_eq!(batch_sizes.get(&0), Some(&128));
        assert_eq!(batch_sizes.get(&500), Some(&128));
        assert_eq!(batch_sizes.get(&1000), Some(&43));

        assert!(broadcasts.iter().all(|(index, _)| *index != 280));

        // The invalidated change is dropped from the batch but stays in the pool.
        assert_eq!(
            gateway
                .bls_to_execution_change_pool
                .pending_bls_to_execution_changes()
                .await
                .expect("snapshots of the in-memory pool are infallible")
                .len(),
            300,
        );
    }

    #[tokio::test(start_paused = true)]
    async fn bls_changes_are_staged_but_not_broadcast_before_capella() {
        let state = state_with_validators(0, vec![validator_with_bls_credentials(0)]);
        let gateway = TestGateway::new(mainnet_config(Phase::Bellatrix), vec![state]);

        submit_bls_changes(&gateway, vec![json(signed_bls_change(0))])
            .await
            .expect("the change is valid");

        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(
            gateway
                .bls_to_execution_change_pool
                .pending_bls_to_execution_changes()
                .await
                .expect("snapshots of the in-memory pool are infallible")
                .len(),
            1,
        );

        assert!(gateway.broadcaster.broadcast_bls_change_indices().is_empty());
    }

    #[tokio::test]
    async fn invalid_bls_changes_are_reported_by_index_and_valid_ones_staged() {
        let state = state_with_validators(
            0,
            vec![
                validator_with_bls_credentials(0),
                validator_with_bls_credentials(1),
            ],
        );

        let gateway = TestGateway::new(mainnet_config(Phase::Capella), vec![state]);

        let mut mismatched = signed_bls_change(1);
        mismatched.message.from_bls_pubkey = bls_change_pubkey(42);

        let result = submit_bls_changes(
            &gateway,
            vec![json(signed_bls_change(0)), json(mismatched)],
        )
        .await;

        let Err(Error::InvalidSignedBlsToExecutionChanges(failures)) = result else {
            panic!("the batch contains an invalid change");
        };

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, 1);

        assert_eq!(
            gateway
                .bls_to_execution_change_pool
                .pending_bls_to_execution_changes()
                .await
                .expect("snapshots of the in-memory pool are infallible")
                .len(),
            1,
        );
    }

    #[tokio::test]
    #[serial]
    async fn attester_slashing_is_staged_notified_and_published() {
        let gateway = phase0_gateway(2);
        let mut events = gateway.state.operation_notifier.subscribe();

        submit_attester_slashing_v1(&gateway, phase0_attester_slashing(vec![0, 1]))
            .await
            .expect("the slashing is valid");

        let head_state = gateway
            .state
            .controller
            .head_state()
            .expect("the test controller always has a head state");

        assert_eq!(
            gateway
                .slashing_pool
                .pending_attester_slashings(&head_state, true)
                .await
                .len(),
            1,
        );

        assert!(matches!(
            events.try_recv(),
            Ok(OperationEvent::AttesterSlashingReceived(_)),
        ));

        let messages = gateway
            .broadcaster
            .messages
            .lock()
            .expect("no test panics while holding the lock")
            .clone();

        assert!(matches!(
            messages.as_slice(),
            [(GossipMessage::AttesterSlashing(_), _)],
        ));
    }

    #[tokio::test]
    #[serial]
    async fn disabling_slashing_broadcasts_only_suppresses_gossip() {
        let gateway = phase0_gateway(2);

        Feature::DisableBroadcastSlashings.enable();

        let result =
            submit_attester_slashing_v1(&gateway, phase0_attester_slashing(vec![0, 1])).await;

        Feature::DisableBroadcastSlashings.disable();

        result.expect("the slashing is valid");

        let head_state = gateway
            .state
            .controller
            .head_state()
            .expect("the test controller always has a head state");

        assert_eq!(
            gateway
                .slashing_pool
                .pending_attester_slashings(&head_state, true)
                .await
                .len(),
            1,
        );

        assert!(gateway
            .broadcaster
            .messages
            .lock()
            .expect("no test panics while holding the lock")
            .is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn proposer_slashing_round_trips_through_submission_and_listing() {
        let gateway = phase0_gateway(1);

        let header = |body_root_byte| SignedBeaconBlockHeader {
            message: BeaconBlockHeader {
                slot: 0,
                proposer_index: 0,
                body_root: H256::repeat_byte(body_root_byte),
                ..BeaconBlockHeader::default()
            },
            signature: Default::default(),
        };

        let slashing = ProposerSlashing {
            signed_header_1: header(1),
            signed_header_2: header(2),
        };

        submit_pool_proposer_slashing::<Mainnet>(
            State(gateway.state.chain_config.clone()),
            State(gateway.state.controller.clone()),
            State(gateway.state.verifier.clone()),
            State(gateway.state.broadcaster.clone()),
            State(gateway.state.slashing_pool.clone()),
            State(gateway.state.operation_notifier.clone()),
            EthJson(Box::new(slashing)),
        )
        .await
        .expect("the slashing is valid");

        let response = pool_proposer_slashings::<Mainnet>(
            State(gateway.state.controller.clone()),
            State(gateway.state.slashing_pool.clone()),
        )
        .await
        .expect("listing proposer slashings is infallible");

        assert_eq!(json(response)["data"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    #[serial]
    async fn v2_slashing_submission_decodes_the_variant_from_the_header() {
        let state = state_with_validators(0, vec![active_validator(); 2]);
        let gateway = TestGateway::new(mainnet_config(Phase::Electra), vec![state]);

        let slashing = ElectraAttesterSlashing {
            attestation_1: indexed_attestation(vec![0, 1], 1),
            attestation_2: indexed_attestation(vec![0, 1], 2),
        };

        submit_pool_attester_slashing_v2::<Mainnet>(
            State(gateway.state.chain_config.clone()),
            State(gateway.state.controller.clone()),
            State(gateway.state.verifier.clone()),
            State(gateway.state.broadcaster.clone()),
            State(gateway.state.slashing_pool.clone()),
            State(gateway.state.operation_notifier.clone()),
            version_headers("electra"),
            EthJson(json(slashing)),
        )
        .await
        .expect("the slashing is valid");

        let head_state = gateway
            .state
            .controller
            .head_state()
            .expect("the test controller always has a head state");

        let pending = gateway
            .slashing_pool
            .pending_attester_slashings(&head_state, true)
            .await;

        assert!(matches!(pending.as_slice(), [AttesterSlashing::Electra(_)]));
    }

    #[tokio::test]
    async fn v2_slashing_listing_annotates_the_pre_electra_fork() {
        let state = state_with_validators(0, vec![active_validator(); 2]);
        let gateway = TestGateway::new(mainnet_config(Phase::Deneb), vec![state.clone()]);

        gateway
            .slashing_pool
            .insert_attester_slashing(
                &state,
                AttesterSlashing::Phase0(phase0_attester_slashing(vec![0, 1])),
            )
            .await
            .expect("the pool has capacity");

        let router = routing::gateway_routes(gateway.state.clone());

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/eth/v2/beacon/pool/attester_slashings")
                    .body(Body::empty())
                    .expect("the request is well-formed"),
            )
            .await
            .expect("the router always responds");

        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(
            response
                .headers()
                .get(ETH_CONSENSUS_VERSION)
                .and_then(|value| value.to_str().ok()),
            Some("deneb"),
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("the body is small");

        let body: Value = serde_json::from_slice(&bytes).expect("the body is JSON");

        assert_eq!(body["version"], "deneb");
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["data"][0]["attestation_1"]["attesting_indices"], json(["0", "1"]));
    }

    #[tokio::test]
    async fn missing_version_header_is_reported_through_the_router() {
        let gateway = phase0_gateway(64);
        let router = routing::gateway_routes(gateway.state.clone());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/eth/v2/beacon/pool/attestations")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from("[]"))
                    .expect("the request is well-formed"),
            )
            .await
            .expect("the router always responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("the body is small");

        let body: Value = serde_json::from_slice(&bytes).expect("the body is JSON");

        assert_eq!(body["code"], 400);
        assert_eq!(body["message"], "Eth-Consensus-Version header is required");
    }

    #[tokio::test]
    async fn malformed_query_parameters_fail_before_enumeration() {
        let gateway = phase0_gateway(64);
        let router = routing::gateway_routes(gateway.state.clone());

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/eth/v1/beacon/pool/attestations?slot=not-a-slot")
                    .body(Body::empty())
                    .expect("the request is well-formed"),
            )
            .await
            .expect("the router always responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use chain::Controller;
use helper_functions::verifier::Verifier;
use operation_pools::{
    AttestationPool, BlsToExecutionChangePool, SlashingPool, SyncCommitteePool,
    VoluntaryExitPool,
};
use p2p::Broadcaster;
use tokio::sync::watch;
use types::{config::Config as ChainConfig, preset::Preset};

use crate::{
    events::OperationNotifier,
    standard::{
        pool_attestations, pool_attestations_v2, pool_attester_slashings,
        pool_attester_slashings_v2, pool_bls_to_execution_changes, pool_proposer_slashings,
        pool_voluntary_exits, submit_pool_attestations, submit_pool_attestations_v2,
        submit_pool_attester_slashing, submit_pool_attester_slashing_v2,
        submit_pool_bls_to_execution_change, submit_pool_proposer_slashing,
        submit_pool_sync_committees, submit_pool_voluntary_exit,
    },
};

#[derive(Clone)]
pub struct GatewayState<P: Preset> {
    pub chain_config: Arc<ChainConfig>,
    pub controller: Arc<dyn Controller>,
    pub verifier: Arc<dyn Verifier>,
    pub broadcaster: Arc<dyn Broadcaster<P>>,
    pub attestation_pool: Arc<dyn AttestationPool<P>>,
    pub slashing_pool: Arc<dyn SlashingPool<P>>,
    pub voluntary_exit_pool: Arc<dyn VoluntaryExitPool>,
    pub bls_to_execution_change_pool: Arc<dyn BlsToExecutionChangePool>,
    pub sync_committee_pool: Arc<dyn SyncCommitteePool>,
    pub operation_notifier: Arc<OperationNotifier<P>>,
    /// Flips to `true` when the server shuts down. Deferred broadcast tasks watch this
    /// instead of the request context so they outlive the response.
    pub shutdown_rx: watch::Receiver<bool>,
}

// The `FromRef` derive macro cannot handle type parameters.

impl<P: Preset> FromRef<GatewayState<P>> for Arc<ChainConfig> {
    fn from_ref(state: &GatewayState<P>) -> Self {
        state.chain_config.clone()
    }
}

impl<P: Preset> FromRef<GatewayState<P>> for Arc<dyn Controller> {
    fn from_ref(state: &GatewayState<P>) -> Self {
        state.controller.clone()
    }
}

impl<P: Preset> FromRef<GatewayState<P>> for Arc<dyn Verifier> {
    fn from_ref(state: &GatewayState<P>) -> Self {
        state.verifier.clone()
    }
}

impl<P: Preset> FromRef<GatewayState<P>> for Arc<dyn Broadcaster<P>> {
    fn from_ref(state: &GatewayState<P>) -> Self {
        state.broadcaster.clone()
    }
}

impl<P: Preset> FromRef<GatewayState<P>> for Arc<dyn AttestationPool<P>> {
    fn from_ref(state: &GatewayState<P>) -> Self {
        state.attestation_pool.clone()
    }
}

impl<P: Preset> FromRef<GatewayState<P>> for Arc<dyn SlashingPool<P>> {
    fn from_ref(state: &GatewayState<P>) -> Self {
        state.slashing_pool.clone()
    }
}

impl<P: Preset> FromRef<GatewayState<P>> for Arc<dyn VoluntaryExitPool> {
    fn from_ref(state: &GatewayState<P>) -> Self {
        state.voluntary_exit_pool.clone()
    }
}

impl<P: Preset> FromRef<GatewayState<P>> for Arc<dyn BlsToExecutionChangePool> {
    fn from_ref(state: &GatewayState<P>) -> Self {
        state.bls_to_execution_change_pool.clone()
    }
}

impl<P: Preset> FromRef<GatewayState<P>> for Arc<dyn SyncCommitteePool> {
    fn from_ref(state: &GatewayState<P>) -> Self {
        state.sync_committee_pool.clone()
    }
}

impl<P: Preset> FromRef<GatewayState<P>> for Arc<OperationNotifier<P>> {
    fn from_ref(state: &GatewayState<P>) -> Self {
        state.operation_notifier.clone()
    }
}

impl<P: Preset> FromRef<GatewayState<P>> for watch::Receiver<bool> {
    fn from_ref(state: &GatewayState<P>) -> Self {
        state.shutdown_rx.clone()
    }
}

pub fn gateway_routes<P: Preset>(state: GatewayState<P>) -> Router {
    eth_v1_beacon_pool_routes()
        .merge(eth_v2_beacon_pool_routes())
        .with_state(state)
}

fn eth_v1_beacon_pool_routes<P: Preset>() -> Router<GatewayState<P>> {
    Router::new()
        .route(
            "/eth/v1/beacon/pool/attestations",
            get(pool_attestations).post(submit_pool_attestations),
        )
        .route(
            "/eth/v1/beacon/pool/bls_to_execution_changes",
            get(pool_bls_to_execution_changes).post(submit_pool_bls_to_execution_change),
        )
        .route(
            "/eth/v1/beacon/pool/voluntary_exits",
            get(pool_voluntary_exits).post(submit_pool_voluntary_exit),
        )
        .route(
            "/eth/v1/beacon/pool/attester_slashings",
            get(pool_attester_slashings).post(submit_pool_attester_slashing),
        )
        .route(
            "/eth/v1/beacon/pool/proposer_slashings",
            get(pool_proposer_slashings).post(submit_pool_proposer_slashing),
        )
        .route(
            "/eth/v1/beacon/pool/sync_committees",
            post(submit_pool_sync_committees),
        )
}

fn eth_v2_beacon_pool_routes<P: Preset>() -> Router<GatewayState<P>> {
    Router::new()
        .route(
            "/eth/v2/beacon/pool/attestations",
            get(pool_attestations_v2).post(submit_pool_attestations_v2),
        )
        .route(
            "/eth/v2/beacon/pool/attester_slashings",
            get(pool_attester_slashings_v2).post(submit_pool_attester_slashing_v2),
        )
}

use std::sync::Arc;

use anyhow::{Error as AnyhowError, Result};
use chain::Controller;
use helper_functions::verifier::Verifier;
use log::info;
use operation_pools::{
    AttestationPool, BlsToExecutionChangePool, SlashingPool, SyncCommitteePool,
    VoluntaryExitPool,
};
use p2p::Broadcaster;
use tokio::sync::watch;
use types::{config::Config as ChainConfig, preset::Preset};

use crate::{
    events::OperationNotifier,
    http_api_config::HttpApiConfig,
    routing::{self, GatewayState},
};

pub struct HttpApi<P: Preset> {
    pub chain_config: Arc<ChainConfig>,
    pub controller: Arc<dyn Controller>,
    pub verifier: Arc<dyn Verifier>,
    pub broadcaster: Arc<dyn Broadcaster<P>>,
    pub attestation_pool: Arc<dyn AttestationPool<P>>,
    pub slashing_pool: Arc<dyn SlashingPool<P>>,
    pub voluntary_exit_pool: Arc<dyn VoluntaryExitPool>,
    pub bls_to_execution_change_pool: Arc<dyn BlsToExecutionChangePool>,
    pub sync_committee_pool: Arc<dyn SyncCommitteePool>,
    pub http_api_config: HttpApiConfig,
}

impl<P: Preset> HttpApi<P> {
    pub async fn run(self) -> Result<()> {
        let Self {
            chain_config,
            controller,
            verifier,
            broadcaster,
            attestation_pool,
            slashing_pool,
            voluntary_exit_pool,
            bls_to_execution_change_pool,
            sync_committee_pool,
            http_api_config,
        } = self;

        let listener = http_api_config.listener().await?;

        // Deferred broadcast tasks outlive their requests. They stop when this
        // sender flips the value or is dropped on the way out of this function.
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let state = GatewayState {
            chain_config,
            controller,
            verifier,
            broadcaster,
            attestation_pool,
            slashing_pool,
            voluntary_exit_pool,
            bls_to_execution_change_pool,
            sync_committee_pool,
            operation_notifier: Arc::new(OperationNotifier::new(http_api_config.max_events)),
            shutdown_rx,
        };

        let router = routing::gateway_routes(state);

        info!("HTTP server listening on {}", http_api_config.address);

        let result = axum::serve(listener, router)
            .await
            .map_err(AnyhowError::new);

        let _ = shutdown_tx.send(true);

        result
    }
}

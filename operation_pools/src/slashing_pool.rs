use std::collections::HashSet;

use async_trait::async_trait;
use helper_functions::{accessors, predicates};
use tokio::sync::Mutex;
use types::{
    combined::AttesterSlashing,
    phase0::containers::ProposerSlashing,
    preset::Preset,
    state::BeaconState,
};
use typenum::Unsigned as _;

use crate::misc::{PoolError, DEFAULT_CAPACITY};

/// Staging for both slashing kinds.
///
/// Enumeration takes the head state and returns the currently minable subset: only
/// slashings that still name at least one slashable validator, capped at the per-block
/// maxima unless `unlimited` is set. The gateway passes `unlimited` so API responses
/// surface the full pool.
#[async_trait]
pub trait SlashingPool<P: Preset>: Send + Sync {
    async fn insert_attester_slashing(
        &self,
        state: &BeaconState,
        slashing: AttesterSlashing,
    ) -> Result<(), PoolError>;

    async fn insert_proposer_slashing(
        &self,
        state: &BeaconState,
        slashing: ProposerSlashing,
    ) -> Result<(), PoolError>;

    async fn pending_attester_slashings(
        &self,
        state: &BeaconState,
        unlimited: bool,
    ) -> Vec<AttesterSlashing>;

    async fn pending_proposer_slashings(
        &self,
        state: &BeaconState,
        unlimited: bool,
    ) -> Vec<ProposerSlashing>;
}

#[derive(Debug)]
pub struct MemorySlashingPool<P: Preset> {
    attester_slashings: Mutex<Vec<AttesterSlashing>>,
    proposer_slashings: Mutex<Vec<ProposerSlashing>>,
    capacity: usize,
    phantom: core::marker::PhantomData<P>,
}

impl<P: Preset> MemorySlashingPool<P> {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            attester_slashings: Mutex::new(vec![]),
            proposer_slashings: Mutex::new(vec![]),
            capacity,
            phantom: core::marker::PhantomData,
        }
    }
}

impl<P: Preset> Default for MemorySlashingPool<P> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl<P: Preset> SlashingPool<P> for MemorySlashingPool<P> {
    async fn insert_attester_slashing(
        &self,
        _state: &BeaconState,
        slashing: AttesterSlashing,
    ) -> Result<(), PoolError> {
        let mut slashings = self.attester_slashings.lock().await;

        if slashings.len() >= self.capacity {
            return Err(PoolError::Full);
        }

        slashings.push(slashing);
        Ok(())
    }

    async fn insert_proposer_slashing(
        &self,
        _state: &BeaconState,
        slashing: ProposerSlashing,
    ) -> Result<(), PoolError> {
        let mut slashings = self.proposer_slashings.lock().await;

        if slashings.len() >= self.capacity {
            return Err(PoolError::Full);
        }

        slashings.push(slashing);
        Ok(())
    }

    async fn pending_attester_slashings(
        &self,
        state: &BeaconState,
        unlimited: bool,
    ) -> Vec<AttesterSlashing> {
        let current_epoch = accessors::get_current_epoch::<P>(state);
        let slashings = self.attester_slashings.lock().await;

        let minable = slashings
            .iter()
            .filter(|slashing| any_attester_slashable(state, slashing, current_epoch))
            .cloned();

        if unlimited {
            minable.collect()
        } else {
            minable.take(P::MaxAttesterSlashings::USIZE).collect()
        }
    }

    async fn pending_proposer_slashings(
        &self,
        state: &BeaconState,
        unlimited: bool,
    ) -> Vec<ProposerSlashing> {
        let current_epoch = accessors::get_current_epoch::<P>(state);
        let slashings = self.proposer_slashings.lock().await;

        let minable = slashings
            .iter()
            .filter(|slashing| {
                let index = slashing.signed_header_1.message.proposer_index;

                accessors::validator_at(state, index)
                    .is_ok_and(|proposer| predicates::is_slashable_validator(proposer, current_epoch))
            })
            .cloned();

        if unlimited {
            minable.collect()
        } else {
            minable.take(P::MaxProposerSlashings::USIZE).collect()
        }
    }
}

fn any_attester_slashable(
    state: &BeaconState,
    slashing: &AttesterSlashing,
    current_epoch: u64,
) -> bool {
    let (_, indices_1, _) = slashing.attestation_1();
    let (_, indices_2, _) = slashing.attestation_2();

    let second = indices_2.iter().copied().collect::<HashSet<_>>();

    indices_1
        .iter()
        .filter(|index| second.contains(index))
        .any(|index| {
            accessors::validator_at(state, *index)
                .is_ok_and(|attester| predicates::is_slashable_validator(attester, current_epoch))
        })
}

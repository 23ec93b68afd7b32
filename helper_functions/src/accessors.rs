use types::{
    phase0::{
        containers::Validator,
        primitives::{Epoch, ValidatorIndex},
    },
    preset::Preset,
    state::BeaconState,
};
use typenum::Unsigned as _;

use crate::{error::Error, misc, predicates};

#[must_use]
pub fn get_current_epoch<P: Preset>(state: &BeaconState) -> Epoch {
    misc::compute_epoch_at_slot::<P>(state.slot())
}

/// Looks up a validator, distinguishing an out-of-bounds index from other failures.
/// Callers surface the former as a client error.
pub fn validator_at(state: &BeaconState, index: ValidatorIndex) -> Result<&Validator, Error> {
    usize::try_from(index)
        .ok()
        .and_then(|index| state.validators().get(index))
        .ok_or(Error::ValidatorIndexOutOfBounds { index })
}

#[must_use]
pub fn active_validator_count(state: &BeaconState, epoch: Epoch) -> u64 {
    state
        .validators()
        .iter()
        .filter(|validator| predicates::is_active_validator(validator, epoch))
        .count() as u64
}

/// [`get_committee_count_per_slot`](https://github.com/ethereum/consensus-specs/blob/v1.3.0/specs/phase0/beacon-chain.md#get_committee_count_per_slot)
#[must_use]
pub fn get_committee_count_per_slot<P: Preset>(state: &BeaconState, epoch: Epoch) -> u64 {
    let active = active_validator_count(state, epoch);

    (active / P::SlotsPerEpoch::U64 / P::TargetCommitteeSize::U64)
        .clamp(1, P::MaxCommitteesPerSlot::U64)
}

use anyhow::{ensure, Result};
use bls::PublicKeyBytes;
use sha2::{Digest as _, Sha256};
use types::{
    phase0::{
        consts::{AttestationSubnetCount, BLS_WITHDRAWAL_PREFIX},
        primitives::{CommitteeIndex, Epoch, Slot, SubnetId, H256},
    },
    preset::Preset,
};
use typenum::Unsigned as _;

use crate::error::Error;

#[must_use]
pub fn compute_epoch_at_slot<P: Preset>(slot: Slot) -> Epoch {
    slot / P::SlotsPerEpoch::U64
}

#[must_use]
pub fn compute_start_slot_at_epoch<P: Preset>(epoch: Epoch) -> Slot {
    epoch.saturating_mul(P::SlotsPerEpoch::U64)
}

#[must_use]
pub fn slots_since_epoch_start<P: Preset>(slot: Slot) -> u64 {
    slot - compute_start_slot_at_epoch::<P>(compute_epoch_at_slot::<P>(slot))
}

/// [`compute_subnet_for_attestation`](https://github.com/ethereum/consensus-specs/blob/v1.3.0/specs/phase0/validator.md#broadcast-attestation)
pub fn compute_subnet_for_attestation<P: Preset>(
    committees_per_slot: u64,
    slot: Slot,
    committee_index: CommitteeIndex,
) -> Result<SubnetId> {
    ensure!(
        committee_index < committees_per_slot,
        Error::CommitteeIndexOutOfBounds {
            committee_index,
            committees_per_slot,
        },
    );

    let slots_since_epoch_start = slots_since_epoch_start::<P>(slot);
    let committees_since_epoch_start = committees_per_slot * slots_since_epoch_start;

    Ok((committees_since_epoch_start + committee_index) % AttestationSubnetCount::U64)
}

/// The withdrawal credentials a validator commits to with a BLS withdrawal key.
#[must_use]
pub fn bls_withdrawal_credentials(pubkey: PublicKeyBytes) -> H256 {
    let mut credentials = H256::from_slice(Sha256::digest(pubkey.as_bytes()).as_slice());
    credentials.0[0] = BLS_WITHDRAWAL_PREFIX;
    credentials
}

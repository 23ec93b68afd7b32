//! Validation of operations whose containers have kept their phase 0 shape.
//!
//! These functions are stateless with respect to the pool: they take a head-state
//! snapshot already advanced to the relevant slot and report why an operation can
//! never be included rather than mutating anything.

use std::collections::HashSet;

use anyhow::{ensure, Result};
use bls::AggregateSignatureBytes;
use helper_functions::{accessors, predicates, verifier::Verifier};
use itertools::Itertools as _;
use types::{
    combined::AttesterSlashing,
    config::Config,
    phase0::{
        containers::{AttestationData, ProposerSlashing, SignedVoluntaryExit, Validator},
        primitives::ValidatorIndex,
    },
    preset::Preset,
    state::BeaconState,
};

use crate::error::Error;

/// [`process_voluntary_exit`](https://github.com/ethereum/consensus-specs/blob/v1.3.0/specs/phase0/beacon-chain.md#voluntary-exits)
/// without the exit initiation. The validator is resolved by the caller so that an
/// out-of-bounds index can be reported differently from a failed precondition.
pub fn validate_voluntary_exit<P: Preset>(
    config: &Config,
    state: &BeaconState,
    validator: &Validator,
    signed_voluntary_exit: &SignedVoluntaryExit,
    verifier: &dyn Verifier,
) -> Result<()> {
    let voluntary_exit = signed_voluntary_exit.message;
    let index = voluntary_exit.validator_index;
    let current_epoch = accessors::get_current_epoch::<P>(state);

    // > Verify the validator is active
    ensure!(
        predicates::is_active_validator(validator, current_epoch),
        Error::ValidatorNotActive {
            index,
            current_epoch,
        },
    );

    // > Verify exit has not been initiated
    ensure!(
        !predicates::has_initiated_exit(validator),
        Error::ValidatorAlreadyExited {
            index,
            exit_epoch: validator.exit_epoch,
        },
    );

    // > Exits must specify an epoch when they become valid; they are not valid before then
    ensure!(
        current_epoch >= voluntary_exit.epoch,
        Error::VoluntaryExitNotYetValid {
            epoch: voluntary_exit.epoch,
            current_epoch,
        },
    );

    // > Verify the validator has been active long enough
    ensure!(
        current_epoch >= validator.activation_epoch + config.shard_committee_period,
        Error::ValidatorHasNotBeenActiveLongEnough {
            index,
            activation_epoch: validator.activation_epoch,
            current_epoch,
        },
    );

    // > Verify signature
    verifier.verify_voluntary_exit(config, state, signed_voluntary_exit, validator.pubkey)
}

/// [`process_proposer_slashing`](https://github.com/ethereum/consensus-specs/blob/v1.3.0/specs/phase0/beacon-chain.md#proposer-slashings)
/// without the slashing itself.
pub fn validate_proposer_slashing<P: Preset>(
    config: &Config,
    state: &BeaconState,
    proposer_slashing: &ProposerSlashing,
    verifier: &dyn Verifier,
) -> Result<()> {
    let header_1 = proposer_slashing.signed_header_1.message;
    let header_2 = proposer_slashing.signed_header_2.message;

    // > Verify header slots match
    ensure!(
        header_1.slot == header_2.slot,
        Error::ProposerSlashingSlotMismatch {
            slot_1: header_1.slot,
            slot_2: header_2.slot,
        },
    );

    // > Verify header proposer indices match
    ensure!(
        header_1.proposer_index == header_2.proposer_index,
        Error::ProposerSlashingProposerMismatch {
            proposer_index_1: header_1.proposer_index,
            proposer_index_2: header_2.proposer_index,
        },
    );

    // > Verify the headers are different
    ensure!(
        header_1 != header_2,
        Error::ProposerSlashingHeadersIdentical { header: header_1 },
    );

    // > Verify the proposer is slashable
    let index = header_1.proposer_index;
    let proposer = accessors::validator_at(state, index)?;

    ensure!(
        predicates::is_slashable_validator(proposer, accessors::get_current_epoch::<P>(state)),
        Error::ProposerNotSlashable { index },
    );

    // > Verify signatures
    for signed_header in [
        proposer_slashing.signed_header_1,
        proposer_slashing.signed_header_2,
    ] {
        verifier.verify_block_header(config, state, &signed_header, proposer.pubkey)?;
    }

    Ok(())
}

/// [`process_attester_slashing`](https://github.com/ethereum/consensus-specs/blob/v1.3.0/specs/phase0/beacon-chain.md#attester-slashings)
/// without the slashing itself. Returns the indices that are still slashable.
pub fn validate_attester_slashing<P: Preset>(
    config: &Config,
    state: &BeaconState,
    attester_slashing: &AttesterSlashing,
    verifier: &dyn Verifier,
) -> Result<Vec<ValidatorIndex>> {
    let (data_1, indices_1, signature_1) = attester_slashing.attestation_1();
    let (data_2, indices_2, signature_2) = attester_slashing.attestation_2();

    ensure!(
        predicates::is_slashable_attestation_data(data_1, data_2),
        Error::AttestationDataNotSlashable { data_1, data_2 },
    );

    validate_received_indexed_attestation(config, state, data_1, indices_1, signature_1, verifier)?;
    validate_received_indexed_attestation(config, state, data_2, indices_2, signature_2, verifier)?;

    let current_epoch = accessors::get_current_epoch::<P>(state);

    let slashable_indices = intersection(indices_1, indices_2)
        .filter(|attester_index| {
            let attester = accessors::validator_at(state, *attester_index)
                .expect("attester indices are validated in validate_received_indexed_attestation");

            predicates::is_slashable_validator(attester, current_epoch)
        })
        .collect_vec();

    ensure!(!slashable_indices.is_empty(), Error::NoAttestersSlashed);

    Ok(slashable_indices)
}

/// [`is_valid_indexed_attestation`](https://github.com/ethereum/consensus-specs/blob/v1.3.0/specs/phase0/beacon-chain.md#is_valid_indexed_attestation)
fn validate_received_indexed_attestation(
    config: &Config,
    state: &BeaconState,
    data: AttestationData,
    attesting_indices: &[ValidatorIndex],
    signature: AggregateSignatureBytes,
    verifier: &dyn Verifier,
) -> Result<()> {
    // > Verify indices are sorted and unique
    ensure!(!attesting_indices.is_empty(), Error::AttestingIndicesEmpty);

    ensure!(
        attesting_indices
            .iter()
            .tuple_windows()
            .all(|(first, second)| first < second),
        Error::AttestingIndicesNotSortedAndUnique,
    );

    // > Verify aggregate signature
    let public_keys = attesting_indices
        .iter()
        .map(|index| accessors::validator_at(state, *index).map(|validator| validator.pubkey))
        .collect::<Result<Vec<_>, _>>()?;

    verifier.verify_indexed_attestation(config, state, data, signature, &public_keys)
}

fn intersection<'indices>(
    indices_1: &'indices [ValidatorIndex],
    indices_2: &[ValidatorIndex],
) -> impl Iterator<Item = ValidatorIndex> + 'indices {
    let second = indices_2.iter().copied().collect::<HashSet<_>>();

    indices_1
        .iter()
        .copied()
        .filter(move |index| second.contains(index))
}

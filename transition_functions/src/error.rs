use thiserror::Error;
use types::phase0::{
    containers::{AttestationData, BeaconBlockHeader},
    primitives::{Epoch, ValidatorIndex, H256},
};

#[derive(PartialEq, Eq, Debug, Error)]
pub enum Error {
    #[error("attestation data is not slashable (data_1: {data_1:?}, data_2: {data_2:?})")]
    AttestationDataNotSlashable {
        data_1: AttestationData,
        data_2: AttestationData,
    },
    #[error("attesting indices are empty")]
    AttestingIndicesEmpty,
    #[error("attesting indices are not sorted and unique")]
    AttestingIndicesNotSortedAndUnique,
    #[error("no attesters slashed")]
    NoAttestersSlashed,
    #[error("proposer (validator {index}) is not slashable")]
    ProposerNotSlashable { index: ValidatorIndex },
    #[error("block headers in proposer slashing are identical: {header:?}")]
    ProposerSlashingHeadersIdentical { header: BeaconBlockHeader },
    #[error(
        "proposer indices in proposer slashing do not match \
         ({proposer_index_1} != {proposer_index_2})"
    )]
    ProposerSlashingProposerMismatch {
        proposer_index_1: ValidatorIndex,
        proposer_index_2: ValidatorIndex,
    },
    #[error("slots in proposer slashing do not match ({slot_1} != {slot_2})")]
    ProposerSlashingSlotMismatch { slot_1: u64, slot_2: u64 },
    #[error("validator {index} exited in epoch {exit_epoch}")]
    ValidatorAlreadyExited {
        index: ValidatorIndex,
        exit_epoch: Epoch,
    },
    #[error(
        "validator {index} has not been active long enough \
         (activation_epoch: {activation_epoch}, current_epoch: {current_epoch})"
    )]
    ValidatorHasNotBeenActiveLongEnough {
        index: ValidatorIndex,
        activation_epoch: Epoch,
        current_epoch: Epoch,
    },
    #[error("validator {index} is not active in epoch {current_epoch}")]
    ValidatorNotActive {
        index: ValidatorIndex,
        current_epoch: Epoch,
    },
    #[error("voluntary exit is not valid before epoch {epoch} (current_epoch: {current_epoch})")]
    VoluntaryExitNotYetValid { epoch: Epoch, current_epoch: Epoch },
    #[error(
        "withdrawal credentials do not match the BLS commitment \
         (in_state: {in_state:?}, in_message: {in_message:?})"
    )]
    WithdrawalCredentialsMismatch { in_state: H256, in_message: H256 },
}

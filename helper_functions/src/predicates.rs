use types::{
    combined::Attestation,
    phase0::{
        consts::{ETH1_ADDRESS_WITHDRAWAL_PREFIX, FAR_FUTURE_EPOCH},
        containers::{AttestationData, Validator},
        primitives::Epoch,
    },
    preset::Preset,
};

/// [`is_active_validator`](https://github.com/ethereum/consensus-specs/blob/v1.3.0/specs/phase0/beacon-chain.md#is_active_validator)
#[must_use]
pub fn is_active_validator(validator: &Validator, epoch: Epoch) -> bool {
    validator.activation_epoch <= epoch && epoch < validator.exit_epoch
}

/// [`is_slashable_validator`](https://github.com/ethereum/consensus-specs/blob/v1.3.0/specs/phase0/beacon-chain.md#is_slashable_validator)
#[must_use]
pub fn is_slashable_validator(validator: &Validator, epoch: Epoch) -> bool {
    !validator.slashed
        && validator.activation_epoch <= epoch
        && epoch < validator.withdrawable_epoch
}

/// [`is_slashable_attestation_data`](https://github.com/ethereum/consensus-specs/blob/v1.3.0/specs/phase0/beacon-chain.md#is_slashable_attestation_data)
#[must_use]
pub fn is_slashable_attestation_data(data_1: AttestationData, data_2: AttestationData) -> bool {
    let double_vote = data_1 != data_2 && data_1.target.epoch == data_2.target.epoch;

    let surround_vote =
        data_1.source.epoch < data_2.source.epoch && data_2.target.epoch < data_1.target.epoch;

    double_vote || surround_vote
}

#[must_use]
pub fn has_eth1_withdrawal_credential(validator: &Validator) -> bool {
    validator.withdrawal_credentials.0[0] == ETH1_ADDRESS_WITHDRAWAL_PREFIX
}

/// An attestation is considered aggregated once more than one aggregation bit is set.
/// Singular attestations are the ones relayed on attestation subnets.
#[must_use]
pub fn is_aggregated<P: Preset>(attestation: &Attestation<P>) -> bool {
    attestation.count_aggregation_bits() > 1
}

#[must_use]
pub fn has_initiated_exit(validator: &Validator) -> bool {
    validator.exit_epoch != FAR_FUTURE_EPOCH
}

#[cfg(test)]
mod tests {
    use types::phase0::containers::Checkpoint;

    use super::*;

    fn data(source_epoch: Epoch, target_epoch: Epoch) -> AttestationData {
        AttestationData {
            source: Checkpoint {
                epoch: source_epoch,
                ..Checkpoint::default()
            },
            target: Checkpoint {
                epoch: target_epoch,
                ..Checkpoint::default()
            },
            ..AttestationData::default()
        }
    }

    #[test]
    fn same_data_is_not_slashable() {
        assert!(!is_slashable_attestation_data(data(0, 1), data(0, 1)));
    }

    #[test]
    fn double_vote_is_slashable() {
        let mut data_2 = data(0, 1);
        data_2.index = 1;

        assert!(is_slashable_attestation_data(data(0, 1), data_2));
    }

    #[test]
    fn surround_vote_is_slashable() {
        assert!(is_slashable_attestation_data(data(0, 5), data(1, 4)));
        assert!(!is_slashable_attestation_data(data(1, 4), data(0, 5)));
    }

    #[test]
    fn validator_active_within_activation_and_exit() {
        let validator = Validator {
            activation_epoch: 2,
            exit_epoch: 10,
            withdrawable_epoch: 20,
            ..Validator::default()
        };

        assert!(!is_active_validator(&validator, 1));
        assert!(is_active_validator(&validator, 2));
        assert!(is_active_validator(&validator, 9));
        assert!(!is_active_validator(&validator, 10));

        assert!(is_slashable_validator(&validator, 15));
        assert!(!is_slashable_validator(&validator, 20));
    }
}

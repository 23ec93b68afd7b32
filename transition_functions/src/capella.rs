//! Validation of BLS-to-execution changes.
//!
//! Schema-and-consistency validation and signature verification are split because the
//! gateway reports them as distinct failure kinds and re-runs only the former before
//! re-broadcasting a staged change.

use anyhow::{ensure, Result};
use helper_functions::{accessors, misc, verifier::Verifier};
use types::{
    capella::containers::SignedBlsToExecutionChange, config::Config, state::BeaconState,
};

use crate::error::Error;

/// [`process_bls_to_execution_change`](https://github.com/ethereum/consensus-specs/blob/v1.3.0/specs/capella/beacon-chain.md#new-process_bls_to_execution_change)
/// without the credential rotation and without the signature check.
pub fn validate_bls_to_execution_change(
    state: &BeaconState,
    signed_bls_to_execution_change: &SignedBlsToExecutionChange,
) -> Result<()> {
    let address_change = signed_bls_to_execution_change.message;
    let validator = accessors::validator_at(state, address_change.validator_index)?;

    let in_state = validator.withdrawal_credentials;
    let in_message = misc::bls_withdrawal_credentials(address_change.from_bls_pubkey);

    ensure!(
        in_state == in_message,
        Error::WithdrawalCredentialsMismatch {
            in_state,
            in_message,
        },
    );

    Ok(())
}

// > Fork-agnostic domain since address changes are valid across forks
pub fn verify_bls_to_execution_change_signature(
    config: &Config,
    state: &BeaconState,
    signed_bls_to_execution_change: &SignedBlsToExecutionChange,
    verifier: &dyn Verifier,
) -> Result<()> {
    verifier.verify_bls_to_execution_change(config, state, signed_bls_to_execution_change)
}

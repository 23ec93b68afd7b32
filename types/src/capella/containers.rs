use bls::{PublicKeyBytes, SignatureBytes};
use serde::{Deserialize, Serialize};

use crate::phase0::primitives::{ExecutionAddress, ValidatorIndex};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BlsToExecutionChange {
    #[serde(with = "serde_utils::string_or_native")]
    pub validator_index: ValidatorIndex,
    pub from_bls_pubkey: PublicKeyBytes,
    pub to_execution_address: ExecutionAddress,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SignedBlsToExecutionChange {
    pub message: BlsToExecutionChange,
    pub signature: SignatureBytes,
}

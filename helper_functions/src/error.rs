use thiserror::Error;
use types::phase0::primitives::{CommitteeIndex, ValidatorIndex};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum Error {
    #[error("committee index is out of bounds ({committee_index} >= {committees_per_slot})")]
    CommitteeIndexOutOfBounds {
        committee_index: CommitteeIndex,
        committees_per_slot: u64,
    },
    #[error("validator index is out of bounds ({index})")]
    ValidatorIndexOutOfBounds { index: ValidatorIndex },
}

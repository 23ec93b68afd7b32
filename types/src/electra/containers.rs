use bls::AggregateSignatureBytes;
use serde::{Deserialize, Serialize};
use ssz_types::{BitList, BitVector};

use crate::{
    phase0::{
        containers::{AttestationData, IndexedAttestation},
        primitives::CommitteeIndex,
    },
    preset::Preset,
};

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
#[serde(bound = "", deny_unknown_fields)]
pub struct Attestation<P: Preset> {
    pub aggregation_bits: BitList<P::MaxAttestersPerSlot>,
    pub data: AttestationData,
    pub signature: AggregateSignatureBytes,
    pub committee_bits: BitVector<P::MaxCommitteesPerSlot>,
}

impl<P: Preset> Attestation<P> {
    /// The single committee the attestation belongs to, recovered from `committee_bits`.
    ///
    /// Post-Electra attestations zero out `data.index` and carry the committee in the
    /// bitfield instead. [`None`] means no bit is set and the attestation is unroutable.
    #[must_use]
    pub fn committee_index(&self) -> Option<CommitteeIndex> {
        self.committee_bits
            .iter()
            .position(|bit| bit)
            .map(|position| position as CommitteeIndex)
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AttesterSlashing {
    pub attestation_1: IndexedAttestation,
    pub attestation_2: IndexedAttestation,
}

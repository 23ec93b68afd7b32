//! Fork-polymorphic operation families.
//!
//! The unions are carried through the whole pipeline so that no stage has to recover
//! the variant dynamically. Pools enumerate these directly.

use bls::AggregateSignatureBytes;
use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::{
    electra::containers::{
        Attestation as ElectraAttestation, AttesterSlashing as ElectraAttesterSlashing,
    },
    nonstandard::Phase,
    phase0::{
        containers::{
            Attestation as Phase0Attestation, AttesterSlashing as Phase0AttesterSlashing,
            AttestationData,
        },
        primitives::{CommitteeIndex, Slot, ValidatorIndex},
    },
    preset::Preset,
};

#[derive(Clone, PartialEq, Eq, Debug, From, Deserialize, Serialize)]
#[serde(bound = "", untagged)]
pub enum Attestation<P: Preset> {
    Phase0(Phase0Attestation<P>),
    Electra(ElectraAttestation<P>),
}

impl<P: Preset> Attestation<P> {
    #[must_use]
    pub const fn data(&self) -> AttestationData {
        match self {
            Self::Phase0(attestation) => attestation.data,
            Self::Electra(attestation) => attestation.data,
        }
    }

    /// The committee the attestation is routed by: `data.index` before Electra,
    /// the first set committee bit after.
    #[must_use]
    pub fn committee_index(&self) -> Option<CommitteeIndex> {
        match self {
            Self::Phase0(attestation) => Some(attestation.data.index),
            Self::Electra(attestation) => attestation.committee_index(),
        }
    }

    #[must_use]
    pub const fn signature(&self) -> AggregateSignatureBytes {
        match self {
            Self::Phase0(attestation) => attestation.signature,
            Self::Electra(attestation) => attestation.signature,
        }
    }

    #[must_use]
    pub fn count_aggregation_bits(&self) -> usize {
        match self {
            Self::Phase0(attestation) => attestation.aggregation_bits.num_set_bits(),
            Self::Electra(attestation) => attestation.aggregation_bits.num_set_bits(),
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Phase0(_) => Phase::Phase0,
            Self::Electra(_) => Phase::Electra,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, From, Serialize)]
#[serde(untagged)]
pub enum AttesterSlashing {
    Phase0(Phase0AttesterSlashing),
    Electra(ElectraAttesterSlashing),
}

impl AttesterSlashing {
    /// The slot slashing validation advances the state to.
    #[must_use]
    pub const fn slot(&self) -> Slot {
        self.attestation_1().0.slot
    }

    #[must_use]
    pub const fn attestation_1(&self) -> (AttestationData, &Vec<ValidatorIndex>, AggregateSignatureBytes) {
        match self {
            Self::Phase0(slashing) => (
                slashing.attestation_1.data,
                &slashing.attestation_1.attesting_indices,
                slashing.attestation_1.signature,
            ),
            Self::Electra(slashing) => (
                slashing.attestation_1.data,
                &slashing.attestation_1.attesting_indices,
                slashing.attestation_1.signature,
            ),
        }
    }

    #[must_use]
    pub const fn attestation_2(&self) -> (AttestationData, &Vec<ValidatorIndex>, AggregateSignatureBytes) {
        match self {
            Self::Phase0(slashing) => (
                slashing.attestation_2.data,
                &slashing.attestation_2.attesting_indices,
                slashing.attestation_2.signature,
            ),
            Self::Electra(slashing) => (
                slashing.attestation_2.data,
                &slashing.attestation_2.attesting_indices,
                slashing.attestation_2.signature,
            ),
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Phase0(_) => Phase::Phase0,
            Self::Electra(_) => Phase::Electra,
        }
    }
}

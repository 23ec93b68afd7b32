//! Compile-time size presets.
//!
//! Only the lengths the operation containers and committee math need are included.
//! Chain-level parameters that vary between networks of the same preset live in
//! [`Config`](crate::config::Config).

use core::{fmt::Debug, hash::Hash};

use typenum::{Unsigned, U128, U131072, U16, U2, U2048, U32, U4, U64, U8, U8192};

pub trait Preset: Copy + Eq + Ord + Hash + Debug + Default + Send + Sync + 'static {
    type SlotsPerEpoch: PresetLength;
    type TargetCommitteeSize: PresetLength;
    type MaxCommitteesPerSlot: PresetLength;
    type MaxValidatorsPerCommittee: PresetLength;
    /// Upper bound on aggregation bits in a post-Electra attestation
    /// (`MaxValidatorsPerCommittee * MaxCommitteesPerSlot`).
    type MaxAttestersPerSlot: PresetLength;
    type MaxAttesterSlashings: PresetLength;
    type MaxProposerSlashings: PresetLength;
}

pub trait PresetLength:
    Unsigned + Clone + Copy + Debug + Default + Eq + Hash + Ord + Send + Sync + 'static
{
}

impl<T: Unsigned + Clone + Copy + Debug + Default + Eq + Hash + Ord + Send + Sync + 'static>
    PresetLength for T
{
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Mainnet;

impl Preset for Mainnet {
    type SlotsPerEpoch = U32;
    type TargetCommitteeSize = U128;
    type MaxCommitteesPerSlot = U64;
    type MaxValidatorsPerCommittee = U2048;
    type MaxAttestersPerSlot = U131072;
    type MaxAttesterSlashings = U2;
    type MaxProposerSlashings = U16;
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Minimal;

impl Preset for Minimal {
    type SlotsPerEpoch = U8;
    type TargetCommitteeSize = U4;
    type MaxCommitteesPerSlot = U4;
    type MaxValidatorsPerCommittee = U2048;
    type MaxAttestersPerSlot = U8192;
    type MaxAttesterSlashings = U2;
    type MaxProposerSlashings = U16;
}

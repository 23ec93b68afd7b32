//! Network configurations.

use std::borrow::Cow;

use enum_iterator::reverse_all;
use serde::{Deserialize, Serialize};
use typenum::Unsigned as _;

use crate::{
    nonstandard::Phase,
    phase0::{
        consts::{FAR_FUTURE_EPOCH, GENESIS_EPOCH},
        primitives::{Epoch, Slot, Version},
    },
    preset::Preset,
};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub config_name: Cow<'static, str>,

    pub genesis_fork_version: Version,
    pub altair_fork_version: Version,
    #[serde(with = "serde_utils::string_or_native")]
    pub altair_fork_epoch: Epoch,
    pub bellatrix_fork_version: Version,
    #[serde(with = "serde_utils::string_or_native")]
    pub bellatrix_fork_epoch: Epoch,
    pub capella_fork_version: Version,
    #[serde(with = "serde_utils::string_or_native")]
    pub capella_fork_epoch: Epoch,
    pub deneb_fork_version: Version,
    #[serde(with = "serde_utils::string_or_native")]
    pub deneb_fork_epoch: Epoch,
    pub electra_fork_version: Version,
    #[serde(with = "serde_utils::string_or_native")]
    pub electra_fork_epoch: Epoch,

    #[serde(with = "serde_utils::string_or_native")]
    pub shard_committee_period: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl Config {
    #[must_use]
    pub fn mainnet() -> Self {
        Self {
            config_name: Cow::Borrowed("mainnet"),
            genesis_fork_version: Version([0x00, 0x00, 0x00, 0x00]),
            altair_fork_version: Version([0x01, 0x00, 0x00, 0x00]),
            altair_fork_epoch: 74_240,
            bellatrix_fork_version: Version([0x02, 0x00, 0x00, 0x00]),
            bellatrix_fork_epoch: 144_896,
            capella_fork_version: Version([0x03, 0x00, 0x00, 0x00]),
            capella_fork_epoch: 194_048,
            deneb_fork_version: Version([0x04, 0x00, 0x00, 0x00]),
            deneb_fork_epoch: 269_568,
            electra_fork_version: Version([0x05, 0x00, 0x00, 0x00]),
            electra_fork_epoch: 364_032,
            shard_committee_period: 256,
        }
    }

    #[must_use]
    pub fn minimal() -> Self {
        Self {
            config_name: Cow::Borrowed("minimal"),
            genesis_fork_version: Version([0x00, 0x00, 0x00, 0x01]),
            altair_fork_version: Version([0x01, 0x00, 0x00, 0x01]),
            altair_fork_epoch: FAR_FUTURE_EPOCH,
            bellatrix_fork_version: Version([0x02, 0x00, 0x00, 0x01]),
            bellatrix_fork_epoch: FAR_FUTURE_EPOCH,
            capella_fork_version: Version([0x03, 0x00, 0x00, 0x01]),
            capella_fork_epoch: FAR_FUTURE_EPOCH,
            deneb_fork_version: Version([0x04, 0x00, 0x00, 0x01]),
            deneb_fork_epoch: FAR_FUTURE_EPOCH,
            electra_fork_version: Version([0x05, 0x00, 0x00, 0x01]),
            electra_fork_epoch: FAR_FUTURE_EPOCH,
            shard_committee_period: 64,
        }
    }

    /// A configuration with every phase enabled from genesis. Intended for tests.
    #[must_use]
    pub fn all_forks_at_genesis(up_to: Phase) -> Self {
        let mut config = Self::mainnet();
        config.config_name = Cow::Borrowed("all-forks-at-genesis");
        config.altair_fork_epoch = fork_epoch_or_far_future(Phase::Altair, up_to);
        config.bellatrix_fork_epoch = fork_epoch_or_far_future(Phase::Bellatrix, up_to);
        config.capella_fork_epoch = fork_epoch_or_far_future(Phase::Capella, up_to);
        config.deneb_fork_epoch = fork_epoch_or_far_future(Phase::Deneb, up_to);
        config.electra_fork_epoch = fork_epoch_or_far_future(Phase::Electra, up_to);
        config
    }

    #[must_use]
    pub const fn fork_epoch(&self, phase: Phase) -> Epoch {
        match phase {
            Phase::Phase0 => GENESIS_EPOCH,
            Phase::Altair => self.altair_fork_epoch,
            Phase::Bellatrix => self.bellatrix_fork_epoch,
            Phase::Capella => self.capella_fork_epoch,
            Phase::Deneb => self.deneb_fork_epoch,
            Phase::Electra => self.electra_fork_epoch,
        }
    }

    #[must_use]
    pub const fn version(&self, phase: Phase) -> Version {
        match phase {
            Phase::Phase0 => self.genesis_fork_version,
            Phase::Altair => self.altair_fork_version,
            Phase::Bellatrix => self.bellatrix_fork_version,
            Phase::Capella => self.capella_fork_version,
            Phase::Deneb => self.deneb_fork_version,
            Phase::Electra => self.electra_fork_version,
        }
    }

    #[must_use]
    pub fn phase_at_epoch(&self, epoch: Epoch) -> Phase {
        reverse_all::<Phase>()
            .find(|phase| self.fork_epoch(*phase) <= epoch)
            .unwrap_or(Phase::Phase0)
    }

    #[must_use]
    pub fn phase_at_slot<P: Preset>(&self, slot: Slot) -> Phase {
        self.phase_at_epoch(slot / P::SlotsPerEpoch::U64)
    }
}

const fn fork_epoch_or_far_future(phase: Phase, up_to: Phase) -> Epoch {
    if phase as usize <= up_to as usize {
        GENESIS_EPOCH
    } else {
        FAR_FUTURE_EPOCH
    }
}

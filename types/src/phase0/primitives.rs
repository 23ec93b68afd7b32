use core::fmt::{Debug, Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

pub use ethereum_types::H256;

pub type CommitteeIndex = u64;
pub type Epoch = u64;
pub type ExecutionAddress = ethereum_types::H160;
pub type Gwei = u64;
pub type Slot = u64;
pub type SubnetId = u64;
pub type ValidatorIndex = u64;

/// A fork version as it appears in fork digests and `Fork` containers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize, Serialize)]
pub struct Version(#[serde(with = "serde_utils::prefixed_hex_or_bytes_array")] pub [u8; 4]);

impl Display for Version {
    fn fmt(&self, formatter: &mut Formatter) -> FmtResult {
        formatter.write_str("0x")?;

        for byte in self.0 {
            write!(formatter, "{byte:02x}")?;
        }

        Ok(())
    }
}

impl Debug for Version {
    fn fmt(&self, formatter: &mut Formatter) -> FmtResult {
        Display::fmt(self, formatter)
    }
}

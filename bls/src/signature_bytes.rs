use core::fmt::{Debug, Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct SignatureBytes(
    #[serde(with = "serde_utils::prefixed_hex_or_bytes_array")] [u8; Self::SIZE],
);

impl SignatureBytes {
    pub const SIZE: usize = 96;

    #[must_use]
    pub const fn new(bytes: [u8; Self::SIZE]) -> Self {
        Self(bytes)
    }

    /// The all-zero placeholder some APIs use in place of a real signature.
    #[must_use]
    pub const fn empty() -> Self {
        Self([0; Self::SIZE])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::empty()
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.0
    }
}

impl Default for SignatureBytes {
    fn default() -> Self {
        Self::empty()
    }
}

impl AsRef<[u8]> for SignatureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for SignatureBytes {
    fn fmt(&self, formatter: &mut Formatter) -> FmtResult {
        formatter.write_str("0x")?;

        for byte in self.0 {
            write!(formatter, "{byte:02x}")?;
        }

        Ok(())
    }
}

impl Debug for SignatureBytes {
    fn fmt(&self, formatter: &mut Formatter) -> FmtResult {
        Display::fmt(self, formatter)
    }
}

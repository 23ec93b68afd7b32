use core::{
    fmt::{Formatter, Result as FmtResult},
    marker::PhantomData,
};

use serde::{
    de::{Error, Visitor},
    Deserializer, Serializer,
};

use crate::shared;

pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
    deserializer: D,
) -> Result<[u8; N], D::Error> {
    struct ArrayVisitor<const N: usize> {
        human_readable: bool,
        phantom: PhantomData<[u8; N]>,
    }

    impl<const N: usize> Visitor<'_> for ArrayVisitor<N> {
        type Value = [u8; N];

        fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
            formatter.write_str(shared::expecting_prefixed_hex(self.human_readable))
        }

        fn visit_str<E: Error>(self, string: &str) -> Result<Self::Value, E> {
            let digits = shared::strip_hex_prefix(string)?;
            let mut bytes = [0; N];
            const_hex::decode_to_slice(digits, &mut bytes).map_err(E::custom)?;
            Ok(bytes)
        }

        fn visit_bytes<E: Error>(self, bytes: &[u8]) -> Result<Self::Value, E> {
            bytes.try_into().map_err(E::custom)
        }
    }

    let human_readable = deserializer.is_human_readable();

    let visitor = ArrayVisitor {
        human_readable,
        phantom: PhantomData,
    };

    if human_readable {
        deserializer.deserialize_str(visitor)
    } else {
        deserializer.deserialize_bytes(visitor)
    }
}

pub fn serialize<S: Serializer, const N: usize>(
    bytes: &[u8; N],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if serializer.is_human_readable() {
        serializer.collect_str(&const_hex::encode_prefixed(bytes))
    } else {
        serializer.serialize_bytes(bytes)
    }
}

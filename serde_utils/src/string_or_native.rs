// The standard APIs require numbers to be represented as strings
// (except for error codes and metadata in the Eth Beacon Node API).
// Non-human-readable formats keep the native representation.

use core::{
    fmt::{Display, Formatter, Result as FmtResult},
    marker::PhantomData,
    str::FromStr,
};

use serde::{
    de::{Error, IntoDeserializer as _, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'de> + FromStr<Err: Display>,
    D: Deserializer<'de>,
{
    struct AnyVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de> + FromStr<Err: Display>> Visitor<'de> for AnyVisitor<T> {
        type Value = T;

        fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
            formatter.write_str("a string or integer")
        }

        fn visit_str<E: Error>(self, string: &str) -> Result<Self::Value, E> {
            string.parse().map_err(E::custom)
        }

        fn visit_u64<E: Error>(self, value: u64) -> Result<Self::Value, E> {
            T::deserialize(value.into_deserializer())
        }
    }

    if deserializer.is_human_readable() {
        deserializer.deserialize_any(AnyVisitor(PhantomData))
    } else {
        T::deserialize(deserializer)
    }
}

pub fn serialize<S: Serializer>(
    value: impl Serialize + Display,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if serializer.is_human_readable() {
        serializer.collect_str(&value)
    } else {
        value.serialize(serializer)
    }
}

//! Like [`string_or_native`](crate::string_or_native), but for sequences of quantities.

use core::{fmt::Display, ops::Deref, str::FromStr};

use serde::{
    de::{Deserializer, Error},
    ser::{SerializeSeq as _, Serializer},
    Deserialize,
};

pub fn deserialize<'de, T, C, D>(deserializer: D) -> Result<C, D::Error>
where
    T: for<'d> Deserialize<'d> + FromStr<Err: Display>,
    C: TryFrom<Vec<T>>,
    <C as TryFrom<Vec<T>>>::Error: core::fmt::Debug,
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Element<T: FromStr<Err: Display> + for<'d> Deserialize<'d>>(
        #[serde(with = "crate::string_or_native")] T,
    );

    let elements = Vec::<Element<T>>::deserialize(deserializer)?;

    elements
        .into_iter()
        .map(|Element(element)| element)
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|error| D::Error::custom(format!("{error:?}")))
}

pub fn serialize<T, C, S>(collection: &C, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    C: Deref<Target = [T]>,
    S: Serializer,
{
    let mut sequence = serializer.serialize_seq(Some(collection.len()))?;

    for element in collection.iter() {
        sequence.serialize_element(&element.to_string())?;
    }

    sequence.end()
}

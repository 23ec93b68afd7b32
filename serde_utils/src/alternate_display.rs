//! Serialization of [`anyhow::Error`] chains.
//!
//! `anyhow::Error` prints the chain of sources only if the alternate flag is specified,
//! so `Serializer::collect_str` alone would drop everything but the outermost message.

use anyhow::Error;
use serde::Serializer;

pub fn serialize<S: Serializer>(error: &Error, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{error:#}"))
}

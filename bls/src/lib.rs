//! Passive BLS containers.
//!
//! Signatures and public keys are carried as compressed bytes and only decompressed
//! by the signature verifier supplied by the embedder. This keeps decoding cheap and
//! lets invalid signatures travel as far as the verification seam, which is where the
//! protocol wants them rejected.

pub use crate::{public_key_bytes::PublicKeyBytes, signature_bytes::SignatureBytes};

/// Aggregate signatures have the same compressed form as singular ones.
pub type AggregateSignatureBytes = SignatureBytes;

mod public_key_bytes;
mod signature_bytes;

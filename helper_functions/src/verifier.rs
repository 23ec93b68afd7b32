//! The signature verification seam.
//!
//! BLS verification (along with the hashing it needs) is supplied by the embedder as a
//! set of pure functions over whole signed operations. Containers carry signatures as
//! compressed bytes all the way to this seam, so an implementation is expected to fail
//! on bytes that do not decode to a point on the curve.

use anyhow::Result;
use bls::{AggregateSignatureBytes, PublicKeyBytes, SignatureBytes};
use types::{
    capella::containers::SignedBlsToExecutionChange,
    config::Config,
    phase0::containers::{AttestationData, SignedBeaconBlockHeader, SignedVoluntaryExit},
    state::BeaconState,
};

pub trait Verifier: Send + Sync {
    /// Cheap sanity check that signature bytes decode to a BLS signature.
    /// This is the only signature check the attestation ingestion path performs;
    /// full verification of attestation signatures is the pool's responsibility.
    fn validate_signature_encoding(&self, signature_bytes: SignatureBytes) -> Result<()>;

    fn verify_voluntary_exit(
        &self,
        config: &Config,
        state: &BeaconState,
        signed_voluntary_exit: &SignedVoluntaryExit,
        public_key: PublicKeyBytes,
    ) -> Result<()>;

    fn verify_block_header(
        &self,
        config: &Config,
        state: &BeaconState,
        signed_header: &SignedBeaconBlockHeader,
        public_key: PublicKeyBytes,
    ) -> Result<()>;

    fn verify_indexed_attestation(
        &self,
        config: &Config,
        state: &BeaconState,
        data: AttestationData,
        signature: AggregateSignatureBytes,
        public_keys: &[PublicKeyBytes],
    ) -> Result<()>;

    fn verify_bls_to_execution_change(
        &self,
        config: &Config,
        state: &BeaconState,
        signed_bls_to_execution_change: &SignedBlsToExecutionChange,
    ) -> Result<()>;
}

/// Accepts everything. Used in tests and in paths that verify signatures elsewhere.
#[derive(Clone, Copy, Default, Debug)]
pub struct NullVerifier;

impl Verifier for NullVerifier {
    fn validate_signature_encoding(&self, _signature_bytes: SignatureBytes) -> Result<()> {
        Ok(())
    }

    fn verify_voluntary_exit(
        &self,
        _config: &Config,
        _state: &BeaconState,
        _signed_voluntary_exit: &SignedVoluntaryExit,
        _public_key: PublicKeyBytes,
    ) -> Result<()> {
        Ok(())
    }

    fn verify_block_header(
        &self,
        _config: &Config,
        _state: &BeaconState,
        _signed_header: &SignedBeaconBlockHeader,
        _public_key: PublicKeyBytes,
    ) -> Result<()> {
        Ok(())
    }

    fn verify_indexed_attestation(
        &self,
        _config: &Config,
        _state: &BeaconState,
        _data: AttestationData,
        _signature: AggregateSignatureBytes,
        _public_keys: &[PublicKeyBytes],
    ) -> Result<()> {
        Ok(())
    }

    fn verify_bls_to_execution_change(
        &self,
        _config: &Config,
        _state: &BeaconState,
        _signed_bls_to_execution_change: &SignedBlsToExecutionChange,
    ) -> Result<()> {
        Ok(())
    }
}

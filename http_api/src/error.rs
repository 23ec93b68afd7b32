use core::fmt::Display;
use std::error::Error as StdError;

use anyhow::Error as AnyhowError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use itertools::Itertools as _;
use operation_pools::SyncCommitteeError;
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("attestation has no committee bits set")]
    AttestationHasNoCommitteeBitsSet,
    #[error("Attestations at index {} could not be broadcasted", .0.iter().format(", "))]
    AttestationsNotBroadcast(Vec<usize>),
    #[error("No data submitted")]
    EmptyBody,
    #[error("internal error")]
    Internal(#[from] AnyhowError),
    #[error("invalid attestations")]
    InvalidAttestations(Vec<IndexedError>),
    #[error("invalid attester slashing, it will never pass validation so it's rejected")]
    InvalidAttesterSlashing(#[source] AnyhowError),
    #[error("invalid JSON body")]
    InvalidJsonBody(#[source] AnyhowError),
    #[error("invalid proposer slashing, it will never pass validation so it's rejected")]
    InvalidProposerSlashing(#[source] AnyhowError),
    #[error("invalid query string")]
    InvalidQuery(#[source] AnyhowError),
    #[error("invalid BLS to execution changes")]
    InvalidSignedBlsToExecutionChanges(Vec<IndexedError>),
    #[error("invalid voluntary exit, it will never pass validation so it's rejected")]
    InvalidSignedVoluntaryExit(#[source] AnyhowError),
    #[error("invalid sync committee messages")]
    InvalidSyncCommitteeMessages(Vec<IndexedError>),
    #[error("Eth-Consensus-Version header is required")]
    MissingConsensusVersionHeader,
    #[error("pool operation does not match the head state fork")]
    OperationVariantMismatch,
    #[error("could not broadcast slashing object")]
    UnableToBroadcastSlashing(#[source] AnyhowError),
    #[error("could not broadcast voluntary exit")]
    UnableToBroadcastVoluntaryExit(#[source] AnyhowError),
    #[error("could not insert operation into pool")]
    UnableToInsertIntoPool(#[source] AnyhowError),
    #[error("could not process slots")]
    UnableToProcessSlots(#[source] AnyhowError),
    #[error("could not submit sync committee message")]
    UnableToSubmitSyncCommitteeMessage(#[source] SyncCommitteeError),
    #[error("unknown Eth-Consensus-Version: {version}")]
    UnknownConsensusVersion { version: String },
    #[error("could not get validator")]
    ValidatorIndexOutOfBounds(#[source] AnyhowError),
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.format_sources())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

impl Error {
    // `anyhow::Error` prints the chain of sources if the alternate flag is specified.
    // Impls generated by `thiserror::Error` ignore the alternate flag. See:
    // - <https://github.com/dtolnay/thiserror/issues/78>
    // - <https://github.com/dtolnay/thiserror/issues/98>
    pub fn format_sources(&self) -> impl Display + '_ {
        self.sources().format(": ")
    }

    fn sources(&self) -> impl Iterator<Item = &dyn StdError> {
        let mut error: Option<&dyn StdError> = Some(self);

        core::iter::from_fn(move || {
            let source = error?.source();
            core::mem::replace(&mut error, source)
        })
    }

    const fn status_code(&self) -> StatusCode {
        match self {
            Self::AttestationHasNoCommitteeBitsSet
            | Self::EmptyBody
            | Self::InvalidAttestations(_)
            | Self::InvalidAttesterSlashing(_)
            | Self::InvalidJsonBody(_)
            | Self::InvalidProposerSlashing(_)
            | Self::InvalidQuery(_)
            | Self::InvalidSignedBlsToExecutionChanges(_)
            | Self::InvalidSignedVoluntaryExit(_)
            | Self::InvalidSyncCommitteeMessages(_)
            | Self::MissingConsensusVersionHeader
            | Self::UnableToSubmitSyncCommitteeMessage(SyncCommitteeError::Rejected(_))
            | Self::UnknownConsensusVersion { .. }
            | Self::ValidatorIndexOutOfBounds(_) => StatusCode::BAD_REQUEST,
            Self::AttestationsNotBroadcast(_)
            | Self::Internal(_)
            | Self::OperationVariantMismatch
            | Self::UnableToBroadcastSlashing(_)
            | Self::UnableToBroadcastVoluntaryExit(_)
            | Self::UnableToInsertIntoPool(_)
            | Self::UnableToProcessSlots(_)
            | Self::UnableToSubmitSyncCommitteeMessage(SyncCommitteeError::Internal(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> EthErrorResponse {
        EthErrorResponse {
            code: self.status_code().as_u16(),
            message: self,
            failures: self.failures(),
        }
    }

    fn failures(&self) -> &[IndexedError] {
        match self {
            Self::InvalidAttestations(failures)
            | Self::InvalidSignedBlsToExecutionChanges(failures)
            | Self::InvalidSyncCommitteeMessages(failures) => failures,
            _ => &[],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexedError {
    pub index: usize,
    #[serde(rename = "message", with = "serde_utils::alternate_display")]
    pub error: AnyhowError,
}

#[derive(Serialize)]
struct EthErrorResponse<'error> {
    // The `code` field is supposed to contain a number, unlike every other quantity.
    code: u16,
    message: &'error Error,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    failures: &'error [IndexedError],
}

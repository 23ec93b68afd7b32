//! Custom extractors for the [Eth Beacon Node API].
//!
//! The extractors provided by `axum` report errors in plain text with various status codes.
//! The [Eth Beacon Node API] requires errors to be reported in JSON with the 400 status code.
//!
//! [Eth Beacon Node API]: https://ethereum.github.io/beacon-APIs/

use anyhow::Error as AnyhowError;
use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json, RequestExt as _, RequestPartsExt as _,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use types::phase0::containers::{AttesterSlashing, ProposerSlashing, SignedVoluntaryExit};

use crate::error::Error;

pub struct EthQuery<T>(pub T);

impl<S: Send + Sync, T: DeserializeOwned + 'static> FromRequestParts<S> for EthQuery<T> {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extract::<Query<T>>()
            .await
            .map(|Query(query)| Self(query))
            .map_err(AnyhowError::new)
            .map_err(Error::InvalidQuery)
    }
}

// This has multiple `FromRequest` impls to make error messages more specific.
pub struct EthJson<T>(pub T);

impl<S: Send + Sync> FromRequest<S> for EthJson<Box<ProposerSlashing>> {
    type Rejection = Error;

    async fn from_request(request: Request, _state: &S) -> Result<Self, Self::Rejection> {
        request
            .extract()
            .await
            .map(|Json(slashing)| Self(slashing))
            .map_err(AnyhowError::new)
            .map_err(Error::InvalidProposerSlashing)
    }
}

impl<S: Send + Sync> FromRequest<S> for EthJson<Box<AttesterSlashing>> {
    type Rejection = Error;

    async fn from_request(request: Request, _state: &S) -> Result<Self, Self::Rejection> {
        request
            .extract()
            .await
            .map(|Json(slashing)| Self(slashing))
            .map_err(AnyhowError::new)
            .map_err(Error::InvalidAttesterSlashing)
    }
}

impl<S: Send + Sync> FromRequest<S> for EthJson<Box<SignedVoluntaryExit>> {
    type Rejection = Error;

    async fn from_request(request: Request, _state: &S) -> Result<Self, Self::Rejection> {
        request
            .extract()
            .await
            .map(|Json(exit)| Self(exit))
            .map_err(AnyhowError::new)
            .map_err(Error::InvalidSignedVoluntaryExit)
    }
}

// Batch bodies are decoded to raw JSON values first so that a malformed element
// is reported for its index instead of failing the whole batch.
impl<S: Send + Sync> FromRequest<S> for EthJson<Vec<Value>> {
    type Rejection = Error;

    async fn from_request(request: Request, _state: &S) -> Result<Self, Self::Rejection> {
        request
            .extract()
            .await
            .map(|Json(values)| Self(values))
            .map_err(AnyhowError::new)
            .map_err(Error::InvalidJsonBody)
    }
}

impl<S: Send + Sync> FromRequest<S> for EthJson<Value> {
    type Rejection = Error;

    async fn from_request(request: Request, _state: &S) -> Result<Self, Self::Rejection> {
        request
            .extract()
            .await
            .map(|Json(value)| Self(value))
            .map_err(AnyhowError::new)
            .map_err(Error::InvalidJsonBody)
    }
}

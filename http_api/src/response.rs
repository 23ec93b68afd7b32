use axum::{
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use types::nonstandard::Phase;

use crate::misc::ETH_CONSENSUS_VERSION;

/// The response envelope of the Eth Beacon Node API.
///
/// Every response wraps its payload in a `data` field. Fork-polymorphic (V2) responses
/// also carry the resolved fork both as a `version` field and as the
/// `Eth-Consensus-Version` header.
#[derive(Serialize)]
pub struct EthResponse<T> {
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<Phase>,
}

impl<T: Serialize> IntoResponse for EthResponse<T> {
    fn into_response(self) -> Response {
        let mut response_headers = HeaderMap::new();

        if let Some(phase) = self.version {
            response_headers.insert(
                ETH_CONSENSUS_VERSION,
                HeaderValue::from_static(<&str>::from(phase)),
            );
        }

        (response_headers, Json(self)).into_response()
    }
}

impl<T> EthResponse<T> {
    pub const fn json(data: T) -> Self {
        Self {
            data,
            version: None,
        }
    }

    pub const fn version(mut self, phase: Phase) -> Self {
        self.version = Some(phase);
        self
    }
}

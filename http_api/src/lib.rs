//! The beacon operation pool gateway.
//!
//! Accepts, validates, stages, and gossip-publishes operations that have not yet been
//! included in a block, and serves the current pool contents, per the [Eth Beacon Node API].
//!
//! [Eth Beacon Node API]: https://ethereum.github.io/beacon-APIs/

pub use crate::{
    error::Error,
    events::{OperationEvent, OperationNotifier},
    http_api_config::HttpApiConfig,
    routing::GatewayState,
    task::HttpApi,
};

mod error;
mod events;
mod extractors;
mod http_api_config;
mod misc;
mod response;
mod routing;
mod standard;
mod task;

#[cfg(test)]
mod context;

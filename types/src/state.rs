//! A read-only view of the head beacon state.
//!
//! The chain collaborator owns the real state; the gateway only ever sees immutable
//! snapshots of the fields operation validation touches. Snapshots are shared freely
//! between concurrent requests behind [`Arc`](std::sync::Arc)s.

use crate::phase0::{
    containers::{Fork, Validator},
    primitives::{Slot, H256},
};

#[derive(Clone, Default, Debug)]
pub struct BeaconState {
    pub slot: Slot,
    pub fork: Fork,
    pub genesis_validators_root: H256,
    pub validators: Vec<Validator>,
}

impl BeaconState {
    #[must_use]
    pub const fn slot(&self) -> Slot {
        self.slot
    }

    #[must_use]
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }
}

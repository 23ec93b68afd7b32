//! The chain collaborator seam.
//!
//! The gateway consumes head-state snapshots and a slot-advancing transition from
//! whatever drives fork choice. Both are behind one trait so that tests can pin the
//! head wherever they need it.

use std::sync::Arc;

use anyhow::Result;
use types::{config::Config, phase0::primitives::Slot, state::BeaconState};

pub trait Controller: Send + Sync {
    fn chain_config(&self) -> &Config;

    /// A snapshot of the state at the current head. Snapshots are immutable;
    /// concurrent readers share them freely.
    fn head_state(&self) -> Result<Arc<BeaconState>>;

    /// Advances `state` to `slot` if the implementation's policy allows it.
    ///
    /// The returned state supersedes the input and must be the one used for all
    /// further validation in the request. Implementations may refuse advancement
    /// that exceeds their policy bound.
    fn process_slots_if_possible(
        &self,
        state: Arc<BeaconState>,
        slot: Slot,
    ) -> Result<Arc<BeaconState>>;
}

//! In-process fan-out of received operations.
//!
//! Other node services (subnet relays, monitoring) subscribe here. Delivery is
//! best-effort at-most-once: sending never blocks ingestion, and a slow subscriber
//! loses the oldest events instead of stalling the gateway.

use std::sync::Arc;

use log::debug;
use tokio::sync::broadcast::{self, Receiver, Sender};
use types::{
    capella::containers::SignedBlsToExecutionChange,
    combined::{Attestation, AttesterSlashing},
    phase0::containers::{ProposerSlashing, SignedVoluntaryExit},
    preset::Preset,
};

pub const DEFAULT_MAX_EVENTS: usize = 100;

#[derive(Clone, Debug)]
pub enum OperationEvent<P: Preset> {
    UnaggregatedAttestationReceived(Arc<Attestation<P>>),
    AttesterSlashingReceived(Box<AttesterSlashing>),
    BlsToExecutionChangeReceived(Box<SignedBlsToExecutionChange>),
    ProposerSlashingReceived(Box<ProposerSlashing>),
    VoluntaryExitReceived(Box<SignedVoluntaryExit>),
}

pub struct OperationNotifier<P: Preset> {
    events: Sender<OperationEvent<P>>,
}

impl<P: Preset> Default for OperationNotifier<P> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EVENTS)
    }
}

impl<P: Preset> OperationNotifier<P> {
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: broadcast::channel(max_events).0,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> Receiver<OperationEvent<P>> {
        self.events.subscribe()
    }

    pub fn send(&self, event: OperationEvent<P>) {
        if self.events.send(event).is_err() {
            debug!("operation event dropped because there are no subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use types::phase0::containers::VoluntaryExit;
    use types::preset::Mainnet;

    use super::*;

    fn exit_event() -> OperationEvent<Mainnet> {
        OperationEvent::VoluntaryExitReceived(Box::new(SignedVoluntaryExit {
            message: VoluntaryExit {
                epoch: 0,
                validator_index: 0,
            },
            signature: Default::default(),
        }))
    }

    #[tokio::test]
    async fn events_reach_subscribers_in_emission_order() {
        let notifier = OperationNotifier::<Mainnet>::default();
        let mut receiver = notifier.subscribe();

        notifier.send(exit_event());

        assert!(matches!(
            receiver.recv().await,
            Ok(OperationEvent::VoluntaryExitReceived(_)),
        ));
    }

    #[test]
    fn sending_without_subscribers_is_not_an_error() {
        OperationNotifier::<Mainnet>::default().send(exit_event());
    }

    #[tokio::test]
    async fn slow_subscribers_lose_old_events_instead_of_blocking() {
        let notifier = OperationNotifier::<Mainnet>::new(1);
        let mut receiver = notifier.subscribe();

        notifier.send(exit_event());
        notifier.send(exit_event());

        // The first event was overwritten while the subscriber lagged.
        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Lagged(1)),
        ));

        assert!(matches!(
            receiver.recv().await,
            Ok(OperationEvent::VoluntaryExitReceived(_)),
        ));
    }
}

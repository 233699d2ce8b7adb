//! Store change notification channel.

use crate::model::joke::JokeId;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};

/// Mutation committed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Added(JokeId),
    Removed(JokeId),
}

/// Receiving end of a store subscription.
///
/// Dropping it unsubscribes; the store prunes the dead sender on its next
/// publish.
#[derive(Debug)]
pub struct StoreSubscription {
    rx: Receiver<StoreEvent>,
}

impl StoreSubscription {
    pub(crate) fn new(rx: Receiver<StoreEvent>) -> Self {
        Self { rx }
    }

    /// Returns the next pending event without blocking.
    pub fn try_next(&self) -> Option<StoreEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drains every pending event in publish order.
    pub fn drain(&self) -> Vec<StoreEvent> {
        self.rx.try_iter().collect()
    }
}

/// Fan-out list of live subscribers.
#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Vec<Sender<StoreEvent>>,
}

impl Subscribers {
    pub(crate) fn push(&mut self, tx: Sender<StoreEvent>) {
        self.senders.push(tx);
    }

    pub(crate) fn publish(&mut self, event: StoreEvent) {
        self.senders.retain(|tx| tx.send(event).is_ok());
    }

    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }
}

//! Change notification for cart observers (screens, badges).
//!
//! Observer list over std channels: every subscriber receives a copy of every
//! change, in mutation order. Subscribers whose receiving end was dropped are
//! pruned on the next publish.

use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Mutex;
use std::time::Duration;

use novashop_core::ProductId;

use crate::cart::Cart;

/// What kind of mutation produced a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    ItemAdded(ProductId),
    ItemRemoved(ProductId),
    QuantityUpdated(ProductId),
    Cleared,
}

/// A mutation together with the cart state right after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartChange {
    pub kind: ChangeKind,
    pub cart: Cart,
}

/// Receiving end of a cart subscription.
#[derive(Debug)]
pub struct CartSubscription {
    receiver: Receiver<CartChange>,
}

impl CartSubscription {
    fn new(receiver: Receiver<CartChange>) -> Self {
        Self { receiver }
    }

    /// Block until the next change is available.
    pub fn recv(&self) -> Result<CartChange, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a change without blocking.
    pub fn try_recv(&self) -> Result<CartChange, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a change.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<CartChange, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// All changes received so far, without blocking.
    pub fn drain(&self) -> Vec<CartChange> {
        self.receiver.try_iter().collect()
    }
}

/// Sending side held by the cart store.
#[derive(Debug, Default)]
pub(crate) struct ChangeNotifier {
    subscribers: Mutex<Vec<Sender<CartChange>>>,
}

impl ChangeNotifier {
    pub(crate) fn subscribe(&self) -> CartSubscription {
        let (tx, rx) = mpsc::channel();

        // A poisoned lock only means a publisher panicked; keep serving.
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subs.push(tx);

        CartSubscription::new(rx)
    }

    pub(crate) fn publish(&self, change: CartChange) {
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());

        // Drop any dead subscribers while publishing.
        subs.retain(|tx| tx.send(change.clone()).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

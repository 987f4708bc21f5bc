//! Durable copy of the cart.
//!
//! The cart is stored as one JSON record (`cart_data`): an array of
//! `{ "product": <full snapshot>, "quantity": n }`. Writes run on a single
//! background task so mutations never wait on storage; the durable copy lags
//! the in-memory cart by at most the queued writes.

use std::sync::Arc;

use novashop_storage::{KeyValueStore, load_json, save_json};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::cart::Cart;

/// Key of the persisted cart record.
pub const CART_KEY: &str = "cart_data";

/// Load the persisted cart.
///
/// Missing, unreadable or malformed records all yield an empty cart; the
/// failure is logged.
pub async fn load_cart(store: &dyn KeyValueStore) -> Cart {
    match load_json::<Cart>(store, CART_KEY).await {
        Ok(Some(cart)) => {
            tracing::debug!(lines = cart.line_count(), "restored persisted cart");
            cart
        }
        Ok(None) => Cart::new(),
        Err(err) => {
            tracing::warn!("discarding unreadable persisted cart: {err:?}");
            Cart::new()
        }
    }
}

#[derive(Debug)]
enum Write {
    Save(Cart),
    Delete,
}

#[derive(Debug)]
enum PersistCommand {
    Write(Write),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer.
#[derive(Debug)]
pub(crate) struct PersistHandle {
    tx: mpsc::UnboundedSender<PersistCommand>,
    worker: JoinHandle<()>,
}

impl PersistHandle {
    /// Spawn the writer task on the current tokio runtime.
    pub(crate) fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_writer(store, rx));
        Self { tx, worker }
    }

    pub(crate) fn save(&self, cart: &Cart) {
        self.send(PersistCommand::Write(Write::Save(cart.clone())));
    }

    pub(crate) fn delete(&self) {
        self.send(PersistCommand::Write(Write::Delete));
    }

    /// Wait until every write queued before this call has been attempted.
    pub(crate) async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(PersistCommand::Flush(ack_tx));
        // A dropped ack means the writer is gone; nothing left to wait for.
        let _ = ack_rx.await;
    }

    /// Stop accepting writes and wait for the writer to drain.
    pub(crate) async fn close(self) {
        let Self { tx, worker } = self;
        drop(tx);
        if let Err(err) = worker.await {
            tracing::error!("cart writer task failed: {err:?}");
        }
    }

    fn send(&self, cmd: PersistCommand) {
        if self.tx.send(cmd).is_err() {
            tracing::warn!("cart writer has stopped; change kept in memory only");
        }
    }
}

async fn run_writer(store: Arc<dyn KeyValueStore>, mut rx: mpsc::UnboundedReceiver<PersistCommand>) {
    while let Some(first) = rx.recv().await {
        let mut latest: Option<Write> = None;
        let mut waiters: Vec<oneshot::Sender<()>> = Vec::new();

        // Coalesce: only the newest queued write reaches storage.
        let mut next = Some(first);
        while let Some(cmd) = next {
            match cmd {
                PersistCommand::Write(w) => latest = Some(w),
                PersistCommand::Flush(ack) => waiters.push(ack),
            }
            next = rx.try_recv().ok();
        }

        if let Some(write) = latest {
            apply(store.as_ref(), write).await;
        }

        for ack in waiters {
            let _ = ack.send(());
        }
    }

    tracing::debug!("cart writer stopped");
}

async fn apply(store: &dyn KeyValueStore, write: Write) {
    let result = match &write {
        Write::Save(cart) => save_json(store, CART_KEY, cart).await,
        Write::Delete => store.remove(CART_KEY).await,
    };

    match result {
        Ok(()) => tracing::trace!(?write, "cart persisted"),
        Err(err) => tracing::error!("failed to persist cart: {err:?}"),
    }
}

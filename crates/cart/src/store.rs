//! The session's cart store.

use std::sync::Arc;

use novashop_catalog::Product;
use novashop_core::{Money, ProductId};
use novashop_storage::KeyValueStore;

use crate::cart::{Cart, CartLine};
use crate::persistence::{PersistHandle, load_cart};
use crate::subscription::{CartChange, CartSubscription, ChangeKind, ChangeNotifier};

/// Owns the cart for the current device/session.
///
/// Mutations apply to memory immediately and are visible to the next read.
/// Each effective mutation then queues a durable write and notifies
/// subscribers. Mutations that change nothing (removing an absent product,
/// adding zero) skip both.
#[derive(Debug)]
pub struct CartStore {
    cart: Cart,
    notifier: ChangeNotifier,
    persistence: Option<PersistHandle>,
}

impl CartStore {
    /// Store without durable storage (tests, guest previews).
    pub fn in_memory() -> Self {
        Self::with_cart(Cart::new(), None)
    }

    /// Restore the persisted cart from `store` and keep it updated.
    ///
    /// Must be called from within a tokio runtime: the background writer is
    /// spawned on it.
    pub async fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let cart = load_cart(store.as_ref()).await;
        tracing::info!(
            lines = cart.line_count(),
            items = cart.item_count(),
            "cart store opened"
        );
        Self::with_cart(cart, Some(PersistHandle::spawn(store)))
    }

    fn with_cart(cart: Cart, persistence: Option<PersistHandle>) -> Self {
        Self {
            cart,
            notifier: ChangeNotifier::default(),
            persistence,
        }
    }

    /// Add `quantity` of `product`; merges into an existing line by product id.
    ///
    /// Not clamped to `product.stock_quantity`.
    pub fn add_item(&mut self, product: Product, quantity: u32) {
        let product_id = product.id;
        if self.cart.add_item(product, quantity) {
            tracing::debug!(%product_id, quantity, "cart item added");
            self.commit(ChangeKind::ItemAdded(product_id));
        } else {
            tracing::debug!(%product_id, "ignoring add of zero quantity");
        }
    }

    /// `add_item(product, 1)`.
    pub fn add_one(&mut self, product: Product) {
        self.add_item(product, 1);
    }

    pub fn remove_item(&mut self, product_id: ProductId) {
        if self.cart.remove_item(product_id) {
            tracing::debug!(%product_id, "cart item removed");
            self.commit(ChangeKind::ItemRemoved(product_id));
        }
    }

    /// Set a line's quantity; `quantity ≤ 0` removes the line.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        if self.cart.update_quantity(product_id, quantity) {
            tracing::debug!(%product_id, quantity, "cart quantity updated");
            self.commit(ChangeKind::QuantityUpdated(product_id));
        }
    }

    /// Empty the cart and delete the persisted record.
    pub fn clear_cart(&mut self) {
        if self.cart.clear() {
            tracing::debug!("cart cleared");
            self.commit(ChangeKind::Cleared);
        }
    }

    pub fn total(&self) -> Money {
        self.cart.total()
    }

    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Owned copy of the current cart (for building an order request).
    pub fn snapshot(&self) -> Cart {
        self.cart.clone()
    }

    pub fn subscribe(&self) -> CartSubscription {
        self.notifier.subscribe()
    }

    pub fn is_persistent(&self) -> bool {
        self.persistence.is_some()
    }

    /// Wait until every mutation made so far has been written (or failed).
    pub async fn flush(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.flush().await;
        }
    }

    /// Drain pending writes and stop the background writer.
    pub async fn close(self) {
        if let Some(persistence) = self.persistence {
            persistence.close().await;
        }
    }

    fn commit(&mut self, kind: ChangeKind) {
        if let Some(persistence) = &self.persistence {
            match kind {
                ChangeKind::Cleared => persistence.delete(),
                _ => persistence.save(&self.cart),
            }
        }

        self.notifier.publish(CartChange {
            kind,
            cart: self.cart.clone(),
        });
    }
}

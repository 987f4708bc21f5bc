//! Checkout: cart → order request → remote order, then clear the cart.

use std::sync::Arc;

use thiserror::Error;

use novashop_cart::{Cart, CartStore};
use novashop_core::{ApiError, DomainError, Money};

use crate::api::OrderApi;
use crate::order::Order;
use crate::request::{CreateOrderRequest, PaymentMethod, ShippingAddress};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error(transparent)]
    InvalidDetails(#[from] DomainError),
    /// The API rejected or never received the order; the cart is unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// What the customer filled in on the checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

impl CheckoutDetails {
    pub fn new(shipping_address: ShippingAddress, payment_method: PaymentMethod) -> Self {
        Self {
            shipping_address,
            payment_method,
            notes: None,
        }
    }
}

/// Submits the session's cart as an order.
#[derive(Clone)]
pub struct Checkout {
    api: Arc<dyn OrderApi>,
}

impl core::fmt::Debug for Checkout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Checkout").finish_non_exhaustive()
    }
}

impl Checkout {
    pub fn new(api: Arc<dyn OrderApi>) -> Self {
        Self { api }
    }

    /// Place an order for everything in `cart`.
    ///
    /// On success the cart is cleared and the created order returned. On any
    /// error the cart is left exactly as it was.
    pub async fn submit(
        &self,
        cart: &mut CartStore,
        details: CheckoutDetails,
    ) -> Result<Order, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        details.shipping_address.validate()?;

        let mut request = CreateOrderRequest::from_cart(
            cart.cart(),
            details.shipping_address,
            details.payment_method,
        );
        if let Some(notes) = details.notes {
            request = request.with_notes(notes);
        }

        tracing::info!(
            lines = request.items.len(),
            payment_method = %request.payment_method,
            "submitting order"
        );

        match self.api.create_order(&request).await {
            Ok(order) => {
                tracing::info!(order_id = %order.id, "order created; clearing cart");
                cart.clear_cart();
                Ok(order)
            }
            Err(err) => {
                tracing::warn!("order submission failed, cart kept for retry: {err:?}");
                Err(CheckoutError::Api(err))
            }
        }
    }
}

/// Flat-rate shipping with a free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Subtotals strictly above this ship free.
    pub free_threshold: Money,
    pub flat_rate: Money,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_threshold: Money::from_minor(200_00),
            flat_rate: Money::from_minor(19_90),
        }
    }
}

impl ShippingPolicy {
    /// Flat rate unless `subtotal` is strictly above the threshold.
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal > self.free_threshold {
            Money::ZERO
        } else {
            self.flat_rate
        }
    }
}

/// Estimated amounts shown before placing the order.
///
/// Display-only: the server prices the order itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub item_count: u64,
    pub subtotal: Money,
    pub shipping: Money,
    pub total: Money,
}

impl CheckoutSummary {
    pub fn from_cart(cart: &Cart, policy: &ShippingPolicy) -> Self {
        let subtotal = cart.total();
        let shipping = policy.shipping_for(subtotal);
        Self {
            item_count: cart.item_count(),
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

//! Order boundary: turning a cart into an order-creation request.
//!
//! The server is the source of truth for prices at order time, so requests
//! carry only product ids and quantities. Successful submission clears the
//! cart; a failed one leaves it untouched for a retry.

pub mod api;
pub mod checkout;
pub mod order;
pub mod request;

pub use api::OrderApi;
pub use checkout::{Checkout, CheckoutDetails, CheckoutError, CheckoutSummary, ShippingPolicy};
pub use order::{Order, OrderItem, OrderStatus};
pub use request::{CreateOrderRequest, OrderItemRequest, PaymentMethod, ShippingAddress};

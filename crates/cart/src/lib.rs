//! `novashop-cart`
//!
//! **Responsibility:** the device-local shopping cart.
//!
//! This crate provides:
//! - `Cart`: the pure line model (one line per product id, quantities ≥ 1)
//! - `CartStore`: owns the session's cart, persists after every mutation and
//!   notifies subscribers
//! - A single background persistence task (fire-and-forget writes)
//!
//! The in-memory cart is always authoritative. Storage failures are logged and
//! never surface to callers.

pub mod cart;
pub mod persistence;
pub mod store;
pub mod subscription;

pub use cart::{Cart, CartLine};
pub use persistence::{CART_KEY, load_cart};
pub use store::CartStore;
pub use subscription::{CartChange, CartSubscription, ChangeKind};

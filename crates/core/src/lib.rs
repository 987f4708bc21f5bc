//! `novashop-core`: shared building blocks for the NovaShop client.
//!
//! This crate contains **pure domain** primitives (no IO, no HTTP, no storage).
//! `ApiError` lives here so the remote seams can be faked without a transport.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::{Entity, find_by_id, position_by_id};
pub use error::{ApiError, DomainError, DomainResult};
pub use id::{CategoryId, OrderId, ProductId, SellerId};
pub use money::Money;

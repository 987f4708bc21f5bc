//! Catalog read models (products, categories) as served by the marketplace API.
//!
//! The client never mutates catalog records; it only snapshots them (the cart
//! keeps a full `Product` per line for offline display).

pub mod api;
pub mod product;

pub use api::CatalogApi;
pub use product::{Category, Product, SellerInfo};

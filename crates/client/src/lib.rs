//! `novashop-client`
//!
//! **Responsibility:** wire the client core to the outside world.
//!
//! This crate provides:
//! - Environment-driven configuration
//! - An HTTP implementation of the catalog, order and auth seams
//! - Session (auth token) persistence
//! - `ClientContext`, the per-process bundle of storage, cart, session and API
//!
//! The client is a **thin shell** around the marketplace REST API; the only
//! state it owns is the device-local cart and session.

pub mod auth;
pub mod config;
pub mod context;
pub mod http;
pub mod session;

pub use auth::{AuthApi, AuthResponse, LoginRequest, RegisterRequest, User};
pub use config::{ClientConfig, ConfigError};
pub use context::ClientContext;
pub use http::HttpApiClient;
pub use session::SessionStore;

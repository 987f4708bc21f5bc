//! Remote order seam.

use async_trait::async_trait;

use novashop_core::{ApiError, OrderId};

use crate::order::Order;
use crate::request::CreateOrderRequest;

/// Order endpoints of the marketplace API.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// `POST /orders`. Non-2xx responses surface as `ApiError::Status` with
    /// the server's message.
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError>;

    /// `GET /orders` for the signed-in customer.
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError>;

    /// `PATCH /orders/{id}/cancel`.
    async fn cancel_order(&self, id: OrderId) -> Result<(), ApiError>;
}

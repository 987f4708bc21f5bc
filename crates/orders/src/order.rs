use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use novashop_core::{Money, OrderId, ProductId};

use crate::request::{PaymentMethod, ShippingAddress};

/// Order status lifecycle (server-owned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[serde(alias = "PENDING")]
    PendingPayment,
    #[serde(alias = "CONFIRMED")]
    Paid,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    /// Any status this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Whether the customer may still cancel the order.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, OrderStatus::PendingPayment | OrderStatus::Paid)
    }
}

/// Line of a created order, priced by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Option<Money>,
    #[serde(default, alias = "totalPrice")]
    pub total: Option<Money>,
}

/// Order as returned by the API after creation or in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub order_number: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub subtotal: Option<Money>,
    #[serde(default)]
    pub shipping_cost: Option<Money>,
    #[serde(default, alias = "totalAmount")]
    pub total: Option<Money>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Order {
    /// Σ quantity over the order's items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

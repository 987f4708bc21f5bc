use core::str::FromStr;

use serde::{Deserialize, Serialize};

use novashop_cart::{Cart, CartLine};
use novashop_core::{DomainError, DomainResult, ProductId};

/// How the customer pays. Serialized as the backend's enum names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Pix,
    /// Boleto bancário.
    BankSlip,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::DebitCard => "DEBIT_CARD",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::BankSlip => "BANK_SLIP",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
        }
    }
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    /// Accepts the wire names plus the short forms used by checkout forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREDIT_CARD" | "CREDIT" => Ok(PaymentMethod::CreditCard),
            "DEBIT_CARD" | "DEBIT" => Ok(PaymentMethod::DebitCard),
            "PIX" => Ok(PaymentMethod::Pix),
            "BANK_SLIP" | "BOLETO" => Ok(PaymentMethod::BankSlip),
            "BANK_TRANSFER" => Ok(PaymentMethod::BankTransfer),
            _ => Err(DomainError::validation(format!(
                "unknown payment method {s:?}; expected one of: CREDIT_CARD, DEBIT_CARD, PIX, BANK_SLIP, BANK_TRANSFER"
            ))),
        }
    }
}

/// Delivery address sent with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl ShippingAddress {
    /// Reject blank required fields. `complement` is optional.
    pub fn validate(&self) -> DomainResult<()> {
        let required = [
            ("street", &self.street),
            ("number", &self.number),
            ("neighborhood", &self.neighborhood),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.zip_code),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "shipping address is missing: {}",
                missing.join(", ")
            )))
        }
    }
}

/// One requested order line. Price is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl From<&CartLine> for OrderItemRequest {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id,
            quantity: line.quantity,
        }
    }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateOrderRequest {
    /// Map cart lines 1:1 into order items, preserving cart order.
    pub fn from_cart(
        cart: &Cart,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            items: cart.lines().iter().map(OrderItemRequest::from).collect(),
            shipping_address,
            payment_method,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() { None } else { Some(notes) };
        self
    }
}

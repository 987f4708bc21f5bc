use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use novashop_core::{CategoryId, Entity, Money, ProductId, SellerId};

/// Product category (display metadata only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Seller that listed the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerInfo {
    pub id: SellerId,
    pub name: String,
    pub email: String,
}

/// Product snapshot (matches the API response shape).
///
/// Only `id`, `price` and `stock_quantity` matter to the cart; everything else
/// is carried so a persisted cart can be rendered without the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub stock_quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<SellerInfo>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

fn default_active() -> bool {
    true
}

impl Product {
    /// Minimal product with no display metadata.
    pub fn new(id: ProductId, name: impl Into<String>, price: Money, stock_quantity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            stock_quantity,
            description: None,
            sku: None,
            image_url: None,
            category: None,
            seller: None,
            active: true,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Check if the product can be offered for purchase.
    pub fn can_be_sold(&self) -> bool {
        self.active && self.in_stock()
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_api_payload() {
        let json = r#"{
            "id": 7,
            "name": "Fone Bluetooth",
            "description": "Sem fio",
            "price": 149.9,
            "stockQuantity": 12,
            "imageUrl": "https://img.example/7.png",
            "category": { "id": 2, "name": "Audio", "description": null },
            "seller": { "id": 5, "name": "Loja X", "email": "x@loja.example" },
            "createdAt": "2024-05-01T10:15:30",
            "updatedAt": "2024-05-02T08:00:00.123",
            "active": true
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.price, "149.90".parse().unwrap());
        assert_eq!(product.stock_quantity, 12);
        assert_eq!(product.category.as_ref().unwrap().name, "Audio");
        assert_eq!(product.seller.as_ref().unwrap().id, SellerId::new(5));
        assert!(product.created_at.is_some());
        assert!(product.can_be_sold());
    }

    #[test]
    fn optional_metadata_defaults() {
        let json = r#"{ "id": 1, "name": "Caneca", "price": 10, "stockQuantity": 0 }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert!(product.active);
        assert!(product.description.is_none());
        assert!(!product.in_stock());
        assert!(!product.can_be_sold());
    }

    #[test]
    fn serializes_camel_case_and_skips_missing_metadata() {
        let product = Product::new(ProductId::new(3), "Livro", Money::from_minor(4590), 4);
        let value = serde_json::to_value(&product).unwrap();

        assert_eq!(value["stockQuantity"], 4);
        assert_eq!(value["price"], 45.9);
        assert!(value.get("imageUrl").is_none());
    }
}

//! Item (catalogue product) records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ItemId, Timestamp};

/// An item as returned by the backend.
///
/// `price` travels as a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: u64,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Payload for `POST /items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Payload for `PUT /items/{id}`.
///
/// The edit page replaces the whole record: `description` and `image_url`
/// are always sent, and `null` clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<ItemCreate> for ItemUpdate {
    fn from(create: ItemCreate) -> Self {
        Self {
            name: Some(create.name),
            description: create.description,
            price: Some(create.price),
            stock: Some(create.stock),
            image_url: create.image_url,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_item_price_decodes_from_number() {
        let item: Item = serde_json::from_value(json!({
            "id": "9a1f3c52-5d2b-4f34-8a57-0c7c9e1d2b33",
            "name": "Green tea",
            "description": null,
            "price": 1200.5,
            "stock": 3,
            "image_url": null,
            "created_at": "2024-05-01T00:00:00Z",
            "updated_at": "2024-05-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(item.price, Decimal::new(12005, 1));
        assert_eq!(item.stock, 3);
    }

    #[test]
    fn test_item_stock_beyond_32_bits_decodes() {
        let item: Item = serde_json::from_value(json!({
            "id": "9a1f3c52-5d2b-4f34-8a57-0c7c9e1d2b33",
            "name": "Bulk tea",
            "price": 1,
            "stock": 5_000_000_000_u64,
            "created_at": "2024-05-01T00:00:00Z",
            "updated_at": "2024-05-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(item.stock, 5_000_000_000);
    }

    #[test]
    fn test_update_from_create_sends_every_field() {
        let update = ItemUpdate::from(ItemCreate {
            name: "Matcha".to_string(),
            description: None,
            price: Decimal::new(800, 0),
            stock: 10,
            image_url: None,
        });
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["name"], "Matcha");
        assert_eq!(json["price"].as_f64(), Some(800.0));
        assert_eq!(json["stock"], 10);
        assert!(json["description"].is_null());
        assert!(json.as_object().unwrap().contains_key("image_url"));
    }

    #[test]
    fn test_create_skips_empty_optionals() {
        let create = ItemCreate {
            name: "Sencha".to_string(),
            description: None,
            price: Decimal::new(500, 0),
            stock: 0,
            image_url: None,
        };
        let json = serde_json::to_value(&create).unwrap();
        assert!(!json.as_object().unwrap().contains_key("description"));
    }
}

//! Order records and order lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ItemId, OrderId, OrderStatus, Timestamp, UserId};

const fn default_quantity() -> u32 {
    1
}

/// One line of an order: an item, a quantity, and the price captured when
/// the order was placed.
///
/// Some backends answer with the associated item records instead of the
/// association rows. Those carry `id`, `name`, and the item's `price` but no
/// quantity, so the aliases below accept them and the quantity falls back
/// to 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(alias = "id")]
    pub item_id: ItemId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(alias = "price", with = "rust_decimal::serde::float")]
    pub price_at_time: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl OrderLine {
    /// `price_at_time × quantity`, or `None` when it does not fit a
    /// [`Decimal`].
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price_at_time.checked_mul(Decimal::from(self.quantity))
    }
}

/// An order as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

impl Order {
    /// Number of lines on the order.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }
}

/// One line of an [`OrderCreate`] payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineCreate {
    pub item_id: ItemId,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_at_time: Decimal,
}

/// Payload for `POST /orders`.
///
/// `total_amount` is computed by the admin and trusted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreate {
    pub user_id: UserId,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<OrderLineCreate>,
}

/// Payload for `PUT /orders/{id}`.
///
/// `shipping_address` and `notes` are always sent; `null` clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
